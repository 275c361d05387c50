use log::warn;
use nalgebra::Point3;

mod attractor;
mod body;
mod builder;

pub use attractor::{Attractor, AttractorRef, CentralBody, PointMass};
pub use body::{Body, BodyID, BodyInfo, BodySpec};
pub use builder::OrreryBuilder;

/// The whole simulated system: one central mass and the bodies around it.
///
/// Bodies are stored by `BodyID` and advanced in `order`, which puts every
/// body after the body it orbits. That way a satellite is always pulled toward
/// where its attractor is this frame, not where it was last frame.
#[derive(Debug, Clone)]
pub struct Orrery {
    central: CentralBody,
    bodies: Vec<Body>,
    order: Vec<BodyID>,
    g: f64,
    // Wall-clock seconds seen by `step`; trails age against this
    clock: f64,
    // Seconds of simulated motion, i.e. the sum of delta * speed
    simulated_time: f64,
}

impl Orrery {
    fn new(central: CentralBody, bodies: Vec<Body>, order: Vec<BodyID>, g: f64) -> Self {
        Orrery {
            central,
            bodies,
            order,
            g,
            clock: 0.0,
            simulated_time: 0.0,
        }
    }

    pub fn central(&self) -> &CentralBody {
        &self.central
    }

    /// Retunes the central mass. Takes effect on the next step.
    pub fn set_central_mass(&mut self, mass: f64) {
        if !(mass.is_finite() && mass > 0.0) {
            warn!("Ignoring central mass {}", mass);
            return;
        }
        self.central.set_mass(mass);
    }

    pub fn gravitational_constant(&self) -> f64 {
        self.g
    }

    pub fn elapsed(&self) -> f64 {
        self.clock
    }

    pub fn simulated_time(&self) -> f64 {
        self.simulated_time
    }

    pub fn bodies(&self) -> impl Iterator<Item = &Body> {
        self.bodies.iter()
    }

    pub fn get_body(&self, id: BodyID) -> &Body {
        &self.bodies[id.0]
    }

    pub fn get_body_mut(&mut self, id: BodyID) -> &mut Body {
        &mut self.bodies[id.0]
    }

    pub fn find_body(&self, name: &str) -> Option<&Body> {
        self.bodies.iter().find(|b| b.name() == name)
    }

    pub fn update_order(&self) -> &[BodyID] {
        &self.order
    }

    pub fn recolor(&mut self, id: BodyID, color: Point3<f32>) {
        self.bodies[id.0].set_color(color);
    }

    pub fn clear_trails(&mut self) {
        for body in self.bodies.iter_mut() {
            body.clear_trail();
        }
    }

    /// Resolves a body's attractor to something we can read from.
    pub fn attractor_of(&self, id: BodyID) -> Option<&dyn Attractor> {
        let body = &self.bodies[id.0];
        match body.attractor_ref()? {
            AttractorRef::Central => Some(&self.central),
            AttractorRef::Fixed(p) => Some(p),
            AttractorRef::Body(parent) => Some(&self.bodies[parent.0]),
        }
    }

    /// Advances every body by `delta` wall-clock seconds, scaled by `speed`.
    ///
    /// Trails are stamped with the unscaled clock, so they keep aging (and
    /// emptying out) even while `speed` is zero. All bodies share the same
    /// stamp within a frame.
    pub fn step(&mut self, delta: f64, speed: f64) {
        debug_assert!(delta >= 0.0, "negative frame delta {}", delta);

        self.clock += delta;
        let now = self.clock;
        let dt = delta * speed;
        self.simulated_time += dt;

        let g = self.g;
        for idx in 0..self.order.len() {
            let id = self.order[idx];
            // Everything earlier in `order` is already at this frame's state
            let pull = self.attractor_of(id).map(|a| PointMass::capture(a));

            let body = &mut self.bodies[id.0];
            body.advance(pull.as_ref().map(|p| p as &dyn Attractor), g, dt);
            body.record_trail(now);
        }
    }
}
