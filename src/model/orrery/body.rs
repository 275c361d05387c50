use nalgebra::{Point3, Vector3};

use super::attractor::{Attractor, AttractorRef};
use crate::math::integrator::{advance_phase, gravity_acceleration, symplectic_euler, KinematicState};
use crate::model::trail::TrailBuffer;

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct BodyID(pub usize);

// All the display-only info about a body
#[derive(Debug, Clone)]
pub struct BodyInfo {
    pub name: String,
    pub size: f32,
    pub color: Point3<f32>,
}

/// Everything needed to create a body at setup time.
#[derive(Debug, Clone)]
pub struct BodySpec {
    pub info: BodyInfo,
    pub mass: f64,
    pub rotation_period: f64,
    pub position: Point3<f64>,
    pub velocity: Vector3<f64>,
    pub attractor: Option<AttractorRef>,
    pub trail_window: f64,
}

#[derive(Debug, Clone)]
pub struct Body {
    pub id: BodyID,
    pub info: BodyInfo,
    mass: f64,
    rotation_period: f64,
    state: KinematicState,
    rotation_phase: f64,
    size_multiplier: f64,
    attractor: Option<AttractorRef>,
    trail: TrailBuffer,
}

impl Body {
    pub(super) fn new(id: BodyID, spec: BodySpec) -> Self {
        let trail = TrailBuffer::new(spec.trail_window, spec.info.color);
        Body {
            id,
            info: spec.info,
            mass: spec.mass,
            rotation_period: spec.rotation_period,
            state: KinematicState::new(spec.position, spec.velocity),
            rotation_phase: 0.0,
            size_multiplier: 1.0,
            attractor: spec.attractor,
            trail,
        }
    }

    pub fn name(&self) -> &str {
        &self.info.name
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn size(&self) -> f32 {
        self.info.size
    }

    pub fn color(&self) -> Point3<f32> {
        self.info.color
    }

    pub fn position(&self) -> Point3<f64> {
        self.state.position
    }

    pub fn velocity(&self) -> Vector3<f64> {
        self.state.velocity
    }

    pub fn rotation_period(&self) -> f64 {
        self.rotation_period
    }

    pub fn rotation_phase(&self) -> f64 {
        self.rotation_phase
    }

    pub fn attractor(&self) -> Option<AttractorRef> {
        self.attractor
    }

    pub(super) fn attractor_ref(&self) -> Option<&AttractorRef> {
        self.attractor.as_ref()
    }

    pub fn parent_id(&self) -> Option<BodyID> {
        match self.attractor {
            Some(AttractorRef::Body(id)) => Some(id),
            _ => None,
        }
    }

    pub fn trail(&self) -> &TrailBuffer {
        &self.trail
    }

    pub fn size_multiplier(&self) -> f64 {
        self.size_multiplier
    }

    /// Cosmetic only; the integrator never looks at size.
    pub fn set_size_multiplier(&mut self, multiplier: f64) {
        self.size_multiplier = multiplier;
    }

    /// Changes the display color of the body and its trail. Stored trail
    /// samples are untouched.
    pub fn set_color(&mut self, color: Point3<f32>) {
        self.info.color = color;
        self.trail.set_color(color);
    }

    pub(super) fn set_attractor(&mut self, attractor: Option<AttractorRef>) {
        self.attractor = attractor;
    }

    pub(super) fn clear_trail(&mut self) {
        self.trail.clear();
    }

    /// One integrator step of `dt` simulated seconds, pulled toward
    /// `attractor` as it is right now.
    pub(super) fn advance(&mut self, attractor: Option<&dyn Attractor>, g: f64, dt: f64) {
        let acceleration = attractor.and_then(|a| {
            gravity_acceleration(
                &self.state.position,
                &a.current_position(),
                a.current_mass(),
                g,
            )
        });
        symplectic_euler(&mut self.state, acceleration, dt);
        self.rotation_phase = advance_phase(self.rotation_phase, self.rotation_period, dt);
    }

    pub(super) fn record_trail(&mut self, now: f64) {
        self.trail.append(self.state.position, now);
    }
}

impl Attractor for Body {
    fn current_mass(&self) -> f64 {
        self.mass
    }

    fn current_position(&self) -> Point3<f64> {
        self.state.position
    }
}
