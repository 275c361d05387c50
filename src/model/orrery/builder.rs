use log::{debug, info, warn};
use nalgebra::{Point3, Vector3};

use super::attractor::{Attractor, AttractorRef, CentralBody};
use super::body::{Body, BodyID, BodyInfo, BodySpec};
use super::Orrery;
use crate::consts::{get_circular_velocity, DEFAULT_G, DEFAULT_TRAIL_SECONDS, MIN_SEPARATION};
use crate::math::geometry::prograde_direction;
use crate::math::graph::parents_first;
use crate::model::error::ConfigError;

fn is_positive(x: f64) -> bool {
    x.is_finite() && x > 0.0
}

/// Collects bodies at setup time and checks them before anything moves.
///
/// Bodies may name attractors that are added later (see `bind_attractor`),
/// so the attractor graph is only checked in `build`.
pub struct OrreryBuilder {
    central: CentralBody,
    g: f64,
    trail_window: f64,
    bodies: Vec<Body>,
}

impl OrreryBuilder {
    pub fn new(central: CentralBody) -> Self {
        OrreryBuilder {
            central,
            g: DEFAULT_G,
            trail_window: DEFAULT_TRAIL_SECONDS,
            bodies: vec![],
        }
    }

    pub fn set_gravitational_constant(&mut self, g: f64) {
        self.g = g;
    }

    /// Trail window given to bodies created by `add_circular_orbit`.
    pub fn set_trail_window(&mut self, window: f64) {
        self.trail_window = window;
    }

    pub fn get_body(&self, id: BodyID) -> &Body {
        &self.bodies[id.0]
    }

    pub fn add_body(&mut self, spec: BodySpec) -> Result<BodyID, ConfigError> {
        let name = &spec.info.name;
        if !is_positive(spec.mass) {
            return Err(ConfigError::InvalidMass {
                name: name.clone(),
                mass: spec.mass,
            });
        }
        if !is_positive(spec.rotation_period) {
            return Err(ConfigError::InvalidRotationPeriod {
                name: name.clone(),
                period: spec.rotation_period,
            });
        }
        if !is_positive(spec.trail_window) {
            return Err(ConfigError::InvalidTrailWindow {
                name: name.clone(),
                window: spec.trail_window,
            });
        }

        let id = BodyID(self.bodies.len());
        self.bodies.push(Body::new(id, spec));
        Ok(id)
    }

    /// Points an existing body at a new attractor, e.g. to make it a
    /// satellite of a body created after it.
    pub fn bind_attractor(
        &mut self,
        id: BodyID,
        attractor: AttractorRef,
    ) -> Result<(), ConfigError> {
        match self.bodies.get_mut(id.0) {
            Some(body) => {
                body.set_attractor(Some(attractor));
                Ok(())
            }
            None => Err(ConfigError::UnknownAttractor {
                name: format!("{:?}", id),
                attractor: format!("{:?}", attractor),
            }),
        }
    }

    // Zero is allowed: everything coasts
    fn check_gravitational_constant(&self) -> Result<(), ConfigError> {
        if self.g.is_finite() && self.g >= 0.0 {
            Ok(())
        } else {
            Err(ConfigError::InvalidGravitationalConstant { g: self.g })
        }
    }

    /// Adds a body on a circular orbit around `attractor`, offset from it by
    /// `radius` (in the attractor's frame). The orbit runs counter-clockwise
    /// around the z axis.
    ///
    /// If the attractor is itself a body, the new body inherits its velocity,
    /// so that the circular motion is relative to the moving attractor.
    pub fn add_circular_orbit(
        &mut self,
        info: BodyInfo,
        mass: f64,
        rotation_period: f64,
        attractor: AttractorRef,
        radius: Vector3<f64>,
    ) -> Result<BodyID, ConfigError> {
        self.check_gravitational_constant()?;
        let (attractor_position, attractor_velocity, attractor_mass) =
            self.attractor_state(&info.name, &attractor)?;

        let r = radius.norm();
        let relative_velocity = if r <= MIN_SEPARATION {
            warn!(
                "{} starts on top of its attractor; giving it no orbital velocity",
                info.name
            );
            Vector3::zeros()
        } else {
            let speed = get_circular_velocity(r, self.g * attractor_mass);
            speed * prograde_direction(&radius, &Vector3::z(), 1e-12).into_inner()
        };

        let spec = BodySpec {
            info,
            mass,
            rotation_period,
            position: attractor_position + radius,
            velocity: attractor_velocity + relative_velocity,
            attractor: Some(attractor),
            trail_window: self.trail_window,
        };
        self.add_body(spec)
    }

    fn attractor_state(
        &self,
        name: &str,
        attractor: &AttractorRef,
    ) -> Result<(Point3<f64>, Vector3<f64>, f64), ConfigError> {
        match attractor {
            AttractorRef::Central => Ok((
                self.central.current_position(),
                Vector3::zeros(),
                self.central.current_mass(),
            )),
            AttractorRef::Fixed(p) => Ok((p.position, Vector3::zeros(), p.mass)),
            AttractorRef::Body(id) => match self.bodies.get(id.0) {
                Some(body) => Ok((body.position(), body.velocity(), body.mass())),
                None => Err(ConfigError::UnknownAttractor {
                    name: name.to_owned(),
                    attractor: format!("{:?}", id),
                }),
            },
        }
    }

    pub fn build(self) -> Result<Orrery, ConfigError> {
        self.check_gravitational_constant()?;
        if !is_positive(self.central.mass()) {
            return Err(ConfigError::InvalidMass {
                name: self.central.info.name.clone(),
                mass: self.central.mass(),
            });
        }

        for body in self.bodies.iter() {
            match body.attractor() {
                Some(AttractorRef::Body(id)) if id.0 >= self.bodies.len() => {
                    return Err(ConfigError::UnknownAttractor {
                        name: body.name().to_owned(),
                        attractor: format!("{:?}", id),
                    });
                }
                Some(AttractorRef::Fixed(p)) if !is_positive(p.mass) => {
                    return Err(ConfigError::InvalidMass {
                        name: format!("{} (attractor)", body.name()),
                        mass: p.mass,
                    });
                }
                _ => {}
            }
        }

        let bodies = self.bodies;
        let order = parents_first(bodies.len(), |i| bodies[i].parent_id().map(|id| id.0))
            .map_err(|i| ConfigError::CyclicAttractor {
                name: bodies[i].name().to_owned(),
            })?;
        let order: Vec<BodyID> = order.into_iter().map(BodyID).collect();

        debug!(
            "Update order: {:?}",
            order
                .iter()
                .map(|id| bodies[id.0].name())
                .collect::<Vec<_>>()
        );
        info!(
            "Built orrery around {} with {} bodies",
            self.central.info.name,
            bodies.len()
        );

        Ok(Orrery::new(self.central, bodies, order, self.g))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::model::orrery::PointMass;

    fn info(name: &str) -> BodyInfo {
        BodyInfo {
            name: name.to_owned(),
            size: 1.0,
            color: Point3::new(1.0, 1.0, 1.0),
        }
    }

    fn central(mass: f64) -> CentralBody {
        CentralBody::new(info("Sun"), mass)
    }

    fn spec(name: &str, attractor: Option<AttractorRef>) -> BodySpec {
        BodySpec {
            info: info(name),
            mass: 1.0,
            rotation_period: 1.0,
            position: Point3::new(10.0, 0.0, 0.0),
            velocity: Vector3::zeros(),
            attractor,
            trail_window: 5.0,
        }
    }

    #[test]
    fn test_rejects_bad_values() {
        let mut builder = OrreryBuilder::new(central(100.0));

        let mut s = spec("Heavy", None);
        s.mass = -1.0;
        assert!(matches!(
            builder.add_body(s),
            Err(ConfigError::InvalidMass { .. })
        ));

        let mut s = spec("Weightless", None);
        s.mass = 0.0;
        assert!(matches!(
            builder.add_body(s),
            Err(ConfigError::InvalidMass { .. })
        ));

        let mut s = spec("Still", None);
        s.rotation_period = 0.0;
        assert_eq!(
            builder.add_body(s),
            Err(ConfigError::InvalidRotationPeriod {
                name: "Still".to_owned(),
                period: 0.0
            })
        );

        let mut s = spec("Backwards", None);
        s.rotation_period = -3.0;
        assert!(matches!(
            builder.add_body(s),
            Err(ConfigError::InvalidRotationPeriod { .. })
        ));

        let mut s = spec("Traceless", None);
        s.trail_window = 0.0;
        assert!(matches!(
            builder.add_body(s),
            Err(ConfigError::InvalidTrailWindow { .. })
        ));

        let mut s = spec("Moon", None);
        s.attractor = Some(AttractorRef::Fixed(PointMass::new(Point3::origin(), -5.0)));
        builder.add_body(s).unwrap();
        assert!(matches!(
            builder.build(),
            Err(ConfigError::InvalidMass { .. })
        ));
    }

    #[test]
    fn test_rejects_bad_central_mass() {
        let builder = OrreryBuilder::new(central(f64::NAN));
        assert!(matches!(
            builder.build(),
            Err(ConfigError::InvalidMass { .. })
        ));
    }

    #[test]
    fn test_rejects_cycle() {
        let mut builder = OrreryBuilder::new(central(100.0));
        builder.add_body(spec("A", Some(AttractorRef::Central))).unwrap();
        let b = builder.add_body(spec("B", None)).unwrap();
        let c = builder.add_body(spec("C", Some(AttractorRef::Body(b)))).unwrap();
        builder.bind_attractor(b, AttractorRef::Body(c)).unwrap();

        assert_eq!(
            builder.build().err(),
            Some(ConfigError::CyclicAttractor {
                name: "B".to_owned()
            })
        );
    }

    #[test]
    fn test_rejects_self_attraction() {
        let mut builder = OrreryBuilder::new(central(100.0));
        let a = builder.add_body(spec("Ouroboros", None)).unwrap();
        builder.bind_attractor(a, AttractorRef::Body(a)).unwrap();
        assert!(matches!(
            builder.build(),
            Err(ConfigError::CyclicAttractor { .. })
        ));
    }

    #[test]
    fn test_rejects_unknown_attractor() {
        let mut builder = OrreryBuilder::new(central(100.0));
        builder
            .add_body(spec("Lost", Some(AttractorRef::Body(BodyID(7)))))
            .unwrap();
        assert!(matches!(
            builder.build(),
            Err(ConfigError::UnknownAttractor { .. })
        ));

        let mut builder = OrreryBuilder::new(central(100.0));
        let result = builder.add_circular_orbit(
            info("Lost"),
            1.0,
            1.0,
            AttractorRef::Body(BodyID(0)),
            Vector3::x(),
        );
        assert!(matches!(
            result,
            Err(ConfigError::UnknownAttractor { .. })
        ));

        // Binding a body that was never added
        let mut builder = OrreryBuilder::new(central(100.0));
        assert!(matches!(
            builder.bind_attractor(BodyID(3), AttractorRef::Central),
            Err(ConfigError::UnknownAttractor { .. })
        ));
    }

    #[test]
    fn test_rejects_bad_gravitational_constant() {
        for g in [-1.0, f64::NAN, f64::INFINITY] {
            let mut builder = OrreryBuilder::new(central(100.0));
            builder.set_gravitational_constant(g);
            assert!(matches!(
                builder.add_circular_orbit(info("Planet"), 1.0, 1.0, AttractorRef::Central, Vector3::x()),
                Err(ConfigError::InvalidGravitationalConstant { .. })
            ));
            assert!(matches!(
                builder.build(),
                Err(ConfigError::InvalidGravitationalConstant { .. })
            ));
        }

        let mut builder = OrreryBuilder::new(central(100.0));
        builder.set_gravitational_constant(0.0);
        let id = builder
            .add_circular_orbit(info("Drifter"), 1.0, 1.0, AttractorRef::Central, Vector3::x())
            .unwrap();
        assert_eq!(builder.get_body(id).velocity(), Vector3::zeros());
        assert!(builder.build().is_ok());
    }

    #[test]
    fn test_late_binding_orders_parent_first() {
        // The moon is created before the planet it orbits
        let mut builder = OrreryBuilder::new(central(100.0));
        let moon = builder.add_body(spec("Moon", None)).unwrap();
        let planet = builder
            .add_body(spec("Planet", Some(AttractorRef::Central)))
            .unwrap();
        builder.bind_attractor(moon, AttractorRef::Body(planet)).unwrap();

        let orrery = builder.build().unwrap();
        assert_eq!(orrery.update_order(), &[planet, moon]);
    }

    #[test]
    fn test_circular_seeding() {
        let g = 2.0;
        let mut builder = OrreryBuilder::new(central(50.0));
        builder.set_gravitational_constant(g);

        let planet = builder
            .add_circular_orbit(
                info("Planet"),
                8.0,
                1.0,
                AttractorRef::Central,
                Vector3::new(25.0, 0.0, 0.0),
            )
            .unwrap();
        let moon = builder
            .add_circular_orbit(
                info("Moon"),
                0.1,
                1.0,
                AttractorRef::Body(planet),
                Vector3::new(4.0, 0.0, 0.0),
            )
            .unwrap();

        // v = sqrt(G M / r), along +y when the radius is along +x
        let planet_body = builder.get_body(planet);
        assert_relative_eq!(planet_body.position(), Point3::new(25.0, 0.0, 0.0));
        assert_relative_eq!(planet_body.velocity(), Vector3::new(0.0, 2.0, 0.0));

        // The moon's velocity is the planet's plus its own circular velocity
        let moon_body = builder.get_body(moon);
        assert_relative_eq!(moon_body.position(), Point3::new(29.0, 0.0, 0.0));
        assert_relative_eq!(moon_body.velocity(), Vector3::new(0.0, 4.0, 0.0));
        assert_eq!(moon_body.parent_id(), Some(planet));
    }

    #[test]
    fn test_seeding_on_top_of_attractor() {
        let mut builder = OrreryBuilder::new(central(50.0));
        let id = builder
            .add_circular_orbit(info("Squashed"), 1.0, 1.0, AttractorRef::Central, Vector3::zeros())
            .unwrap();
        let body = builder.get_body(id);
        assert_relative_eq!(body.velocity(), Vector3::zeros());
        assert!(body.velocity().iter().all(|v| v.is_finite()));
    }
}
