use nalgebra::Point3;

use super::body::{BodyID, BodyInfo};

/// Read-only view of something that pulls on a body.
///
/// Implementors are always read at the moment of use, so an attractor that
/// moves (or whose mass is tuned) between frames is seen where it is now.
pub trait Attractor {
    fn current_mass(&self) -> f64;
    fn current_position(&self) -> Point3<f64>;
}

/// How a body names its attractor. This is a handle, not the attractor
/// itself; the orrery resolves it each frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttractorRef {
    /// The orrery's central mass, whose mass can be tuned while running.
    Central,
    /// A stationary point with constant mass.
    Fixed(PointMass),
    /// Another body in the same orrery.
    Body(BodyID),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointMass {
    pub position: Point3<f64>,
    pub mass: f64,
}

impl PointMass {
    pub fn new(position: Point3<f64>, mass: f64) -> Self {
        PointMass { position, mass }
    }

    pub fn capture(attractor: &dyn Attractor) -> Self {
        PointMass {
            position: attractor.current_position(),
            mass: attractor.current_mass(),
        }
    }
}

impl Attractor for PointMass {
    fn current_mass(&self) -> f64 {
        self.mass
    }

    fn current_position(&self) -> Point3<f64> {
        self.position
    }
}

/// The luminous mass at the middle of the system. It never moves, and it is
/// not simulated; only its mass changes, and only between frames.
#[derive(Debug, Clone)]
pub struct CentralBody {
    pub info: BodyInfo,
    mass: f64,
    position: Point3<f64>,
}

impl CentralBody {
    pub fn new(info: BodyInfo, mass: f64) -> Self {
        CentralBody {
            info,
            mass,
            position: Point3::origin(),
        }
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn position(&self) -> Point3<f64> {
        self.position
    }

    pub(super) fn set_mass(&mut self, mass: f64) {
        self.mass = mass;
    }
}

impl Attractor for CentralBody {
    fn current_mass(&self) -> f64 {
        self.mass
    }

    fn current_position(&self) -> Point3<f64> {
        self.position
    }
}
