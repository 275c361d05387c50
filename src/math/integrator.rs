use nalgebra::{Point3, Vector3};

use std::f64::consts::PI;

use crate::consts::MIN_SEPARATION;

#[derive(Debug, Clone, PartialEq)]
pub struct KinematicState {
    pub position: Point3<f64>,
    pub velocity: Vector3<f64>,
}

impl KinematicState {
    pub fn new(position: Point3<f64>, velocity: Vector3<f64>) -> Self {
        KinematicState { position, velocity }
    }
}

/// Inverse-square pull toward `attractor_position`.
///
/// Returns `None` when the two points are within `MIN_SEPARATION`; the
/// direction is meaningless there and the magnitude blows up, so the caller
/// should just coast for that frame.
pub fn gravity_acceleration(
    position: &Point3<f64>,
    attractor_position: &Point3<f64>,
    attractor_mass: f64,
    g: f64,
) -> Option<Vector3<f64>> {
    let displacement = attractor_position - position;
    let r = displacement.norm();
    if r <= MIN_SEPARATION {
        return None;
    }

    // a = G M / r^2 in the direction of d / r
    let magnitude = g * attractor_mass / (r * r);
    Some(displacement * (magnitude / r))
}

/// Advances the state by `dt` with semi-implicit (symplectic) Euler.
/// The velocity is kicked first, and the position drifts with the new velocity.
pub fn symplectic_euler(state: &mut KinematicState, acceleration: Option<Vector3<f64>>, dt: f64) {
    if let Some(a) = acceleration {
        state.velocity += a * dt;
    }
    state.position += state.velocity * dt;
}

/// Advances a spin angle, keeping it within [0, 2pi).
pub fn advance_phase(phase: f64, rotation_period: f64, dt: f64) -> f64 {
    (phase + 2.0 * PI / rotation_period * dt).rem_euclid(2.0 * PI)
}
