use std::f64::consts::PI;

// Simulation units are arbitrary; G is 1 and one AU is 20 units.
pub const DEFAULT_G: f64 = 1.0;
pub const AU_SCALE: f64 = 20.0;

// Chosen so that a body at 1 AU goes around in roughly ten seconds
pub const DEFAULT_CENTRAL_MASS: f64 = 3161.4;
pub const CENTRAL_MASS_RANGE: (f64, f64) = (1000.0, 5000.0);

pub const DEFAULT_TRAIL_SECONDS: f64 = 5.0;

// Below this separation, a body feels no pull for the frame
pub const MIN_SEPARATION: f64 = 0.001;

pub const SPEED_RANGE: (f64, f64) = (0.0, 5.0);
pub const SIZE_MULTIPLIER_RANGE: (f64, f64) = (1.0, 5.0);

pub fn get_circular_velocity(radius: f64, mu: f64) -> f64 {
    (mu / radius).sqrt()
}

pub fn get_period(a: f64, mu: f64) -> f64 {
    (4.0 * PI * PI * a.powi(3) / mu).sqrt()
}
