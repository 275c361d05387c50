use std::error::Error;
use std::fmt;

/// Problems with a body table, found while setting up the orrery.
/// None of these can happen once the simulation is running.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    InvalidMass { name: String, mass: f64 },
    InvalidRotationPeriod { name: String, period: f64 },
    InvalidTrailWindow { name: String, window: f64 },
    UnknownAttractor { name: String, attractor: String },
    CyclicAttractor { name: String },
    DuplicateName { name: String },
    MissingDistance { name: String },
    InvalidColor { name: String, color: String },
    InvalidGravitationalConstant { g: f64 },
    InvalidScale { au_scale: f64 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidMass { name, mass } => {
                write!(f, "{}: mass must be positive and finite, got {}", name, mass)
            }
            ConfigError::InvalidRotationPeriod { name, period } => write!(
                f,
                "{}: rotation period must be positive and finite, got {}",
                name, period
            ),
            ConfigError::InvalidTrailWindow { name, window } => write!(
                f,
                "{}: trail window must be positive and finite, got {}",
                name, window
            ),
            ConfigError::UnknownAttractor { name, attractor } => {
                write!(f, "{}: attractor {} does not exist", name, attractor)
            }
            ConfigError::CyclicAttractor { name } => {
                write!(f, "{}: attractor chain loops back on itself", name)
            }
            ConfigError::DuplicateName { name } => write!(f, "{}: name used twice", name),
            ConfigError::MissingDistance { name } => {
                write!(f, "{}: orbit needs either `distance` or `distance_au`", name)
            }
            ConfigError::InvalidColor { name, color } => {
                write!(f, "{}: can't parse color {:?}, expected RRGGBB", name, color)
            }
            ConfigError::InvalidGravitationalConstant { g } => write!(
                f,
                "gravitational constant must be finite and non-negative, got {}",
                g
            ),
            ConfigError::InvalidScale { au_scale } => {
                write!(f, "AU scale must be positive and finite, got {}", au_scale)
            }
        }
    }
}

impl Error for ConfigError {}
