pub mod error;
pub mod orrery;
pub mod trail;

pub use error::ConfigError;
pub use orrery::{Body, BodyID, Orrery, OrreryBuilder};
pub use trail::{TrailBuffer, TrailRender, TrailSample};
