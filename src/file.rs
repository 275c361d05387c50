use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::Context;
use log::info;
use nalgebra::{Point3, Vector3};
use serde::Deserialize;

use crate::consts::{AU_SCALE, DEFAULT_CENTRAL_MASS, DEFAULT_G, DEFAULT_TRAIL_SECONDS};
use crate::math::graph::parents_first;
use crate::model::error::ConfigError;
use crate::model::orrery::{AttractorRef, BodyID, BodyInfo, CentralBody, Orrery, OrreryBuilder};

fn default_g() -> f64 {
    DEFAULT_G
}

fn default_au_scale() -> f64 {
    AU_SCALE
}

fn default_trail_seconds() -> f64 {
    DEFAULT_TRAIL_SECONDS
}

/// A body table, as read from YAML.
///
/// ```yaml
/// gravitational_constant: 1.0
/// au_scale: 20.0
/// trail_seconds: 5.0
/// central: { name: Sun, color: "ffff00", size: 5.0, mass: 3161.4 }
/// bodies:
///   - { name: Earth, color: "2233ff", mass: 5.97, size: 1.0, rotation_period: 1.0, distance_au: 1.0 }
///   - { name: Moon, color: "888888", mass: 0.073, size: 0.27, rotation_period: 27.0, around: Earth, distance: 3.0 }
/// ```
///
/// Bodies without `around` orbit the central mass. Bodies may be listed in
/// any order; each is placed on a circular orbit along +x from its attractor.
#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioConfig {
    #[serde(default = "default_g")]
    pub gravitational_constant: f64,
    #[serde(default = "default_au_scale")]
    pub au_scale: f64,
    #[serde(default = "default_trail_seconds")]
    pub trail_seconds: f64,
    pub central: CentralConfig,
    pub bodies: Vec<BodyConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CentralConfig {
    pub name: String,
    pub color: String,
    pub size: f32,
    pub mass: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BodyConfig {
    pub name: String,
    pub color: String,
    pub mass: f64,
    pub size: f32,
    pub rotation_period: f64,
    pub around: Option<String>,
    // Exactly one of these is used; `distance` wins if both are given
    pub distance: Option<f64>,
    pub distance_au: Option<f64>,
}

pub fn read_file<P: AsRef<Path>>(path: P) -> anyhow::Result<ScenarioConfig> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read scenario {}", path.display()))?;
    let config: ScenarioConfig = serde_yaml::from_str(&text)
        .with_context(|| format!("failed to parse scenario {}", path.display()))?;
    info!(
        "Loaded {} bodies from {}",
        config.bodies.len(),
        path.display()
    );
    Ok(config)
}

impl ScenarioConfig {
    /// The solar system, squashed so that Earth goes around in about ten
    /// seconds. Distances are real (in AU), masses and sizes only roughly so.
    pub fn solar_system() -> Self {
        #[rustfmt::skip]
        let planets = [
            // name, distance (AU), color, size, mass, rotation period
            ("Mercury", 0.387,  "aaaaaa", 0.38, 0.33,   10.0),
            ("Venus",   0.723,  "ffcc66", 0.95, 4.87,   10.0),
            ("Earth",   1.0,    "2233ff", 1.0,  5.97,   1.0),
            ("Mars",    1.524,  "ff3300", 0.53, 0.642,  1.03),
            ("Jupiter", 5.203,  "ff9966", 2.0,  1898.0, 0.41),
            ("Saturn",  9.537,  "ffcc99", 1.8,  568.0,  0.45),
            ("Uranus",  19.191, "66ccff", 1.5,  86.8,   0.72),
            ("Neptune", 30.07,  "3333ff", 1.5,  102.0,  0.67),
            ("Pluto",   39.48,  "aaaaaa", 0.3,  0.0146, 10.0),
        ];

        let mut bodies: Vec<_> = planets
            .iter()
            .map(|&(name, au, color, size, mass, rotation_period)| BodyConfig {
                name: name.to_owned(),
                color: color.to_owned(),
                mass,
                size,
                rotation_period,
                around: None,
                distance: None,
                distance_au: Some(au),
            })
            .collect();

        // Much further out than the real moon, so it's visible at all
        bodies.push(BodyConfig {
            name: "Moon".to_owned(),
            color: "888888".to_owned(),
            mass: 0.073,
            size: 0.27,
            rotation_period: 27.0,
            around: Some("Earth".to_owned()),
            distance: Some(3.0),
            distance_au: None,
        });

        ScenarioConfig {
            gravitational_constant: DEFAULT_G,
            au_scale: AU_SCALE,
            trail_seconds: DEFAULT_TRAIL_SECONDS,
            central: CentralConfig {
                name: "Sun".to_owned(),
                color: "ffff00".to_owned(),
                size: 5.0,
                mass: DEFAULT_CENTRAL_MASS,
            },
            bodies,
        }
    }

    pub fn build(&self) -> Result<Orrery, ConfigError> {
        if !(self.au_scale.is_finite() && self.au_scale > 0.0) {
            return Err(ConfigError::InvalidScale {
                au_scale: self.au_scale,
            });
        }

        let mut name_to_idx = HashMap::new();
        for (i, body) in self.bodies.iter().enumerate() {
            if body.name == self.central.name || name_to_idx.insert(body.name.as_str(), i).is_some() {
                return Err(ConfigError::DuplicateName {
                    name: body.name.clone(),
                });
            }
        }

        // Resolve parents up front; None means the central mass
        let mut parents = Vec::with_capacity(self.bodies.len());
        for body in self.bodies.iter() {
            let parent = match &body.around {
                None => None,
                Some(name) if *name == self.central.name => None,
                Some(name) => match name_to_idx.get(name.as_str()) {
                    Some(&idx) => Some(idx),
                    None => {
                        return Err(ConfigError::UnknownAttractor {
                            name: body.name.clone(),
                            attractor: name.clone(),
                        })
                    }
                },
            };
            parents.push(parent);
        }

        // Seeding a satellite needs its attractor's state, so add parents first
        let order = parents_first(self.bodies.len(), |i| parents[i]).map_err(|i| {
            ConfigError::CyclicAttractor {
                name: self.bodies[i].name.clone(),
            }
        })?;

        let central = CentralBody::new(
            BodyInfo {
                name: self.central.name.clone(),
                size: self.central.size,
                color: parse_color(&self.central.name, &self.central.color)?,
            },
            self.central.mass,
        );
        let mut builder = OrreryBuilder::new(central);
        builder.set_gravitational_constant(self.gravitational_constant);
        builder.set_trail_window(self.trail_seconds);

        let mut ids: Vec<Option<BodyID>> = vec![None; self.bodies.len()];
        for i in order {
            let body = &self.bodies[i];
            let radius = match (body.distance, body.distance_au) {
                (Some(d), _) => d,
                (None, Some(au)) => au * self.au_scale,
                (None, None) => {
                    return Err(ConfigError::MissingDistance {
                        name: body.name.clone(),
                    })
                }
            };
            let attractor = match parents[i] {
                None => AttractorRef::Central,
                Some(p) => AttractorRef::Body(ids[p].expect("parent added before child")),
            };
            let info = BodyInfo {
                name: body.name.clone(),
                size: body.size,
                color: parse_color(&body.name, &body.color)?,
            };

            let id = builder.add_circular_orbit(
                info,
                body.mass,
                body.rotation_period,
                attractor,
                Vector3::x() * radius,
            )?;
            ids[i] = Some(id);
        }

        builder.build()
    }
}

fn parse_color(name: &str, s: &str) -> Result<Point3<f32>, ConfigError> {
    let err = || ConfigError::InvalidColor {
        name: name.to_owned(),
        color: s.to_owned(),
    };

    let hex = s.trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return Err(err());
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).map_err(|_| err());
    let r = channel(0..2)?;
    let g = channel(2..4)?;
    let b = channel(4..6)?;

    Ok(Point3::new(
        r as f32 / 255.0,
        g as f32 / 255.0,
        b as f32 / 255.0,
    ))
}
