//! Configuration types for loading simulation scenarios from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! simulation scenario. A scenario consists of:
//!
//! - [`SimulationConfig`] – runner settings (frames, initial slider/zoom)
//! - [`BodyConfig`]       – the primary and the major bodies
//! - [`SatelliteConfig`]  – moons, each naming its parent major body
//! - [`ScenarioConfig`]   – top-level wrapper used to load from YAML
//!
//! # YAML format
//! An example scenario YAML matching these types:
//!
//! ```yaml
//! simulation:
//!   frames: 600           # frames the headless runner advances
//!   slider_index: 0       # initial speed slider position (-13..=13)
//!   zoom_factor: 1.0      # initial view zoom
//!
//! bodies:
//!   - name: sun
//!     kind: primary
//!     mass: 1.989e30
//!     orbit_radius_au: 0.0
//!     size: 400
//!     scale: standard
//!   - name: earth
//!     kind: major
//!     mass: 5.9722e24
//!     orbit_radius_au: 1.2
//!     size: 150
//!     scale: standard
//!
//! satellites:
//!   - name: moon
//!     mass: 7.346e22
//!     orbit_radius_au: 0.002694
//!     size: 20
//!     parent: earth
//! ```
//!
//! Physical constants, timesteps, batch sizes, and pixel scales are fixed
//! in `simulation::params` and are not part of the configuration surface.

use serde::Deserialize;

/// Which behavioral variant a configured body is
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKindConfig {
    #[serde(rename = "primary")] // the central star; placed at the origin
    Primary,

    #[serde(rename = "major")] // planet-like, started on a circular orbit
    Major,
}

/// Which meters-per-pixel constant maps the body to screen space
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleConfig {
    #[serde(rename = "standard")] // inner-system scale
    Standard,

    #[serde(rename = "compressed")] // outer-system scale
    Compressed,
}

/// Headless-runner settings
#[derive(Deserialize, Debug, Clone)]
pub struct SimulationConfig {
    pub frames: u64, // frames to advance
    pub slider_index: i32, // initial speed slider position
    pub zoom_factor: f64, // initial view zoom
}

/// Configuration for the primary or a major body
#[derive(Deserialize, Debug, Clone)]
pub struct BodyConfig {
    pub name: String, // display name
    pub kind: BodyKindConfig, // primary or major
    pub mass: f64, // mass in kg
    pub orbit_radius_au: f64, // orbit radius around the primary, in AU
    pub size: f64, // display radius in pixels
    pub scale: ScaleConfig, // pixel-scale tier, fixed for the body's lifetime
}

/// Configuration for a satellite of a major body
#[derive(Deserialize, Debug, Clone)]
pub struct SatelliteConfig {
    pub name: String, // display name
    pub mass: f64, // mass in kg
    pub orbit_radius_au: f64, // orbit radius around the parent, in AU
    pub size: f64, // display radius in pixels
    pub parent: String, // name of the owning major body
}

/// Top-level scenario configuration loaded from YAML.
#[derive(Deserialize, Debug, Clone)]
pub struct ScenarioConfig {
    pub simulation: SimulationConfig, // runner settings
    pub bodies: Vec<BodyConfig>, // the primary and the major bodies
    pub satellites: Vec<SatelliteConfig>, // moons bound to major bodies
}
