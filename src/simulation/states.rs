//! Core state types for the hierarchical N-body simulation.
//!
//! Defines the simulated entities and the container that owns them:
//! - `Body`      – primary star, planet-like major bodies, and
//!   user-injected bodies, all tracked in absolute simulation coordinates
//! - `Satellite` – moon-like bodies tracked relative to a parent `Body`,
//!   with the absolute state always reconstructed from the relative state
//! - `System`    – the body lists plus accumulated simulated time `t`
//!
//! Only the coordinating thread mutates a `System`; worker tasks operate
//! on value snapshots captured at dispatch time.

use nalgebra::Vector2;

use crate::simulation::params;

pub type NVec2 = Vector2<f64>;

/// Behavioral variant of an absolute-frame body. Used only for the
/// attraction-policy branch when snapshotting attractors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Primary, // the central star; anchor of the system
    Major, // planet-like, orbits the primary
    User, // injected at runtime
}

/// Screen-mapping tier, fixed per body at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleTier {
    Standard, // inner-system pixel scale
    Compressed, // outer-system pixel scale
}

impl ScaleTier {
    /// Meters of simulation space represented by one screen pixel
    pub fn meters_per_pixel(self) -> f64 {
        match self {
            ScaleTier::Standard => params::METER_PER_PIXEL_STANDARD,
            ScaleTier::Compressed => params::METER_PER_PIXEL_COMPRESSED,
        }
    }
}

/// Index of a `Body` in `System::bodies`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyId(pub usize);

/// Index of a `Satellite` in `System::satellites`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SatelliteId(pub usize);

/// An absolute-frame body: the primary, a major body, or a user body.
#[derive(Debug, Clone)]
pub struct Body {
    pub name: String,
    pub kind: BodyKind,
    pub mass: f64, // kg, strictly positive
    pub sim_pos: NVec2, // absolute position (m)
    pub velocity: NVec2, // absolute velocity (m/s)
    pub size: f64, // display radius in pixels
    pub scale: ScaleTier, // pixel scale, fixed for the body's lifetime
    pub update_seq: u64, // staleness token, bumped once per dispatch
}

impl Body {
    /// Create a body at an absolute position. Rejects non-positive mass.
    pub fn new(
        name: impl Into<String>,
        kind: BodyKind,
        mass: f64,
        sim_pos: NVec2,
        velocity: NVec2,
        size: f64,
        scale: ScaleTier,
    ) -> Option<Self> {
        if mass <= 0.0 {
            return None;
        }
        Some(Self {
            name: name.into(),
            kind,
            mass,
            sim_pos,
            velocity,
            size,
            scale,
            update_seq: 0,
        })
    }

    pub fn current_position(&self) -> NVec2 {
        self.sim_pos
    }

    pub fn current_velocity(&self) -> NVec2 {
        self.velocity
    }

    /// Screen-space position for the render collaborator
    pub fn screen_position(&self) -> NVec2 {
        self.sim_pos / self.scale.meters_per_pixel()
    }
}

/// A moon-like body bound to a parent major body.
///
/// The relative state is the authority: the absolute `sim_pos`/`velocity`
/// are recomputed as parent state + relative state after every update and
/// are never integrated independently.
#[derive(Debug, Clone)]
pub struct Satellite {
    pub name: String,
    pub mass: f64, // kg, strictly positive
    pub parent: BodyId, // owning major body; its slot outlives this satellite
    pub rel_pos: NVec2, // position relative to the parent (m)
    pub rel_vel: NVec2, // velocity relative to the parent (m/s)
    pub sim_pos: NVec2, // absolute position, derived
    pub velocity: NVec2, // absolute velocity, derived
    pub size: f64, // display radius in pixels
    pub update_seq: u64, // staleness token, bumped once per dispatch
}

impl Satellite {
    /// Create a satellite from relative state. Rejects non-positive mass.
    pub fn new(
        name: impl Into<String>,
        mass: f64,
        parent: BodyId,
        parent_body: &Body,
        rel_pos: NVec2,
        rel_vel: NVec2,
        size: f64,
    ) -> Option<Self> {
        if mass <= 0.0 {
            return None;
        }
        Some(Self {
            name: name.into(),
            mass,
            parent,
            rel_pos,
            rel_vel,
            sim_pos: parent_body.sim_pos + rel_pos,
            velocity: parent_body.velocity + rel_vel,
            size,
            update_seq: 0,
        })
    }

    pub fn current_position(&self) -> NVec2 {
        self.sim_pos
    }

    pub fn current_velocity(&self) -> NVec2 {
        self.velocity
    }

    /// Screen-space position for the render collaborator
    pub fn screen_position(&self) -> NVec2 {
        self.sim_pos / params::METER_PER_PIXEL_SATELLITE
    }

    /// Recompute the absolute state from the parent's current state plus
    /// this satellite's relative state
    pub fn sync_absolute(&mut self, parent: &Body) {
        self.sim_pos = parent.sim_pos + self.rel_pos;
        self.velocity = parent.velocity + self.rel_vel;
    }
}

/// The full simulated system: the primary first in `bodies`, then major
/// bodies, then user bodies appended at the tail.
#[derive(Debug, Clone, Default)]
pub struct System {
    pub bodies: Vec<Body>, // primary, majors, then user bodies
    pub satellites: Vec<Satellite>, // may be bulk-removed and regenerated
    pub t: f64, // accumulated simulated seconds
}

impl System {
    /// The primary body, if the system has one
    pub fn primary(&self) -> Option<(BodyId, &Body)> {
        self.bodies
            .iter()
            .enumerate()
            .find(|(_, b)| b.kind == BodyKind::Primary)
            .map(|(i, b)| (BodyId(i), b))
    }

    /// Append a body, returning its id
    pub fn push_body(&mut self, body: Body) -> BodyId {
        self.bodies.push(body);
        BodyId(self.bodies.len() - 1)
    }

    /// Append a satellite, returning its id
    pub fn push_satellite(&mut self, satellite: Satellite) -> SatelliteId {
        self.satellites.push(satellite);
        SatelliteId(self.satellites.len() - 1)
    }

    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.get(id.0)
    }

    pub fn satellite(&self, id: SatelliteId) -> Option<&Satellite> {
        self.satellites.get(id.0)
    }

    /// Number of user-injected bodies currently live
    pub fn user_body_count(&self) -> usize {
        self.bodies.iter().filter(|b| b.kind == BodyKind::User).count()
    }

    /// Drop every user-injected body. User bodies live at the tail of the
    /// list, so ids of the primary and major bodies stay stable.
    pub fn clear_user_bodies(&mut self) {
        self.bodies.retain(|b| b.kind != BodyKind::User);
    }
}
