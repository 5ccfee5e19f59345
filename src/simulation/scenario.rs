//! Build fully-initialized simulation scenarios from configuration
//!
//! Takes a `ScenarioConfig` (YAML-facing) and produces the runtime
//! `System`:
//! - the primary at the origin,
//! - major bodies at their configured orbit radius along +x with a
//!   tangential circular-orbit velocity around the primary,
//! - satellites placed the same way relative to their parent
//!
//! Also home to user-body creation: a request of raw UI field text plus
//! the drag geometry, validated and turned into a `Body`, or silently
//! rejected.

use crate::configuration::config::{BodyKindConfig, ScaleConfig, ScenarioConfig, SatelliteConfig};
use crate::simulation::params::{self, Parameters};
use crate::simulation::states::{Body, BodyId, BodyKind, NVec2, Satellite, ScaleTier, System};

/// Runtime bundle built from a [`ScenarioConfig`]: the initial system plus
/// the satellite configs kept around for regeneration after a
/// speed-threshold removal.
pub struct Scenario {
    pub system: System,
    pub parameters: Parameters,
    pub satellite_configs: Vec<SatelliteConfig>,
}

impl Scenario {
    pub fn build_scenario(cfg: ScenarioConfig) -> Self {
        let parameters = Parameters::default();
        let mut system = System::default();

        // Bodies: primary at the origin, majors on circular orbits. A body
        // whose configured mass fails validation is skipped.
        for bc in &cfg.bodies {
            let kind = match bc.kind {
                BodyKindConfig::Primary => BodyKind::Primary,
                BodyKindConfig::Major => BodyKind::Major,
            };
            let scale = match bc.scale {
                ScaleConfig::Standard => ScaleTier::Standard,
                ScaleConfig::Compressed => ScaleTier::Compressed,
            };

            let (position, velocity) = match kind {
                BodyKind::Primary => (NVec2::zeros(), NVec2::zeros()),
                _ => {
                    let r = bc.orbit_radius_au * params::AU;
                    let position = NVec2::new(r, 0.0);
                    let velocity = match system.primary() {
                        Some((_, primary)) => {
                            circular_orbit_velocity(parameters.g, primary.mass, position - primary.sim_pos)
                        }
                        None => NVec2::zeros(),
                    };
                    (position, velocity)
                }
            };

            if let Some(body) = Body::new(
                bc.name.clone(),
                kind,
                bc.mass,
                position,
                velocity,
                bc.size,
                scale,
            ) {
                system.push_body(body);
            } else {
                log::warn!("skipping body {:?}: non-positive mass", bc.name);
            }
        }

        spawn_satellites(&mut system, &cfg.satellites);

        Self {
            system,
            parameters,
            satellite_configs: cfg.satellites,
        }
    }
}

/// Tangential velocity for a circular orbit at offset `rel` from a central
/// mass: magnitude sqrt(G M / r), rotated 90 degrees from the radial unit
pub fn circular_orbit_velocity(g: f64, central_mass: f64, rel: NVec2) -> NVec2 {
    let r = rel.norm();
    if r == 0.0 {
        return NVec2::zeros();
    }
    let speed = (g * central_mass / r).sqrt();
    let radial_unit = rel / r;
    let tangential_unit = NVec2::new(-radial_unit.y, radial_unit.x);
    speed * tangential_unit
}

/// Populate `system.satellites` from configuration, each on a fresh
/// circular orbit around its parent. Configs naming an unknown parent or
/// carrying an invalid mass are skipped.
pub fn spawn_satellites(system: &mut System, configs: &[SatelliteConfig]) {
    for sc in configs {
        let Some((parent_id, parent)) = find_parent(system, &sc.parent) else {
            log::warn!("skipping satellite {:?}: unknown parent {:?}", sc.name, sc.parent);
            continue;
        };

        let rel_pos = NVec2::new(sc.orbit_radius_au * params::AU, 0.0);
        let rel_vel = circular_orbit_velocity(params::G, parent.mass, rel_pos);

        if let Some(satellite) =
            Satellite::new(sc.name.clone(), sc.mass, parent_id, parent, rel_pos, rel_vel, sc.size)
        {
            system.push_satellite(satellite);
        } else {
            log::warn!("skipping satellite {:?}: non-positive mass", sc.name);
        }
    }
}

fn find_parent<'a>(system: &'a System, name: &str) -> Option<(BodyId, &'a Body)> {
    system
        .bodies
        .iter()
        .enumerate()
        .find(|(_, b)| b.kind == BodyKind::Major && b.name == name)
        .map(|(i, b)| (BodyId(i), b))
}

/// A user-body creation request, as delivered by the input collaborator:
/// raw text fields plus the launch drag geometry in simulation space.
#[derive(Debug, Clone)]
pub struct UserBodyRequest {
    pub name: String,
    pub mass: String, // kg, parsed; must be > 0
    pub size: String, // display radius in pixels, parsed
    pub speed: String, // launch speed in m/s, parsed
    pub origin: NVec2, // where the body is placed (m)
    pub drag_target: NVec2, // launch direction endpoint (m)
}

/// Validate a request and build the body.
///
/// Returns `None` when any required field is empty or fails to parse, or
/// when the mass is non-positive. A drag target coincident with the origin
/// yields a zero launch direction, so the body starts at rest.
pub fn create_user_body(req: &UserBodyRequest) -> Option<Body> {
    if req.name.trim().is_empty() {
        return None;
    }
    let mass: f64 = req.mass.trim().parse().ok()?;
    let size: f64 = req.size.trim().parse().ok()?;
    let speed: f64 = req.speed.trim().parse().ok()?;

    let drag = req.drag_target - req.origin;
    let direction = if drag.norm() == 0.0 {
        NVec2::zeros()
    } else {
        drag / drag.norm()
    };

    // mass <= 0 is rejected inside Body::new
    Body::new(
        req.name.clone(),
        BodyKind::User,
        mass,
        req.origin,
        direction * speed,
        size,
        ScaleTier::Standard,
    )
}
