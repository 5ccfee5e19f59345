//! Physical constants and numerical parameters for the simulation
//!
//! `Parameters` holds the runtime settings consumed by the scheduler and
//! integrator:
//! - gravitational constant `g`,
//! - per-tier fixed timesteps (major bodies vs. satellites),
//! - batch size per dispatched task and satellite sub-step multiplier,
//! - satellite removal threshold on the simulation speed
//!
//! All values are fixed; the struct exists so the hot path passes one
//! bundle around instead of reaching for the constants individually.

/// Gravitational constant (SI: m^3 kg^-1 s^-2)
pub const G: f64 = 6.67428e-11;

/// One astronomical unit in meters
pub const AU: f64 = 1.496e11;

/// Fixed physics timestep for the primary/major/user tier: one simulated
/// day per integration step (seconds)
pub const TIMESTEP_MAJOR: f64 = 3600.0 * 24.0;

/// Fixed physics timestep for the satellite tier. Satellites orbit much
/// faster than their parents and need the finer step for stability
pub const TIMESTEP_SATELLITE: f64 = TIMESTEP_MAJOR / 20.0;

/// Display frame interval the dispatch loop is paced against (seconds)
pub const FRAME_DT: f64 = 1.0 / 60.0;

/// Integration steps folded into one dispatched task
pub const BATCH_STEPS: u32 = 5;

/// Satellite tasks multiply the batch size by this inner-loop factor,
/// matching their finer timestep
pub const SATELLITE_SUBSTEPS: u32 = 20;

/// Above this simulation speed all satellites are removed from the live
/// set until the speed drops back under it
pub const SATELLITE_SPEED_THRESHOLD: f64 = 5.0;

/// Pixels per AU for standard-scale bodies (inner system)
pub const SCALE_STANDARD: f64 = 2000.0;

/// Pixels per AU for compressed-scale bodies (outer system)
pub const SCALE_COMPRESSED: f64 = 1000.0;

/// Pixels per AU for satellites
pub const SCALE_SATELLITE: f64 = 90000.0;

/// Meters of simulation space per screen pixel, standard tier
pub const METER_PER_PIXEL_STANDARD: f64 = AU / SCALE_STANDARD;

/// Meters of simulation space per screen pixel, compressed tier
pub const METER_PER_PIXEL_COMPRESSED: f64 = AU / SCALE_COMPRESSED;

/// Meters of simulation space per screen pixel, satellite tier
pub const METER_PER_PIXEL_SATELLITE: f64 = AU / SCALE_SATELLITE;

#[derive(Debug, Clone)]
pub struct Parameters {
    pub g: f64, // gravitational constant
    pub timestep_major: f64, // fixed step for the major tier
    pub timestep_satellite: f64, // fixed step for the satellite tier
    pub batch_steps: u32, // steps per dispatched task
    pub satellite_substeps: u32, // inner-loop factor for satellite tasks
    pub satellite_speed_threshold: f64, // remove satellites above this speed
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            g: G,
            timestep_major: TIMESTEP_MAJOR,
            timestep_satellite: TIMESTEP_SATELLITE,
            batch_steps: BATCH_STEPS,
            satellite_substeps: SATELLITE_SUBSTEPS,
            satellite_speed_threshold: SATELLITE_SPEED_THRESHOLD,
        }
    }
}
