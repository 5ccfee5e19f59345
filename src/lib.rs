pub mod simulation;
pub mod configuration;

pub use simulation::states::{Body, BodyId, BodyKind, NVec2, Satellite, SatelliteId, ScaleTier, System};
pub use simulation::forces::{Attractor, NewtonianGravity};
pub use simulation::integrator::{integrate_batch, integrate_satellite_batch, semi_implicit_step};
pub use simulation::clock::{SimulationClock, SPEED_MULTIPLIERS};
pub use simulation::scheduler::{apply_result, BatchScheduler, StepResult, TransformEvent, UpdateTarget};
pub use simulation::scenario::{create_user_body, Scenario, UserBodyRequest};
pub use simulation::engine::Engine;
pub use simulation::params::Parameters;

pub use configuration::config::{BodyConfig, SatelliteConfig, ScenarioConfig, SimulationConfig};
