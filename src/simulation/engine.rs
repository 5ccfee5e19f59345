//! High-level runtime engine
//!
//! The `Engine` is the coordinating side of the update protocol. It owns
//! the `System`, the `SimulationClock`, and the `BatchScheduler`, and it is
//! the only place the body lists are mutated:
//! - `begin_frame` refreshes the speed, runs the satellite threshold
//!   guard, and dispatches one batch task per body,
//! - `poll_updates` / `settle` drain delivered results into the system,
//! - user bodies are created and cleared here, at frame boundaries

use crate::configuration::config::SatelliteConfig;
use crate::simulation::clock::SimulationClock;
use crate::simulation::params::Parameters;
use crate::simulation::scenario::{self, Scenario, UserBodyRequest};
use crate::simulation::scheduler::{BatchScheduler, TransformEvent};
use crate::simulation::states::{BodyId, System};

pub struct Engine {
    pub system: System,
    pub clock: SimulationClock,
    scheduler: BatchScheduler,
    params: Parameters,
    satellite_configs: Vec<SatelliteConfig>, // used to regenerate after removal
    satellites_active: bool,
    saved_satellite_seqs: Vec<u64>, // sequence counters preserved across removal
}

impl Engine {
    pub fn new(scenario: Scenario, clock: SimulationClock) -> Self {
        Self {
            system: scenario.system,
            clock,
            scheduler: BatchScheduler::new(),
            params: scenario.parameters,
            satellite_configs: scenario.satellite_configs,
            satellites_active: true,
            saved_satellite_seqs: Vec::new(),
        }
    }

    pub fn params(&self) -> &Parameters {
        &self.params
    }

    /// Run one frame of the protocol: refresh the simulation speed, apply
    /// the satellite performance guard, then dispatch one batch task per
    /// live body. Never blocks on the dispatched work.
    pub fn begin_frame(&mut self) {
        let speed = self.clock.simulation_speed();

        if speed > self.params.satellite_speed_threshold {
            if self.satellites_active {
                self.remove_satellites();
            }
        } else if !self.satellites_active {
            self.regenerate_satellites();
        }

        self.scheduler.dispatch(&mut self.system, &self.params, speed);

        let dt_sim = f64::from(self.params.batch_steps) * self.params.timestep_major * speed;
        self.clock.advance(dt_sim);
        self.system.t = self.clock.elapsed();
    }

    /// Apply every result that has already been delivered, non-blocking
    pub fn poll_updates(&mut self) -> Vec<TransformEvent> {
        self.scheduler.poll_updates(&mut self.system)
    }

    /// Block until every in-flight batch has been delivered and applied
    pub fn settle(&mut self) -> Vec<TransformEvent> {
        self.scheduler.settle(&mut self.system)
    }

    /// Validate a user-body request and add the body to the live set.
    /// Returns `None` (and changes nothing) when validation rejects it.
    pub fn create_user_body(&mut self, req: &UserBodyRequest) -> Option<BodyId> {
        let body = scenario::create_user_body(req)?;
        log::info!("user body {:?} created", body.name);
        Some(self.system.push_body(body))
    }

    /// Bulk-remove every user body (creation mode toggled off)
    pub fn clear_user_bodies(&mut self) {
        let n = self.system.user_body_count();
        if n > 0 {
            log::info!("clearing {n} user bodies");
        }
        self.system.clear_user_bodies();
    }

    /// Drop all satellites, keeping their sequence counters so in-flight
    /// results from before the removal can never match a regenerated
    /// satellite in the same slot.
    fn remove_satellites(&mut self) {
        self.saved_satellite_seqs = self
            .system
            .satellites
            .iter()
            .map(|s| s.update_seq)
            .collect();
        log::info!(
            "simulation speed above {}, removing {} satellites",
            self.params.satellite_speed_threshold,
            self.system.satellites.len()
        );
        self.system.satellites.clear();
        self.satellites_active = false;
    }

    /// Rebuild satellites from their configs with fresh orbital elements.
    /// True orbital phase from before the removal is discarded.
    fn regenerate_satellites(&mut self) {
        scenario::spawn_satellites(&mut self.system, &self.satellite_configs);
        for (satellite, seq) in self
            .system
            .satellites
            .iter_mut()
            .zip(self.saved_satellite_seqs.iter())
        {
            satellite.update_seq = *seq;
        }
        log::info!("regenerated {} satellites", self.system.satellites.len());
        self.satellites_active = true;
    }
}
