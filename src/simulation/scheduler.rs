//! Asynchronous batched-update scheduler
//!
//! Dispatches one worker task per body per frame. Each task:
//! - receives an immutable snapshot of the body's state plus every
//!   attractor the policy says it feels,
//! - runs a fixed batch of integration steps against that snapshot,
//! - reports the final state through an mpsc channel, tagged with the
//!   `update_seq` captured at dispatch time
//!
//! The coordinating thread drains the channel and applies a result only if
//! its sequence number still matches the body's current counter. A newer
//! dispatch bumps the counter, so delayed or out-of-order completions are
//! dropped without locking any body state. Tasks are never cancelled;
//! stale results are cheap to discard.

use std::sync::mpsc::{channel, Receiver, Sender};

use crate::simulation::forces::{Attractor, NewtonianGravity};
use crate::simulation::integrator::{integrate_batch, integrate_satellite_batch};
use crate::simulation::params::Parameters;
use crate::simulation::states::{Body, BodyId, BodyKind, NVec2, SatelliteId, System};

/// Completed batch result delivered back to the coordinating thread
#[derive(Debug, Clone)]
pub enum StepResult {
    Body {
        id: BodyId,
        seq: u64, // update_seq captured at dispatch
        position: NVec2,
        velocity: NVec2,
    },
    Satellite {
        id: SatelliteId,
        seq: u64, // update_seq captured at dispatch
        rel_pos: NVec2,
        rel_vel: NVec2,
    },
}

/// Which entity an applied result belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpdateTarget {
    Body(BodyId),
    Satellite(SatelliteId),
}

/// Transform-changed notification for the render collaborator
#[derive(Debug, Clone)]
pub struct TransformEvent {
    pub target: UpdateTarget,
    pub position: NVec2, // absolute simulation position (m)
    pub velocity: NVec2, // absolute velocity (m/s)
    pub screen_position: NVec2, // position / meters-per-pixel for the tier
}

/// Per-frame dispatcher plus the result inbox.
pub struct BatchScheduler {
    tx: Sender<StepResult>,
    rx: Receiver<StepResult>,
    in_flight: usize, // dispatched tasks not yet drained
}

impl BatchScheduler {
    pub fn new() -> Self {
        let (tx, rx) = channel();
        Self {
            tx,
            rx,
            in_flight: 0,
        }
    }

    /// Number of dispatched tasks whose results have not been drained yet
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Dispatch one batch task per live body.
    ///
    /// Bumps each body's `update_seq`, captures its snapshot and policy
    /// attractors, and hands the batch to the worker pool. Mutation of the
    /// body lists is the caller's business and must stay on this thread.
    pub fn dispatch(&mut self, system: &mut System, params: &Parameters, speed: f64) {
        let dt = params.timestep_major * speed;
        let dt_sat = params.timestep_satellite * speed;

        for i in 0..system.bodies.len() {
            let attractors = policy_attractors(system, i);
            let body = &mut system.bodies[i];
            body.update_seq += 1;

            let task = BodyTask {
                id: BodyId(i),
                seq: body.update_seq,
                mass: body.mass,
                position: body.sim_pos,
                velocity: body.velocity,
                attractors,
                steps: params.batch_steps,
                dt,
                g: params.g,
            };
            let tx = self.tx.clone();
            self.in_flight += 1;
            rayon::spawn(move || {
                // channel gone means the scheduler was dropped; nothing to
                // deliver to
                let _ = tx.send(task.run());
            });
        }

        for i in 0..system.satellites.len() {
            let parent_mass = match system.body(system.satellites[i].parent) {
                Some(parent) => parent.mass,
                None => continue,
            };
            let satellite = &mut system.satellites[i];
            satellite.update_seq += 1;

            let task = SatelliteTask {
                id: SatelliteId(i),
                seq: satellite.update_seq,
                mass: satellite.mass,
                parent_mass,
                rel_pos: satellite.rel_pos,
                rel_vel: satellite.rel_vel,
                steps: params.batch_steps * params.satellite_substeps,
                dt: dt_sat,
                g: params.g,
            };
            let tx = self.tx.clone();
            self.in_flight += 1;
            rayon::spawn(move || {
                let _ = tx.send(task.run());
            });
        }
    }

    /// Drain every result that has already arrived, without blocking.
    /// Returns the transform events for results that passed the sequence
    /// check and were applied.
    pub fn poll_updates(&mut self, system: &mut System) -> Vec<TransformEvent> {
        let mut applied = Vec::new();
        while let Ok(result) = self.rx.try_recv() {
            self.in_flight = self.in_flight.saturating_sub(1);
            if let Some(target) = apply_result(system, result) {
                applied.push(target);
            }
        }
        finish_drain(system, applied)
    }

    /// Block until every in-flight task has delivered, applying results as
    /// they arrive. Used by the headless runner and tests; the render loop
    /// uses `poll_updates` instead.
    pub fn settle(&mut self, system: &mut System) -> Vec<TransformEvent> {
        let mut applied = Vec::new();
        while self.in_flight > 0 {
            match self.rx.recv() {
                Ok(result) => {
                    self.in_flight -= 1;
                    if let Some(target) = apply_result(system, result) {
                        applied.push(target);
                    }
                }
                // all senders gone; nothing further can arrive
                Err(_) => break,
            }
        }
        finish_drain(system, applied)
    }
}

/// Close out a drain: re-derive every satellite's absolute state from its
/// parent's now-final state (results arrive in no particular order, so a
/// satellite may have applied before its parent), then build the transform
/// events from the settled state.
fn finish_drain(system: &mut System, applied: Vec<UpdateTarget>) -> Vec<TransformEvent> {
    if applied.is_empty() {
        return Vec::new();
    }

    for i in 0..system.satellites.len() {
        let Some(parent) = system.body(system.satellites[i].parent).cloned() else {
            continue;
        };
        system.satellites[i].sync_absolute(&parent);
    }

    applied
        .into_iter()
        .filter_map(|target| transform_event(system, target))
        .collect()
}

fn transform_event(system: &System, target: UpdateTarget) -> Option<TransformEvent> {
    match target {
        UpdateTarget::Body(id) => {
            let body = system.body(id)?;
            Some(TransformEvent {
                target,
                position: body.sim_pos,
                velocity: body.velocity,
                screen_position: body.screen_position(),
            })
        }
        UpdateTarget::Satellite(id) => {
            let satellite = system.satellite(id)?;
            Some(TransformEvent {
                target,
                position: satellite.sim_pos,
                velocity: satellite.velocity,
                screen_position: satellite.screen_position(),
            })
        }
    }
}

impl Default for BatchScheduler {
    fn default() -> Self {
        Self::new()
    }
}

/// Apply a delivered result to the live system.
///
/// The sequence check is the only consistency mechanism: a result whose
/// captured `seq` no longer equals the body's current `update_seq` is
/// dropped, as is a result whose slot no longer exists (satellites can be
/// bulk-removed, user bodies bulk-cleared, while results are in flight).
/// Satellites apply relative state first, then recompute absolute state
/// from the parent's live state.
pub fn apply_result(system: &mut System, result: StepResult) -> Option<UpdateTarget> {
    match result {
        StepResult::Body {
            id,
            seq,
            position,
            velocity,
        } => {
            let body = system.bodies.get_mut(id.0)?;
            if seq != body.update_seq {
                log::trace!("dropping stale result for {} (seq {seq})", body.name);
                return None;
            }
            body.sim_pos = position;
            body.velocity = velocity;
            Some(UpdateTarget::Body(id))
        }
        StepResult::Satellite {
            id,
            seq,
            rel_pos,
            rel_vel,
        } => {
            let parent_id = system.satellite(id)?.parent;
            let parent: Body = system.body(parent_id)?.clone();
            let satellite = system.satellites.get_mut(id.0)?;
            if seq != satellite.update_seq {
                log::trace!("dropping stale result for {} (seq {seq})", satellite.name);
                return None;
            }
            satellite.rel_pos = rel_pos;
            satellite.rel_vel = rel_vel;
            satellite.sync_absolute(&parent);
            Some(UpdateTarget::Satellite(id))
        }
    }
}

/// Snapshot the attractors body `i` feels, per the attraction policy:
/// - primary and major bodies: the primary (if not itself) plus every user
///   body; majors never attract each other
/// - user bodies: the primary plus every other user body
pub fn policy_attractors(system: &System, i: usize) -> Vec<Attractor> {
    let body = &system.bodies[i];
    let mut attractors = Vec::new();

    for (j, other) in system.bodies.iter().enumerate() {
        if j == i {
            continue;
        }
        let include = match body.kind {
            BodyKind::Primary => other.kind == BodyKind::User,
            BodyKind::Major | BodyKind::User => {
                other.kind == BodyKind::Primary || other.kind == BodyKind::User
            }
        };
        if include {
            attractors.push(Attractor {
                mass: other.mass,
                position: other.sim_pos,
            });
        }
    }
    attractors
}

/// Everything a body batch needs, captured by value at dispatch time
struct BodyTask {
    id: BodyId,
    seq: u64,
    mass: f64,
    position: NVec2,
    velocity: NVec2,
    attractors: Vec<Attractor>,
    steps: u32,
    dt: f64,
    g: f64,
}

impl BodyTask {
    fn run(self) -> StepResult {
        let gravity = NewtonianGravity::new(self.g);
        let (position, velocity) = integrate_batch(
            &gravity,
            self.mass,
            self.position,
            self.velocity,
            &self.attractors,
            self.steps,
            self.dt,
        );
        StepResult::Body {
            id: self.id,
            seq: self.seq,
            position,
            velocity,
        }
    }
}

/// Everything a satellite batch needs, captured by value at dispatch time
struct SatelliteTask {
    id: SatelliteId,
    seq: u64,
    mass: f64,
    parent_mass: f64,
    rel_pos: NVec2,
    rel_vel: NVec2,
    steps: u32,
    dt: f64,
    g: f64,
}

impl SatelliteTask {
    fn run(self) -> StepResult {
        let gravity = NewtonianGravity::new(self.g);
        let (rel_pos, rel_vel) = integrate_satellite_batch(
            &gravity,
            self.mass,
            self.parent_mass,
            self.rel_pos,
            self.rel_vel,
            self.steps,
            self.dt,
        );
        StepResult::Satellite {
            id: self.id,
            seq: self.seq,
            rel_pos,
            rel_vel,
        }
    }
}
