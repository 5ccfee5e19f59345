//! Fixed-step time integration for the N-body system
//!
//! Provides the semi-implicit Euler step shared by every tier, plus the
//! batch runners executed inside dispatched worker tasks:
//! - `integrate_batch` advances an absolute-frame body against a frozen
//!   attractor snapshot
//! - `integrate_satellite_batch` advances a satellite's parent-relative
//!   state against its parent alone, at the finer satellite timestep
//!
//! `dt` always arrives with the speed multiplier already folded in.

use crate::simulation::forces::{Attractor, NewtonianGravity};
use crate::simulation::states::NVec2;

/// Advance one body by one semi-implicit Euler step.
///
/// The velocity is updated from the acceleration first, then the position
/// is updated from the *new* velocity. This ordering is what makes the
/// scheme symplectic; it must not be swapped.
pub fn semi_implicit_step(
    position: NVec2,
    velocity: NVec2,
    net_force: NVec2,
    mass: f64,
    dt: f64,
) -> (NVec2, NVec2) {
    let acceleration = net_force / mass;

    // Kick: v_n+1 = v_n + a_n * dt
    let velocity = velocity + acceleration * dt;

    // Drift with the updated velocity: x_n+1 = x_n + v_n+1 * dt
    let position = position + velocity * dt;

    (position, velocity)
}

/// Run a batch of `steps` integration steps for an absolute-frame body.
///
/// The attractor list is the snapshot captured at dispatch time and stays
/// frozen for the whole batch; only this body's own state advances.
pub fn integrate_batch(
    gravity: &NewtonianGravity,
    mass: f64,
    mut position: NVec2,
    mut velocity: NVec2,
    attractors: &[Attractor],
    steps: u32,
    dt: f64,
) -> (NVec2, NVec2) {
    for _ in 0..steps {
        let net_force = gravity.net_force(mass, position, attractors);
        let (x, v) = semi_implicit_step(position, velocity, net_force, mass, dt);
        position = x;
        velocity = v;
    }
    (position, velocity)
}

/// Run a batch of `steps` integration steps for a satellite in its
/// parent-relative frame.
///
/// The parent sits at the origin of the relative frame, so the single
/// attraction is evaluated at the relative position directly. Satellite
/// dynamics are a plain two-body orbit around the parent; no other body
/// contributes.
pub fn integrate_satellite_batch(
    gravity: &NewtonianGravity,
    mass: f64,
    parent_mass: f64,
    mut rel_pos: NVec2,
    mut rel_vel: NVec2,
    steps: u32,
    dt: f64,
) -> (NVec2, NVec2) {
    for _ in 0..steps {
        let net_force = gravity.attraction(mass, rel_pos, parent_mass, NVec2::zeros());
        let (x, v) = semi_implicit_step(rel_pos, rel_vel, net_force, mass, dt);
        rel_pos = x;
        rel_vel = v;
    }
    (rel_pos, rel_vel)
}
