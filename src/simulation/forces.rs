//! Gravitational force model for the n-body engine
//!
//! Defines the pairwise Newtonian attraction used by every tier of the
//! simulation, plus the point-mass snapshot type worker tasks integrate
//! against. The force function is pure: no side effects, deterministic
//! given inputs.

use crate::simulation::states::NVec2;

/// Immutable point-mass snapshot of an attracting body, captured at
/// dispatch time. Worker tasks only ever see these, never live bodies.
#[derive(Debug, Clone, Copy)]
pub struct Attractor {
    pub mass: f64, // kg
    pub position: NVec2, // absolute position (m)
}

/// Pairwise Newtonian gravity
pub struct NewtonianGravity {
    pub g: f64, // gravitational constant
}

impl NewtonianGravity {
    pub fn new(g: f64) -> Self {
        Self { g }
    }

    /// Force on body `a` exerted by body `b`:
    /// F = G * m_a * m_b / d^2, directed along the unit vector from a to b
    ///
    /// Coincident positions (including a == b) return the zero vector. The
    /// division by zero is guarded explicitly rather than relying on
    /// self-exclusion, because two distinct bodies may coincide.
    pub fn attraction(&self, mass_a: f64, pos_a: NVec2, mass_b: f64, pos_b: NVec2) -> NVec2 {
        // r is the displacement vector from a to b; the pull on a points
        // along +r
        let r = pos_b - pos_a;
        let distance = r.norm();
        if distance == 0.0 {
            return NVec2::zeros();
        }

        // F = G m_a m_b / d^2, then scale the displacement by F/d to get
        // the force vector along the unit direction
        let force = self.g * mass_a * mass_b / (distance * distance);
        (force / distance) * r
    }

    /// Net force on a body from a snapshot of attractors
    pub fn net_force(&self, mass: f64, position: NVec2, attractors: &[Attractor]) -> NVec2 {
        let mut net = NVec2::zeros();
        for other in attractors {
            net += self.attraction(mass, position, other.mass, other.position);
        }
        net
    }
}

impl Default for NewtonianGravity {
    fn default() -> Self {
        Self {
            g: crate::simulation::params::G,
        }
    }
}
