//! Fixed-step position integrator for the projectile
//!
//! One round is a force evaluation against the target set followed by an
//! explicit position step. The targets never move.

use super::states::{NVec, Particle};

/// Advance `projectile` by one round against `targets`
pub fn euler_position_step<const D: usize>(projectile: &mut Particle<D>, targets: &[Particle<D>], dt: f64) {
    projectile.compute_force(targets);
    projectile.step(dt);
}

/// Reset `projectile` to `start` and run `iterations` rounds, returning the final position
pub fn integrate<const D: usize>(
    projectile: &mut Particle<D>,
    start: NVec<D>,
    targets: &[Particle<D>],
    dt: f64,
    iterations: u32,
) -> NVec<D> {
    projectile.reset(start);

    // No targets: every round would produce a zero force
    if targets.is_empty() {
        return projectile.x;
    }

    for _ in 0..iterations {
        euler_position_step(projectile, targets, dt);
    }
    projectile.x
}
