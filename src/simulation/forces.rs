//! Force model for the warp particles
//!
//! Pairwise attraction weighted by the mass product and falling off
//! linearly with distance: `f += m_self * m_other * d / |d|`.
//! This is not Newtonian gravity; the exponent shapes the warp and is kept as is.

use crate::simulation::states::{NVec, Particle};

impl<const D: usize> Particle<D> {
    /// Rebuild the force accumulator from every particle in `others`
    pub fn compute_force(&mut self, others: &[Particle<D>]) {
        self.f = NVec::<D>::zeros();

        for other in others {
            // d points from `other` to `self`
            let d = self.x - other.x;

            // |d|^2 and |d|
            let r2 = d.dot(&d);
            let mut r = r2.sqrt();

            // Coincident particles: d is the zero vector, any finite r gives zero force
            if r == 0.0 {
                r = 1.0;
            }

            // f += m_i * m_j * d / |d|
            // With m_self < 0 and m_other > 0 this points from self toward other
            self.f += (self.m * other.m / r) * d;
        }
    }

    /// Explicit position step: x += f * dt
    /// Velocity is intentionally left out of the update
    pub fn step(&mut self, dt: f64) {
        self.x += dt * self.f;
    }
}
