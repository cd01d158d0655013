//! Numerical parameters for one warp evaluation
//!
//! `WarpParameters` holds runtime settings:
//! - position step size `dt` and number of force/step rounds,
//! - the projectile mass (negative pulls toward positive targets),
//! - the sampling mode used after addressing

use crate::sampling::sampler::Interpolation;

#[derive(Debug, Clone)]
pub struct WarpParameters {
    pub dt: f64, // position step size
    pub iterations: u32, // force/step rounds per pixel, >= 1
    pub projectile_mass: f64, // mass of the per-pixel projectile
    pub interpolation: Interpolation, // sampling mode
}

impl Default for WarpParameters {
    fn default() -> Self {
        Self {
            dt: 1.0,
            iterations: 1,
            projectile_mass: -1.0,
            interpolation: Interpolation::Nearest,
        }
    }
}
