//! Coordinate warp driver
//!
//! For one destination pixel: drop the projectile at the pixel, let the
//! target particles pull it for a fixed number of rounds, fold the landing
//! point into the source image with mirror addressing and sample it.

use log::warn;

use crate::error::{Result, WarpError};
use crate::sampling::addressing::to_input_coords;
use crate::sampling::sampler::{sample, sample_clamped};
use crate::sampling::surface::Surface;
use crate::simulation::integrator::integrate;
use crate::simulation::params::WarpParameters;
use crate::simulation::states::{Color, Coordinate, Particle2};

/// Warped position of `dest_pixel` after `iterations` rounds against `targets`.
/// `projectile` is reset first, nothing carries over from a previous pixel.
pub fn warp(
    projectile: &mut Particle2,
    dest_pixel: Coordinate,
    targets: &[Particle2],
    dt: f64,
    iterations: u32,
) -> Coordinate {
    integrate(projectile, dest_pixel, targets, dt, iterations)
}

/// Per-pass warp state: the fixed target set and one reusable projectile
#[derive(Debug, Clone)]
pub struct WarpDriver {
    targets: Vec<Particle2>,
    projectile: Particle2,
    params: WarpParameters,
    fallbacks: u64,
}

impl WarpDriver {
    pub fn new(targets: Vec<Particle2>, params: WarpParameters) -> Self {
        let projectile = Particle2::new(Coordinate::zeros(), params.projectile_mass);
        Self {
            targets,
            projectile,
            params,
            fallbacks: 0,
        }
    }

    pub fn targets(&self) -> &[Particle2] {
        &self.targets
    }

    pub fn params(&self) -> &WarpParameters {
        &self.params
    }

    /// Number of bilinear lookups that had to be clamped onto the source grid
    pub fn fallbacks(&self) -> u64 {
        self.fallbacks
    }

    /// Warped, unaddressed position of `dest_pixel`
    pub fn warp(&mut self, dest_pixel: Coordinate) -> Coordinate {
        warp(
            &mut self.projectile,
            dest_pixel,
            &self.targets,
            self.params.dt,
            self.params.iterations,
        )
    }

    /// Final color of `dest_pixel` read from `source`
    pub fn shade<S: Surface + ?Sized>(&mut self, source: &S, dest_pixel: Coordinate) -> Result<Color> {
        let warped = self.warp(dest_pixel);
        let input = to_input_coords(source.size(), warped);

        match sample(source, input, self.params.interpolation) {
            Ok(color) => Ok(color),
            Err(WarpError::SampleOutOfBounds { x, y, width, height }) => {
                if self.fallbacks == 0 {
                    warn!(
                        "sample at ({x}, {y}) falls outside the {width}x{height} source; clamping (further occurrences are counted)"
                    );
                }
                self.fallbacks += 1;
                Ok(sample_clamped(source, input))
            }
            Err(e) => Err(e),
        }
    }
}
