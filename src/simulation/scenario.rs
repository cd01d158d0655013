//! Build a fully-initialized warp scenario from configuration
//!
//! Takes a `ScenarioConfig` (YAML-facing) and produces the runtime bundle:
//! - file locations and raster sizes
//! - numerical parameters (`WarpParameters`)
//! - the target particle set, fixed for the whole pass
//! - pacing settings (`PacerSettings`) and the status interval

use std::path::PathBuf;
use std::time::Duration;

use crate::configuration::config::{ScenarioConfig, TargetConfig};
use crate::error::{Result, WarpError};
use crate::render::pacer::PacerSettings;
use crate::sampling::sampler::Interpolation;
use crate::simulation::params::WarpParameters;
use crate::simulation::states::{Color, NVec2, Particle2};

#[derive(Debug, Clone)]
pub struct WarpScenario {
    pub input: PathBuf,
    pub output: PathBuf,
    pub render_size: (u32, u32),
    pub window_size: (u32, u32),
    pub parameters: WarpParameters,
    pub targets: Vec<Particle2>,
    pub pacer: PacerSettings,
    pub status_interval: Duration,
}

impl WarpScenario {
    pub fn build_scenario(cfg: ScenarioConfig) -> Result<Self> {
        let [w, h] = cfg.image.render_size;
        if w == 0 || h == 0 {
            return Err(invalid(format!("render_size must be non-zero, got {w}x{h}")));
        }

        // Parameters (runtime) from WarpConfig
        let w_cfg = cfg.warp;
        if w_cfg.iterations == 0 {
            return Err(invalid("warp.iterations must be at least 1".into()));
        }
        if !w_cfg.dt.is_finite() || !w_cfg.projectile_mass.is_finite() {
            return Err(invalid("warp.dt and warp.projectile_mass must be finite".into()));
        }
        let parameters = WarpParameters {
            dt: w_cfg.dt,
            iterations: w_cfg.iterations,
            projectile_mass: w_cfg.projectile_mass,
            interpolation: cfg.image.interpolation.parse::<Interpolation>()?,
        };

        // Pacing (runtime) from PacerConfig
        let p_cfg = cfg.pacer;
        if !(p_cfg.cycle_target > 0.0 && p_cfg.cycle_target.is_finite()) {
            return Err(invalid(format!("pacer.cycle_target must be positive, got {}", p_cfg.cycle_target)));
        }
        if !(p_cfg.max_change > 0.0 && p_cfg.max_change.is_finite()) {
            return Err(invalid(format!("pacer.max_change must be positive, got {}", p_cfg.max_change)));
        }
        if !(p_cfg.status_interval >= 0.0 && p_cfg.status_interval.is_finite()) {
            return Err(invalid(format!("pacer.status_interval must be non-negative, got {}", p_cfg.status_interval)));
        }
        let pacer = PacerSettings {
            target: Duration::from_secs_f64(p_cfg.cycle_target),
            max_change: p_cfg.max_change,
            initial_batch: p_cfg.initial_batch.max(1),
        };

        // Targets: map `TargetConfig` -> runtime `Particle2`
        let targets = cfg
            .targets
            .iter()
            .enumerate()
            .map(|(i, tc)| build_target(i, tc))
            .collect::<Result<Vec<_>>>()?;

        let [ww, wh] = cfg.viewer.window_size;

        Ok(Self {
            input: cfg.image.input,
            output: cfg.image.output,
            render_size: (w, h),
            window_size: (ww.max(1), wh.max(1)),
            parameters,
            targets,
            pacer,
            status_interval: Duration::from_secs_f64(p_cfg.status_interval),
        })
    }
}

fn build_target(i: usize, tc: &TargetConfig) -> Result<Particle2> {
    if tc.x.len() != 2 {
        return Err(invalid(format!("targets[{i}].x must have 2 components, got {}", tc.x.len())));
    }
    if !tc.m.is_finite() || tc.x.iter().any(|v| !v.is_finite()) {
        return Err(invalid(format!("targets[{i}] must have a finite position and mass")));
    }
    let mut p = Particle2::new(NVec2::new(tc.x[0], tc.x[1]), tc.m);
    if let Some([r, g, b]) = tc.color {
        p = p.with_color(Color::rgb(r, g, b));
    }
    Ok(p)
}

fn invalid(msg: String) -> WarpError {
    WarpError::InvalidConfig(msg)
}
