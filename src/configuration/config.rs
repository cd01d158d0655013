//! Configuration types for loading warp scenarios from YAML.
//!
//! A scenario consists of:
//!
//! - [`ImageConfig`]  – source/output paths, render size and sampling mode
//! - [`WarpConfig`]   – step size, rounds per pixel and projectile mass
//! - [`PacerConfig`]  – cycle duration target and batch growth limits
//! - [`TargetConfig`] – one attractor of the warp field
//! - [`ViewerConfig`] – preview window size
//! - [`ScenarioConfig`] – top-level wrapper used to load a scenario from YAML
//!
//! # YAML format
//!
//! ```yaml
//! image:
//!   input: "img_src/green_wide.png"
//!   output: "output.jpg"
//!   render_size: [3840, 2160]
//!   interpolation: "nearest"   # or "bilinear"
//!
//! warp:
//!   dt: 1.0
//!   iterations: 4
//!   projectile_mass: -40.0
//!
//! pacer:
//!   cycle_target: 0.1          # seconds
//!   initial_batch: 10
//!   max_change: 0.5
//!   status_interval: 1.0       # seconds
//!
//! targets:
//!   - x: [ 960.0, 540.0 ]
//!     m: 1.0
//!     color: [255, 0, 0]
//!
//! viewer:
//!   window_size: [960, 540]
//! ```
//!
//! `pacer`, `viewer` and `targets` may be omitted. Values are checked when the
//! runtime [`crate::WarpScenario`] is built.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::Result;

#[derive(Deserialize, Debug, Clone)]
pub struct ImageConfig {
    pub input: PathBuf, // source image, any format the `image` crate decodes
    pub output: PathBuf, // written once the pass completes
    pub render_size: [u32; 2], // destination raster width, height
    #[serde(default = "default_interpolation")]
    pub interpolation: String, // "nearest" or "bilinear", parsed when the scenario is built
}

#[derive(Deserialize, Debug, Clone)]
pub struct WarpConfig {
    pub dt: f64, // position step size
    pub iterations: u32, // force/step rounds per pixel
    pub projectile_mass: f64, // negative pulls toward positive targets
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct PacerConfig {
    pub cycle_target: f64, // seconds
    pub initial_batch: u64,
    pub max_change: f64, // 0.5 -> up to 50% growth/shrink per cycle
    pub status_interval: f64, // seconds between status reports
}

impl Default for PacerConfig {
    fn default() -> Self {
        Self {
            cycle_target: 0.1,
            initial_batch: 10,
            max_change: 0.5,
            status_interval: 1.0,
        }
    }
}

/// One attractor of the warp field
#[derive(Deserialize, Debug, Clone)]
pub struct TargetConfig {
    pub x: Vec<f64>, // position in render space
    pub m: f64, // mass
    pub color: Option<[u8; 3]>, // display only
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ViewerConfig {
    pub window_size: [u32; 2],
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self { window_size: [960, 540] }
    }
}

/// Top-level scenario configuration loaded from YAML
#[derive(Deserialize, Debug, Clone)]
pub struct ScenarioConfig {
    pub image: ImageConfig,
    pub warp: WarpConfig,
    #[serde(default)]
    pub pacer: PacerConfig,
    #[serde(default)]
    pub targets: Vec<TargetConfig>,
    #[serde(default)]
    pub viewer: ViewerConfig,
}

impl ScenarioConfig {
    pub fn from_yaml_str(s: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(s)?)
    }

    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_yaml::from_reader(reader)?)
    }
}

fn default_interpolation() -> String {
    "nearest".to_string()
}
