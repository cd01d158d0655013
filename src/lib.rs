pub mod error;
pub mod simulation;
pub mod sampling;
pub mod render;
pub mod configuration;
#[cfg(feature = "viewer")]
pub mod visualization;
pub mod benchmark;

pub use error::{Result, WarpError};

pub use simulation::states::{Color, Coordinate, NVec, NVec2, Particle, Particle2};
pub use simulation::params::WarpParameters;
pub use simulation::integrator::{euler_position_step, integrate};
pub use simulation::warp::{warp, WarpDriver};
pub use simulation::scenario::WarpScenario;

pub use sampling::addressing::to_input_coords;
pub use sampling::sampler::{sample, sample_clamped, Interpolation};
pub use sampling::surface::{create_raster, Surface, SurfaceMut};

pub use render::pacer::{adjust, PacerSettings};
pub use render::host::{load_image, save_image, HeadlessHost, Host, Status};
pub use render::session::{CycleReport, Outcome, RenderSession};

pub use configuration::config::{ImageConfig, PacerConfig, ScenarioConfig, TargetConfig, ViewerConfig, WarpConfig};

#[cfg(feature = "viewer")]
pub use visualization::viewer::run_viewer;

pub use benchmark::benchmark::{bench_pacer, bench_warp};
