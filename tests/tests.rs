use std::sync::atomic::Ordering;
use std::time::Duration;

use image::{Rgba, RgbaImage};

use image_warp::configuration::config::ScenarioConfig;
use image_warp::render::host::{load_image, save_image, HeadlessHost, Host, Status};
use image_warp::render::pacer::{adjust, PacerSettings};
use image_warp::render::session::{Outcome, RenderSession};
use image_warp::sampling::sampler::{sample, Interpolation};
use image_warp::sampling::surface::Surface;
use image_warp::simulation::params::WarpParameters;
use image_warp::simulation::scenario::WarpScenario;
use image_warp::simulation::states::{Color, NVec2, Particle2};
use image_warp::simulation::warp::{warp, WarpDriver};
use image_warp::WarpError;

/// Source image where every pixel has a unique color
pub fn gradient_source(w: u32, h: u32) -> RgbaImage {
    RgbaImage::from_fn(w, h, |x, y| Rgba([(x * 40) as u8, (y * 40) as u8, (x + y * w) as u8, 255]))
}

/// Warp driver with no targets: every pixel maps to itself before addressing
pub fn identity_driver(mode: Interpolation) -> WarpDriver {
    WarpDriver::new(
        Vec::new(),
        WarpParameters {
            interpolation: mode,
            ..WarpParameters::default()
        },
    )
}

/// Session over `source` with a fixed first batch and no status throttling
pub fn session(source: RgbaImage, render_size: (u32, u32), driver: WarpDriver, initial_batch: u64) -> RenderSession {
    let pacer = PacerSettings {
        initial_batch,
        ..PacerSettings::default()
    };
    RenderSession::new(source, render_size, driver, pacer, Duration::ZERO)
}

/// Host that asks to stop on its `stop_at`-th poll
pub struct ScriptedHost {
    polls: u32,
    stop_at: u32,
    presented: u32,
    statuses: Vec<Status>,
}

impl ScriptedHost {
    pub fn new(stop_at: u32) -> Self {
        Self { polls: 0, stop_at, presented: 0, statuses: Vec::new() }
    }
}

impl Host for ScriptedHost {
    fn poll_termination_requested(&mut self) -> bool {
        self.polls += 1;
        self.polls >= self.stop_at
    }

    fn present(&mut self, _raster: &RgbaImage) -> image_warp::Result<()> {
        self.presented += 1;
        Ok(())
    }

    fn report_status(&mut self, status: &Status) {
        self.statuses.push(*status);
    }
}

const SCENARIO_YAML: &str = r#"
image:
  input: "in.png"
  output: "out.png"
  render_size: [64, 32]
  interpolation: "bilinear"
warp:
  dt: 0.5
  iterations: 3
  projectile_mass: -10.0
targets:
  - x: [ 10.0, 20.0 ]
    m: 2.0
    color: [255, 0, 0]
  - x: [ 30.0, 5.0 ]
    m: 1.0
"#;

// ==================================================================================
// Force model / warp tests
// ==================================================================================

#[test]
fn single_target_one_round_moves_by_mass_product() {
    // d = (0,0) - (10,0) = (-10, 0), |d| = 10
    // f = -100 * 1 * (-10, 0) / 10 = (100, 0)
    let mut projectile = Particle2::new(NVec2::zeros(), -100.0);
    let targets = [Particle2::new(NVec2::new(10.0, 0.0), 1.0)];

    let end = warp(&mut projectile, NVec2::new(0.0, 0.0), &targets, 1.0, 1);

    assert!((end - NVec2::new(100.0, 0.0)).norm() < 1e-12, "got {:?}", end);
}

#[test]
fn negative_projectile_is_pulled_toward_target() {
    let mut projectile = Particle2::new(NVec2::zeros(), -1.0);
    let targets = [Particle2::new(NVec2::new(10.0, 0.0), 1.0)];

    let end = warp(&mut projectile, NVec2::zeros(), &targets, 1.0, 3);

    assert!((end - NVec2::new(3.0, 0.0)).norm() < 1e-12, "got {:?}", end);
}

#[test]
fn velocity_is_not_integrated() {
    let mut p = Particle2::new(NVec2::new(1.0, 1.0), -1.0);
    p.v = NVec2::new(50.0, -50.0);
    p.compute_force(&[]);
    p.step(1.0);
    assert_eq!(p.x, NVec2::new(1.0, 1.0));
}

#[test]
fn projectile_state_does_not_carry_between_pixels() {
    let targets = [Particle2::new(NVec2::new(5.0, 5.0), 3.0)];
    let mut shared = Particle2::new(NVec2::zeros(), -2.0);

    let first = warp(&mut shared, NVec2::new(1.0, 2.0), &targets, 0.25, 5);
    let _ = warp(&mut shared, NVec2::new(40.0, -7.0), &targets, 0.25, 5);
    let again = warp(&mut shared, NVec2::new(1.0, 2.0), &targets, 0.25, 5);

    assert_eq!(first, again);
    assert_eq!(shared.v, NVec2::zeros());
}

#[test]
fn non_finite_warp_falls_back_to_clamped_sample() {
    // The mass product overflows, so the warped coordinate is not finite
    let source = RgbaImage::from_pixel(4, 4, Rgba([1, 2, 3, 255]));
    let mut driver = WarpDriver::new(
        vec![Particle2::new(NVec2::new(2.0, 2.0), 1e308)],
        WarpParameters {
            dt: 1.0,
            iterations: 1,
            projectile_mass: -1e308,
            interpolation: Interpolation::Bilinear,
        },
    );

    let c = driver.shade(&source, NVec2::new(0.0, 0.0)).unwrap();
    assert_eq!(c, Color::rgb(1, 2, 3));
    assert_eq!(driver.fallbacks(), 1);

    let c = driver.shade(&source, NVec2::new(3.0, 1.0)).unwrap();
    assert_eq!(c, Color::rgb(1, 2, 3));
    assert_eq!(driver.fallbacks(), 2);
}

#[test]
fn no_targets_leaves_coordinate_unchanged() {
    let mut driver = identity_driver(Interpolation::Nearest);
    assert_eq!(driver.warp(NVec2::new(3.5, -2.0)), NVec2::new(3.5, -2.0));
}

// ==================================================================================
// Sampler tests
// ==================================================================================

#[test]
fn nearest_sample_floors_coordinates() {
    let img = gradient_source(5, 5);
    let c = sample(&img, NVec2::new(2.7, 3.9), Interpolation::Nearest).unwrap();
    assert_eq!(c, img.pixel_at(2, 3));
}

#[test]
fn bilinear_sample_at_integer_coordinates_is_unchanged() {
    let mut img = RgbaImage::new(2, 2);
    img.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
    img.put_pixel(1, 0, Rgba([0, 255, 0, 255]));
    img.put_pixel(0, 1, Rgba([0, 0, 255, 255]));
    img.put_pixel(1, 1, Rgba([255, 255, 255, 255]));

    assert_eq!(sample(&img, NVec2::new(0.0, 0.0), Interpolation::Bilinear).unwrap(), Color::rgb(255, 0, 0));
    assert_eq!(sample(&img, NVec2::new(1.0, 1.0), Interpolation::Bilinear).unwrap(), Color::WHITE);
}

// ==================================================================================
// Pacer tests
// ==================================================================================

#[test]
fn pacer_holds_batch_on_target() {
    let target = Duration::from_millis(100);
    assert_eq!(adjust(4321, target, target, 0.5), 4321);
}

#[test]
fn pacer_converges_for_constant_cost() {
    // 10us per pixel -> 10_000 pixels fill a 100ms cycle
    let cost = Duration::from_micros(10);
    let settings = PacerSettings::default();
    let mut batch = settings.initial_batch;
    for _ in 0..60 {
        batch = settings.adjust(batch, cost * batch as u32);
    }
    assert!((9_900..=10_100).contains(&batch), "batch settled at {batch}");
}

// ==================================================================================
// Render session tests
// ==================================================================================

#[test]
fn uniform_source_without_targets_is_reproduced() {
    let source = RgbaImage::from_pixel(4, 4, Rgba([12, 34, 56, 255]));
    let mut s = session(source.clone(), (4, 4), identity_driver(Interpolation::Nearest), 3);
    let mut host = HeadlessHost::new();

    assert_eq!(s.run(&mut host).unwrap(), Outcome::Completed);
    assert_eq!(s.raster(), &source);
    assert!(host.presented() >= 1);
}

#[test]
fn raster_wider_than_source_is_mirrored() {
    let source = gradient_source(4, 4);
    let mut s = session(source.clone(), (8, 4), identity_driver(Interpolation::Nearest), 5);

    assert_eq!(s.run(&mut HeadlessHost::new()).unwrap(), Outcome::Completed);

    let raster = s.into_raster();
    for y in 0..4 {
        for x in 0..4 {
            assert_eq!(raster.get_pixel(x, y), source.get_pixel(x, y));
        }
        // tile 1 is reflected; its first column lands on the wrap-around edge
        assert_eq!(raster.get_pixel(4, y), source.get_pixel(0, y));
        assert_eq!(raster.get_pixel(5, y), source.get_pixel(3, y));
        assert_eq!(raster.get_pixel(6, y), source.get_pixel(2, y));
        assert_eq!(raster.get_pixel(7, y), source.get_pixel(1, y));
    }
}

#[test]
fn bilinear_identity_matches_nearest() {
    let source = gradient_source(6, 3);
    let mut a = session(source.clone(), (13, 7), identity_driver(Interpolation::Nearest), 4);
    let mut b = session(source, (13, 7), identity_driver(Interpolation::Bilinear), 4);

    a.run(&mut HeadlessHost::new()).unwrap();
    b.run(&mut HeadlessHost::new()).unwrap();

    assert_eq!(a.raster(), b.raster());
    assert_eq!(b.status().fallbacks, 0);
}

#[test]
fn first_cycle_respects_batch_size() {
    let mut s = session(gradient_source(4, 4), (8, 8), identity_driver(Interpolation::Nearest), 10);

    let report = s.cycle().unwrap();

    assert_eq!(report.pixels, 10);
    assert!((s.fraction_done() - 10.0 / 64.0).abs() < 1e-12);
    assert!(report.next_batch >= 7 && report.next_batch <= 15);
}

#[test]
fn termination_is_checked_at_cycle_boundaries() {
    let mut s = session(gradient_source(4, 4), (100, 100), identity_driver(Interpolation::Nearest), 1);
    let mut host = ScriptedHost::new(3);

    assert_eq!(s.run(&mut host).unwrap(), Outcome::Terminated);
    assert_eq!(s.cycles(), 2);
    assert_eq!(host.presented, 2);
    assert!(!s.is_complete());
}

#[test]
fn raised_stop_flag_terminates_headless_run() {
    let mut s = session(gradient_source(4, 4), (50, 50), identity_driver(Interpolation::Nearest), 1);
    let mut host = HeadlessHost::new();
    host.stop_flag().store(true, Ordering::Relaxed);

    assert_eq!(s.run(&mut host).unwrap(), Outcome::Terminated);
    assert_eq!(s.cycles(), 0);
    assert_eq!(host.presented(), 0);
    assert!(!s.is_complete());
}

#[test]
fn signal_host_starts_unstopped() {
    let mut host = HeadlessHost::with_signal_handlers().unwrap();
    assert!(!host.poll_termination_requested());
}

#[test]
fn completed_run_reports_final_status() {
    let mut s = session(gradient_source(4, 4), (5, 5), identity_driver(Interpolation::Nearest), 2);
    let mut host = ScriptedHost::new(u32::MAX);

    assert_eq!(s.run(&mut host).unwrap(), Outcome::Completed);

    let last = host.statuses.last().expect("final status");
    assert!((last.fraction_done - 1.0).abs() < 1e-12);
}

// ==================================================================================
// Configuration tests
// ==================================================================================

#[test]
fn scenario_from_yaml() {
    let cfg = ScenarioConfig::from_yaml_str(SCENARIO_YAML).unwrap();
    let scenario = WarpScenario::build_scenario(cfg).unwrap();

    assert_eq!(scenario.render_size, (64, 32));
    assert_eq!(scenario.parameters.interpolation, Interpolation::Bilinear);
    assert_eq!(scenario.parameters.iterations, 3);
    assert_eq!(scenario.targets.len(), 2);
    assert_eq!(scenario.targets[0].x, NVec2::new(10.0, 20.0));
    assert_eq!(scenario.targets[0].color, Color::rgb(255, 0, 0));
    // defaults
    assert_eq!(scenario.pacer.initial_batch, 10);
    assert_eq!(scenario.pacer.target, Duration::from_millis(100));
    assert_eq!(scenario.window_size, (960, 540));
}

#[test]
fn unknown_interpolation_is_rejected() {
    let yaml = SCENARIO_YAML.replace("\"bilinear\"", "\"bicubic\"");
    let cfg = ScenarioConfig::from_yaml_str(&yaml).unwrap();
    let err = WarpScenario::build_scenario(cfg).unwrap_err();
    assert!(matches!(err, WarpError::UnsupportedInterpolation(ref m) if m == "bicubic"), "{err}");
}

#[test]
fn interpolation_defaults_to_nearest() {
    let yaml = SCENARIO_YAML.replace("  interpolation: \"bilinear\"\n", "");
    let scenario = WarpScenario::build_scenario(ScenarioConfig::from_yaml_str(&yaml).unwrap()).unwrap();
    assert_eq!(scenario.parameters.interpolation, Interpolation::Nearest);
}

#[test]
fn zero_iterations_is_invalid() {
    let yaml = SCENARIO_YAML.replace("iterations: 3", "iterations: 0");
    let cfg = ScenarioConfig::from_yaml_str(&yaml).unwrap();
    assert!(matches!(WarpScenario::build_scenario(cfg), Err(WarpError::InvalidConfig(_))));
}

#[test]
fn three_component_target_is_invalid() {
    let yaml = SCENARIO_YAML.replace("[ 30.0, 5.0 ]", "[ 30.0, 5.0, 1.0 ]");
    let cfg = ScenarioConfig::from_yaml_str(&yaml).unwrap();
    assert!(matches!(WarpScenario::build_scenario(cfg), Err(WarpError::InvalidConfig(_))));
}

// ==================================================================================
// Image I/O tests
// ==================================================================================

#[test]
fn saved_raster_loads_back_opaque() {
    let mut raster = gradient_source(6, 4);
    raster.put_pixel(0, 0, Rgba([9, 8, 7, 0]));
    let path = std::env::temp_dir().join(format!("image_warp_io_{}.png", std::process::id()));

    save_image(&raster, &path).unwrap();
    let loaded = load_image(&path).unwrap();
    let _ = std::fs::remove_file(&path);

    assert_eq!(loaded.dimensions(), (6, 4));
    assert_eq!(loaded.get_pixel(0, 0), &Rgba([9, 8, 7, 255]));
    assert_eq!(loaded.get_pixel(5, 3), raster.get_pixel(5, 3));
}

#[test]
fn missing_source_is_an_error() {
    let err = load_image(std::path::Path::new("definitely/not/here.png")).unwrap_err();
    assert!(matches!(err, WarpError::Image(_)));
}
