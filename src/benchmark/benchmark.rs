use std::hint::black_box;
use std::time::{Duration, Instant};

use image::{Rgba, RgbaImage};

use crate::render::pacer::{adjust, CYCLE_PERIOD_TARGET, INITIAL_BATCH, MAX_CHANGE_PER_CYCLE};
use crate::simulation::params::WarpParameters;
use crate::simulation::states::{Coordinate, NVec2, Particle2};
use crate::simulation::warp::WarpDriver;

/// Helper to build `n` deterministic targets spread over a `w` x `h` canvas
fn make_targets(n: usize, w: f64, h: f64) -> Vec<Particle2> {
    (0..n)
        .map(|i| {
            let i_f = i as f64;
            // deterministic positions, no rand needed
            let x = NVec2::new(
                (0.5 + 0.45 * (i_f * 0.37).sin()) * w,
                (0.5 + 0.45 * (i_f * 0.13).cos()) * h,
            );
            Particle2::new(x, 1.0 + (i % 3) as f64)
        })
        .collect()
}

/// Helper to build a small gradient source image
fn make_source(w: u32, h: u32) -> RgbaImage {
    RgbaImage::from_fn(w, h, |x, y| Rgba([(x * 255 / w) as u8, (y * 255 / h) as u8, 128, 255]))
}

/// Time `pixels` shaded pixels, row-major over a `w`-wide raster
fn time_pixels(driver: &mut WarpDriver, source: &RgbaImage, w: u32, pixels: u32) -> (Duration, u64) {
    let mut checksum = 0u64;
    let t0 = Instant::now();
    for i in 0..pixels {
        let p = Coordinate::new((i % w) as f64, (i / w) as f64);
        if let Ok(c) = driver.shade(source, p) {
            checksum = checksum.wrapping_add(u32::from_le_bytes(c.channels()) as u64);
        }
    }
    (t0.elapsed(), black_box(checksum))
}

/// Per-pixel warp cost against the number of targets and rounds per pixel
/// Paste output directly into excel to graph
pub fn bench_warp() {
    let (w, h) = (640u32, 360u32);
    let source = make_source(256, 256);
    let pixels = 20_000;

    println!("targets,iterations,ns_per_pixel,checksum");

    for n in [0usize, 1, 4, 16, 64] {
        for iterations in [1u32, 4, 16] {
            let params = WarpParameters {
                dt: 1.0,
                iterations,
                projectile_mass: -20.0,
                ..WarpParameters::default()
            };
            let mut driver = WarpDriver::new(make_targets(n, w as f64, h as f64), params);

            // Warm up
            time_pixels(&mut driver, &source, w, 1_000);

            let (elapsed, checksum) = time_pixels(&mut driver, &source, w, pixels);
            let ns = elapsed.as_secs_f64() * 1e9 / pixels as f64;
            println!("{},{},{:.1},{:x}", n, iterations, ns, checksum);
        }
    }
}

/// Simulate the pacer against a fixed per-pixel cost and print how the batch converges
pub fn bench_pacer() {
    // Synthetic per-pixel costs, from cheap to expensive
    let costs = [Duration::from_nanos(50), Duration::from_micros(2), Duration::from_micros(40)];

    println!("cost_ns,cycle,batch,cycle_ms");

    for cost in costs {
        let mut batch = INITIAL_BATCH;
        for cycle in 0..40 {
            let measured = cost * batch as u32;
            println!("{},{},{},{:.3}", cost.as_nanos(), cycle, batch, measured.as_secs_f64() * 1e3);
            batch = adjust(batch, measured, CYCLE_PERIOD_TARGET, MAX_CHANGE_PER_CYCLE);
        }
    }
}
