//! Render loop state
//!
//! `RenderSession` owns the source image, the destination raster, the warp
//! driver and everything the loop mutates between cycles (cursor, batch size,
//! status counters). Pixels are produced left-to-right, top-to-bottom, each
//! written exactly once.

use std::time::{Duration, Instant};

use image::RgbaImage;
use log::{info, trace};

use crate::error::Result;
use crate::render::host::{Host, Status};
use crate::render::pacer::PacerSettings;
use crate::sampling::surface::{create_raster, SurfaceMut};
use crate::simulation::scenario::WarpScenario;
use crate::simulation::states::Coordinate;
use crate::simulation::warp::WarpDriver;

/// How a pass ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    Terminated,
}

/// Result of one cycle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleReport {
    pub pixels: u64, // pixels computed in this cycle
    pub elapsed: Duration,
    pub next_batch: u64,
}

pub struct RenderSession {
    source: RgbaImage,
    raster: RgbaImage,
    driver: WarpDriver,
    pacer: PacerSettings,
    batch_size: u64,
    cursor: (u32, u32),
    pixels_done: u64,
    cycles: u64,
    status_interval: Duration,
    cycles_since_status: u64,
    last_status: Instant,
}

impl RenderSession {
    pub fn new(
        source: RgbaImage,
        render_size: (u32, u32),
        driver: WarpDriver,
        pacer: PacerSettings,
        status_interval: Duration,
    ) -> Self {
        Self {
            source,
            raster: create_raster(render_size.0, render_size.1),
            driver,
            pacer,
            batch_size: pacer.initial_batch.max(1),
            cursor: (0, 0),
            pixels_done: 0,
            cycles: 0,
            status_interval,
            cycles_since_status: 0,
            last_status: Instant::now(),
        }
    }

    pub fn from_scenario(source: RgbaImage, scenario: &WarpScenario) -> Self {
        let driver = WarpDriver::new(scenario.targets.clone(), scenario.parameters.clone());
        Self::new(
            source,
            scenario.render_size,
            driver,
            scenario.pacer,
            scenario.status_interval,
        )
    }

    pub fn raster(&self) -> &RgbaImage {
        &self.raster
    }

    pub fn into_raster(self) -> RgbaImage {
        self.raster
    }

    pub fn batch_size(&self) -> u64 {
        self.batch_size
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn total_pixels(&self) -> u64 {
        self.raster.width() as u64 * self.raster.height() as u64
    }

    pub fn is_complete(&self) -> bool {
        self.pixels_done >= self.total_pixels()
    }

    pub fn fraction_done(&self) -> f64 {
        self.pixels_done as f64 / self.total_pixels() as f64
    }

    /// Compute up to one batch of pixels, then retune the batch size
    pub fn cycle(&mut self) -> Result<CycleReport> {
        let start = Instant::now();
        let mut pixels = 0;

        while pixels < self.batch_size && !self.is_complete() {
            let (x, y) = self.cursor;
            let color = self
                .driver
                .shade(&self.source, Coordinate::new(x as f64, y as f64))?;
            self.raster.set_pixel(x, y, color);
            self.advance_cursor();
            pixels += 1;
        }

        let elapsed = start.elapsed();
        let previous = self.batch_size;
        self.batch_size = self.pacer.adjust(previous, elapsed);
        self.cycles += 1;
        self.cycles_since_status += 1;

        trace!(
            "cycle {}: {} pixels in {:.3} ms, batch {} -> {}",
            self.cycles,
            pixels,
            elapsed.as_secs_f64() * 1e3,
            previous,
            self.batch_size
        );

        Ok(CycleReport {
            pixels,
            elapsed,
            next_batch: self.batch_size,
        })
    }

    /// Status snapshot if at least one status interval has passed since the last one
    pub fn poll_status(&mut self, now: Instant) -> Option<Status> {
        let since = now.saturating_duration_since(self.last_status);
        if since < self.status_interval {
            return None;
        }
        let secs = since.as_secs_f64();
        let cycles_per_second = if secs > 0.0 {
            self.cycles_since_status as f64 / secs
        } else {
            0.0
        };
        self.cycles_since_status = 0;
        self.last_status = now;
        Some(self.status_with(cycles_per_second))
    }

    /// Status at the current position without touching the rate counters
    pub fn status(&self) -> Status {
        self.status_with(0.0)
    }

    fn status_with(&self, cycles_per_second: f64) -> Status {
        Status {
            fraction_done: self.fraction_done(),
            cycles_per_second,
            batch_size: self.batch_size,
            fallbacks: self.driver.fallbacks(),
        }
    }

    /// Drive the pass to completion, checking for termination at every cycle boundary
    pub fn run<H: Host + ?Sized>(&mut self, host: &mut H) -> Result<Outcome> {
        info!(
            "rendering {}x{} from a {}x{} source with {} targets",
            self.raster.width(),
            self.raster.height(),
            self.source.width(),
            self.source.height(),
            self.driver.targets().len()
        );

        while !self.is_complete() {
            if host.poll_termination_requested() {
                info!("received quit signal at {:.2}%; discarding raster", self.fraction_done() * 100.0);
                return Ok(Outcome::Terminated);
            }

            self.cycle()?;
            host.present(&self.raster)?;

            if let Some(status) = self.poll_status(Instant::now()) {
                host.report_status(&status);
            }
        }

        host.report_status(&self.status());
        info!("render complete after {} cycles", self.cycles);
        Ok(Outcome::Completed)
    }

    fn advance_cursor(&mut self) {
        self.pixels_done += 1;
        self.cursor.0 += 1;
        if self.cursor.0 >= self.raster.width() {
            self.cursor.0 = 0;
            self.cursor.1 += 1;
        }
    }
}
