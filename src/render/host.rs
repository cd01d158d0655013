//! Host side of the render loop: termination, presentation, status and image files

use std::fmt;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use image::{DynamicImage, RgbaImage};
use log::{debug, info};
use signal_hook::consts::{SIGINT, SIGTERM};

use crate::error::{Result, WarpError};

/// Progress snapshot handed to the host about once per status interval
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Status {
    pub fraction_done: f64, // 0.0 ..= 1.0
    pub cycles_per_second: f64,
    pub batch_size: u64,
    pub fallbacks: u64, // clamped bilinear lookups so far
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "FPS={:.1}  done={:.2}%  pixels/cycle={}",
            self.cycles_per_second,
            self.fraction_done * 100.0,
            self.batch_size
        )?;
        if self.fallbacks > 0 {
            write!(f, "  clamped={}", self.fallbacks)?;
        }
        Ok(())
    }
}

/// What the render loop needs from its environment
pub trait Host {
    /// Polled once per cycle, before the batch
    fn poll_termination_requested(&mut self) -> bool;

    /// Called once per cycle, after the batch
    fn present(&mut self, raster: &RgbaImage) -> Result<()>;

    fn report_status(&mut self, status: &Status);
}

/// Window-less host: logs progress and stops when its flag is raised
#[derive(Debug, Default, Clone)]
pub struct HeadlessHost {
    stop: Arc<AtomicBool>,
    presented: u64,
}

impl HeadlessHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Host whose flag is raised by SIGINT/SIGTERM, the headless quit signal
    pub fn with_signal_handlers() -> Result<Self> {
        let host = Self::new();
        for sig in [SIGINT, SIGTERM] {
            signal_hook::flag::register(sig, host.stop_flag())?;
        }
        Ok(host)
    }

    /// Shared flag; storing `true` ends the pass at the next cycle boundary
    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    pub fn presented(&self) -> u64 {
        self.presented
    }
}

impl Host for HeadlessHost {
    fn poll_termination_requested(&mut self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }

    fn present(&mut self, _raster: &RgbaImage) -> Result<()> {
        self.presented += 1;
        Ok(())
    }

    fn report_status(&mut self, status: &Status) {
        info!("{status}");
    }
}

/// Load a source image as 8-bit RGBA
pub fn load_image(path: &Path) -> Result<RgbaImage> {
    let img = image::open(path)?.to_rgba8();
    if img.width() == 0 || img.height() == 0 {
        return Err(WarpError::InvalidConfig(format!("source image {} is empty", path.display())));
    }
    debug!("loaded {} ({}x{})", path.display(), img.width(), img.height());
    Ok(img)
}

/// Save the raster as 8-bit RGB, format chosen from the file extension
pub fn save_image(raster: &RgbaImage, path: &Path) -> Result<()> {
    DynamicImage::ImageRgba8(raster.clone()).to_rgb8().save(path)?;
    info!("saved {} ({}x{})", path.display(), raster.width(), raster.height());
    Ok(())
}
