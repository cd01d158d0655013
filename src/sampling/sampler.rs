//! Color lookup at floating-point coordinates.

use std::str::FromStr;

use crate::error::{Result, WarpError};
use crate::sampling::surface::Surface;
use crate::simulation::states::{Color, Coordinate};

/// Sampling mode used after addressing
/// `interpolation: "nearest"` or `interpolation: "bilinear"`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interpolation {
    Nearest,
    Bilinear,
}

impl FromStr for Interpolation {
    type Err = WarpError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "nearest" | "none" => Ok(Interpolation::Nearest),
            "bilinear" | "linear" => Ok(Interpolation::Bilinear),
            _ => Err(WarpError::UnsupportedInterpolation(s.to_string())),
        }
    }
}

/// Color of `image` at `coord`.
///
/// `Bilinear` requires `coord` to lie inside `[0, w-1] x [0, h-1]`; outside of it
/// the lookup fails with [`WarpError::SampleOutOfBounds`] and the caller decides
/// whether to fall back to [`sample_clamped`].
pub fn sample<S: Surface + ?Sized>(image: &S, coord: Coordinate, mode: Interpolation) -> Result<Color> {
    let (w, h) = image.size();
    match mode {
        Interpolation::Nearest => {
            let x1 = clamp_index(coord.x.floor(), w);
            let y1 = clamp_index(coord.y.floor(), h);
            Ok(image.pixel_at(x1, y1))
        }
        Interpolation::Bilinear => {
            let (x1, y1) = (coord.x.floor(), coord.y.floor());
            let (x2, y2) = (coord.x.ceil(), coord.y.ceil());
            let max_x = w as f64 - 1.0;
            let max_y = h as f64 - 1.0;
            // NaN fails every comparison below and must be rejected too
            let inside = x1 >= 0.0 && y1 >= 0.0 && x2 <= max_x && y2 <= max_y;
            if !inside {
                return Err(WarpError::SampleOutOfBounds {
                    x: coord.x,
                    y: coord.y,
                    width: w,
                    height: h,
                });
            }
            Ok(blend(
                image,
                (x1 as u32, y1 as u32),
                (x2 as u32, y2 as u32),
                coord.x - x1,
                coord.y - y1,
            ))
        }
    }
}

/// Bilinear lookup with every neighbour clamped onto the grid
pub fn sample_clamped<S: Surface + ?Sized>(image: &S, coord: Coordinate) -> Color {
    let (w, h) = image.size();
    let (fx, fy) = (coord.x.floor(), coord.y.floor());
    let xp = if coord.x.is_finite() { coord.x - fx } else { 0.0 };
    let yp = if coord.y.is_finite() { coord.y - fy } else { 0.0 };
    blend(
        image,
        (clamp_index(fx, w), clamp_index(fy, h)),
        (clamp_index(coord.x.ceil(), w), clamp_index(coord.y.ceil(), h)),
        xp.clamp(0.0, 1.0),
        yp.clamp(0.0, 1.0),
    )
}

// Area-weighted blend of the four neighbours; weights sum to 1
fn blend<S: Surface + ?Sized>(image: &S, p1: (u32, u32), p2: (u32, u32), xp: f64, yp: f64) -> Color {
    let neighbours = [
        (image.pixel_at(p1.0, p1.1), (1.0 - xp) * (1.0 - yp)),
        (image.pixel_at(p1.0, p2.1), (1.0 - xp) * yp),
        (image.pixel_at(p2.0, p1.1), xp * (1.0 - yp)),
        (image.pixel_at(p2.0, p2.1), xp * yp),
    ];

    let mut acc = [0.0f64; 4];
    for (color, weight) in neighbours {
        for (a, c) in acc.iter_mut().zip(color.channels()) {
            *a += weight * c as f64;
        }
    }

    Color::from_channels(acc.map(|c| c.round().clamp(0.0, 255.0) as u8))
}

// Negative and NaN collapse to 0 through the saturating cast
fn clamp_index(v: f64, len: u32) -> u32 {
    (v.max(0.0) as u32).min(len.saturating_sub(1))
}
