//! Core state types for the coordinate warp.
//!
//! - `Particle<D>` using `SVector<f64, D>` (only `D = 2` is driven by the renderer)
//! - `Color` fixed-arity RGBA value, 8 bits per channel
//!
//! Target particles are built once per render pass and never mutated.
//! The projectile is a single particle reset in place for every pixel.

use nalgebra::{SVector, Vector2};

pub type NVec<const D: usize> = SVector<f64, D>;
pub type NVec2 = Vector2<f64>;

/// Position in render space or input space
pub type Coordinate = NVec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn channels(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub fn from_channels(c: [u8; 4]) -> Self {
        Self::rgba(c[0], c[1], c[2], c[3])
    }
}

#[derive(Debug, Clone)]
pub struct Particle<const D: usize> {
    pub x: NVec<D>, // position
    pub v: NVec<D>, // velocity, carried but never integrated
    pub f: NVec<D>, // force accumulator, rebuilt by every compute_force
    pub m: f64,     // mass, negative for the projectile
    pub color: Color, // decorative
}

impl<const D: usize> Particle<D> {
    pub fn new(x: NVec<D>, m: f64) -> Self {
        Self {
            x,
            v: NVec::<D>::zeros(),
            f: NVec::<D>::zeros(),
            m,
            color: Color::WHITE,
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Reuse this particle as a fresh projectile at `x`
    pub fn reset(&mut self, x: NVec<D>) {
        self.x = x;
        self.v = NVec::<D>::zeros();
        self.f = NVec::<D>::zeros();
    }
}

pub type Particle2 = Particle<2>;
