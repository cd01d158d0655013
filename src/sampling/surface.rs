//! Pixel access over `image` buffers
//!
//! The warp reads the source through [`Surface`] and writes the destination
//! raster through [`SurfaceMut`]; both are implemented for `RgbaImage`.

use image::{Rgba, RgbaImage};

use crate::simulation::states::Color;

pub trait Surface {
    fn size(&self) -> (u32, u32);
    fn pixel_at(&self, x: u32, y: u32) -> Color;
}

pub trait SurfaceMut: Surface {
    fn set_pixel(&mut self, x: u32, y: u32, color: Color);
}

impl Surface for RgbaImage {
    fn size(&self) -> (u32, u32) {
        self.dimensions()
    }

    #[inline]
    fn pixel_at(&self, x: u32, y: u32) -> Color {
        Color::from_channels(self.get_pixel(x, y).0)
    }
}

impl SurfaceMut for RgbaImage {
    #[inline]
    fn set_pixel(&mut self, x: u32, y: u32, color: Color) {
        self.put_pixel(x, y, Rgba(color.channels()));
    }
}

/// Zeroed destination raster of the given size
pub fn create_raster(width: u32, height: u32) -> RgbaImage {
    RgbaImage::new(width, height)
}
