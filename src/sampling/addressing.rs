//! Infinite mirror addressing.
//!
//! The source image is tiled over the whole plane, every odd tile along an
//! axis being the reflection of its neighbours, so a warped coordinate that
//! leaves the image continues seamlessly into a mirrored copy.

use crate::simulation::states::Coordinate;

/// Map a render/warped coordinate onto an integral position inside the source image.
///
/// The result always lies in `[0, w) x [0, h)` for finite input.
pub fn to_input_coords(image_size: (u32, u32), coord: Coordinate) -> Coordinate {
    let (w, h) = image_size;
    Coordinate::new(mirror_axis(coord.x, w as f64), mirror_axis(coord.y, h as f64))
}

fn mirror_axis(v: f64, len: f64) -> f64 {
    // Odd tiles are reflected
    let mirrored = (v / len).floor().rem_euclid(2.0) == 1.0;

    // Position within the base tile, non-negative for negative v
    let mut p = v.rem_euclid(len);
    if mirrored {
        p = len - p;
    }

    let p = p.round();
    // The far edge of a tile is the near edge of the next one
    if p >= len {
        0.0
    } else {
        p
    }
}
