//! Error type shared by the warp pipeline, its configuration and the host layer

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WarpError {
    /// Sampling mode name that is neither `nearest` nor `bilinear`
    #[error("unsupported interpolation mode: {0:?}")]
    UnsupportedInterpolation(String),

    /// Bilinear sampling reached past the last row/column of the source
    #[error("sample at ({x}, {y}) is outside the {width}x{height} source image")]
    SampleOutOfBounds {
        x: f64,
        y: f64,
        width: u32,
        height: u32,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, WarpError>;
