use std::path::PathBuf;

use pill_check_core::BufferError;

/// Configuration rejected when a validator is constructed.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("vertical band fraction must be in (0, 1], got {0}")]
    InvalidBandFraction(f64),

    #[error("time window must span 1..=1440 minutes, got {0}")]
    InvalidTimeWindow(u32),

    #[error("plot area must have a finite, positive size (width={width}, height={height})")]
    InvalidPlotArea { width: f64, height: f64 },
}

/// The image source could not produce a pixel buffer.
#[derive(thiserror::Error, Debug)]
pub enum ImageLoadError {
    #[error("failed to read image {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[cfg(feature = "image")]
    #[error("failed to decode image {path}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error(transparent)]
    Buffer(#[from] BufferError),
}
