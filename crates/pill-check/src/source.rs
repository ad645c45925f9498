//! Where pixel buffers come from.

use std::path::Path;

use pill_check_core::PixelBuffer;

use crate::error::ImageLoadError;

/// Produces a decoded pixel buffer for a path.
///
/// The validator only needs a fixed-size RGB(A) grid; decoding and color
/// normalization are the source's business.
pub trait ImageSource {
    fn load(&self, path: &Path) -> Result<PixelBuffer, ImageLoadError>;
}

impl<F> ImageSource for F
where
    F: Fn(&Path) -> Result<PixelBuffer, ImageLoadError>,
{
    fn load(&self, path: &Path) -> Result<PixelBuffer, ImageLoadError> {
        self(path)
    }
}

/// Decodes files with the `image` crate and converts them to RGB8.
#[cfg(feature = "image")]
#[derive(Clone, Copy, Debug, Default)]
pub struct FileImageSource;

#[cfg(feature = "image")]
impl ImageSource for FileImageSource {
    fn load(&self, path: &Path) -> Result<PixelBuffer, ImageLoadError> {
        let io_err = |source| ImageLoadError::Io {
            path: path.to_path_buf(),
            source,
        };
        let decoded = ::image::ImageReader::open(path)
            .map_err(io_err)?
            .with_guessed_format()
            .map_err(io_err)?
            .decode()
            .map_err(|source| ImageLoadError::Decode {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(crate::detect::pixel_buffer_from_rgb(decoded.to_rgb8())?)
    }
}
