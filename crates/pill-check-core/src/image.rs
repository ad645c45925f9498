/// Errors raised when a raw pixel buffer does not describe a valid image.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum BufferError {
    #[error("unsupported channel count {channels} (expected 3 or 4)")]
    UnsupportedChannels { channels: usize },

    #[error("invalid pixel buffer length (expected {expected} bytes, got {got})")]
    InvalidLength { expected: usize, got: usize },

    #[error("pixel buffer dimensions overflow (width={width}, height={height})")]
    DimensionsOverflow { width: usize, height: usize },
}

/// Borrowed, read-only view of an interleaved RGB or RGBA image.
#[derive(Clone, Copy, Debug)]
pub struct PixelView<'a> {
    width: usize,
    height: usize,
    channels: usize,
    data: &'a [u8], // row-major, len = w*h*channels
}

impl<'a> PixelView<'a> {
    pub fn new(
        width: usize,
        height: usize,
        channels: usize,
        data: &'a [u8],
    ) -> Result<Self, BufferError> {
        check_layout(width, height, channels, data.len())?;
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn channels(&self) -> usize {
        self.channels
    }

    #[inline]
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// RGB triple at `(x, y)`, ignoring alpha. `None` outside the image.
    pub fn rgb_at(&self, x: usize, y: usize) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y * self.width + x) * self.channels;
        let px = self.data.get(offset..offset + 3)?;
        Some([px[0], px[1], px[2]])
    }
}

/// Owned decoded image. Dimensions are fixed at construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    channels: usize,
    data: Vec<u8>,
}

impl PixelBuffer {
    pub fn new(
        width: usize,
        height: usize,
        channels: usize,
        data: Vec<u8>,
    ) -> Result<Self, BufferError> {
        check_layout(width, height, channels, data.len())?;
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    /// Solid-color RGB buffer; handy for synthetic charts.
    pub fn filled_rgb(width: usize, height: usize, rgb: [u8; 3]) -> Result<Self, BufferError> {
        let len = byte_len(width, height, 3)?;
        let data = rgb.iter().copied().cycle().take(len).collect();
        Ok(Self {
            width,
            height,
            channels: 3,
            data,
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn view(&self) -> PixelView<'_> {
        PixelView {
            width: self.width,
            height: self.height,
            channels: self.channels,
            data: &self.data,
        }
    }

    /// Overwrite the RGB part of one pixel. Out-of-bounds writes are ignored.
    ///
    /// Only meant for building fixtures before the buffer enters the pipeline.
    pub fn put_rgb(&mut self, x: usize, y: usize, rgb: [u8; 3]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let offset = (y * self.width + x) * self.channels;
        self.data[offset..offset + 3].copy_from_slice(&rgb);
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }
}

fn check_layout(
    width: usize,
    height: usize,
    channels: usize,
    len: usize,
) -> Result<(), BufferError> {
    if channels != 3 && channels != 4 {
        return Err(BufferError::UnsupportedChannels { channels });
    }
    let expected = byte_len(width, height, channels)?;
    if len != expected {
        return Err(BufferError::InvalidLength { expected, got: len });
    }
    Ok(())
}

fn byte_len(width: usize, height: usize, channels: usize) -> Result<usize, BufferError> {
    width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(channels))
        .ok_or(BufferError::DimensionsOverflow { width, height })
}
