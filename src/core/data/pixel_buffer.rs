use crate::core::data::colour::Rgb;
use crate::core::data::size::Size;
use thiserror::Error;

fn size_to_buffer_len(size: Size) -> usize {
    size.pixel_count() * 3
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PixelBufferError {
    #[error("pixel at x:{x}, y:{y} outside of {width}x{height} buffer")]
    PixelOutsideBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
    #[error("size {expected} does not match buffer size {actual}")]
    BoundsMismatch { expected: usize, actual: usize },
}

pub type PixelBufferData = Vec<u8>;

/// Tightly packed 8-bit RGB image, rows top to bottom.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    size: Size,
    buffer: PixelBufferData,
}

impl PixelBuffer {
    #[must_use]
    pub fn new(size: Size) -> Self {
        Self {
            size,
            buffer: vec![0; size_to_buffer_len(size)],
        }
    }

    pub fn from_data(size: Size, buffer: PixelBufferData) -> Result<Self, PixelBufferError> {
        let expected = size_to_buffer_len(size);

        if expected != buffer.len() {
            return Err(PixelBufferError::BoundsMismatch {
                expected,
                actual: buffer.len(),
            });
        }

        Ok(Self { size, buffer })
    }

    #[must_use]
    pub fn size(&self) -> Size {
        self.size
    }

    #[must_use]
    pub fn buffer(&self) -> &PixelBufferData {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut [u8] {
        &mut self.buffer
    }

    #[must_use]
    pub fn buffer_size(&self) -> usize {
        self.buffer.len()
    }

    /// Reallocates to `size`, discarding previous contents.
    pub fn resize(&mut self, size: Size) {
        self.size = size;
        self.buffer = vec![0; size_to_buffer_len(size)];
    }

    pub fn pixel(&self, x: u32, y: u32) -> Result<[u8; 3], PixelBufferError> {
        let index = self.index_of(x, y)?;
        Ok([
            self.buffer[index],
            self.buffer[index + 1],
            self.buffer[index + 2],
        ])
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, colour: Rgb) -> Result<(), PixelBufferError> {
        let index = self.index_of(x, y)?;
        let [r, g, b] = colour.to_rgb8();

        self.buffer[index] = r;
        self.buffer[index + 1] = g;
        self.buffer[index + 2] = b;

        Ok(())
    }

    fn index_of(&self, x: u32, y: u32) -> Result<usize, PixelBufferError> {
        if x >= self.size.width() || y >= self.size.height() {
            return Err(PixelBufferError::PixelOutsideBounds {
                x,
                y,
                width: self.size.width(),
                height: self.size.height(),
            });
        }

        Ok((y as usize * self.size.width() as usize + x as usize) * 3)
    }
}
