use std::path::Path;

use crate::core::data::pixel_buffer::PixelBuffer;

/// Encodes a finished frame to a file.
pub trait FilePresenterPort {
    fn present(&self, buffer: &PixelBuffer, filepath: &Path) -> std::io::Result<()>;
}
