use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::controllers::ports::file_presenter::FilePresenterPort;
use crate::core::data::pixel_buffer::PixelBuffer;

/// Writes exported frames as binary (P6) PPM images.
#[derive(Debug, Default, Clone, Copy)]
pub struct PpmFilePresenter;

impl PpmFilePresenter {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// P6 header followed by the raw RGB rows, top row first.
    pub fn encode<W: Write>(buffer: &PixelBuffer, mut writer: W) -> io::Result<()> {
        let size = buffer.size();
        write!(writer, "P6\n{} {}\n255\n", size.width(), size.height())?;
        writer.write_all(buffer.buffer())?;
        writer.flush()
    }
}

impl FilePresenterPort for PpmFilePresenter {
    fn present(&self, buffer: &PixelBuffer, filepath: &Path) -> io::Result<()> {
        Self::encode(buffer, BufWriter::new(File::create(filepath)?))?;
        log::info!("wrote {}", filepath.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::data::size::Size;

    fn two_pixels() -> PixelBuffer {
        PixelBuffer::from_data(Size::new(2, 1).unwrap(), vec![255, 0, 0, 0, 0, 255]).unwrap()
    }

    #[test]
    fn test_encode_writes_header_then_rgb() {
        let mut bytes = Vec::new();

        PpmFilePresenter::encode(&two_pixels(), &mut bytes).unwrap();

        assert_eq!(bytes, b"P6\n2 1\n255\n\xff\x00\x00\x00\x00\xff");
    }

    #[test]
    fn test_present_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.ppm");

        PpmFilePresenter::new().present(&two_pixels(), &path).unwrap();

        assert_eq!(std::fs::read(&path).unwrap().len(), 11 + 6);
    }

    #[test]
    fn test_present_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.ppm");

        assert!(PpmFilePresenter::new().present(&two_pixels(), &path).is_err());
    }
}
