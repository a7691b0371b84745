//! Conversions between packed RGB frames and the RGBA layouts GPUs and windows expect.

use thiserror::Error;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum PixelFormatError {
    #[error("source length {0} is not a whole number of pixels")]
    PartialPixel(usize),
    #[error("destination holds {actual} bytes, expected {expected}")]
    LengthMismatch { expected: usize, actual: usize },
}

fn check_lengths(
    src_len: usize,
    src_stride: usize,
    dst_len: usize,
    dst_stride: usize,
) -> Result<(), PixelFormatError> {
    if src_len % src_stride != 0 {
        return Err(PixelFormatError::PartialPixel(src_len));
    }
    let expected = src_len / src_stride * dst_stride;
    if dst_len != expected {
        return Err(PixelFormatError::LengthMismatch {
            expected,
            actual: dst_len,
        });
    }
    Ok(())
}

/// Expands RGB to opaque RGBA.
pub fn copy_rgb_to_rgba(src: &[u8], dst: &mut [u8]) -> Result<(), PixelFormatError> {
    check_lengths(src.len(), 3, dst.len(), 4)?;

    for (src_pixel, dst_pixel) in src.chunks_exact(3).zip(dst.chunks_exact_mut(4)) {
        dst_pixel[..3].copy_from_slice(src_pixel);
        dst_pixel[3] = 255;
    }
    Ok(())
}

/// Drops the alpha channel of RGBA texels.
pub fn copy_rgba_to_rgb(src: &[u8], dst: &mut [u8]) -> Result<(), PixelFormatError> {
    check_lengths(src.len(), 4, dst.len(), 3)?;

    for (src_texel, dst_pixel) in src.chunks_exact(4).zip(dst.chunks_exact_mut(3)) {
        dst_pixel.copy_from_slice(&src_texel[..3]);
    }
    Ok(())
}
