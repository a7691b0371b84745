use thiserror::Error;

use crate::adapters::shader::errors::ShaderError;
use crate::core::data::pixel_buffer::PixelBufferError;
use crate::core::data::size::Size;
use crate::core::fractals::mandelbrot::MandelbrotError;
use crate::pipeline::ports::frame_buffer::PixelFormat;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("{pass} pass expected a {expected:?} buffer, got {actual:?}")]
    FormatMismatch {
        pass: &'static str,
        expected: PixelFormat,
        actual: PixelFormat,
    },
    #[error("{pass} pass expected {expected:?}, got {actual:?}")]
    SizeMismatch {
        pass: &'static str,
        expected: Size,
        actual: Size,
    },
    #[error("frame buffer '{label}' is incomplete")]
    IncompleteFrameBuffer { label: &'static str },
    #[error(transparent)]
    Shader(#[from] ShaderError),
    #[error(transparent)]
    Fractal(#[from] MandelbrotError),
    #[error(transparent)]
    PixelBuffer(#[from] PixelBufferError),
    #[error("render device error: {0}")]
    Device(String),
}
