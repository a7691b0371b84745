use pixels::wgpu;
use thiserror::Error;

use crate::adapters::pixel_format::PixelFormatError;
use crate::pipeline::errors::RenderError;

#[derive(Debug, Error)]
pub enum PresentError {
    #[error("pixels surface failed: {0}")]
    Pixels(#[from] pixels::Error),
    #[error("pixels texture failed: {0}")]
    Texture(#[from] pixels::TextureError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    PixelFormat(#[from] PixelFormatError),
    #[error("no compatible graphics adapter")]
    NoAdapter,
    #[error("could not create surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),
    #[error("could not open device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
    #[error("surface error: {0}")]
    Surface(#[from] wgpu::SurfaceError),
}
