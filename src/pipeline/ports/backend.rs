use crate::core::data::pixel_buffer::PixelBuffer;
use crate::core::data::size::Size;
use crate::core::palette::texture::PaletteLookup;
use crate::pipeline::errors::RenderError;
use crate::pipeline::ports::frame_buffer::{FrameBuffer, FrameBufferDescriptor};
use crate::pipeline::uniforms::{FractalUniforms, PaletteUniforms};

/// Where the downsample pass writes: the visible surface or an off-screen buffer.
pub enum PassTarget<'a, B: RenderBackend + ?Sized + 'a> {
    Surface(B::Surface<'a>),
    FrameBuffer(&'a mut B::FrameBuffer),
}

/// The three passes and the resources they run on.
///
/// Implementations execute passes in call order; a pass always observes the
/// complete output of the pass before it.
pub trait RenderBackend {
    type FrameBuffer: FrameBuffer;
    type PaletteLookup: PaletteLookup;
    type Surface<'a>
    where
        Self: 'a;

    fn create_frame_buffer(
        &mut self,
        descriptor: &FrameBufferDescriptor,
    ) -> Result<Self::FrameBuffer, RenderError>;

    fn resize_frame_buffer(
        &mut self,
        frame_buffer: &mut Self::FrameBuffer,
        size: Size,
    ) -> Result<(), RenderError>;

    fn create_palette_lookup(&mut self) -> Result<Self::PaletteLookup, RenderError>;

    /// Writes one escape-time count per pixel of `target`.
    fn fractal_pass(
        &mut self,
        target: &mut Self::FrameBuffer,
        uniforms: &FractalUniforms,
    ) -> Result<(), RenderError>;

    /// Colours `target` from the counts in `iterations` through `lookup`.
    fn palette_pass(
        &mut self,
        iterations: &Self::FrameBuffer,
        lookup: &Self::PaletteLookup,
        target: &mut Self::FrameBuffer,
        uniforms: &PaletteUniforms,
    ) -> Result<(), RenderError>;

    /// Filters `source` down (or copies it) to the target's resolution.
    fn downsample_pass<'a>(
        &mut self,
        source: &Self::FrameBuffer,
        target: PassTarget<'a, Self>,
    ) -> Result<(), RenderError>
    where
        Self: 'a;

    fn read_pixels(&mut self, frame_buffer: &Self::FrameBuffer) -> Result<PixelBuffer, RenderError>;
}
