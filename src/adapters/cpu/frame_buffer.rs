use crate::core::data::pixel_buffer::PixelBuffer;
use crate::core::data::size::Size;
use crate::pipeline::ports::frame_buffer::{FrameBuffer, FrameBufferDescriptor, PixelFormat};

/// Packed 24-bit depth and 8-bit stencil per pixel.
#[derive(Debug, Clone, PartialEq)]
pub struct DepthStencil {
    size: Size,
    values: Vec<u32>,
}

impl DepthStencil {
    const CLEAR: u32 = 0xFFFF_FF00;

    fn new(size: Size) -> Self {
        Self {
            size,
            values: vec![Self::CLEAR; size.pixel_count()],
        }
    }

    #[must_use]
    pub fn size(&self) -> Size {
        self.size
    }

    #[must_use]
    pub fn values(&self) -> &[u32] {
        &self.values
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CpuPixels {
    Rgb8(PixelBuffer),
    R32Float(Vec<f32>),
    /// Allocation was rejected.
    Unallocated,
}

/// Frame buffer held in host memory.
#[derive(Debug, Clone, PartialEq)]
pub struct CpuFrameBuffer {
    label: &'static str,
    size: Size,
    format: PixelFormat,
    pixels: CpuPixels,
    depth_stencil: Option<DepthStencil>,
    with_depth_stencil: bool,
}

impl CpuFrameBuffer {
    pub(crate) fn allocate(descriptor: &FrameBufferDescriptor, max_dimension: u32) -> Self {
        let mut frame_buffer = Self {
            label: descriptor.label,
            size: descriptor.size,
            format: descriptor.format,
            pixels: CpuPixels::Unallocated,
            depth_stencil: None,
            with_depth_stencil: descriptor.depth_stencil,
        };
        frame_buffer.reallocate(descriptor.size, max_dimension);
        frame_buffer
    }

    /// Drops the old storage and allocates zeroed storage at `size`.
    pub(crate) fn reallocate(&mut self, size: Size, max_dimension: u32) {
        self.size = size;

        if size.width() > max_dimension || size.height() > max_dimension {
            log::warn!(
                "frame buffer '{}' incomplete: {}x{} exceeds the {} pixel limit",
                self.label,
                size.width(),
                size.height(),
                max_dimension
            );
            self.pixels = CpuPixels::Unallocated;
            self.depth_stencil = None;
            return;
        }

        self.pixels = match self.format {
            PixelFormat::Rgb8 => CpuPixels::Rgb8(PixelBuffer::new(size)),
            PixelFormat::R32Float => CpuPixels::R32Float(vec![0.0; size.pixel_count()]),
        };
        self.depth_stencil = self.with_depth_stencil.then(|| DepthStencil::new(size));
    }

    #[must_use]
    pub fn pixels(&self) -> &CpuPixels {
        &self.pixels
    }

    /// Escape-time counts, when this is a complete `R32Float` buffer.
    #[must_use]
    pub fn iterations(&self) -> Option<&[f32]> {
        match &self.pixels {
            CpuPixels::R32Float(values) => Some(values),
            _ => None,
        }
    }

    pub(crate) fn iterations_mut(&mut self) -> Option<&mut [f32]> {
        match &mut self.pixels {
            CpuPixels::R32Float(values) => Some(values),
            _ => None,
        }
    }

    /// Colour image, when this is a complete `Rgb8` buffer.
    #[must_use]
    pub fn colours(&self) -> Option<&PixelBuffer> {
        match &self.pixels {
            CpuPixels::Rgb8(buffer) => Some(buffer),
            _ => None,
        }
    }

    pub(crate) fn colours_mut(&mut self) -> Option<&mut PixelBuffer> {
        match &mut self.pixels {
            CpuPixels::Rgb8(buffer) => Some(buffer),
            _ => None,
        }
    }

    #[must_use]
    pub fn depth_stencil(&self) -> Option<&DepthStencil> {
        self.depth_stencil.as_ref()
    }
}

impl FrameBuffer for CpuFrameBuffer {
    fn label(&self) -> &'static str {
        self.label
    }

    fn size(&self) -> Size {
        self.size
    }

    fn format(&self) -> PixelFormat {
        self.format
    }

    fn has_depth_stencil(&self) -> bool {
        self.depth_stencil.is_some()
    }

    fn is_complete(&self) -> bool {
        !matches!(self.pixels, CpuPixels::Unallocated)
    }
}
