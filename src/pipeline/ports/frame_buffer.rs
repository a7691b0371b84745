use crate::core::data::size::Size;

/// Storage format of a frame buffer's colour image.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PixelFormat {
    /// 8-bit RGB, the colourised image.
    Rgb8,
    /// One 32-bit float per pixel, raw escape-time counts.
    R32Float,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FrameBufferDescriptor {
    pub label: &'static str,
    pub size: Size,
    pub format: PixelFormat,
    /// Allocate a combined depth/stencil companion with the colour image.
    pub depth_stencil: bool,
}

impl FrameBufferDescriptor {
    #[must_use]
    pub fn new(label: &'static str, size: Size, format: PixelFormat) -> Self {
        Self {
            label,
            size,
            format,
            depth_stencil: false,
        }
    }

    #[must_use]
    pub fn with_depth_stencil(mut self, depth_stencil: bool) -> Self {
        self.depth_stencil = depth_stencil;
        self
    }
}

/// An exclusively owned off-screen render target.
///
/// Resizing reallocates storage and keeps no pixel content. A depth/stencil
/// companion exists only when the buffer was created with one, and follows
/// every resize.
pub trait FrameBuffer {
    fn label(&self) -> &'static str;
    fn size(&self) -> Size;
    fn format(&self) -> PixelFormat;
    fn has_depth_stencil(&self) -> bool;

    /// `false` when the last allocation was rejected. Contents are undefined
    /// until a later resize succeeds.
    fn is_complete(&self) -> bool;
}
