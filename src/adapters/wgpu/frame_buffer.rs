use pixels::wgpu;

use crate::core::data::size::Size;
use crate::pipeline::ports::frame_buffer::{FrameBuffer, FrameBufferDescriptor, PixelFormat};

pub const DEPTH_STENCIL_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth24PlusStencil8;

#[must_use]
pub fn texture_format(format: PixelFormat) -> wgpu::TextureFormat {
    match format {
        PixelFormat::Rgb8 => wgpu::TextureFormat::Rgba8Unorm,
        PixelFormat::R32Float => wgpu::TextureFormat::R32Float,
    }
}

#[derive(Debug)]
struct Attachment {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
}

fn create_attachment(
    device: &wgpu::Device,
    label: &'static str,
    size: Size,
    format: wgpu::TextureFormat,
    usage: wgpu::TextureUsages,
) -> Attachment {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d {
            width: size.width(),
            height: size.height(),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage,
        view_formats: &[],
    });
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

    Attachment { texture, view }
}

/// GPU render target: a colour texture plus an optional depth/stencil texture.
#[derive(Debug)]
pub struct WgpuFrameBuffer {
    label: &'static str,
    size: Size,
    format: PixelFormat,
    colour: Option<Attachment>,
    depth_stencil: Option<Attachment>,
    with_depth_stencil: bool,
}

impl WgpuFrameBuffer {
    pub(crate) fn allocate(device: &wgpu::Device, descriptor: &FrameBufferDescriptor) -> Self {
        let mut frame_buffer = Self {
            label: descriptor.label,
            size: descriptor.size,
            format: descriptor.format,
            colour: None,
            depth_stencil: None,
            with_depth_stencil: descriptor.depth_stencil,
        };
        frame_buffer.reallocate(device, descriptor.size);
        frame_buffer
    }

    /// Destroys the current textures and creates new ones at `size`.
    ///
    /// A rejected allocation leaves the buffer incomplete and is logged.
    pub(crate) fn reallocate(&mut self, device: &wgpu::Device, size: Size) {
        if let Some(old) = self.colour.take() {
            old.texture.destroy();
        }
        if let Some(old) = self.depth_stencil.take() {
            old.texture.destroy();
        }
        self.size = size;

        let max = device.limits().max_texture_dimension_2d;
        if size.width() > max || size.height() > max {
            log::warn!(
                "frame buffer '{}' incomplete: {}x{} exceeds the {} pixel limit",
                self.label,
                size.width(),
                size.height(),
                max
            );
            return;
        }

        device.push_error_scope(wgpu::ErrorFilter::Validation);
        device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);

        let colour = create_attachment(
            device,
            self.label,
            size,
            texture_format(self.format),
            wgpu::TextureUsages::RENDER_ATTACHMENT
                | wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_SRC,
        );
        let depth_stencil = self.with_depth_stencil.then(|| {
            create_attachment(
                device,
                self.label,
                size,
                DEPTH_STENCIL_FORMAT,
                wgpu::TextureUsages::RENDER_ATTACHMENT,
            )
        });

        let out_of_memory = pollster::block_on(device.pop_error_scope());
        let validation = pollster::block_on(device.pop_error_scope());
        if let Some(error) = out_of_memory.or(validation) {
            log::warn!("frame buffer '{}' incomplete: {}", self.label, error);
            return;
        }

        self.colour = Some(colour);
        self.depth_stencil = depth_stencil;
    }

    pub(crate) fn texture(&self) -> Option<&wgpu::Texture> {
        self.colour.as_ref().map(|attachment| &attachment.texture)
    }

    pub(crate) fn view(&self) -> Option<&wgpu::TextureView> {
        self.colour.as_ref().map(|attachment| &attachment.view)
    }

    pub(crate) fn depth_stencil_view(&self) -> Option<&wgpu::TextureView> {
        self.depth_stencil.as_ref().map(|attachment| &attachment.view)
    }
}

impl FrameBuffer for WgpuFrameBuffer {
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
        self.colour.is_some()
    }
}
