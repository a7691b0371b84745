use pixels::wgpu;

use crate::core::data::colour::Rgb;
use crate::core::palette::palette::PaletteFilter;
use crate::core::palette::texture::{PaletteLookup, fit_to_width};

/// 1-D Rgba8Unorm palette texture and the sampler that reads it.
#[derive(Debug)]
pub struct WgpuPaletteLookup {
    device: std::sync::Arc<wgpu::Device>,
    queue: std::sync::Arc<wgpu::Queue>,
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    width: u32,
    nearest: wgpu::Sampler,
    linear: wgpu::Sampler,
    filter: PaletteFilter,
}

fn create_texture(device: &wgpu::Device, width: u32) -> (wgpu::Texture, wgpu::TextureView) {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("palette"),
        size: wgpu::Extent3d {
            width,
            height: 1,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D1,
        format: wgpu::TextureFormat::Rgba8Unorm,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    (texture, view)
}

fn create_sampler(device: &wgpu::Device, filter: wgpu::FilterMode) -> wgpu::Sampler {
    device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("palette"),
        address_mode_u: wgpu::AddressMode::ClampToEdge,
        address_mode_v: wgpu::AddressMode::ClampToEdge,
        address_mode_w: wgpu::AddressMode::ClampToEdge,
        mag_filter: filter,
        min_filter: filter,
        mipmap_filter: wgpu::FilterMode::Nearest,
        ..Default::default()
    })
}

impl WgpuPaletteLookup {
    pub(crate) fn new(
        device: std::sync::Arc<wgpu::Device>,
        queue: std::sync::Arc<wgpu::Queue>,
    ) -> Self {
        let (texture, view) = create_texture(&device, 1);
        let nearest = create_sampler(&device, wgpu::FilterMode::Nearest);
        let linear = create_sampler(&device, wgpu::FilterMode::Linear);

        Self {
            device,
            queue,
            texture,
            view,
            width: 1,
            nearest,
            linear,
            filter: PaletteFilter::Nearest,
        }
    }

    pub(crate) fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    pub(crate) fn sampler(&self) -> &wgpu::Sampler {
        match self.filter {
            PaletteFilter::Nearest => &self.nearest,
            PaletteFilter::Linear => &self.linear,
        }
    }
}

impl PaletteLookup for WgpuPaletteLookup {
    fn upload(&mut self, colours: &[Rgb]) {
        let max_width = self.device.limits().max_texture_dimension_1d as usize;
        if colours.len() > max_width {
            log::warn!(
                "palette of {} colours exceeds the device limit of {}, resampling",
                colours.len(),
                max_width
            );
        }
        let colours = fit_to_width(colours, max_width);

        // Zero-width textures are invalid; an empty palette keeps one black texel.
        let texels: Vec<u8> = if colours.is_empty() {
            Rgb::BLACK.to_rgba8().to_vec()
        } else {
            colours.iter().flat_map(|colour| colour.to_rgba8()).collect()
        };
        let width = (texels.len() / 4) as u32;

        if width != self.width {
            self.texture.destroy();
            let (texture, view) = create_texture(&self.device, width);
            self.texture = texture;
            self.view = view;
            self.width = width;
        }

        self.queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &texels,
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(width * 4),
                rows_per_image: None,
            },
            wgpu::Extent3d {
                width,
                height: 1,
                depth_or_array_layers: 1,
            },
        );
    }

    fn set_filter(&mut self, filter: PaletteFilter) {
        self.filter = filter;
    }
}
