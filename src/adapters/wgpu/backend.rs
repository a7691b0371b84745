use std::sync::Arc;
use std::sync::mpsc;

use pixels::wgpu;

use crate::adapters::pixel_format::copy_rgba_to_rgb;
use crate::adapters::shader::uniform_block::UniformType;
use crate::adapters::wgpu::frame_buffer::{DEPTH_STENCIL_FORMAT, WgpuFrameBuffer, texture_format};
use crate::adapters::wgpu::lookup::WgpuPaletteLookup;
use crate::adapters::wgpu::shader::{
    Binding, DOWNSAMPLE_FRAGMENT, FRACTAL_FRAGMENT, FULLSCREEN_VERTEX, PALETTE_FRAGMENT,
    ProgramSource, ShaderProgram,
};
use crate::core::data::pixel_buffer::PixelBuffer;
use crate::core::data::size::Size;
use crate::pipeline::errors::RenderError;
use crate::pipeline::ports::backend::{PassTarget, RenderBackend};
use crate::pipeline::ports::frame_buffer::{FrameBuffer, FrameBufferDescriptor, PixelFormat};
use crate::pipeline::uniforms::{FractalUniforms, PaletteUniforms};

const FRACTAL_UNIFORMS: &[(&str, UniformType)] = &[
    ("resolution", UniformType::Vec2F32),
    ("center_hi", UniformType::Vec2F32),
    ("center_lo", UniformType::Vec2F32),
    ("zoom", UniformType::F32),
    ("max_iterations", UniformType::U32),
];
const PALETTE_UNIFORMS: &[(&str, UniformType)] = &[("palette_size", UniformType::U32)];
const DOWNSAMPLE_UNIFORMS: &[(&str, UniformType)] = &[
    ("target_resolution", UniformType::Vec2F32),
    ("decode_srgb", UniformType::U32),
];

const FRACTAL_BINDINGS: &[Binding] = &[];
const PALETTE_BINDINGS: &[Binding] = &[
    Binding::UnfilterableTexture2d,
    Binding::Texture1d,
    Binding::Sampler,
];
const DOWNSAMPLE_BINDINGS: &[Binding] = &[Binding::Texture2d, Binding::Sampler];

const COLOUR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

/// Swap-chain image the downsample pass draws into.
#[derive(Debug)]
pub struct SurfaceTarget<'a> {
    pub view: &'a wgpu::TextureView,
    pub size: Size,
    pub format: wgpu::TextureFormat,
}

/// Programs specialised on render target layout.
#[derive(Debug)]
struct Programs {
    fractal: ShaderProgram,
    palette: ShaderProgram,
    palette_depth: ShaderProgram,
    downsample_offscreen: ShaderProgram,
    downsample_offscreen_depth: ShaderProgram,
    downsample_surface: Option<ShaderProgram>,
}

fn program(
    device: &wgpu::Device,
    label: &'static str,
    fragment: &str,
    uniforms: &[(&'static str, UniformType)],
    bindings: &[Binding],
    target_format: wgpu::TextureFormat,
    depth_stencil: bool,
) -> Result<ShaderProgram, RenderError> {
    let program = ShaderProgram::new(
        device,
        &ProgramSource {
            label,
            vertex: FULLSCREEN_VERTEX,
            fragment,
            uniforms,
            bindings,
            target_format,
            depth_stencil_format: depth_stencil.then_some(DEPTH_STENCIL_FORMAT),
        },
    )?;
    Ok(program)
}

impl Programs {
    fn new(device: &wgpu::Device) -> Result<Self, RenderError> {
        Ok(Self {
            fractal: program(
                device,
                "fractal",
                FRACTAL_FRAGMENT,
                FRACTAL_UNIFORMS,
                FRACTAL_BINDINGS,
                texture_format(PixelFormat::R32Float),
                false,
            )?,
            palette: program(
                device,
                "palette",
                PALETTE_FRAGMENT,
                PALETTE_UNIFORMS,
                PALETTE_BINDINGS,
                COLOUR_FORMAT,
                false,
            )?,
            palette_depth: program(
                device,
                "palette",
                PALETTE_FRAGMENT,
                PALETTE_UNIFORMS,
                PALETTE_BINDINGS,
                COLOUR_FORMAT,
                true,
            )?,
            downsample_offscreen: program(
                device,
                "downsample",
                DOWNSAMPLE_FRAGMENT,
                DOWNSAMPLE_UNIFORMS,
                DOWNSAMPLE_BINDINGS,
                COLOUR_FORMAT,
                false,
            )?,
            downsample_offscreen_depth: program(
                device,
                "downsample",
                DOWNSAMPLE_FRAGMENT,
                DOWNSAMPLE_UNIFORMS,
                DOWNSAMPLE_BINDINGS,
                COLOUR_FORMAT,
                true,
            )?,
            downsample_surface: None,
        })
    }
}

/// Three-pass renderer on a wgpu device.
#[derive(Debug)]
pub struct WgpuBackend {
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    programs: Programs,
    colour_sampler: wgpu::Sampler,
}

impl WgpuBackend {
    pub fn new(device: Arc<wgpu::Device>, queue: Arc<wgpu::Queue>) -> Result<Self, RenderError> {
        let programs = Programs::new(&device)?;
        let colour_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("colour"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        log::info!("wgpu backend ready");

        Ok(Self {
            device,
            queue,
            programs,
            colour_sampler,
        })
    }

    #[must_use]
    pub fn device(&self) -> &Arc<wgpu::Device> {
        &self.device
    }

    #[must_use]
    pub fn queue(&self) -> &Arc<wgpu::Queue> {
        &self.queue
    }
}

/// Built on first use and rebuilt whenever the surface format changes.
fn surface_program<'p>(
    device: &wgpu::Device,
    slot: &'p mut Option<ShaderProgram>,
    format: wgpu::TextureFormat,
) -> Result<&'p mut ShaderProgram, RenderError> {
    let stale = slot
        .as_ref()
        .is_none_or(|program| program.target_format() != format);

    if stale {
        log::debug!("building surface downsample program for {:?}", format);
        *slot = Some(program(
            device,
            "downsample",
            DOWNSAMPLE_FRAGMENT,
            DOWNSAMPLE_UNIFORMS,
            DOWNSAMPLE_BINDINGS,
            format,
            false,
        )?);
    }

    slot.as_mut()
        .ok_or_else(|| RenderError::Device("surface program missing".to_string()))
}

fn complete_view<'a>(frame_buffer: &'a WgpuFrameBuffer) -> Result<&'a wgpu::TextureView, RenderError> {
    frame_buffer
        .view()
        .ok_or(RenderError::IncompleteFrameBuffer {
            label: frame_buffer.label(),
        })
}

fn expect_format(
    pass: &'static str,
    frame_buffer: &WgpuFrameBuffer,
    expected: PixelFormat,
) -> Result<(), RenderError> {
    if frame_buffer.format() == expected {
        Ok(())
    } else {
        Err(RenderError::FormatMismatch {
            pass,
            expected,
            actual: frame_buffer.format(),
        })
    }
}

/// Records and submits one full-screen draw with `program` into `colour`.
fn draw(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    program: &ShaderProgram,
    bind_group: &wgpu::BindGroup,
    colour: &wgpu::TextureView,
    depth_stencil: Option<&wgpu::TextureView>,
) {
    let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
        label: Some(program.label()),
    });

    {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some(program.label()),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: colour,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: depth_stencil.map(|view| {
                wgpu::RenderPassDepthStencilAttachment {
                    view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(0),
                        store: wgpu::StoreOp::Store,
                    }),
                }
            }),
            ..Default::default()
        });
        pass.set_pipeline(program.pipeline());
        pass.set_bind_group(0, bind_group, &[]);
        pass.draw(0..3, 0..1);
    }

    queue.submit(Some(encoder.finish()));
}

fn padded_bytes_per_row(width: u32) -> u32 {
    let unpadded = width * 4;
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    unpadded.div_ceil(align) * align
}

impl RenderBackend for WgpuBackend {
    type FrameBuffer = WgpuFrameBuffer;
    type PaletteLookup = WgpuPaletteLookup;
    type Surface<'a> = SurfaceTarget<'a>;

    fn create_frame_buffer(
        &mut self,
        descriptor: &FrameBufferDescriptor,
    ) -> Result<WgpuFrameBuffer, RenderError> {
        Ok(WgpuFrameBuffer::allocate(&self.device, descriptor))
    }

    fn resize_frame_buffer(
        &mut self,
        frame_buffer: &mut WgpuFrameBuffer,
        size: Size,
    ) -> Result<(), RenderError> {
        frame_buffer.reallocate(&self.device, size);
        Ok(())
    }

    fn create_palette_lookup(&mut self) -> Result<WgpuPaletteLookup, RenderError> {
        Ok(WgpuPaletteLookup::new(
            Arc::clone(&self.device),
            Arc::clone(&self.queue),
        ))
    }

    fn fractal_pass(
        &mut self,
        target: &mut WgpuFrameBuffer,
        uniforms: &FractalUniforms,
    ) -> Result<(), RenderError> {
        expect_format("fractal", target, PixelFormat::R32Float)?;
        let view = complete_view(target)?;

        let program = &mut self.programs.fractal;
        let (center_hi, center_lo) = uniforms.center_split();
        let resolution = uniforms.resolution;
        let block = program.uniforms_mut();
        block.set_vec2_by_name(
            "resolution",
            [resolution.width() as f32, resolution.height() as f32],
        );
        block.set_vec2_by_name("center_hi", center_hi);
        block.set_vec2_by_name("center_lo", center_lo);
        block.set_f32_by_name("zoom", uniforms.zoom as f32);
        block.set_u32_by_name("max_iterations", uniforms.max_iterations);
        program.flush_uniforms(&self.queue);

        let bind_group = program.bind_group(&self.device, &[]);
        draw(&self.device, &self.queue, program, &bind_group, view, None);
        Ok(())
    }

    fn palette_pass(
        &mut self,
        iterations: &WgpuFrameBuffer,
        lookup: &WgpuPaletteLookup,
        target: &mut WgpuFrameBuffer,
        uniforms: &PaletteUniforms,
    ) -> Result<(), RenderError> {
        expect_format("palette", iterations, PixelFormat::R32Float)?;
        expect_format("palette", target, PixelFormat::Rgb8)?;
        let source = complete_view(iterations)?;
        let colour = complete_view(target)?;

        let depth_stencil = target.depth_stencil_view();
        let program = if depth_stencil.is_some() {
            &mut self.programs.palette_depth
        } else {
            &mut self.programs.palette
        };
        program
            .uniforms_mut()
            .set_u32_by_name("palette_size", uniforms.palette_size);
        program.flush_uniforms(&self.queue);

        let bind_group = program.bind_group(
            &self.device,
            &[
                wgpu::BindingResource::TextureView(source),
                wgpu::BindingResource::TextureView(lookup.view()),
                wgpu::BindingResource::Sampler(lookup.sampler()),
            ],
        );
        draw(&self.device, &self.queue, program, &bind_group, colour, depth_stencil);
        Ok(())
    }

    fn downsample_pass<'a>(
        &mut self,
        source: &WgpuFrameBuffer,
        target: PassTarget<'a, Self>,
    ) -> Result<(), RenderError>
    where
        Self: 'a,
    {
        expect_format("downsample", source, PixelFormat::Rgb8)?;
        let source_view = complete_view(source)?;

        let (program, colour, depth_stencil, size, decode_srgb) = match target {
            PassTarget::Surface(surface) => {
                let program = surface_program(
                    &self.device,
                    &mut self.programs.downsample_surface,
                    surface.format,
                )?;
                (
                    program,
                    surface.view,
                    None,
                    surface.size,
                    surface.format.is_srgb(),
                )
            }
            PassTarget::FrameBuffer(frame_buffer) => {
                expect_format("downsample", frame_buffer, PixelFormat::Rgb8)?;
                let colour = complete_view(frame_buffer)?;
                let depth_stencil = frame_buffer.depth_stencil_view();
                let program = if depth_stencil.is_some() {
                    &mut self.programs.downsample_offscreen_depth
                } else {
                    &mut self.programs.downsample_offscreen
                };
                (program, colour, depth_stencil, frame_buffer.size(), false)
            }
        };

        let block = program.uniforms_mut();
        block.set_vec2_by_name(
            "target_resolution",
            [size.width() as f32, size.height() as f32],
        );
        block.set_u32_by_name("decode_srgb", u32::from(decode_srgb));
        program.flush_uniforms(&self.queue);

        let bind_group = program.bind_group(
            &self.device,
            &[
                wgpu::BindingResource::TextureView(source_view),
                wgpu::BindingResource::Sampler(&self.colour_sampler),
            ],
        );
        draw(&self.device, &self.queue, program, &bind_group, colour, depth_stencil);
        Ok(())
    }

    fn read_pixels(&mut self, frame_buffer: &WgpuFrameBuffer) -> Result<PixelBuffer, RenderError> {
        expect_format("read", frame_buffer, PixelFormat::Rgb8)?;
        let texture = frame_buffer
            .texture()
            .ok_or(RenderError::IncompleteFrameBuffer {
                label: frame_buffer.label(),
            })?;

        let size = frame_buffer.size();
        let bytes_per_row = padded_bytes_per_row(size.width());
        let readback = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("readback"),
            size: u64::from(bytes_per_row) * u64::from(size.height()),
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("readback"),
            });
        encoder.copy_texture_to_buffer(
            wgpu::ImageCopyTexture {
                texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::ImageCopyBuffer {
                buffer: &readback,
                layout: wgpu::ImageDataLayout {
                    offset: 0,
                    bytes_per_row: Some(bytes_per_row),
                    rows_per_image: Some(size.height()),
                },
            },
            wgpu::Extent3d {
                width: size.width(),
                height: size.height(),
                depth_or_array_layers: 1,
            },
        );
        self.queue.submit(Some(encoder.finish()));

        let slice = readback.slice(..);
        let (sender, receiver) = mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = sender.send(result);
        });
        self.device.poll(wgpu::Maintain::Wait);
        receiver
            .recv()
            .map_err(|error| RenderError::Device(error.to_string()))?
            .map_err(|error| RenderError::Device(error.to_string()))?;

        let mut pixels = PixelBuffer::new(size);
        {
            let mapped = slice.get_mapped_range();
            let texel_row = size.width() as usize * 4;
            let pixel_row = size.width() as usize * 3;
            for (src, dst) in mapped
                .chunks_exact(bytes_per_row as usize)
                .zip(pixels.buffer_mut().chunks_exact_mut(pixel_row))
            {
                copy_rgba_to_rgb(&src[..texel_row], dst)
                    .map_err(|error| RenderError::Device(error.to_string()))?;
            }
        }
        readback.unmap();

        Ok(pixels)
    }
}
