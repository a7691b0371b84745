use std::borrow::Cow;

use pixels::wgpu;

use crate::adapters::shader::errors::{ShaderError, ShaderStage};
use crate::adapters::shader::uniform_block::{UniformBlock, UniformLocation, UniformType};

pub const FULLSCREEN_VERTEX: &str = include_str!("../../shaders/fullscreen.wgsl");
pub const FRACTAL_FRAGMENT: &str = include_str!("../../shaders/fractal.wgsl");
pub const PALETTE_FRAGMENT: &str = include_str!("../../shaders/palette.wgsl");
pub const DOWNSAMPLE_FRAGMENT: &str = include_str!("../../shaders/downsample.wgsl");

/// Resources bound after the uniform block, at bindings 1, 2, ...
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Binding {
    /// 2-D texture read with `textureLoad`, e.g. R32Float.
    UnfilterableTexture2d,
    Texture2d,
    Texture1d,
    Sampler,
}

impl Binding {
    fn layout_entry(self, binding: u32) -> wgpu::BindGroupLayoutEntry {
        let ty = match self {
            Self::UnfilterableTexture2d => wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float { filterable: false },
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            },
            Self::Texture2d => wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            },
            Self::Texture1d => wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                view_dimension: wgpu::TextureViewDimension::D1,
                multisampled: false,
            },
            Self::Sampler => wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
        };

        wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty,
            count: None,
        }
    }
}

/// Everything needed to build one program.
#[derive(Debug, Clone)]
pub struct ProgramSource<'a> {
    pub label: &'static str,
    pub vertex: &'a str,
    pub fragment: &'a str,
    pub uniforms: &'a [(&'static str, UniformType)],
    pub bindings: &'a [Binding],
    pub target_format: wgpu::TextureFormat,
    pub depth_stencil_format: Option<wgpu::TextureFormat>,
}

/// A compiled and linked vertex/fragment pair with its uniform block.
///
/// Immutable after construction apart from uniform values.
#[derive(Debug)]
pub struct ShaderProgram {
    label: &'static str,
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    uniforms: UniformBlock,
    uniform_buffer: wgpu::Buffer,
    target_format: wgpu::TextureFormat,
    depth_stencil_format: Option<wgpu::TextureFormat>,
}

fn compile(
    device: &wgpu::Device,
    program: &'static str,
    stage: ShaderStage,
    source: &str,
) -> Result<wgpu::ShaderModule, ShaderError> {
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(program),
        source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(source)),
    });

    match pollster::block_on(device.pop_error_scope()) {
        Some(error) => Err(ShaderError::Compile {
            program,
            stage,
            log: error.to_string(),
        }),
        None => Ok(module),
    }
}

impl ShaderProgram {
    pub fn new(device: &wgpu::Device, source: &ProgramSource<'_>) -> Result<Self, ShaderError> {
        let vertex = compile(device, source.label, ShaderStage::Vertex, source.vertex)?;
        let fragment = compile(device, source.label, ShaderStage::Fragment, source.fragment)?;

        let uniforms = UniformBlock::new(source.uniforms);
        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(source.label),
            size: uniforms.size() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        device.push_error_scope(wgpu::ErrorFilter::Validation);

        let mut entries = vec![wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }];
        entries.extend(
            source
                .bindings
                .iter()
                .zip(1..)
                .map(|(binding, index)| binding.layout_entry(index)),
        );

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some(source.label),
            entries: &entries,
        });
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(source.label),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let depth_stencil = source
            .depth_stencil_format
            .map(|format| wgpu::DepthStencilState {
                format,
                depth_write_enabled: false,
                depth_compare: wgpu::CompareFunction::Always,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(source.label),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &vertex,
                entry_point: "vs_main",
                buffers: &[],
            },
            fragment: Some(wgpu::FragmentState {
                module: &fragment,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format: source.target_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
        });

        if let Some(error) = pollster::block_on(device.pop_error_scope()) {
            return Err(ShaderError::Link {
                program: source.label,
                log: error.to_string(),
            });
        }

        log::debug!("shader program '{}' linked", source.label);

        Ok(Self {
            label: source.label,
            pipeline,
            bind_group_layout,
            uniforms,
            uniform_buffer,
            target_format: source.target_format,
            depth_stencil_format: source.depth_stencil_format,
        })
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        self.label
    }

    #[must_use]
    pub fn pipeline(&self) -> &wgpu::RenderPipeline {
        &self.pipeline
    }

    #[must_use]
    pub fn target_format(&self) -> wgpu::TextureFormat {
        self.target_format
    }

    #[must_use]
    pub fn depth_stencil_format(&self) -> Option<wgpu::TextureFormat> {
        self.depth_stencil_format
    }

    /// `None` when the program declares no such uniform; setters ignore it.
    #[must_use]
    pub fn uniform_location(&self, name: &str) -> Option<UniformLocation> {
        self.uniforms.location(name)
    }

    pub fn uniforms_mut(&mut self) -> &mut UniformBlock {
        &mut self.uniforms
    }

    /// Copies changed uniform values to the device.
    pub fn flush_uniforms(&mut self, queue: &wgpu::Queue) {
        if self.uniforms.take_changed() {
            queue.write_buffer(&self.uniform_buffer, 0, self.uniforms.bytes());
        }
    }

    /// Bind group with the uniform buffer at binding 0 followed by `resources`.
    #[must_use]
    pub fn bind_group(
        &self,
        device: &wgpu::Device,
        resources: &[wgpu::BindingResource<'_>],
    ) -> wgpu::BindGroup {
        let mut entries = vec![wgpu::BindGroupEntry {
            binding: 0,
            resource: self.uniform_buffer.as_entire_binding(),
        }];
        entries.extend(
            resources
                .iter()
                .cloned()
                .zip(1..)
                .map(|(resource, binding)| wgpu::BindGroupEntry { binding, resource }),
        );

        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(self.label),
            layout: &self.bind_group_layout,
            entries: &entries,
        })
    }
}
