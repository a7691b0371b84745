mod adapters;
mod controllers;
mod core;
mod input;
mod pipeline;
mod presenters;
mod storage;

pub use crate::adapters::cpu::{CpuBackend, CpuFrameBuffer, CpuPaletteLookup};
pub use crate::adapters::pixel_format::{PixelFormatError, copy_rgb_to_rgba, copy_rgba_to_rgb};
pub use crate::adapters::shader::errors::{ShaderError, ShaderStage};
pub use crate::adapters::shader::uniform_block::{UniformBlock, UniformLocation, UniformType};
pub use crate::controllers::export::{ExportController, ExportError};
pub use crate::controllers::ports::file_presenter::FilePresenterPort;
pub use crate::core::camera::camera::{DEFAULT_CENTER, DEFAULT_ZOOM};
pub use crate::core::camera::{CameraError, CameraState, PanDirection};
pub use crate::core::data::colour::Rgb;
pub use crate::core::data::complex::Complex;
pub use crate::core::data::pixel_buffer::{PixelBuffer, PixelBufferError};
pub use crate::core::data::size::{Size, SizeError};
pub use crate::core::fractals::mandelbrot::{MandelbrotAlgorithm, MandelbrotError, escape_time};
pub use crate::core::palette::{
    ChannelKind, ChannelState, Channels, NamedChannels, PaletteFilter, PaletteLookup, PaletteState,
    PaletteTexture, ensure_default_channels, evaluate, fit_to_width, lookup_coordinate,
};
pub use crate::core::state::{
    AppState, AutoZoom, ControlsSnapshot, DEFAULT_MAX_ITERATIONS, IterationError,
    IterationParameters, MAX_ITERATIONS_LIMIT, SSAA_FACTOR, default_window_size,
};
pub use crate::core::util::pixel_to_complex_coords::{ScreenPoint, pixel_to_complex_coords};
pub use crate::pipeline::ports::backend::{PassTarget, RenderBackend};
pub use crate::pipeline::ports::frame_buffer::{FrameBuffer, FrameBufferDescriptor, PixelFormat};
pub use crate::pipeline::{
    FractalUniforms, FrameReport, PaletteUniforms, PipelineOptions, RenderError, RenderPipeline,
};
pub use crate::presenters::file::ppm::PpmFilePresenter;
pub use crate::storage::{ChannelRecord, PersistedState, StateFileError, load_state, save_state};

#[cfg(feature = "gui")]
pub use crate::adapters::wgpu::{
    Binding, ProgramSource, ShaderProgram, SurfaceTarget, WgpuBackend, WgpuFrameBuffer,
    WgpuPaletteLookup,
};
#[cfg(feature = "gui")]
pub use crate::input::gui::{GuiError, RunGuiCommand};
#[cfg(feature = "gui")]
pub use crate::presenters::pixels::factory::PixelsPresenterFactory;
#[cfg(feature = "gui")]
pub use crate::presenters::wgpu::factory::WgpuPresenterFactory;
