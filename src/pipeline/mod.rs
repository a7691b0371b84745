pub mod errors;
pub mod pipeline;
pub mod ports;
pub mod uniforms;

pub use errors::RenderError;
pub use pipeline::{FrameReport, PipelineOptions, RenderPipeline};
pub use uniforms::{FractalUniforms, PaletteUniforms};
