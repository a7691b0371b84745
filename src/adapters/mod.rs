pub mod cpu;
pub mod pixel_format;
pub mod shader;
#[cfg(feature = "gui")]
pub mod wgpu;
