pub mod errors;
pub mod uniform_block;

pub use errors::{ShaderError, ShaderStage};
pub use uniform_block::{UniformBlock, UniformLocation, UniformType};
