pub mod backend;
pub mod frame_buffer;

pub use backend::{PassTarget, RenderBackend};
pub use frame_buffer::{FrameBuffer, FrameBufferDescriptor, PixelFormat};
