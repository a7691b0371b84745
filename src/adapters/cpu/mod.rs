pub mod backend;
pub mod frame_buffer;
pub mod lookup;

pub use backend::CpuBackend;
pub use frame_buffer::CpuFrameBuffer;
pub use lookup::CpuPaletteLookup;
