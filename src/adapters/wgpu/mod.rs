pub mod backend;
pub mod frame_buffer;
pub mod lookup;
pub mod shader;

pub use backend::{SurfaceTarget, WgpuBackend};
pub use frame_buffer::WgpuFrameBuffer;
pub use lookup::WgpuPaletteLookup;
pub use shader::{Binding, ProgramSource, ShaderProgram};
