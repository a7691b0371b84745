pub mod file;
#[cfg(feature = "gui")]
pub mod egui_overlay;
#[cfg(feature = "gui")]
pub mod errors;
#[cfg(feature = "gui")]
pub mod pixels;
#[cfg(feature = "gui")]
pub mod wgpu;
