pub mod camera;

pub use camera::{CameraError, CameraState, PanDirection};
