pub mod app_state;
pub mod controls;
pub mod iteration;

pub use app_state::{AppState, SSAA_FACTOR, default_window_size};
pub use controls::{AutoZoom, ControlsSnapshot};
pub use iteration::{
    DEFAULT_MAX_ITERATIONS, IterationError, IterationParameters, MAX_ITERATIONS_LIMIT,
};
