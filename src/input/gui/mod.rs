//! GUI input adapter for interactive exploration.
//!
//! winit owns the window and event loop, a presenter draws the frame, and
//! egui draws the control panel on top.

pub mod app;
pub mod commands;
pub mod errors;

pub use app::ports::presenter::GuiPresenterPort;
pub use commands::ports::presenter_factory::GuiPresenterFactoryPort;
pub use commands::run_gui::RunGuiCommand;
pub use errors::GuiError;
