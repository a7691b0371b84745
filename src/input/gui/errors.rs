use thiserror::Error;

use crate::presenters::errors::PresentError;

#[derive(Debug, Error)]
pub enum GuiError {
    #[error("event loop failed: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    #[error("could not open window: {0}")]
    Window(#[from] winit::error::OsError),
    #[error(transparent)]
    Present(#[from] PresentError),
}
