use thiserror::Error;

use crate::core::data::size::SizeError;
use crate::pipeline::errors::RenderError;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("invalid export size: {0}")]
    Size(#[from] SizeError),
    #[error("render failed: {0}")]
    Render(#[from] RenderError),
    #[error("could not write export: {0}")]
    Io(#[from] std::io::Error),
    #[error("nothing rendered yet")]
    NothingRendered,
}
