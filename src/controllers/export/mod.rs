pub mod controller;
pub mod errors;

pub use controller::ExportController;
pub use errors::ExportError;
