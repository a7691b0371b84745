pub mod algorithm;
pub mod errors;

pub use algorithm::{MandelbrotAlgorithm, escape_time};
pub use errors::MandelbrotError;
