pub mod export;
pub mod ports;
