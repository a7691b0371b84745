use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MandelbrotError {
    #[error("maximum iterations must be greater than zero")]
    ZeroMaxIterations,
    #[error("pixel at x:{x}, y:{y} outside of {width}x{height} viewport")]
    PixelOutsideViewport {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
}
