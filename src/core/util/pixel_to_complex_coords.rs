use crate::core::data::complex::Complex;
use crate::core::data::size::Size;

/// A position in window space: pixels from the top-left corner, y pointing down.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Centre of the pixel at integer coordinates `(x, y)`.
    #[must_use]
    pub fn pixel_centre(x: u32, y: u32) -> Self {
        Self {
            x: f64::from(x) + 0.5,
            y: f64::from(y) + 0.5,
        }
    }
}

/// Offset of `point` from the viewport centre in view units, before zoom.
///
/// The vertical extent spans `[-1, 1]`; the horizontal extent is widened by the
/// aspect ratio so pixels stay square in the complex plane.
#[must_use]
pub fn screen_to_view_offset(point: ScreenPoint, viewport: Size) -> Complex {
    let width = f64::from(viewport.width());
    let height = f64::from(viewport.height());
    let ndc_x = (point.x / width) * 2.0 - 1.0;
    let ndc_y = 1.0 - (point.y / height) * 2.0;

    Complex {
        real: ndc_x * viewport.aspect(),
        imag: ndc_y,
    }
}

/// Maps a window-space point to the complex plane for a camera at `center`/`zoom`.
#[must_use]
pub fn pixel_to_complex_coords(
    point: ScreenPoint,
    viewport: Size,
    center: Complex,
    zoom: f64,
) -> Complex {
    center + screen_to_view_offset(point, viewport).scale(1.0 / zoom)
}
