use crate::core::actions::generate_fractal::ports::fractal_algorithm::FractalAlgorithm;
use crate::core::data::complex::Complex;
use crate::core::data::point::Point;
use crate::core::data::size::Size;
use crate::core::fractals::mandelbrot::errors::MandelbrotError;
use crate::core::util::pixel_to_complex_coords::{ScreenPoint, pixel_to_complex_coords};

const BAILOUT_SQUARED: f64 = 4.0;

/// Number of `z = z² + c` steps from `z = 0` before `|z|² > 4`, or `max_iterations` if it never escapes.
#[must_use]
pub fn escape_time(c: Complex, max_iterations: u32) -> u32 {
    let mut z = Complex::ZERO;

    for iteration in 0..max_iterations {
        if z.magnitude_squared() > BAILOUT_SQUARED {
            return iteration;
        }
        z = z * z + c;
    }

    max_iterations
}

/// Escape-time kernel for every pixel of a viewport seen through a camera.
#[derive(Debug, Clone, PartialEq)]
pub struct MandelbrotAlgorithm {
    viewport: Size,
    center: Complex,
    zoom: f64,
    max_iterations: u32,
}

impl MandelbrotAlgorithm {
    pub fn new(
        viewport: Size,
        center: Complex,
        zoom: f64,
        max_iterations: u32,
    ) -> Result<Self, MandelbrotError> {
        if max_iterations == 0 {
            return Err(MandelbrotError::ZeroMaxIterations);
        }

        Ok(Self {
            viewport,
            center,
            zoom,
            max_iterations,
        })
    }

    #[must_use]
    pub fn viewport(&self) -> Size {
        self.viewport
    }

    #[must_use]
    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }
}

impl FractalAlgorithm for MandelbrotAlgorithm {
    type Success = u32;
    type Failure = MandelbrotError;

    fn compute(&self, pixel: Point) -> Result<Self::Success, Self::Failure> {
        if pixel.x >= self.viewport.width() || pixel.y >= self.viewport.height() {
            return Err(MandelbrotError::PixelOutsideViewport {
                x: pixel.x,
                y: pixel.y,
                width: self.viewport.width(),
                height: self.viewport.height(),
            });
        }

        let c = pixel_to_complex_coords(
            ScreenPoint::pixel_centre(pixel.x, pixel.y),
            self.viewport,
            self.center,
            self.zoom,
        );

        Ok(escape_time(c, self.max_iterations))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_time_origin_never_escapes() {
        assert_eq!(escape_time(Complex::ZERO, 150), 150);
    }

    #[test]
    fn test_escape_time_main_cardioid_point_never_escapes() {
        assert_eq!(escape_time(Complex::new(-0.65, 0.0), 150), 150);
    }

    #[test]
    fn test_escape_time_far_point_escapes_on_first_iteration() {
        assert_eq!(escape_time(Complex::new(2.0, 2.0), 150), 1);
    }

    #[test]
    fn test_escape_time_boundary_point() {
        // c = 1: z goes 0, 1, 2, 5
        assert_eq!(escape_time(Complex::new(1.0, 0.0), 150), 3);
    }

    #[test]
    fn test_escape_time_single_iteration_cap() {
        assert_eq!(escape_time(Complex::ZERO, 1), 1);
        assert_eq!(escape_time(Complex::new(2.0, 2.0), 1), 1);
    }

    #[test]
    fn test_new_rejects_zero_max_iterations() {
        let result = MandelbrotAlgorithm::new(Size::new(4, 4).unwrap(), Complex::ZERO, 1.0, 0);

        assert_eq!(result, Err(MandelbrotError::ZeroMaxIterations));
    }

    #[test]
    fn test_compute_centre_pixel_uses_camera_centre() {
        let algorithm =
            MandelbrotAlgorithm::new(Size::new(3, 3).unwrap(), Complex::new(-0.65, 0.0), 0.5, 150)
                .unwrap();

        assert_eq!(algorithm.compute(Point { x: 1, y: 1 }), Ok(150));
    }

    #[test]
    fn test_compute_rejects_pixel_outside_viewport() {
        let algorithm =
            MandelbrotAlgorithm::new(Size::new(3, 2).unwrap(), Complex::ZERO, 1.0, 10).unwrap();

        assert_eq!(
            algorithm.compute(Point { x: 3, y: 0 }),
            Err(MandelbrotError::PixelOutsideViewport {
                x: 3,
                y: 0,
                width: 3,
                height: 2
            })
        );
    }
}
