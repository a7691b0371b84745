use crate::core::data::complex::Complex;
use crate::core::data::size::Size;
use crate::core::state::AppState;

/// Inputs of the fractal pass.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FractalUniforms {
    pub resolution: Size,
    pub center: Complex,
    pub zoom: f64,
    pub max_iterations: u32,
}

impl FractalUniforms {
    /// Camera and iteration cap of `state`, rendered at `resolution`.
    #[must_use]
    pub fn from_state(state: &AppState, resolution: Size) -> Self {
        Self {
            resolution,
            center: state.camera().center(),
            zoom: state.camera().zoom(),
            max_iterations: state.max_iterations(),
        }
    }

    /// Centre as `(hi, lo)` single-precision pairs whose sum recovers the f64 value.
    #[must_use]
    pub fn center_split(&self) -> ([f32; 2], [f32; 2]) {
        let (real_hi, real_lo) = split_f64(self.center.real);
        let (imag_hi, imag_lo) = split_f64(self.center.imag);
        ([real_hi, imag_hi], [real_lo, imag_lo])
    }
}

/// Inputs of the palette pass.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PaletteUniforms {
    pub palette_size: u32,
}

/// Splits `value` into a high f32 and the f32 rounding of what the high part lost.
#[must_use]
pub fn split_f64(value: f64) -> (f32, f32) {
    let hi = value as f32;
    let lo = (value - f64::from(hi)) as f32;
    (hi, lo)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_f64_recovers_more_precision_than_f32() {
        let value = -0.743_643_887_037_151_f64;
        let (hi, lo) = split_f64(value);

        let single_error = (f64::from(value as f32) - value).abs();
        let split_error = (f64::from(hi) + f64::from(lo) - value).abs();

        assert!(split_error < single_error);
        assert!(split_error < 1e-12);
    }

    #[test]
    fn test_split_f64_exact_values_have_zero_low_part() {
        assert_eq!(split_f64(0.5), (0.5, 0.0));
        assert_eq!(split_f64(-2.0), (-2.0, 0.0));
    }

    #[test]
    fn test_from_state_reads_camera_and_iterations() {
        let mut state = AppState::default();
        state.set_center(Complex::new(-0.65, 0.0)).unwrap();
        state.set_max_iterations(64).unwrap();
        let resolution = Size::new(10, 20).unwrap();

        let uniforms = FractalUniforms::from_state(&state, resolution);

        assert_eq!(uniforms.resolution, resolution);
        assert_eq!(uniforms.center, Complex::new(-0.65, 0.0));
        assert_eq!(uniforms.zoom, 0.5);
        assert_eq!(uniforms.max_iterations, 64);
    }
}
