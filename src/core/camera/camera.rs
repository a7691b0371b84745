use crate::core::data::complex::Complex;
use crate::core::data::size::Size;
use crate::core::util::pixel_to_complex_coords::{
    ScreenPoint, pixel_to_complex_coords, screen_to_view_offset,
};
use thiserror::Error;

pub const DEFAULT_CENTER: Complex = Complex::new(0.0, 0.0);
pub const DEFAULT_ZOOM: f64 = 0.5;

pub const PAN_SPEED: f64 = 0.01;
pub const FAST_PAN_SPEED: f64 = 0.02;
pub const ZOOM_SPEED: f64 = 1.005;
pub const FAST_ZOOM_SPEED: f64 = 1.01;
pub const WHEEL_ZOOM_FACTOR: f64 = 1.1;

// Keeps zoom strictly positive and finite no matter how long a zoom key is held.
pub const MIN_ZOOM: f64 = 1e-6;
pub const MAX_ZOOM: f64 = 1e15;

#[derive(Debug, Copy, Clone, PartialEq, Error)]
pub enum CameraError {
    #[error("zoom must be positive and finite, got {0}")]
    InvalidZoom(f64),
    #[error("camera center must be finite, got ({}, {})", .0.real, .0.imag)]
    InvalidCenter(Complex),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PanDirection {
    Up,
    Down,
    Left,
    Right,
}

/// Position and scale of the view into the complex plane, plus drag bookkeeping.
///
/// Zoom is applied multiplicatively; larger values magnify.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraState {
    center: Complex,
    zoom: f64,
    pan_speed: f64,
    zoom_speed: f64,
    dragging: bool,
    last_cursor: ScreenPoint,
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
            pan_speed: PAN_SPEED,
            zoom_speed: ZOOM_SPEED,
            dragging: false,
            last_cursor: ScreenPoint::default(),
        }
    }
}

impl CameraState {
    pub fn new(center: Complex, zoom: f64) -> Result<Self, CameraError> {
        let mut camera = Self::default();
        camera.set_center(center)?;
        camera.set_zoom(zoom)?;
        Ok(camera)
    }

    #[must_use]
    pub fn center(&self) -> Complex {
        self.center
    }

    #[must_use]
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    #[must_use]
    pub fn pan_speed(&self) -> f64 {
        self.pan_speed
    }

    #[must_use]
    pub fn zoom_speed(&self) -> f64 {
        self.zoom_speed
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    #[must_use]
    pub fn last_cursor(&self) -> ScreenPoint {
        self.last_cursor
    }

    pub fn set_center(&mut self, center: Complex) -> Result<(), CameraError> {
        if !center.is_finite() {
            return Err(CameraError::InvalidCenter(center));
        }

        self.center = center;
        Ok(())
    }

    pub fn set_zoom(&mut self, zoom: f64) -> Result<(), CameraError> {
        if !zoom.is_finite() || zoom <= 0.0 {
            return Err(CameraError::InvalidZoom(zoom));
        }

        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        Ok(())
    }

    /// Swaps in the fast pan/zoom pair while the modifier is held.
    pub fn set_fast_mode(&mut self, fast: bool) {
        if fast {
            self.pan_speed = FAST_PAN_SPEED;
            self.zoom_speed = FAST_ZOOM_SPEED;
        } else {
            self.pan_speed = PAN_SPEED;
            self.zoom_speed = ZOOM_SPEED;
        }
    }

    #[must_use]
    pub fn screen_to_complex(&self, point: ScreenPoint, viewport: Size) -> Complex {
        pixel_to_complex_coords(point, viewport, self.center, self.zoom)
    }

    /// One keyboard tick of panning; the step shrinks as zoom grows.
    pub fn pan(&mut self, direction: PanDirection) {
        let step = self.pan_speed / self.zoom;

        match direction {
            PanDirection::Up => self.center.imag += step,
            PanDirection::Down => self.center.imag -= step,
            PanDirection::Left => self.center.real -= step,
            PanDirection::Right => self.center.real += step,
        }
    }

    /// Moves the camera so the content follows a cursor moved by `(dx, dy)` pixels.
    pub fn pan_pixels(&mut self, dx: f64, dy: f64, viewport: Size) {
        let width = f64::from(viewport.width());
        let height = f64::from(viewport.height());

        let delta_real = dx * 2.0 / width * viewport.aspect() / self.zoom;
        let delta_imag = dy * 2.0 / height / self.zoom;

        self.center.real -= delta_real;
        self.center.imag += delta_imag;
    }

    pub fn zoom_in(&mut self) {
        self.apply_zoom_factor(self.zoom_speed);
    }

    pub fn zoom_out(&mut self) {
        self.apply_zoom_factor(1.0 / self.zoom_speed);
    }

    /// Zooms by one wheel tick, keeping the complex point under `cursor` fixed on screen.
    ///
    /// Returns `false` when `wheel_delta` is zero and nothing changed.
    pub fn zoom_at_cursor(&mut self, cursor: ScreenPoint, wheel_delta: f64, viewport: Size) -> bool {
        if wheel_delta == 0.0 || !wheel_delta.is_finite() {
            return false;
        }

        let anchor = self.screen_to_complex(cursor, viewport);
        let offset = screen_to_view_offset(cursor, viewport);

        let factor = if wheel_delta > 0.0 {
            WHEEL_ZOOM_FACTOR
        } else {
            1.0 / WHEEL_ZOOM_FACTOR
        };
        self.apply_zoom_factor(factor);

        self.center = anchor - offset.scale(1.0 / self.zoom);
        true
    }

    pub fn begin_drag(&mut self, cursor: ScreenPoint) {
        self.dragging = true;
        self.last_cursor = cursor;
    }

    /// Pans by the cursor movement since the last call. No-op unless dragging.
    pub fn drag_to(&mut self, cursor: ScreenPoint, viewport: Size) -> bool {
        if !self.dragging {
            return false;
        }

        let dx = cursor.x - self.last_cursor.x;
        let dy = cursor.y - self.last_cursor.y;
        self.last_cursor = cursor;

        if dx == 0.0 && dy == 0.0 {
            return false;
        }

        self.pan_pixels(dx, dy, viewport);
        true
    }

    pub fn end_drag(&mut self) {
        self.dragging = false;
    }

    pub fn reset(&mut self) {
        self.center = DEFAULT_CENTER;
        self.zoom = DEFAULT_ZOOM;
    }

    fn apply_zoom_factor(&mut self, factor: f64) {
        self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn assert_approx_eq(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPSILON,
            "actual={} expected={}",
            actual,
            expected
        );
    }

    fn viewport() -> Size {
        Size::new(800, 600).unwrap()
    }

    #[test]
    fn test_default_camera_matches_documented_defaults() {
        let camera = CameraState::default();

        assert_eq!(camera.center(), Complex::new(0.0, 0.0));
        assert_eq!(camera.zoom(), 0.5);
        assert_eq!(camera.pan_speed(), 0.01);
        assert_eq!(camera.zoom_speed(), 1.005);
        assert!(!camera.is_dragging());
    }

    #[test]
    fn test_set_zoom_rejects_non_positive_values() {
        let mut camera = CameraState::default();

        assert_eq!(camera.set_zoom(0.0), Err(CameraError::InvalidZoom(0.0)));
        assert_eq!(camera.set_zoom(-2.0), Err(CameraError::InvalidZoom(-2.0)));
        assert!(camera.set_zoom(f64::NAN).is_err());
        assert_eq!(camera.zoom(), DEFAULT_ZOOM);
    }

    #[test]
    fn test_set_center_rejects_non_finite_values() {
        let mut camera = CameraState::default();

        assert!(camera.set_center(Complex::new(f64::INFINITY, 0.0)).is_err());
        assert_eq!(camera.center(), DEFAULT_CENTER);
    }

    #[test]
    fn test_zoom_in_and_out_are_multiplicative() {
        let mut camera = CameraState::new(Complex::ZERO, 2.0).unwrap();

        camera.zoom_in();
        assert_approx_eq(camera.zoom(), 2.0 * 1.005);

        camera.zoom_out();
        assert_approx_eq(camera.zoom(), 2.0);
    }

    #[test]
    fn test_fast_mode_swaps_speed_pair() {
        let mut camera = CameraState::default();

        camera.set_fast_mode(true);
        assert_eq!(camera.pan_speed(), 0.02);
        assert_eq!(camera.zoom_speed(), 1.01);

        camera.set_fast_mode(false);
        assert_eq!(camera.pan_speed(), 0.01);
        assert_eq!(camera.zoom_speed(), 1.005);
    }

    #[test]
    fn test_keyboard_pan_step_is_divided_by_zoom() {
        let mut camera = CameraState::new(Complex::ZERO, 4.0).unwrap();

        camera.pan(PanDirection::Right);
        camera.pan(PanDirection::Up);
        assert_approx_eq(camera.center().real, 0.0025);
        assert_approx_eq(camera.center().imag, 0.0025);

        camera.pan(PanDirection::Left);
        camera.pan(PanDirection::Down);
        assert_approx_eq(camera.center().real, 0.0);
        assert_approx_eq(camera.center().imag, 0.0);
    }

    #[test]
    fn test_pan_pixels_uses_aspect_and_zoom() {
        let mut camera = CameraState::new(Complex::ZERO, 2.0).unwrap();

        // 80px of an 800px wide, 4:3 viewport: 80 * 2 / 800 * (4/3) / 2
        camera.pan_pixels(80.0, 60.0, viewport());

        assert_approx_eq(camera.center().real, -(80.0 * 2.0 / 800.0) * (4.0 / 3.0) / 2.0);
        assert_approx_eq(camera.center().imag, 60.0 * 2.0 / 600.0 / 2.0);
    }

    #[test]
    fn test_drag_keeps_grabbed_point_under_cursor() {
        let mut camera = CameraState::new(Complex::new(-0.5, 0.25), 3.0).unwrap();
        let start = ScreenPoint::new(100.0, 450.0);
        let end = ScreenPoint::new(260.0, 310.0);
        let grabbed = camera.screen_to_complex(start, viewport());

        camera.begin_drag(start);
        assert!(camera.drag_to(end, viewport()));
        camera.end_drag();

        let under_cursor = camera.screen_to_complex(end, viewport());
        assert_approx_eq(under_cursor.real, grabbed.real);
        assert_approx_eq(under_cursor.imag, grabbed.imag);
        assert!(!camera.is_dragging());
    }

    #[test]
    fn test_drag_to_without_begin_is_noop() {
        let mut camera = CameraState::default();

        assert!(!camera.drag_to(ScreenPoint::new(10.0, 10.0), viewport()));
        assert_eq!(camera.center(), DEFAULT_CENTER);
    }

    #[test]
    fn test_zoom_at_cursor_preserves_anchor() {
        let cursors = [
            ScreenPoint::new(0.0, 0.0),
            ScreenPoint::new(400.0, 300.0),
            ScreenPoint::new(799.0, 12.5),
            ScreenPoint::new(123.25, 587.0),
        ];

        for cursor in cursors {
            for wheel_delta in [1.0, -1.0, 3.0, -0.5] {
                let mut camera = CameraState::new(Complex::new(-0.743, 0.131), 37.5).unwrap();
                let before = camera.screen_to_complex(cursor, viewport());

                assert!(camera.zoom_at_cursor(cursor, wheel_delta, viewport()));

                let after = camera.screen_to_complex(cursor, viewport());
                assert_approx_eq(after.real, before.real);
                assert_approx_eq(after.imag, before.imag);
            }
        }
    }

    #[test]
    fn test_zoom_at_cursor_applies_wheel_factor() {
        let mut camera = CameraState::new(Complex::ZERO, 1.0).unwrap();
        let cursor = ScreenPoint::new(200.0, 200.0);

        camera.zoom_at_cursor(cursor, 1.0, viewport());
        assert_approx_eq(camera.zoom(), 1.1);

        camera.zoom_at_cursor(cursor, -1.0, viewport());
        assert_approx_eq(camera.zoom(), 1.0);
    }

    #[test]
    fn test_zoom_at_cursor_ignores_zero_delta() {
        let mut camera = CameraState::default();

        assert!(!camera.zoom_at_cursor(ScreenPoint::new(1.0, 1.0), 0.0, viewport()));
        assert_eq!(camera, CameraState::default());
    }

    #[test]
    fn test_zoom_out_never_reaches_zero() {
        let mut camera = CameraState::new(Complex::ZERO, MIN_ZOOM).unwrap();

        for _ in 0..100 {
            camera.zoom_out();
        }

        assert!(camera.zoom() > 0.0);
        assert_eq!(camera.zoom(), MIN_ZOOM);
    }

    #[test]
    fn test_reset_restores_center_and_zoom() {
        let mut camera = CameraState::new(Complex::new(1.0, 1.0), 50.0).unwrap();

        camera.reset();

        assert_eq!(camera.center(), DEFAULT_CENTER);
        assert_eq!(camera.zoom(), DEFAULT_ZOOM);
    }
}
