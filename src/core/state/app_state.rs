use crate::core::camera::{CameraError, CameraState, PanDirection};
use crate::core::data::complex::Complex;
use crate::core::data::size::Size;
use crate::core::palette::PaletteState;
use crate::core::state::controls::{AutoZoom, ControlsSnapshot};
use crate::core::state::iteration::{IterationError, IterationParameters};
use crate::core::util::pixel_to_complex_coords::ScreenPoint;

pub const DEFAULT_WINDOW_WIDTH: u32 = 1200;
pub const DEFAULT_WINDOW_HEIGHT: u32 = 900;
pub const SSAA_FACTOR: u32 = 2;

/// Everything the viewer mutates between frames.
///
/// Camera and iteration edits go through methods so the fractal dirty flag
/// can never be missed. Palette edits never dirty the fractal, so the palette
/// is a plain field.
#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    camera: CameraState,
    iterations: IterationParameters,
    pub palette: PaletteState,
    window: Size,
    pub show_ui: bool,
    use_ssaa: bool,
    auto_zoom: AutoZoom,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(default_window_size())
    }
}

#[must_use]
pub fn default_window_size() -> Size {
    Size::new(DEFAULT_WINDOW_WIDTH, DEFAULT_WINDOW_HEIGHT)
        .unwrap_or_else(|_| unreachable!("default window size is non-zero"))
}

impl AppState {
    #[must_use]
    pub fn new(window: Size) -> Self {
        Self {
            camera: CameraState::default(),
            iterations: IterationParameters::default(),
            palette: PaletteState::default(),
            window,
            show_ui: true,
            use_ssaa: true,
            auto_zoom: AutoZoom::Off,
        }
    }

    #[must_use]
    pub fn camera(&self) -> &CameraState {
        &self.camera
    }

    #[must_use]
    pub fn iterations(&self) -> &IterationParameters {
        &self.iterations
    }

    #[must_use]
    pub fn max_iterations(&self) -> u32 {
        self.iterations.max_iterations()
    }

    #[must_use]
    pub fn palette_size(&self) -> usize {
        self.iterations.palette_size()
    }

    #[must_use]
    pub fn window(&self) -> Size {
        self.window
    }

    #[must_use]
    pub fn use_ssaa(&self) -> bool {
        self.use_ssaa
    }

    #[must_use]
    pub fn ssaa_factor(&self) -> u32 {
        if self.use_ssaa { SSAA_FACTOR } else { 1 }
    }

    /// Resolution of the fractal and colour buffers for the current window.
    #[must_use]
    pub fn render_size(&self) -> Size {
        self.window.scaled(self.ssaa_factor())
    }

    #[must_use]
    pub fn auto_zoom(&self) -> AutoZoom {
        self.auto_zoom
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.iterations.is_dirty()
    }

    pub fn mark_dirty(&mut self) {
        self.iterations.mark_dirty();
    }

    /// Called by the renderer once the fractal buffer has been recomputed.
    pub fn clear_dirty(&mut self) {
        self.iterations.clear_dirty();
    }

    pub fn set_max_iterations(&mut self, max_iterations: u32) -> Result<(), IterationError> {
        self.iterations.set_max_iterations(max_iterations)
    }

    pub fn set_center(&mut self, center: Complex) -> Result<(), CameraError> {
        self.camera.set_center(center)?;
        self.mark_dirty();
        Ok(())
    }

    pub fn set_zoom(&mut self, zoom: f64) -> Result<(), CameraError> {
        self.camera.set_zoom(zoom)?;
        self.mark_dirty();
        Ok(())
    }

    pub fn resize(&mut self, window: Size) {
        if window != self.window {
            log::info!("window resized to {}x{}", window.width(), window.height());
            self.window = window;
            self.mark_dirty();
        }
    }

    pub fn set_ssaa(&mut self, enabled: bool) {
        if enabled != self.use_ssaa {
            self.use_ssaa = enabled;
            self.mark_dirty();
        }
    }

    pub fn set_fast_mode(&mut self, fast: bool) {
        self.camera.set_fast_mode(fast);
    }

    pub fn pan(&mut self, direction: PanDirection) {
        self.camera.pan(direction);
        self.mark_dirty();
    }

    pub fn pan_pixels(&mut self, dx: f64, dy: f64) {
        self.camera.pan_pixels(dx, dy, self.window);
        self.mark_dirty();
    }

    pub fn zoom_in(&mut self) {
        self.camera.zoom_in();
        self.mark_dirty();
    }

    pub fn zoom_out(&mut self) {
        self.camera.zoom_out();
        self.mark_dirty();
    }

    pub fn zoom_at_cursor(&mut self, cursor: ScreenPoint, wheel_delta: f64) {
        if self.camera.zoom_at_cursor(cursor, wheel_delta, self.window) {
            self.mark_dirty();
        }
    }

    pub fn begin_drag(&mut self, cursor: ScreenPoint) {
        self.camera.begin_drag(cursor);
    }

    pub fn drag_to(&mut self, cursor: ScreenPoint) {
        if self.camera.drag_to(cursor, self.window) {
            self.mark_dirty();
        }
    }

    pub fn end_drag(&mut self) {
        self.camera.end_drag();
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.camera.is_dragging()
    }

    /// Restores the default view and stops any auto zoom.
    pub fn reset_view(&mut self) {
        self.camera.reset();
        self.auto_zoom = AutoZoom::Off;
        self.mark_dirty();
    }

    pub fn set_auto_zoom(&mut self, auto_zoom: AutoZoom) {
        self.auto_zoom = auto_zoom;
    }

    /// Applies one tick of held keys and auto zoom. Returns `true` if the camera moved.
    pub fn apply_controls(&mut self, controls: ControlsSnapshot) -> bool {
        self.set_fast_mode(controls.fast);

        let pans = [
            (controls.up, PanDirection::Up),
            (controls.down, PanDirection::Down),
            (controls.left, PanDirection::Left),
            (controls.right, PanDirection::Right),
        ];
        for (held, direction) in pans {
            if held {
                self.pan(direction);
            }
        }

        if controls.zoom_in || self.auto_zoom == AutoZoom::In {
            self.zoom_in();
        }
        if controls.zoom_out || self.auto_zoom == AutoZoom::Out {
            self.zoom_out();
        }

        !controls.is_idle() || self.auto_zoom != AutoZoom::Off
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::camera::camera::{DEFAULT_ZOOM, ZOOM_SPEED};

    const EPSILON: f64 = 1e-12;

    fn clean_state() -> AppState {
        let mut state = AppState::new(Size::new(800, 600).unwrap());
        state.clear_dirty();
        state
    }

    #[test]
    fn test_new_state_is_dirty_with_defaults() {
        let state = AppState::default();

        assert!(state.is_dirty());
        assert_eq!(state.window(), Size::new(1200, 900).unwrap());
        assert_eq!(state.max_iterations(), 150);
        assert!(state.show_ui);
        assert!(state.use_ssaa());
        assert_eq!(state.auto_zoom(), AutoZoom::Off);
    }

    #[test]
    fn test_camera_mutations_mark_dirty() {
        let mutations: Vec<fn(&mut AppState)> = vec![
            |s: &mut AppState| s.pan(PanDirection::Left),
            |s: &mut AppState| s.pan_pixels(3.0, -2.0),
            |s: &mut AppState| s.zoom_in(),
            |s: &mut AppState| s.zoom_out(),
            |s: &mut AppState| s.zoom_at_cursor(ScreenPoint::new(10.0, 10.0), 1.0),
            |s: &mut AppState| s.reset_view(),
            |s: &mut AppState| s.set_center(Complex::new(-0.5, 0.1)).unwrap(),
            |s: &mut AppState| s.set_zoom(4.0).unwrap(),
            |s: &mut AppState| s.set_max_iterations(42).unwrap(),
            |s: &mut AppState| s.resize(Size::new(1600, 1200).unwrap()),
            |s: &mut AppState| s.set_ssaa(false),
        ];

        for mutate in mutations {
            let mut state = clean_state();
            mutate(&mut state);
            assert!(state.is_dirty());
        }
    }

    #[test]
    fn test_non_fractal_edits_stay_clean() {
        let mut state = clean_state();

        state.palette.reverse();
        state.palette.set_filtering(true);
        state.show_ui = false;
        state.set_fast_mode(true);
        state.begin_drag(ScreenPoint::new(5.0, 5.0));
        state.drag_to(ScreenPoint::new(5.0, 5.0));
        state.end_drag();
        state.zoom_at_cursor(ScreenPoint::new(5.0, 5.0), 0.0);
        state.resize(Size::new(800, 600).unwrap());

        assert!(!state.is_dirty());
    }

    #[test]
    fn test_drag_marks_dirty_only_when_cursor_moves() {
        let mut state = clean_state();
        state.begin_drag(ScreenPoint::new(100.0, 100.0));

        state.drag_to(ScreenPoint::new(120.0, 90.0));

        assert!(state.is_dirty());
        assert!(state.is_dragging());
    }

    #[test]
    fn test_render_size_follows_ssaa() {
        let mut state = AppState::new(Size::new(800, 600).unwrap());

        assert_eq!(state.render_size(), Size::new(1600, 1200).unwrap());

        state.set_ssaa(false);
        assert_eq!(state.render_size(), Size::new(800, 600).unwrap());
    }

    #[test]
    fn test_apply_controls_pans_and_zooms() {
        let mut state = clean_state();
        let controls = ControlsSnapshot {
            right: true,
            zoom_in: true,
            ..ControlsSnapshot::default()
        };

        assert!(state.apply_controls(controls));

        assert!(state.is_dirty());
        assert!(state.camera().center().real > 0.0);
        assert!((state.camera().zoom() - DEFAULT_ZOOM * ZOOM_SPEED).abs() <= EPSILON);
    }

    #[test]
    fn test_apply_idle_controls_leaves_state_clean() {
        let mut state = clean_state();

        assert!(!state.apply_controls(ControlsSnapshot::default()));

        assert!(!state.is_dirty());
    }

    #[test]
    fn test_auto_zoom_applies_each_tick_until_reset() {
        let mut state = clean_state();
        state.set_auto_zoom(AutoZoom::Out);

        assert!(state.apply_controls(ControlsSnapshot::default()));
        assert!(state.camera().zoom() < DEFAULT_ZOOM);

        state.reset_view();
        assert_eq!(state.auto_zoom(), AutoZoom::Off);
        assert_eq!(state.camera().zoom(), DEFAULT_ZOOM);
    }

    #[test]
    fn test_fast_mode_follows_snapshot() {
        let mut state = clean_state();

        state.apply_controls(ControlsSnapshot {
            fast: true,
            ..ControlsSnapshot::default()
        });
        assert_eq!(state.camera().pan_speed(), 0.02);

        state.apply_controls(ControlsSnapshot::default());
        assert_eq!(state.camera().pan_speed(), 0.01);
    }
}
