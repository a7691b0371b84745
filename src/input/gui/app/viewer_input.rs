use crate::core::state::ControlsSnapshot;
use winit::event::{ElementState, MouseScrollDelta};
use winit::keyboard::KeyCode;

/// Trackpad scroll distance, in physical pixels, worth one wheel notch.
pub const PIXELS_PER_WHEEL_STEP: f64 = 50.0;

/// One tick of keyboard input: held keys plus single-shot actions.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ViewerInput {
    pub controls: ControlsSnapshot,
    pub toggle_ui: bool,
    pub quit: bool,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ViewerInputState {
    w_held: bool,
    a_held: bool,
    s_held: bool,
    d_held: bool,
    e_held: bool,
    q_held: bool,
    space_held: bool,
    tab_edge_pending: bool,
    escape_edge_pending: bool,
}

impl ViewerInputState {
    pub fn handle_key_event(&mut self, key_code: KeyCode, state: ElementState, repeat: bool) {
        let pressed = state == ElementState::Pressed;

        match key_code {
            KeyCode::KeyW => self.w_held = pressed,
            KeyCode::KeyA => self.a_held = pressed,
            KeyCode::KeyS => self.s_held = pressed,
            KeyCode::KeyD => self.d_held = pressed,
            KeyCode::KeyE => self.e_held = pressed,
            KeyCode::KeyQ => self.q_held = pressed,
            KeyCode::Space => self.space_held = pressed,
            KeyCode::Tab if pressed && !repeat => self.tab_edge_pending = true,
            KeyCode::Escape if pressed => self.escape_edge_pending = true,
            _ => {}
        }
    }

    /// Consumes pending edges. While a text field has focus only quit survives.
    pub fn snapshot(&mut self, text_editing: bool) -> ViewerInput {
        let quit = std::mem::take(&mut self.escape_edge_pending);
        let toggle_ui = std::mem::take(&mut self.tab_edge_pending);

        if text_editing {
            return ViewerInput {
                quit,
                ..ViewerInput::default()
            };
        }

        ViewerInput {
            controls: ControlsSnapshot {
                up: self.w_held,
                down: self.s_held,
                left: self.a_held,
                right: self.d_held,
                zoom_in: self.e_held,
                zoom_out: self.q_held,
                fast: self.space_held,
            },
            toggle_ui,
            quit,
        }
    }

    /// Releases everything, e.g. when the window loses focus.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Turns scroll events into whole zoom steps.
///
/// A line delta is one step per event. Pixel deltas from trackpads are summed
/// and yield a step each time the total crosses [`PIXELS_PER_WHEEL_STEP`].
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct WheelAccumulator {
    pending_pixels: f64,
}

impl WheelAccumulator {
    /// Signed number of zoom steps; positive zooms in.
    pub fn steps(&mut self, delta: MouseScrollDelta) -> i32 {
        match delta {
            MouseScrollDelta::LineDelta(_, y) => {
                self.pending_pixels = 0.0;
                if y > 0.0 {
                    1
                } else if y < 0.0 {
                    -1
                } else {
                    0
                }
            }
            MouseScrollDelta::PixelDelta(position) => {
                if !position.y.is_finite() {
                    return 0;
                }
                // A reversal drops whatever was owed in the old direction.
                if position.y * self.pending_pixels < 0.0 {
                    self.pending_pixels = 0.0;
                }
                self.pending_pixels += position.y;

                let steps = (self.pending_pixels / PIXELS_PER_WHEEL_STEP).trunc();
                self.pending_pixels -= steps * PIXELS_PER_WHEEL_STEP;
                steps as i32
            }
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
