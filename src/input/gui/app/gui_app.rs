use std::time::Instant;

use egui::Context;
use egui_winit::State as EguiWinitState;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::EventLoop;
use winit::keyboard::PhysicalKey;
use winit::window::Window;

use crate::core::data::size::Size;
use crate::core::state::AppState;
use crate::core::util::pixel_to_complex_coords::ScreenPoint;
use crate::input::gui::app::frame_stats::FrameStats;
use crate::input::gui::app::panels::{PanelStats, draw_panels};
use crate::input::gui::app::ports::presenter::GuiPresenterPort;
use crate::input::gui::app::viewer_input::{ViewerInputState, WheelAccumulator};
use crate::presenters::errors::PresentError;

/// What the event loop should do after a frame.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FrameOutcome {
    Continue,
    Quit,
}

pub struct GuiApp<T: GuiPresenterPort> {
    width: u32,
    height: u32,
    pub scale_factor: f64,
    presenter: T,
    state: AppState,
    input: ViewerInputState,
    wheel: WheelAccumulator,
    cursor: ScreenPoint,
    started: Instant,
    frame_stats: FrameStats,
    last_error_message: Option<String>,
    pub egui_ctx: Context,
    pub egui_state: EguiWinitState,
}

impl<T: GuiPresenterPort> GuiApp<T> {
    pub fn new(
        window: &'static Window,
        event_loop: &EventLoop<()>,
        presenter: T,
        mut state: AppState,
    ) -> Self {
        let size = window.inner_size();
        let scale_factor = window.scale_factor();
        let egui_ctx = Context::default();

        let egui_state = EguiWinitState::new(
            egui_ctx.clone(),
            egui_ctx.viewport_id(),
            event_loop,
            Some(scale_factor as f32),
            None,
        );

        if let Ok(window_size) = Size::new(size.width, size.height) {
            state.resize(window_size);
        }
        let now = Instant::now();

        Self {
            width: size.width,
            height: size.height,
            scale_factor,
            presenter,
            state,
            input: ViewerInputState::default(),
            wheel: WheelAccumulator::default(),
            cursor: ScreenPoint::new(0.0, 0.0),
            started: now,
            frame_stats: FrameStats::new(now),
            last_error_message: None,
            egui_ctx,
            egui_state,
        }
    }

    pub fn into_state(self) -> AppState {
        self.state
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), PresentError> {
        self.width = width;
        self.height = height;

        // Minimised windows report zero; keep the last real size.
        let Ok(size) = Size::new(width, height) else {
            return Ok(());
        };

        self.state.resize(size);
        self.presenter.resize(width, height)
    }

    /// Forwards `event` to egui, then to the camera unless egui claimed it.
    ///
    /// Returns whether egui consumed the event.
    pub fn handle_window_event(&mut self, window: &Window, event: &WindowEvent) -> bool {
        let response = self.egui_state.on_window_event(window, event);
        let pointer_over_ui = self.state.show_ui
            && (self.egui_ctx.wants_pointer_input() || self.egui_ctx.is_pointer_over_area());

        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(code) = event.physical_key {
                    self.input.handle_key_event(code, event.state, event.repeat);
                }
            }
            WindowEvent::Focused(false) => {
                self.input.reset();
                self.wheel.reset();
                self.state.end_drag();
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = ScreenPoint::new(position.x, position.y);
                if self.state.is_dragging() {
                    self.state.drag_to(self.cursor);
                }
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => match state {
                ElementState::Pressed if !pointer_over_ui => self.state.begin_drag(self.cursor),
                ElementState::Released => self.state.end_drag(),
                ElementState::Pressed => {}
            },
            WindowEvent::MouseWheel { delta, .. } if !pointer_over_ui => {
                let steps = self.wheel.steps(*delta);
                for _ in 0..steps.unsigned_abs() {
                    self.state.zoom_at_cursor(self.cursor, f64::from(steps.signum()));
                }
            }
            _ => {}
        }

        response.consumed
    }

    /// Applies held keys, lays out the UI and renders one frame.
    pub fn frame(&mut self, window: &Window) -> Result<FrameOutcome, PresentError> {
        let input = self.input.snapshot(self.egui_ctx.wants_keyboard_input());
        if input.quit {
            return Ok(FrameOutcome::Quit);
        }
        if input.toggle_ui {
            self.state.show_ui = !self.state.show_ui;
        }
        self.state.apply_controls(input.controls);

        let time = self.started.elapsed().as_secs_f32();
        let stats = PanelStats {
            fps: self.frame_stats.fps(),
            renderer: self.presenter.renderer_name(),
            last_error: self.last_error_message.clone(),
        };

        let raw_input = self.egui_state.take_egui_input(window);
        let state = &mut self.state;
        let egui_output = self.egui_ctx.run(raw_input, |ctx| {
            if state.show_ui {
                draw_panels(ctx, state, &stats, time);
            }
        });
        self.egui_state
            .handle_platform_output(window, egui_output.platform_output.clone());

        if self.width == 0 || self.height == 0 {
            return Ok(FrameOutcome::Continue);
        }

        let report = self
            .presenter
            .render(&mut self.state, egui_output, &self.egui_ctx, time)?;
        if report.skipped {
            self.last_error_message = Some("frame buffer incomplete, frame skipped".to_string());
        } else {
            self.last_error_message = None;
        }
        self.frame_stats.record_frame(Instant::now());

        Ok(FrameOutcome::Continue)
    }
}
