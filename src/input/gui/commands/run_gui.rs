use std::marker::PhantomData;

use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::{Event, WindowEvent};
use winit::event_loop::EventLoop;
use winit::window::{Window, WindowBuilder};

use crate::core::state::AppState;
use crate::input::gui::app::gui_app::{FrameOutcome, GuiApp};
use crate::input::gui::app::ports::presenter::GuiPresenterPort;
use crate::input::gui::commands::ports::presenter_factory::GuiPresenterFactoryPort;
use crate::input::gui::errors::GuiError;
use crate::presenters::errors::PresentError;

pub struct RunGuiCommand<F, P>
where
    P: GuiPresenterPort,
    F: GuiPresenterFactoryPort<P>,
{
    presenter_factory: F,
    _phantom: PhantomData<fn() -> P>,
}

impl<F, P> RunGuiCommand<F, P>
where
    P: GuiPresenterPort,
    F: GuiPresenterFactoryPort<P>,
{
    pub fn new(presenter_factory: F) -> Self {
        Self {
            presenter_factory,
            _phantom: PhantomData,
        }
    }

    /// Runs the viewer until the window closes and returns the final state.
    pub fn execute(&self, state: AppState) -> Result<AppState, GuiError> {
        let event_loop = EventLoop::new()?;

        // pixels and wgpu surfaces borrow the window for their whole life.
        let window: &'static Window = Box::leak(Box::new(
            WindowBuilder::new()
                .with_title("Mandelbrot Viewer")
                .with_inner_size(PhysicalSize::new(
                    state.window().width(),
                    state.window().height(),
                ))
                .with_min_inner_size(LogicalSize::new(200.0, 200.0))
                .build(&event_loop)?,
        ));

        let presenter: P = self
            .presenter_factory
            .build(window, &state)
            .inspect_err(|error| log::error!("could not start renderer: {}", error))?;
        log::info!("viewer started with the {} renderer", presenter.renderer_name());

        let mut app = GuiApp::new(window, &event_loop, presenter, state);
        let mut failure: Option<PresentError> = None;

        event_loop.run(|event, elwt| match event {
            Event::WindowEvent {
                ref event,
                window_id,
            } if window_id == window.id() => {
                app.handle_window_event(window, event);

                match event {
                    WindowEvent::CloseRequested => elwt.exit(),
                    WindowEvent::RedrawRequested => match app.frame(window) {
                        Ok(FrameOutcome::Continue) => {}
                        Ok(FrameOutcome::Quit) => elwt.exit(),
                        Err(error) => {
                            log::error!("render failed: {}", error);
                            failure = Some(error);
                            elwt.exit();
                        }
                    },
                    WindowEvent::Resized(size) => {
                        if let Err(error) = app.resize(size.width, size.height) {
                            log::error!("resize failed: {}", error);
                            failure = Some(error);
                            elwt.exit();
                        }
                    }
                    WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                        app.scale_factor = *scale_factor;
                        app.egui_ctx.set_pixels_per_point(*scale_factor as f32);
                        let size = window.inner_size();
                        if let Err(error) = app.resize(size.width, size.height) {
                            log::error!("resize failed: {}", error);
                            failure = Some(error);
                            elwt.exit();
                        }
                    }
                    _ => {}
                }
            }
            // Continuous redraw: held keys, auto zoom and palette animation all advance per frame.
            Event::AboutToWait => window.request_redraw(),
            _ => {}
        })?;

        match failure {
            Some(error) => Err(error.into()),
            None => Ok(app.into_state()),
        }
    }
}
