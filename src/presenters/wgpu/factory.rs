use winit::window::Window;

use crate::core::state::AppState;
use crate::input::gui::commands::ports::presenter_factory::GuiPresenterFactoryPort;
use crate::presenters::errors::PresentError;
use crate::presenters::wgpu::presenter::WgpuPresenter;

#[derive(Debug, Default)]
pub struct WgpuPresenterFactory {}

impl WgpuPresenterFactory {
    pub fn new() -> Self {
        Self {}
    }
}

impl GuiPresenterFactoryPort<WgpuPresenter> for WgpuPresenterFactory {
    fn build(&self, window: &'static Window, state: &AppState) -> Result<WgpuPresenter, PresentError> {
        WgpuPresenter::new(window, state)
    }
}
