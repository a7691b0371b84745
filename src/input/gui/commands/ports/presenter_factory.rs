use winit::window::Window;

use crate::core::state::AppState;
use crate::input::gui::app::ports::presenter::GuiPresenterPort;
use crate::presenters::errors::PresentError;

pub trait GuiPresenterFactoryPort<T: GuiPresenterPort> {
    fn build(&self, window: &'static Window, state: &AppState) -> Result<T, PresentError>;
}
