use egui::Context as EguiContext;

use crate::core::state::AppState;
use crate::pipeline::FrameReport;
use crate::presenters::errors::PresentError;

/// Draws one frame of the viewer, with the egui overlay on top, into the window.
pub trait GuiPresenterPort {
    fn render(
        &mut self,
        state: &mut AppState,
        egui_output: egui::FullOutput,
        egui_ctx: &EguiContext,
        time: f32,
    ) -> Result<FrameReport, PresentError>;

    fn resize(&mut self, width: u32, height: u32) -> Result<(), PresentError>;

    fn renderer_name(&self) -> &'static str;
}
