use pixels::{Pixels, SurfaceTexture};
use winit::window::Window;

use crate::adapters::cpu::CpuBackend;
use crate::adapters::pixel_format::copy_rgb_to_rgba;
use crate::core::data::pixel_buffer::PixelBuffer;
use crate::core::data::size::Size;
use crate::core::state::AppState;
use crate::input::gui::app::ports::presenter::GuiPresenterPort;
use crate::pipeline::{FrameReport, RenderPipeline};
use crate::presenters::egui_overlay::EguiOverlay;
use crate::presenters::errors::PresentError;

/// Software renderer: the passes run on the rayon pool and the finished
/// frame is uploaded through pixels, which scales it onto the window.
pub struct PixelsPresenter {
    pixels: Pixels<'static>,
    overlay: EguiOverlay,
    pipeline: RenderPipeline<CpuBackend>,
    frame: PixelBuffer,
    surface: [u32; 2],
}

impl PixelsPresenter {
    pub fn new(window: &'static Window, state: &AppState) -> Result<Self, PresentError> {
        let inner = window.inner_size();
        let window_size = state.window();
        let pixels = Pixels::new(
            window_size.width(),
            window_size.height(),
            SurfaceTexture::new(inner.width, inner.height, window),
        )?;
        let overlay = EguiOverlay::new(pixels.device(), pixels.render_texture_format());

        Ok(Self {
            pixels,
            overlay,
            pipeline: RenderPipeline::new(CpuBackend::default(), state)?,
            frame: PixelBuffer::new(window_size),
            surface: [inner.width, inner.height],
        })
    }

    fn ensure_frame_size(&mut self, size: Size) -> Result<(), PresentError> {
        if self.frame.size() != size {
            log::debug!("cpu frame resized to {}x{}", size.width(), size.height());
            self.frame.resize(size);
            self.pixels.resize_buffer(size.width(), size.height())?;
        }
        Ok(())
    }
}

impl GuiPresenterPort for PixelsPresenter {
    fn render(
        &mut self,
        state: &mut AppState,
        egui_output: egui::FullOutput,
        egui_ctx: &egui::Context,
        time: f32,
    ) -> Result<FrameReport, PresentError> {
        if self.surface.contains(&0) {
            return Ok(FrameReport::default());
        }

        self.ensure_frame_size(state.window())?;
        let report = self.pipeline.render(state, &mut self.frame, time)?;
        if !report.skipped {
            copy_rgb_to_rgba(self.frame.buffer(), self.pixels.frame_mut())?;
        }

        let overlay = &mut self.overlay;
        let surface = self.surface;
        self.pixels.render_with(|encoder, target, context| {
            context.scaling_renderer.render(encoder, target);
            let callbacks = overlay.draw(
                &context.device,
                &context.queue,
                encoder,
                target,
                egui_ctx,
                egui_output,
                surface,
            );
            context.queue.submit(callbacks);
            Ok(())
        })?;

        Ok(report)
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<(), PresentError> {
        self.surface = [width, height];
        self.pixels.resize_surface(width, height)?;
        Ok(())
    }

    fn renderer_name(&self) -> &'static str {
        "cpu"
    }
}
