use std::path::Path;
use std::time::Instant;

use crate::adapters::cpu::CpuBackend;
use crate::controllers::export::errors::ExportError;
use crate::controllers::ports::file_presenter::FilePresenterPort;
use crate::core::data::pixel_buffer::PixelBuffer;
use crate::core::data::size::Size;
use crate::core::state::AppState;
use crate::pipeline::RenderPipeline;

/// Renders a session off-screen with the CPU backend and hands the image to a file presenter.
pub struct ExportController<P: FilePresenterPort> {
    presenter: P,
    buffer: Option<PixelBuffer>,
}

impl<P: FilePresenterPort> ExportController<P> {
    pub fn new(presenter: P) -> Self {
        Self {
            presenter,
            buffer: None,
        }
    }

    /// Renders `state` at `width`x`height`, independent of its window size.
    pub fn generate(
        &mut self,
        state: &AppState,
        width: u32,
        height: u32,
        time: f32,
    ) -> Result<&PixelBuffer, ExportError> {
        let size = Size::new(width, height)?;

        log::info!(
            "exporting {}x{} at center ({}, {}), zoom {}, {} iterations",
            width,
            height,
            state.camera().center().real,
            state.camera().center().imag,
            state.camera().zoom(),
            state.max_iterations()
        );

        let start = Instant::now();
        let mut pipeline = RenderPipeline::new(CpuBackend::default(), state)?;
        let buffer = pipeline.export(state, size, time)?;
        log::info!("export rendered in {:?}", start.elapsed());

        Ok(self.buffer.insert(buffer))
    }

    pub fn buffer(&self) -> Option<&PixelBuffer> {
        self.buffer.as_ref()
    }

    pub fn write(&self, filepath: impl AsRef<Path>) -> Result<(), ExportError> {
        let buffer = self.buffer.as_ref().ok_or(ExportError::NothingRendered)?;
        let filepath = filepath.as_ref();

        if let Some(parent) = filepath.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        self.presenter.present(buffer, filepath)?;
        log::info!("saved to {}", filepath.display());

        Ok(())
    }
}
