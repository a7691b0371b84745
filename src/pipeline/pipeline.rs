use crate::core::data::pixel_buffer::PixelBuffer;
use crate::core::data::size::Size;
use crate::core::palette::texture::PaletteTexture;
use crate::core::state::AppState;
use crate::pipeline::errors::RenderError;
use crate::pipeline::ports::backend::{PassTarget, RenderBackend};
use crate::pipeline::ports::frame_buffer::{FrameBuffer, FrameBufferDescriptor, PixelFormat};
use crate::pipeline::uniforms::{FractalUniforms, PaletteUniforms};

const FRACTAL_BUFFER: &str = "fractal";
const COLOUR_BUFFER: &str = "colour";

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Give the colour buffer a depth/stencil companion.
    pub colour_depth_stencil: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            colour_depth_stencil: true,
        }
    }
}

/// What happened during one [`RenderPipeline::render`] call.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct FrameReport {
    pub fractal_pass: bool,
    pub palette_regenerated: bool,
    /// The frame was dropped because a buffer is incomplete.
    pub skipped: bool,
}

/// Owns the intermediate buffers and sequences the fractal, palette and downsample passes.
pub struct RenderPipeline<B: RenderBackend> {
    backend: B,
    options: PipelineOptions,
    fractal_buffer: B::FrameBuffer,
    colour_buffer: B::FrameBuffer,
    palette: PaletteTexture<B::PaletteLookup>,
    frames: u64,
    fractal_passes: u64,
}

impl<B: RenderBackend> RenderPipeline<B> {
    pub fn new(backend: B, state: &AppState) -> Result<Self, RenderError> {
        Self::with_options(backend, state, PipelineOptions::default())
    }

    pub fn with_options(
        mut backend: B,
        state: &AppState,
        options: PipelineOptions,
    ) -> Result<Self, RenderError> {
        let size = state.render_size();

        let fractal_buffer = backend.create_frame_buffer(&FrameBufferDescriptor::new(
            FRACTAL_BUFFER,
            size,
            PixelFormat::R32Float,
        ))?;
        let colour_buffer = backend.create_frame_buffer(
            &FrameBufferDescriptor::new(COLOUR_BUFFER, size, PixelFormat::Rgb8)
                .with_depth_stencil(options.colour_depth_stencil),
        )?;
        let palette = PaletteTexture::new(backend.create_palette_lookup()?);

        log::info!(
            "render pipeline created at {}x{}",
            size.width(),
            size.height()
        );

        Ok(Self {
            backend,
            options,
            fractal_buffer,
            colour_buffer,
            palette,
            frames: 0,
            fractal_passes: 0,
        })
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn fractal_buffer(&self) -> &B::FrameBuffer {
        &self.fractal_buffer
    }

    pub fn colour_buffer(&self) -> &B::FrameBuffer {
        &self.colour_buffer
    }

    pub fn palette(&self) -> &PaletteTexture<B::PaletteLookup> {
        &self.palette
    }

    /// Regenerate the palette on the next frame regardless of state changes.
    pub fn invalidate_palette(&mut self) {
        self.palette.invalidate();
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn fractal_passes(&self) -> u64 {
        self.fractal_passes
    }

    /// Renders one frame of `state` into `surface`.
    ///
    /// The fractal pass runs only while `state` is dirty and clears the flag.
    /// The palette and downsample passes run every frame.
    pub fn render<'a>(
        &mut self,
        state: &mut AppState,
        surface: B::Surface<'a>,
        time: f32,
    ) -> Result<FrameReport, RenderError>
    where
        B: 'a,
    {
        let mut report = FrameReport::default();
        let size = state.render_size();

        if state.is_dirty() {
            if self.fractal_buffer.size() != size || !self.fractal_buffer.is_complete() {
                self.backend.resize_frame_buffer(&mut self.fractal_buffer, size)?;
            }
            if !self.fractal_buffer.is_complete() {
                log::warn!("fractal buffer incomplete, frame skipped");
                report.skipped = true;
                return Ok(report);
            }

            let uniforms = FractalUniforms::from_state(state, size);
            self.backend.fractal_pass(&mut self.fractal_buffer, &uniforms)?;
            state.clear_dirty();
            self.fractal_passes += 1;
            report.fractal_pass = true;
            log::debug!("fractal pass at {}x{}", size.width(), size.height());
        } else {
            log::trace!("fractal pass skipped, view unchanged");
        }

        let iterations_size = self.fractal_buffer.size();
        if self.colour_buffer.size() != iterations_size || !self.colour_buffer.is_complete() {
            self.backend
                .resize_frame_buffer(&mut self.colour_buffer, iterations_size)?;
        }
        if !self.colour_buffer.is_complete() || !self.fractal_buffer.is_complete() {
            log::warn!("colour buffer incomplete, frame skipped");
            report.skipped = true;
            return Ok(report);
        }

        report.palette_regenerated = self.palette.sync(&state.palette, state.palette_size(), time);
        self.backend.palette_pass(
            &self.fractal_buffer,
            self.palette.lookup(),
            &mut self.colour_buffer,
            &palette_uniforms(state),
        )?;

        self.backend
            .downsample_pass(&self.colour_buffer, PassTarget::Surface(surface))?;

        self.frames += 1;
        Ok(report)
    }

    /// Renders `state` at `size` into fresh buffers and reads the result back.
    ///
    /// The live buffers and the dirty flag are left untouched.
    pub fn export(
        &mut self,
        state: &AppState,
        size: Size,
        time: f32,
    ) -> Result<PixelBuffer, RenderError> {
        let render_size = size.scaled(state.ssaa_factor());

        let mut fractal_buffer = self.create_export_buffer(render_size, PixelFormat::R32Float)?;
        let mut colour_buffer = self.create_export_buffer(render_size, PixelFormat::Rgb8)?;
        let mut output = self.create_export_buffer(size, PixelFormat::Rgb8)?;

        self.backend.fractal_pass(
            &mut fractal_buffer,
            &FractalUniforms::from_state(state, render_size),
        )?;

        self.palette.sync(&state.palette, state.palette_size(), time);
        self.backend.palette_pass(
            &fractal_buffer,
            self.palette.lookup(),
            &mut colour_buffer,
            &palette_uniforms(state),
        )?;

        self.backend
            .downsample_pass(&colour_buffer, PassTarget::FrameBuffer(&mut output))?;

        log::info!("exported {}x{} frame", size.width(), size.height());
        self.backend.read_pixels(&output)
    }

    fn create_export_buffer(
        &mut self,
        size: Size,
        format: PixelFormat,
    ) -> Result<B::FrameBuffer, RenderError> {
        let depth_stencil = format == PixelFormat::Rgb8 && self.options.colour_depth_stencil;
        let buffer = self.backend.create_frame_buffer(
            &FrameBufferDescriptor::new("export", size, format).with_depth_stencil(depth_stencil),
        )?;

        if !buffer.is_complete() {
            return Err(RenderError::IncompleteFrameBuffer {
                label: buffer.label(),
            });
        }
        Ok(buffer)
    }
}

fn palette_uniforms(state: &AppState) -> PaletteUniforms {
    PaletteUniforms {
        palette_size: u32::try_from(state.palette_size()).unwrap_or(u32::MAX),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::data::colour::Rgb;
    use crate::core::palette::PaletteFilter;
    use crate::core::palette::texture::PaletteLookup;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Create(&'static str, Size, bool),
        Resize(&'static str, Size),
        Fractal(Size),
        Palette(u32),
        Downsample(&'static str),
        Read,
    }

    #[derive(Debug)]
    struct StubBuffer {
        label: &'static str,
        size: Size,
        format: PixelFormat,
        depth_stencil: bool,
        complete: bool,
    }

    impl FrameBuffer for StubBuffer {
        fn label(&self) -> &'static str {
            self.label
        }

        fn size(&self) -> Size {
            self.size
        }

        fn format(&self) -> PixelFormat {
            self.format
        }

        fn has_depth_stencil(&self) -> bool {
            self.depth_stencil
        }

        fn is_complete(&self) -> bool {
            self.complete
        }
    }

    #[derive(Debug, Default)]
    struct StubLookup;

    impl PaletteLookup for StubLookup {
        fn upload(&mut self, _: &[Rgb]) {}

        fn set_filter(&mut self, _: PaletteFilter) {}
    }

    #[derive(Debug, Default)]
    struct RecordingBackend {
        calls: Vec<Call>,
        reject_width_over: Option<u32>,
    }

    impl RecordingBackend {
        fn accepts(&self, size: Size) -> bool {
            self.reject_width_over
                .is_none_or(|limit| size.width() <= limit)
        }
    }

    impl RenderBackend for RecordingBackend {
        type FrameBuffer = StubBuffer;
        type PaletteLookup = StubLookup;
        type Surface<'a> = &'static str;

        fn create_frame_buffer(
            &mut self,
            descriptor: &FrameBufferDescriptor,
        ) -> Result<StubBuffer, RenderError> {
            self.calls.push(Call::Create(
                descriptor.label,
                descriptor.size,
                descriptor.depth_stencil,
            ));
            Ok(StubBuffer {
                label: descriptor.label,
                size: descriptor.size,
                format: descriptor.format,
                depth_stencil: descriptor.depth_stencil,
                complete: self.accepts(descriptor.size),
            })
        }

        fn resize_frame_buffer(
            &mut self,
            frame_buffer: &mut StubBuffer,
            size: Size,
        ) -> Result<(), RenderError> {
            self.calls.push(Call::Resize(frame_buffer.label, size));
            frame_buffer.size = size;
            frame_buffer.complete = self.accepts(size);
            Ok(())
        }

        fn create_palette_lookup(&mut self) -> Result<StubLookup, RenderError> {
            Ok(StubLookup)
        }

        fn fractal_pass(
            &mut self,
            _: &mut StubBuffer,
            uniforms: &FractalUniforms,
        ) -> Result<(), RenderError> {
            self.calls.push(Call::Fractal(uniforms.resolution));
            Ok(())
        }

        fn palette_pass(
            &mut self,
            _: &StubBuffer,
            _: &StubLookup,
            _: &mut StubBuffer,
            uniforms: &PaletteUniforms,
        ) -> Result<(), RenderError> {
            self.calls.push(Call::Palette(uniforms.palette_size));
            Ok(())
        }

        fn downsample_pass<'a>(
            &mut self,
            _: &StubBuffer,
            target: PassTarget<'a, Self>,
        ) -> Result<(), RenderError>
        where
            Self: 'a,
        {
            let name = match target {
                PassTarget::Surface(name) => name,
                PassTarget::FrameBuffer(buffer) => buffer.label,
            };
            self.calls.push(Call::Downsample(name));
            Ok(())
        }

        fn read_pixels(&mut self, buffer: &StubBuffer) -> Result<PixelBuffer, RenderError> {
            self.calls.push(Call::Read);
            Ok(PixelBuffer::new(buffer.size))
        }
    }

    fn size(width: u32, height: u32) -> Size {
        Size::new(width, height).unwrap()
    }

    fn pipeline(state: &AppState) -> RenderPipeline<RecordingBackend> {
        let mut pipeline = RenderPipeline::new(RecordingBackend::default(), state).unwrap();
        pipeline.backend_mut().calls.clear();
        pipeline
    }

    #[test]
    fn test_new_creates_buffers_at_supersampled_size() {
        let state = AppState::new(size(40, 30));

        let pipeline = RenderPipeline::new(RecordingBackend::default(), &state).unwrap();

        assert_eq!(
            pipeline.backend().calls,
            vec![
                Call::Create("fractal", size(80, 60), false),
                Call::Create("colour", size(80, 60), true),
            ]
        );
        assert!(pipeline.colour_buffer().has_depth_stencil());
        assert!(!pipeline.fractal_buffer().has_depth_stencil());
    }

    #[test]
    fn test_dirty_frame_runs_all_passes_in_order() {
        let mut state = AppState::new(size(40, 30));
        let mut pipeline = pipeline(&state);

        let report = pipeline.render(&mut state, "surface", 0.0).unwrap();

        assert!(report.fractal_pass);
        assert!(report.palette_regenerated);
        assert!(!state.is_dirty());
        assert_eq!(
            pipeline.backend().calls,
            vec![
                Call::Fractal(size(80, 60)),
                Call::Palette(151),
                Call::Downsample("surface"),
            ]
        );
    }

    #[test]
    fn test_clean_frame_skips_fractal_pass() {
        let mut state = AppState::new(size(40, 30));
        let mut pipeline = pipeline(&state);
        pipeline.render(&mut state, "surface", 0.0).unwrap();
        pipeline.backend_mut().calls.clear();

        let report = pipeline.render(&mut state, "surface", 1.0).unwrap();

        assert!(!report.fractal_pass);
        assert!(!report.palette_regenerated);
        assert_eq!(
            pipeline.backend().calls,
            vec![Call::Palette(151), Call::Downsample("surface")]
        );
        assert_eq!(pipeline.fractal_passes(), 1);
        assert_eq!(pipeline.frames(), 2);
    }

    #[test]
    fn test_invalidated_palette_regenerates_on_clean_frame() {
        let mut state = AppState::new(size(40, 30));
        let mut pipeline = pipeline(&state);
        pipeline.render(&mut state, "surface", 0.0).unwrap();

        pipeline.invalidate_palette();
        let report = pipeline.render(&mut state, "surface", 0.0).unwrap();

        assert!(!report.fractal_pass);
        assert!(report.palette_regenerated);
    }

    #[test]
    fn test_resize_reallocates_both_buffers() {
        let mut state = AppState::new(size(40, 30));
        let mut pipeline = pipeline(&state);
        pipeline.render(&mut state, "surface", 0.0).unwrap();
        pipeline.backend_mut().calls.clear();

        state.resize(size(80, 60));
        pipeline.render(&mut state, "surface", 0.0).unwrap();

        assert_eq!(
            pipeline.backend().calls[..3],
            [
                Call::Resize("fractal", size(160, 120)),
                Call::Fractal(size(160, 120)),
                Call::Resize("colour", size(160, 120)),
            ]
        );
        assert_eq!(pipeline.colour_buffer().size(), size(160, 120));
    }

    #[test]
    fn test_incomplete_buffer_skips_frame_and_keeps_dirty() {
        let mut state = AppState::new(size(40, 30));
        let mut pipeline = pipeline(&state);
        pipeline.backend_mut().reject_width_over = Some(100);

        state.resize(size(60, 30));
        let report = pipeline.render(&mut state, "surface", 0.0).unwrap();

        assert!(report.skipped);
        assert!(state.is_dirty());
        assert!(!pipeline.fractal_buffer().is_complete());

        pipeline.backend_mut().reject_width_over = None;
        let report = pipeline.render(&mut state, "surface", 0.0).unwrap();

        assert!(report.fractal_pass);
        assert!(!state.is_dirty());
    }

    #[test]
    fn test_export_uses_fresh_buffers_and_keeps_state() {
        let mut state = AppState::new(size(40, 30));
        let mut pipeline = pipeline(&state);
        pipeline.render(&mut state, "surface", 0.0).unwrap();
        pipeline.backend_mut().calls.clear();

        let pixels = pipeline.export(&state, size(10, 5), 0.0).unwrap();

        assert_eq!(pixels.size(), size(10, 5));
        assert!(!state.is_dirty());
        assert_eq!(pipeline.fractal_buffer().size(), size(80, 60));
        assert_eq!(
            pipeline.backend().calls,
            vec![
                Call::Create("export", size(20, 10), false),
                Call::Create("export", size(20, 10), true),
                Call::Create("export", size(10, 5), true),
                Call::Fractal(size(20, 10)),
                Call::Palette(151),
                Call::Downsample("export"),
                Call::Read,
            ]
        );
    }
}
