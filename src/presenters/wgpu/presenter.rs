use std::sync::Arc;

use pixels::wgpu;
use winit::window::Window;

use crate::adapters::wgpu::{SurfaceTarget, WgpuBackend};
use crate::core::data::size::Size;
use crate::core::state::AppState;
use crate::input::gui::app::ports::presenter::GuiPresenterPort;
use crate::pipeline::{FrameReport, RenderPipeline};
use crate::presenters::egui_overlay::EguiOverlay;
use crate::presenters::errors::PresentError;

/// Runs the three passes on the GPU straight into the window surface.
pub struct WgpuPresenter {
    surface: wgpu::Surface<'static>,
    config: wgpu::SurfaceConfiguration,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    pipeline: RenderPipeline<WgpuBackend>,
    overlay: EguiOverlay,
}

impl WgpuPresenter {
    pub fn new(window: &'static Window, state: &AppState) -> Result<Self, PresentError> {
        let size = window.inner_size();
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor::default());
        let surface = instance.create_surface(window)?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .ok_or(PresentError::NoAdapter)?;
        log::info!("using adapter {:?}", adapter.get_info().name);

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("viewer"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default().using_resolution(adapter.limits()),
            },
            None,
        ))?;

        let capabilities = surface.get_capabilities(&adapter);
        let format = capabilities
            .formats
            .iter()
            .copied()
            .find(|format| !format.is_srgb())
            .or_else(|| capabilities.formats.first().copied())
            .ok_or(PresentError::NoAdapter)?;
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            desired_maximum_frame_latency: 2,
            alpha_mode: capabilities
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
        };
        surface.configure(&device, &config);

        let device = Arc::new(device);
        let queue = Arc::new(queue);
        let backend = WgpuBackend::new(Arc::clone(&device), Arc::clone(&queue))?;
        let pipeline = RenderPipeline::new(backend, state)?;
        let overlay = EguiOverlay::new(&device, format);

        Ok(Self {
            surface,
            config,
            device,
            queue,
            pipeline,
            overlay,
        })
    }

    fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }
}

impl GuiPresenterPort for WgpuPresenter {
    fn render(
        &mut self,
        state: &mut AppState,
        egui_output: egui::FullOutput,
        egui_ctx: &egui::Context,
        time: f32,
    ) -> Result<FrameReport, PresentError> {
        let frame = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("surface lost, reconfiguring");
                self.reconfigure();
                return Ok(FrameReport {
                    skipped: true,
                    ..FrameReport::default()
                });
            }
            Err(error) => return Err(error.into()),
        };
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let size = Size::new(self.config.width, self.config.height).unwrap_or(state.window());
        let report = self.pipeline.render(
            state,
            SurfaceTarget {
                view: &view,
                size,
                format: self.config.format,
            },
            time,
        )?;

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some("overlay") });
        let callbacks = self.overlay.draw(
            &self.device,
            &self.queue,
            &mut encoder,
            &view,
            egui_ctx,
            egui_output,
            [self.config.width, self.config.height],
        );

        self.queue
            .submit(callbacks.into_iter().chain(std::iter::once(encoder.finish())));
        frame.present();

        Ok(report)
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<(), PresentError> {
        self.config.width = width;
        self.config.height = height;
        self.reconfigure();
        Ok(())
    }

    fn renderer_name(&self) -> &'static str {
        "gpu"
    }
}
