use egui::Context as EguiContext;
use egui_wgpu::{Renderer as EguiRenderer, ScreenDescriptor};
use pixels::wgpu;

/// Paints the egui panels over a target that already holds the fractal.
pub struct EguiOverlay {
    renderer: EguiRenderer,
}

impl EguiOverlay {
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat) -> Self {
        Self {
            renderer: EguiRenderer::new(device, format, None, 1),
        }
    }

    /// Records the overlay into `encoder`.
    ///
    /// Returns the command buffers produced by paint callbacks, which must be
    /// submitted before `encoder`.
    #[allow(clippy::too_many_arguments)]
    pub fn draw(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        ctx: &EguiContext,
        output: egui::FullOutput,
        size_in_pixels: [u32; 2],
    ) -> Vec<wgpu::CommandBuffer> {
        let primitives = ctx.tessellate(output.shapes, ctx.pixels_per_point());
        let screen = ScreenDescriptor {
            size_in_pixels,
            pixels_per_point: ctx.pixels_per_point(),
        };
        let textures = output.textures_delta;

        for (id, delta) in &textures.set {
            self.renderer.update_texture(device, queue, *id, delta);
        }
        let callbacks = self
            .renderer
            .update_buffers(device, queue, encoder, &primitives, &screen);

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("egui overlay"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                ..Default::default()
            });
            self.renderer.render(&mut pass, &primitives, &screen);
        }

        for id in &textures.free {
            self.renderer.free_texture(id);
        }

        callbacks
    }
}
