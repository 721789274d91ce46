/// egui output waiting to be drawn over the next frame
struct PendingOverlay {
    primitives: Vec<egui::ClippedPrimitive>,
    textures_delta: egui::TexturesDelta,
    pixels_per_point: f32,
}

/// Draws tessellated egui output on top of the scene
pub struct Overlay {
    renderer: egui_wgpu::Renderer,
    pending: Option<PendingOverlay>,
}

impl Overlay {
    pub fn new(device: &wgpu::Device, color_format: wgpu::TextureFormat) -> Self {
        Self {
            renderer: egui_wgpu::Renderer::new(
                device,
                color_format,
                egui_wgpu::RendererOptions::default(),
            ),
            pending: None,
        }
    }

    /// Replace whatever was queued; only the latest UI output is drawn
    pub fn queue(
        &mut self,
        primitives: Vec<egui::ClippedPrimitive>,
        textures_delta: egui::TexturesDelta,
        pixels_per_point: f32,
    ) {
        // Texture uploads of a skipped frame still have to happen in order.
        let mut merged = self
            .pending
            .take()
            .map(|previous| previous.textures_delta)
            .unwrap_or_default();
        merged.append(textures_delta);

        self.pending = Some(PendingOverlay {
            primitives,
            textures_delta: merged,
            pixels_per_point,
        });
    }

    /// Encode the queued overlay into `view`; returns extra command buffers
    /// egui needs submitted before `encoder`
    pub fn encode(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        size_in_pixels: [u32; 2],
    ) -> Vec<wgpu::CommandBuffer> {
        let Some(pending) = self.pending.take() else {
            return Vec::new();
        };

        for (id, image_delta) in &pending.textures_delta.set {
            self.renderer.update_texture(device, queue, *id, image_delta);
        }

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels,
            pixels_per_point: pending.pixels_per_point,
        };
        let command_buffers = self.renderer.update_buffers(
            device,
            queue,
            encoder,
            &pending.primitives,
            &screen_descriptor,
        );

        {
            let mut render_pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                        depth_slice: None,
                    })],
                    depth_stencil_attachment: None,
                    occlusion_query_set: None,
                    timestamp_writes: None,
                })
                .forget_lifetime();

            self.renderer
                .render(&mut render_pass, &pending.primitives, &screen_descriptor);
        }

        for id in &pending.textures_delta.free {
            self.renderer.free_texture(id);
        }

        command_buffers
    }
}
