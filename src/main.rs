use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use galaxy_gallery::cli::Cli;
use galaxy_gallery::config::GalleryConfig;
use galaxy_gallery::core::{
    HeadlessEngine, LoopState, ManualScheduler, OrbitControls, RenderLoop,
};
use galaxy_gallery::renderer::WgpuEngine;
use galaxy_gallery::scenes::create_scene;
use galaxy_gallery::traits::{FixedControls, FrameScheduler, SurfaceTarget};
use galaxy_gallery::window::{surface_target, WinitScheduler, WinitSurface};

type WindowLoop = RenderLoop<WgpuEngine, WinitScheduler, OrbitControls>;

struct App {
    cli: Cli,
    config: GalleryConfig,
    window: Option<Arc<Window>>,
    render_loop: Option<WindowLoop>,
    egui_ctx: egui::Context,
    egui_state: Option<egui_winit::State>,
}

impl App {
    fn new(cli: Cli, config: GalleryConfig) -> Self {
        Self {
            cli,
            config,
            window: None,
            render_loop: None,
            egui_ctx: egui::Context::default(),
            egui_state: None,
        }
    }

    fn redraw(&mut self) -> anyhow::Result<()> {
        let (Some(window), Some(render_loop), Some(egui_state)) =
            (&self.window, &mut self.render_loop, &mut self.egui_state)
        else {
            return Ok(());
        };
        if !render_loop.scheduler_mut().take_pending() {
            return Ok(());
        }

        let raw_input = egui_state.take_egui_input(window);
        let show_ui = !self.cli.no_ui;
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            if show_ui {
                render_loop.show_ui(ctx);
            }
        });
        egui_state.handle_platform_output(window, full_output.platform_output);

        let primitives = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        render_loop.engine_mut().queue_overlay(
            primitives,
            full_output.textures_delta,
            full_output.pixels_per_point,
        );

        render_loop.tick()
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let kind = self.cli.scene;
        let window = match event_loop.create_window(
            Window::default_attributes()
                .with_title(kind.title())
                .with_inner_size(winit::dpi::LogicalSize::new(
                    self.config.viewport.width,
                    self.config.viewport.height,
                )),
        ) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                log::error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        let engine = match pollster::block_on(WgpuEngine::new(window.clone())) {
            Ok(engine) => engine,
            Err(e) => {
                log::error!("Failed to initialize renderer: {:#}", e);
                event_loop.exit();
                return;
            }
        };

        let mut render_loop = RenderLoop::new(
            engine,
            WinitScheduler::new(window.clone()),
            create_scene(kind, &self.config),
            self.config.viewport,
        );
        // A zero-sized window mounts on its first resize instead
        render_loop.mount(&WinitSurface(&window), OrbitControls::new);

        self.egui_state = Some(egui_winit::State::new(
            self.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        ));
        self.window = Some(window);
        self.render_loop = Some(render_loop);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        // Let egui handle the event first
        if let (Some(egui_state), Some(window)) = (&mut self.egui_state, &self.window) {
            if egui_state.on_window_event(window, &event).consumed {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => {
                if let Some(render_loop) = &mut self.render_loop {
                    render_loop.teardown();
                }
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                let (Some(render_loop), Some(window)) = (&mut self.render_loop, &self.window)
                else {
                    return;
                };
                if size.width == 0 || size.height == 0 {
                    return;
                }
                let target = surface_target(size.width, size.height, window.scale_factor());
                if render_loop.state() == LoopState::Uninitialized {
                    render_loop.mount(&WinitSurface(window), OrbitControls::new);
                    return;
                }
                render_loop.resize(target);
                if let Some(controls) = render_loop.controls_mut() {
                    controls.resize(&target);
                }
            }
            WindowEvent::RedrawRequested => {
                if let Err(e) = self.redraw() {
                    log::error!("Render error: {:#}", e);
                    if let Some(render_loop) = &mut self.render_loop {
                        render_loop.teardown();
                    }
                    event_loop.exit();
                }
            }
            other => {
                if let Some(controls) = self
                    .render_loop
                    .as_mut()
                    .and_then(|render_loop| render_loop.controls_mut())
                {
                    controls.process_event(&other);
                }
            }
        }
    }
}

fn run_headless(cli: &Cli, config: &GalleryConfig) -> anyhow::Result<()> {
    let mut render_loop = RenderLoop::new(
        HeadlessEngine::new(),
        ManualScheduler::default(),
        create_scene(cli.scene, config),
        config.viewport,
    );
    let surface = Some(SurfaceTarget::new(
        config.viewport.width,
        config.viewport.height,
        1.0,
    ));
    render_loop.mount(&surface, |_, _| FixedControls);

    let frames = render_loop.run_frames(cli.frames)?;
    let engine = render_loop.engine();
    log::info!(
        "{}: {} frames, {} live renderables, {} live resources",
        render_loop.scene_name(),
        frames,
        engine.live_renderables(),
        engine.live_resource_count()
    );

    render_loop.teardown();
    let engine = render_loop.engine();
    if !cli.no_ui {
        println!(
            "{} frames rendered, {} resources left after teardown",
            engine.frames_rendered(),
            engine.live_resource_count()
        );
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = GalleryConfig::resolve(&cli)?;

    if cli.headless {
        return run_headless(&cli, &config);
    }

    let event_loop = EventLoop::new().context("Failed to create event loop")?;
    let mut app = App::new(cli, config);

    if !app.cli.no_ui {
        println!("Galaxy Gallery - Controls: drag to orbit, scroll to zoom, Escape to quit");
    }
    event_loop.run_app(&mut app)?;

    Ok(())
}
