use crate::camera::Camera;
use crate::config::ViewportConfig;
use crate::frame::FrameClock;
use crate::galaxy::ParticleCloud;
use crate::geometry::GeometryData;
use crate::material::{MaterialConfig, PointsMaterial};
use crate::traits::{
    FrameScheduler, InteractionControls, RenderEngine, RenderableHandle, SceneProvider,
    SurfaceProvider, SurfaceTarget, Viewport,
};
use crate::ui;

use super::resources::ResourceSet;
use super::scene::Scene;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Created, waiting for a drawing surface
    Uninitialized,
    Running,
    /// Torn down; terminal
    Disposed,
}

/// Owns a scene's resources and drives its per-frame cycle
///
/// Each `tick` updates the controls, lets the scene provider animate,
/// renders one frame and asks the scheduler for the next one. Teardown
/// cancels the pending frame and releases every owned resource once.
pub struct RenderLoop<E: RenderEngine, S: FrameScheduler, C: InteractionControls> {
    state: LoopState,
    engine: E,
    scheduler: S,
    controls: Option<C>,
    provider: Box<dyn SceneProvider>,
    resources: ResourceSet,
    camera: Camera,
    clock: FrameClock,
    viewport: ViewportConfig,
}

impl<E: RenderEngine, S: FrameScheduler, C: InteractionControls> RenderLoop<E, S, C> {
    pub fn new(
        engine: E,
        scheduler: S,
        provider: Box<dyn SceneProvider>,
        viewport: ViewportConfig,
    ) -> Self {
        let camera = provider
            .camera()
            .with_aspect(viewport.width, viewport.height);
        Self {
            state: LoopState::Uninitialized,
            engine,
            scheduler,
            controls: None,
            provider,
            resources: ResourceSet::new(),
            camera,
            clock: FrameClock::new(),
            viewport,
        }
    }

    /// Start the loop once `surface` has a drawing surface
    ///
    /// Without one nothing happens and the loop stays `Uninitialized`;
    /// the host may try again later. Returns whether the loop started.
    pub fn mount<P, F>(&mut self, surface: &P, make_controls: F) -> bool
    where
        P: SurfaceProvider + ?Sized,
        F: FnOnce(&Camera, &SurfaceTarget) -> C,
    {
        if self.state != LoopState::Uninitialized {
            log::warn!("Mount ignored in state {:?}", self.state);
            return false;
        }
        let Some(target) = surface.surface() else {
            log::debug!("No drawing surface yet, {} not started", self.provider.name());
            return false;
        };

        self.apply_surface(&target);
        {
            let mut scene = Scene::new(&mut self.engine, &mut self.resources);
            self.provider.build(&mut scene);
        }
        self.controls = Some(make_controls(&self.camera, &target));
        self.clock = FrameClock::new();
        self.state = LoopState::Running;
        self.scheduler.request_frame();

        log::info!(
            "{} running at {}x{} ({} resources)",
            self.provider.name(),
            target.width,
            target.height,
            self.resources.resource_count()
        );
        true
    }

    fn apply_surface(&mut self, target: &SurfaceTarget) {
        let viewport = Viewport {
            width: target.width,
            height: target.height,
            pixel_ratio: target.clamped_pixel_ratio(self.viewport.max_pixel_ratio),
            clear_color: self.viewport.clear_color,
        };
        self.engine.set_viewport(&viewport);
        self.camera.set_aspect(target.width, target.height);
    }

    /// Swap in a new primary renderable; `None` once disposed
    pub fn install(
        &mut self,
        geometry: GeometryData,
        material: impl Into<MaterialConfig>,
    ) -> Option<RenderableHandle> {
        if self.state == LoopState::Disposed {
            log::warn!("Install after teardown ignored");
            return None;
        }
        let mut scene = Scene::new(&mut self.engine, &mut self.resources);
        Some(scene.install(geometry, material))
    }

    pub fn install_cloud(
        &mut self,
        cloud: &ParticleCloud,
        material: PointsMaterial,
    ) -> Option<RenderableHandle> {
        self.install(cloud.to_geometry(), material)
    }

    /// Run one frame: controls, animation, render, schedule next
    ///
    /// Does nothing unless running. A render error is returned as is and
    /// no further frame is requested.
    pub fn tick(&mut self) -> anyhow::Result<()> {
        if self.state != LoopState::Running {
            return Ok(());
        }

        let frame = self.clock.next_frame();
        if let Some(controls) = self.controls.as_mut() {
            controls.update(&mut self.camera);
        }
        {
            let mut scene = Scene::new(&mut self.engine, &mut self.resources);
            self.provider.animate(&mut scene, &frame);
        }
        self.engine.render_frame(&self.camera)?;
        self.scheduler.request_frame();
        Ok(())
    }

    /// Tick for as long as frames are requested, at most `max_frames` times
    pub fn run_frames(&mut self, max_frames: u64) -> anyhow::Result<u64> {
        let mut frames = 0;
        while frames < max_frames && self.scheduler.take_pending() {
            self.tick()?;
            frames += 1;
        }
        Ok(frames)
    }

    /// Stop the loop and release everything it owns; safe to call repeatedly
    pub fn teardown(&mut self) {
        if self.state == LoopState::Disposed {
            return;
        }

        self.scheduler.cancel_frame();
        let released = self.resources.release_all(&mut self.engine);
        self.controls = None;
        self.state = LoopState::Disposed;
        log::info!(
            "{} torn down, {} slots released",
            self.provider.name(),
            released
        );
    }

    pub fn resize(&mut self, target: SurfaceTarget) {
        if self.state == LoopState::Running && target.width > 0 && target.height > 0 {
            self.apply_surface(&target);
        }
    }

    /// Draw the gallery panel; rebuilds the scene when a parameter changed
    pub fn show_ui(&mut self, ctx: &egui::Context) -> bool {
        if self.state != LoopState::Running {
            return false;
        }

        let title = self.provider.name().to_owned();
        let provider = &mut self.provider;
        let changed = ui::gallery_panel(ctx, &title, self.clock.fps(), |ui| {
            provider.parameter_ui(ui)
        });

        if changed {
            self.rebuild();
        }
        changed
    }

    /// Let the provider replace its resources after a parameter change
    pub fn rebuild(&mut self) {
        if self.state != LoopState::Running {
            return;
        }
        log::debug!("Rebuilding {}", self.provider.name());
        let mut scene = Scene::new(&mut self.engine, &mut self.resources);
        self.provider.rebuild(&mut scene);
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn controls_mut(&mut self) -> Option<&mut C> {
        self.controls.as_mut()
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn resources(&self) -> &ResourceSet {
        &self.resources
    }

    pub fn frame_clock(&self) -> &FrameClock {
        &self.clock
    }

    pub fn scene_name(&self) -> &str {
        self.provider.name()
    }
}

impl<E: RenderEngine, S: FrameScheduler, C: InteractionControls> Drop for RenderLoop<E, S, C> {
    fn drop(&mut self) {
        self.teardown();
    }
}
