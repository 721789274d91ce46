use galaxy_gallery::config::GalleryConfig;
use galaxy_gallery::core::{HeadlessEngine, LoopState, ManualScheduler, RenderLoop};
use galaxy_gallery::galaxy::{generate, GalaxyParameters};
use galaxy_gallery::scenes::{create_scene, SceneKind};
use galaxy_gallery::traits::{FixedControls, FrameScheduler, SurfaceTarget};
use rand::rngs::StdRng;
use rand::SeedableRng;

type TestLoop = RenderLoop<HeadlessEngine, ManualScheduler, FixedControls>;

fn small_config() -> GalleryConfig {
    let mut config = GalleryConfig::default();
    config.galaxy.count = 200;
    config.seed = Some(9);
    config
}

fn galaxy_loop() -> TestLoop {
    let config = small_config();
    RenderLoop::new(
        HeadlessEngine::new(),
        ManualScheduler::default(),
        create_scene(SceneKind::Galaxy, &config),
        config.viewport,
    )
}

fn surface() -> Option<SurfaceTarget> {
    Some(SurfaceTarget::new(1000, 600, 1.0))
}

fn mounted(kind: SceneKind) -> TestLoop {
    let config = small_config();
    let mut render_loop = RenderLoop::new(
        HeadlessEngine::new(),
        ManualScheduler::default(),
        create_scene(kind, &config),
        config.viewport,
    );
    assert!(render_loop.mount(&surface(), |_, _| FixedControls));
    render_loop
}

fn cloud(count: usize, seed: u64) -> galaxy_gallery::galaxy::ParticleCloud {
    let params = GalaxyParameters {
        count,
        ..Default::default()
    };
    generate(&params, &mut StdRng::seed_from_u64(seed))
}

#[test]
fn test_missing_surface_stays_uninitialized() {
    let mut render_loop = galaxy_loop();
    let missing: Option<SurfaceTarget> = None;

    assert!(!render_loop.mount(&missing, |_, _| FixedControls));
    assert_eq!(render_loop.state(), LoopState::Uninitialized);
    assert_eq!(render_loop.engine().live_resource_count(), 0);
    assert!(!render_loop.scheduler().is_pending());

    // Ticks before a surface exists do nothing
    render_loop.tick().unwrap();
    assert_eq!(render_loop.engine().frames_rendered(), 0);

    // A later mount with a surface starts normally
    assert!(render_loop.mount(&surface(), |_, _| FixedControls));
    assert_eq!(render_loop.state(), LoopState::Running);
}

#[test]
fn test_mount_builds_scene_and_requests_first_frame() {
    let render_loop = mounted(SceneKind::Galaxy);
    let engine = render_loop.engine();

    assert_eq!(engine.attached().len(), 1);
    assert_eq!(engine.live_resource_count(), 3);
    assert_eq!(render_loop.scheduler().requests(), 1);
    assert!(render_loop.scheduler().is_pending());
}

#[test]
fn test_install_same_cloud_twice_keeps_one_renderable() {
    let mut render_loop = mounted(SceneKind::Galaxy);
    let material = GalaxyParameters::default().points_material();
    let cloud = cloud(100, 1);

    let first = render_loop.install_cloud(&cloud, material).unwrap();
    let second = render_loop.install_cloud(&cloud, material).unwrap();

    let engine = render_loop.engine();
    assert_ne!(first, second);
    assert_eq!(engine.attached(), &[second]);
    assert_eq!(engine.peak_attached(), 1);
    assert_eq!(engine.live_renderables(), 1);
    assert_eq!(engine.invalid_releases(), 0);
}

#[test]
fn test_install_replaces_without_accumulating() {
    let mut render_loop = mounted(SceneKind::Galaxy);
    let material = GalaxyParameters::default().points_material();

    render_loop.install_cloud(&cloud(100, 1), material).unwrap();
    let after_first = render_loop.resources().resource_count();
    let live_after_first = render_loop.engine().live_resource_count();

    let b = render_loop.install_cloud(&cloud(300, 2), material).unwrap();
    assert_eq!(render_loop.resources().resource_count(), after_first);
    assert_eq!(render_loop.engine().live_resource_count(), live_after_first);
    assert_eq!(render_loop.engine().vertex_count_of(b), Some(300));
}

#[test]
fn test_ticks_render_and_reschedule() {
    let mut render_loop = mounted(SceneKind::Galaxy);

    let frames = render_loop.run_frames(10).unwrap();
    assert_eq!(frames, 10);
    assert_eq!(render_loop.engine().frames_rendered(), 10);
    // One request from mount, one per tick
    assert_eq!(render_loop.scheduler().requests(), 11);
    assert_eq!(render_loop.frame_clock().frame_number(), 10);
}

#[test]
fn test_engine_renders_from_loop_camera() {
    let mut render_loop = mounted(SceneKind::Galaxy);
    assert!(render_loop.engine().last_camera().is_none());

    render_loop.run_frames(1).unwrap();
    let camera = render_loop.engine().last_camera().copied().unwrap();
    assert_eq!(camera, *render_loop.camera());
    assert!((camera.aspect - 1000.0 / 600.0).abs() < 1e-6);
}

#[test]
fn test_render_failure_stops_scheduling() {
    let mut render_loop = mounted(SceneKind::Starter);
    render_loop.run_frames(2).unwrap();
    render_loop.engine_mut().fail_next_render();

    let pending = render_loop.scheduler_mut().take_pending();
    assert!(pending);
    assert!(render_loop.tick().is_err());
    assert!(!render_loop.scheduler().is_pending());
    assert_eq!(render_loop.run_frames(5).unwrap(), 0);
}

#[test]
fn test_teardown_twice_releases_once() {
    let mut render_loop = mounted(SceneKind::Factory);
    render_loop.run_frames(3).unwrap();
    assert!(render_loop.engine().live_resource_count() > 0);

    render_loop.teardown();
    render_loop.teardown();

    let engine = render_loop.engine();
    assert_eq!(render_loop.state(), LoopState::Disposed);
    assert_eq!(engine.live_resource_count(), 0);
    assert!(engine.attached().is_empty());
    assert_eq!(engine.invalid_releases(), 0);
    assert_eq!(render_loop.scheduler().cancels(), 1);
    assert!(!render_loop.scheduler().is_pending());
}

#[test]
fn test_nothing_runs_after_teardown() {
    let mut render_loop = mounted(SceneKind::Galaxy);
    render_loop.run_frames(1).unwrap();
    render_loop.teardown();
    let rendered = render_loop.engine().frames_rendered();

    render_loop.tick().unwrap();
    assert_eq!(render_loop.run_frames(5).unwrap(), 0);
    assert_eq!(render_loop.engine().frames_rendered(), rendered);

    let material = GalaxyParameters::default().points_material();
    assert!(render_loop.install_cloud(&cloud(10, 3), material).is_none());
    assert_eq!(render_loop.engine().live_resource_count(), 0);

    // Disposed is terminal
    assert!(!render_loop.mount(&surface(), |_, _| FixedControls));
    assert_eq!(render_loop.state(), LoopState::Disposed);
}

#[test]
fn test_galaxy_rotates_each_tick() {
    let mut render_loop = mounted(SceneKind::Galaxy);
    let points = render_loop.engine().attached()[0];

    render_loop.run_frames(4).unwrap();
    let transform = render_loop.engine().transform_of(points).unwrap();
    assert!((transform.rotation.y - 0.004).abs() < 1e-6);
}

#[test]
fn test_factory_builds_fixtures_and_props() {
    let render_loop = mounted(SceneKind::Factory);
    let resources = render_loop.resources();

    assert!(resources.primary().is_some());
    assert_eq!(resources.fixtures().len(), 5);
    assert_eq!(resources.props().len(), galaxy_gallery::scenes::SMOKE_PUFFS);
    assert_eq!(
        render_loop.engine().attached().len(),
        1 + 5 + galaxy_gallery::scenes::SMOKE_PUFFS
    );
}
