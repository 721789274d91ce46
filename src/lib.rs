pub mod camera;
pub mod cli;
pub mod config;
pub mod core;
pub mod frame;
pub mod galaxy;
pub mod geometry;
pub mod material;
pub mod math;
pub mod renderer;
pub mod scenes;
pub mod traits;
pub mod types;
pub mod ui;
pub mod window;

pub use config::GalleryConfig;
pub use core::{HeadlessEngine, LoopState, ManualScheduler, OrbitControls, RenderLoop};
pub use scenes::{create_scene, SceneKind};
