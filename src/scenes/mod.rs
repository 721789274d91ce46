mod factory;
mod galaxy;
mod starter;

pub use factory::{drift_smoke, smoke_origin, FactoryScene, SMOKE_MAX_DRIFT, SMOKE_PUFFS, SMOKE_RESET_HEIGHT};
pub use galaxy::{GalaxyScene, ROTATION_PER_FRAME};
pub use starter::StarterScene;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::GalleryConfig;
use crate::traits::SceneProvider;

/// Scenes the gallery can open
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SceneKind {
    Galaxy,
    Factory,
    Starter,
}

impl SceneKind {
    pub fn title(&self) -> &'static str {
        match self {
            SceneKind::Galaxy => "Galaxy",
            SceneKind::Factory => "Mini Factory",
            SceneKind::Starter => "Starter",
        }
    }
}

/// Seeded when a seed is configured, entropy-seeded otherwise
pub fn scene_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => {
            log::info!("Using RNG seed {}", seed);
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_os_rng(),
    }
}

pub fn create_scene(kind: SceneKind, config: &GalleryConfig) -> Box<dyn SceneProvider> {
    let rng = scene_rng(config.seed);
    match kind {
        SceneKind::Galaxy => Box::new(GalaxyScene::new(config.galaxy, rng)),
        SceneKind::Factory => Box::new(FactoryScene::new(rng)),
        SceneKind::Starter => Box::new(StarterScene),
    }
}
