use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::cli::Cli;
use crate::galaxy::GalaxyParameters;
use crate::math::Color;

pub const DEFAULT_WIDTH: u32 = 1000;
pub const DEFAULT_HEIGHT: u32 = 600;
pub const DEFAULT_MAX_PIXEL_RATIO: f32 = 2.0;

/// Output size, background and pixel-density cap
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewportConfig {
    pub width: u32,
    pub height: u32,
    pub clear_color: Color,
    pub max_pixel_ratio: f32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            clear_color: Color::from_rgb8(0x26, 0x28, 0x37),
            max_pixel_ratio: DEFAULT_MAX_PIXEL_RATIO,
        }
    }
}

/// Application configuration, read from an optional JSON file
///
/// Every field may be omitted:
///
/// ```json
/// {
///   "viewport": { "width": 1280, "clearColor": "#000000" },
///   "galaxy": { "count": 50000, "branches": 5 },
///   "seed": 42
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GalleryConfig {
    pub viewport: ViewportConfig,
    pub galaxy: GalaxyParameters,
    /// Fixed RNG seed; entropy-seeded when absent
    pub seed: Option<u64>,
}

impl GalleryConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("Invalid config {}", path.display()))
    }

    pub fn from_json(text: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json_pretty(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Command-line flags win over the file
    pub fn apply_overrides(&mut self, cli: &Cli) {
        if let Some(seed) = cli.seed {
            self.seed = Some(seed);
        }
        if let Some(count) = cli.count {
            self.galaxy.count = count;
        }
    }

    /// Load the file named on the command line (if any) and apply overrides
    pub fn resolve(cli: &Cli) -> anyhow::Result<Self> {
        let mut config = match &cli.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply_overrides(cli);
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_default_viewport() {
        let viewport = ViewportConfig::default();
        assert_eq!((viewport.width, viewport.height), (1000, 600));
        assert_eq!(viewport.clear_color.to_hex(), "#262837");
        assert_eq!(viewport.max_pixel_ratio, 2.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = GalleryConfig::from_json(r#"{ "galaxy": { "branches": 5 } }"#).unwrap();
        assert_eq!(config.galaxy.branches, 5);
        assert_eq!(config.galaxy.count, 100_000);
        assert_eq!(config.viewport, ViewportConfig::default());
        assert_eq!(config.seed, None);
    }

    #[test]
    fn test_cli_overrides_file() {
        let mut config =
            GalleryConfig::from_json(r#"{ "seed": 1, "galaxy": { "count": 10 } }"#).unwrap();
        let cli = Cli::parse_from(["galaxy-gallery", "--seed", "9", "--count", "500"]);
        config.apply_overrides(&cli);

        assert_eq!(config.seed, Some(9));
        assert_eq!(config.galaxy.count, 500);
    }

    #[test]
    fn test_bad_color_is_an_error() {
        let result = GalleryConfig::from_json(r#"{ "viewport": { "clearColor": "teal" } }"#);
        assert!(result.is_err());
    }
}
