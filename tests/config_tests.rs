use std::fs;
use std::path::PathBuf;

use clap::Parser;
use galaxy_gallery::cli::Cli;
use galaxy_gallery::config::GalleryConfig;
use galaxy_gallery::scenes::SceneKind;

fn temp_config(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "galaxy-gallery-{}-{}.json",
        name,
        std::process::id()
    ));
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_resolve_without_file_uses_defaults() {
    let cli = Cli::parse_from(["galaxy-gallery"]);
    let config = GalleryConfig::resolve(&cli).unwrap();
    assert_eq!(config, GalleryConfig::default());
}

#[test]
fn test_resolve_reads_file_and_applies_flags() {
    let path = temp_config(
        "resolve",
        r##"{
            "viewport": { "width": 1280, "clearColor": "#000000" },
            "galaxy": { "count": 5000, "branches": 5, "insideColor": "#ffffff" },
            "seed": 3
        }"##,
    );
    let cli = Cli::parse_from([
        "galaxy-gallery",
        "--scene",
        "starter",
        "--config",
        path.to_str().unwrap(),
        "--count",
        "64",
    ]);
    let config = GalleryConfig::resolve(&cli).unwrap();
    fs::remove_file(&path).unwrap();

    assert_eq!(cli.scene, SceneKind::Starter);
    assert_eq!(config.viewport.width, 1280);
    assert_eq!(config.viewport.height, 600);
    assert_eq!(config.viewport.clear_color.to_hex(), "#000000");
    assert_eq!(config.galaxy.count, 64);
    assert_eq!(config.galaxy.branches, 5);
    assert_eq!(config.galaxy.inside_color.to_hex(), "#ffffff");
    assert_eq!(config.seed, Some(3));
}

#[test]
fn test_missing_file_names_the_path() {
    let cli = Cli::parse_from([
        "galaxy-gallery",
        "--config",
        "/nonexistent/galaxy-gallery.json",
    ]);
    let err = GalleryConfig::resolve(&cli).unwrap_err();
    assert!(format!("{:#}", err).contains("/nonexistent/galaxy-gallery.json"));
}

#[test]
fn test_invalid_json_is_reported() {
    let path = temp_config("invalid", "{ \"galaxy\": { \"count\": -1 } }");
    let result = GalleryConfig::load(&path);
    fs::remove_file(&path).unwrap();
    assert!(result.is_err());
}

#[test]
fn test_pretty_output_reloads() {
    let mut config = GalleryConfig::default();
    config.galaxy.spin = -2.5;
    config.seed = Some(11);

    let text = config.to_json_pretty().unwrap();
    assert!(text.contains("\"randomnessPower\""));
    assert!(text.contains("\"clearColor\": \"#262837\""));
    assert_eq!(GalleryConfig::from_json(&text).unwrap(), config);
}
