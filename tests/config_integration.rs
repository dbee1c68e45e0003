//! Integration tests for configuration loading
//!
//! Tests that verify config loading from files and environment variables.

use juxtapos::config::AppConfig;
use serial_test::serial;

#[test]
#[serial]
fn test_env_override() {
    std::env::set_var("JXT_WINDOW__TITLE", "Test From Env");
    let config = AppConfig::load().unwrap();
    assert_eq!(config.window.title, "Test From Env");
    std::env::remove_var("JXT_WINDOW__TITLE");
}

#[test]
#[serial]
fn test_env_override_nested_number() {
    std::env::set_var("JXT_RENDERING__PEEL_PASSES", "12");
    let config = AppConfig::load().unwrap();
    assert_eq!(config.rendering.peel_passes, 12);
    // Untouched keys keep their file values
    assert_eq!(config.rendering.face_opacity, 0.35);
    std::env::remove_var("JXT_RENDERING__PEEL_PASSES");
}

#[test]
#[serial]
fn test_invalid_env_value_rejected() {
    std::env::set_var("JXT_RENDERING__PEEL_PASSES", "0");
    let result = AppConfig::load();
    std::env::remove_var("JXT_RENDERING__PEEL_PASSES");

    let err = result.unwrap_err();
    assert!(err.to_string().contains("peel_passes"));
}

#[test]
#[serial]
fn test_default_file_matches_builtin_defaults() {
    std::env::remove_var("JXT_WINDOW__TITLE");

    let cwd = std::env::current_dir().unwrap();
    assert!(cwd.join("config/default.toml").exists());

    let from_file = AppConfig::load_from(cwd.join("config")).unwrap();
    let builtin = AppConfig::default();
    assert_eq!(from_file.window.title, builtin.window.title);
    assert_eq!(from_file.window.width, builtin.window.width);
    assert_eq!(from_file.camera.eye, builtin.camera.eye);
    assert_eq!(from_file.geometry.dimension, builtin.geometry.dimension);
    assert_eq!(from_file.spin.plane, builtin.spin.plane);
    assert_eq!(from_file.rendering.peel_passes, builtin.rendering.peel_passes);
    assert_eq!(from_file.rendering.msaa_samples, builtin.rendering.msaa_samples);
    assert!((from_file.spin.speed - builtin.spin.speed).abs() < 1e-6);
}

#[test]
#[serial]
fn test_missing_directory_uses_defaults() {
    let config = AppConfig::load_from("does/not/exist").unwrap();
    assert_eq!(config.window.title, "Juxtapos");
    assert_eq!(config.rendering.peel_passes, 8);
}

#[test]
#[serial]
fn test_degenerate_fov_rejected() {
    std::env::set_var("JXT_CAMERA__FOV", "0");
    let result = AppConfig::load();
    std::env::remove_var("JXT_CAMERA__FOV");

    let err = result.unwrap_err();
    assert!(err.to_string().contains("camera.fov"));
}
