//! Integration tests for Settings config loading.
//!
//! These tests only pass explicit local config files; a global config on the
//! machine running them would still be layered underneath.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use querytree::application::ApplicationError;
use querytree::config::Settings;

#[test]
fn given_local_config_when_load_then_overrides_root_label_and_seed() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("querytree.toml");
    fs::write(
        &path,
        "root_label = \"Saved searches\"\nseed_path = \"/tmp/seed.toml\"\n",
    )
    .unwrap();

    let settings = Settings::load(Some(&path)).expect("load settings");

    assert_eq!(settings.root_label, "Saved searches");
    assert_eq!(settings.seed_path, Some(PathBuf::from("/tmp/seed.toml")));
}

#[test]
fn given_missing_local_config_when_load_then_config_error() {
    let dir = TempDir::new().unwrap();
    let err = Settings::load(Some(&dir.path().join("absent.toml"))).unwrap_err();
    assert!(matches!(err, ApplicationError::Config { .. }));
}

#[test]
fn given_invalid_local_config_when_load_then_config_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("querytree.toml");
    fs::write(&path, "root_label = [").unwrap();

    let err = Settings::load(Some(&path)).unwrap_err();
    assert!(err.to_string().contains("parse"));
}

#[test]
fn given_settings_when_to_toml_then_round_trips() {
    let settings = Settings {
        seed_path: Some(PathBuf::from("/srv/seed.toml")),
        root_label: "Root".to_string(),
    };

    let text = settings.to_toml().unwrap();
    let parsed: Settings = toml::from_str(&text).unwrap();

    assert_eq!(parsed, settings);
}
