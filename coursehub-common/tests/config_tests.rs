//! Configuration loading and resolution tests
//!
//! Covers:
//! - Missing TOML files do not abort startup (defaults + warning)
//! - Root folder priority: CLI → ENV → TOML → OS default
//! - AI API key priority: ENV → TOML
//! - Taxonomy file loading and validation
//!
//! Tests that touch COURSEHUB_* environment variables are marked #[serial]
//! so they never run in parallel with each other.

use coursehub_common::config::{
    prepare_root_folder, resolve_ai_api_key, AiConfig, RootFolderResolver, TomlConfig,
    AI_API_KEY_ENV, DATABASE_FILE_NAME, ROOT_FOLDER_ENV,
};
use coursehub_common::{Error, Taxonomy};
use serial_test::serial;
use std::env;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_missing_config_file_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let config = TomlConfig::load(&dir.path().join("does-not-exist.toml")).unwrap();

    assert_eq!(config.server.port, 5740);
    assert_eq!(config.catalog.page_size, 9);
}

#[test]
fn test_config_file_loaded() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        r#"
root_folder = "/srv/coursehub"

[catalog]
page_size = 12

[logging]
level = "debug"
"#,
    )
    .unwrap();

    let config = TomlConfig::load(&path).unwrap();
    assert_eq!(config.root_folder, Some(PathBuf::from("/srv/coursehub")));
    assert_eq!(config.catalog.page_size, 12);
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn test_malformed_config_file_is_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[server\nport = ").unwrap();

    let result = TomlConfig::load(&path);
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
#[serial]
fn test_cli_argument_wins() {
    env::set_var(ROOT_FOLDER_ENV, "/from/env");
    let config = TomlConfig {
        root_folder: Some(PathBuf::from("/from/toml")),
        ..Default::default()
    };

    let resolver = RootFolderResolver::new(Some(PathBuf::from("/from/cli")), &config);
    assert_eq!(resolver.resolve(), PathBuf::from("/from/cli"));

    env::remove_var(ROOT_FOLDER_ENV);
}

#[test]
#[serial]
fn test_env_beats_toml() {
    env::set_var(ROOT_FOLDER_ENV, "/from/env");
    let config = TomlConfig {
        root_folder: Some(PathBuf::from("/from/toml")),
        ..Default::default()
    };

    let resolver = RootFolderResolver::new(None, &config);
    assert_eq!(resolver.resolve(), PathBuf::from("/from/env"));

    env::remove_var(ROOT_FOLDER_ENV);
}

#[test]
#[serial]
fn test_toml_beats_default() {
    env::remove_var(ROOT_FOLDER_ENV);
    let config = TomlConfig {
        root_folder: Some(PathBuf::from("/from/toml")),
        ..Default::default()
    };

    let resolver = RootFolderResolver::new(None, &config);
    assert_eq!(resolver.resolve(), PathBuf::from("/from/toml"));
}

#[test]
#[serial]
fn test_default_root_folder_when_nothing_set() {
    env::remove_var(ROOT_FOLDER_ENV);
    let resolver = RootFolderResolver::new(None, &TomlConfig::default());

    let root = resolver.resolve();
    assert!(root.to_string_lossy().contains("coursehub"));
}

#[test]
fn test_prepare_root_folder_creates_directory() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("nested").join("root");

    let db_path = prepare_root_folder(&root).unwrap();

    assert!(root.is_dir());
    assert_eq!(db_path, root.join(DATABASE_FILE_NAME));
}

#[test]
#[serial]
fn test_ai_key_env_priority() {
    env::set_var(AI_API_KEY_ENV, "env-key");
    let config = AiConfig {
        api_key: Some("toml-key".to_string()),
        ..Default::default()
    };

    assert_eq!(resolve_ai_api_key(&config), Some("env-key".to_string()));

    env::remove_var(AI_API_KEY_ENV);
}

#[test]
#[serial]
fn test_ai_key_falls_back_to_toml() {
    env::remove_var(AI_API_KEY_ENV);
    let config = AiConfig {
        api_key: Some("toml-key".to_string()),
        ..Default::default()
    };

    assert_eq!(resolve_ai_api_key(&config), Some("toml-key".to_string()));
}

#[test]
#[serial]
fn test_blank_ai_keys_ignored() {
    env::set_var(AI_API_KEY_ENV, "   ");
    let config = AiConfig {
        api_key: Some(String::new()),
        ..Default::default()
    };

    assert_eq!(resolve_ai_api_key(&config), None);

    env::remove_var(AI_API_KEY_ENV);
}

#[test]
fn test_taxonomy_file_loaded() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("taxonomy.toml");
    fs::write(
        &path,
        r#"
[[schools]]
name = "School of Engineering"
departments = ["Civil Engineering", "Electrical Engineering"]
"#,
    )
    .unwrap();

    let taxonomy = Taxonomy::load(&path).unwrap();
    assert_eq!(
        taxonomy.school_of("Civil Engineering"),
        Some("School of Engineering")
    );
}

#[test]
fn test_invalid_taxonomy_file_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("taxonomy.toml");
    fs::write(
        &path,
        r#"
[[schools]]
name = "A"
departments = ["Shared"]

[[schools]]
name = "B"
departments = ["Shared"]
"#,
    )
    .unwrap();

    let result = Taxonomy::load(&path);
    assert!(matches!(result, Err(Error::Taxonomy(_))));
}
