/*!
 * Tests for configuration loading, saving and validation
 */

use alttext_sync::app_config::{Config, LogLevel};
use alttext_sync::context::ContextScope;
use crate::common;

#[test]
fn test_save_thenFromFile_shouldPreserveValues() {
    let dir = common::create_temp_dir().unwrap();
    let path = dir.path().join("conf.json");
    let mut config = Config::default();
    config.sync.page_size = 25;
    config.context.actor = "importer".to_string();
    config.context.scope = ContextScope::ReadOnly;
    config.log_level = LogLevel::Warn;

    config.save(&path).expect("Failed to save config");
    let loaded = Config::from_file(&path).expect("Failed to load config");

    assert_eq!(loaded.sync.page_size, 25);
    assert_eq!(loaded.context.actor, "importer");
    assert_eq!(loaded.context.scope, ContextScope::ReadOnly);
    assert_eq!(loaded.log_level, LogLevel::Warn);
}

#[test]
fn test_fromFile_withMissingFile_shouldFail() {
    let dir = common::create_temp_dir().unwrap();

    let result = Config::from_file(dir.path().join("missing.json"));

    assert!(result.is_err());
}

#[test]
fn test_fromFile_withInvalidJson_shouldFail() {
    let dir = common::create_temp_dir().unwrap();
    let path = dir.path().join("conf.json");
    std::fs::write(&path, "{ not json").unwrap();

    let error = Config::from_file(&path).unwrap_err();

    assert!(format!("{:#}", error).contains("Failed to parse config file"));
}

#[test]
fn test_fromFile_withEmptyObject_shouldUseDefaults() {
    let dir = common::create_temp_dir().unwrap();
    let path = dir.path().join("conf.json");
    std::fs::write(&path, "{}").unwrap();

    let config = Config::from_file(&path).unwrap();

    assert!(config.validate().is_ok());
    assert!(config.database.path.is_none());
    assert_eq!(config.sync.page_size, 100);
    assert_eq!(config.log_level, LogLevel::Info);
}

#[test]
fn test_fromFile_withUnknownScope_shouldFail() {
    let dir = common::create_temp_dir().unwrap();
    let path = dir.path().join("conf.json");
    std::fs::write(&path, r#"{ "context": { "scope": "user" } }"#).unwrap();

    assert!(Config::from_file(&path).is_err());
}

#[test]
fn test_validate_blankLanguage_shouldFail() {
    let mut config = Config::default();
    config.context.language_id = String::new();

    assert!(config.validate().is_err());
}

#[test]
fn test_logLevel_shouldMapToLevelFilter() {
    assert_eq!(LogLevel::Debug.to_level_filter(), log::LevelFilter::Debug);
    assert_eq!(LogLevel::Error.to_level_filter(), log::LevelFilter::Error);
}
