/*!
 * Tests for application configuration functionality
 */

use anyhow::Result;
use assmin::app_config::{Config, LogLevel};
use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.fallback_font, "Arial");
    assert!(config.font_dirs.is_empty());
    assert_eq!(config.ignored_extensions, vec!["bak", "dat", "ini", "fon", "xml", "CompositeFont"]);
    assert!(config.character_map.is_none());
    assert_eq!(config.engine.executable, "fontforge");
    assert_eq!(config.engine.timeout_secs, 300);
    assert_eq!(config.engine.em_size, 1024);
    assert_eq!(config.engine.staging_base, 0xF100);
    assert_eq!(config.log_level, LogLevel::Info);
    assert!(config.validate().is_ok());
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();
    config.fallback_font = "  ".to_string();
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.engine.timeout_secs = 0;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.engine.em_size = 8;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.engine.staging_base = 0x4E00;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.engine.staging_base = 0xF0000;
    assert!(config.validate().is_ok());

    let mut config = Config::default();
    config.character_map = Some("ab a".to_string());
    assert!(config.validate().is_err());
}

/// Test that a partial file is completed with defaults
#[test]
fn test_load_withPartialFile_shouldFillDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        temp_dir.path(),
        "assmin.json",
        r#"{ "fallback_font": "Noto Sans", "engine": { "timeout_secs": 60 }, "log_level": "debug" }"#,
    )?;

    let config = Config::load(&path)?;

    assert_eq!(config.fallback_font, "Noto Sans");
    assert_eq!(config.engine.timeout_secs, 60);
    assert_eq!(config.engine.executable, "fontforge");
    assert_eq!(config.log_level, LogLevel::Debug);
    Ok(())
}

/// Test that save and load agree
#[test]
fn test_save_and_load_shouldPreserveValues() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("config.json");
    let mut config = Config::default();
    config.character_map = Some("xyz".to_string());
    config.font_dirs = vec![temp_dir.path().to_path_buf()];

    config.save(&path)?;
    let loaded = Config::load(&path)?;

    assert_eq!(loaded, config);
    assert_eq!(loaded.character_map()?.len(), 3);
    Ok(())
}

/// Test that malformed JSON is a configuration error
#[test]
fn test_load_withMalformedJson_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "bad.json", "{ not json")?;
    assert!(Config::load(&path).is_err());
    Ok(())
}
