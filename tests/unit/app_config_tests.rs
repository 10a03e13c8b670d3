/*!
 * Tests for application configuration
 */

use anyhow::Result;

use subgen::app_config::{Config, LogLevel};
use subgen::formats::SubtitleFormat;
use subgen::providers::fallback::{TranscriptionFallback, TranslationFallback};
use subgen::providers::StylePreset;
use subgen::subtitle::VerticalPosition;

use crate::common;

#[test]
fn test_loadOrCreate_withMissingFile_shouldWriteDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("conf.json");

    let config = Config::load_or_create(&path)?;

    assert_eq!(config, Config::default());
    assert!(path.exists());
    assert_eq!(Config::load_or_create(&path)?, config);
    Ok(())
}

#[test]
fn test_loadOrCreate_withPartialFile_shouldFillDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        temp_dir.path(),
        "conf.json",
        r#"{
            "log_level": "debug",
            "document": { "auto_sort": true },
            "export": { "default_format": "vtt" },
            "transcription": { "preset": "tiktok", "fallback": "sample_document" },
            "translation": { "target_language": "de", "fallback": "tag_with_language" }
        }"#,
    )?;

    let config = Config::load_or_create(&path)?;

    assert_eq!(config.log_level, LogLevel::Debug);
    assert!(config.document.options().auto_sort);
    assert_eq!(config.export.default_format, SubtitleFormat::Vtt);
    assert!(!config.export.force_overwrite);
    assert_eq!(config.transcription.preset, StylePreset::Tiktok);
    assert_eq!(config.transcription.fallback, TranscriptionFallback::SampleDocument);
    assert_eq!(config.translation.target_language, "de");
    assert_eq!(config.translation.fallback, TranslationFallback::TagWithLanguage);
    assert!(config.validate().is_ok());
    Ok(())
}

#[test]
fn test_loadOrCreate_withInvalidJson_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "conf.json", "{ nope")?;

    assert!(Config::load_or_create(&path).is_err());
    Ok(())
}

#[test]
fn test_validate_withBadLanguageHint_shouldFail() {
    let mut config = Config::default();
    config.transcription.language_hint = Some("klingon".to_string());
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withOutOfRangeStyle_shouldFail() {
    let mut config = Config::default();
    config.style.background_opacity = 101;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.style.position = VerticalPosition::Percent(120);
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.style.font_family = "  ".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_save_thenLoad_shouldRoundTrip() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("custom.json");

    let mut config = Config::default();
    config.export.force_overwrite = true;
    config.style.font_size = 48;
    config.save(&path)?;

    assert_eq!(Config::load_or_create(&path)?, config);
    Ok(())
}
