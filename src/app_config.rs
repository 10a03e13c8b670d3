use anyhow::{anyhow, Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::formats::SubtitleFormat;
use crate::providers::fallback::{TranscriptionFallback, TranslationFallback};
use crate::providers::{StylePreset, TranslationMode};
use crate::subtitle::{DocumentOptions, SubtitleStyle, VerticalPosition};

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Config {
    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Document editing behaviour
    #[serde(default)]
    pub document: DocumentConfig,

    /// Export settings
    #[serde(default)]
    pub export: ExportConfig,

    /// Style applied to newly created documents
    #[serde(default)]
    pub style: SubtitleStyle,

    /// Transcription settings
    #[serde(default)]
    pub transcription: TranscriptionConfig,

    /// Translation settings
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Project store settings
    #[serde(default)]
    pub store: StoreConfig,
}

/// Document editing behaviour
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct DocumentConfig {
    // @field: Keep cues sorted by start time while editing
    #[serde(default)]
    pub auto_sort: bool,
}

impl DocumentConfig {
    pub fn options(&self) -> DocumentOptions {
        DocumentOptions {
            auto_sort: self.auto_sort,
        }
    }
}

/// Export settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ExportConfig {
    // @field: Format used when none is given on the command line
    #[serde(default)]
    pub default_format: SubtitleFormat,

    // @field: Replace existing output files
    #[serde(default)]
    pub force_overwrite: bool,

    // @field: Output directory; next to the input when unset
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            default_format: SubtitleFormat::Srt,
            force_overwrite: false,
            output_dir: None,
        }
    }
}

/// Transcription settings
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct TranscriptionConfig {
    // @field: ISO language code passed to the provider, auto-detect when unset
    #[serde(default)]
    pub language_hint: Option<String>,

    // @field: Line length preset
    #[serde(default)]
    pub preset: StylePreset,

    // @field: Policy when the provider fails
    #[serde(default)]
    pub fallback: TranscriptionFallback,
}

/// Translation settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TranslationConfig {
    /// Target language code (ISO)
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// Translation mode
    #[serde(default)]
    pub mode: TranslationMode,

    /// Policy when the provider fails
    #[serde(default)]
    pub fallback: TranslationFallback,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            target_language: default_target_language(),
            mode: TranslationMode::default(),
            fallback: TranslationFallback::default(),
        }
    }
}

/// Project store settings
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct StoreConfig {
    /// Path of the projects file; platform data directory when unset
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_target_language() -> String {
    "fr".to_string()
}

const MAX_FONT_SIZE: u32 = 200;

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        // Validate languages
        if let Some(hint) = &self.transcription.language_hint {
            crate::language_utils::get_language_name(hint)
                .context("Invalid transcription language hint")?;
        }
        crate::language_utils::get_language_name(&self.translation.target_language)
            .context("Invalid translation target language")?;

        // Validate style
        if self.style.font_family.trim().is_empty() {
            return Err(anyhow!("Style font family must not be empty"));
        }
        if self.style.font_size == 0 || self.style.font_size > MAX_FONT_SIZE {
            return Err(anyhow!(
                "Style font size must be between 1 and {}, got {}",
                MAX_FONT_SIZE,
                self.style.font_size
            ));
        }
        if self.style.background_opacity > 100 {
            return Err(anyhow!(
                "Style background opacity must be between 0 and 100, got {}",
                self.style.background_opacity
            ));
        }
        if let VerticalPosition::Percent(percent) = self.style.position {
            if percent > 100 {
                return Err(anyhow!("Style position must be between 0 and 100, got {}", percent));
            }
        }

        Ok(())
    }

    /// Load the configuration file, creating it with defaults when missing
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            let file = File::open(path)
                .with_context(|| format!("Failed to open config file: {}", path.display()))?;
            let reader = BufReader::new(file);
            return serde_json::from_reader(reader)
                .with_context(|| format!("Failed to parse config file: {}", path.display()));
        }

        warn!("Config file not found at '{}', creating default config.", path.display());
        let config = Config::default();
        config.save(path)?;
        Ok(config)
    }

    /// Write the configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let config_json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;
        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write config to file: {}", path.display()))
    }
}
