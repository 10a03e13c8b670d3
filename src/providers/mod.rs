/*!
 * Provider contracts for transcription and translation.
 *
 * Real providers are network-bound, so both traits are async. The document
 * model never calls them directly: `fallback` wraps a provider call, checks
 * its output against the cue invariants and applies the caller's fallback
 * policy when the provider fails.
 */

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug};
use std::path::PathBuf;
use std::str::FromStr;

use crate::errors::{ProviderError, SubtitleError};
use crate::subtitle::{Subtitle, SubtitleDocument};

pub mod fallback;
pub mod mock;
pub mod parse;

/// Delivery style a transcript is shaped for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StylePreset {
    #[default]
    Youtube,
    Netflix,
    Tiktok,
    Podcast,
    Corporate,
}

impl StylePreset {
    /// Line length limit the provider is asked to respect
    pub fn max_chars_per_line(&self) -> usize {
        match self {
            Self::Youtube | Self::Netflix | Self::Corporate => 42,
            Self::Tiktok => 32,
            Self::Podcast => 50,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Youtube => "youtube",
            Self::Netflix => "netflix",
            Self::Tiktok => "tiktok",
            Self::Podcast => "podcast",
            Self::Corporate => "corporate",
        }
    }
}

impl fmt::Display for StylePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StylePreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "youtube" => Ok(Self::Youtube),
            "netflix" => Ok(Self::Netflix),
            "tiktok" => Ok(Self::Tiktok),
            "podcast" => Ok(Self::Podcast),
            "corporate" => Ok(Self::Corporate),
            other => Err(format!("Unknown style preset: {}", other)),
        }
    }
}

/// How closely a translation follows the source wording
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranslationMode {
    Literal,
    #[default]
    Localized,
    Simplified,
}

impl fmt::Display for TranslationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal => write!(f, "literal"),
            Self::Localized => write!(f, "localized"),
            Self::Simplified => write!(f, "simplified"),
        }
    }
}

impl FromStr for TranslationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "literal" => Ok(Self::Literal),
            "localized" => Ok(Self::Localized),
            "simplified" => Ok(Self::Simplified),
            other => Err(format!("Unknown translation mode: {}", other)),
        }
    }
}

/// Where the media to transcribe lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaSource {
    File(PathBuf),
    Url(String),
}

/// Input to a transcription provider
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptionRequest {
    pub media: MediaSource,
    /// ISO language code, or `None` to auto-detect
    pub language_hint: Option<String>,
    pub preset: StylePreset,
}

/// What a transcription provider returns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptionResult {
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub speakers: Vec<String>,
    pub segments: Vec<Subtitle>,
}

impl TranscriptionResult {
    /// Collect the segments into a document in provider order
    pub fn into_document(self) -> Result<SubtitleDocument, SubtitleError> {
        let document = SubtitleDocument::from_cues(self.segments)?;
        if self.language.trim().is_empty() {
            Ok(document)
        } else {
            Ok(document.with_language(self.language))
        }
    }
}

/// Input to a translation provider
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationRequest {
    pub document: SubtitleDocument,
    pub target_language: String,
    pub mode: TranslationMode,
}

/// Speech-to-text service
#[async_trait]
pub trait TranscriptionProvider: Send + Sync + Debug {
    /// Transcribe the media into timed segments
    async fn transcribe(
        &self,
        request: &TranscriptionRequest,
    ) -> Result<TranscriptionResult, ProviderError>;

    /// Check that the provider is reachable
    async fn test_connection(&self) -> Result<(), ProviderError> {
        Ok(())
    }
}

/// Subtitle translation service
///
/// Implementations return one translated text per source cue, in order.
/// `fallback::translate` turns them into translation-track cues.
#[async_trait]
pub trait TranslationProvider: Send + Sync + Debug {
    async fn translate(&self, request: &TranslationRequest) -> Result<Vec<String>, ProviderError>;

    /// Check that the provider is reachable
    async fn test_connection(&self) -> Result<(), ProviderError> {
        Ok(())
    }
}
