/*!
 * Provider calls at the editing boundary.
 *
 * Each call returns `Result<SubtitleDocument, ProviderFailure>`. Callers that
 * want a document no matter what pick a fallback policy explicitly and use the
 * `*_or_fallback` variants, which log the failure and substitute a placeholder.
 */

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::errors::{ProviderError, ProviderFailure};
use crate::providers::parse::assemble_translation;
use crate::providers::{
    TranscriptionProvider, TranscriptionRequest, TranslationProvider, TranslationRequest,
};
use crate::subtitle::{Subtitle, SubtitleDocument};

/// What to do when transcription fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TranscriptionFallback {
    /// Surface the failure
    #[default]
    Fail,
    /// Substitute the fixed two-cue sample document
    SampleDocument,
}

/// What to do when translation fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TranslationFallback {
    /// Surface the failure
    #[default]
    Fail,
    /// Keep the source text, prefixed with `[lang] `
    TagWithLanguage,
}

/// Fixed demonstration transcript
pub fn sample_document() -> SubtitleDocument {
    let cues = [
        ("1", 0.0, 3.5, "Welcome to our product demonstration.", 0.98),
        ("2", 3.8, 7.2, "Today we'll explore the key features.", 0.96),
    ];

    let built = cues
        .into_iter()
        .map(|(id, start, end, text, confidence)| {
            Subtitle::new(id, start, end, text)
                .map(|cue| cue.with_speaker("Host").with_confidence(confidence))
        })
        .collect::<Result<Vec<_>, _>>()
        .and_then(SubtitleDocument::from_cues);

    match built {
        Ok(document) => document.with_language("en"),
        // Constant timings and distinct ids
        Err(_) => SubtitleDocument::new().with_language("en"),
    }
}

/// Translation-track copy of `source` with every text tagged `[lang] `.
/// The code is written as given, only trimmed.
pub fn tag_with_language(source: &SubtitleDocument, target_language: &str) -> SubtitleDocument {
    let tag = target_language.trim();
    let texts = source
        .iter()
        .map(|cue| format!("[{}] {}", tag, cue.text()))
        .collect();

    match assemble_translation(source, texts) {
        Ok(document) => document.with_language(target_language.trim()),
        // Counts match and timings come from valid cues
        Err(_) => SubtitleDocument::new().with_language(target_language.trim()),
    }
}

/// Transcribe media into a new document
pub async fn transcribe(
    provider: &dyn TranscriptionProvider,
    request: &TranscriptionRequest,
) -> Result<SubtitleDocument, ProviderFailure> {
    let result = provider
        .transcribe(request)
        .await
        .map_err(ProviderFailure::transcription)?;

    let document = result
        .into_document()
        .map_err(|e| ProviderFailure::transcription(ProviderError::from(e)))?;

    info!("Transcribed {} cues ({} preset)", document.len(), request.preset);
    Ok(document)
}

/// Transcribe, applying `policy` when the provider fails
pub async fn transcribe_or_fallback(
    provider: &dyn TranscriptionProvider,
    request: &TranscriptionRequest,
    policy: TranscriptionFallback,
) -> Result<SubtitleDocument, ProviderFailure> {
    match (transcribe(provider, request).await, policy) {
        (Ok(document), _) => Ok(document),
        (Err(failure), TranscriptionFallback::SampleDocument) => {
            warn!("{}; using the sample document instead", failure);
            Ok(sample_document())
        }
        (Err(failure), TranscriptionFallback::Fail) => Err(failure),
    }
}

/// Translate a document into a translation-track document
pub async fn translate(
    provider: &dyn TranslationProvider,
    request: &TranslationRequest,
) -> Result<SubtitleDocument, ProviderFailure> {
    let texts = provider
        .translate(request)
        .await
        .map_err(ProviderFailure::translation)?;

    let document = assemble_translation(&request.document, texts)
        .map_err(ProviderFailure::translation)?
        .with_language(request.target_language.clone());

    info!(
        "Translated {} cues to {} ({})",
        document.len(),
        request.target_language,
        request.mode
    );
    Ok(document)
}

/// Translate, applying `policy` when the provider fails
pub async fn translate_or_fallback(
    provider: &dyn TranslationProvider,
    request: &TranslationRequest,
    policy: TranslationFallback,
) -> Result<SubtitleDocument, ProviderFailure> {
    match (translate(provider, request).await, policy) {
        (Ok(document), _) => Ok(document),
        (Err(failure), TranslationFallback::TagWithLanguage) => {
            warn!("{}; tagging source text with the target language", failure);
            Ok(tag_with_language(&request.document, &request.target_language))
        }
        (Err(failure), TranslationFallback::Fail) => Err(failure),
    }
}
