/*!
 * Parsing of provider JSON responses.
 *
 * LLM-backed providers often wrap their JSON in a fenced code block or add a
 * sentence around it, so the payload is located before it is deserialized.
 */

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use crate::errors::ProviderError;
use crate::providers::TranscriptionResult;
use crate::subtitle::{CueId, Subtitle, SubtitleDocument, TrackKind};

/// Prefix of cue ids on the translation track
pub const TRANSLATION_ID_PREFIX: &str = "trans";

static CODE_FENCE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)```[A-Za-z]*\s*(.*?)\s*```").expect("valid code fence regex")
});

/// Locate the JSON payload inside a provider response
pub fn extract_json(response: &str) -> &str {
    if let Some(caps) = CODE_FENCE_REGEX.captures(response) {
        if let Some(body) = caps.get(1) {
            return body.as_str();
        }
    }

    let trimmed = response.trim();
    let start = trimmed.find(['{', '[']);
    let end = trimmed.rfind(['}', ']']);
    match (start, end) {
        (Some(start), Some(end)) if end > start => &trimmed[start..=end],
        _ => trimmed,
    }
}

/// Parse a transcription response (`{ language, speakers, segments }`)
pub fn parse_transcription_response(response: &str) -> Result<TranscriptionResult, ProviderError> {
    let payload = extract_json(response);
    let result: TranscriptionResult = serde_json::from_str(payload)
        .map_err(|e| ProviderError::ParseError(format!("invalid transcription JSON: {}", e)))?;

    debug!(
        "Parsed transcription: {} segments, language '{}'",
        result.segments.len(),
        result.language
    );
    Ok(result)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TranslatedSegment {
    Text(String),
    Object { text: String },
}

impl TranslatedSegment {
    fn into_text(self) -> String {
        match self {
            Self::Text(text) | Self::Object { text } => text,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TranslationPayload {
    Segments(Vec<TranslatedSegment>),
    Wrapped { segments: Vec<TranslatedSegment> },
    Texts {
        #[serde(rename = "translatedTexts")]
        translated_texts: Vec<String>,
    },
}

/// Parse a translation response into one text per cue.
///
/// Accepts a bare array (of strings or segment objects), `{ "segments": [...] }`
/// or `{ "translatedTexts": [...] }`.
pub fn parse_translation_texts(response: &str) -> Result<Vec<String>, ProviderError> {
    let payload: TranslationPayload = serde_json::from_str(extract_json(response))
        .map_err(|e| ProviderError::ParseError(format!("invalid translation JSON: {}", e)))?;

    let texts = match payload {
        TranslationPayload::Segments(segments) | TranslationPayload::Wrapped { segments } => {
            segments.into_iter().map(TranslatedSegment::into_text).collect()
        }
        TranslationPayload::Texts { translated_texts } => translated_texts,
    };
    Ok(texts)
}

/// Parse a translation response and align it with the source document
pub fn parse_translation_response(
    response: &str,
    source: &SubtitleDocument,
) -> Result<SubtitleDocument, ProviderError> {
    let texts = parse_translation_texts(response)?;
    assemble_translation(source, texts)
}

/// Build the translation track: same count, order and timing as `source`,
/// ids `trans-<source id>`.
pub fn assemble_translation(
    source: &SubtitleDocument,
    texts: Vec<String>,
) -> Result<SubtitleDocument, ProviderError> {
    if texts.len() != source.len() {
        return Err(ProviderError::CueCountMismatch {
            expected: source.len(),
            actual: texts.len(),
        });
    }

    let mut translated = SubtitleDocument::new()
        .with_options(source.options())
        .with_style(source.style().clone());
    for (cue, text) in source.iter().zip(texts) {
        let mut translated_cue = Subtitle::new(
            CueId::derived(TRANSLATION_ID_PREFIX, cue.id()),
            cue.start_time(),
            cue.end_time(),
            text,
        )?
        .with_confidence(cue.confidence())
        .with_track(TrackKind::Translation);
        translated_cue.set_speaker(cue.speaker().map(str::to_string));
        translated.insert(translated_cue)?;
    }

    Ok(translated)
}
