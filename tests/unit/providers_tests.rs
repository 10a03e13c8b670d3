/*!
 * Tests for provider contracts, response parsing and fallbacks
 */

use std::path::PathBuf;

use subgen::errors::{ProviderError, ProviderOperation};
use subgen::providers::fallback::{self, TranscriptionFallback, TranslationFallback};
use subgen::providers::mock::MockProvider;
use subgen::providers::parse::{parse_transcription_response, parse_translation_response};
use subgen::providers::{
    MediaSource, StylePreset, TranscriptionRequest, TranslationMode, TranslationRequest,
};
use subgen::subtitle::TrackKind;

use crate::common::sample_document;

fn transcription_request() -> TranscriptionRequest {
    TranscriptionRequest {
        media: MediaSource::File(PathBuf::from("talk.mp4")),
        language_hint: Some("en".to_string()),
        preset: StylePreset::Netflix,
    }
}

fn translation_request() -> TranslationRequest {
    TranslationRequest {
        document: sample_document(),
        target_language: "es".to_string(),
        mode: TranslationMode::Literal,
    }
}

#[test]
fn test_parseTranscription_withFencedJson_shouldReadSegments() {
    let response = r#"Here you go:
```json
{
  "language": "en",
  "speakers": ["Host"],
  "segments": [
    {"id": "s1", "startTime": 0.0, "endTime": 1.5, "text": "Hi", "speaker": "Host", "confidence": 0.9},
    {"id": "s2", "startTime": 1.5, "endTime": 3.0, "text": "Bye"}
  ]
}
```"#;

    let result = parse_transcription_response(response).unwrap();

    assert_eq!(result.language, "en");
    assert_eq!(result.segments.len(), 2);
    assert_eq!(result.segments[0].speaker(), Some("Host"));
    assert_eq!(result.segments[1].confidence(), 1.0);
}

#[test]
fn test_parseTranscription_withInvertedSegment_shouldFail() {
    let response = r#"{"segments": [{"id": "s1", "startTime": 2.0, "endTime": 1.0, "text": "x"}]}"#;
    assert!(parse_transcription_response(response).is_err());
}

#[test]
fn test_parseTranslation_shouldKeepTimingAndUseTranslationTrack() {
    let source = sample_document();
    let response = r#"{"translatedTexts": ["Hola.", "¡General Kenobi!", "Eres audaz."]}"#;

    let translated = parse_translation_response(response, &source).unwrap();

    assert_eq!(translated.len(), source.len());
    for (original, cue) in source.iter().zip(translated.iter()) {
        assert_eq!(cue.start_time(), original.start_time());
        assert_eq!(cue.end_time(), original.end_time());
        assert_eq!(cue.track(), TrackKind::Translation);
        assert_eq!(cue.id().as_str(), format!("trans-{}", original.id()));
    }
    assert_eq!(translated.cues()[1].text(), "¡General Kenobi!");
}

#[test]
fn test_parseTranslation_withWrongCount_shouldFailWithMismatch() {
    let response = r#"["only one"]"#;
    let result = parse_translation_response(response, &sample_document());

    assert_eq!(
        result.unwrap_err(),
        ProviderError::CueCountMismatch { expected: 3, actual: 1 }
    );
}

#[tokio::test]
async fn test_transcribe_withWorkingMock_shouldBuildDocument() {
    let provider = MockProvider::working();
    let document = fallback::transcribe(&provider, &transcription_request())
        .await
        .unwrap();

    assert_eq!(document.len(), 3);
    assert_eq!(document.language(), Some("en"));
    assert_eq!(provider.request_count(), 1);
}

#[tokio::test]
async fn test_transcribe_withFailingMock_shouldReturnProviderFailure() {
    let failure = fallback::transcribe(&MockProvider::failing(), &transcription_request())
        .await
        .unwrap_err();

    assert_eq!(failure.operation, ProviderOperation::Transcription);
    assert!(matches!(failure.source, ProviderError::ApiError { status_code: 500, .. }));
}

#[tokio::test]
async fn test_transcribeOrFallback_withSamplePolicy_shouldSubstituteSample() {
    let document = fallback::transcribe_or_fallback(
        &MockProvider::failing(),
        &transcription_request(),
        TranscriptionFallback::SampleDocument,
    )
    .await
    .unwrap();

    assert_eq!(document, fallback::sample_document());
    assert_eq!(document.len(), 2);
}

#[tokio::test]
async fn test_transcribeOrFallback_withFailPolicy_shouldSurfaceFailure() {
    let result = fallback::transcribe_or_fallback(
        &MockProvider::malformed(),
        &transcription_request(),
        TranscriptionFallback::Fail,
    )
    .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn test_translate_withMalformedMock_shouldDetectCountMismatch() {
    let failure = fallback::translate(&MockProvider::malformed(), &translation_request())
        .await
        .unwrap_err();

    assert_eq!(failure.operation, ProviderOperation::Translation);
    assert_eq!(
        failure.source,
        ProviderError::CueCountMismatch { expected: 3, actual: 2 }
    );
}

#[tokio::test]
async fn test_translateOrFallback_withTagPolicy_shouldPrefixLanguageTag() {
    let document = fallback::translate_or_fallback(
        &MockProvider::failing(),
        &translation_request(),
        TranslationFallback::TagWithLanguage,
    )
    .await
    .unwrap();

    assert_eq!(document.language(), Some("es"));
    let texts: Vec<&str> = document.iter().map(|c| c.text()).collect();
    assert_eq!(texts, vec!["[es] Hello there.", "[es] General Kenobi!", "[es] You are a bold one."]);
}

#[tokio::test]
async fn test_translate_withIntermittentMock_shouldFailEveryThirdCall() {
    let provider = MockProvider::intermittent(3);
    let request = translation_request();

    assert!(fallback::translate(&provider, &request).await.is_ok());
    assert!(fallback::translate(&provider, &request).await.is_ok());
    assert!(fallback::translate(&provider, &request).await.is_err());
    assert!(fallback::translate(&provider, &request).await.is_ok());
}

#[test]
fn test_stylePreset_shouldExposeLineLimits() {
    assert_eq!(StylePreset::Tiktok.max_chars_per_line(), 32);
    assert_eq!("netflix".parse::<StylePreset>(), Ok(StylePreset::Netflix));
    assert!("vhs".parse::<StylePreset>().is_err());
}
