/*!
 * Integration tests for the transcribe, edit, translate and export pipeline
 */

use std::path::PathBuf;
use std::sync::Arc;

use subgen::app_config::Config;
use subgen::app_controller::Controller;
use subgen::formats::{self, SubtitleFormat};
use subgen::project::MemoryProjectStore;
use subgen::providers::fallback::{TranscriptionFallback, TranslationFallback};
use subgen::providers::mock::MockProvider;
use subgen::providers::MediaSource;
use subgen::subtitle::{SubtitlePatch, TrackKind};

fn controller_with(config: Config) -> Controller {
    crate::common::init_test_logging();
    Controller::with_store(config, Arc::new(MemoryProjectStore::new()))
}

fn media() -> MediaSource {
    MediaSource::File(PathBuf::from("interview.mp4"))
}

#[tokio::test]
async fn test_pipeline_withWorkingProviders_shouldProduceTranslatedExport() {
    let mut config = Config::default();
    config.transcription.language_hint = Some("en".to_string());
    config.translation.target_language = "de".to_string();
    let controller = controller_with(config);
    let provider = MockProvider::working();

    let mut document = controller.transcribe(&provider, media()).await.unwrap();
    assert_eq!(document.len(), 3);

    // Edit between the two provider calls
    let first_id = document.cues()[0].id().clone();
    document
        .update(&first_id, SubtitlePatch::new().text("An edited first line."))
        .unwrap();

    let translated = controller.translate(&provider, &document).await.unwrap();

    assert_eq!(translated.language(), Some("de"));
    assert!(translated.iter().all(|c| c.track() == TrackKind::Translation));
    assert_eq!(
        translated.cues()[0].text(),
        "[TRANSLATED to de] An edited first line."
    );

    let srt = formats::export(&translated, SubtitleFormat::Srt);
    assert!(srt.starts_with("1\n00:00:00,000 --> 00:00:02,500\n[TRANSLATED to de]"));
    assert_eq!(provider.request_count(), 2);
}

#[tokio::test]
async fn test_pipeline_withFailingProviders_shouldUseConfiguredFallbacks() {
    let mut config = Config::default();
    config.transcription.fallback = TranscriptionFallback::SampleDocument;
    config.translation.fallback = TranslationFallback::TagWithLanguage;
    config.translation.target_language = "it".to_string();
    let controller = controller_with(config);
    let provider = MockProvider::failing();

    let document = controller.transcribe(&provider, media()).await.unwrap();
    assert_eq!(document.cues()[0].text(), "Welcome to our product demonstration.");

    let translated = controller.translate(&provider, &document).await.unwrap();
    assert_eq!(
        translated.cues()[1].text(),
        "[it] Today we'll explore the key features."
    );
    assert_eq!(translated.len(), document.len());
}

#[tokio::test]
async fn test_pipeline_withDefaultPolicies_shouldSurfaceFailures() {
    let controller = controller_with(Config::default());

    assert!(controller
        .transcribe(&MockProvider::failing(), media())
        .await
        .is_err());
}

#[tokio::test]
async fn test_translate_withDocumentAlreadyInTarget_shouldSkipProvider() {
    let mut config = Config::default();
    config.translation.target_language = "fra".to_string();
    let controller = controller_with(config);
    let provider = MockProvider::working();

    let document = crate::common::sample_document().with_language("fr");
    let translated = controller.translate(&provider, &document).await.unwrap();

    assert_eq!(translated, document);
    assert_eq!(provider.request_count(), 0);
}

#[tokio::test]
async fn test_transcribe_shouldApplyConfiguredStyle() {
    let mut config = Config::default();
    config.style.font_size = 40;
    let controller = controller_with(config);

    let document = controller
        .transcribe(&MockProvider::working(), MediaSource::Url("https://example.com/a.mp3".into()))
        .await
        .unwrap();

    assert_eq!(document.style().font_size, 40);
    assert_eq!(document.language(), Some("en"));
}
