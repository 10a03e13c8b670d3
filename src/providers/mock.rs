/*!
 * Deterministic mock provider for tests and offline runs.
 *
 * The mock implements both provider traits and simulates these behaviors:
 * - `MockProvider::working()` always succeeds
 * - `MockProvider::intermittent(n)` fails every n-th request
 * - `MockProvider::failing()` always fails with an API error
 * - `MockProvider::malformed()` answers with output that breaks the contract
 * - `MockProvider::empty()` answers with nothing
 */

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::errors::ProviderError;
use crate::providers::{
    MediaSource, TranscriptionProvider, TranscriptionRequest, TranscriptionResult,
    TranslationProvider, TranslationRequest,
};
use crate::subtitle::Subtitle;

/// Lines the working mock "hears", with their timings
const MOCK_TRANSCRIPT: [(f64, f64, &str); 3] = [
    (0.0, 2.5, "This is a mock transcript."),
    (2.8, 5.6, "Every run produces the same cues."),
    (6.0, 9.2, "Use it to exercise the pipeline."),
];

const MOCK_SPEAKER: &str = "Speaker A";

/// Behavior mode for the mock provider
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds
    Working,
    /// Succeeds, but the output violates the provider contract
    Malformed,
    /// Fails intermittently (every Nth request)
    Intermittent { fail_every: usize },
    /// Always fails with an error
    Failing,
    /// Returns no segments or texts
    Empty,
    /// Simulates slow response (for timeout testing)
    Slow { delay_ms: u64 },
}

/// Mock provider for transcription and translation
#[derive(Debug)]
pub struct MockProvider {
    behavior: MockBehavior,
    /// Shared between clones so intermittent failures stay periodic
    request_count: Arc<AtomicUsize>,
    custom_translation: Option<fn(&str, &str) -> String>,
}

impl MockProvider {
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
            custom_translation: None,
        }
    }

    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    pub fn malformed() -> Self {
        Self::new(MockBehavior::Malformed)
    }

    pub fn intermittent(fail_every: usize) -> Self {
        Self::new(MockBehavior::Intermittent {
            fail_every: fail_every.max(1),
        })
    }

    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    pub fn empty() -> Self {
        Self::new(MockBehavior::Empty)
    }

    /// Replace the default `[TRANSLATED to xx]` text; receives `(text, target_language)`
    pub fn with_custom_translation(mut self, generator: fn(&str, &str) -> String) -> Self {
        self.custom_translation = Some(generator);
        self
    }

    /// Number of requests served so far, including failed ones
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Count the request and decide whether it fails
    async fn begin_request(&self) -> Result<(), ProviderError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst);

        match self.behavior {
            MockBehavior::Failing => Err(ProviderError::ApiError {
                message: "Simulated provider failure".to_string(),
                status_code: 500,
            }),
            MockBehavior::Intermittent { fail_every } if count % fail_every == fail_every - 1 => {
                Err(ProviderError::ApiError {
                    message: format!("Simulated intermittent failure (request #{})", count + 1),
                    status_code: 503,
                })
            }
            MockBehavior::Slow { delay_ms } => {
                tokio::time::sleep(tokio::time::Duration::from_millis(delay_ms)).await;
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn translate_text(&self, text: &str, target_language: &str) -> String {
        match self.custom_translation {
            Some(generator) => generator(text, target_language),
            None => format!("[TRANSLATED to {}] {}", target_language, text),
        }
    }
}

impl Clone for MockProvider {
    fn clone(&self) -> Self {
        Self {
            behavior: self.behavior,
            request_count: Arc::clone(&self.request_count),
            custom_translation: self.custom_translation,
        }
    }
}

#[async_trait]
impl TranscriptionProvider for MockProvider {
    async fn transcribe(
        &self,
        request: &TranscriptionRequest,
    ) -> Result<TranscriptionResult, ProviderError> {
        self.begin_request().await?;

        let language = request
            .language_hint
            .clone()
            .unwrap_or_else(|| "en".to_string());

        match self.behavior {
            MockBehavior::Malformed => Err(ProviderError::ParseError(format!(
                "unexpected payload for {}",
                describe_media(&request.media)
            ))),
            MockBehavior::Empty => Ok(TranscriptionResult {
                language,
                speakers: Vec::new(),
                segments: Vec::new(),
            }),
            _ => {
                let segments = MOCK_TRANSCRIPT
                    .iter()
                    .enumerate()
                    .map(|(index, (start, end, text))| {
                        Subtitle::new((index + 1).to_string(), *start, *end, *text)
                            .map(|cue| cue.with_speaker(MOCK_SPEAKER).with_confidence(0.95))
                    })
                    .collect::<Result<Vec<_>, _>>()?;

                Ok(TranscriptionResult {
                    language,
                    speakers: vec![MOCK_SPEAKER.to_string()],
                    segments,
                })
            }
        }
    }
}

#[async_trait]
impl TranslationProvider for MockProvider {
    async fn translate(&self, request: &TranslationRequest) -> Result<Vec<String>, ProviderError> {
        self.begin_request().await?;

        let mut texts: Vec<String> = request
            .document
            .iter()
            .map(|cue| self.translate_text(cue.text(), &request.target_language))
            .collect();

        match self.behavior {
            MockBehavior::Malformed => {
                // Drops the last cue, as a truncated LLM answer would
                texts.pop();
                Ok(texts)
            }
            MockBehavior::Empty => Ok(Vec::new()),
            _ => Ok(texts),
        }
    }
}

fn describe_media(media: &MediaSource) -> String {
    match media {
        MediaSource::File(path) => path.display().to_string(),
        MediaSource::Url(url) => url.clone(),
    }
}
