/*!
 * Cue entity: one timed caption with its identity and provenance.
 *
 * Timing is validated whenever a cue is built or re-timed, so a `Subtitle`
 * value always satisfies `0 <= start_time < end_time`.
 */

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::errors::SubtitleError;
use crate::timecode;

/// Identifier of a cue, unique within its document
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CueId(String);

impl CueId {
    pub fn new(id: impl Into<String>) -> Self {
        CueId(id.into())
    }

    /// Fresh random id (UUID v4)
    pub fn generate() -> Self {
        CueId(Uuid::new_v4().to_string())
    }

    /// Id derived from another cue, e.g. `trans-<id>` for a translated cue
    pub fn derived(prefix: &str, source: &CueId) -> Self {
        CueId(format!("{}-{}", prefix, source.0))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CueId {
    fn from(id: &str) -> Self {
        CueId::new(id)
    }
}

impl From<String> for CueId {
    fn from(id: String) -> Self {
        CueId(id)
    }
}

/// Which cue sequence a cue belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackKind {
    /// Original-language cues
    #[default]
    Master,
    /// Cues translated from the master track
    Translation,
}

fn default_confidence() -> f32 {
    1.0
}

/// One caption cue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawSubtitle")]
pub struct Subtitle {
    id: CueId,
    start_time: f64,
    end_time: f64,
    text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    speaker: Option<String>,
    confidence: f32,
    track: TrackKind,
}

impl Subtitle {
    /// Create a validated cue
    pub fn new(
        id: impl Into<CueId>,
        start_time: f64,
        end_time: f64,
        text: impl Into<String>,
    ) -> Result<Self, SubtitleError> {
        let id = id.into();
        validate_timing(&id, start_time, end_time)?;

        Ok(Subtitle {
            id,
            start_time,
            end_time,
            text: text.into(),
            speaker: None,
            confidence: default_confidence(),
            track: TrackKind::Master,
        })
    }

    /// Create a validated cue with a freshly generated id
    pub fn with_generated_id(
        start_time: f64,
        end_time: f64,
        text: impl Into<String>,
    ) -> Result<Self, SubtitleError> {
        Self::new(CueId::generate(), start_time, end_time, text)
    }

    pub fn with_speaker(mut self, speaker: impl Into<String>) -> Self {
        self.speaker = Some(speaker.into());
        self
    }

    /// Set the provider confidence, clamped to `[0, 1]`
    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = clamp_confidence(confidence);
        self
    }

    pub fn with_track(mut self, track: TrackKind) -> Self {
        self.track = track;
        self
    }

    pub fn id(&self) -> &CueId {
        &self.id
    }

    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    pub fn end_time(&self) -> f64 {
        self.end_time
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn speaker(&self) -> Option<&str> {
        self.speaker.as_deref()
    }

    pub fn confidence(&self) -> f32 {
        self.confidence
    }

    pub fn track(&self) -> TrackKind {
        self.track
    }

    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }

    /// Whether `time` falls inside the cue (both bounds inclusive, as the editor highlights)
    pub fn contains_time(&self, time: f64) -> bool {
        time >= self.start_time && time <= self.end_time
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn set_speaker(&mut self, speaker: Option<String>) {
        self.speaker = speaker;
    }

    /// Re-time the cue. On error the cue is left unchanged.
    pub fn set_timing(&mut self, start_time: f64, end_time: f64) -> Result<(), SubtitleError> {
        validate_timing(&self.id, start_time, end_time)?;
        self.start_time = start_time;
        self.end_time = end_time;
        Ok(())
    }

    /// Same cue content under a different id
    pub(crate) fn with_id(mut self, id: CueId) -> Self {
        self.id = id;
        self
    }
}

impl fmt::Display for Subtitle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "[{} - {}]",
            timecode::format_ui(self.start_time),
            timecode::format_ui(self.end_time)
        )?;
        if let Some(speaker) = &self.speaker {
            write!(f, " {}:", speaker)?;
        }
        write!(f, " {}", self.text.replace('\n', " / "))
    }
}

fn clamp_confidence(confidence: f32) -> f32 {
    if confidence.is_nan() {
        return default_confidence();
    }
    confidence.clamp(0.0, 1.0)
}

/// Check the cue timing invariant
pub(crate) fn validate_timing(
    id: &CueId,
    start_time: f64,
    end_time: f64,
) -> Result<(), SubtitleError> {
    let valid = start_time.is_finite()
        && end_time.is_finite()
        && start_time >= 0.0
        && end_time > start_time;

    if valid {
        Ok(())
    } else {
        Err(SubtitleError::InvalidTiming {
            id: id.clone(),
            start_time,
            end_time,
        })
    }
}

/// Providers send ids as strings or bare numbers
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(u64),
}

/// Unvalidated wire shape of a cue
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSubtitle {
    #[serde(default)]
    id: Option<RawId>,
    start_time: f64,
    end_time: f64,
    #[serde(default)]
    text: String,
    #[serde(default)]
    speaker: Option<String>,
    #[serde(default = "default_confidence")]
    confidence: f32,
    #[serde(default)]
    track: TrackKind,
}

impl TryFrom<RawSubtitle> for Subtitle {
    type Error = SubtitleError;

    fn try_from(raw: RawSubtitle) -> Result<Self, Self::Error> {
        let id = match raw.id {
            Some(RawId::Text(text)) if !text.trim().is_empty() => CueId::new(text),
            Some(RawId::Number(number)) => CueId::new(number.to_string()),
            _ => CueId::generate(),
        };

        let mut cue = Subtitle::new(id, raw.start_time, raw.end_time, raw.text)?
            .with_confidence(raw.confidence)
            .with_track(raw.track);
        cue.speaker = raw.speaker.filter(|s| !s.trim().is_empty());
        Ok(cue)
    }
}

/// Partial update for a cue; `None` fields are left unchanged
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubtitlePatch {
    pub start_time: Option<f64>,
    pub end_time: Option<f64>,
    pub text: Option<String>,
    /// `Some(None)` clears the speaker
    pub speaker: Option<Option<String>>,
    pub confidence: Option<f32>,
    pub track: Option<TrackKind>,
}

impl SubtitlePatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start_time(mut self, start_time: f64) -> Self {
        self.start_time = Some(start_time);
        self
    }

    pub fn end_time(mut self, end_time: f64) -> Self {
        self.end_time = Some(end_time);
        self
    }

    pub fn timing(self, start_time: f64, end_time: f64) -> Self {
        self.start_time(start_time).end_time(end_time)
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn speaker(mut self, speaker: Option<String>) -> Self {
        self.speaker = Some(speaker);
        self
    }

    pub fn confidence(mut self, confidence: f32) -> Self {
        self.confidence = Some(confidence);
        self
    }

    pub fn track(mut self, track: TrackKind) -> Self {
        self.track = Some(track);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Build the patched cue without touching the original
    pub fn apply_to(&self, cue: &Subtitle) -> Result<Subtitle, SubtitleError> {
        let mut patched = cue.clone();

        let start_time = self.start_time.unwrap_or(cue.start_time);
        let end_time = self.end_time.unwrap_or(cue.end_time);
        patched.set_timing(start_time, end_time)?;

        if let Some(text) = &self.text {
            patched.text = text.clone();
        }
        if let Some(speaker) = &self.speaker {
            patched.speaker = speaker.clone();
        }
        if let Some(confidence) = self.confidence {
            patched.confidence = clamp_confidence(confidence);
        }
        if let Some(track) = self.track {
            patched.track = track;
        }

        Ok(patched)
    }
}
