/*!
 * Subtitle document: an ordered cue sequence plus its style.
 *
 * Sequence order is what the exporters number and render. Unless
 * `DocumentOptions::auto_sort` is set, the document never reorders cues and
 * only warns when a mutation leaves them out of chronological order.
 */

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::errors::SubtitleError;
use crate::subtitle::model::{CueId, Subtitle, SubtitlePatch, TrackKind};
use crate::subtitle::style::SubtitleStyle;

/// Behaviour switches for a document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentOptions {
    /// Keep cues sorted by start time on insert and update
    #[serde(default)]
    pub auto_sort: bool,
}

/// A cue whose start precedes the start of the cue before it
#[derive(Debug, Clone, PartialEq)]
pub struct OrderingWarning {
    pub id: CueId,
    pub previous_id: CueId,
    pub start_time: f64,
    pub previous_start_time: f64,
}

/// Ordered collection of cues with document-level style
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawDocument")]
pub struct SubtitleDocument {
    #[serde(skip_serializing_if = "Option::is_none")]
    language: Option<String>,
    style: SubtitleStyle,
    subtitles: Vec<Subtitle>,
    #[serde(skip)]
    options: DocumentOptions,
    // Ids deleted or merged away in this session; never handed out again
    #[serde(skip)]
    retired: HashSet<CueId>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDocument {
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    style: SubtitleStyle,
    #[serde(default)]
    subtitles: Vec<Subtitle>,
}

impl TryFrom<RawDocument> for SubtitleDocument {
    type Error = SubtitleError;

    fn try_from(raw: RawDocument) -> Result<Self, Self::Error> {
        let mut document = SubtitleDocument::from_cues(raw.subtitles)?;
        document.language = raw.language;
        document.style = raw.style;
        Ok(document)
    }
}

impl SubtitleDocument {
    /// Create an empty document with default style
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a document from cues in the given order
    pub fn from_cues(cues: impl IntoIterator<Item = Subtitle>) -> Result<Self, SubtitleError> {
        let mut document = Self::new();
        for cue in cues {
            document.insert(cue)?;
        }
        Ok(document)
    }

    pub fn with_options(mut self, options: DocumentOptions) -> Self {
        self.set_options(options);
        self
    }

    pub fn with_style(mut self, style: SubtitleStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn options(&self) -> DocumentOptions {
        self.options
    }

    /// Change options; enabling auto-sort sorts the existing cues immediately
    pub fn set_options(&mut self, options: DocumentOptions) {
        self.options = options;
        if options.auto_sort {
            self.sort_chronologically();
        }
    }

    pub fn style(&self) -> &SubtitleStyle {
        &self.style
    }

    pub fn style_mut(&mut self) -> &mut SubtitleStyle {
        &mut self.style
    }

    pub fn set_style(&mut self, style: SubtitleStyle) {
        self.style = style;
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    pub fn set_language(&mut self, language: Option<String>) {
        self.language = language;
    }

    pub fn cues(&self) -> &[Subtitle] {
        &self.subtitles
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Subtitle> {
        self.subtitles.iter()
    }

    pub fn len(&self) -> usize {
        self.subtitles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subtitles.is_empty()
    }

    pub fn contains(&self, id: &CueId) -> bool {
        self.subtitles.iter().any(|c| c.id() == id)
    }

    pub fn get(&self, id: &CueId) -> Option<&Subtitle> {
        self.subtitles.iter().find(|c| c.id() == id)
    }

    /// Zero-based sequence position of a cue
    pub fn position(&self, id: &CueId) -> Option<usize> {
        self.subtitles.iter().position(|c| c.id() == id)
    }

    fn index_of(&self, id: &CueId) -> Result<usize, SubtitleError> {
        self.position(id)
            .ok_or_else(|| SubtitleError::NotFound(id.clone()))
    }

    /// Add a cue. Appends unless auto-sort is on.
    pub fn insert(&mut self, cue: Subtitle) -> Result<CueId, SubtitleError> {
        let id = cue.id().clone();
        if self.contains(&id) || self.retired.contains(&id) {
            return Err(SubtitleError::DuplicateId(id));
        }

        if self.options.auto_sort {
            self.insert_sorted(cue);
        } else {
            if let Some(last) = self.subtitles.last() {
                if cue.start_time() < last.start_time() {
                    warn!(
                        "Cue {} starts at {:.3}s, before preceding cue {} ({:.3}s); sequence order no longer matches time order",
                        id,
                        cue.start_time(),
                        last.id(),
                        last.start_time()
                    );
                }
            }
            self.subtitles.push(cue);
        }

        debug!("Inserted cue {} ({} cues)", id, self.subtitles.len());
        Ok(id)
    }

    fn insert_sorted(&mut self, cue: Subtitle) {
        let index = self
            .subtitles
            .partition_point(|c| c.start_time() <= cue.start_time());
        self.subtitles.insert(index, cue);
    }

    /// Apply a partial update. On error the document is unchanged.
    pub fn update(&mut self, id: &CueId, patch: SubtitlePatch) -> Result<(), SubtitleError> {
        let index = self.index_of(id)?;
        let patched = patch.apply_to(&self.subtitles[index])?;
        let moved = patched.start_time() != self.subtitles[index].start_time();

        if self.options.auto_sort && moved {
            self.subtitles.remove(index);
            self.insert_sorted(patched);
        } else {
            self.subtitles[index] = patched;
        }

        debug!("Updated cue {}", id);
        Ok(())
    }

    /// Remove a cue. Other cues keep their ids; the removed id is retired.
    pub fn delete(&mut self, id: &CueId) -> Result<Subtitle, SubtitleError> {
        let index = self.index_of(id)?;
        let removed = self.subtitles.remove(index);
        self.retired.insert(removed.id().clone());

        debug!("Deleted cue {} ({} cues left)", id, self.subtitles.len());
        Ok(removed)
    }

    /// Split a cue in two at `at_time`.
    ///
    /// The first half keeps the original id, the second half gets a fresh one.
    /// Text is cut at the whitespace nearest to the proportional position of
    /// `at_time` within the cue.
    pub fn split(
        &mut self,
        id: &CueId,
        at_time: f64,
    ) -> Result<(Subtitle, Subtitle), SubtitleError> {
        let index = self.index_of(id)?;
        let original = &self.subtitles[index];

        if !(at_time > original.start_time() && at_time < original.end_time()) {
            return Err(SubtitleError::OutOfRange {
                id: id.clone(),
                at_time,
                start_time: original.start_time(),
                end_time: original.end_time(),
            });
        }

        let ratio = (at_time - original.start_time()) / original.duration();
        let (first_text, second_text) = split_text_near(original.text(), ratio);

        let mut first = original.clone();
        first.set_timing(original.start_time(), at_time)?;
        first.set_text(first_text);

        let mut second = original.clone().with_id(self.fresh_id());
        second.set_timing(at_time, original.end_time())?;
        second.set_text(second_text);

        self.subtitles[index] = first.clone();
        if self.options.auto_sort {
            self.insert_sorted(second.clone());
        } else {
            self.subtitles.insert(index + 1, second.clone());
        }

        debug!("Split cue {} at {:.3}s into {} and {}", id, at_time, first.id(), second.id());
        Ok((first, second))
    }

    /// Merge a cue with its immediate sequence successor.
    pub fn merge(&mut self, first_id: &CueId, second_id: &CueId) -> Result<Subtitle, SubtitleError> {
        let first_index = self.index_of(first_id)?;
        let second_index = self.index_of(second_id)?;

        if second_index != first_index + 1 {
            return Err(SubtitleError::NotAdjacent {
                first: first_id.clone(),
                second: second_id.clone(),
            });
        }

        let first = &self.subtitles[first_index];
        let second = &self.subtitles[second_index];

        let start_time = first.start_time().min(second.start_time());
        let end_time = first.end_time().max(second.end_time());
        let text = [first.text(), second.text()]
            .into_iter()
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join("\n");
        let speaker = first.speaker().or(second.speaker()).map(str::to_string);
        let confidence = first.confidence().min(second.confidence());

        let mut merged = first.clone().with_confidence(confidence);
        merged.set_timing(start_time, end_time)?;
        merged.set_text(text);
        merged.set_speaker(speaker);

        self.subtitles[first_index] = merged.clone();
        let removed = self.subtitles.remove(second_index);
        self.retired.insert(removed.id().clone());

        debug!("Merged cue {} into {}", second_id, first_id);
        Ok(merged)
    }

    fn fresh_id(&self) -> CueId {
        loop {
            let id = CueId::generate();
            if !self.contains(&id) && !self.retired.contains(&id) {
                return id;
            }
        }
    }

    /// First cue in sequence order that is on screen at `time`
    pub fn cue_at(&self, time: f64) -> Option<&Subtitle> {
        self.subtitles.iter().find(|c| c.contains_time(time))
    }

    /// Latest end time over all cues
    pub fn duration(&self) -> f64 {
        self.subtitles
            .iter()
            .map(|c| c.end_time())
            .fold(0.0, f64::max)
    }

    /// Copy of this document restricted to one track
    pub fn track_view(&self, track: TrackKind) -> SubtitleDocument {
        SubtitleDocument {
            language: self.language.clone(),
            style: self.style.clone(),
            subtitles: self
                .subtitles
                .iter()
                .filter(|c| c.track() == track)
                .cloned()
                .collect(),
            options: self.options,
            retired: HashSet::new(),
        }
    }

    /// Cues that start before their sequence predecessor
    pub fn ordering_warnings(&self) -> Vec<OrderingWarning> {
        self.subtitles
            .windows(2)
            .filter(|pair| pair[1].start_time() < pair[0].start_time())
            .map(|pair| OrderingWarning {
                id: pair[1].id().clone(),
                previous_id: pair[0].id().clone(),
                start_time: pair[1].start_time(),
                previous_start_time: pair[0].start_time(),
            })
            .collect()
    }

    /// Stable sort by start time
    pub fn sort_chronologically(&mut self) {
        self.subtitles
            .sort_by(|a, b| a.start_time().total_cmp(&b.start_time()));
    }
}

impl<'a> IntoIterator for &'a SubtitleDocument {
    type Item = &'a Subtitle;
    type IntoIter = std::slice::Iter<'a, Subtitle>;

    fn into_iter(self) -> Self::IntoIter {
        self.subtitles.iter()
    }
}

/// Cut `text` at the whitespace closest to `ratio` of its length. Without any
/// whitespace the whole text stays in the first half.
fn split_text_near(text: &str, ratio: f64) -> (String, String) {
    let char_count = text.chars().count();
    let target = (char_count as f64 * ratio).round() as usize;

    let boundary = text
        .char_indices()
        .enumerate()
        .filter(|(_, (_, c))| c.is_whitespace())
        .min_by_key(|(position, _)| position.abs_diff(target))
        .map(|(_, (byte_index, _))| byte_index);

    match boundary {
        Some(byte_index) => {
            let (head, tail) = text.split_at(byte_index);
            (head.trim_end().to_string(), tail.trim_start().to_string())
        }
        None => (text.to_string(), String::new()),
    }
}
