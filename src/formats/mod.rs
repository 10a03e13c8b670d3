/*!
 * Subtitle file codecs.
 *
 * `export` renders a document as SRT, WebVTT or ASS text. `import` reads the
 * same formats back, skipping blocks it cannot understand and reporting them
 * as warnings instead of failing the whole file.
 */

use log::{debug, warn};
use std::fmt;
use std::str::FromStr;

use crate::subtitle::SubtitleDocument;

pub mod ass;
pub mod srt;
pub mod vtt;

/// Supported subtitle file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubtitleFormat {
    #[default]
    Srt,
    Vtt,
    Ass,
}

impl SubtitleFormat {
    pub const ALL: [SubtitleFormat; 3] = [SubtitleFormat::Srt, SubtitleFormat::Vtt, SubtitleFormat::Ass];

    /// File extension without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Srt => "srt",
            Self::Vtt => "vtt",
            Self::Ass => "ass",
        }
    }

    /// MIME type used when serving the exported file
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Srt => "application/x-subrip",
            Self::Vtt => "text/vtt",
            Self::Ass => "text/x-ssa",
        }
    }

    /// Guess the format from a file extension (case-insensitive, leading dot optional)
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "srt" => Some(Self::Srt),
            "vtt" | "webvtt" => Some(Self::Vtt),
            "ass" | "ssa" => Some(Self::Ass),
            _ => None,
        }
    }
}

impl fmt::Display for SubtitleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for SubtitleFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_extension(s).ok_or_else(|| {
            format!("Unknown subtitle format '{}', expected one of: srt, vtt, ass", s)
        })
    }
}

/// A block of the input that was skipped during import
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportWarning {
    /// 1-based line number where the block starts
    pub line: usize,
    pub message: String,
}

impl ImportWarning {
    pub(crate) fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

impl fmt::Display for ImportWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

/// Result of importing a subtitle file
#[derive(Debug, Clone)]
pub struct ImportOutcome {
    pub document: SubtitleDocument,
    pub warnings: Vec<ImportWarning>,
}

/// Render a document in the given format
pub fn export(document: &SubtitleDocument, format: SubtitleFormat) -> String {
    debug!("Exporting {} cues as {}", document.len(), format);
    match format {
        SubtitleFormat::Srt => srt::export(document),
        SubtitleFormat::Vtt => vtt::export(document),
        SubtitleFormat::Ass => ass::export(document),
    }
}

/// Parse subtitle text in the given format
pub fn import(text: &str, format: SubtitleFormat) -> ImportOutcome {
    let normalized = normalize(text);
    let outcome = match format {
        SubtitleFormat::Srt => srt::import(&normalized),
        SubtitleFormat::Vtt => vtt::import(&normalized),
        SubtitleFormat::Ass => ass::import(&normalized),
    };

    for warning in &outcome.warnings {
        warn!("Skipped {} input at {}", format, warning);
    }
    debug!(
        "Imported {} cues from {} ({} warnings)",
        outcome.document.len(),
        format,
        outcome.warnings.len()
    );
    outcome
}

/// Strip a UTF-8 BOM and normalize line endings to `\n`
fn normalize(text: &str) -> String {
    text.trim_start_matches('\u{feff}')
        .replace("\r\n", "\n")
        .replace('\r', "\n")
}

/// Consecutive non-blank lines, with the 1-based line number of the first one
#[derive(Debug)]
pub(crate) struct Block<'a> {
    pub line: usize,
    pub lines: Vec<&'a str>,
}

pub(crate) fn blocks(text: &str) -> Vec<Block<'_>> {
    let mut blocks = Vec::new();
    let mut current: Option<Block> = None;

    for (index, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            if let Some(block) = current.take() {
                blocks.push(block);
            }
            continue;
        }
        current
            .get_or_insert_with(|| Block {
                line: index + 1,
                lines: Vec::new(),
            })
            .lines
            .push(line);
    }

    if let Some(block) = current {
        blocks.push(block);
    }
    blocks
}

/// Cue text as written inside a blank-line-delimited block. A blank line would
/// end the block, so whitespace-only lines are dropped.
pub(crate) fn block_text(text: &str) -> String {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Split a `start --> end [settings]` line into its two timestamps
pub(crate) fn split_timing_line(line: &str) -> Option<(&str, &str)> {
    let (start, rest) = line.split_once("-->")?;
    let end = rest.split_whitespace().next()?;
    Some((start.trim(), end))
}
