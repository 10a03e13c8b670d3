//! WebVTT (`.vtt`) codec

use crate::formats::{block_text, blocks, split_timing_line, ImportOutcome, ImportWarning};
use crate::subtitle::{Subtitle, SubtitleDocument};
use crate::timecode;

const HEADER: &str = "WEBVTT";

// Non-cue blocks that may appear between cues
const SKIPPED_BLOCKS: [&str; 3] = ["NOTE", "STYLE", "REGION"];

/// `WEBVTT` header, then unnumbered cue blocks separated by a blank line
pub fn export(document: &SubtitleDocument) -> String {
    let cues = document
        .iter()
        .map(|cue| {
            format!(
                "{} --> {}\n{}\n",
                timecode::format_vtt(cue.start_time()),
                timecode::format_vtt(cue.end_time()),
                block_text(cue.text())
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!("{}\n\n{}", HEADER, cues)
}

fn is_skipped_block(first_line: &str) -> bool {
    SKIPPED_BLOCKS.iter().any(|keyword| {
        first_line
            .strip_prefix(keyword)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with(char::is_whitespace))
    })
}

/// Parse WebVTT text that has already been BOM-stripped and `\n`-normalized.
/// Cue identifiers and cue settings are ignored.
pub fn import(text: &str) -> ImportOutcome {
    let mut document = SubtitleDocument::new();
    let mut warnings = Vec::new();
    let mut all_blocks = blocks(text).into_iter().peekable();

    let has_header = all_blocks
        .peek()
        .is_some_and(|b| b.line == 1 && b.lines[0].starts_with(HEADER));
    if has_header {
        all_blocks.next();
    } else {
        warnings.push(ImportWarning::new(1, "missing WEBVTT header"));
    }

    for block in all_blocks {
        if is_skipped_block(block.lines[0]) {
            continue;
        }

        let timing_index = match block.lines.iter().take(2).position(|l| l.contains("-->")) {
            Some(index) => index,
            None => {
                warnings.push(ImportWarning::new(block.line, "missing timing line"));
                continue;
            }
        };
        let timing_line = block.lines[timing_index];

        let timing = split_timing_line(timing_line)
            .ok_or_else(|| format!("malformed timing line '{}'", timing_line))
            .and_then(|(start, end)| {
                let start = timecode::parse_vtt(start).map_err(|e| e.to_string())?;
                let end = timecode::parse_vtt(end).map_err(|e| e.to_string())?;
                Ok((start, end))
            });
        let (start, end) = match timing {
            Ok(timing) => timing,
            Err(message) => {
                warnings.push(ImportWarning::new(block.line + timing_index, message));
                continue;
            }
        };

        let text = block.lines[timing_index + 1..].join("\n");
        let inserted = Subtitle::with_generated_id(start, end, text)
            .and_then(|cue| document.insert(cue));
        if let Err(e) = inserted {
            warnings.push(ImportWarning::new(block.line, e.to_string()));
        }
    }

    ImportOutcome { document, warnings }
}
