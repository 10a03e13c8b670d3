//! SubRip (`.srt`) codec

use crate::formats::{block_text, blocks, split_timing_line, ImportOutcome, ImportWarning};
use crate::subtitle::{Subtitle, SubtitleDocument};
use crate::timecode;

/// Numbered blocks in sequence order, separated by a blank line
pub fn export(document: &SubtitleDocument) -> String {
    document
        .iter()
        .enumerate()
        .map(|(index, cue)| {
            format!(
                "{}\n{} --> {}\n{}\n",
                index + 1,
                timecode::format_srt(cue.start_time()),
                timecode::format_srt(cue.end_time()),
                block_text(cue.text())
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parse SRT text that has already been BOM-stripped and `\n`-normalized.
/// Sequence numbers are not trusted; cues keep file order.
pub fn import(text: &str) -> ImportOutcome {
    let mut document = SubtitleDocument::new();
    let mut warnings = Vec::new();

    for block in blocks(text) {
        // The index line is optional in practice
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
                let start = timecode::parse_srt(start).map_err(|e| e.to_string())?;
                let end = timecode::parse_srt(end).map_err(|e| e.to_string())?;
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
