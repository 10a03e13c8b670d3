/*!
 * Advanced SubStation Alpha (`.ass`) codec.
 *
 * Export writes a single `Default` style built from the document style and one
 * `Dialogue` event per cue. Import reads the columns named by each section's
 * `Format:` line, maps the `Default` style (or the first one) back onto the
 * document style, and strips override tags from event text.
 */

use once_cell::sync::Lazy;
use regex::Regex;

use crate::formats::{ImportOutcome, ImportWarning};
use crate::subtitle::{
    Anchor, Color, Subtitle, SubtitleDocument, SubtitleStyle, TextAlign, VerticalPosition,
};
use crate::timecode;

const SCRIPT_TITLE: &str = "SubGEN PRO Export";
const PLAY_RES_X: u32 = 1920;
const PLAY_RES_Y: u32 = 1080;

const STYLE_FORMAT: &str =
    "Name, Fontname, Fontsize, PrimaryColour, BackColour, Bold, Italic, Alignment, MarginV";
const EVENT_FORMAT: &str =
    "Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text";

static OVERRIDE_TAG_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\\[^}]*\}").expect("valid ASS override regex"));

// Field separators cannot be escaped inside ASS columns
fn sanitize_field(value: &str) -> String {
    value.replace([',', '\n'], " ")
}

fn encode_text(text: &str) -> String {
    text.replace('\n', "\\N")
}

fn decode_text(text: &str) -> String {
    OVERRIDE_TAG_REGEX
        .replace_all(text, "")
        .replace("\\N", "\n")
        .replace("\\n", "\n")
        .replace("\\h", " ")
}

fn style_line(style: &SubtitleStyle) -> String {
    format!(
        "Style: Default,{},{},{},{},0,0,{},{}",
        sanitize_field(&style.font_family),
        style.font_size,
        style.text_color.to_ass(),
        style.effective_background().to_ass(),
        style.ass_alignment(),
        style.position.margin_v()
    )
}

/// Full ASS script with script info, one style and one event per cue
pub fn export(document: &SubtitleDocument) -> String {
    let header = format!(
        "[Script Info]\nTitle: {}\nScriptType: v4.00+\nPlayResX: {}\nPlayResY: {}\n\n[V4+ Styles]\nFormat: {}\n{}\n\n[Events]\nFormat: {}\n",
        SCRIPT_TITLE,
        PLAY_RES_X,
        PLAY_RES_Y,
        STYLE_FORMAT,
        style_line(document.style()),
        EVENT_FORMAT
    );

    let events = document
        .iter()
        .map(|cue| {
            format!(
                "Dialogue: 0,{},{},Default,{},0,0,0,,{}",
                timecode::format_ass(cue.start_time()),
                timecode::format_ass(cue.end_time()),
                cue.speaker().map(sanitize_field).unwrap_or_default(),
                encode_text(cue.text())
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    header + &events
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    ScriptInfo,
    Styles,
    Events,
    Other,
}

/// Column names from a `Format:` line, lower-cased
fn parse_format(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|name| name.trim().to_ascii_lowercase())
        .collect()
}

/// Row values keyed by the section's column names. The last column takes the
/// remainder of the line so event text may contain commas.
struct Row<'a> {
    columns: &'a [String],
    values: Vec<&'a str>,
}

impl<'a> Row<'a> {
    fn new(columns: &'a [String], value: &'a str) -> Self {
        let values = value.splitn(columns.len().max(1), ',').collect();
        Row { columns, values }
    }

    fn get(&self, column: &str) -> Option<&'a str> {
        let index = self.columns.iter().position(|c| c == column)?;
        self.values.get(index).copied()
    }

    fn trimmed(&self, column: &str) -> Option<&'a str> {
        self.get(column).map(str::trim)
    }
}

fn default_columns(format: &str) -> Vec<String> {
    parse_format(format)
}

/// Map an ASS style row onto the document style
fn apply_style_row(style: &mut SubtitleStyle, row: &Row) {
    if let Some(font) = row.trimmed("fontname").filter(|f| !f.is_empty()) {
        style.font_family = font.to_string();
    }
    if let Some(size) = row.trimmed("fontsize").and_then(|s| s.parse::<f64>().ok()) {
        if size.is_finite() && size > 0.0 {
            style.font_size = size.round() as u32;
        }
    }
    if let Some(color) = row.trimmed("primarycolour").and_then(|c| Color::from_ass(c).ok()) {
        style.text_color = color;
    }
    if let Some(color) = row.trimmed("backcolour").and_then(|c| Color::from_ass(c).ok()) {
        style.background_opacity = (color.a as f64 * 100.0 / 255.0).round() as u8;
        style.background_color = Color { a: 255, ..color };
    }

    let alignment = row
        .trimmed("alignment")
        .and_then(|a| a.parse::<u8>().ok())
        .filter(|a| (1..=9).contains(a))
        .unwrap_or(2);
    style.text_align = match (alignment - 1) % 3 {
        0 => TextAlign::Left,
        1 => TextAlign::Center,
        _ => TextAlign::Right,
    };

    let margin_v = row.trimmed("marginv").and_then(|m| m.parse::<u32>().ok());
    style.position = match (alignment - 1) / 3 {
        2 => VerticalPosition::Anchor(Anchor::Top),
        1 => VerticalPosition::Anchor(Anchor::Middle),
        _ => match margin_v {
            Some(margin) => VerticalPosition::Percent(100 - margin.min(100) as u8),
            None => VerticalPosition::default(),
        },
    };
}

/// Parse ASS text that has already been BOM-stripped and `\n`-normalized
pub fn import(text: &str) -> ImportOutcome {
    let mut document = SubtitleDocument::new();
    let mut warnings = Vec::new();

    let mut section = Section::Other;
    let mut style_columns = default_columns(STYLE_FORMAT);
    let mut event_columns = default_columns(EVENT_FORMAT);
    let mut style: Option<(String, SubtitleStyle)> = None;
    let mut seen_script_info = false;

    for (index, raw_line) in text.lines().enumerate() {
        let line_number = index + 1;
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with(';') {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            section = match line.to_ascii_lowercase().as_str() {
                "[script info]" => {
                    seen_script_info = true;
                    Section::ScriptInfo
                }
                "[v4+ styles]" | "[v4 styles]" => Section::Styles,
                "[events]" => Section::Events,
                _ => Section::Other,
            };
            continue;
        }

        let Some((key, value)) = line.split_once(':') else {
            if section == Section::Events || section == Section::Styles {
                warnings.push(ImportWarning::new(line_number, format!("unrecognized line '{}'", line)));
            }
            continue;
        };
        let value = value.trim_start();

        match (section, key.trim()) {
            (Section::Styles, "Format") => style_columns = parse_format(value),
            (Section::Styles, "Style") => {
                let row = Row::new(&style_columns, value);
                let name = row.trimmed("name").unwrap_or_default().to_string();
                let replace = match &style {
                    None => true,
                    Some((current, _)) => current != "Default" && name == "Default",
                };
                if replace {
                    let mut parsed = SubtitleStyle::default();
                    apply_style_row(&mut parsed, &row);
                    style = Some((name, parsed));
                }
            }
            (Section::Events, "Format") => event_columns = parse_format(value),
            (Section::Events, "Dialogue") => {
                let row = Row::new(&event_columns, value);
                match parse_dialogue(&row) {
                    Ok(cue) => {
                        if let Err(e) = document.insert(cue) {
                            warnings.push(ImportWarning::new(line_number, e.to_string()));
                        }
                    }
                    Err(message) => warnings.push(ImportWarning::new(line_number, message)),
                }
            }
            _ => {}
        }
    }

    if !seen_script_info {
        warnings.push(ImportWarning::new(1, "missing [Script Info] section"));
    }
    if let Some((_, parsed)) = style {
        document.set_style(parsed);
    }

    ImportOutcome { document, warnings }
}

fn parse_dialogue(row: &Row) -> Result<Subtitle, String> {
    let start = row.trimmed("start").ok_or("missing Start column")?;
    let end = row.trimmed("end").ok_or("missing End column")?;
    let start = timecode::parse_ass(start).map_err(|e| e.to_string())?;
    let end = timecode::parse_ass(end).map_err(|e| e.to_string())?;
    let text = decode_text(row.get("text").unwrap_or_default());

    let mut cue = Subtitle::with_generated_id(start, end, text).map_err(|e| e.to_string())?;
    if let Some(name) = row.trimmed("name").filter(|n| !n.is_empty()) {
        cue = cue.with_speaker(name);
    }
    Ok(cue)
}
