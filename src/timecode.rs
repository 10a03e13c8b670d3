/*!
 * Time codec for subtitle timestamps.
 *
 * Converts floating-point seconds to and from the four textual forms used by
 * the crate:
 * - SRT: `HH:MM:SS,mmm`
 * - VTT: `HH:MM:SS.mmm` (parsing also accepts the short `MM:SS.mmm` form)
 * - ASS: `H:MM:SS.cc`
 * - UI:  `MM:SS.cc` (editor fields)
 *
 * Fractions are truncated, never rounded. Parsing divides an integer count of
 * units by the unit size, so a parsed value formats back to the same text.
 */

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::TimeParseError;

// Absorbs f64 representation error (0.29 * 1000.0 == 289.99999999999997)
const TRUNCATION_EPSILON: f64 = 1e-6;

const MILLIS_PER_SECOND: u64 = 1_000;
const CENTIS_PER_SECOND: u64 = 100;

static SRT_TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+):(\d{2}):(\d{2})[,.](\d{3})$").expect("valid SRT timestamp regex")
});

static VTT_TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:(\d+):)?(\d{2}):(\d{2})\.(\d{3})$").expect("valid VTT timestamp regex")
});

static ASS_TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+):(\d{2}):(\d{2})\.(\d{2})$").expect("valid ASS timestamp regex")
});

/// Truncate seconds to a whole number of units. Negative, NaN and infinite
/// inputs collapse to zero.
fn truncate_to_units(seconds: f64, units_per_second: u64) -> u64 {
    if !seconds.is_finite() || seconds <= 0.0 {
        return 0;
    }
    (seconds * units_per_second as f64 + TRUNCATION_EPSILON).floor() as u64
}

fn format_clock_millis(seconds: f64, separator: char) -> String {
    let ms = truncate_to_units(seconds, MILLIS_PER_SECOND);
    let hours = ms / 3_600_000;
    let minutes = (ms % 3_600_000) / 60_000;
    let secs = (ms % 60_000) / 1_000;
    let millis = ms % 1_000;

    format!("{:02}:{:02}:{:02}{}{:03}", hours, minutes, secs, separator, millis)
}

/// Format seconds as an SRT timestamp (`HH:MM:SS,mmm`)
pub fn format_srt(seconds: f64) -> String {
    format_clock_millis(seconds, ',')
}

/// Format seconds as a WebVTT timestamp (`HH:MM:SS.mmm`)
pub fn format_vtt(seconds: f64) -> String {
    format_clock_millis(seconds, '.')
}

/// Format seconds as an ASS timestamp (`H:MM:SS.cc`)
pub fn format_ass(seconds: f64) -> String {
    let cs = truncate_to_units(seconds, CENTIS_PER_SECOND);
    let hours = cs / 360_000;
    let minutes = (cs % 360_000) / 6_000;
    let secs = (cs % 6_000) / 100;
    let centis = cs % 100;

    format!("{}:{:02}:{:02}.{:02}", hours, minutes, secs, centis)
}

/// Format seconds for the editor (`MM:SS.cc`). Minutes are not wrapped into hours.
pub fn format_ui(seconds: f64) -> String {
    let cs = truncate_to_units(seconds, CENTIS_PER_SECOND);
    let minutes = cs / 6_000;
    let secs = (cs % 6_000) / 100;
    let centis = cs % 100;

    format!("{:02}:{:02}.{:02}", minutes, secs, centis)
}

fn parse_component(input: &str, part: &str, name: &str) -> Result<u64, TimeParseError> {
    part.parse::<u64>()
        .map_err(|_| TimeParseError::new(input, format!("invalid {}", name)))
}

fn check_sexagesimal(input: &str, minutes: u64, seconds: u64) -> Result<(), TimeParseError> {
    if minutes >= 60 {
        return Err(TimeParseError::new(input, "minutes must be below 60"));
    }
    if seconds >= 60 {
        return Err(TimeParseError::new(input, "seconds must be below 60"));
    }
    Ok(())
}

// Total units for a clock reading, failing instead of wrapping
fn checked_units(
    input: &str,
    whole_minutes: u64,
    seconds: u64,
    units_per_second: u64,
    fraction: u64,
) -> Result<u64, TimeParseError> {
    whole_minutes
        .checked_mul(60)
        .and_then(|s| s.checked_add(seconds))
        .and_then(|s| s.checked_mul(units_per_second))
        .and_then(|u| u.checked_add(fraction))
        .ok_or_else(|| TimeParseError::new(input, "timestamp out of range"))
}

fn parse_clock(
    input: &str,
    regex: &Regex,
    units_per_second: u64,
    format_name: &str,
) -> Result<f64, TimeParseError> {
    let trimmed = input.trim();
    let caps = regex
        .captures(trimmed)
        .ok_or_else(|| TimeParseError::new(input, format!("not a {} timestamp", format_name)))?;

    let hours = match caps.get(1) {
        Some(m) => parse_component(input, m.as_str(), "hours")?,
        None => 0,
    };
    let minutes = parse_component(input, &caps[2], "minutes")?;
    let seconds = parse_component(input, &caps[3], "seconds")?;
    let fraction = parse_component(input, &caps[4], "fraction")?;
    check_sexagesimal(input, minutes, seconds)?;

    let whole_minutes = hours
        .checked_mul(60)
        .and_then(|m| m.checked_add(minutes))
        .ok_or_else(|| TimeParseError::new(input, "timestamp out of range"))?;
    let units = checked_units(input, whole_minutes, seconds, units_per_second, fraction)?;
    Ok(units as f64 / units_per_second as f64)
}

/// Parse an SRT timestamp. A `.` separator is tolerated since it is common in the wild.
pub fn parse_srt(input: &str) -> Result<f64, TimeParseError> {
    parse_clock(input, &SRT_TIMESTAMP_REGEX, MILLIS_PER_SECOND, "SRT")
}

/// Parse a WebVTT timestamp, with or without the hours field
pub fn parse_vtt(input: &str) -> Result<f64, TimeParseError> {
    parse_clock(input, &VTT_TIMESTAMP_REGEX, MILLIS_PER_SECOND, "VTT")
}

/// Parse an ASS timestamp
pub fn parse_ass(input: &str) -> Result<f64, TimeParseError> {
    parse_clock(input, &ASS_TIMESTAMP_REGEX, CENTIS_PER_SECOND, "ASS")
}

/// Parse an editor timestamp (`MM:SS` or `MM:SS.cc`).
///
/// Exactly one colon is required. Missing centiseconds default to zero.
pub fn parse_ui(input: &str) -> Result<f64, TimeParseError> {
    let trimmed = input.trim();
    let parts: Vec<&str> = trimmed.split(':').collect();
    if parts.len() != 2 {
        return Err(TimeParseError::new(input, "expected exactly one ':'"));
    }

    let minutes = parse_component(input, parts[0], "minutes")?;

    let mut rest = parts[1].splitn(2, '.');
    let secs_part = rest.next().unwrap_or_default();
    let seconds = parse_component(input, secs_part, "seconds")?;
    let centis = match rest.next() {
        Some(cs) => parse_component(input, cs, "centiseconds")?,
        None => 0,
    };

    if seconds >= 60 {
        return Err(TimeParseError::new(input, "seconds must be below 60"));
    }
    if centis >= CENTIS_PER_SECOND {
        return Err(TimeParseError::new(input, "centiseconds must be below 100"));
    }

    let units = checked_units(input, minutes, seconds, CENTIS_PER_SECOND, centis)?;
    Ok(units as f64 / CENTIS_PER_SECOND as f64)
}
