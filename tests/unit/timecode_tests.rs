/*!
 * Tests for the timestamp codec
 */

use subgen::errors::TimeParseError;
use subgen::timecode::{
    format_ass, format_srt, format_ui, format_vtt, parse_ass, parse_srt, parse_ui, parse_vtt,
};

/// Deterministic spread of values over a day, including awkward fractions
fn sample_seconds() -> Vec<f64> {
    let mut values = vec![0.0, 0.001, 0.29, 0.999, 1.005, 59.999, 60.0, 3599.99, 3600.0, 86399.999];
    let mut s = 0.123_f64;
    while s < 86_400.0 {
        values.push(s);
        s = s * 1.7 + 0.37;
    }
    values
}

#[test]
fn test_formatSrt_shouldPadAndUseComma() {
    assert_eq!(format_srt(0.0), "00:00:00,000");
    assert_eq!(format_srt(3.5), "00:00:03,500");
    assert_eq!(format_srt(3725.042), "01:02:05,042");
}

#[test]
fn test_formatSrt_withLongDuration_shouldNotWrapHours() {
    assert_eq!(format_srt(100.0 * 3600.0), "100:00:00,000");
}

#[test]
fn test_formatVtt_shouldUsePeriod() {
    assert_eq!(format_vtt(7.2), "00:00:07.200");
}

#[test]
fn test_formatAss_shouldUseUnpaddedHoursAndCentiseconds() {
    assert_eq!(format_ass(0.0), "0:00:00.00");
    assert_eq!(format_ass(3.5), "0:00:03.50");
    assert_eq!(format_ass(3725.429), "1:02:05.42");
}

#[test]
fn test_formatUi_shouldTruncateToCentiseconds() {
    assert_eq!(format_ui(83.456), "01:23.45");
    assert_eq!(format_ui(0.0), "00:00.00");
}

#[test]
fn test_format_withNegativeOrNan_shouldClampToZero() {
    assert_eq!(format_srt(-3.0), "00:00:00,000");
    assert_eq!(format_ass(f64::NAN), "0:00:00.00");
}

#[test]
fn test_parseSrt_formatSrt_shouldStayWithinOneMillisecond() {
    for s in sample_seconds() {
        let parsed = parse_srt(&format_srt(s)).unwrap();
        assert!((parsed - s).abs() < 0.001, "{} came back as {}", s, parsed);
        assert!(parsed <= s + 1e-9, "truncation never rounds up: {} -> {}", s, parsed);
    }
}

#[test]
fn test_parseVtt_formatVtt_shouldStayWithinOneMillisecond() {
    for s in sample_seconds() {
        let parsed = parse_vtt(&format_vtt(s)).unwrap();
        assert!((parsed - s).abs() < 0.001, "{} came back as {}", s, parsed);
    }
}

#[test]
fn test_parseAss_formatAss_shouldStayWithinTenMilliseconds() {
    for s in sample_seconds() {
        let parsed = parse_ass(&format_ass(s)).unwrap();
        assert!((parsed - s).abs() < 0.01, "{} came back as {}", s, parsed);
    }
}

#[test]
fn test_parseUi_formatUi_shouldInvert() {
    for s in [0.0, 1.5, 59.99, 83.45, 5999.99] {
        let text = format_ui(s);
        assert_eq!(format_ui(parse_ui(&text).unwrap()), text);
    }
}

#[test]
fn test_parseUi_withoutCentiseconds_shouldDefaultToZero() {
    assert_eq!(parse_ui("02:05").unwrap(), 125.0);
}

#[test]
fn test_parseUi_withWrongColonCount_shouldFail() {
    assert!(parse_ui("1:02:03").is_err());
    assert!(parse_ui("42").is_err());
}

#[test]
fn test_parseVtt_withShortForm_shouldAcceptMinutesOnly() {
    assert_eq!(parse_vtt("01:02.500").unwrap(), 62.5);
}

#[test]
fn test_parseSrt_withGarbage_shouldReportInput() {
    let err: TimeParseError = parse_srt("00:00:xx,000").unwrap_err();
    assert_eq!(err.input, "00:00:xx,000");
    assert!(parse_srt("00:61:00,000").is_err());
}

#[test]
fn test_parse_withHoursBeyondU64_shouldReturnError() {
    assert!(parse_srt("9999999999999:00:00,000").is_err());
    assert!(parse_vtt("9999999999999:00:00.000").is_err());
    assert!(parse_ass("999999999999999:00:00.00").is_err());
    assert!(parse_ui("999999999999999999:00").is_err());
    // Large but representable
    assert_eq!(parse_srt("1000:00:00,000").unwrap(), 3_600_000.0);
}
