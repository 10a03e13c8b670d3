/*!
 * Tests for the SRT, WebVTT and ASS codecs
 */

use subgen::formats::{self, SubtitleFormat};
use subgen::subtitle::{Color, SubtitleDocument, SubtitleStyle, TextAlign};

use crate::common::{cue, sample_document, SAMPLE_SRT};

fn hello_world() -> SubtitleDocument {
    SubtitleDocument::from_cues(vec![
        cue("x1", 0.0, 3.5, "Hello"),
        cue("x2", 3.8, 7.2, "World"),
    ])
    .unwrap()
}

fn triples(document: &SubtitleDocument) -> Vec<(f64, f64, String)> {
    document
        .iter()
        .map(|c| (c.start_time(), c.end_time(), c.text().to_string()))
        .collect()
}

#[test]
fn test_exportSrt_withTwoCues_shouldMatchReferenceLayout() {
    let expected = "1\n00:00:00,000 --> 00:00:03,500\nHello\n\n2\n00:00:03,800 --> 00:00:07,200\nWorld\n";
    assert_eq!(formats::export(&hello_world(), SubtitleFormat::Srt), expected);
}

#[test]
fn test_exportVtt_withTwoCues_shouldWriteHeaderWithoutIndices() {
    let expected = "WEBVTT\n\n00:00:00.000 --> 00:00:03.500\nHello\n\n00:00:03.800 --> 00:00:07.200\nWorld\n";
    assert_eq!(formats::export(&hello_world(), SubtitleFormat::Vtt), expected);
}

#[test]
fn test_exportSrt_shouldNumberBySequenceNotId() {
    let document = SubtitleDocument::from_cues(vec![
        cue("zeta", 0.0, 1.0, "first"),
        cue("alpha", 1.0, 2.0, "second"),
    ])
    .unwrap();

    let srt = formats::export(&document, SubtitleFormat::Srt);
    assert!(srt.starts_with("1\n"));
    assert!(srt.contains("\n2\n00:00:01,000"));
    assert!(!srt.contains("zeta"));
}

#[test]
fn test_exportImport_srtAndVtt_shouldPreserveTriples() {
    let mut document = sample_document();
    document.insert(cue("d", 8.0, 9.29, "Two\nlines")).unwrap();

    for format in [SubtitleFormat::Srt, SubtitleFormat::Vtt] {
        let outcome = formats::import(&formats::export(&document, format), format);

        assert!(outcome.warnings.is_empty(), "{} warnings: {:?}", format, outcome.warnings);
        assert_eq!(triples(&outcome.document), triples(&document), "{} round trip", format);
    }
}

#[test]
fn test_import_shouldGenerateFreshIdsAndDefaults() {
    let outcome = formats::import(SAMPLE_SRT, SubtitleFormat::Srt);
    let document = outcome.document;

    assert_eq!(document.len(), 3);
    let mut ids: Vec<&str> = document.iter().map(|c| c.id().as_str()).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 3);
    assert!(document.iter().all(|c| c.confidence() == 1.0 && c.speaker().is_none()));
}

#[test]
fn test_importSrt_withMalformedBlocks_shouldSkipAndWarn() {
    let text = "1\n00:00:01,000 --> 00:00:02,000\nkept\n\n2\nno arrow here\n\n3\n00:00:0x,000 --> 00:00:04,000\nbad time\n\n4\n00:00:05,000 --> 00:00:06,000\nalso kept\n";

    let outcome = formats::import(text, SubtitleFormat::Srt);

    let kept: Vec<&str> = outcome.document.iter().map(|c| c.text()).collect();
    assert_eq!(kept, vec!["kept", "also kept"]);
    assert_eq!(outcome.warnings.len(), 2);
}

#[test]
fn test_importSrt_withOversizedTimestamp_shouldSkipBlockAndKeepNext() {
    let text = "1\n9999999999999:00:00,000 --> 9999999999999:00:01,000\nbig\n\n2\n00:00:01,000 --> 00:00:02,000\nok\n";

    let outcome = formats::import(text, SubtitleFormat::Srt);

    let kept: Vec<&str> = outcome.document.iter().map(|c| c.text()).collect();
    assert_eq!(kept, vec!["ok"]);
    assert_eq!(outcome.warnings.len(), 1);
    assert_eq!(outcome.warnings[0].line, 2);
    assert!(outcome.warnings[0].message.contains("out of range"));
}

#[test]
fn test_exportImport_withBlankTextLines_shouldRoundTripExportedText() {
    let document = SubtitleDocument::from_cues(vec![
        cue("a", 0.0, 1.0, "  "),
        cue("b", 1.0, 2.0, "top\n   \nbottom"),
        cue("c", 2.0, 3.0, "x"),
    ])
    .unwrap();

    for format in [SubtitleFormat::Srt, SubtitleFormat::Vtt] {
        let outcome = formats::import(&formats::export(&document, format), format);
        let texts: Vec<&str> = outcome.document.iter().map(|c| c.text()).collect();
        assert_eq!(texts, vec!["", "top\nbottom", "x"], "{:?}", format);
        assert!(outcome.warnings.is_empty());
    }
}

#[test]
fn test_importSrt_withCrlfAndBom_shouldParse() {
    let text = "\u{feff}1\r\n00:00:01,000 --> 00:00:02,000\r\nHello\r\n\r\n";
    let outcome = formats::import(text, SubtitleFormat::Srt);

    assert_eq!(outcome.document.len(), 1);
    assert_eq!(outcome.document.cues()[0].text(), "Hello");
}

#[test]
fn test_importVtt_withNotesAndSettings_shouldIgnoreThem() {
    let text = "WEBVTT - demo\n\nNOTE this is a comment\n\nintro\n00:01.000 --> 00:02.500 align:start line:0\nHi\n";

    let outcome = formats::import(text, SubtitleFormat::Vtt);

    assert!(outcome.warnings.is_empty());
    assert_eq!(triples(&outcome.document), vec![(1.0, 2.5, "Hi".to_string())]);
}

#[test]
fn test_exportAss_shouldCarryDocumentStyleColors() {
    let mut document = hello_world();
    let style = SubtitleStyle {
        text_color: Color::rgb(0x11, 0x22, 0x33),
        ..SubtitleStyle::default()
    };
    document.set_style(style);

    let ass = formats::export(&document, SubtitleFormat::Ass);

    // Colours come from the document style in &HAABBGGRR order
    assert!(ass.contains("&H00332211"));
    assert!(ass.contains("Dialogue: 0,0:00:00.00,0:00:03.50,Default,,0,0,0,,Hello"));
}

#[test]
fn test_exportImportAss_shouldKeepTimingTextAndStyle() {
    let mut document = sample_document();
    document.style_mut().font_family = "Roboto".to_string();
    document.style_mut().font_size = 36;
    document.style_mut().text_align = TextAlign::Left;

    let outcome = formats::import(&formats::export(&document, SubtitleFormat::Ass), SubtitleFormat::Ass);

    assert!(outcome.warnings.is_empty());
    for (original, restored) in document.iter().zip(outcome.document.iter()) {
        assert!((original.start_time() - restored.start_time()).abs() < 0.01);
        assert!((original.end_time() - restored.end_time()).abs() < 0.01);
        assert_eq!(original.text(), restored.text());
    }
    assert_eq!(outcome.document.style().font_family, "Roboto");
    assert_eq!(outcome.document.style().font_size, 36);
    assert_eq!(outcome.document.style().text_align, TextAlign::Left);
}

#[test]
fn test_subtitleFormat_fromExtension_shouldAcceptAliases() {
    assert_eq!(SubtitleFormat::from_extension(".WebVTT"), Some(SubtitleFormat::Vtt));
    assert_eq!(SubtitleFormat::from_extension("ssa"), Some(SubtitleFormat::Ass));
    assert_eq!("srt".parse::<SubtitleFormat>(), Ok(SubtitleFormat::Srt));
    assert!("txt".parse::<SubtitleFormat>().is_err());
}
