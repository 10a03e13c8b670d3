/*!
 * Tests for error types
 */

use subgen::errors::{
    AppError, ProviderError, ProviderFailure, StoreError, SubtitleError, TimeParseError,
};
use subgen::subtitle::CueId;

#[test]
fn test_timeParseError_display_shouldNameInput() {
    let err = TimeParseError::new("1:2:3", "not a SRT timestamp");
    assert_eq!(err.to_string(), "Invalid timestamp '1:2:3': not a SRT timestamp");
}

#[test]
fn test_subtitleError_fromTimeParse_shouldBeTransparent() {
    let err: SubtitleError = TimeParseError::new("x", "bad").into();
    assert_eq!(err.to_string(), "Invalid timestamp 'x': bad");
}

#[test]
fn test_subtitleError_display_shouldDescribeCondition() {
    let not_adjacent = SubtitleError::NotAdjacent {
        first: CueId::new("a"),
        second: CueId::new("c"),
    };
    assert_eq!(not_adjacent.to_string(), "Cue c does not immediately follow cue a");
    assert_eq!(
        SubtitleError::NotFound(CueId::new("z")).to_string(),
        "Cue not found: z"
    );
}

#[test]
fn test_providerFailure_shouldKeepSourceAndOperation() {
    let failure = ProviderFailure::translation(ProviderError::RateLimitExceeded("slow down".into()));

    assert_eq!(
        failure.to_string(),
        "translation provider failed: Rate limit exceeded: slow down"
    );
    let source = std::error::Error::source(&failure).map(|s| s.to_string());
    assert_eq!(source.as_deref(), Some("Rate limit exceeded: slow down"));
}

#[test]
fn test_appError_conversions_shouldWrapSources() {
    let from_store: AppError = StoreError::NotFound("p1".into()).into();
    assert!(matches!(from_store, AppError::Store(_)));

    let from_io: AppError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
    assert!(matches!(from_io, AppError::File(_)));

    let from_anyhow: AppError = anyhow::anyhow!("boom").into();
    assert_eq!(from_anyhow.to_string(), "Unknown error: boom");
}
