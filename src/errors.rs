/*!
 * Error types for the subgen library.
 *
 * This module contains custom error types for different parts of the library,
 * using the thiserror crate for ergonomic error definitions. Every error here
 * is a local, recoverable condition: callers decide whether to skip, retry or
 * fall back.
 */

use thiserror::Error;

use crate::subtitle::CueId;

/// A timestamp string that could not be parsed by the time codec
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid timestamp '{input}': {reason}")]
pub struct TimeParseError {
    /// The offending input, verbatim
    pub input: String,
    /// Short description of what was wrong
    pub reason: String,
}

impl TimeParseError {
    pub fn new(input: &str, reason: impl Into<String>) -> Self {
        Self {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

/// Errors raised by cue construction and document mutations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SubtitleError {
    /// Start time is negative, not finite, or not strictly before the end time
    #[error("Invalid timing for cue {id}: start {start_time}s must be before end {end_time}s")]
    InvalidTiming {
        id: CueId,
        start_time: f64,
        end_time: f64,
    },

    /// The cue id is already used (or was retired) in this document
    #[error("Duplicate cue id: {0}")]
    DuplicateId(CueId),

    /// No cue with this id exists in the document
    #[error("Cue not found: {0}")]
    NotFound(CueId),

    /// A split point outside the open interval of the cue
    #[error("Split time {at_time}s is outside cue {id} ({start_time}s - {end_time}s)")]
    OutOfRange {
        id: CueId,
        at_time: f64,
        start_time: f64,
        end_time: f64,
    },

    /// Merge requested on cues that are not sequence neighbours
    #[error("Cue {second} does not immediately follow cue {first}")]
    NotAdjacent { first: CueId, second: CueId },

    /// A timestamp failed to parse
    #[error(transparent)]
    TimeParse(#[from] TimeParseError),
}

/// Errors that can occur when working with transcription/translation providers
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// The provider answered with a different number of cues than it was given
    #[error("Cue count mismatch: expected {expected}, got {actual}")]
    CueCountMismatch { expected: usize, actual: usize },

    /// The provider returned segments that violate the cue invariants
    #[error("Invalid segment in response: {0}")]
    InvalidSegment(#[from] SubtitleError),
}

/// Which provider operation failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderOperation {
    Transcription,
    Translation,
}

impl std::fmt::Display for ProviderOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transcription => write!(f, "transcription"),
            Self::Translation => write!(f, "translation"),
        }
    }
}

/// A provider error surfaced at the editing boundary
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{operation} provider failed: {source}")]
pub struct ProviderFailure {
    pub operation: ProviderOperation,
    #[source]
    pub source: ProviderError,
}

impl ProviderFailure {
    pub fn transcription(source: ProviderError) -> Self {
        Self {
            operation: ProviderOperation::Transcription,
            source,
        }
    }

    pub fn translation(source: ProviderError) -> Self {
        Self {
            operation: ProviderOperation::Translation,
            source,
        }
    }
}

/// Errors raised by project stores
#[derive(Error, Debug)]
pub enum StoreError {
    /// Reading or writing the backing file failed
    #[error("Store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file does not contain valid project JSON
    #[error("Store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// No project with this id
    #[error("Project not found: {0}")]
    NotFound(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from the document model or time codec
    #[error("Subtitle error: {0}")]
    Subtitle(#[from] SubtitleError),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderFailure),

    /// Error from the project store
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
