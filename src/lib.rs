/*!
 * # SubGEN - subtitle model and export codec
 *
 * A Rust library for editing timed subtitle documents and exchanging them
 * with the common subtitle file formats.
 *
 * ## Features
 *
 * - Timestamp codec for SRT, WebVTT, ASS and the editor display
 * - Ordered subtitle documents with insert, update, delete, split and merge
 * - Export and tolerant import of SRT, WebVTT and ASS, including styling
 * - Transcription and translation provider contracts with explicit fallbacks
 * - Project persistence with pluggable merge strategies
 * - ISO 639-1 and ISO 639-2 language code support
 *
 * ## Architecture
 *
 * - `timecode`: Seconds to and from format timestamps
 * - `subtitle`: Cues, styles and the document model
 * - `formats`: SRT, WebVTT and ASS codecs
 * - `providers`: Provider traits, response parsing, mock and fallbacks
 * - `project`: Projects, stores and merge strategies
 * - `app_config`: Configuration management
 * - `app_controller`: Main application controller
 * - `file_utils`: File system operations
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod file_utils;
pub mod formats;
pub mod language_utils;
pub mod project;
pub mod providers;
pub mod subtitle;
pub mod timecode;

// Re-export main types for easier usage
pub use app_config::Config;
pub use errors::{AppError, ProviderError, ProviderFailure, StoreError, SubtitleError, TimeParseError};
pub use formats::{ImportOutcome, ImportWarning, SubtitleFormat};
pub use language_utils::{get_language_name, language_codes_match, normalize_to_part2t};
pub use project::{Project, ProjectStore};
pub use subtitle::{CueId, Subtitle, SubtitleDocument, SubtitlePatch, SubtitleStyle};
