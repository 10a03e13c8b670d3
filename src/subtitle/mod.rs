/*!
 * Subtitle data model: cues, document-level style and the editable document.
 */

pub mod document;
pub mod model;
pub mod style;

pub use document::{DocumentOptions, OrderingWarning, SubtitleDocument};
pub use model::{CueId, Subtitle, SubtitlePatch, TrackKind};
pub use style::{Anchor, Animation, Color, ColorParseError, SubtitleStyle, TextAlign, VerticalPosition};
