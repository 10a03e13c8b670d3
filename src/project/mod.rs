/*!
 * Projects: a media file with its subtitle document, persisted as whole
 * snapshots and reconciled between replicas.
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::subtitle::SubtitleDocument;

pub mod merge;
pub mod store;

pub use merge::{reconcile, LastWriteWins, MergeStrategy, Resolution};
pub use store::{JsonFileProjectStore, MemoryProjectStore, ProjectStore};

/// Processing state of a project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    #[default]
    Draft,
    Processing,
    Completed,
    Error,
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectStatus::Draft => write!(f, "draft"),
            ProjectStatus::Processing => write!(f, "processing"),
            ProjectStatus::Completed => write!(f, "completed"),
            ProjectStatus::Error => write!(f, "error"),
        }
    }
}

/// Kind of media a project subtitles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaType {
    #[default]
    Video,
    Audio,
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaType::Video => write!(f, "video"),
            MediaType::Audio => write!(f, "audio"),
        }
    }
}

/// A persisted project snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default)]
    pub media_type: MediaType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,
    /// Media length in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_language: Option<String>,
    #[serde(default)]
    pub document: SubtitleDocument,
}

impl Project {
    /// New draft project with a fresh id
    pub fn new(name: impl Into<String>, media_type: MediaType) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            created_at: now,
            updated_at: now,
            status: ProjectStatus::Draft,
            media_type,
            media_url: None,
            duration: None,
            target_language: None,
            document: SubtitleDocument::new(),
        }
    }

    pub fn with_document(mut self, document: SubtitleDocument) -> Self {
        self.document = document;
        self
    }

    /// Source language of the subtitles, if known
    pub fn language(&self) -> Option<&str> {
        self.document.language()
    }

    /// Mark the project as modified now
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl fmt::Display for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] {} ({}, {} cues, updated {})",
            self.id,
            self.status,
            self.name,
            self.media_type,
            self.document.len(),
            self.updated_at.format("%Y-%m-%d %H:%M")
        )
    }
}
