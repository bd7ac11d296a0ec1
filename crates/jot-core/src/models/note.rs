//! Note model

use std::cmp::Reverse;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::timestamp;
use crate::error::{Error, Result};

/// Message shown when a note is submitted without a title.
pub const TITLE_REQUIRED: &str = "Title is required.";

/// Identifier assigned by the server.
///
/// Opaque to the client. Numeric ids are kept in their decimal string form so
/// every id renders and round-trips the same way.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct NoteId(String);

impl NoteId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Form used inside a URL path segment.
    pub fn url_encoded(&self) -> String {
        urlencoding::encode(&self.0).into_owned()
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NoteId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for NoteId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl<'de> Deserialize<'de> for NoteId {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Signed(i64),
            Unsigned(u64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(text) => Self(text),
            RawId::Signed(number) => Self(number.to_string()),
            RawId::Unsigned(number) => Self(number.to_string()),
        })
    }
}

/// A note as returned by the remote service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Server-assigned identifier, stable for the note's lifetime
    pub id: NoteId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    /// Creation timestamp, set once by the server
    #[serde(
        default,
        deserialize_with = "timestamp::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
    /// Refreshed by the server on every update; absent until the first one
    #[serde(
        default,
        deserialize_with = "timestamp::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Most recent server-side activity on a note, used for date labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activity {
    Updated(DateTime<Utc>),
    Created(DateTime<Utc>),
}

impl Note {
    /// Timestamp used for recency ordering.
    ///
    /// `updated_at`, else `created_at`, else the Unix epoch.
    pub fn active_at(&self) -> DateTime<Utc> {
        self.updated_at
            .or(self.created_at)
            .unwrap_or(DateTime::UNIX_EPOCH)
    }

    pub fn activity(&self) -> Option<Activity> {
        match (self.updated_at, self.created_at) {
            (Some(updated_at), _) => Some(Activity::Updated(updated_at)),
            (None, Some(created_at)) => Some(Activity::Created(created_at)),
            (None, None) => None,
        }
    }

    /// Title for display; blank titles render as a placeholder.
    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            "(Untitled)"
        } else {
            &self.title
        }
    }

    /// Case-insensitive substring match over title or content.
    ///
    /// `needle` must already be lowercase.
    pub fn matches_query(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle) || self.content.to_lowercase().contains(needle)
    }
}

/// Sort notes most-recently-active first.
///
/// The sort is stable, so notes with equal timestamps keep the server's order.
pub fn sort_by_recency(notes: &mut [Note]) {
    notes.sort_by_key(|note| Reverse(note.active_at()));
}

/// Notes matching a search query, in their current order.
///
/// The query is trimmed; a blank query matches every note.
pub fn filter_notes<'a>(notes: &'a [Note], query: &str) -> Vec<&'a Note> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return notes.iter().collect();
    }
    notes
        .iter()
        .filter(|note| note.matches_query(&needle))
        .collect()
}

/// Editable fields of a note, sent on create and update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteDraft {
    pub title: String,
    #[serde(default)]
    pub content: String,
}

impl NoteDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }

    /// Seed a draft from a loaded note.
    pub fn from_note(note: &Note) -> Self {
        Self::new(note.title.clone(), note.content.clone())
    }

    /// Payload ready to send: title trimmed and required, content as typed.
    pub fn validated(&self) -> Result<Self> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(Error::Validation(TITLE_REQUIRED.to_string()));
        }
        Ok(Self::new(title, self.content.clone()))
    }
}
