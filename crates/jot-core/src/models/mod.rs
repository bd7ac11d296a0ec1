//! Data models for Jot

mod note;
mod timestamp;

pub use note::{filter_notes, sort_by_recency, Activity, Note, NoteDraft, NoteId, TITLE_REQUIRED};
