//! jot-core - Core library for Jot
//!
//! The client-side synchronization layer shared by every Jot front end: the
//! note model, the remote notes API, and the view controllers that keep page
//! state consistent with the server.

pub mod api;
pub mod cancel;
pub mod config;
pub mod error;
pub mod models;
pub mod views;

pub use api::{HttpNotesClient, NotesApi};
pub use cancel::{CancellationToken, ViewScope};
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use models::{Note, NoteDraft, NoteId};
