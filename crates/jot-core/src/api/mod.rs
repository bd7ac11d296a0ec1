//! Remote notes service.
//!
//! Every operation is one round trip without retries. Each accepts an
//! optional cancellation token; a cancelled call resolves to
//! [`Error::Cancelled`](crate::Error::Cancelled).

mod http;

use async_trait::async_trait;

use crate::cancel::CancellationToken;
use crate::models::{Note, NoteDraft, NoteId};
use crate::Result;

pub use http::HttpNotesClient;

#[async_trait]
pub trait NotesApi: Send + Sync {
    /// Fetch the full note collection in server order.
    async fn list(&self, cancel: Option<&CancellationToken>) -> Result<Vec<Note>>;

    /// Fetch one note; `NotFound` when the id does not exist.
    async fn get(&self, id: &NoteId, cancel: Option<&CancellationToken>) -> Result<Note>;

    /// Create a note; the server assigns `id` and `created_at`.
    async fn create(&self, draft: &NoteDraft, cancel: Option<&CancellationToken>)
        -> Result<Note>;

    /// Replace title and content; returns the full post-update note.
    async fn update(
        &self,
        id: &NoteId,
        draft: &NoteDraft,
        cancel: Option<&CancellationToken>,
    ) -> Result<Note>;

    /// Delete a note; `NotFound` when it is already gone.
    async fn delete(&self, id: &NoteId, cancel: Option<&CancellationToken>) -> Result<()>;
}
