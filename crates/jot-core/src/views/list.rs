//! Controller for the notes index page.

use std::sync::Arc;

use tokio::sync::watch;

use super::{delete_prompt, Confirm, Outcome};
use crate::api::NotesApi;
use crate::cancel::{CancellationToken, ViewScope};
use crate::error::Error;
use crate::models::{filter_notes, sort_by_recency, Note};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListViewState {
    /// `None` until the first successful load
    pub notes: Option<Vec<Note>>,
    pub loading: bool,
    pub error: Option<String>,
    pub success_message: Option<String>,
    pub query: String,
}

impl ListViewState {
    /// Notes matching the current query, recomputed on every call.
    pub fn visible_notes(&self) -> Vec<&Note> {
        filter_notes(self.notes.as_deref().unwrap_or_default(), &self.query)
    }

    pub const fn can_refresh(&self) -> bool {
        !self.loading
    }
}

pub struct ListController {
    api: Arc<dyn NotesApi>,
    state: watch::Sender<ListViewState>,
    scope: ViewScope,
    mounted: bool,
}

impl ListController {
    pub fn new(api: Arc<dyn NotesApi>) -> Self {
        let (state, _) = watch::channel(ListViewState::default());
        Self {
            api,
            state,
            scope: ViewScope::new(),
            mounted: false,
        }
    }

    pub fn state(&self) -> watch::Ref<'_, ListViewState> {
        self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<ListViewState> {
        self.state.subscribe()
    }

    /// Handle that tears this view down, usable while an operation is in flight.
    pub fn teardown_handle(&self) -> CancellationToken {
        self.scope.teardown_handle()
    }

    /// Activate the view; triggers the initial load exactly once.
    pub async fn mount(&mut self) -> Outcome {
        if self.mounted || self.scope.is_torn_down() {
            return Outcome::Rejected;
        }
        self.mounted = true;
        self.load().await
    }

    /// Tear the view down. In-flight work is cancelled and its result dropped.
    pub fn unmount(&mut self) {
        self.scope.teardown();
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        let query = query.into();
        self.state.send_modify(|state| state.query = query);
    }

    /// Fetch the whole collection and store it in recency order.
    pub async fn load(&mut self) -> Outcome {
        if self.scope.is_torn_down() {
            return Outcome::Cancelled;
        }
        let token = self.scope.operation_token();
        self.state.send_modify(|state| {
            state.loading = true;
            state.error = None;
            state.success_message = None;
        });

        tracing::debug!("Loading notes");
        let result = self.api.list(Some(&token)).await;
        if token.is_cancelled() {
            tracing::debug!("Discarding notes load for a torn-down view");
            return Outcome::Cancelled;
        }

        match result {
            Ok(mut notes) => {
                sort_by_recency(&mut notes);
                tracing::debug!("Loaded {} notes", notes.len());
                self.state.send_modify(|state| {
                    state.notes = Some(notes);
                    state.loading = false;
                });
                Outcome::Applied
            }
            Err(Error::Cancelled) => {
                self.state.send_modify(|state| state.loading = false);
                Outcome::Cancelled
            }
            Err(error) => {
                tracing::warn!("Failed to load notes: {}", error);
                let message = error.user_message("Failed to load notes.");
                self.state.send_modify(|state| {
                    state.error = Some(message);
                    state.loading = false;
                });
                Outcome::Failed
            }
        }
    }

    /// Reload from the server. Not de-duplicated against other loads.
    pub async fn refresh(&mut self) -> Outcome {
        self.load().await
    }

    /// Delete one row after confirmation.
    ///
    /// The row leaves the local list only once the server confirms the delete.
    pub async fn delete_row(&mut self, note: &Note, confirm: &dyn Confirm) -> Outcome {
        if self.scope.is_torn_down() {
            return Outcome::Cancelled;
        }
        if self.state.borrow().loading {
            return Outcome::Rejected;
        }
        if !confirm.confirm(&delete_prompt(note)) {
            return Outcome::Declined;
        }

        let token = self.scope.operation_token();
        self.state.send_modify(|state| {
            state.error = None;
            state.success_message = None;
        });

        tracing::debug!("Deleting note {}", note.id);
        let result = self.api.delete(&note.id, Some(&token)).await;
        if token.is_cancelled() {
            tracing::debug!("Discarding delete of {} for a torn-down view", note.id);
            return Outcome::Cancelled;
        }

        match result {
            Ok(()) => {
                tracing::info!("Deleted note {}", note.id);
                self.state.send_modify(|state| {
                    if let Some(notes) = state.notes.as_mut() {
                        notes.retain(|row| row.id != note.id);
                    }
                    state.success_message = Some("Note deleted.".to_string());
                });
                Outcome::Applied
            }
            Err(Error::Cancelled) => Outcome::Cancelled,
            Err(error) => {
                tracing::warn!("Failed to delete note {}: {}", note.id, error);
                let message = error.user_message("Failed to delete note.");
                self.state.send_modify(|state| state.error = Some(message));
                Outcome::Failed
            }
        }
    }
}

impl Drop for ListController {
    fn drop(&mut self) {
        self.scope.teardown();
    }
}
