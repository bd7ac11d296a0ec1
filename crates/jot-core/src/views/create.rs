//! Controller for the new-note page.

use std::sync::Arc;

use tokio::sync::watch;

use super::{Outcome, Route};
use crate::api::NotesApi;
use crate::cancel::{CancellationToken, ViewScope};
use crate::error::Error;
use crate::models::{Note, NoteDraft};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateViewState {
    pub form: NoteDraft,
    pub saving: bool,
    pub error: Option<String>,
    pub success_message: Option<String>,
    /// Note returned by the server for the last successful submit
    pub created: Option<Note>,
}

pub struct CreateController {
    api: Arc<dyn NotesApi>,
    state: watch::Sender<CreateViewState>,
    scope: ViewScope,
}

impl CreateController {
    pub fn new(api: Arc<dyn NotesApi>) -> Self {
        let (state, _) = watch::channel(CreateViewState::default());
        Self {
            api,
            state,
            scope: ViewScope::new(),
        }
    }

    pub fn state(&self) -> watch::Ref<'_, CreateViewState> {
        self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<CreateViewState> {
        self.state.subscribe()
    }

    pub fn teardown_handle(&self) -> CancellationToken {
        self.scope.teardown_handle()
    }

    pub fn unmount(&mut self) {
        self.scope.teardown();
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        let title = title.into();
        self.state.send_modify(|state| state.form.title = title);
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        let content = content.into();
        self.state.send_modify(|state| state.form.content = content);
    }

    /// Create the note, then ask to go back to the list.
    pub async fn submit(&mut self) -> Outcome {
        if self.scope.is_torn_down() {
            return Outcome::Cancelled;
        }
        if self.state.borrow().saving {
            return Outcome::Rejected;
        }

        self.state.send_modify(|state| {
            state.error = None;
            state.success_message = None;
        });
        let validated = self.state.borrow().form.validated();
        let draft = match validated {
            Ok(draft) => draft,
            Err(error) => {
                let message = error.to_string();
                self.state.send_modify(|state| state.error = Some(message));
                return Outcome::Rejected;
            }
        };

        let token = self.scope.operation_token();
        self.state.send_modify(|state| state.saving = true);

        tracing::debug!("Creating note \"{}\"", draft.title);
        let result = self.api.create(&draft, Some(&token)).await;
        if token.is_cancelled() {
            tracing::debug!("Discarding created note for a torn-down view");
            return Outcome::Cancelled;
        }

        match result {
            Ok(note) => {
                tracing::info!("Created note {}", note.id);
                self.state.send_modify(|state| {
                    state.created = Some(note);
                    state.success_message = Some("Note created.".to_string());
                    state.saving = false;
                });
                Outcome::Navigate(Route::List)
            }
            Err(Error::Cancelled) => {
                self.state.send_modify(|state| state.saving = false);
                Outcome::Cancelled
            }
            Err(error) => {
                tracing::warn!("Failed to create note: {}", error);
                let message = error.user_message("Failed to create note.");
                self.state.send_modify(|state| {
                    state.error = Some(message);
                    state.saving = false;
                });
                Outcome::Failed
            }
        }
    }
}

impl Drop for CreateController {
    fn drop(&mut self) {
        self.scope.teardown();
    }
}
