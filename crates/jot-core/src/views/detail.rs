//! Controller for the edit page of a single note.

use std::sync::Arc;

use tokio::sync::watch;

use super::{delete_prompt, Confirm, Outcome, Route};
use crate::api::NotesApi;
use crate::cancel::{CancellationToken, ViewScope};
use crate::error::Error;
use crate::models::{Note, NoteDraft, NoteId};

/// Lifecycle of one edit page.
///
/// `Idle -> Loading -> {Ready, LoadError}`; from `Ready` either
/// `Saving -> Ready` or `Deleting -> {Navigated, Ready}`. A failed save or
/// delete lands back in `Ready` with `error` set. A transport-level
/// cancellation while the view is still mounted returns a load to `Idle`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DetailPhase {
    #[default]
    Idle,
    Loading,
    Ready,
    LoadError,
    Saving,
    Deleting,
    Navigated,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailViewState {
    pub phase: DetailPhase,
    /// Last representation received from the server
    pub note: Option<Note>,
    /// Editable draft, seeded once from `note` on load
    pub form: NoteDraft,
    pub error: Option<String>,
    pub success_message: Option<String>,
}

impl DetailViewState {
    pub fn loading(&self) -> bool {
        self.phase == DetailPhase::Loading
    }

    pub fn saving(&self) -> bool {
        self.phase == DetailPhase::Saving
    }

    /// The edit form renders only once a note is loaded.
    pub fn shows_form(&self) -> bool {
        self.note.is_some() && !self.loading()
    }

    pub fn can_save(&self) -> bool {
        self.phase == DetailPhase::Ready
    }

    pub fn can_delete(&self) -> bool {
        self.phase == DetailPhase::Ready
    }
}

pub struct DetailController {
    api: Arc<dyn NotesApi>,
    id: NoteId,
    state: watch::Sender<DetailViewState>,
    scope: ViewScope,
}

impl DetailController {
    pub fn new(api: Arc<dyn NotesApi>, id: NoteId) -> Self {
        let (state, _) = watch::channel(DetailViewState::default());
        Self {
            api,
            id,
            state,
            scope: ViewScope::new(),
        }
    }

    pub const fn id(&self) -> &NoteId {
        &self.id
    }

    pub fn state(&self) -> watch::Ref<'_, DetailViewState> {
        self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<DetailViewState> {
        self.state.subscribe()
    }

    pub fn teardown_handle(&self) -> CancellationToken {
        self.scope.teardown_handle()
    }

    /// Activate the view and load the note.
    pub async fn mount(&mut self) -> Outcome {
        if self.state.borrow().phase != DetailPhase::Idle {
            return Outcome::Rejected;
        }
        self.load().await
    }

    pub fn unmount(&mut self) {
        self.scope.teardown();
    }

    /// Fetch the note by id. Allowed from `Idle`, or from `LoadError` as a retry.
    pub async fn load(&mut self) -> Outcome {
        if self.scope.is_torn_down() {
            return Outcome::Cancelled;
        }
        let phase = self.state.borrow().phase;
        if !matches!(phase, DetailPhase::Idle | DetailPhase::LoadError) {
            return Outcome::Rejected;
        }

        let token = self.scope.operation_token();
        self.state.send_modify(|state| {
            state.phase = DetailPhase::Loading;
            state.error = None;
            state.success_message = None;
        });

        tracing::debug!("Loading note {}", self.id);
        let result = self.api.get(&self.id, Some(&token)).await;
        if token.is_cancelled() {
            tracing::debug!("Discarding load of {} for a torn-down view", self.id);
            return Outcome::Cancelled;
        }

        match result {
            Ok(note) => {
                self.state.send_modify(|state| {
                    state.form = NoteDraft::from_note(&note);
                    state.note = Some(note);
                    state.phase = DetailPhase::Ready;
                });
                Outcome::Applied
            }
            Err(Error::Cancelled) => {
                self.state.send_modify(|state| state.phase = DetailPhase::Idle);
                Outcome::Cancelled
            }
            Err(error) => {
                tracing::warn!("Failed to load note {}: {}", self.id, error);
                let message = error.user_message("Failed to load note.");
                self.state.send_modify(|state| {
                    state.error = Some(message);
                    state.phase = DetailPhase::LoadError;
                });
                Outcome::Failed
            }
        }
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        let title = title.into();
        self.edit_form(|form| form.title = title);
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        let content = content.into();
        self.edit_form(|form| form.content = content);
    }

    fn edit_form(&self, edit: impl FnOnce(&mut NoteDraft)) {
        self.state.send_if_modified(|state| {
            if state.note.is_none() {
                return false;
            }
            edit(&mut state.form);
            true
        });
    }

    /// Send the draft to the server and adopt its response.
    ///
    /// A blank title never reaches the network. On failure the draft is kept
    /// as typed.
    pub async fn save(&mut self) -> Outcome {
        if self.scope.is_torn_down() {
            return Outcome::Cancelled;
        }
        let (note_id, form) = {
            let state = self.state.borrow();
            match (&state.note, state.phase) {
                (Some(note), DetailPhase::Ready) => (note.id.clone(), state.form.clone()),
                _ => return Outcome::Rejected,
            }
        };

        self.state.send_modify(|state| {
            state.error = None;
            state.success_message = None;
        });
        let draft = match form.validated() {
            Ok(draft) => draft,
            Err(error) => {
                let message = error.to_string();
                self.state.send_modify(|state| state.error = Some(message));
                return Outcome::Rejected;
            }
        };

        let token = self.scope.operation_token();
        self.state
            .send_modify(|state| state.phase = DetailPhase::Saving);

        tracing::debug!("Saving note {}", note_id);
        let result = self.api.update(&note_id, &draft, Some(&token)).await;
        if token.is_cancelled() {
            tracing::debug!("Discarding save of {} for a torn-down view", note_id);
            return Outcome::Cancelled;
        }

        match result {
            Ok(updated) => {
                tracing::info!("Updated note {}", updated.id);
                self.state.send_modify(|state| {
                    state.note = Some(updated);
                    state.success_message = Some("Note updated.".to_string());
                    state.phase = DetailPhase::Ready;
                });
                Outcome::Applied
            }
            Err(Error::Cancelled) => {
                self.state.send_modify(|state| state.phase = DetailPhase::Ready);
                Outcome::Cancelled
            }
            Err(error) => {
                tracing::warn!("Failed to update note {}: {}", note_id, error);
                let message = error.user_message("Failed to update note.");
                self.state.send_modify(|state| {
                    state.error = Some(message);
                    state.phase = DetailPhase::Ready;
                });
                Outcome::Failed
            }
        }
    }

    /// Delete the note after confirmation and signal a return to the list.
    pub async fn delete(&mut self, confirm: &dyn Confirm) -> Outcome {
        if self.scope.is_torn_down() {
            return Outcome::Cancelled;
        }
        let note = {
            let state = self.state.borrow();
            match (&state.note, state.phase) {
                (Some(note), DetailPhase::Ready) => note.clone(),
                _ => return Outcome::Rejected,
            }
        };
        if !confirm.confirm(&delete_prompt(&note)) {
            return Outcome::Declined;
        }

        let token = self.scope.operation_token();
        self.state.send_modify(|state| {
            state.error = None;
            state.success_message = None;
            state.phase = DetailPhase::Deleting;
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
                self.state
                    .send_modify(|state| state.phase = DetailPhase::Navigated);
                Outcome::Navigate(Route::List)
            }
            Err(Error::Cancelled) => {
                self.state.send_modify(|state| state.phase = DetailPhase::Ready);
                Outcome::Cancelled
            }
            Err(error) => {
                tracing::warn!("Failed to delete note {}: {}", note.id, error);
                let message = error.user_message("Failed to delete note.");
                self.state.send_modify(|state| {
                    state.error = Some(message);
                    state.phase = DetailPhase::Ready;
                });
                Outcome::Failed
            }
        }
    }
}

impl Drop for DetailController {
    fn drop(&mut self) {
        self.scope.teardown();
    }
}
