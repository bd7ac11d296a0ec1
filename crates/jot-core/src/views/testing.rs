//! Scripted in-memory notes service for controller tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use tokio::sync::Notify;

use crate::api::NotesApi;
use crate::cancel::{run_cancellable, CancellationToken};
use crate::error::{Error, Result};
use crate::models::{Note, NoteDraft, NoteId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    List,
    Get,
    Create,
    Update,
    Delete,
}

/// Holds every call at its start until released.
#[derive(Debug, Clone, Default)]
pub struct Gate {
    pub entered: Arc<Notify>,
    pub release: Arc<Notify>,
}

#[derive(Debug, Default)]
pub struct StubApi {
    notes: Mutex<Vec<Note>>,
    failures: Mutex<HashMap<Op, Error>>,
    calls: Mutex<HashMap<Op, usize>>,
    gate: Mutex<Option<Gate>>,
    honor_cancellation: bool,
    clock: AtomicU64,
}

pub fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
}

pub fn note(id: &str, title: &str, content: &str, created: i64, updated: Option<i64>) -> Note {
    Note {
        id: NoteId::from(id),
        title: title.to_string(),
        content: content.to_string(),
        created_at: Some(at(created)),
        updated_at: updated.map(at),
    }
}

impl StubApi {
    pub fn builder() -> StubApiBuilder {
        StubApiBuilder::default()
    }

    pub fn notes(&self) -> Vec<Note> {
        self.notes.lock().unwrap().clone()
    }

    pub fn calls(&self, op: Op) -> usize {
        self.calls.lock().unwrap().get(&op).copied().unwrap_or(0)
    }

    pub fn fail_next(&self, op: Op, error: Error) {
        self.failures.lock().unwrap().insert(op, error);
    }

    /// Make subsequent calls wait on the returned gate.
    pub fn hold(&self) -> Gate {
        let gate = Gate::default();
        *self.gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    fn tick(&self) -> DateTime<Utc> {
        let secs = self.clock.fetch_add(1, Ordering::SeqCst) + 1_000;
        at(i64::try_from(secs).unwrap())
    }

    async fn enter(&self, op: Op, cancel: Option<&CancellationToken>) -> Result<()> {
        *self.calls.lock().unwrap().entry(op).or_default() += 1;

        let gate = self.gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.entered.notify_one();
            let released = gate.release.notified();
            if self.honor_cancellation {
                run_cancellable(cancel, async {
                    released.await;
                    Ok(())
                })
                .await?;
            } else {
                released.await;
            }
        }

        let failure = self.failures.lock().unwrap().remove(&op);
        failure.map_or(Ok(()), Err)
    }
}

#[async_trait]
impl NotesApi for StubApi {
    async fn list(&self, cancel: Option<&CancellationToken>) -> Result<Vec<Note>> {
        self.enter(Op::List, cancel).await?;
        Ok(self.notes())
    }

    async fn get(&self, id: &NoteId, cancel: Option<&CancellationToken>) -> Result<Note> {
        self.enter(Op::Get, cancel).await?;
        self.notes()
            .into_iter()
            .find(|note| &note.id == id)
            .ok_or_else(|| Error::NotFound(id.to_string()))
    }

    async fn create(
        &self,
        draft: &NoteDraft,
        cancel: Option<&CancellationToken>,
    ) -> Result<Note> {
        self.enter(Op::Create, cancel).await?;
        let mut notes = self.notes.lock().unwrap();
        let note = Note {
            id: NoteId::new(format!("n{}", notes.len() + 1)),
            title: draft.title.clone(),
            content: draft.content.clone(),
            created_at: Some(self.tick()),
            updated_at: None,
        };
        notes.push(note.clone());
        Ok(note)
    }

    async fn update(
        &self,
        id: &NoteId,
        draft: &NoteDraft,
        cancel: Option<&CancellationToken>,
    ) -> Result<Note> {
        self.enter(Op::Update, cancel).await?;
        let updated_at = self.tick();
        let mut notes = self.notes.lock().unwrap();
        let note = notes
            .iter_mut()
            .find(|note| &note.id == id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;
        note.title.clone_from(&draft.title);
        note.content.clone_from(&draft.content);
        note.updated_at = Some(updated_at);
        Ok(note.clone())
    }

    async fn delete(&self, id: &NoteId, cancel: Option<&CancellationToken>) -> Result<()> {
        self.enter(Op::Delete, cancel).await?;
        let mut notes = self.notes.lock().unwrap();
        let before = notes.len();
        notes.retain(|note| &note.id != id);
        if notes.len() == before {
            return Err(Error::NotFound(id.to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct StubApiBuilder {
    notes: Vec<Note>,
    honor_cancellation: bool,
}

impl StubApiBuilder {
    pub fn with_note(mut self, note: Note) -> Self {
        self.notes.push(note);
        self
    }

    /// Resolve held calls to `Cancelled` when their token fires, like the
    /// HTTP client does. Without this the stub ignores tokens entirely.
    pub const fn honoring_cancellation(mut self) -> Self {
        self.honor_cancellation = true;
        self
    }

    pub fn build(self) -> Arc<StubApi> {
        Arc::new(StubApi {
            notes: Mutex::new(self.notes),
            honor_cancellation: self.honor_cancellation,
            ..StubApi::default()
        })
    }
}
