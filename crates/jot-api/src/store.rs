//! In-memory note storage.
//!
//! Notes are kept in creation order, which is the order `list` returns.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::error::AppError;

/// Wire representation of a note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoteBody {
    pub id: String,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Create/update request body.
#[derive(Debug, Clone, Deserialize)]
pub struct NotePayload {
    pub title: String,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone)]
struct StoredNote {
    id: u64,
    title: String,
    content: String,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

impl StoredNote {
    fn to_body(&self) -> NoteBody {
        NoteBody {
            id: self.id.to_string(),
            title: self.title.clone(),
            content: self.content.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, Default)]
struct Inner {
    notes: Vec<StoredNote>,
    next_id: u64,
}

#[derive(Debug)]
pub struct NoteStore {
    inner: RwLock<Inner>,
    max_title_chars: usize,
}

impl NoteStore {
    pub fn new(max_title_chars: usize) -> Self {
        Self {
            inner: RwLock::new(Inner {
                notes: Vec::new(),
                next_id: 1,
            }),
            max_title_chars,
        }
    }

    pub async fn list(&self) -> Vec<NoteBody> {
        let inner = self.inner.read().await;
        inner.notes.iter().map(StoredNote::to_body).collect()
    }

    pub async fn get(&self, id: &str) -> Result<NoteBody, AppError> {
        let key = parse_id(id)?;
        let inner = self.inner.read().await;
        inner
            .notes
            .iter()
            .find(|note| note.id == key)
            .map(StoredNote::to_body)
            .ok_or_else(|| AppError::not_found(id))
    }

    pub async fn create(&self, payload: NotePayload) -> Result<NoteBody, AppError> {
        let title = self.validate_title(&payload.title)?;
        let mut inner = self.inner.write().await;
        let note = StoredNote {
            id: inner.next_id,
            title,
            content: payload.content,
            created_at: Utc::now(),
            updated_at: None,
        };
        inner.next_id += 1;
        inner.notes.push(note.clone());
        tracing::info!("Created note {}", note.id);
        Ok(note.to_body())
    }

    pub async fn update(&self, id: &str, payload: NotePayload) -> Result<NoteBody, AppError> {
        let key = parse_id(id)?;
        let title = self.validate_title(&payload.title)?;
        let mut inner = self.inner.write().await;
        let note = inner
            .notes
            .iter_mut()
            .find(|note| note.id == key)
            .ok_or_else(|| AppError::not_found(id))?;
        note.title = title;
        note.content = payload.content;
        note.updated_at = Some(Utc::now());
        tracing::info!("Updated note {}", note.id);
        Ok(note.to_body())
    }

    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        let key = parse_id(id)?;
        let mut inner = self.inner.write().await;
        let position = inner
            .notes
            .iter()
            .position(|note| note.id == key)
            .ok_or_else(|| AppError::not_found(id))?;
        inner.notes.remove(position);
        tracing::info!("Deleted note {}", key);
        Ok(())
    }

    fn validate_title(&self, raw: &str) -> Result<String, AppError> {
        let title = raw.trim();
        if title.is_empty() {
            return Err(AppError::validation("Title is required."));
        }
        if title.chars().count() > self.max_title_chars {
            return Err(AppError::validation(format!(
                "Title must be at most {} characters.",
                self.max_title_chars
            )));
        }
        Ok(title.to_string())
    }
}

/// Ids this store never issued are simply unknown.
fn parse_id(raw: &str) -> Result<u64, AppError> {
    raw.trim()
        .parse::<u64>()
        .map_err(|_| AppError::not_found(raw))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn payload(title: &str, content: &str) -> NotePayload {
        NotePayload {
            title: title.to_string(),
            content: content.to_string(),
        }
    }

    #[tokio::test]
    async fn create_assigns_ids_and_keeps_creation_order() {
        let store = NoteStore::new(200);
        let first = store.create(payload(" First ", "a")).await.unwrap();
        let second = store.create(payload("Second", "")).await.unwrap();

        assert_eq!(first.id, "1");
        assert_eq!(first.title, "First");
        assert_eq!(first.updated_at, None);
        assert_eq!(second.id, "2");

        let ids: Vec<_> = store.list().await.into_iter().map(|note| note.id).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[tokio::test]
    async fn update_refreshes_updated_at_only() {
        let store = NoteStore::new(200);
        let created = store.create(payload("Groceries", "milk")).await.unwrap();
        let updated = store
            .update(&created.id, payload("Groceries v2", "milk"))
            .await
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at.is_some());
        assert_eq!(store.get(&created.id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn rejects_blank_and_oversized_titles() {
        let store = NoteStore::new(5);
        assert!(matches!(
            store.create(payload("  ", "x")).await,
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            store.create(payload("too long", "x")).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn unknown_ids_are_not_found() {
        let store = NoteStore::new(200);
        let created = store.create(payload("Note", "")).await.unwrap();
        store.delete(&created.id).await.unwrap();

        assert!(matches!(
            store.get(&created.id).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            store.delete(&created.id).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            store.update("abc", payload("x", "")).await,
            Err(AppError::NotFound(_))
        ));
    }
}
