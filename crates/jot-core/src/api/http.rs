//! reqwest-backed client for the notes REST service.

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::NotesApi;
use crate::cancel::{run_cancellable, CancellationToken};
use crate::config::{normalize_base_url, ClientConfig};
use crate::error::{Error, Result};
use crate::models::{Note, NoteDraft, NoteId};

/// HTTP client for the notes service.
#[derive(Debug, Clone)]
pub struct HttpNotesClient {
    base_url: String,
    client: reqwest::Client,
}

impl HttpNotesClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let base_url = normalize_base_url(&config.api_base_url)?;
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|error| {
                Error::InvalidConfig(format!("Failed to construct HTTP client: {error}"))
            })?;
        Ok(Self { base_url, client })
    }

    /// Returns the base URL this client was configured with.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn collection_url(&self) -> String {
        format!("{}/notes", self.base_url)
    }

    fn note_url(&self, id: &NoteId) -> String {
        format!("{}/notes/{}", self.base_url, id.url_encoded())
    }

    fn request(&self, method: Method, url: String) -> RequestBuilder {
        self.client
            .request(method, url)
            .header("Accept", "application/json")
    }

    async fn send(request: RequestBuilder, subject: Option<&NoteId>) -> Result<Response> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(classify_failure(status, &body, subject))
    }

    async fn send_json<T: DeserializeOwned>(
        request: RequestBuilder,
        subject: Option<&NoteId>,
    ) -> Result<T> {
        let response = Self::send(request, subject).await?;
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl NotesApi for HttpNotesClient {
    async fn list(&self, cancel: Option<&CancellationToken>) -> Result<Vec<Note>> {
        tracing::debug!("GET {}", self.collection_url());
        let request = self.request(Method::GET, self.collection_url());
        run_cancellable(cancel, Self::send_json(request, None)).await
    }

    async fn get(&self, id: &NoteId, cancel: Option<&CancellationToken>) -> Result<Note> {
        tracing::debug!("GET {}", self.note_url(id));
        let request = self.request(Method::GET, self.note_url(id));
        run_cancellable(cancel, Self::send_json(request, Some(id))).await
    }

    async fn create(
        &self,
        draft: &NoteDraft,
        cancel: Option<&CancellationToken>,
    ) -> Result<Note> {
        tracing::debug!("POST {}", self.collection_url());
        let request = self
            .request(Method::POST, self.collection_url())
            .json(draft);
        run_cancellable(cancel, Self::send_json(request, None)).await
    }

    async fn update(
        &self,
        id: &NoteId,
        draft: &NoteDraft,
        cancel: Option<&CancellationToken>,
    ) -> Result<Note> {
        tracing::debug!("PUT {}", self.note_url(id));
        let request = self.request(Method::PUT, self.note_url(id)).json(draft);
        run_cancellable(cancel, Self::send_json(request, Some(id))).await
    }

    async fn delete(&self, id: &NoteId, cancel: Option<&CancellationToken>) -> Result<()> {
        tracing::debug!("DELETE {}", self.note_url(id));
        let request = self.request(Method::DELETE, self.note_url(id));
        run_cancellable(cancel, async move {
            Self::send(request, Some(id)).await?;
            Ok(())
        })
        .await
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
}

fn classify_failure(status: StatusCode, body: &str, subject: Option<&NoteId>) -> Error {
    let message = parse_error_message(status, body);
    match (status, subject) {
        (StatusCode::NOT_FOUND, Some(id)) => Error::NotFound(id.to_string()),
        (StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY, _) => {
            Error::Validation(message)
        }
        _ => Error::Server {
            status: status.as_u16(),
            message,
        },
    }
}

fn parse_error_message(status: StatusCode, body: &str) -> String {
    if let Ok(payload) = serde_json::from_str::<ErrorBody>(body) {
        if let Some(message) = payload.error.or(payload.message) {
            let message = message.trim();
            if !message.is_empty() {
                return message.to_string();
            }
        }
    }

    let trimmed: String = body.trim().chars().take(180).collect();
    if trimmed.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        trimmed
    }
}
