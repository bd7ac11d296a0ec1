use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::error::AppError;
use crate::store::{NoteBody, NotePayload, NoteStore};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    store: Arc<NoteStore>,
}

impl AppState {
    pub fn from_config(config: Arc<AppConfig>) -> Self {
        Self {
            store: Arc::new(NoteStore::new(config.max_title_chars)),
            config,
        }
    }
}

pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/notes", get(list_notes).post(create_note))
        .route(
            "/notes/{id}",
            get(get_note).put(update_note).delete(delete_note),
        )
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_headers(Any)
                .allow_methods(Any),
        )
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp: i64,
    notes: usize,
}

async fn healthz(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        timestamp: Utc::now().timestamp(),
        notes: state.store.list().await.len(),
    })
}

async fn list_notes(State(state): State<AppState>) -> Json<Vec<NoteBody>> {
    Json(state.store.list().await)
}

async fn get_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<NoteBody>, AppError> {
    Ok(Json(state.store.get(&id).await?))
}

async fn create_note(
    State(state): State<AppState>,
    payload: Result<Json<NotePayload>, JsonRejection>,
) -> Result<(StatusCode, Json<NoteBody>), AppError> {
    let Json(payload) = payload.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    let note = state.store.create(payload).await?;
    Ok((StatusCode::CREATED, Json(note)))
}

async fn update_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<NotePayload>, JsonRejection>,
) -> Result<Json<NoteBody>, AppError> {
    let Json(payload) = payload.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    Ok(Json(state.store.update(&id, payload).await?))
}

async fn delete_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.store.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
