//! jot-api - reference notes service
//!
//! A small CRUD service over an in-memory store, speaking the same REST
//! shape the Jot client consumes. Used for local development and the
//! client's end-to-end tests.

pub mod config;
pub mod error;
pub mod routes;
pub mod store;

pub use config::AppConfig;
pub use routes::{app_router, AppState};
