use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] jot_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error(transparent)]
    LogFilter(#[from] tracing_subscriber::filter::ParseError),
    #[error("Note ID cannot be empty")]
    EmptyNoteId,
    #[error("Note not found: {0}")]
    NoteNotFound(String),
    #[error("Nothing to change; pass --title and/or --content")]
    NothingToEdit,
    /// Message a view put in its `error` field
    #[error("{0}")]
    View(String),
    #[error("Interrupted")]
    Interrupted,
}

impl CliError {
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Interrupted => 130,
            _ => 1,
        }
    }
}
