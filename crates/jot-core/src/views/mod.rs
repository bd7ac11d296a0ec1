//! View controllers.
//!
//! Each controller owns the state of one page visit: the list page, the edit
//! page, or the create page. State lives in a `watch` channel so the
//! presentation layer can subscribe to snapshots; every mutation goes through
//! `send_modify`, which is the notify step. Remote failures never escape a
//! controller operation; they land in the state's `error` field instead.

mod create;
mod detail;
mod list;
mod route;

#[cfg(test)]
pub(crate) mod testing;

pub use create::{CreateController, CreateViewState};
pub use detail::{DetailController, DetailPhase, DetailViewState};
pub use list::{ListController, ListViewState};
pub use route::Route;

use crate::models::Note;

/// How a controller operation ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The result was committed to view state.
    Applied,
    /// The remote call failed; the message is in `error`.
    Failed,
    /// The view was torn down; the result was discarded.
    Cancelled,
    /// The user declined the confirmation prompt.
    Declined,
    /// Not started: wrong state for this action, or client-side validation failed.
    Rejected,
    /// Succeeded and the presentation layer should navigate.
    Navigate(Route),
}

/// Interactive yes/no prompt, e.g. before a delete.
pub trait Confirm {
    fn confirm(&self, message: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, message: &str) -> bool {
        self(message)
    }
}

pub(crate) fn delete_prompt(note: &Note) -> String {
    format!("Delete note \"{}\"?", note.title)
}
