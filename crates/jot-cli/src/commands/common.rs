use std::cell::RefCell;
use std::future::Future;
use std::io::{self, BufRead, Write};

use chrono::{DateTime, Local, Utc};
use jot_core::models::Activity;
use jot_core::views::{
    Confirm, CreateViewState, DetailViewState, ListViewState, Outcome,
};
use jot_core::{CancellationToken, Note, NoteId};
use serde::Serialize;

use crate::error::CliError;

#[derive(Debug, Serialize)]
pub struct NoteListItem {
    pub id: String,
    pub title: String,
    pub preview: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub activity: String,
}

pub fn note_to_list_item(note: &Note, now: DateTime<Utc>) -> NoteListItem {
    NoteListItem {
        id: note.id.to_string(),
        title: note.title.clone(),
        preview: note_preview(&note.content, 80),
        created_at: note.created_at,
        updated_at: note.updated_at,
        activity: activity_label(note, now),
    }
}

/// Run a controller operation, tearing its view down on Ctrl-C.
pub async fn interruptible<F>(
    teardown: &CancellationToken,
    operation: F,
) -> Result<Outcome, CliError>
where
    F: Future<Output = Outcome>,
{
    until_interrupted(teardown, operation, tokio::signal::ctrl_c()).await
}

/// Race `operation` against `interrupt`.
///
/// On interrupt the view is torn down and the operation is still awaited so
/// it can observe the teardown and settle before the command exits.
pub async fn until_interrupted<F, I>(
    teardown: &CancellationToken,
    operation: F,
    interrupt: I,
) -> Result<Outcome, CliError>
where
    F: Future<Output = Outcome>,
    I: Future<Output = io::Result<()>>,
{
    tokio::pin!(operation);
    tokio::select! {
        biased;
        outcome = &mut operation => Ok(outcome),
        signal = interrupt => {
            signal?;
            tracing::debug!("Interrupted, tearing the view down");
            teardown.cancel();
            let outcome = operation.await;
            tracing::debug!("Operation settled after teardown: {:?}", outcome);
            Err(CliError::Interrupted)
        }
    }
}

/// Turn a controller outcome into a command result, surfacing the view's error.
pub fn settle(outcome: Outcome, error: Option<String>) -> Result<Outcome, CliError> {
    match outcome {
        Outcome::Failed | Outcome::Rejected => Err(CliError::View(
            error.unwrap_or_else(|| "Action not available right now.".to_string()),
        )),
        Outcome::Cancelled => Err(CliError::Interrupted),
        other => Ok(other),
    }
}

pub fn normalize_note_identifier(id: &str) -> Result<NoteId, CliError> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        Err(CliError::EmptyNoteId)
    } else {
        Ok(NoteId::from(trimmed))
    }
}

/// y/N prompt over a line-oriented reader and writer.
pub struct LinePrompt<'a, R, W> {
    input: RefCell<&'a mut R>,
    output: RefCell<&'a mut W>,
}

impl<'a, R: BufRead, W: Write> LinePrompt<'a, R, W> {
    pub fn new(input: &'a mut R, output: &'a mut W) -> Self {
        Self {
            input: RefCell::new(input),
            output: RefCell::new(output),
        }
    }
}

impl<R: BufRead, W: Write> Confirm for LinePrompt<'_, R, W> {
    fn confirm(&self, message: &str) -> bool {
        {
            let mut output = self.output.borrow_mut();
            if write!(output, "{message} [y/N] ")
                .and_then(|()| output.flush())
                .is_err()
            {
                return false;
            }
        }

        let mut answer = String::new();
        match self.input.borrow_mut().read_line(&mut answer) {
            Ok(0) | Err(_) => false,
            Ok(_) => is_affirmative(&answer),
        }
    }
}

pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

pub fn render_list(state: &ListViewState, now: DateTime<Utc>) -> Vec<String> {
    let mut lines = feedback_lines(state.success_message.as_deref(), state.error.as_deref());
    let Some(notes) = state.notes.as_ref() else {
        if state.loading {
            lines.push("Loading notes...".to_string());
        }
        return lines;
    };

    let visible = state.visible_notes();
    if notes.is_empty() {
        lines.push("No notes yet.".to_string());
    } else if visible.is_empty() {
        lines.push(format!("No notes match \"{}\".", state.query.trim()));
    } else {
        lines.extend(format_note_lines(&visible, now));
    }
    lines
}

pub fn render_detail(state: &DetailViewState) -> Vec<String> {
    let mut lines = feedback_lines(state.success_message.as_deref(), state.error.as_deref());
    if !state.shows_form() {
        return lines;
    }

    lines.push(format!("Title: {}", state.form.title));
    if let Some(label) = state.note.as_ref().and_then(last_modified_label) {
        lines.push(label);
    }
    lines.push(String::new());
    if state.form.content.is_empty() {
        lines.push("(no content)".to_string());
    } else {
        lines.extend(state.form.content.lines().map(str::to_string));
    }
    lines
}

pub fn render_create(state: &CreateViewState) -> Vec<String> {
    let mut lines = feedback_lines(state.success_message.as_deref(), state.error.as_deref());
    lines.push(format!("Title: {}", state.form.title));
    lines.push(format!("Content: {}", note_preview(&state.form.content, 60)));
    lines
}

fn feedback_lines(success: Option<&str>, error: Option<&str>) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(message) = success {
        lines.push(message.to_string());
    }
    if let Some(message) = error {
        lines.push(format!("Error: {message}"));
    }
    lines
}

pub fn format_note_lines(notes: &[&Note], now: DateTime<Utc>) -> Vec<String> {
    notes
        .iter()
        .enumerate()
        .map(|(index, note)| {
            let title = truncate_chars(note.display_title(), 40);
            let label = activity_label(note, now);
            format!("{:>3}. {title:<40}  {label:<20}  #{}", index + 1, note.id)
        })
        .collect()
}

/// "Updated …" / "Created …" label for a list row.
pub fn activity_label(note: &Note, now: DateTime<Utc>) -> String {
    match note.activity() {
        Some(Activity::Updated(at)) => format!("Updated {}", format_relative_time(at, now)),
        Some(Activity::Created(at)) => format!("Created {}", format_relative_time(at, now)),
        None => String::new(),
    }
}

/// "Last updated …" / "Created …" label for the edit page, in local time.
pub fn last_modified_label(note: &Note) -> Option<String> {
    note.activity().map(|activity| match activity {
        Activity::Updated(at) => format!("Last updated {}", format_local(at)),
        Activity::Created(at) => format!("Created {}", format_local(at)),
    })
}

fn format_local(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

pub fn format_relative_time(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = (now - at).num_seconds().max(0);
    let minute = 60;
    let hour = 60 * minute;
    let day = 24 * hour;
    let week = 7 * day;
    let month = 30 * day;
    let year = 365 * day;

    if diff < minute {
        "just now".to_string()
    } else if diff < hour {
        format!("{}m ago", diff / minute)
    } else if diff < day {
        format!("{}h ago", diff / hour)
    } else if diff < week {
        format!("{}d ago", diff / day)
    } else if diff < month {
        format!("{}w ago", diff / week)
    } else if diff < year {
        format!("{}mo ago", diff / month)
    } else {
        format!("{}y ago", diff / year)
    }
}

/// First line of `content` with whitespace collapsed, truncated to `max_chars`.
pub fn note_preview(content: &str, max_chars: usize) -> String {
    let first_line = content.lines().next().unwrap_or("").trim();
    let collapsed = first_line.split_whitespace().collect::<Vec<_>>().join(" ");
    truncate_chars(&collapsed, max_chars)
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let take_len = max_chars.saturating_sub(3);
        let mut truncated = text.chars().take(take_len).collect::<String>();
        truncated.push_str("...");
        truncated
    }
}
