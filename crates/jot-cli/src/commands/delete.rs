use std::io;
use std::sync::Arc;

use jot_core::views::{Confirm, ListController, Outcome};
use jot_core::NotesApi;

use crate::commands::common::{interruptible, normalize_note_identifier, settle, LinePrompt};
use crate::error::CliError;

fn assume_yes(_: &str) -> bool {
    true
}

/// Load the list, then delete one of its rows.
pub async fn run_delete(api: Arc<dyn NotesApi>, id: &str, yes: bool) -> Result<(), CliError> {
    let note_id = normalize_note_identifier(id)?;
    let mut view = ListController::new(api);
    let teardown = view.teardown_handle();

    let outcome = interruptible(&teardown, view.mount()).await?;
    settle(outcome, view.state().error.clone())?;

    let note = view
        .state()
        .notes
        .iter()
        .flatten()
        .find(|note| note.id == note_id)
        .cloned()
        .ok_or_else(|| CliError::NoteNotFound(note_id.to_string()))?;

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stderr();
    let prompt = LinePrompt::new(&mut input, &mut output);
    let confirm: &dyn Confirm = if yes { &assume_yes } else { &prompt };

    let outcome = interruptible(&teardown, view.delete_row(&note, confirm)).await?;
    let error = view.state().error.clone();
    if settle(outcome, error)? == Outcome::Declined {
        println!("Delete cancelled.");
    } else if let Some(message) = view.state().success_message.as_deref() {
        println!("{message}");
    }
    Ok(())
}
