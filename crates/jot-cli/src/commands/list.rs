use std::sync::Arc;

use chrono::Utc;
use jot_core::views::ListController;
use jot_core::NotesApi;

use crate::commands::common::{
    interruptible, note_to_list_item, render_list, settle, NoteListItem,
};
use crate::error::CliError;

pub async fn run_list(
    api: Arc<dyn NotesApi>,
    query: Option<&str>,
    as_json: bool,
) -> Result<(), CliError> {
    let mut view = ListController::new(api);
    let teardown = view.teardown_handle();
    let outcome = interruptible(&teardown, view.mount()).await?;
    settle(outcome, view.state().error.clone())?;

    if let Some(query) = query {
        view.set_query(query);
    }

    let now = Utc::now();
    let state = view.state();
    if as_json {
        let json_items = state
            .visible_notes()
            .into_iter()
            .map(|note| note_to_list_item(note, now))
            .collect::<Vec<NoteListItem>>();
        println!("{}", serde_json::to_string_pretty(&json_items)?);
    } else {
        for line in render_list(&state, now) {
            println!("{line}");
        }
    }

    Ok(())
}
