use std::sync::Arc;

use jot_core::views::DetailController;
use jot_core::NotesApi;

use crate::commands::common::{interruptible, normalize_note_identifier, render_detail, settle};
use crate::error::CliError;

pub async fn run_show(api: Arc<dyn NotesApi>, id: &str, as_json: bool) -> Result<(), CliError> {
    let note_id = normalize_note_identifier(id)?;
    let mut view = DetailController::new(api, note_id);
    let teardown = view.teardown_handle();
    let outcome = interruptible(&teardown, view.mount()).await?;
    settle(outcome, view.state().error.clone())?;

    let state = view.state();
    if as_json {
        println!("{}", serde_json::to_string_pretty(&state.note)?);
    } else {
        for line in render_detail(&state) {
            println!("{line}");
        }
    }

    Ok(())
}
