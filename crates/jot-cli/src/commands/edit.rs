use std::sync::Arc;

use jot_core::views::DetailController;
use jot_core::NotesApi;

use crate::commands::common::{interruptible, normalize_note_identifier, render_detail, settle};
use crate::error::CliError;

pub async fn run_edit(
    api: Arc<dyn NotesApi>,
    id: &str,
    title: Option<String>,
    content: Option<String>,
) -> Result<(), CliError> {
    if title.is_none() && content.is_none() {
        return Err(CliError::NothingToEdit);
    }
    let note_id = normalize_note_identifier(id)?;
    let mut view = DetailController::new(api, note_id);
    let teardown = view.teardown_handle();

    let outcome = interruptible(&teardown, view.mount()).await?;
    settle(outcome, view.state().error.clone())?;

    if let Some(title) = title {
        view.set_title(title);
    }
    if let Some(content) = content {
        view.set_content(content);
    }

    let outcome = interruptible(&teardown, view.save()).await?;
    settle(outcome, view.state().error.clone())?;

    for line in render_detail(&view.state()) {
        println!("{line}");
    }
    Ok(())
}
