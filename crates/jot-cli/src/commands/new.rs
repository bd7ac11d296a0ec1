use std::sync::Arc;

use jot_core::views::CreateController;
use jot_core::NotesApi;

use crate::commands::common::{interruptible, settle};
use crate::error::CliError;

pub async fn run_new(api: Arc<dyn NotesApi>, title: &str, content: &str) -> Result<(), CliError> {
    let mut view = CreateController::new(api);
    view.set_title(title);
    view.set_content(content);

    let teardown = view.teardown_handle();
    let outcome = interruptible(&teardown, view.submit()).await?;
    settle(outcome, view.state().error.clone())?;

    let state = view.state();
    if let Some(note) = state.created.as_ref() {
        println!(
            "{} #{}",
            state.success_message.as_deref().unwrap_or_default(),
            note.id
        );
    }
    Ok(())
}
