//! Line-oriented session over the list, edit and create pages.
//!
//! Exactly one view is alive at a time. Navigating away unmounts it, which
//! tears down whatever it still has in flight.

use std::future::Future;
use std::io::{self, BufRead, Write};
use std::sync::Arc;

use chrono::Utc;
use jot_core::views::{CreateController, DetailController, ListController, Outcome, Route};
use jot_core::{CancellationToken, NotesApi};

use crate::commands::common::{
    interruptible, render_create, render_detail, render_list, LinePrompt,
};
use crate::error::CliError;

const HELP: &str = "\
List page:    search <text> | refresh | open <n> | delete <n> | new
Edit page:    title <text> | content <text> | save | delete | back
Create page:  title <text> | content <text> | save | back
Anywhere:     help | quit (or Ctrl-D)";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Empty,
    Help,
    Quit,
    Search(String),
    Refresh,
    Open(usize),
    /// Row number on the list page, none on the edit page
    Delete(Option<usize>),
    New,
    Title(String),
    Content(String),
    Save,
    Back,
    Unknown(String),
}

pub fn parse_command(line: &str) -> ShellCommand {
    let line = line.trim();
    let (word, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(word, rest)| (word, rest.trim()));
    let unknown = || ShellCommand::Unknown(line.to_string());

    match word.to_ascii_lowercase().as_str() {
        "" => ShellCommand::Empty,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" | "q" => ShellCommand::Quit,
        "search" | "/" => ShellCommand::Search(rest.to_string()),
        "refresh" | "r" => ShellCommand::Refresh,
        "open" | "o" => rest.parse().map_or_else(|_| unknown(), ShellCommand::Open),
        "delete" | "rm" if rest.is_empty() => ShellCommand::Delete(None),
        "delete" | "rm" => rest
            .parse()
            .map_or_else(|_| unknown(), |row| ShellCommand::Delete(Some(row))),
        "new" => ShellCommand::New,
        "title" => ShellCommand::Title(rest.to_string()),
        "content" => ShellCommand::Content(rest.to_string()),
        "save" => ShellCommand::Save,
        "back" => ShellCommand::Back,
        _ => unknown(),
    }
}

enum View {
    List(ListController),
    Detail(DetailController),
    Create(CreateController),
}

impl View {
    fn teardown_handle(&self) -> CancellationToken {
        match self {
            Self::List(view) => view.teardown_handle(),
            Self::Detail(view) => view.teardown_handle(),
            Self::Create(view) => view.teardown_handle(),
        }
    }

    fn unmount(&mut self) {
        match self {
            Self::List(view) => view.unmount(),
            Self::Detail(view) => view.unmount(),
            Self::Create(view) => view.unmount(),
        }
    }

    fn prompt(&self) -> String {
        match self {
            Self::List(_) => "jot> ".to_string(),
            Self::Detail(view) => format!("jot #{}> ", view.id()),
            Self::Create(_) => "jot new> ".to_string(),
        }
    }
}

enum Flow {
    Continue,
    Quit,
}

pub struct Shell<R, W> {
    api: Arc<dyn NotesApi>,
    input: R,
    output: W,
    view: View,
    listen_for_interrupt: bool,
}

/// Run the shell on stdin/stdout with Ctrl-C tearing down the current view.
pub async fn run_shell(api: Arc<dyn NotesApi>) -> Result<(), CliError> {
    let mut shell = Shell::new(api, io::stdin().lock(), io::stdout()).listening_for_interrupts();
    shell.run().await
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(api: Arc<dyn NotesApi>, input: R, output: W) -> Self {
        Self {
            view: View::List(ListController::new(api.clone())),
            api,
            input,
            output,
            listen_for_interrupt: false,
        }
    }

    #[must_use]
    pub fn listening_for_interrupts(mut self) -> Self {
        self.listen_for_interrupt = true;
        self
    }

    pub async fn run(&mut self) -> Result<(), CliError> {
        writeln!(self.output, "Type `help` for commands.")?;
        self.enter(Route::List).await?;

        loop {
            write!(self.output, "{}", self.view.prompt())?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                writeln!(self.output)?;
                break;
            }

            match self.execute(parse_command(&line)).await {
                Ok(Flow::Continue) => {}
                Ok(Flow::Quit) => break,
                Err(CliError::Interrupted) => self.recover_from_interrupt()?,
                Err(error) => return Err(error),
            }
        }

        self.view.unmount();
        Ok(())
    }

    async fn execute(&mut self, command: ShellCommand) -> Result<Flow, CliError> {
        match command {
            ShellCommand::Empty => {}
            ShellCommand::Help => writeln!(self.output, "{HELP}")?,
            ShellCommand::Quit => return Ok(Flow::Quit),
            ShellCommand::Unknown(text) => {
                writeln!(self.output, "Unknown command: {text} (try `help`)")?;
            }
            ShellCommand::Back => self.enter(Route::List).await?,
            ShellCommand::New => self.enter(Route::Create).await?,
            command => self.execute_in_view(command).await?,
        }
        Ok(Flow::Continue)
    }

    /// Replace the current view with the one for `route` and mount it.
    async fn enter(&mut self, route: Route) -> Result<(), CliError> {
        self.view.unmount();
        tracing::debug!("Entering {}", route);
        self.view = match route {
            Route::List => View::List(ListController::new(self.api.clone())),
            Route::Detail(id) => View::Detail(DetailController::new(self.api.clone(), id)),
            Route::Create => View::Create(CreateController::new(self.api.clone())),
        };

        let teardown = self.view.teardown_handle();
        let listen = self.listen_for_interrupt;
        match &mut self.view {
            View::List(view) => {
                guard(listen, &teardown, view.mount()).await?;
            }
            View::Detail(view) => {
                guard(listen, &teardown, view.mount()).await?;
            }
            View::Create(_) => {}
        }
        self.render()
    }

    async fn execute_in_view(&mut self, command: ShellCommand) -> Result<(), CliError> {
        let teardown = self.view.teardown_handle();
        let listen = self.listen_for_interrupt;
        let Self {
            view,
            input,
            output,
            ..
        } = &mut *self;

        let outcome = match (view, command) {
            (View::List(list), ShellCommand::Search(query)) => {
                list.set_query(query);
                None
            }
            (View::List(list), ShellCommand::Refresh) => {
                Some(guard(listen, &teardown, list.refresh()).await?)
            }
            (View::List(list), ShellCommand::Open(row)) => {
                let target = row_at(list, row).map(|note| note.id);
                match target {
                    Some(id) => Some(Outcome::Navigate(Route::Detail(id))),
                    None => {
                        writeln!(output, "No note at row {row}.")?;
                        return Ok(());
                    }
                }
            }
            (View::List(list), ShellCommand::Delete(Some(row))) => {
                let Some(note) = row_at(list, row) else {
                    writeln!(output, "No note at row {row}.")?;
                    return Ok(());
                };
                let prompt = LinePrompt::new(&mut *input, &mut *output);
                Some(guard(listen, &teardown, list.delete_row(&note, &prompt)).await?)
            }
            (View::Detail(detail), ShellCommand::Title(title)) => {
                detail.set_title(title);
                None
            }
            (View::Detail(detail), ShellCommand::Content(content)) => {
                detail.set_content(content);
                None
            }
            (View::Detail(detail), ShellCommand::Save) => {
                Some(guard(listen, &teardown, detail.save()).await?)
            }
            (View::Detail(detail), ShellCommand::Delete(None)) => {
                let outcome = {
                    let prompt = LinePrompt::new(&mut *input, &mut *output);
                    guard(listen, &teardown, detail.delete(&prompt)).await?
                };
                if matches!(outcome, Outcome::Navigate(_)) {
                    writeln!(output, "Note deleted.")?;
                }
                Some(outcome)
            }
            (View::Create(create), ShellCommand::Title(title)) => {
                create.set_title(title);
                None
            }
            (View::Create(create), ShellCommand::Content(content)) => {
                create.set_content(content);
                None
            }
            (View::Create(create), ShellCommand::Save) => {
                let outcome = guard(listen, &teardown, create.submit()).await?;
                if let Some(message) = create.state().success_message.as_deref() {
                    writeln!(output, "{message}")?;
                }
                Some(outcome)
            }
            (_, _) => {
                writeln!(output, "Not available on this page (try `help`)")?;
                return Ok(());
            }
        };

        match outcome {
            Some(Outcome::Navigate(route)) => self.enter(route).await,
            Some(Outcome::Declined) => {
                writeln!(self.output, "Delete cancelled.")?;
                Ok(())
            }
            _ => self.render(),
        }
    }

    fn render(&mut self) -> Result<(), CliError> {
        let lines = match &self.view {
            View::List(view) => render_list(&view.state(), Utc::now()),
            View::Detail(view) => render_detail(&view.state()),
            View::Create(view) => render_create(&view.state()),
        };
        for line in lines {
            writeln!(self.output, "{line}")?;
        }
        Ok(())
    }

    /// The interrupted view is gone; start over on an unloaded list page.
    fn recover_from_interrupt(&mut self) -> Result<(), CliError> {
        self.view.unmount();
        self.view = View::List(ListController::new(self.api.clone()));
        writeln!(self.output, "Interrupted. Type `refresh` to load notes.")?;
        Ok(())
    }
}

/// 1-based row of the filtered list.
fn row_at(list: &ListController, row: usize) -> Option<jot_core::Note> {
    let index = row.checked_sub(1)?;
    list.state().visible_notes().get(index).map(|note| (*note).clone())
}

async fn guard<F>(
    listen: bool,
    teardown: &CancellationToken,
    operation: F,
) -> Result<Outcome, CliError>
where
    F: Future<Output = Outcome>,
{
    if listen {
        interruptible(teardown, operation).await
    } else {
        Ok(operation.await)
    }
}
