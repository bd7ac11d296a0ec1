//! Jot CLI - browse and edit notes on a remote notes service
//!
//! Each command drives one page controller from `jot-core` and prints the
//! state it ends up in.

mod cli;
mod commands;
mod error;

use std::sync::Arc;

use clap::Parser;
use jot_core::config::ConfigOverrides;
use jot_core::{ClientConfig, HttpNotesClient, NotesApi};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::commands::delete::run_delete;
use crate::commands::edit::run_edit;
use crate::commands::list::run_list;
use crate::commands::new::run_new;
use crate::commands::shell::run_shell;
use crate::commands::show::run_show;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(error.exit_code());
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive("jot=info".parse()?))
        .init();

    let cli = Cli::parse();
    let config = ClientConfig::from_env(ConfigOverrides {
        api_base_url: cli.api_url,
        request_timeout_secs: cli.timeout_secs,
    })?;
    tracing::debug!("Using notes service at {}", config.api_base_url);
    let api: Arc<dyn NotesApi> = Arc::new(HttpNotesClient::new(&config)?);

    // The root entry always lands on the list page.
    let command = cli.command.unwrap_or(Commands::List {
        query: None,
        json: false,
    });

    match command {
        Commands::List { query, json } => run_list(api, query.as_deref(), json).await?,
        Commands::Show { id, json } => run_show(api, &id, json).await?,
        Commands::New { title, content } => run_new(api, &title, &content).await?,
        Commands::Edit { id, title, content } => run_edit(api, &id, title, content).await?,
        Commands::Delete { id, yes } => run_delete(api, &id, yes).await?,
        Commands::Shell => run_shell(api).await?,
    }

    Ok(())
}
