use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "jot")]
#[command(about = "List, search and edit notes kept on a remote notes service")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Base URL of the notes service (overrides JOT_API_URL)
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    /// Request timeout in seconds (overrides JOT_REQUEST_TIMEOUT_SECS)
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout_secs: Option<u64>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List notes, most recently active first
    #[command(alias = "ls")]
    List {
        /// Only show notes whose title or content contains this text
        #[arg(short, long)]
        query: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show a single note
    Show {
        /// Note ID
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Create a new note
    #[command(alias = "add")]
    New {
        /// Note title
        title: String,
        /// Note body
        #[arg(short, long, default_value = "")]
        content: String,
    },
    /// Change the title and/or content of a note
    Edit {
        /// Note ID
        id: String,
        /// New title
        #[arg(short, long)]
        title: Option<String>,
        /// New content
        #[arg(short, long)]
        content: Option<String>,
    },
    /// Delete a note
    #[command(alias = "rm")]
    Delete {
        /// Note ID
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Interactive session over the list and edit pages
    Shell,
}
