use std::path::PathBuf;

use clap::Parser;

/// Terminal todo-list client backed by a REST service.
/// The backend defaults to http://localhost:8000 or the TODO_API_URL
/// environment variable; --api-url overrides both.
#[derive(Parser)]
#[command(name = "todo", version, about = "Tabbed terminal todo client")]
pub struct Cli {
    /// Base URL of the todo backend, e.g. http://localhost:8000
    #[arg(long)]
    pub api_url: Option<String>,

    /// Per-request timeout in seconds.
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// File to write diagnostics to (the screen belongs to the UI).
    #[arg(long, default_value = "todo.log")]
    pub log_file: PathBuf,
}
