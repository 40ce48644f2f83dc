//! # todo - Terminal Todo Client
//!
//! A tabbed terminal client for a todo REST backend: browse items split into
//! Incomplete and Complete views, and create, edit, or delete them through a
//! modal form. The backend is the only store; the client re-fetches the full
//! list after every successful change.
//!
//! ## Key Features
//!
//! - **Two-tab view**: items partitioned by their completed flag
//! - **Modal task form**: title, description, and a completed checkbox
//! - **Backend as source of truth**: no local persistence, no caching; every
//!   mutation is followed by a full re-fetch
//! - **Degraded reads**: an unreachable backend or a malformed payload shows
//!   an empty list and a log entry, never a crash
//!
//! ## Quick Start
//!
//! ```bash
//! # Talk to a backend on localhost:8000
//! todo
//!
//! # Point at another instance
//! todo --api-url http://10.0.0.5:8000
//!
//! # Or configure it via the environment
//! TODO_API_URL=http://10.0.0.5:8000 todo
//! ```
//!
//! ## Keys
//!
//! - `Tab` / `1` / `2` - switch between Incomplete and Complete
//! - `Up`/`Down` or `j`/`k` - move the selection
//! - `a` - add an item, `e`/`Enter` - edit the selected item
//! - `d` - delete the selected item, `r` - refresh from the backend
//! - `q` - quit
//!
//! Diagnostics go to `todo.log` (or `--log-file`); the screen belongs to the
//! UI.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use anyhow::Context;
use clap::Parser;
use tokio::runtime::Runtime;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub mod api;
pub mod cli;
pub mod config;
pub mod controller;
pub mod item;
pub mod tui {
    pub mod colors;
    pub mod app;
    pub mod form;
    pub mod input;
    pub mod run;
    pub mod utils;
}

use api::ApiClient;
use cli::Cli;
use config::ClientConfig;
use controller::ListController;
use tui::app::App;

/// Send diagnostics to a file; stdout and stderr belong to the TUI.
fn init_tracing(log_file: &Path) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::try_new("warn").expect("warn filter is valid"));

    match OpenOptions::new().create(true).append(true).open(log_file) {
        Ok(file) => {
            tracing_subscriber::registry()
                .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
                .with(env_filter)
                .init();
            tracing::info!(path = %log_file.display(), "logging initialized");
        }
        Err(_) => {
            // If the log file cannot be opened, prefer no logs over
            // corrupting the display.
            tracing_subscriber::registry().with(env_filter).init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(&cli.log_file);

    let config = ClientConfig::resolve(cli.api_url, cli.timeout_secs);
    tracing::info!(base_url = %config.base_url, "starting todo client");

    let runtime = Runtime::new().context("failed to start async runtime")?;
    let api = ApiClient::new(&config).context("failed to build HTTP client")?;
    let controller = ListController::new(api);

    let mut app = App::new(controller, runtime);
    tui::run::run(&mut app)?;

    Ok(())
}
