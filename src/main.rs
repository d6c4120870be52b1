//! # taskchat - Conversational Task Manager
//!
//! A personal task list you manage by chatting with an assistant, either in a
//! full-screen terminal chat or line by line on stdin/stdout.
//!
//! ## Key Features
//!
//! - **Guided Dialogs**: Adding, updating and deleting tasks are short question-and-answer
//! flows with a confirmation before anything is saved
//! - **Quick Actions**: Every question offers buttons for its likely answers (F1-F9 in the TUI)
//! - **Forgiving Input**: "add", "show my list" or "remove" all find the right dialog
//! - **Local File Storage**: Tasks live in a single pretty-printed JSON file
//!
//! ## Quick Start
//!
//! ```bash
//! # Open the chat
//! taskchat
//!
//! # Chat without a full-screen UI
//! taskchat repl
//!
//! # Print the task table
//! taskchat list --priority high
//! ```
//!
//! ## Conversation Example
//!
//! ```text
//! You:       add a task
//! Assistant: Great! What's the title of your task?
//! You:       Buy milk
//! Assistant: When is it due? (e.g. "tomorrow 9am" or "Friday")
//! ...
//! Assistant: Task saved!
//! ```
//!
//! Data is stored locally in `~/.taskchat/` (`tasks.json` plus `taskchat.log`).
//! Pass `--data-dir` to keep a separate list, or `--ephemeral` to try things out.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use clap::Parser;
use eyre::{Result, WrapErr};
use log::info;

pub mod cli;
pub mod cmd;
pub mod fields;
pub mod message;
pub mod store;
pub mod task;
pub mod dialog {
    pub mod add;
    pub mod delete;
    pub mod engine;
    pub mod flow;
    pub mod parse;
    pub mod update;
    pub mod view;
}
pub mod tui {
    pub mod app;
    pub mod colors;
    pub mod enums;
    pub mod input;
    pub mod run;
    pub mod utils;
}

use cli::{Cli, LogLevel};
use cmd::*;
use store::{FileStore, LocalStore, MemoryStore};

const LOG_FILE: &str = "taskchat.log";

/// Send log records to `<data dir>/taskchat.log` so they never land on the
/// chat screen. `RUST_LOG` overrides `--log-level`.
fn setup_logging(data_dir: &Path, level: LogLevel) -> Result<()> {
    let path = data_dir.join(LOG_FILE);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .wrap_err_with(|| format!("Failed to open log file {}", path.display()))?;

    env_logger::Builder::new()
        .filter_level(level.filter())
        .parse_default_env()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

/// `--data-dir` if given, else `~/.taskchat`, else the current directory.
fn resolve_data_dir(cli_dir: Option<PathBuf>) -> PathBuf {
    cli_dir.unwrap_or_else(|| {
        dirs::home_dir()
            .map(|home| home.join(".taskchat"))
            .unwrap_or_else(|| PathBuf::from("."))
    })
}

fn run(cli: Cli) -> Result<()> {
    let command = cli.command.unwrap_or(Commands::Chat);

    // Completions only print a script and never touch the data directory.
    if let Commands::Completions { shell } = command {
        return cmd_completions(shell);
    }

    let data_dir = resolve_data_dir(cli.data_dir);
    fs::create_dir_all(&data_dir)
        .wrap_err_with(|| format!("Failed to create data directory {}", data_dir.display()))?;
    setup_logging(&data_dir, cli.log_level).wrap_err("Failed to setup logging")?;

    let store: Box<dyn LocalStore> = if cli.ephemeral {
        info!("ephemeral session, nothing will be saved");
        Box::new(MemoryStore::default())
    } else {
        info!("using data directory {}", data_dir.display());
        Box::new(FileStore::new(data_dir))
    };

    match command {
        Commands::Chat => cmd_chat(store),
        Commands::Repl => cmd_repl(store),
        Commands::List { priority } => cmd_list(store.as_ref(), priority),
        Commands::Completions { .. } => unreachable!("completions handled above"),
    }
}

fn main() -> Result<()> {
    run(Cli::parse())
}
