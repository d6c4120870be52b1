use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;

use crate::cmd::Commands;

/// Chat with an assistant that keeps your task list.
/// Tasks are stored in ~/.taskchat/tasks.json or the directory passed via --data-dir.
#[derive(Parser)]
#[command(name = "taskchat", version, about = "Conversational personal task manager")]
pub struct Cli {
    /// Directory holding tasks.json and taskchat.log.
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Log level. RUST_LOG takes precedence.
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Keep tasks in memory only; nothing is loaded or saved.
    #[arg(long, global = true)]
    pub ephemeral: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Verbosity accepted by `--log-level`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn filter(self) -> LevelFilter {
        match self {
            LogLevel::Trace => LevelFilter::Trace,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Error => LevelFilter::Error,
        }
    }
}
