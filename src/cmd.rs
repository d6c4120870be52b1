//! Command implementations for the CLI interface.
//!
//! Each subcommand gets a `cmd_*` handler. The chat front-ends (`chat` and
//! `repl`) drive a `DialogEngine`; `list` reads the local store directly.

use std::io::{self, BufRead, Write};

use clap::Subcommand;
use clap_complete::{generate, Shell};
use eyre::{Result, WrapErr};
use log::info;

use crate::dialog::engine::DialogEngine;
use crate::fields::Priority;
use crate::message::Role;
use crate::store::{print_table, LocalStore, TaskStore};
use crate::tui::run::run_chat_tui;

/// Typed in the line-mode chat to leave.
const QUIT_COMMAND: &str = "/quit";

#[derive(Subcommand)]
pub enum Commands {
    /// Open the full-screen chat (the default).
    Chat,

    /// Chat line by line on stdin/stdout.
    Repl,

    /// Print the stored tasks and exit.
    List {
        /// Only show tasks with this priority.
        #[arg(long, value_enum)]
        priority: Option<Priority>,
    },

    /// Generate shell completion scripts.
    Completions {
        /// Target shell.
        #[arg(value_enum)]
        shell: Shell,
    },
}

pub fn cmd_chat(store: Box<dyn LocalStore>) -> Result<()> {
    let engine = DialogEngine::new(store);
    run_chat_tui(engine).wrap_err("Chat terminal failed")?;
    info!("chat closed");
    Ok(())
}

pub fn cmd_repl(store: Box<dyn LocalStore>) -> Result<()> {
    let mut engine = DialogEngine::new(store);
    let stdin = io::stdin();
    run_repl(&mut engine, stdin.lock(), io::stdout().lock()).wrap_err("Line-mode chat failed")?;
    info!("repl closed");
    Ok(())
}

/// Drive a session from `input` until EOF or `/quit`.
///
/// A line matching a button label (ignoring case) presses that button.
pub fn run_repl<R: BufRead, W: Write>(
    engine: &mut DialogEngine,
    input: R,
    mut out: W,
) -> io::Result<()> {
    let mut shown = 0;
    print_new_messages(engine, &mut shown, &mut out)?;

    for line in input.lines() {
        let line = line?;
        let text = line.trim();
        if text == QUIT_COMMAND {
            break;
        }
        let pressed = engine
            .buttons()
            .iter()
            .find(|b| b.label.eq_ignore_ascii_case(text))
            .map(|b| b.value.clone());
        engine.submit(pressed.as_deref().unwrap_or(text));
        print_new_messages(engine, &mut shown, &mut out)?;
    }
    writeln!(out)?;
    Ok(())
}

fn print_new_messages<W: Write>(
    engine: &DialogEngine,
    shown: &mut usize,
    out: &mut W,
) -> io::Result<()> {
    let messages = engine.messages();
    for message in &messages[*shown..] {
        if message.role == Role::Assistant {
            writeln!(out, "{}\n", message.content)?;
        }
    }
    *shown = messages.len();

    if !engine.buttons().is_empty() {
        let hints: Vec<String> = engine
            .buttons()
            .iter()
            .map(|b| format!("[{}]", b.label))
            .collect();
        writeln!(out, "{}", hints.join(" "))?;
    }
    write!(out, "> ")?;
    out.flush()
}

pub fn cmd_list(store: &dyn LocalStore, priority: Option<Priority>) -> Result<()> {
    let tasks = TaskStore::load(store);
    let rows: Vec<(usize, _)> = tasks
        .tasks()
        .iter()
        .enumerate()
        .map(|(i, t)| (i + 1, t))
        .filter(|(_, t)| priority.map_or(true, |p| t.priority == p))
        .collect();

    if rows.is_empty() {
        println!("No tasks found.");
        return Ok(());
    }
    print_table(&rows);
    Ok(())
}

pub fn cmd_completions(shell: Shell) -> Result<()> {
    use crate::cli::Cli;
    use clap::CommandFactory;

    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut io::stdout());
    Ok(())
}
