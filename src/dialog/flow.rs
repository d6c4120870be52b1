//! Shared types for the dialog state machines.
//!
//! Each dialog is its own state type and advances by value: it consumes the
//! user's answer and returns an `Outcome` describing either the next state or
//! the end of the dialog together with the change to apply to the task list.

use std::fmt;

use crate::dialog::{add::AddFlow, delete::DeleteFlow, update::UpdateFlow};
use crate::message::Button;
use crate::task::Task;

/// Top-level thing the user asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Idle,
    Add,
    Update,
    Delete,
    View,
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Intent::Idle => "Idle",
            Intent::Add => "Adding a task",
            Intent::Update => "Updating a task",
            Intent::Delete => "Deleting a task",
            Intent::View => "Viewing tasks",
        };
        f.write_str(label)
    }
}

/// The dialog currently in progress, if any.
///
/// Viewing finishes within the turn that starts it, so it never appears here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Flow {
    #[default]
    Idle,
    Add(AddFlow),
    Update(UpdateFlow),
    Delete(DeleteFlow),
}

impl Flow {
    pub fn intent(&self) -> Intent {
        match self {
            Flow::Idle => Intent::Idle,
            Flow::Add(_) => Intent::Add,
            Flow::Update(_) => Intent::Update,
            Flow::Delete(_) => Intent::Delete,
        }
    }

    /// Step counter of the active dialog, 0 when idle.
    pub fn step(&self) -> u8 {
        match self {
            Flow::Idle => 0,
            Flow::Add(f) => f.step_number(),
            Flow::Update(f) => f.step_number(),
            Flow::Delete(f) => f.step_number(),
        }
    }
}

/// Change to the task list requested by a finished dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Insert(Task),
    Replace(Task),
    Remove(String),
}

/// Result of feeding one answer to a dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<F> {
    /// Stay in the dialog at `flow`, say `reply` and offer `buttons`.
    Continue {
        flow: F,
        reply: String,
        buttons: Vec<Button>,
    },
    /// Leave the dialog after saying `replies` and applying `effect`.
    Finish {
        replies: Vec<String>,
        effect: Option<Effect>,
    },
}

impl<F> Outcome<F> {
    pub fn ask(flow: F, reply: impl Into<String>, buttons: Vec<Button>) -> Self {
        Outcome::Continue {
            flow,
            reply: reply.into(),
            buttons,
        }
    }

    pub fn done(reply: impl Into<String>) -> Self {
        Outcome::Finish {
            replies: vec![reply.into()],
            effect: None,
        }
    }

    pub fn apply(effect: Effect, replies: Vec<String>) -> Self {
        Outcome::Finish {
            replies,
            effect: Some(effect),
        }
    }

    /// The selected task disappeared between turns.
    pub fn lost_selection() -> Self {
        Outcome::done(LOST_SELECTION)
    }

    /// Wrap the continuing state into another type, typically `Flow`.
    pub fn map<G>(self, f: impl FnOnce(F) -> G) -> Outcome<G> {
        match self {
            Outcome::Continue {
                flow,
                reply,
                buttons,
            } => Outcome::Continue {
                flow: f(flow),
                reply,
                buttons,
            },
            Outcome::Finish { replies, effect } => Outcome::Finish { replies, effect },
        }
    }
}

pub const LOST_SELECTION: &str =
    "Sorry, I couldn't find that task anymore. Let's start over.";

pub const ANYTHING_ELSE: &str = "Is there anything else I can help you with?";
