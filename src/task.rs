//! Task data structure and related functionality.
//!
//! This module defines the core `Task` record together with the two partial
//! shapes the dialog builds up before touching the store: `TaskDraft` for the
//! add dialog and `TaskDelta` for the update dialog.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::fields::Priority;

/// Title used when a task is saved with a blank title.
pub const DEFAULT_TITLE: &str = "Untitled task";
/// Due text used when a task is saved with a blank due date.
pub const DEFAULT_DUE: &str = "No due date";

/// A single entry in the user's task list.
///
/// `due` and `reminder` are kept as the user typed them; nothing parses them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub due: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub reminder: Option<String>,
}

impl Task {
    /// Reminder text for display, `None` when unset.
    pub fn reminder_label(&self) -> &str {
        self.reminder.as_deref().unwrap_or("None")
    }
}

/// Generate a fresh opaque task identifier.
pub fn new_task_id() -> String {
    Uuid::now_v7().to_string()
}

/// Partially built task collected by the add dialog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: Option<String>,
    pub due: Option<String>,
    pub priority: Priority,
    pub reminder: Option<String>,
}

impl TaskDraft {
    /// Turn the draft into a storable task, filling blank title and due.
    pub fn materialize(self) -> Task {
        Task {
            id: new_task_id(),
            title: non_blank_or(self.title, DEFAULT_TITLE),
            due: non_blank_or(self.due, DEFAULT_DUE),
            priority: self.priority,
            reminder: self.reminder,
        }
    }

    /// Read-only view of the task this draft would produce, without an id.
    pub fn preview(&self) -> Task {
        Task {
            id: String::new(),
            title: non_blank_or(self.title.clone(), DEFAULT_TITLE),
            due: non_blank_or(self.due.clone(), DEFAULT_DUE),
            priority: self.priority,
            reminder: self.reminder.clone(),
        }
    }
}

fn non_blank_or(value: Option<String>, fallback: &str) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => fallback.to_string(),
    }
}

/// Pending field changes for one task.
///
/// `reminder` is doubly optional: `None` leaves the reminder untouched,
/// `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDelta {
    pub title: Option<String>,
    pub due: Option<String>,
    pub priority: Option<Priority>,
    pub reminder: Option<Option<String>>,
}

impl TaskDelta {
    /// Return a copy of `task` with this delta applied.
    pub fn applied_to(&self, task: &Task) -> Task {
        let mut merged = task.clone();
        self.merge_into(&mut merged);
        merged
    }

    /// Apply the delta in place. The id is never touched.
    pub fn merge_into(&self, task: &mut Task) {
        if let Some(title) = &self.title {
            task.title = title.clone();
        }
        if let Some(due) = &self.due {
            task.due = due.clone();
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(reminder) = &self.reminder {
            task.reminder = reminder.clone();
        }
    }
}
