//! Enumerations and field types for chat-managed tasks.
//!
//! This module defines the small set of structured values the assistant
//! understands: the three priority levels and the four task fields that can
//! be edited through the update dialog.

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Priority classification for task importance.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, ValueEnum, PartialEq, Eq)]
pub enum Priority {
    #[serde(alias = "high")]
    High,
    #[default]
    #[serde(alias = "medium")]
    Medium,
    #[serde(alias = "low")]
    Low,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    /// Display label, also the value submitted by the priority buttons.
    pub fn label(self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }

    /// Case-insensitive match of a whole answer against the three levels.
    pub fn parse(s: &str) -> Option<Priority> {
        let s = s.trim();
        Priority::ALL
            .into_iter()
            .find(|p| p.label().eq_ignore_ascii_case(s))
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// Task fields that the update dialog can change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskField {
    Title,
    Due,
    Priority,
    Reminder,
}

impl TaskField {
    pub const ALL: [TaskField; 4] = [
        TaskField::Title,
        TaskField::Due,
        TaskField::Priority,
        TaskField::Reminder,
    ];

    /// The key a user types (or a field button submits) to pick this field.
    pub fn key(self) -> &'static str {
        match self {
            TaskField::Title => "title",
            TaskField::Due => "due",
            TaskField::Priority => "priority",
            TaskField::Reminder => "reminder",
        }
    }

    /// Human label for prompts and buttons.
    pub fn label(self) -> &'static str {
        match self {
            TaskField::Title => "Title",
            TaskField::Due => "Due Date",
            TaskField::Priority => "Priority",
            TaskField::Reminder => "Reminder",
        }
    }

    pub fn parse(s: &str) -> Option<TaskField> {
        let s = s.trim();
        TaskField::ALL
            .into_iter()
            .find(|f| f.key().eq_ignore_ascii_case(s))
    }
}
