//! Conversation log and quick-action buttons.
//!
//! The log is append-only for the lifetime of a session; nothing in the
//! assistant ever edits or drops a message.

use chrono::{DateTime, Local};

use crate::fields::{Priority, TaskField};

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Assistant,
    User,
}

impl Role {
    pub fn label(self) -> &'static str {
        match self {
            Role::Assistant => "Assistant",
            Role::User => "You",
        }
    }
}

/// One entry in the conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: u64,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Local>,
}

impl Message {
    /// Timestamp formatted for display next to the author.
    pub fn time_label(&self) -> String {
        format_timestamp(&self.timestamp)
    }
}

/// Format a message time as `HH:MM`.
pub fn format_timestamp(ts: &DateTime<Local>) -> String {
    ts.format("%H:%M").to_string()
}

/// Append-only, display-ordered list of messages.
#[derive(Debug, Clone, Default)]
pub struct ConversationLog {
    messages: Vec<Message>,
}

impl ConversationLog {
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Generate the next available message ID.
    fn next_id(&self) -> u64 {
        self.messages.last().map(|m| m.id + 1).unwrap_or(1)
    }

    pub fn push(&mut self, role: Role, content: impl Into<String>) -> &Message {
        let message = Message {
            id: self.next_id(),
            role,
            content: content.into(),
            timestamp: Local::now(),
        };
        self.messages.push(message);
        &self.messages[self.messages.len() - 1]
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) -> &Message {
        self.push(Role::Assistant, content)
    }

    pub fn push_user(&mut self, content: impl Into<String>) -> &Message {
        self.push(Role::User, content)
    }
}

/// A tappable shortcut; tapping submits `value` as if it were typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub value: String,
}

impl Button {
    pub fn new(label: &str, value: &str) -> Self {
        Self {
            label: label.to_string(),
            value: value.to_string(),
        }
    }
}

/// The four entry points offered whenever the assistant is idle.
pub fn top_level_buttons() -> Vec<Button> {
    vec![
        Button::new("Add Task", "add"),
        Button::new("Update Task", "update"),
        Button::new("Delete Task", "delete"),
        Button::new("View Tasks", "view"),
    ]
}

pub fn priority_buttons() -> Vec<Button> {
    Priority::ALL
        .into_iter()
        .map(|p| Button::new(p.label(), p.label()))
        .collect()
}

pub fn yes_no_buttons() -> Vec<Button> {
    vec![Button::new("Yes", "yes"), Button::new("No", "no")]
}

pub fn field_buttons() -> Vec<Button> {
    TaskField::ALL
        .into_iter()
        .map(|f| Button::new(f.label(), f.key()))
        .collect()
}

pub fn reminder_action_buttons() -> Vec<Button> {
    vec![
        Button::new("Update Reminder", "update"),
        Button::new("Remove Reminder", "remove"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_log_ids_increase_and_order_is_kept() {
        let mut log = ConversationLog::default();
        log.push_assistant("hello");
        log.push_user("add");
        log.push_assistant("line one\nline two");

        let ids: Vec<u64> = log.messages().iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(log.messages()[1].role, Role::User);
        assert_eq!(log.messages()[2].content, "line one\nline two");
    }

    #[test]
    fn test_format_timestamp() {
        let ts = Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 0).single().unwrap();
        assert_eq!(format_timestamp(&ts), "07:05");
    }

    #[test]
    fn test_button_sets_submit_expected_values() {
        let values: Vec<String> = top_level_buttons().into_iter().map(|b| b.value).collect();
        assert_eq!(values, vec!["add", "update", "delete", "view"]);

        let values: Vec<String> = field_buttons().into_iter().map(|b| b.value).collect();
        assert_eq!(values, vec!["title", "due", "priority", "reminder"]);

        let labels: Vec<String> = priority_buttons().into_iter().map(|b| b.label).collect();
        assert_eq!(labels, vec!["High", "Medium", "Low"]);
    }
}
