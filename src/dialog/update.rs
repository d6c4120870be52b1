//! The update-a-task dialog.
//!
//! The user picks a task by number, then one field, then its new value. The
//! change is kept as a `TaskDelta` and only previewed until the user agrees
//! to save it.

use crate::dialog::flow::{Effect, Outcome, ANYTHING_ELSE};
use crate::dialog::parse::{is_yes, parse_index};
use crate::fields::{Priority, TaskField};
use crate::message::{field_buttons, priority_buttons, reminder_action_buttons, yes_no_buttons};
use crate::store::{format_numbered_list, format_task_details, TaskStore};
use crate::task::{Task, TaskDelta};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum UpdateFlow {
    #[default]
    Start,
    SelectTask,
    ChooseField {
        task_id: String,
    },
    EnterValue {
        task_id: String,
        field: TaskField,
    },
    /// Only reached from the reminder field after answering "update".
    EnterReminder {
        task_id: String,
    },
    Confirm {
        task_id: String,
        delta: TaskDelta,
    },
}

impl UpdateFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step_number(&self) -> u8 {
        match self {
            UpdateFlow::Start => 0,
            UpdateFlow::SelectTask => 1,
            UpdateFlow::ChooseField { .. } => 2,
            UpdateFlow::EnterValue { .. } => 3,
            UpdateFlow::EnterReminder { .. } => 4,
            UpdateFlow::Confirm { .. } => 5,
        }
    }

    /// Id of the task picked at the selection step, if any.
    pub fn selected(&self) -> Option<&str> {
        match self {
            UpdateFlow::Start | UpdateFlow::SelectTask => None,
            UpdateFlow::ChooseField { task_id }
            | UpdateFlow::EnterValue { task_id, .. }
            | UpdateFlow::EnterReminder { task_id }
            | UpdateFlow::Confirm { task_id, .. } => Some(task_id),
        }
    }

    pub fn advance(self, input: &str, tasks: &TaskStore) -> Outcome<UpdateFlow> {
        let text = input.trim();

        let selected = match self.selected() {
            Some(id) => match tasks.get(id) {
                Some(task) => Some(task),
                None => return Outcome::lost_selection(),
            },
            None => None,
        };

        match (self, selected) {
            (UpdateFlow::Start, _) => {
                if tasks.is_empty() {
                    return Outcome::done("You don't have any tasks to update yet.");
                }
                Outcome::ask(
                    UpdateFlow::SelectTask,
                    format!(
                        "Which task would you like to update? Reply with its number:\n\n{}",
                        format_numbered_list(tasks.tasks())
                    ),
                    Vec::new(),
                )
            }
            (UpdateFlow::SelectTask, _) => match parse_index(text).and_then(|n| tasks.nth(n)) {
                Some(task) => Outcome::ask(
                    UpdateFlow::ChooseField {
                        task_id: task.id.clone(),
                    },
                    format!("What would you like to change about \"{}\"?", task.title),
                    field_buttons(),
                ),
                None => Outcome::ask(
                    UpdateFlow::SelectTask,
                    invalid_index_reply(tasks.len()),
                    Vec::new(),
                ),
            },
            (UpdateFlow::ChooseField { task_id }, Some(task)) => match TaskField::parse(text) {
                Some(field) => {
                    let (reply, buttons) = match field {
                        TaskField::Priority => (
                            format!(
                                "The priority is currently {}. What should it be?",
                                task.priority
                            ),
                            priority_buttons(),
                        ),
                        TaskField::Reminder => (
                            format!(
                                "The reminder is currently: {}. Would you like to update or remove it?",
                                task.reminder_label()
                            ),
                            reminder_action_buttons(),
                        ),
                        TaskField::Title => (
                            format!(
                                "The title is currently \"{}\". What should the new title be?",
                                task.title
                            ),
                            Vec::new(),
                        ),
                        TaskField::Due => (
                            format!("It's currently due: {}. When should it be due?", task.due),
                            Vec::new(),
                        ),
                    };
                    Outcome::ask(UpdateFlow::EnterValue { task_id, field }, reply, buttons)
                }
                None => Outcome::ask(
                    UpdateFlow::ChooseField { task_id },
                    "Please choose which field to update: title, due, priority, or reminder.",
                    field_buttons(),
                ),
            },
            (UpdateFlow::EnterValue { task_id, field }, Some(task)) => {
                let delta = match field {
                    TaskField::Title => TaskDelta {
                        title: Some(text.to_string()),
                        ..TaskDelta::default()
                    },
                    TaskField::Due => TaskDelta {
                        due: Some(text.to_string()),
                        ..TaskDelta::default()
                    },
                    TaskField::Priority => match Priority::parse(text) {
                        Some(priority) => TaskDelta {
                            priority: Some(priority),
                            ..TaskDelta::default()
                        },
                        None => {
                            return Outcome::ask(
                                UpdateFlow::EnterValue { task_id, field },
                                "Please choose a priority: High, Medium, or Low.",
                                priority_buttons(),
                            )
                        }
                    },
                    TaskField::Reminder => {
                        if text.eq_ignore_ascii_case("update") {
                            return Outcome::ask(
                                UpdateFlow::EnterReminder { task_id },
                                "What should the new reminder be?",
                                Vec::new(),
                            );
                        }
                        let reminder = if text.eq_ignore_ascii_case("remove") {
                            None
                        } else {
                            Some(text.to_string())
                        };
                        TaskDelta {
                            reminder: Some(reminder),
                            ..TaskDelta::default()
                        }
                    }
                };
                preview(task_id, task, delta)
            }
            (UpdateFlow::EnterReminder { task_id }, Some(task)) => {
                let delta = TaskDelta {
                    reminder: Some(Some(text.to_string())),
                    ..TaskDelta::default()
                };
                preview(task_id, task, delta)
            }
            (UpdateFlow::Confirm { delta, .. }, Some(task)) => {
                if is_yes(text) {
                    let updated = delta.applied_to(task);
                    let reply = format!("Task updated!\n\n{}", format_task_details(&updated));
                    Outcome::apply(Effect::Replace(updated), vec![reply, ANYTHING_ELSE.to_string()])
                } else {
                    Outcome::done(
                        "Okay, I've left the task unchanged. What would you like to do next?",
                    )
                }
            }
            // Every selecting state was resolved above.
            (_, None) => Outcome::lost_selection(),
        }
    }
}

fn preview(task_id: String, task: &Task, delta: TaskDelta) -> Outcome<UpdateFlow> {
    let reply = format!(
        "Here's how the task will look:\n\n{}\n\nSave these changes?",
        format_task_details(&delta.applied_to(task))
    );
    Outcome::ask(UpdateFlow::Confirm { task_id, delta }, reply, yes_no_buttons())
}

/// Re-prompt used by both the update and delete dialogs.
pub fn invalid_index_reply(count: usize) -> String {
    if count == 1 {
        "Please reply with the task number, like #1.".to_string()
    } else {
        format!("Please reply with a task number between 1 and {count}, like #1.")
    }
}
