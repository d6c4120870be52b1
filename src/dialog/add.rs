//! The add-a-task dialog.

use crate::dialog::flow::{Effect, Outcome, ANYTHING_ELSE};
use crate::dialog::parse::{is_no, is_yes};
use crate::fields::Priority;
use crate::message::{priority_buttons, yes_no_buttons};
use crate::store::format_task_details;
use crate::task::TaskDraft;

/// Where the add dialog is waiting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AddStep {
    #[default]
    Start,
    Title,
    Due,
    Priority,
    WantsReminder,
    Reminder,
    Confirm,
}

/// In-progress add dialog: the step plus the task assembled so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddFlow {
    pub step: AddStep,
    pub draft: TaskDraft,
}

impl AddFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step_number(&self) -> u8 {
        match self.step {
            AddStep::Start => 0,
            AddStep::Title => 1,
            AddStep::Due => 2,
            AddStep::Priority => 3,
            AddStep::WantsReminder => 4,
            AddStep::Reminder => 5,
            AddStep::Confirm => 6,
        }
    }

    fn at(mut self, step: AddStep) -> Self {
        self.step = step;
        self
    }

    pub fn advance(mut self, input: &str) -> Outcome<AddFlow> {
        let text = input.trim();
        match self.step {
            AddStep::Start => Outcome::ask(
                self.at(AddStep::Title),
                "Great! What's the title of your task?",
                Vec::new(),
            ),
            AddStep::Title => {
                self.draft.title = Some(text.to_string());
                Outcome::ask(
                    self.at(AddStep::Due),
                    "When is it due? (e.g. \"tomorrow 9am\" or \"Friday\")",
                    Vec::new(),
                )
            }
            AddStep::Due => {
                self.draft.due = Some(text.to_string());
                Outcome::ask(
                    self.at(AddStep::Priority),
                    "What priority should it have? High, Medium, or Low?",
                    priority_buttons(),
                )
            }
            AddStep::Priority => match Priority::parse(text) {
                Some(priority) => {
                    self.draft.priority = priority;
                    Outcome::ask(
                        self.at(AddStep::WantsReminder),
                        "Would you like to set a reminder?",
                        yes_no_buttons(),
                    )
                }
                None => Outcome::ask(
                    self,
                    "Please choose a priority: High, Medium, or Low.",
                    priority_buttons(),
                ),
            },
            AddStep::WantsReminder => {
                if is_yes(text) {
                    Outcome::ask(
                        self.at(AddStep::Reminder),
                        "What should the reminder say, and when?",
                        Vec::new(),
                    )
                } else if is_no(text) {
                    self.draft.reminder = None;
                    self.confirm()
                } else {
                    Outcome::ask(
                        self,
                        "Please answer yes or no: would you like to set a reminder?",
                        yes_no_buttons(),
                    )
                }
            }
            AddStep::Reminder => {
                self.draft.reminder = Some(text.to_string());
                self.confirm()
            }
            AddStep::Confirm => {
                if is_yes(text) {
                    let task = self.draft.materialize();
                    let summary = format!("Task saved!\n\n{}", format_task_details(&task));
                    Outcome::apply(Effect::Insert(task), vec![summary, ANYTHING_ELSE.to_string()])
                } else {
                    Outcome::done("Okay, I've discarded that task. What would you like to do next?")
                }
            }
        }
    }

    fn confirm(self) -> Outcome<AddFlow> {
        let summary = format!(
            "Here's your task:\n\n{}\n\nShall I save it?",
            format_task_details(&self.draft.preview())
        );
        Outcome::ask(self.at(AddStep::Confirm), summary, yes_no_buttons())
    }
}
