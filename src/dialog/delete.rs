//! The delete-a-task dialog.

use crate::dialog::flow::{Effect, Outcome, ANYTHING_ELSE};
use crate::dialog::parse::{is_yes, parse_index};
use crate::dialog::update::invalid_index_reply;
use crate::message::yes_no_buttons;
use crate::store::{format_numbered_list, TaskStore};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DeleteFlow {
    #[default]
    Start,
    SelectTask,
    Confirm {
        task_id: String,
    },
}

impl DeleteFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step_number(&self) -> u8 {
        match self {
            DeleteFlow::Start => 0,
            DeleteFlow::SelectTask => 1,
            DeleteFlow::Confirm { .. } => 2,
        }
    }

    pub fn advance(self, input: &str, tasks: &TaskStore) -> Outcome<DeleteFlow> {
        let text = input.trim();
        match self {
            DeleteFlow::Start => {
                if tasks.is_empty() {
                    return Outcome::done("You don't have any tasks to delete.");
                }
                Outcome::ask(
                    DeleteFlow::SelectTask,
                    format!(
                        "Which task would you like to delete? Reply with its number:\n\n{}",
                        format_numbered_list(tasks.tasks())
                    ),
                    Vec::new(),
                )
            }
            DeleteFlow::SelectTask => match parse_index(text).and_then(|n| tasks.nth(n)) {
                Some(task) => Outcome::ask(
                    DeleteFlow::Confirm {
                        task_id: task.id.clone(),
                    },
                    format!("Are you sure you want to delete \"{}\"?", task.title),
                    yes_no_buttons(),
                ),
                None => Outcome::ask(
                    DeleteFlow::SelectTask,
                    invalid_index_reply(tasks.len()),
                    Vec::new(),
                ),
            },
            DeleteFlow::Confirm { task_id } => {
                let Some(task) = tasks.get(&task_id) else {
                    return Outcome::lost_selection();
                };
                if is_yes(text) {
                    let reply = format!("\"{}\" has been deleted.", task.title);
                    Outcome::apply(Effect::Remove(task_id), vec![reply, ANYTHING_ELSE.to_string()])
                } else {
                    Outcome::done(format!(
                        "Okay, \"{}\" was not deleted. What would you like to do next?",
                        task.title
                    ))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::Priority;
    use crate::task::Task;

    fn one_task() -> TaskStore {
        TaskStore::from_tasks(vec![Task {
            id: "only".into(),
            title: "Water plants".into(),
            due: "today".into(),
            priority: Priority::Medium,
            reminder: None,
        }])
    }

    fn next(flow: DeleteFlow, input: &str, tasks: &TaskStore) -> (DeleteFlow, String) {
        match flow.advance(input, tasks) {
            Outcome::Continue { flow, reply, .. } => (flow, reply),
            Outcome::Finish { replies, .. } => panic!("dialog finished early: {replies:?}"),
        }
    }

    #[test]
    fn test_empty_store_finishes() {
        assert!(matches!(
            DeleteFlow::new().advance("", &TaskStore::default()),
            Outcome::Finish { effect: None, .. }
        ));
    }

    #[test]
    fn test_confirm_names_the_task() {
        let tasks = one_task();
        let (flow, listing) = next(DeleteFlow::new(), "", &tasks);
        assert!(listing.contains("#1 Water plants"));
        let (flow, reply) = next(flow, "#1", &tasks);
        assert_eq!(flow, DeleteFlow::Confirm { task_id: "only".into() });
        assert!(reply.contains("\"Water plants\""));
    }

    #[test]
    fn test_bad_index_reprompts() {
        let tasks = one_task();
        let (flow, _) = next(DeleteFlow::new(), "", &tasks);
        let (flow, reply) = next(flow, "#2", &tasks);
        assert_eq!(flow, DeleteFlow::SelectTask);
        assert!(reply.contains("#1"));
    }

    #[test]
    fn test_yes_removes() {
        let tasks = one_task();
        let flow = DeleteFlow::Confirm { task_id: "only".into() };
        assert!(matches!(
            flow.advance("Yes please", &tasks),
            Outcome::Finish { effect: Some(Effect::Remove(ref id)), .. } if id == "only"
        ));
    }

    #[test]
    fn test_other_answers_keep_task() {
        let tasks = one_task();
        for answer in ["no", "wait"] {
            let flow = DeleteFlow::Confirm { task_id: "only".into() };
            assert!(matches!(
                flow.advance(answer, &tasks),
                Outcome::Finish { effect: None, .. }
            ));
        }
    }

    #[test]
    fn test_vanished_task_aborts() {
        let flow = DeleteFlow::Confirm { task_id: "gone".into() };
        match flow.advance("yes", &one_task()) {
            Outcome::Finish { effect, replies } => {
                assert!(effect.is_none());
                assert_eq!(replies[0], crate::dialog::flow::LOST_SELECTION);
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
