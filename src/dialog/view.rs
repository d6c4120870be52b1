//! The single-turn view dialog.

use crate::store::{format_task_blocks, TaskStore};

/// Reply shown for "view"; the dialog never waits for another answer.
pub fn render(tasks: &TaskStore) -> String {
    if tasks.is_empty() {
        return "You don't have any tasks yet. Would you like to add one?".to_string();
    }
    let noun = if tasks.len() == 1 { "task" } else { "tasks" };
    format!(
        "Here are your {} {}:\n\n{}",
        tasks.len(),
        noun,
        format_task_blocks(tasks.tasks())
    )
}
