//! Task storage and listing helpers.
//!
//! This module provides the `LocalStore` key-value abstraction the task list
//! is persisted through, a JSON-file implementation and an in-memory one, and
//! the `TaskStore` holding the ordered task sequence for a session. It also
//! carries the text formatting shared by the chat dialogs and the `list`
//! command.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::PathBuf;

use log::{debug, warn};
use thiserror::Error;

use crate::task::Task;

/// Name of the single slot the task list is stored under.
pub const TASKS_KEY: &str = "tasks";

/// Errors raised while reading or writing the local store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to encode tasks: {0}")]
    Json(#[from] serde_json::Error),
}

/// A named-slot blob store, the only durable state the assistant has.
pub trait LocalStore {
    /// Read the blob stored under `key`, `None` if the slot is empty.
    fn read(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Replace the blob stored under `key`.
    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// File backing a given key.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl LocalStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        fs::read_to_string(&path)
            .map(Some)
            .map_err(|source| StoreError::Io { path, source })
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key);
        // Atomic-ish write via temp + rename.
        let tmp = path.with_extension("json.tmp");
        let io_err = |source| StoreError::Io {
            path: tmp.clone(),
            source,
        };
        let mut f = File::create(&tmp).map_err(io_err)?;
        f.write_all(value.as_bytes()).map_err(io_err)?;
        f.flush().map_err(io_err)?;
        fs::rename(&tmp, &path).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;
        debug!("wrote {} bytes to {}", value.len(), path.display());
        Ok(())
    }
}

/// Volatile store backing `--ephemeral` sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slots: HashMap<String, String>,
}

impl LocalStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.slots.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.slots.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Ordered task list owned by one chat session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskStore {
    tasks: Vec<Task>,
}

impl TaskStore {
    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    /// Rehydrate the task list, starting fresh on a missing or corrupt slot.
    pub fn load(store: &dyn LocalStore) -> Self {
        let raw = match store.read(TASKS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return TaskStore::default(),
            Err(e) => {
                warn!("Error reading tasks, starting fresh: {e}");
                return TaskStore::default();
            }
        };
        match serde_json::from_str::<Vec<Task>>(&raw) {
            Ok(tasks) => {
                debug!("loaded {} tasks", tasks.len());
                TaskStore { tasks }
            }
            Err(e) => {
                warn!("Error parsing tasks, starting fresh: {e}");
                TaskStore::default()
            }
        }
    }

    /// Rewrite the whole list into the store.
    pub fn save(&self, store: &mut dyn LocalStore) -> Result<(), StoreError> {
        let data = serde_json::to_string_pretty(&self.tasks)?;
        store.write(TASKS_KEY, &data)
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Get a task by ID.
    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Get a task by its 1-based position in the listing.
    pub fn nth(&self, position: usize) -> Option<&Task> {
        position.checked_sub(1).and_then(|i| self.tasks.get(i))
    }

    pub fn push(&mut self, task: Task) {
        self.tasks.push(task);
    }

    /// Overwrite the task with the same id. Returns false if it is gone.
    pub fn replace(&mut self, task: Task) -> bool {
        match self.tasks.iter_mut().find(|t| t.id == task.id) {
            Some(slot) => {
                *slot = task;
                true
            }
            None => false,
        }
    }

    /// Remove a task by ID, returning it if present.
    pub fn remove(&mut self, id: &str) -> Option<Task> {
        let idx = self.tasks.iter().position(|t| t.id == id)?;
        Some(self.tasks.remove(idx))
    }
}

/// One numbered line per task, as offered when picking a task.
pub fn format_numbered_list(tasks: &[Task]) -> String {
    tasks
        .iter()
        .enumerate()
        .map(|(i, t)| {
            format!(
                "#{} {} — Due: {} — Priority: {}",
                i + 1,
                t.title,
                t.due,
                t.priority
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// All fields of one task, one per line.
pub fn format_task_details(task: &Task) -> String {
    format!(
        "Title: {}\nDue: {}\nPriority: {}\nReminder: {}",
        task.title,
        task.due,
        task.priority,
        task.reminder_label()
    )
}

/// Bulleted block per task, as shown by the view dialog.
pub fn format_task_blocks(tasks: &[Task]) -> String {
    tasks
        .iter()
        .map(|t| {
            format!(
                "• {}\n   Due: {}\n   Priority: {}\n   Reminder: {}",
                t.title,
                t.due,
                t.priority,
                t.reminder_label()
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Print tasks in a formatted table, keyed by their 1-based position.
pub fn print_table(rows: &[(usize, &Task)]) {
    println!(
        "{:<4} {:<8} {:<18} {:<18} {}",
        "#", "Pri", "Due", "Reminder", "Title"
    );
    for (position, t) in rows {
        println!(
            "{:<4} {:<8} {:<18} {:<18} {}",
            position,
            t.priority,
            truncate(&t.due, 18),
            truncate(t.reminder_label(), 18),
            t.title
        );
    }
}

/// Truncate a string to a maximum width, adding ellipsis if needed.
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out = String::new();
        for (i, ch) in s.chars().enumerate() {
            if i + 1 >= width {
                out.push('…');
                break;
            }
            out.push(ch);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::Priority;

    fn task(id: &str, title: &str) -> Task {
        Task {
            id: id.into(),
            title: title.into(),
            due: "friday".into(),
            priority: Priority::High,
            reminder: None,
        }
    }

    #[test]
    fn test_round_trip_preserves_order_and_fields() {
        let mut mem = MemoryStore::default();
        let mut store = TaskStore::default();
        store.push(task("a", "First"));
        store.push(Task {
            reminder: Some("ping me".into()),
            priority: Priority::Low,
            ..task("b", "Second")
        });
        store.save(&mut mem).unwrap();

        let reloaded = TaskStore::load(&mem);
        assert_eq!(reloaded, store);
        assert_eq!(reloaded.tasks()[0].title, "First");
        assert_eq!(reloaded.tasks()[1].reminder.as_deref(), Some("ping me"));
    }

    #[test]
    fn test_load_missing_slot_is_empty() {
        let mem = MemoryStore::default();
        assert!(TaskStore::load(&mem).is_empty());
    }

    #[test]
    fn test_load_corrupt_slot_is_empty() {
        let mut mem = MemoryStore::default();
        mem.write(TASKS_KEY, "{not json").unwrap();
        assert!(TaskStore::load(&mem).is_empty());

        mem.write(TASKS_KEY, r#"[{"id":"a","title":"x","due":"y","priority":"Urgent"}]"#)
            .unwrap();
        assert!(TaskStore::load(&mem).is_empty());
    }

    #[test]
    fn test_file_store_round_trip_and_no_temp_left() {
        let dir = tempfile::tempdir().unwrap();
        let mut fs_store = FileStore::new(dir.path());
        let store = TaskStore::from_tasks(vec![task("a", "Buy milk")]);
        store.save(&mut fs_store).unwrap();

        assert!(fs_store.path_for(TASKS_KEY).exists());
        assert!(!dir.path().join("tasks.json.tmp").exists());
        assert_eq!(TaskStore::load(&fs_store), store);
    }

    #[test]
    fn test_file_store_missing_file_reads_none() {
        let dir = tempfile::tempdir().unwrap();
        let fs_store = FileStore::new(dir.path());
        assert!(fs_store.read(TASKS_KEY).unwrap().is_none());
    }

    #[test]
    fn test_file_store_write_into_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut fs_store = FileStore::new(dir.path().join("nope"));
        let err = fs_store.write(TASKS_KEY, "[]").unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
    }

    #[test]
    fn test_nth_is_one_based() {
        let store = TaskStore::from_tasks(vec![task("a", "A"), task("b", "B")]);
        assert!(store.nth(0).is_none());
        assert_eq!(store.nth(1).map(|t| t.id.as_str()), Some("a"));
        assert_eq!(store.nth(2).map(|t| t.id.as_str()), Some("b"));
        assert!(store.nth(3).is_none());
    }

    #[test]
    fn test_replace_and_remove_by_id() {
        let mut store = TaskStore::from_tasks(vec![task("a", "A"), task("b", "B")]);
        assert!(store.replace(task("b", "Bee")));
        assert_eq!(store.get("b").unwrap().title, "Bee");
        assert!(!store.replace(task("zz", "Ghost")));
        assert_eq!(store.remove("a").map(|t| t.title), Some("A".to_string()));
        assert!(store.remove("a").is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_numbered_list_format() {
        let tasks = vec![task("a", "Buy milk"), task("b", "Walk dog")];
        assert_eq!(
            format_numbered_list(&tasks),
            "#1 Buy milk — Due: friday — Priority: High\n#2 Walk dog — Due: friday — Priority: High"
        );
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 5), "abcd…");
    }
}
