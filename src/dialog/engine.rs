//! The chat session: routes each answer to the active dialog and applies the
//! result.
//!
//! `DialogEngine` owns everything a session knows: the active `Flow`, the
//! quick-action buttons, the conversation log and the task list together
//! with the `LocalStore` it is persisted through. Front-ends only read
//! `messages()`, `buttons()` and `tasks()` and call `submit()`.

use log::{debug, error, info};

use crate::dialog::add::AddFlow;
use crate::dialog::delete::DeleteFlow;
use crate::dialog::flow::{Effect, Flow, Intent, Outcome};
use crate::dialog::parse::detect_intent;
use crate::dialog::update::UpdateFlow;
use crate::dialog::view;
use crate::message::{top_level_buttons, Button, ConversationLog, Message};
use crate::store::{LocalStore, TaskStore};
use crate::task::Task;

pub const GREETING: &str =
    "Hi! I'm your task assistant. I can help you add, update, delete, or view your tasks.\nWhat would you like to do?";

pub const NOT_UNDERSTOOD: &str =
    "Sorry, I didn't catch that. You can ask me to add, update, delete, or view tasks.";

pub struct DialogEngine {
    flow: Flow,
    buttons: Vec<Button>,
    log: ConversationLog,
    tasks: TaskStore,
    store: Box<dyn LocalStore>,
}

impl DialogEngine {
    /// Start a session, rehydrating tasks from `store` and greeting the user.
    pub fn new(store: Box<dyn LocalStore>) -> Self {
        let tasks = TaskStore::load(store.as_ref());
        info!("session started with {} tasks", tasks.len());
        let mut engine = Self {
            flow: Flow::Idle,
            buttons: top_level_buttons(),
            log: ConversationLog::default(),
            tasks,
            store,
        };
        engine.log.push_assistant(GREETING);
        engine
    }

    pub fn messages(&self) -> &[Message] {
        self.log.messages()
    }

    pub fn buttons(&self) -> &[Button] {
        &self.buttons
    }

    pub fn tasks(&self) -> &[Task] {
        self.tasks.tasks()
    }

    pub fn intent(&self) -> Intent {
        self.flow.intent()
    }

    pub fn step(&self) -> u8 {
        self.flow.step()
    }

    /// Handle one user submission, typed or tapped. Blank input is ignored.
    pub fn submit(&mut self, input: &str) {
        let text = input.trim();
        if text.is_empty() {
            return;
        }
        self.log.push_user(text);

        let flow = std::mem::take(&mut self.flow);
        debug!(
            "turn: intent={} step={} input={:?}",
            flow.intent(),
            flow.step(),
            text
        );

        let outcome = match flow {
            Flow::Idle => match detect_intent(text) {
                Some(intent) => self.start(intent),
                None => {
                    self.log.push_assistant(NOT_UNDERSTOOD);
                    self.reset();
                    return;
                }
            },
            Flow::Add(f) => f.advance(text).map(Flow::Add),
            Flow::Update(f) => f.advance(text, &self.tasks).map(Flow::Update),
            Flow::Delete(f) => f.advance(text, &self.tasks).map(Flow::Delete),
        };
        self.apply(outcome);
    }

    /// Enter a dialog and run its first step straight away.
    fn start(&mut self, intent: Intent) -> Outcome<Flow> {
        info!("starting dialog: {intent}");
        self.buttons.clear();
        match intent {
            Intent::Add => AddFlow::new().advance("").map(Flow::Add),
            Intent::Update => UpdateFlow::new().advance("", &self.tasks).map(Flow::Update),
            Intent::Delete => DeleteFlow::new().advance("", &self.tasks).map(Flow::Delete),
            Intent::View => Outcome::done(view::render(&self.tasks)),
            Intent::Idle => Outcome::Finish {
                replies: Vec::new(),
                effect: None,
            },
        }
    }

    fn apply(&mut self, outcome: Outcome<Flow>) {
        match outcome {
            Outcome::Continue {
                flow,
                reply,
                buttons,
            } => {
                self.log.push_assistant(reply);
                self.buttons = buttons;
                self.flow = flow;
            }
            Outcome::Finish { replies, effect } => {
                if let Some(effect) = effect {
                    self.commit(effect);
                }
                for reply in replies {
                    self.log.push_assistant(reply);
                }
                self.reset();
            }
        }
    }

    /// Apply a finished dialog's change and persist the whole list.
    fn commit(&mut self, effect: Effect) {
        let applied = match effect {
            Effect::Insert(task) => {
                info!("adding task {}", task.id);
                self.tasks.push(task);
                true
            }
            Effect::Replace(task) => {
                info!("updating task {}", task.id);
                self.tasks.replace(task)
            }
            Effect::Remove(id) => {
                info!("deleting task {id}");
                self.tasks.remove(&id).is_some()
            }
        };
        if !applied {
            return;
        }
        if let Err(e) = self.tasks.save(self.store.as_mut()) {
            error!("failed to save tasks: {e}");
            self.log
                .push_assistant(format!("(I couldn't save your tasks to disk: {e})"));
        }
    }

    /// Back to idle with the top-level actions on offer.
    fn reset(&mut self) {
        self.flow = Flow::Idle;
        self.buttons = top_level_buttons();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::Priority;
    use crate::message::Role;
    use crate::store::{MemoryStore, StoreError, TASKS_KEY};
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Memory store whose contents stay inspectable after the engine owns it.
    #[derive(Clone, Default)]
    struct SharedStore(Rc<RefCell<MemoryStore>>);

    impl LocalStore for SharedStore {
        fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
            self.0.borrow().read(key)
        }

        fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
            self.0.borrow_mut().write(key, value)
        }
    }

    struct BrokenStore;

    impl LocalStore for BrokenStore {
        fn read(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Ok(None)
        }

        fn write(&mut self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Io {
                path: "tasks.json".into(),
                source: std::io::Error::other("disk full"),
            })
        }
    }

    fn engine() -> (DialogEngine, SharedStore) {
        let shared = SharedStore::default();
        (DialogEngine::new(Box::new(shared.clone())), shared)
    }

    fn say(engine: &mut DialogEngine, inputs: &[&str]) {
        for input in inputs {
            engine.submit(input);
        }
    }

    fn last_reply(engine: &DialogEngine) -> &str {
        let last = engine.messages().last().unwrap();
        assert_eq!(last.role, Role::Assistant);
        &last.content
    }

    fn seeded(priority: Priority) -> (DialogEngine, SharedStore) {
        let shared = SharedStore::default();
        let tasks = TaskStore::from_tasks(vec![Task {
            id: "seed".into(),
            title: "Water plants".into(),
            due: "today".into(),
            priority,
            reminder: Some("morning".into()),
        }]);
        tasks.save(&mut shared.clone()).unwrap();
        (DialogEngine::new(Box::new(shared.clone())), shared)
    }

    fn persisted(shared: &SharedStore) -> TaskStore {
        TaskStore::load(shared)
    }

    #[test]
    fn test_new_session_greets_with_top_level_buttons() {
        let (engine, _) = engine();
        assert_eq!(engine.messages().len(), 1);
        assert_eq!(engine.messages()[0].content, GREETING);
        assert_eq!(engine.buttons(), top_level_buttons().as_slice());
        assert_eq!(engine.intent(), Intent::Idle);
    }

    #[test]
    fn test_blank_input_is_ignored() {
        let (mut engine, _) = engine();
        engine.submit("   ");
        assert_eq!(engine.messages().len(), 1);
    }

    #[test]
    fn test_unrecognised_request_clarifies() {
        let (mut engine, _) = engine();
        engine.submit("what's the weather");
        assert_eq!(engine.messages().len(), 3);
        assert_eq!(last_reply(&engine), NOT_UNDERSTOOD);
        assert_eq!(engine.buttons(), top_level_buttons().as_slice());
        assert_eq!(engine.intent(), Intent::Idle);
    }

    #[test]
    fn test_add_scenario_saves_one_task() {
        let (mut engine, shared) = engine();
        say(
            &mut engine,
            &["add a task", "Buy milk", "tomorrow 9am", "High", "no", "yes"],
        );

        assert_eq!(engine.tasks().len(), 1);
        let task = &engine.tasks()[0];
        assert_eq!(task.title, "Buy milk");
        assert_eq!(task.due, "tomorrow 9am");
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.reminder, None);

        assert_eq!(engine.intent(), Intent::Idle);
        assert_eq!(engine.buttons(), top_level_buttons().as_slice());
        assert_eq!(persisted(&shared).tasks(), engine.tasks());
    }

    #[test]
    fn test_starting_a_dialog_runs_first_step_immediately() {
        let (mut engine, _) = engine();
        engine.submit("add");
        assert_eq!(engine.intent(), Intent::Add);
        assert_eq!(engine.step(), 1);
        assert!(engine.buttons().is_empty());
        assert!(last_reply(&engine).contains("title"));
    }

    #[test]
    fn test_view_on_empty_store_is_one_message() {
        let (mut engine, _) = engine();
        engine.submit("view tasks");
        let msgs = engine.messages();
        assert_eq!(msgs.len(), 3);
        assert_eq!(msgs[1].role, Role::User);
        assert!(msgs[2].content.contains("add one"));
        assert_eq!(engine.intent(), Intent::Idle);
    }

    #[test]
    fn test_view_lists_tasks() {
        let (mut engine, _) = seeded(Priority::Low);
        engine.submit("Show my list");
        assert!(last_reply(&engine).contains("• Water plants"));
        assert!(last_reply(&engine).contains("Reminder: morning"));
    }

    #[test]
    fn test_delete_scenario_empties_store() {
        let (mut engine, shared) = seeded(Priority::Low);
        say(&mut engine, &["delete", "#1", "yes"]);
        assert!(engine.tasks().is_empty());
        assert!(persisted(&shared).is_empty());
        let confirmation = &engine.messages()[engine.messages().len() - 2].content;
        assert!(confirmation.contains("has been deleted"));
        assert_eq!(engine.intent(), Intent::Idle);
    }

    #[test]
    fn test_update_scenario_changes_priority_only() {
        let (mut engine, shared) = seeded(Priority::Low);
        say(&mut engine, &["update", "#1", "priority", "Medium", "yes"]);
        let task = &engine.tasks()[0];
        assert_eq!(task.id, "seed");
        assert_eq!(task.priority, Priority::Medium);
        assert_eq!(task.title, "Water plants");
        assert_eq!(task.due, "today");
        assert_eq!(task.reminder.as_deref(), Some("morning"));
        assert_eq!(persisted(&shared).tasks(), engine.tasks());
    }

    #[test]
    fn test_update_rejects_unknown_field() {
        let (mut engine, _) = seeded(Priority::Low);
        say(&mut engine, &["update", "#1"]);
        assert_eq!(engine.step(), 2);
        engine.submit("color");
        assert_eq!(engine.intent(), Intent::Update);
        assert_eq!(engine.step(), 2);
        assert!(last_reply(&engine).contains("title, due, priority, or reminder"));
        let values: Vec<&str> = engine.buttons().iter().map(|b| b.value.as_str()).collect();
        assert_eq!(values, vec!["title", "due", "priority", "reminder"]);
    }

    #[test]
    fn test_no_at_final_step_leaves_store_unchanged() {
        let (mut engine, shared) = seeded(Priority::Low);
        let before = persisted(&shared);

        say(&mut engine, &["add", "x", "y", "low", "n", "no"]);
        say(&mut engine, &["update", "1", "title", "z", "no"]);
        say(&mut engine, &["remove", "1", "no"]);

        assert_eq!(engine.intent(), Intent::Idle);
        assert_eq!(TaskStore::from_tasks(engine.tasks().to_vec()), before);
        assert_eq!(persisted(&shared), before);
    }

    #[test]
    fn test_invalid_index_keeps_step() {
        let (mut engine, _) = seeded(Priority::Low);
        say(&mut engine, &["delete"]);
        for bad in ["#0", "2", "the first one"] {
            engine.submit(bad);
            assert_eq!(engine.intent(), Intent::Delete);
            assert_eq!(engine.step(), 1);
        }
        engine.submit("1");
        assert_eq!(engine.step(), 2);
    }

    #[test]
    fn test_keywords_mid_dialog_are_answers_not_commands() {
        let (mut engine, _) = engine();
        say(&mut engine, &["add", "delete old files"]);
        assert_eq!(engine.intent(), Intent::Add);
        assert_eq!(engine.step(), 2);
    }

    #[test]
    fn test_reload_sees_saved_tasks() {
        let (mut engine, shared) = engine();
        say(&mut engine, &["add", "Read book", "tonight", "low", "y", "9pm", "y"]);
        drop(engine);

        let reopened = DialogEngine::new(Box::new(shared));
        assert_eq!(reopened.tasks().len(), 1);
        assert_eq!(reopened.tasks()[0].reminder.as_deref(), Some("9pm"));
    }

    #[test]
    fn test_corrupt_store_starts_empty() {
        let shared = SharedStore::default();
        shared.0.borrow_mut().write(TASKS_KEY, "garbage").unwrap();
        let engine = DialogEngine::new(Box::new(shared));
        assert!(engine.tasks().is_empty());
    }

    #[test]
    fn test_failed_save_is_reported_but_kept_in_memory() {
        let mut engine = DialogEngine::new(Box::new(BrokenStore));
        say(&mut engine, &["add", "Buy milk", "soon", "high", "no", "yes"]);
        assert_eq!(engine.tasks().len(), 1);
        assert!(engine
            .messages()
            .iter()
            .any(|m| m.content.contains("couldn't save")));
        assert_eq!(engine.intent(), Intent::Idle);
    }
}
