//! TaskStore - the authoritative task list for a session
//!
//! Transitions live on [`TaskList`]; the store applies them and then flushes
//! the whole list to its [`KeyValueStore`] under the active [`StorageKey`].
//! Storage failures are logged and swallowed: the in-memory list stays the
//! source of truth for the session.

use anyhow::Result;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::export::write_export;
use super::key::StorageKey;
use super::list::TaskList;
use super::model::{Task, TaskId, TaskStatus};
use super::view::{BoardStats, FilteredView};
use crate::storage::KeyValueStore;

/// Yes/no gate in front of destructive operations.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

/// A pre-made answer, e.g. `--yes` or a dialog that already asked.
impl Confirm for bool {
    fn confirm(&mut self, _prompt: &str) -> bool {
        *self
    }
}

pub const CLEAR_PROMPT: &str = "Delete every task on this board?";

pub struct TaskStore<S: KeyValueStore> {
    backend: S,
    key: StorageKey,
    tasks: TaskList,
}

impl<S: KeyValueStore> TaskStore<S> {
    /// Loads the list stored under `key`. Missing or unreadable data yields
    /// an empty board. Ids generated for legacy tasks are written back at once.
    pub fn open(backend: S, key: StorageKey) -> Self {
        let (tasks, generated) = load_list(&backend, &key);
        debug!("Opened board {} with {} tasks", key, tasks.len());
        let mut store = Self {
            backend,
            key,
            tasks,
        };
        if generated > 0 {
            debug!("Saving {} generated task ids on {}", generated, store.key);
            store.flush();
        }
        store
    }

    pub fn key(&self) -> &StorageKey {
        &self.key
    }

    pub fn tasks(&self) -> &[Task] {
        self.tasks.tasks()
    }

    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.get(id)
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut S {
        &mut self.backend
    }

    pub fn add(&mut self, text: &str) -> Option<Task> {
        let task = self.mutate(|list| list.add(text).cloned())?;
        debug!("Added task {}", task.id);
        Some(task)
    }

    pub fn move_to(&mut self, id: &TaskId, status: TaskStatus) -> bool {
        let moved = self.mutate(|list| list.move_to(id, status));
        if moved {
            debug!("Moved task {} to {}", id, status);
        }
        moved
    }

    pub fn advance(&mut self, id: &TaskId) -> Option<TaskStatus> {
        let status = self.mutate(|list| list.advance(id))?;
        debug!("Advanced task {} to {}", id, status);
        Some(status)
    }

    pub fn remove(&mut self, id: &TaskId) -> bool {
        let removed = self.mutate(|list| list.remove(id));
        if removed {
            debug!("Removed task {}", id);
        }
        removed
    }

    /// Empties the board if `confirm` agrees. Returns whether it was cleared.
    pub fn clear(&mut self, confirm: &mut impl Confirm) -> bool {
        if !confirm.confirm(CLEAR_PROMPT) {
            return false;
        }
        self.mutate(|list| {
            list.clear();
            true
        });
        debug!("Cleared board {}", self.key);
        true
    }

    pub fn export_json(&self) -> serde_json::Result<String> {
        self.tasks.to_json_pretty()
    }

    pub fn export(&self, dir: &Path, today: NaiveDate) -> Result<PathBuf> {
        write_export(&self.tasks, dir, today)
    }

    pub fn filtered_view(&self, search_term: &str) -> FilteredView {
        FilteredView::new(self.tasks(), search_term)
    }

    pub fn stats(&self) -> BoardStats {
        BoardStats::from_tasks(self.tasks())
    }

    /// Switches to `key`. Moving off the anonymous key carries the session's
    /// tasks along: they are appended to whatever the new key already holds
    /// and the anonymous entry is removed. Returns how many tasks were carried.
    pub fn rekey(&mut self, key: StorageKey) -> usize {
        if key == self.key {
            return 0;
        }

        let (mut tasks, generated) = load_list(&self.backend, &key);
        let previous = std::mem::replace(&mut self.key, key);

        if previous.is_anonymous() {
            let carried = tasks.merge(std::mem::take(&mut self.tasks));
            debug!("Migrated {} tasks from {} to {}", carried, previous, self.key);
            self.tasks = tasks;
            self.flush();
            if let Err(e) = self.backend.remove(previous.as_str()) {
                warn!("Failed to remove {}: {}", previous, e);
            }
            carried
        } else {
            self.tasks = tasks;
            if generated > 0 {
                self.flush();
            }
            0
        }
    }

    /// Applies a transition and flushes when `changed` reports a mutation.
    fn mutate<R: Changed>(&mut self, apply: impl FnOnce(&mut TaskList) -> R) -> R {
        let result = apply(&mut self.tasks);
        if result.changed() {
            self.flush();
        }
        result
    }

    fn flush(&mut self) {
        let content = match self.tasks.to_json() {
            Ok(content) => content,
            Err(e) => {
                warn!("Failed to serialize board {}: {}", self.key, e);
                return;
            }
        };
        if let Err(e) = self.backend.set(self.key.as_str(), &content) {
            warn!("Failed to save board {}: {}", self.key, e);
        }
    }
}

trait Changed {
    fn changed(&self) -> bool;
}

impl Changed for bool {
    fn changed(&self) -> bool {
        *self
    }
}

impl<T> Changed for Option<T> {
    fn changed(&self) -> bool {
        self.is_some()
    }
}

/// The list under `key` and how many of its ids were generated on load.
fn load_list<S: KeyValueStore>(backend: &S, key: &StorageKey) -> (TaskList, usize) {
    let content = match backend.get(key.as_str()) {
        Ok(Some(content)) => content,
        Ok(None) => return (TaskList::new(), 0),
        Err(e) => {
            warn!("Failed to read board {}: {}", key, e);
            return (TaskList::new(), 0);
        }
    };

    match TaskList::from_json(&content) {
        Ok(loaded) => loaded,
        Err(e) => {
            warn!("Ignoring malformed board {}: {}", key, e);
            (TaskList::new(), 0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, StorageError};

    fn store() -> TaskStore<MemoryStore> {
        TaskStore::open(MemoryStore::new(), StorageKey::anonymous())
    }

    /// Reopens the board from whatever the backend holds.
    fn reopened(store: &TaskStore<MemoryStore>) -> TaskStore<MemoryStore> {
        TaskStore::open(store.backend().clone(), store.key().clone())
    }

    struct FailingStore;

    impl KeyValueStore for FailingStore {
        fn get(&self, _key: &str) -> crate::storage::Result<Option<String>> {
            Err(StorageError::Io(std::io::Error::other("disk gone")))
        }
        fn set(&mut self, _key: &str, _value: &str) -> crate::storage::Result<()> {
            Err(StorageError::Io(std::io::Error::other("quota exceeded")))
        }
        fn remove(&mut self, _key: &str) -> crate::storage::Result<()> {
            Err(StorageError::Io(std::io::Error::other("disk gone")))
        }
    }

    struct Recorder {
        answer: bool,
        prompts: Vec<String>,
    }

    impl Confirm for Recorder {
        fn confirm(&mut self, prompt: &str) -> bool {
            self.prompts.push(prompt.to_string());
            self.answer
        }
    }

    #[test]
    fn test_add_grows_by_one_and_persists() {
        let mut board = store();
        let task = board.add("buy milk").unwrap();
        assert_eq!(board.tasks().len(), 1);
        assert_eq!(task.status, TaskStatus::Todo);
        assert_eq!(board.backend().writes(), 1);

        let again = reopened(&board);
        assert_eq!(again.tasks(), board.tasks());
    }

    #[test]
    fn test_blank_add_is_not_persisted() {
        let mut board = store();
        assert!(board.add("").is_none());
        assert!(board.add("   ").is_none());
        assert!(board.tasks().is_empty());
        assert_eq!(board.backend().writes(), 0);
    }

    #[test]
    fn test_buy_milk_scenario() {
        let mut board = store();
        let id = board.add("buy milk").unwrap().id;
        assert_eq!(board.advance(&id), Some(TaskStatus::InProgress));
        assert_eq!(board.get(&id).unwrap().status, TaskStatus::InProgress);
        assert_eq!(board.advance(&id), Some(TaskStatus::Done));
        assert_eq!(board.advance(&id), Some(TaskStatus::Todo));

        assert_eq!(reopened(&board).get(&id).unwrap().status, TaskStatus::Todo);
    }

    #[test]
    fn test_duplicate_text_moves_only_addressed_task() {
        let mut board = store();
        let first = board.add("a").unwrap().id;
        let second = board.add("a").unwrap().id;

        assert!(board.move_to(&first, TaskStatus::Done));
        assert_eq!(board.get(&first).unwrap().status, TaskStatus::Done);
        assert_eq!(board.get(&second).unwrap().status, TaskStatus::Todo);
    }

    #[test]
    fn test_remove_hides_task_from_views() {
        let mut board = store();
        let id = board.add("drop me").unwrap().id;
        board.add("keep me");

        assert!(board.remove(&id));
        let view = board.filtered_view("");
        assert!(!TaskStatus::ALL
            .iter()
            .any(|s| view.column(*s).iter().any(|t| t.id == id)));
        assert_eq!(reopened(&board).tasks().len(), 1);
    }

    #[test]
    fn test_unknown_id_writes_nothing() {
        let mut board = store();
        board.add("a");
        let writes = board.backend().writes();
        let missing = TaskId::from("missing");

        assert!(!board.move_to(&missing, TaskStatus::Done));
        assert!(!board.remove(&missing));
        assert_eq!(board.advance(&missing), None);
        assert_eq!(board.backend().writes(), writes);
    }

    #[test]
    fn test_clear_declined_is_noop() {
        let mut board = store();
        board.add("a");
        let writes = board.backend().writes();

        let mut gate = Recorder {
            answer: false,
            prompts: Vec::new(),
        };
        assert!(!board.clear(&mut gate));
        assert_eq!(board.tasks().len(), 1);
        assert_eq!(board.backend().writes(), writes);
        assert_eq!(gate.prompts, vec![CLEAR_PROMPT.to_string()]);
    }

    #[test]
    fn test_clear_confirmed_empties_board() {
        let mut board = store();
        board.add("a");
        board.add("b");

        assert!(board.clear(&mut true));
        assert!(board.tasks().is_empty());
        assert!(reopened(&board).tasks().is_empty());
    }

    #[test]
    fn test_malformed_state_opens_empty() {
        let backend = MemoryStore::new().with_value("taskflow-data", "{ not json");
        let board = TaskStore::open(backend, StorageKey::anonymous());
        assert!(board.tasks().is_empty());
    }

    #[test]
    fn test_legacy_state_opens_with_ids() {
        let backend = MemoryStore::new().with_value(
            "taskflow-data",
            r#"[{"text":"old","status":"done"},{"text":"old","status":"todo"}]"#,
        );
        let mut board = TaskStore::open(backend, StorageKey::anonymous());
        assert_eq!(board.tasks().len(), 2);

        let first = board.tasks()[0].id.clone();
        board.remove(&first);
        assert_eq!(board.tasks().len(), 1);
        assert_eq!(board.tasks()[0].status, TaskStatus::Todo);
    }

    #[test]
    fn test_storage_failures_are_swallowed() {
        let mut board = TaskStore::open(FailingStore, StorageKey::anonymous());
        assert!(board.tasks().is_empty());

        let id = board.add("still works").unwrap().id;
        assert_eq!(board.advance(&id), Some(TaskStatus::InProgress));
        assert!(board.clear(&mut true));
    }

    #[test]
    fn test_export_json_is_pretty() {
        let mut board = store();
        board.add("a");
        let json = board.export_json().unwrap();
        assert!(json.starts_with("[\n"));
    }

    #[test]
    fn test_rekey_migrates_anonymous_tasks() {
        let existing = r#"[{"id":"kept","text":"from last visit","status":"done"}]"#;
        let backend = MemoryStore::new().with_value("taskflow-data-203.0.113.7", existing);
        let mut board = TaskStore::open(backend, StorageKey::anonymous());
        board.add("typed before lookup finished");

        board.rekey(StorageKey::for_identity(Some("203.0.113.7")));

        assert_eq!(board.key().as_str(), "taskflow-data-203.0.113.7");
        let texts: Vec<&str> = board.tasks().iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["from last visit", "typed before lookup finished"]);
        assert_eq!(board.backend().get("taskflow-data").unwrap(), None);

        let again = reopened(&board);
        assert_eq!(again.tasks().len(), 2);
    }

    #[test]
    fn test_rekey_same_key_is_noop() {
        let mut board = store();
        board.add("a");
        let writes = board.backend().writes();
        board.rekey(StorageKey::anonymous());
        assert_eq!(board.backend().writes(), writes);
        assert_eq!(board.tasks().len(), 1);
    }

    #[test]
    fn test_rekey_between_identities_does_not_merge() {
        let backend = MemoryStore::new()
            .with_value("taskflow-data-b", r#"[{"id":"b1","text":"b's","status":"todo"}]"#);
        let mut board = TaskStore::open(backend, StorageKey::for_identity(Some("a")));
        board.add("a's");

        board.rekey(StorageKey::for_identity(Some("b")));
        assert_eq!(board.tasks().len(), 1);
        assert_eq!(board.tasks()[0].text, "b's");
        assert!(board.backend().get("taskflow-data-a").unwrap().is_some());
    }

    #[test]
    fn test_legacy_ids_are_saved_on_open() {
        let backend = MemoryStore::new()
            .with_value("taskflow-data", r#"[{"text":"old task","status":"todo"}]"#);
        let board = TaskStore::open(backend, StorageKey::anonymous());
        assert_eq!(board.backend().writes(), 1);

        let id = board.tasks()[0].id.clone();
        let again = reopened(&board);
        assert_eq!(again.get(&id).map(|t| t.text.as_str()), Some("old task"));
        assert_eq!(again.backend().writes(), 1);
    }

    #[test]
    fn test_rekey_onto_legacy_board_saves_ids() {
        let backend = MemoryStore::new()
            .with_value("taskflow-data-b", r#"[{"text":"b's","status":"todo"}]"#);
        let mut board = TaskStore::open(backend, StorageKey::for_identity(Some("a")));
        board.rekey(StorageKey::for_identity(Some("b")));

        let id = board.tasks()[0].id.clone();
        assert_eq!(reopened(&board).get(&id).map(|t| t.text.as_str()), Some("b's"));
    }
}
