//! Ordered task list and its pure transitions

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::model::{Task, TaskId, TaskStatus};

/// Tasks in insertion order. This is the unit of persistence: the whole
/// list is serialized as one JSON array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TaskList {
    tasks: Vec<Task>,
}

/// Stored shape of a task. Lists written before ids existed have none.
#[derive(Deserialize)]
struct StoredTask {
    #[serde(default)]
    id: Option<TaskId>,
    text: String,
    status: TaskStatus,
}

impl TaskList {
    pub fn new() -> Self {
        Self::default()
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

    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| &t.id == id)
    }

    /// Appends a todo task. Text that is blank after trimming is rejected.
    pub fn add(&mut self, text: &str) -> Option<&Task> {
        if text.trim().is_empty() {
            return None;
        }
        self.tasks.push(Task::new(text));
        self.tasks.last()
    }

    pub fn move_to(&mut self, id: &TaskId, status: TaskStatus) -> bool {
        match self.tasks.iter_mut().find(|t| &t.id == id) {
            Some(task) => {
                task.status = status;
                true
            }
            None => false,
        }
    }

    /// Moves the task one step along the status cycle, returning its new status.
    pub fn advance(&mut self, id: &TaskId) -> Option<TaskStatus> {
        let next = self.get(id)?.status.next();
        self.move_to(id, next);
        Some(next)
    }

    pub fn remove(&mut self, id: &TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| &t.id != id);
        self.tasks.len() != before
    }

    pub fn clear(&mut self) {
        self.tasks.clear();
    }

    /// Appends tasks from `other` whose id is not already present.
    pub fn merge(&mut self, other: TaskList) -> usize {
        let known: HashSet<TaskId> = self.tasks.iter().map(|t| t.id.clone()).collect();
        let before = self.tasks.len();
        self.tasks
            .extend(other.tasks.into_iter().filter(|t| !known.contains(&t.id)));
        self.tasks.len() - before
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Parses a stored list, generating ids for tasks that lack one. Returns
    /// the list and how many ids were generated; those only stick once the
    /// list is written back.
    pub fn from_json(content: &str) -> serde_json::Result<(Self, usize)> {
        if content.trim().is_empty() {
            return Ok((Self::new(), 0));
        }

        let stored: Vec<StoredTask> = serde_json::from_str(content)?;
        let mut generated = 0;
        let tasks = stored
            .into_iter()
            .map(|t| {
                let id = match t.id {
                    Some(id) if !id.as_str().trim().is_empty() => id,
                    _ => {
                        generated += 1;
                        TaskId::new()
                    }
                };
                Task {
                    id,
                    text: t.text,
                    status: t.status,
                }
            })
            .collect();
        Ok((Self { tasks }, generated))
    }
}
