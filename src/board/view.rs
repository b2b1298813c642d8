//! Derived read views: search-filtered columns and board statistics

use serde::Serialize;

use super::model::{Task, TaskStatus};

/// Tasks matching a search term, partitioned by status. Each column keeps
/// list order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilteredView {
    pub todo: Vec<Task>,
    pub in_progress: Vec<Task>,
    pub done: Vec<Task>,
}

impl FilteredView {
    /// Case-insensitive substring filter. An empty term keeps every task.
    pub fn new(tasks: &[Task], search_term: &str) -> Self {
        let needle = search_term.to_lowercase();
        let mut view = Self::default();
        for task in tasks.iter().filter(|t| t.matches_lowercase(&needle)) {
            view.column_mut(task.status).push(task.clone());
        }
        view
    }

    pub fn column(&self, status: TaskStatus) -> &[Task] {
        match status {
            TaskStatus::Todo => &self.todo,
            TaskStatus::InProgress => &self.in_progress,
            TaskStatus::Done => &self.done,
        }
    }

    fn column_mut(&mut self, status: TaskStatus) -> &mut Vec<Task> {
        match status {
            TaskStatus::Todo => &mut self.todo,
            TaskStatus::InProgress => &mut self.in_progress,
            TaskStatus::Done => &mut self.done,
        }
    }

    pub fn len(&self) -> usize {
        self.todo.len() + self.in_progress.len() + self.done.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BoardStats {
    pub total: usize,
    pub pending: usize,
    pub in_progress: usize,
    pub done: usize,
    /// Percentage of done tasks, rounded half away from zero. 0 on an empty board.
    pub completion_rate: u8,
}

impl BoardStats {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let count = |status: TaskStatus| tasks.iter().filter(|t| t.status == status).count();
        let total = tasks.len();
        let done = count(TaskStatus::Done);
        let completion_rate = if total > 0 {
            ((done as f64 / total as f64) * 100.0).round() as u8
        } else {
            0
        };

        Self {
            total,
            pending: count(TaskStatus::Todo),
            in_progress: count(TaskStatus::InProgress),
            done,
            completion_rate,
        }
    }
}
