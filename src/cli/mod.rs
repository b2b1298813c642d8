//! CLI command implementations

pub mod add;
pub mod clear;
pub mod definition;
pub mod export;
pub mod identify;
pub mod list;
pub mod mv;
pub mod profile;
pub mod remove;
pub mod stats;

pub use definition::{Cli, Commands};

use anyhow::{bail, Result};
use unicode_width::UnicodeWidthChar;

use crate::board::{Task, TaskStore};
use crate::identity::resolve_storage_key;
use crate::storage::FileStore;

/// Opens the profile's board, keyed by the override or the cached identity.
pub fn open_board(profile: &str, identity: Option<&str>) -> Result<TaskStore<FileStore>> {
    let backend = FileStore::new(profile)?;
    let key = resolve_storage_key(&backend, identity);
    Ok(TaskStore::open(backend, key))
}

pub fn resolve_task<'a>(identifier: &str, tasks: &'a [Task]) -> Result<&'a Task> {
    // Try exact ID match
    if let Some(task) = tasks.iter().find(|t| t.id.as_str() == identifier) {
        return Ok(task);
    }

    // Try exact text match; duplicate text can't name a single task
    let by_text: Vec<&Task> = tasks.iter().filter(|t| t.text == identifier).collect();
    match by_text.as_slice() {
        [task] => return Ok(*task),
        [] => {}
        many => {
            let ids: Vec<&str> = many.iter().map(|t| t.id.short()).collect();
            bail!(
                "'{}' matches {} tasks ({}); use an id instead",
                identifier,
                many.len(),
                ids.join(", ")
            );
        }
    }

    // Try ID prefix match
    let by_prefix: Vec<&Task> = tasks
        .iter()
        .filter(|t| t.id.as_str().starts_with(identifier))
        .collect();
    match by_prefix.as_slice() {
        [task] => Ok(*task),
        [] => bail!("Task not found: {}", identifier),
        _ => bail!("Ambiguous task id prefix: {}", identifier),
    }
}

/// Truncates to `max` terminal columns, marking the cut with "...".
pub fn truncate(s: &str, max: usize) -> String {
    let width: usize = s.chars().map(|c| c.width().unwrap_or(0)).sum();
    if width <= max {
        return s.to_string();
    }

    let (budget, ellipsis) = if max <= 3 { (max, "") } else { (max - 3, "...") };
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push_str(ellipsis);
    out
}
