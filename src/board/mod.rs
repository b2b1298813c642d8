//! Task board core
//!
//! - Task model and the `todo -> in-progress -> done` status cycle
//! - Ordered task list with id-addressed transitions
//! - Write-through task store over a key-value backend
//! - Search-filtered column views, statistics, backups and drag payloads

pub mod export;
pub mod key;
pub mod list;
pub mod model;
pub mod payload;
pub mod store;
pub mod view;

pub use key::StorageKey;
pub use list::TaskList;
pub use model::{Task, TaskId, TaskStatus};
pub use store::{Confirm, TaskStore, CLEAR_PROMPT};
pub use view::{BoardStats, FilteredView};
