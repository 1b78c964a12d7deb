//! The task store contract.
//!
//! Two implementations satisfy it: [`MemoryStore`] for the interactive menu
//! and [`crate::db::Database`] for the HTTP API.

mod memory;

pub use memory::MemoryStore;

use crate::error::TaskResult;
use crate::types::{NewTask, Task, TaskUpdate};

/// Owner of the authoritative task collection.
///
/// Every returned [`Task`] is an owned copy; nothing outside the store
/// keeps a live reference to stored state.
pub trait TaskStore: Send + Sync {
    /// Validate and insert a task, assigning the next id.
    fn add(&self, task: NewTask) -> TaskResult<Task>;

    /// All tasks in insertion order.
    fn get_all(&self) -> TaskResult<Vec<Task>>;

    /// A window of tasks in insertion order.
    fn list(&self, skip: usize, limit: usize) -> TaskResult<Vec<Task>>;

    fn find_by_id(&self, id: i64) -> TaskResult<Option<Task>>;

    /// Apply a partial update. An empty update returns the task unchanged.
    fn update(&self, id: i64, update: TaskUpdate) -> TaskResult<Task>;

    fn set_completed(&self, id: i64, completed: bool) -> TaskResult<Task>;

    /// Remove a task permanently. Its id is never handed out again.
    fn delete(&self, id: i64) -> TaskResult<()>;

    /// Check the store can still serve requests.
    fn ping(&self) -> TaskResult<()>;
}
