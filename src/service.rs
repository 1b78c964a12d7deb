//! Task operations façade.
//!
//! Delegates one-to-one to a [`TaskStore`] and records each mutation in the
//! log. Front ends talk to this type, never to a store directly.

use crate::error::TaskResult;
use crate::store::TaskStore;
use crate::types::{NewTask, Task, TaskUpdate};
use std::sync::Arc;
use tracing::{debug, error, info};

#[derive(Clone)]
pub struct TaskService {
    store: Arc<dyn TaskStore>,
}

impl TaskService {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self { store }
    }

    pub fn add_task(&self, task: NewTask) -> TaskResult<Task> {
        let result = self.store.add(task);
        match &result {
            Ok(task) => info!(task_id = task.id, "Task created"),
            Err(e) if e.is_recoverable() => debug!(error = %e, "Task creation rejected"),
            Err(e) => error!(error = %e, "Task creation failed"),
        }
        result
    }

    pub fn get_all_tasks(&self) -> TaskResult<Vec<Task>> {
        self.store.get_all()
    }

    pub fn list_tasks(&self, skip: usize, limit: usize) -> TaskResult<Vec<Task>> {
        debug!(skip, limit, "Listing tasks");
        self.store.list(skip, limit)
    }

    pub fn find_task(&self, task_id: i64) -> TaskResult<Option<Task>> {
        self.store.find_by_id(task_id)
    }

    pub fn update_task(&self, task_id: i64, update: TaskUpdate) -> TaskResult<Task> {
        let result = self.store.update(task_id, update);
        log_mutation("updated", task_id, &result);
        result
    }

    pub fn mark_task_complete(&self, task_id: i64, completed: bool) -> TaskResult<Task> {
        let result = self.store.set_completed(task_id, completed);
        log_mutation(
            if completed { "marked complete" } else { "marked incomplete" },
            task_id,
            &result,
        );
        result
    }

    /// Whether the backing store still answers.
    pub fn ping(&self) -> TaskResult<()> {
        self.store.ping()
    }

    pub fn delete_task(&self, task_id: i64) -> TaskResult<()> {
        let result = self.store.delete(task_id);
        log_mutation("deleted", task_id, &result);
        result
    }
}

fn log_mutation<T>(action: &str, task_id: i64, result: &TaskResult<T>) {
    match result {
        Ok(_) => info!(task_id, "Task {}", action),
        Err(e) if e.is_recoverable() => debug!(task_id, error = %e, "Task not {}", action),
        Err(e) => error!(task_id, error = %e, "Task not {}", action),
    }
}
