//! In-process task store backed by a `Vec`.

use super::TaskStore;
use crate::error::{TaskError, TaskResult};
use crate::types::{NewTask, Task, TaskUpdate};
use chrono::Utc;
use std::sync::{Mutex, MutexGuard};

struct Inner {
    tasks: Vec<Task>,
    next_id: i64,
}

/// Task list held in memory for the lifetime of the process.
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                tasks: Vec::new(),
                next_id: 1,
            }),
        }
    }

    fn lock(&self) -> TaskResult<MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| TaskError::internal("task list lock poisoned"))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Inner {
    fn position(&self, id: i64) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == id)
    }
}

impl TaskStore for MemoryStore {
    fn add(&self, task: NewTask) -> TaskResult<Task> {
        task.validate()?;

        let mut inner = self.lock()?;
        let created = Task {
            id: inner.next_id,
            title: task.title,
            description: task.description,
            completed: false,
            created_at: Utc::now(),
            updated_at: None,
        };
        inner.next_id += 1;
        inner.tasks.push(created.clone());
        Ok(created)
    }

    fn get_all(&self) -> TaskResult<Vec<Task>> {
        Ok(self.lock()?.tasks.clone())
    }

    fn list(&self, skip: usize, limit: usize) -> TaskResult<Vec<Task>> {
        let inner = self.lock()?;
        Ok(inner.tasks.iter().skip(skip).take(limit).cloned().collect())
    }

    fn find_by_id(&self, id: i64) -> TaskResult<Option<Task>> {
        let inner = self.lock()?;
        Ok(inner.tasks.iter().find(|t| t.id == id).cloned())
    }

    fn update(&self, id: i64, update: TaskUpdate) -> TaskResult<Task> {
        let mut inner = self.lock()?;
        let idx = inner.position(id).ok_or(TaskError::NotFound(id))?;
        update.validate()?;

        let task = &mut inner.tasks[idx];
        if update.apply_to(task) {
            task.updated_at = Some(Utc::now());
        }
        Ok(task.clone())
    }

    fn set_completed(&self, id: i64, completed: bool) -> TaskResult<Task> {
        let mut inner = self.lock()?;
        let idx = inner.position(id).ok_or(TaskError::NotFound(id))?;

        let task = &mut inner.tasks[idx];
        task.completed = completed;
        task.updated_at = Some(Utc::now());
        Ok(task.clone())
    }

    fn delete(&self, id: i64) -> TaskResult<()> {
        let mut inner = self.lock()?;
        let idx = inner.position(id).ok_or(TaskError::NotFound(id))?;
        inner.tasks.remove(idx);
        Ok(())
    }

    fn ping(&self) -> TaskResult<()> {
        self.lock().map(|_| ())
    }
}
