//! Core types shared by both task stores.

use crate::error::{TaskError, TaskResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum title length, in characters.
pub const TITLE_MAX_LEN: usize = 200;

/// Maximum description length, in characters.
pub const DESCRIPTION_MAX_LEN: usize = 1000;

/// A todo item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    /// Unset until the first effective mutation.
    pub updated_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Human-readable status label.
    pub fn status_label(&self) -> &'static str {
        if self.completed { "Completed" } else { "Pending" }
    }
}

/// Input for creating a task.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
}

impl NewTask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Check the title and description limits.
    pub fn validate(&self) -> TaskResult<()> {
        validate_title(&self.title)?;
        validate_description(self.description.as_deref())
    }
}

/// Partial update of a task.
///
/// `None` on any field means "leave unchanged". For `description`,
/// `Some(None)` clears the value and `Some(Some(_))` replaces it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub completed: Option<bool>,
}

impl TaskUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(Some(description.into()));
        self
    }

    pub fn clear_description(mut self) -> Self {
        self.description = Some(None);
        self
    }

    pub fn completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }

    /// True when no field would change.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.completed.is_none()
    }

    /// Validate only the fields that are present.
    pub fn validate(&self) -> TaskResult<()> {
        if let Some(ref title) = self.title {
            validate_title(title)?;
        }
        if let Some(ref description) = self.description {
            validate_description(description.as_deref())?;
        }
        Ok(())
    }

    /// Apply the present fields to `task` in place.
    ///
    /// Returns whether anything was applied. Callers validate first.
    pub fn apply_to(&self, task: &mut Task) -> bool {
        if self.is_empty() {
            return false;
        }
        if let Some(ref title) = self.title {
            task.title = title.clone();
        }
        if let Some(ref description) = self.description {
            task.description = description.clone();
        }
        if let Some(completed) = self.completed {
            task.completed = completed;
        }
        true
    }
}

/// Reject empty, whitespace-only, or oversized titles.
pub fn validate_title(title: &str) -> TaskResult<()> {
    if title.trim().is_empty() {
        return Err(TaskError::validation(
            "title",
            "Task title cannot be empty or whitespace only",
        ));
    }
    if title.chars().count() > TITLE_MAX_LEN {
        return Err(TaskError::validation(
            "title",
            format!("Task title cannot exceed {} characters", TITLE_MAX_LEN),
        ));
    }
    if title.contains('\0') {
        return Err(TaskError::validation(
            "title",
            "Task title cannot contain NUL characters",
        ));
    }
    Ok(())
}

/// Descriptions may be empty but not oversized.
pub fn validate_description(description: Option<&str>) -> TaskResult<()> {
    match description {
        Some(d) if d.chars().count() > DESCRIPTION_MAX_LEN => Err(TaskError::validation(
            "description",
            format!(
                "Task description cannot exceed {} characters",
                DESCRIPTION_MAX_LEN
            ),
        )),
        // SQLite string functions stop at the first NUL.
        Some(d) if d.contains('\0') => Err(TaskError::validation(
            "description",
            "Task description cannot contain NUL characters",
        )),
        _ => Ok(()),
    }
}
