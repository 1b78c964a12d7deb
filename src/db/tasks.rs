//! Task CRUD against the `tasks` table.

use super::{Database, now_ms};
use crate::error::{TaskError, TaskResult};
use crate::store::TaskStore;
use crate::types::{NewTask, Task, TaskUpdate};
use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};

const TASK_COLUMNS: &str = "id, title, description, completed, created_at, updated_at";

fn millis_to_datetime(column: usize, ms: i64) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(ms).ok_or(rusqlite::Error::IntegralValueOutOfRange(column, ms))
}

pub fn parse_task_row(row: &Row) -> rusqlite::Result<Task> {
    let id: i64 = row.get(0)?;
    let title: String = row.get(1)?;
    let description: Option<String> = row.get(2)?;
    let completed: bool = row.get(3)?;
    let created_at: i64 = row.get(4)?;
    let updated_at: Option<i64> = row.get(5)?;

    Ok(Task {
        id,
        title,
        description,
        completed,
        created_at: millis_to_datetime(4, created_at)?,
        updated_at: updated_at.map(|ms| millis_to_datetime(5, ms)).transpose()?,
    })
}

/// Internal helper to get a task using an existing connection (avoids deadlock).
fn get_task_internal(conn: &Connection, task_id: i64) -> Result<Option<Task>> {
    let sql = format!("SELECT {} FROM tasks WHERE id = ?1", TASK_COLUMNS);
    let task = conn
        .query_row(&sql, params![task_id], parse_task_row)
        .optional()?;
    Ok(task)
}

fn clamp_to_i64(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

impl Database {
    /// Insert a new task. The id comes from SQLite's AUTOINCREMENT counter,
    /// so deleted ids are never reused.
    pub fn create_task(&self, task: NewTask) -> Result<Task> {
        task.validate()?;
        let now = now_ms();

        self.with_transaction(|tx| {
            tx.execute(
                "INSERT INTO tasks (title, description, completed, created_at)
                 VALUES (?1, ?2, 0, ?3)",
                params![task.title, task.description, now],
            )?;
            let id = tx.last_insert_rowid();
            get_task_internal(tx, id)?
                .ok_or_else(|| TaskError::internal(format!("task {} vanished after insert", id)).into())
        })
    }

    /// Get a task by id.
    pub fn get_task(&self, task_id: i64) -> Result<Option<Task>> {
        self.with_conn(|conn| get_task_internal(conn, task_id))
    }

    /// All tasks ordered by id.
    pub fn get_all_tasks(&self) -> Result<Vec<Task>> {
        self.with_conn(|conn| {
            let sql = format!("SELECT {} FROM tasks ORDER BY id", TASK_COLUMNS);
            let mut stmt = conn.prepare(&sql)?;
            let tasks = stmt
                .query_map([], parse_task_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(tasks)
        })
    }

    /// A page of tasks ordered by id.
    pub fn list_tasks(&self, skip: usize, limit: usize) -> Result<Vec<Task>> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {} FROM tasks ORDER BY id LIMIT ?1 OFFSET ?2",
                TASK_COLUMNS
            );
            let mut stmt = conn.prepare(&sql)?;
            let tasks = stmt
                .query_map(params![clamp_to_i64(limit), clamp_to_i64(skip)], parse_task_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(tasks)
        })
    }

    /// Apply a partial update inside one transaction.
    pub fn update_task(&self, task_id: i64, update: TaskUpdate) -> Result<Task> {
        self.with_transaction(|tx| {
            let mut task = get_task_internal(tx, task_id)?.ok_or(TaskError::NotFound(task_id))?;
            update.validate()?;

            if !update.apply_to(&mut task) {
                return Ok(task);
            }

            let now = now_ms();
            tx.execute(
                "UPDATE tasks SET title = ?1, description = ?2, completed = ?3, updated_at = ?4
                 WHERE id = ?5",
                params![task.title, task.description, task.completed, now, task_id],
            )?;
            task.updated_at = Some(millis_to_datetime(5, now)?);
            Ok(task)
        })
    }

    /// Set the completion flag and bump `updated_at`.
    pub fn set_task_completed(&self, task_id: i64, completed: bool) -> Result<Task> {
        self.with_transaction(|tx| {
            let changed = tx.execute(
                "UPDATE tasks SET completed = ?1, updated_at = ?2 WHERE id = ?3",
                params![completed, now_ms(), task_id],
            )?;
            if changed == 0 {
                return Err(TaskError::NotFound(task_id).into());
            }
            get_task_internal(tx, task_id)?.ok_or_else(|| TaskError::NotFound(task_id).into())
        })
    }

    /// Delete a task permanently.
    pub fn delete_task(&self, task_id: i64) -> Result<()> {
        self.with_transaction(|tx| {
            let deleted = tx.execute("DELETE FROM tasks WHERE id = ?1", params![task_id])?;
            if deleted == 0 {
                return Err(TaskError::NotFound(task_id).into());
            }
            Ok(())
        })
    }

    /// Round-trip a trivial query.
    pub fn ping(&self) -> Result<()> {
        self.with_conn(|conn| {
            conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
            Ok(())
        })
    }
}

impl TaskStore for Database {
    fn add(&self, task: NewTask) -> TaskResult<Task> {
        Ok(self.create_task(task)?)
    }

    fn get_all(&self) -> TaskResult<Vec<Task>> {
        Ok(self.get_all_tasks()?)
    }

    fn list(&self, skip: usize, limit: usize) -> TaskResult<Vec<Task>> {
        Ok(self.list_tasks(skip, limit)?)
    }

    fn find_by_id(&self, id: i64) -> TaskResult<Option<Task>> {
        Ok(self.get_task(id)?)
    }

    fn update(&self, id: i64, update: TaskUpdate) -> TaskResult<Task> {
        Ok(self.update_task(id, update)?)
    }

    fn set_completed(&self, id: i64, completed: bool) -> TaskResult<Task> {
        Ok(self.set_task_completed(id, completed)?)
    }

    fn delete(&self, id: i64) -> TaskResult<()> {
        Ok(self.delete_task(id)?)
    }

    fn ping(&self) -> TaskResult<()> {
        Ok(Database::ping(self)?)
    }
}
