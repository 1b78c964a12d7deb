//! Plain-text rendering of tasks for the terminal.

use crate::types::Task;
use prettytable::{Table, row};

/// Render tasks as a table with a header row.
pub fn tasks_table(tasks: &[Task]) -> String {
    let mut table = Table::new();

    table.add_row(row!["ID", "TITLE", "DESCRIPTION", "STATUS"]);
    for task in tasks {
        table.add_row(row![
            task.id,
            task.title,
            task.description.as_deref().unwrap_or(""),
            task.status_label()
        ]);
    }

    table.to_string()
}

/// Multi-line summary of one task.
pub fn task_details(task: &Task) -> String {
    let mut out = String::new();

    out.push_str(&format!("  ID: {}\n", task.id));
    out.push_str(&format!("  Title: {}\n", task.title));
    if let Some(ref desc) = task.description
        && !desc.is_empty()
    {
        out.push_str(&format!("  Description: {}\n", desc));
    }
    out.push_str(&format!("  Status: {}\n", task.status_label()));

    out
}

/// Selection label for a task, e.g. `3: Walk dog`.
pub fn task_choice(task: &Task) -> String {
    format!("{}: {}", task.id, task.title)
}
