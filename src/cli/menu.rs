//! `menu` subcommand: interactive task menu.
//!
//! Prompts go through the [`Prompt`] trait so the flow can be driven by a
//! script in tests; [`DialoguerPrompt`] is the terminal implementation.

use crate::config::Config;
use crate::db::Database;
use crate::format;
use crate::service::TaskService;
use crate::store::{MemoryStore, TaskStore};
use crate::types::{NewTask, Task, TaskUpdate};
use anyhow::Result;
use clap::Args;
use dialoguer::{Confirm, Input, Select, theme::ColorfulTheme};
use std::io::Write;
use std::sync::Arc;

/// Arguments for the menu subcommand
#[derive(Args, Debug, Default)]
pub struct MenuArgs {
    /// Keep tasks in the SQLite database instead of in memory
    #[arg(long)]
    pub persist: bool,
}

/// Top-level menu entries, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Add,
    View,
    Update,
    Delete,
    Complete,
    Incomplete,
    Exit,
}

impl MenuAction {
    pub const ALL: [MenuAction; 7] = [
        MenuAction::Add,
        MenuAction::View,
        MenuAction::Update,
        MenuAction::Delete,
        MenuAction::Complete,
        MenuAction::Incomplete,
        MenuAction::Exit,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MenuAction::Add => "Add Task",
            MenuAction::View => "View All Tasks",
            MenuAction::Update => "Update Task",
            MenuAction::Delete => "Delete Task",
            MenuAction::Complete => "Mark Task Complete",
            MenuAction::Incomplete => "Mark Task Incomplete",
            MenuAction::Exit => "Exit",
        }
    }
}

/// Source of user answers.
pub trait Prompt {
    /// Pick one of `items`. `None` means the user backed out.
    fn select(&mut self, prompt: &str, items: &[String]) -> Result<Option<usize>>;

    /// Free text. `default` pre-fills the answer.
    fn input(&mut self, prompt: &str, default: Option<&str>) -> Result<String>;

    fn confirm(&mut self, prompt: &str) -> Result<bool>;

    /// Wait before redrawing the menu.
    fn pause(&mut self) -> Result<()>;
}

/// Terminal prompts via dialoguer.
pub struct DialoguerPrompt {
    theme: ColorfulTheme,
}

impl DialoguerPrompt {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }
}

impl Default for DialoguerPrompt {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompt for DialoguerPrompt {
    fn select(&mut self, prompt: &str, items: &[String]) -> Result<Option<usize>> {
        let selection = Select::with_theme(&self.theme)
            .with_prompt(prompt)
            .items(items)
            .default(0)
            .interact_opt()?;
        Ok(selection)
    }

    fn input(&mut self, prompt: &str, default: Option<&str>) -> Result<String> {
        let mut input = Input::<String>::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty(true);
        if let Some(default) = default {
            input = input.default(default.to_string());
        }
        Ok(input.interact_text()?)
    }

    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        let confirmed = Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(false)
            .interact()?;
        Ok(confirmed)
    }

    fn pause(&mut self) -> Result<()> {
        Input::<String>::with_theme(&self.theme)
            .with_prompt("Press Enter to continue")
            .allow_empty(true)
            .report(false)
            .interact_text()?;
        Ok(())
    }
}

/// The interactive menu loop.
pub struct Menu<P, W> {
    service: TaskService,
    prompt: P,
    out: W,
}

impl<P: Prompt, W: Write> Menu<P, W> {
    pub fn new(service: TaskService, prompt: P, out: W) -> Self {
        Self {
            service,
            prompt,
            out,
        }
    }

    /// Run until the user picks Exit or backs out of the main menu.
    pub fn run(&mut self) -> Result<()> {
        writeln!(self.out, "TODO task manager. Manage your tasks efficiently.\n")?;

        let labels: Vec<String> = MenuAction::ALL
            .iter()
            .map(|a| a.label().to_string())
            .collect();

        loop {
            let action = self
                .prompt
                .select("What would you like to do?", &labels)?
                .and_then(|i| MenuAction::ALL.get(i).copied())
                .unwrap_or(MenuAction::Exit);

            if action == MenuAction::Exit {
                writeln!(self.out, "Goodbye! Have a productive day!")?;
                return Ok(());
            }

            self.perform(action)?;
            self.prompt.pause()?;
        }
    }

    pub fn perform(&mut self, action: MenuAction) -> Result<()> {
        match action {
            MenuAction::Add => self.add_task(),
            MenuAction::View => self.view_tasks(),
            MenuAction::Update => self.update_task(),
            MenuAction::Delete => self.delete_task(),
            MenuAction::Complete => self.set_completed(true),
            MenuAction::Incomplete => self.set_completed(false),
            MenuAction::Exit => Ok(()),
        }
    }

    /// Consume the menu and return the output sink.
    pub fn into_output(self) -> W {
        self.out
    }

    fn add_task(&mut self) -> Result<()> {
        writeln!(self.out, "== Add a new task ==")?;

        let title = self.prompt.input("Enter task title", None)?;
        if title.trim().is_empty() {
            writeln!(self.out, "Task title cannot be empty!")?;
            return Ok(());
        }

        let description = self
            .prompt
            .input("Enter task description (optional)", None)?;
        let mut task = NewTask::new(title);
        if !description.is_empty() {
            task = task.with_description(description);
        }

        match self.service.add_task(task) {
            Ok(task) => {
                writeln!(self.out, "Task added successfully! ID: {}", task.id)?;
                write!(self.out, "{}", format::task_details(&task))?;
            }
            Err(e) => writeln!(self.out, "Error: {}", e)?,
        }
        Ok(())
    }

    fn view_tasks(&mut self) -> Result<()> {
        writeln!(self.out, "== All tasks ==")?;

        let tasks = match self.service.get_all_tasks() {
            Ok(tasks) => tasks,
            Err(e) => {
                writeln!(self.out, "Error: {}", e)?;
                return Ok(());
            }
        };

        if tasks.is_empty() {
            writeln!(self.out, "No tasks found!")?;
            return Ok(());
        }

        writeln!(self.out, "Total tasks: {}\n", tasks.len())?;
        write!(self.out, "{}", format::tasks_table(&tasks))?;
        Ok(())
    }

    fn update_task(&mut self) -> Result<()> {
        writeln!(self.out, "== Update a task ==")?;

        let Some(task) = self.choose_task("Select task to update", |_| true, "No tasks to update!")? else {
            return Ok(());
        };

        writeln!(self.out, "Updating task {}:", task.id)?;
        writeln!(self.out, "Current title: {}", task.title)?;
        if let Some(ref desc) = task.description {
            writeln!(self.out, "Current description: {}", desc)?;
        }

        let new_title = self.prompt.input("Enter new title", Some(&task.title))?;
        if new_title.trim().is_empty() {
            writeln!(self.out, "Task title cannot be empty!")?;
            return Ok(());
        }
        let new_description = self.prompt.input(
            "Enter new description",
            Some(task.description.as_deref().unwrap_or("")),
        )?;

        // Only send what changed; an empty description clears it.
        let mut update = TaskUpdate::new();
        if new_title != task.title {
            update = update.title(new_title);
        }
        let new_description = (!new_description.is_empty()).then_some(new_description);
        if new_description != task.description {
            update.description = Some(new_description);
        }

        if update.is_empty() {
            writeln!(self.out, "No changes made to task {}.", task.id)?;
            return Ok(());
        }

        match self.service.update_task(task.id, update) {
            Ok(task) => writeln!(self.out, "Task {} updated successfully!", task.id)?,
            Err(e) => writeln!(self.out, "Error: {}", e)?,
        }
        Ok(())
    }

    fn delete_task(&mut self) -> Result<()> {
        writeln!(self.out, "== Delete a task ==")?;

        let Some(task) = self.choose_task("Select task to delete", |_| true, "No tasks to delete!")? else {
            return Ok(());
        };

        writeln!(self.out, "You are about to delete:")?;
        write!(self.out, "{}", format::task_details(&task))?;

        let prompt = format!("Are you sure you want to delete task {}?", task.id);
        if !self.prompt.confirm(&prompt)? {
            writeln!(self.out, "Deletion cancelled.")?;
            return Ok(());
        }

        match self.service.delete_task(task.id) {
            Ok(()) => writeln!(self.out, "Task {} deleted successfully!", task.id)?,
            Err(e) => writeln!(self.out, "Error: {}", e)?,
        }
        Ok(())
    }

    fn set_completed(&mut self, completed: bool) -> Result<()> {
        let (heading, prompt, none_left, done) = if completed {
            (
                "== Mark task as complete ==",
                "Select task to mark as complete",
                "No pending tasks to mark as complete!",
                "marked as complete",
            )
        } else {
            (
                "== Mark task as incomplete ==",
                "Select task to mark as incomplete",
                "No completed tasks to mark as incomplete!",
                "marked as incomplete",
            )
        };
        writeln!(self.out, "{}", heading)?;

        let Some(task) = self.choose_task(prompt, |t| t.completed != completed, none_left)? else {
            return Ok(());
        };

        match self.service.mark_task_complete(task.id, completed) {
            Ok(task) => writeln!(self.out, "Task {} {}!", task.id, done)?,
            Err(e) => writeln!(self.out, "Error: {}", e)?,
        }
        Ok(())
    }

    /// Offer the tasks matching `filter`. `none_eligible` is printed when
    /// tasks exist but none match.
    fn choose_task<F>(&mut self, prompt: &str, filter: F, none_eligible: &str) -> Result<Option<Task>>
    where
        F: Fn(&Task) -> bool,
    {
        let tasks = match self.service.get_all_tasks() {
            Ok(tasks) => tasks,
            Err(e) => {
                writeln!(self.out, "Error: {}", e)?;
                return Ok(None);
            }
        };
        if tasks.is_empty() {
            writeln!(self.out, "No tasks available!")?;
            return Ok(None);
        }

        let eligible: Vec<Task> = tasks.into_iter().filter(|t| filter(t)).collect();
        if eligible.is_empty() {
            writeln!(self.out, "{}", none_eligible)?;
            return Ok(None);
        }
        self.pick(prompt, eligible)
    }

    /// Offer `tasks`, then re-read the chosen one from the store.
    fn pick(&mut self, prompt: &str, tasks: Vec<Task>) -> Result<Option<Task>> {
        let labels: Vec<String> = tasks.iter().map(format::task_choice).collect();
        let Some(idx) = self.prompt.select(prompt, &labels)? else {
            return Ok(None);
        };
        let Some(chosen) = tasks.get(idx) else {
            return Ok(None);
        };

        match self.service.find_task(chosen.id) {
            Ok(Some(task)) => Ok(Some(task)),
            Ok(None) => {
                writeln!(self.out, "Task with ID {} not found!", chosen.id)?;
                Ok(None)
            }
            Err(e) => {
                writeln!(self.out, "Error: {}", e)?;
                Ok(None)
            }
        }
    }
}

/// Build the store, run the menu on the terminal, then release the store.
pub fn run(config: &Config, args: &MenuArgs) -> Result<()> {
    let db = if args.persist {
        config.ensure_db_dir()?;
        Some(Database::open(&config.database.path)?)
    } else {
        None
    };

    let store: Arc<dyn TaskStore> = match &db {
        Some(db) => Arc::new(db.clone()),
        None => Arc::new(MemoryStore::new()),
    };

    let mut menu = Menu::new(
        TaskService::new(store),
        DialoguerPrompt::new(),
        std::io::stdout(),
    );
    menu.run()?;
    drop(menu);

    if let Some(db) = db {
        db.close()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    /// One scripted answer.
    enum Answer {
        Select(Option<usize>),
        Text(&'static str),
        Confirm(bool),
    }

    #[derive(Default)]
    struct ScriptedPrompt {
        answers: VecDeque<Answer>,
        defaults_seen: Vec<Option<String>>,
    }

    impl ScriptedPrompt {
        fn new(answers: Vec<Answer>) -> Self {
            Self {
                answers: answers.into(),
                defaults_seen: Vec::new(),
            }
        }
    }

    impl Prompt for ScriptedPrompt {
        fn select(&mut self, _prompt: &str, _items: &[String]) -> Result<Option<usize>> {
            match self.answers.pop_front() {
                Some(Answer::Select(choice)) => Ok(choice),
                _ => anyhow::bail!("script expected a selection"),
            }
        }

        fn input(&mut self, _prompt: &str, default: Option<&str>) -> Result<String> {
            self.defaults_seen.push(default.map(str::to_string));
            match self.answers.pop_front() {
                Some(Answer::Text(text)) => Ok(text.to_string()),
                _ => anyhow::bail!("script expected text input"),
            }
        }

        fn confirm(&mut self, _prompt: &str) -> Result<bool> {
            match self.answers.pop_front() {
                Some(Answer::Confirm(yes)) => Ok(yes),
                _ => anyhow::bail!("script expected a confirmation"),
            }
        }

        fn pause(&mut self) -> Result<()> {
            Ok(())
        }
    }

    fn menu(answers: Vec<Answer>) -> (Menu<ScriptedPrompt, Vec<u8>>, TaskService) {
        let service = TaskService::new(Arc::new(MemoryStore::new()));
        let menu = Menu::new(service.clone(), ScriptedPrompt::new(answers), Vec::new());
        (menu, service)
    }

    fn output(menu: Menu<ScriptedPrompt, Vec<u8>>) -> String {
        String::from_utf8(menu.into_output()).unwrap()
    }

    #[test]
    fn empty_title_aborts_add() {
        let (mut menu, service) = menu(vec![Answer::Text("   ")]);
        menu.perform(MenuAction::Add).unwrap();

        assert!(service.get_all_tasks().unwrap().is_empty());
        assert!(output(menu).contains("Task title cannot be empty!"));
    }

    #[test]
    fn add_then_view() {
        let (mut menu, _service) = menu(vec![Answer::Text("Buy milk"), Answer::Text("")]);
        menu.perform(MenuAction::Add).unwrap();
        menu.perform(MenuAction::View).unwrap();

        let out = output(menu);
        assert!(out.contains("Task added successfully! ID: 1"));
        assert!(out.contains("Total tasks: 1"));
        assert!(out.contains("Buy milk"));
    }

    #[test]
    fn update_prefills_and_applies_changes() {
        let (mut menu, service) = menu(vec![
            Answer::Select(Some(0)),
            Answer::Text("Buy oat milk"),
            Answer::Text("from the corner shop"),
        ]);
        service
            .add_task(NewTask::new("Buy milk").with_description("2 litres"))
            .unwrap();

        menu.perform(MenuAction::Update).unwrap();

        let task = service.find_task(1).unwrap().unwrap();
        assert_eq!(task.title, "Buy oat milk");
        assert_eq!(task.description.as_deref(), Some("from the corner shop"));
        assert_eq!(
            menu.prompt.defaults_seen,
            vec![Some("Buy milk".to_string()), Some("2 litres".to_string())]
        );
        assert!(output(menu).contains("Task 1 updated successfully!"));
    }

    #[test]
    fn update_with_empty_title_leaves_task_alone() {
        let (mut menu, service) = menu(vec![Answer::Select(Some(0)), Answer::Text("")]);
        service.add_task(NewTask::new("Keep")).unwrap();

        menu.perform(MenuAction::Update).unwrap();

        assert_eq!(service.find_task(1).unwrap().unwrap().title, "Keep");
        assert!(output(menu).contains("Task title cannot be empty!"));
    }

    #[test]
    fn unchanged_answers_make_no_update() {
        let (mut menu, service) = menu(vec![
            Answer::Select(Some(0)),
            Answer::Text("Same"),
            Answer::Text(""),
        ]);
        let before = service.add_task(NewTask::new("Same")).unwrap();

        menu.perform(MenuAction::Update).unwrap();

        assert_eq!(service.find_task(1).unwrap().unwrap(), before);
        assert!(output(menu).contains("No changes made to task 1."));
    }

    #[test]
    fn delete_requires_confirmation() {
        let (mut menu, service) = menu(vec![
            Answer::Select(Some(0)),
            Answer::Confirm(false),
            Answer::Select(Some(0)),
            Answer::Confirm(true),
        ]);
        service.add_task(NewTask::new("Walk dog")).unwrap();

        menu.perform(MenuAction::Delete).unwrap();
        assert_eq!(service.get_all_tasks().unwrap().len(), 1);

        menu.perform(MenuAction::Delete).unwrap();
        assert!(service.get_all_tasks().unwrap().is_empty());

        let out = output(menu);
        assert!(out.contains("Deletion cancelled."));
        assert!(out.contains("Task 1 deleted successfully!"));
    }

    #[test]
    fn complete_only_offers_pending_tasks() {
        let (mut menu, service) = menu(vec![Answer::Select(Some(0))]);
        let done = service.add_task(NewTask::new("done")).unwrap();
        service.mark_task_complete(done.id, true).unwrap();
        service.add_task(NewTask::new("pending")).unwrap();

        menu.perform(MenuAction::Complete).unwrap();

        // Index 0 of the filtered list is task 2, not task 1.
        assert!(service.find_task(2).unwrap().unwrap().completed);
        assert!(output(menu).contains("Task 2 marked as complete!"));
    }

    #[test]
    fn incomplete_only_offers_completed_tasks() {
        let (mut menu, service) = menu(vec![Answer::Select(Some(1))]);
        for title in ["a", "b", "c"] {
            let task = service.add_task(NewTask::new(title)).unwrap();
            if task.id != 2 {
                service.mark_task_complete(task.id, true).unwrap();
            }
        }

        menu.perform(MenuAction::Incomplete).unwrap();

        // Offered [1, 3]; index 1 is task 3.
        assert!(!service.find_task(3).unwrap().unwrap().completed);
        assert!(service.find_task(1).unwrap().unwrap().completed);
        assert!(output(menu).contains("Task 3 marked as incomplete!"));
    }

    #[test]
    fn actions_on_empty_list_print_notice() {
        let (mut menu, _service) = menu(vec![]);
        menu.perform(MenuAction::Update).unwrap();
        menu.perform(MenuAction::Complete).unwrap();
        assert_eq!(output(menu).matches("No tasks available!").count(), 2);
    }

    #[test]
    fn incomplete_with_nothing_completed() {
        let (mut menu, service) = menu(vec![]);
        service.add_task(NewTask::new("pending")).unwrap();

        menu.perform(MenuAction::Incomplete).unwrap();
        assert!(output(menu).contains("No completed tasks to mark as incomplete!"));
    }

    #[test]
    fn run_exits_on_exit_or_escape() {
        let exit_idx = MenuAction::ALL
            .iter()
            .position(|a| *a == MenuAction::Exit)
            .unwrap();
        let (mut menu, _) = menu(vec![Answer::Select(Some(1)), Answer::Select(Some(exit_idx))]);
        menu.run().unwrap();
        let out = output(menu);
        assert!(out.contains("No tasks found!"));
        assert!(out.contains("Goodbye!"));

        let (mut menu, _) = self::menu(vec![Answer::Select(None)]);
        menu.run().unwrap();
        assert!(output(menu).contains("Goodbye!"));
    }
}
