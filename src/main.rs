//! Todo task manager
//!
//! Interactive terminal menu over an in-memory list, or a REST API over
//! SQLite.

use anyhow::Result;
use clap::Parser;
use std::path::Path;
use todo_tasks::cli::{Cli, Command, menu, serve};
use todo_tasks::config::Config;
use todo_tasks::logging::{self, LogTarget};
use tracing::debug;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::resolve(cli.config.as_deref().map(Path::new))?;
    cli.apply_overrides(&mut config);

    // Keep the menu quiet unless asked; log lines would interleave with prompts.
    let level = match cli.command {
        Some(Command::Serve(_)) => config.logging.level.clone(),
        _ => "warn".to_string(),
    };
    logging::init(&LogTarget::parse(&cli.log), &level, cli.verbose)?;
    debug!(?config, "Effective configuration");

    match cli.command {
        Some(Command::Serve(_)) => serve::run(&config).await?,
        Some(Command::Menu(ref args)) => menu::run(&config, args)?,
        None => menu::run(&config, &menu::MenuArgs::default())?,
    }

    Ok(())
}
