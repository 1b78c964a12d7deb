//! `serve` subcommand: REST API over the SQLite store.

use crate::api;
use crate::config::Config;
use crate::db::Database;
use crate::service::TaskService;
use anyhow::Result;
use clap::Args;
use std::sync::Arc;
use tracing::info;

/// Arguments for the serve subcommand
#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// Address to bind (overrides config)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on (overrides config)
    #[arg(short, long)]
    pub port: Option<u16>,
}

/// Open the database, serve until Ctrl-C, then close the database.
pub async fn run(config: &Config) -> Result<()> {
    config.ensure_db_dir()?;
    let db = Database::open(&config.database.path)?;
    let service = TaskService::new(Arc::new(db.clone()));

    let handle = api::start_server(service, &config.server).await?;
    info!(addr = %handle.addr(), "Press Ctrl-C to stop");

    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received");

    handle.shutdown().await;
    db.close()?;
    Ok(())
}
