//! Configuration loading and management.
//!
//! Lookup order, first file found wins:
//! 1. `--config`, else `TODO_TASKS_CONFIG_PATH`
//! 2. `./todo-tasks/config.yaml`
//! 3. `~/.todo-tasks/config.yaml`
//!
//! Environment variables are applied on top of whichever source was used:
//! - `TODO_TASKS_DB_PATH` - Database path
//! - `TODO_TASKS_HOST` / `TODO_TASKS_PORT` - API bind address
//! - `TODO_TASKS_LOG_LEVEL` - Default log filter
//! - `TODO_TASKS_DEBUG` - Expose internal error details in API responses

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const CONFIG_PATH_ENV: &str = "TODO_TASKS_CONFIG_PATH";
const PROJECT_CONFIG: &str = "todo-tasks/config.yaml";
const USER_CONFIG_DIR: &str = ".todo-tasks";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Database configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// HTTP API configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Mount point of the task routes. Empty mounts them at the root.
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,

    /// `limit` used by `GET /tasks` when the query omits it.
    #[serde(default = "default_page_size")]
    pub default_page_size: usize,

    /// Include internal error causes in 500 responses.
    #[serde(default)]
    pub debug: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            api_prefix: default_api_prefix(),
            default_page_size: default_page_size(),
            debug: false,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive, e.g. `info` or `todo_tasks=debug`.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("todo-tasks/tasks.db")
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_api_prefix() -> String {
    "/api/v1".to_string()
}

fn default_page_size() -> usize {
    100
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }

    /// Resolve the config file, load it, then apply environment overrides.
    ///
    /// `explicit` (from `--config`) takes precedence over
    /// `TODO_TASKS_CONFIG_PATH`. An explicit path that cannot be read is an
    /// error; missing default locations fall back to built-in defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        let explicit = explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from));

        let mut config = match explicit {
            Some(path) => Self::load(path)?,
            None => match Self::candidate_paths().into_iter().find(|p| p.is_file()) {
                Some(path) => {
                    debug!(path = %path.display(), "Loading config");
                    Self::load(path)?
                }
                None => Self::default(),
            },
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Default config file locations, highest priority first.
    pub fn candidate_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(PROJECT_CONFIG)];
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(USER_CONFIG_DIR).join("config.yaml"));
        }
        paths
    }

    /// Apply overrides from an environment lookup.
    ///
    /// Unparsable numeric or boolean values are ignored.
    pub fn apply_env<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(db_path) = var("TODO_TASKS_DB_PATH") {
            self.database.path = PathBuf::from(db_path);
        }

        if let Some(host) = var("TODO_TASKS_HOST") {
            self.server.host = host;
        }

        if let Some(port) = var("TODO_TASKS_PORT").and_then(|p| p.parse().ok()) {
            self.server.port = port;
        }

        if let Some(level) = var("TODO_TASKS_LOG_LEVEL") {
            self.logging.level = level;
        }

        if let Some(debug) = var("TODO_TASKS_DEBUG").and_then(|d| parse_bool(&d)) {
            self.server.debug = debug;
        }
    }

    /// Ensure the database directory exists.
    pub fn ensure_db_dir(&self) -> Result<()> {
        if let Some(parent) = self.database.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
