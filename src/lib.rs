//! Todo task manager library.
//!
//! One task model, one [`store::TaskStore`] contract with an in-memory and a
//! SQLite implementation, a [`service::TaskService`] façade, and two front
//! ends: the interactive menu and the REST API.

pub mod api;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod format;
pub mod logging;
pub mod service;
pub mod store;
pub mod types;
