//! REST API over a [`TaskService`](crate::service::TaskService).

pub mod dto;
mod error;
mod routes;
mod server;

pub use error::ApiError;
pub use routes::ApiState;
pub use server::{ServerHandle, build_router, start_server};
