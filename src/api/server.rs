//! axum router construction and server lifecycle.

use super::routes::{self, ApiState};
use crate::config::ServerConfig;
use crate::service::TaskService;
use axum::Router;
use axum::routing::{get, patch};
use std::net::SocketAddr;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

/// Normalize the configured mount point: leading slash, no trailing slash.
/// Returns `None` for the root.
fn normalize_prefix(prefix: &str) -> Option<String> {
    let trimmed = prefix.trim().trim_matches('/');
    if trimmed.is_empty() {
        None
    } else {
        Some(format!("/{}", trimmed))
    }
}

/// Build the router with all routes.
pub fn build_router(service: TaskService, config: &ServerConfig) -> Router {
    let state = ApiState::new(service, config.default_page_size, config.debug);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let tasks = Router::new()
        .route("/tasks", get(routes::list_tasks).post(routes::create_task))
        .route(
            "/tasks/{task_id}",
            get(routes::get_task)
                .put(routes::update_task)
                .delete(routes::delete_task),
        )
        .route("/tasks/{task_id}/status", patch(routes::update_task_status));

    let router = Router::new()
        .route("/", get(routes::root))
        .route("/health", get(routes::health));

    let router = match normalize_prefix(&config.api_prefix) {
        Some(prefix) => router.nest(&prefix, tasks),
        None => router.merge(tasks),
    };

    router
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// A running API server.
pub struct ServerHandle {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl ServerHandle {
    /// Address the server is bound to.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Stop accepting connections and wait for in-flight requests.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Err(e) = self.task.await {
            tracing::error!("API server task failed: {}", e);
        }
    }
}

/// Bind and start serving in the background.
///
/// Port 0 binds an ephemeral port; see [`ServerHandle::addr`].
pub async fn start_server(service: TaskService, config: &ServerConfig) -> anyhow::Result<ServerHandle> {
    let app = build_router(service, config);

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;
    let addr = listener.local_addr()?;

    info!("Task API listening on http://{}", addr);

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let task = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
                info!("Task API shutting down");
            })
            .await
        {
            tracing::error!("Task API server error: {}", e);
        }
    });

    Ok(ServerHandle {
        addr,
        shutdown_tx: Some(shutdown_tx),
        task,
    })
}
