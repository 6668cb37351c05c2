use crate::agent::Assistant;
use crate::config::Config;
use crate::session::SessionStore;
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

mod error;
mod page;
mod routes;

pub use routes::AppState;

pub struct Server {
    config: Config,
    state: Arc<AppState>,
}

impl Server {
    pub fn new(config: Config, assistant: Arc<Assistant>, sessions: Arc<SessionStore>) -> Self {
        Self {
            config,
            state: Arc::new(AppState {
                assistant,
                sessions,
            }),
        }
    }

    pub async fn run(self) -> Result<()> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Failed to bind {addr}"))?;
        info!("HTTP server listening on {}", addr);

        axum::serve(listener, routes::router(self.state)).await?;
        Ok(())
    }
}
