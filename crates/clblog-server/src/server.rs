use std::sync::Arc;

use clblog_content::Blog;
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::router::build_router;
use crate::seed::seed_demo_data;
use crate::state::AppState;

/// clblog HTTP server.
pub struct ClblogServer {
    config: ServerConfig,
    state: AppState,
}

impl ClblogServer {
    pub fn new(config: ServerConfig) -> Self {
        let blog = Arc::new(Blog::with_config(config.store.clone()));
        Self {
            config,
            state: AppState::new(blog),
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn blog(&self) -> &Blog {
        &self.state.blog
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(self.state.clone())
    }

    /// Seed if configured, then serve requests until the listener fails.
    pub async fn serve(self) -> ServerResult<()> {
        if self.config.seed_demo_data {
            seed_demo_data(&self.state.blog).await?;
        }
        let app = build_router(self.state);
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        tracing::info!("clblog listening on {}", self.config.bind_addr);
        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}
