//! HTTP server for clblog.
//!
//! Exposes the [`Blog`](clblog_content::Blog) façade as a JSON API with
//! bearer-token sessions. Everything here is a collaborator of the content
//! layer: authentication, ownership checks, input sanitization and the
//! demo data live in this crate, not in the lifecycle.

pub mod auth;
pub mod config;
pub mod credentials;
pub mod error;
pub mod handler;
pub mod router;
pub mod sanitize;
pub mod seed;
pub mod server;
pub mod state;

pub use auth::{Action, AuthProvider, Credentials, Identity, TokenAuth};
pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use seed::{seed_demo_data, SeedSummary};
pub use server::ClblogServer;
pub use state::AppState;

/// Version reported by `GET /`.
pub const API_VERSION: &str = "1.0";

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::util::ServiceExt;

    #[tokio::test]
    async fn home_endpoint() {
        let app = router::build_router(AppState::default());
        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["apiVersion"], API_VERSION);
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let app = router::build_router(AppState::default());
        let response = app
            .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), 404);
    }
}
