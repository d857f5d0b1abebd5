use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use clblog_content::ContentError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("authentication required: {0}")]
    Unauthorized(String),

    #[error("not allowed to {action}")]
    Forbidden { action: String },

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Content(#[from] ContentError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServerResult<T> = Result<T, ServerError>;

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden { .. } => StatusCode::FORBIDDEN,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Content(e) => content_status(e),
            Self::Config(_) | Self::Io(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Identifiers in a request path name a resource; one that fails
/// validation names nothing, so it is a 404 like a missing record.
fn content_status(e: &ContentError) -> StatusCode {
    match e {
        ContentError::NotFound { .. }
        | ContentError::InvalidIdentifier(_)
        | ContentError::Deleted { .. } => StatusCode::NOT_FOUND,
        ContentError::ParentMismatch { .. } => StatusCode::BAD_REQUEST,
        ContentError::AlreadyExists { .. } => StatusCode::CONFLICT,
        ContentError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        ContentError::WrongKind { .. } | ContentError::Store(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clblog_store::{Namespace, StoreError};
    use clblog_types::TypeError;

    #[test]
    fn status_mapping() {
        assert_eq!(
            ServerError::Unauthorized("x".into()).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ServerError::Forbidden { action: "modify".into() }.status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ServerError::from(ContentError::InvalidIdentifier(TypeError::InvalidSlug(
                "a b".into()
            )))
            .status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ServerError::from(ContentError::Deleted {
                kind: Namespace::Comments,
                id: "abc".into()
            })
            .status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ServerError::from(ContentError::Store(StoreError::ReentrantTransaction)).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn response_body_carries_message() {
        let response = ServerError::BadRequest("content is required".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "bad request: content is required");
    }
}
