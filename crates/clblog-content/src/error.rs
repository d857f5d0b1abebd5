use clblog_store::{Namespace, StoreError};
use clblog_types::TypeError;
use thiserror::Error;

/// Errors from content operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContentError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: Namespace, id: String },

    #[error("invalid identifier: {0}")]
    InvalidIdentifier(#[from] TypeError),

    #[error("{kind} {id} has been deleted")]
    Deleted { kind: Namespace, id: String },

    #[error("comment {parent} does not belong to post {blog}")]
    ParentMismatch { parent: String, blog: String },

    #[error("{kind} already exists: {id}")]
    AlreadyExists { kind: Namespace, id: String },

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("record at {key} is not a {expected}")]
    WrongKind { key: String, expected: Namespace },

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl ContentError {
    pub(crate) fn not_found(kind: Namespace, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }

    pub(crate) fn deleted(kind: Namespace, id: impl Into<String>) -> Self {
        Self::Deleted {
            kind,
            id: id.into(),
        }
    }
}

pub type ContentResult<T> = Result<T, ContentError>;
