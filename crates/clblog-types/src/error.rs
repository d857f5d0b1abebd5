use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid slug: {0:?}")]
    InvalidSlug(String),

    #[error("invalid user name: {0:?}")]
    InvalidName(String),
}
