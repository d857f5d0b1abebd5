use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use clblog_content::{Blog, PublicUser};
use tracing::{debug, warn};

use crate::error::{ServerError, ServerResult};

/// Display name of an unauthenticated caller.
pub const GUEST_NAME: &str = "Guest";

/// Who is making the request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Identity {
    Guest,
    User(PublicUser),
}

impl Identity {
    pub fn name(&self) -> &str {
        match self {
            Self::Guest => GUEST_NAME,
            Self::User(u) => &u.name,
        }
    }
}

/// What the request carried to prove who it is.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Credentials {
    Bearer(String),
    Anonymous,
}

impl Credentials {
    /// Read `Authorization: Bearer <token>`. Anything else is anonymous.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let Some(value) = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) else {
            return Self::Anonymous;
        };
        let mut bits = value.split(' ');
        match (bits.next(), bits.next(), bits.next()) {
            (Some("Bearer"), Some(token), None) if !token.is_empty() => {
                Self::Bearer(token.to_string())
            }
            _ => Self::Anonymous,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    Read,
    Create,
    /// Edit or delete a record authored by `owner`.
    Modify { owner: String },
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read => write!(f, "read"),
            Self::Create => write!(f, "create"),
            Self::Modify { owner } => write!(f, "modify content owned by {owner}"),
        }
    }
}

#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn authenticate(&self, credentials: &Credentials) -> ServerResult<Identity>;
    async fn authorize(&self, identity: &Identity, action: &Action) -> ServerResult<()>;
}

/// Resolves bearer tokens against the users stored in a [`Blog`].
///
/// Reading is open to everyone. Creating needs a logged-in user, and
/// modifying needs the logged-in user to be the record's author.
pub struct TokenAuth {
    blog: Arc<Blog>,
}

impl TokenAuth {
    pub fn new(blog: Arc<Blog>) -> Self {
        Self { blog }
    }
}

#[async_trait]
impl AuthProvider for TokenAuth {
    async fn authenticate(&self, credentials: &Credentials) -> ServerResult<Identity> {
        match credentials {
            Credentials::Bearer(token) => match self.blog.user_by_token(token).await? {
                Some(user) => {
                    debug!(user = %user.name, "authenticated");
                    Ok(Identity::User(user.to_public()))
                }
                None => {
                    warn!("unknown bearer token");
                    Ok(Identity::Guest)
                }
            },
            Credentials::Anonymous => Ok(Identity::Guest),
        }
    }

    async fn authorize(&self, identity: &Identity, action: &Action) -> ServerResult<()> {
        match (action, identity) {
            (Action::Read, _) => Ok(()),
            (_, Identity::Guest) => Err(ServerError::Unauthorized(format!(
                "log in to {action}"
            ))),
            (Action::Create, Identity::User(_)) => Ok(()),
            (Action::Modify { owner }, Identity::User(user)) if &user.name == owner => Ok(()),
            (Action::Modify { .. }, Identity::User(user)) => {
                warn!(user = %user.name, %action, "ownership check failed");
                Err(ServerError::Forbidden {
                    action: action.to_string(),
                })
            }
        }
    }
}

impl fmt::Debug for TokenAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenAuth").finish_non_exhaustive()
    }
}
