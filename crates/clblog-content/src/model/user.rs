use std::fmt;

use clblog_types::{is_valid_name, TypeError};
use serde::{Deserialize, Serialize};


/// Internal user record, carrying credential material.
///
/// Has no `Serialize` impl so it cannot be written to a response by
/// accident; convert with [`User::to_public`] first.
#[derive(Clone, PartialEq, Eq)]
pub struct User {
    pub name: String,
    /// Opaque credential material; this crate never interprets it.
    pub password: String,
    /// Current session token, empty when logged out.
    pub bearer_token: String,
}

impl User {
    /// A logged-out user. `name` must match `[A-Za-z0-9]+`.
    pub fn new(name: &str, password: impl Into<String>) -> Result<Self, TypeError> {
        if !is_valid_name(name) {
            return Err(TypeError::InvalidName(name.to_string()));
        }
        Ok(Self {
            name: name.to_string(),
            password: password.into(),
            bearer_token: String::new(),
        })
    }

    pub fn is_logged_in(&self) -> bool {
        !self.bearer_token.is_empty()
    }

    /// Copy with the session token replaced. Pass `""` to log out.
    pub fn with_token(&self, token: impl Into<String>) -> Self {
        Self {
            bearer_token: token.into(),
            ..self.clone()
        }
    }

    pub fn to_public(&self) -> PublicUser {
        PublicUser {
            name: self.name.clone(),
        }
    }
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("name", &self.name)
            .field("password", &"<redacted>")
            .field("logged_in", &self.is_logged_in())
            .finish()
    }
}

/// The externally visible user: a name and nothing else.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicUser {
    pub name: String,
}

/// Either view of a user. Only the public variant can be serialized.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UserView {
    Internal(User),
    Public(PublicUser),
}

impl UserView {
    pub fn name(&self) -> &str {
        match self {
            Self::Internal(u) => &u.name,
            Self::Public(u) => &u.name,
        }
    }

    /// Drop any credential material.
    pub fn into_public(self) -> PublicUser {
        match self {
            Self::Internal(u) => u.to_public(),
            Self::Public(u) => u,
        }
    }
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self::Internal(user)
    }
}

impl From<PublicUser> for UserView {
    fn from(user: PublicUser) -> Self {
        Self::Public(user)
    }
}
