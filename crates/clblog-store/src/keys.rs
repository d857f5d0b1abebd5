//! Key namespaces.
//!
//! The layout is stable and shared with every collaborator:
//! `users/{name}`, `blogs/{slug}`, `comments/{slug}`.

use std::fmt;

/// Entity kinds and their key prefixes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Namespace {
    Users,
    Blogs,
    Comments,
}

impl Namespace {
    /// The key prefix, including the trailing `/`.
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Users => "users/",
            Self::Blogs => "blogs/",
            Self::Comments => "comments/",
        }
    }

    /// Full key for `id` in this namespace.
    ///
    /// `id` must already be validated; this does no checking.
    pub fn key(self, id: &str) -> String {
        format!("{}{id}", self.prefix())
    }

    /// Splits a full key into its namespace and id, if it belongs to one.
    pub fn split(key: &str) -> Option<(Self, &str)> {
        [Self::Users, Self::Blogs, Self::Comments]
            .into_iter()
            .find_map(|ns| key.strip_prefix(ns.prefix()).map(|id| (ns, id)))
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix().trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixes_are_stable() {
        assert_eq!(Namespace::Users.prefix(), "users/");
        assert_eq!(Namespace::Blogs.prefix(), "blogs/");
        assert_eq!(Namespace::Comments.prefix(), "comments/");
    }

    #[test]
    fn key_joins_prefix_and_id() {
        assert_eq!(Namespace::Users.key("Alice"), "users/Alice");
        assert_eq!(Namespace::Comments.key("abc123"), "comments/abc123");
    }

    #[test]
    fn split_recovers_namespace() {
        assert_eq!(Namespace::split("blogs/xyz"), Some((Namespace::Blogs, "xyz")));
        assert_eq!(Namespace::split("other/xyz"), None);
    }

    #[test]
    fn display_drops_slash() {
        assert_eq!(Namespace::Comments.to_string(), "comments");
    }
}
