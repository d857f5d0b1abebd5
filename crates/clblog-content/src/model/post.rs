use clblog_types::{Slug, UnixMillis};

/// A blog post.
///
/// `slug`, `path` and `date_created` never change after creation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Post {
    pub slug: Slug,
    pub author_name: String,
    pub title: String,
    pub content: String,
    /// Human-readable location: `/{slug}/{url-encoded title at creation}`.
    pub path: String,
    pub date_created: UnixMillis,
    pub date_last_modified: UnixMillis,
}
