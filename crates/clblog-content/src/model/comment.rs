use clblog_types::{Slug, UnixMillis};

/// A threaded reply on a post.
///
/// Everything except `author_name`, `content` and `has_children` is fixed
/// at creation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Comment {
    pub slug: Slug,
    /// Owning post.
    pub blog_slug: Slug,
    /// Comment this replies to; `None` for top-level comments.
    pub parent_slug: Option<Slug>,
    pub author_name: String,
    pub content: String,
    pub date_created: UnixMillis,
    /// Pagination cursor, unique across all comments.
    pub global_index: u64,
    /// Latched to `true` the first time a reply is attached. Never cleared.
    pub has_children: bool,
}

impl Comment {
    pub fn is_top_level(&self) -> bool {
        self.parent_slug.is_none()
    }
}
