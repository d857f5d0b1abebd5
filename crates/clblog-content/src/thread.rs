//! Comment threading and cursor pagination.
//!
//! Threads are stored flat under `comments/`. Structure comes from each
//! comment's `blog_slug` and `parent_slug`; the `has_children` flag on a
//! parent is a latch set when a reply is attached, never recomputed.
//!
//! Pagination is driven by `global_index`, not by position in the sorted
//! output, so comments created after a cursor was issued never shift it.

use clblog_store::{Namespace, ObjectStore, Predicate};
use clblog_types::Slug;
use tracing::debug;

use crate::error::{ContentError, ContentResult};
use crate::model::record::{fetch, put};
use crate::model::{Comment, Record, RecordStore};

/// Cursor value meaning "no lower bound".
pub const NO_START_INDEX: i64 = -1;

/// Selects the direct children of one node in one post's thread.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommentQuery {
    pub blog_slug: Slug,
    /// `None` selects top-level comments only.
    pub parent_slug: Option<Slug>,
    /// Only comments with `global_index > start_index` match.
    pub start_index: i64,
}

impl CommentQuery {
    /// Top-level comments of `blog_slug`, no cursor.
    pub fn top_level(blog_slug: Slug) -> Self {
        Self {
            blog_slug,
            parent_slug: None,
            start_index: NO_START_INDEX,
        }
    }

    pub fn with_parent(mut self, parent_slug: Option<Slug>) -> Self {
        self.parent_slug = parent_slug;
        self
    }

    pub fn after(mut self, start_index: i64) -> Self {
        self.start_index = start_index;
        self
    }

    /// Exact match on post and parent (including the top-level case), and
    /// strictly past the cursor.
    pub fn matches(&self, comment: &Comment) -> bool {
        comment.blog_slug == self.blog_slug
            && comment.parent_slug == self.parent_slug
            && past_cursor(comment.global_index, self.start_index)
    }
}

fn past_cursor(global_index: u64, start_index: i64) -> bool {
    // Indices beyond i64::MAX are past any cursor.
    i64::try_from(global_index).map_or(true, |gi| gi > start_index)
}

/// Reads and writes thread structure through the shared store.
///
/// Callers that mutate (`reply_target` followed by `attach`) must do so
/// inside one `run_exclusive` body together with the child's own write.
pub struct ThreadIndex;

impl ThreadIndex {
    /// Re-fetch the comment being replied to and check it can take a reply.
    ///
    /// # Errors
    ///
    /// - [`ContentError::NotFound`] if no such comment exists.
    /// - [`ContentError::Deleted`] if it has been redacted.
    /// - [`ContentError::ParentMismatch`] if it belongs to another post.
    pub async fn reply_target(
        store: &RecordStore,
        blog_slug: &Slug,
        parent_slug: &Slug,
    ) -> ContentResult<Comment> {
        let parent = fetch(
            store,
            Namespace::Comments,
            parent_slug.as_str(),
            Record::into_comment,
        )
        .await?
        .ok_or_else(|| ContentError::not_found(Namespace::Comments, parent_slug.as_str()))?;

        if parent.is_deleted() {
            return Err(ContentError::deleted(Namespace::Comments, parent_slug.as_str()));
        }
        if &parent.blog_slug != blog_slug {
            return Err(ContentError::ParentMismatch {
                parent: parent_slug.to_string(),
                blog: blog_slug.to_string(),
            });
        }
        Ok(parent)
    }

    /// Write `parent` back with `has_children` latched on.
    pub async fn attach(store: &RecordStore, parent: &Comment) -> ContentResult<Comment> {
        let marked = parent.with_children();
        put(store, marked.clone().into()).await?;
        debug!(parent = %marked.slug, "reply attached");
        Ok(marked)
    }

    /// All comments matching `query`, oldest first.
    ///
    /// Ties on `date_created` are broken by `global_index`.
    pub async fn query(store: &RecordStore, query: &CommentQuery) -> ContentResult<Vec<Comment>> {
        let filter: Predicate<'_, Record> =
            &|r: &Record| r.as_comment().is_some_and(|c| query.matches(c));
        let mut comments: Vec<Comment> = store
            .scan(Namespace::Comments.prefix(), Some(filter))
            .await?
            .into_iter()
            .filter_map(Record::into_comment)
            .collect();
        comments.sort_by_key(|c| (c.date_created, c.global_index));
        Ok(comments)
    }
}
