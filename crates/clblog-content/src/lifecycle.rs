//! Content lifecycle shared by posts and comments.
//!
//! ```text
//! Created --edit--> Edited --edit--> Edited
//!    |                 |
//!    +-----delete------+-----> Deleted (terminal)
//! ```
//!
//! Every transition is a pure function from the current snapshot to a new
//! one; callers write the result back under the same key. No ownership
//! checks happen here. Comments have no edit transition.
//!
//! A record is deleted when its author is the `[deleted]` sentinel. Real
//! author names are `[A-Za-z0-9]+`, so the sentinel cannot collide with one.

use clblog_store::Namespace;
use clblog_types::{Slug, UnixMillis};

use crate::error::{ContentError, ContentResult};
use crate::model::{Comment, Post};

/// Replacement text for redacted fields.
pub const DELETED: &str = "[deleted]";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LifecycleState {
    Created,
    Edited,
    Deleted,
}

/// Fields a user supplies when creating a post.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PostDraft {
    pub author_name: String,
    pub title: String,
    pub content: String,
}

/// Fields a user supplies when creating a comment, after validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommentDraft {
    pub blog_slug: Slug,
    pub parent_slug: Option<Slug>,
    pub author_name: String,
    pub content: String,
}

impl Post {
    /// Create: `date_created == date_last_modified == now`.
    pub fn create(draft: PostDraft, slug: Slug, now: UnixMillis) -> Self {
        let path = format!("/{slug}/{}", encode_uri_component(&draft.title));
        Self {
            slug,
            author_name: draft.author_name,
            title: draft.title,
            content: draft.content,
            path,
            date_created: now,
            date_last_modified: now,
        }
    }

    /// Edit: replace title and content, keep identity and authorship.
    ///
    /// # Errors
    ///
    /// [`ContentError::Deleted`] if the post was already deleted.
    pub fn edit(&self, title: String, content: String, now: UnixMillis) -> ContentResult<Self> {
        if self.is_deleted() {
            return Err(ContentError::deleted(Namespace::Blogs, self.slug.as_str()));
        }
        Ok(Self {
            title,
            content,
            date_last_modified: now,
            ..self.clone()
        })
    }

    /// Delete: redact title, author and content. Repeating it yields the
    /// same redacted fields with a newer `date_last_modified`.
    pub fn redact(&self, now: UnixMillis) -> Self {
        Self {
            title: DELETED.to_string(),
            author_name: DELETED.to_string(),
            content: DELETED.to_string(),
            date_last_modified: now,
            ..self.clone()
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.author_name == DELETED
    }

    pub fn state(&self) -> LifecycleState {
        if self.is_deleted() {
            LifecycleState::Deleted
        } else if self.date_last_modified > self.date_created {
            LifecycleState::Edited
        } else {
            LifecycleState::Created
        }
    }
}

impl Comment {
    /// Create a comment with no children yet.
    pub fn create(draft: CommentDraft, slug: Slug, global_index: u64, now: UnixMillis) -> Self {
        Self {
            slug,
            blog_slug: draft.blog_slug,
            parent_slug: draft.parent_slug,
            author_name: draft.author_name,
            content: draft.content,
            date_created: now,
            global_index,
            has_children: false,
        }
    }

    /// Delete: redact author and content only. Thread structure, index,
    /// creation time and `has_children` are kept verbatim.
    pub fn redact(&self) -> Self {
        Self {
            author_name: DELETED.to_string(),
            content: DELETED.to_string(),
            ..self.clone()
        }
    }

    /// Copy with `has_children` latched on.
    pub fn with_children(&self) -> Self {
        Self {
            has_children: true,
            ..self.clone()
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.author_name == DELETED
    }

    pub fn state(&self) -> LifecycleState {
        if self.is_deleted() {
            LifecycleState::Deleted
        } else {
            LifecycleState::Created
        }
    }
}

/// Percent-encode everything except `A-Z a-z 0-9 - _ . ! ~ * ' ( )`.
pub fn encode_uri_component(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => out.push(byte as char),
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}
