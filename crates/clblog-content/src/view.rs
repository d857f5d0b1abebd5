//! External shapes.
//!
//! Pure reshaping of stored records into the camelCase JSON collaborators
//! send over the wire. No business logic lives here.

use clblog_types::UnixMillis;
use serde::{Deserialize, Serialize};

use crate::model::{Comment, Post};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    pub slug: String,
    pub author_name: String,
    pub title: String,
    pub content: String,
    pub path: String,
    pub date_created: UnixMillis,
    pub date_last_modified: UnixMillis,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    pub slug: String,
    pub blog_slug: String,
    pub parent_slug: Option<String>,
    pub author_name: String,
    pub content: String,
    pub date_created: UnixMillis,
    pub global_index: u64,
    pub has_children: bool,
}

impl From<&Post> for PostView {
    fn from(p: &Post) -> Self {
        Self {
            slug: p.slug.to_string(),
            author_name: p.author_name.clone(),
            title: p.title.clone(),
            content: p.content.clone(),
            path: p.path.clone(),
            date_created: p.date_created,
            date_last_modified: p.date_last_modified,
        }
    }
}

impl From<Post> for PostView {
    fn from(p: Post) -> Self {
        Self::from(&p)
    }
}

impl From<&Comment> for CommentView {
    fn from(c: &Comment) -> Self {
        Self {
            slug: c.slug.to_string(),
            blog_slug: c.blog_slug.to_string(),
            parent_slug: c.parent_slug.as_ref().map(ToString::to_string),
            author_name: c.author_name.clone(),
            content: c.content.clone(),
            date_created: c.date_created,
            global_index: c.global_index,
            has_children: c.has_children,
        }
    }
}

impl From<Comment> for CommentView {
    fn from(c: Comment) -> Self {
        Self::from(&c)
    }
}
