//! Authored content for clblog.
//!
//! Posts and comments share one lifecycle (`Created -> Edited* -> Deleted`)
//! and live in the shared [`RecordStore`]. Comments additionally form
//! threads under a post, ordered by a process-wide global index.
//!
//! The [`Blog`] façade is the entry point for collaborators. It runs every
//! multi-step mutation inside a store transaction and validates every
//! externally supplied identifier before it becomes a key.

pub mod blog;
pub mod error;
pub mod lifecycle;
pub mod model;
pub mod thread;
pub mod view;

pub use blog::{Blog, NewComment};
pub use error::{ContentError, ContentResult};
pub use lifecycle::{CommentDraft, LifecycleState, PostDraft, DELETED};
pub use model::{Comment, Post, PublicUser, Record, RecordStore, User, UserView};
pub use thread::{CommentQuery, ThreadIndex, NO_START_INDEX};
pub use view::{CommentView, PostView};

pub use clblog_types::{is_valid_slug, Slug};
