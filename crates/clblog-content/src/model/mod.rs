//! Stored entity records.
//!
//! These are the internal shapes held in the store. External shapes live in
//! [`crate::view`]; the internal [`User`] deliberately has no serializer.

pub mod comment;
pub mod post;
pub mod record;
pub mod user;

pub use comment::Comment;
pub use post::Post;
pub use record::{Record, RecordStore};
pub use user::{PublicUser, User, UserView};
