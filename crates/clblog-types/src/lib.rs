//! Foundation types for clblog.
//!
//! Every other clblog crate depends on `clblog-types`. Nothing here touches
//! the object store; these are the leaf building blocks.
//!
//! # Key Types
//!
//! - [`Slug`]: validated, opaque identifier matching `^[A-Za-z0-9]+$`
//! - [`SlugGenerator`]: collision-free slug source for concurrent callers
//! - [`GlobalIndexCounter`]: process-wide strictly increasing comment index
//! - [`Clock`]: strictly monotonic wall-clock milliseconds

pub mod clock;
pub mod error;
pub mod index;
pub mod slug;

pub use clock::{Clock, UnixMillis};
pub use error::TypeError;
pub use index::GlobalIndexCounter;
pub use slug::{is_valid_name, is_valid_slug, Slug, SlugGenerator};
