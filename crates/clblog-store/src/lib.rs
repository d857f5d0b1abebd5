//! Shared object store for clblog.
//!
//! A single key/value space holds every record in the system. Keys are
//! namespaced by a path-like prefix per entity kind (`users/`, `blogs/`,
//! `comments/`). Records are immutable snapshots: mutation means read,
//! derive a new value, and write it back under the same key. Nothing is ever
//! removed.
//!
//! # Storage Backends
//!
//! All backends implement the [`ObjectStore`] trait:
//!
//! - [`InMemoryObjectStore`] -- `BTreeMap`-based store, the only backend
//!
//! # Transaction Discipline
//!
//! 1. One mutual-exclusion gate covers the entire keyspace.
//! 2. [`InMemoryObjectStore::run_exclusive`] callers queue in FIFO order.
//! 3. A body must not open another transaction on the same store; doing so
//!    fails fast with [`StoreError::ReentrantTransaction`].
//! 4. There is no rollback. Writes issued before a body fails stay applied.
//! 5. Point reads and writes outside a transaction are allowed but are not
//!    ordered against transaction bodies. Mutations belong inside one.

pub mod config;
pub mod error;
pub mod keys;
pub mod memory;
pub mod traits;

pub use config::StoreConfig;
pub use error::{StoreError, StoreResult};
pub use keys::Namespace;
pub use memory::InMemoryObjectStore;
pub use traits::{ObjectStore, Predicate};
