/// Errors from object store operations.
///
/// Absence is not an error: lookups of missing keys return `Ok(None)`.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StoreError {
    /// `run_exclusive` was called from inside a body already holding the
    /// same store's gate. Waiting would deadlock, so the call is refused.
    #[error("nested run_exclusive on a store whose gate this task already holds")]
    ReentrantTransaction,

    /// A thread panicked while holding the record map lock.
    #[error("store lock poisoned")]
    LockPoisoned,
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
