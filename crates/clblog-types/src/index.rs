use std::sync::atomic::{AtomicU64, Ordering};

/// Process-wide comment ordering counter.
///
/// Every call to [`next`](Self::next) returns a value strictly greater than
/// all previous values, starting at 1. Used only as the pagination cursor
/// for comments; it shares nothing with [`SlugGenerator`](crate::SlugGenerator).
#[derive(Debug)]
pub struct GlobalIndexCounter {
    next: AtomicU64,
}

impl GlobalIndexCounter {
    pub fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
        }
    }

    pub fn next(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for GlobalIndexCounter {
    fn default() -> Self {
        Self::new()
    }
}
