use std::sync::Mutex;

/// Milliseconds since the UNIX epoch.
pub type UnixMillis = i64;

/// Wall clock that never repeats or goes backwards.
///
/// Each reading is `max(wall_clock, previous + 1)`, so two readings taken in
/// the same millisecond still compare strictly. Lifecycle transitions take
/// their timestamps from here, which is what keeps `dateLastModified`
/// strictly increasing across back-to-back edits.
pub struct Clock {
    last: Mutex<UnixMillis>,
}

impl Clock {
    pub fn new() -> Self {
        Self {
            last: Mutex::new(0),
        }
    }

    /// Current time in milliseconds, strictly after every earlier reading.
    pub fn now_ms(&self) -> UnixMillis {
        let wall = Self::wall_clock_ms();
        // A poisoned lock still holds a valid integer.
        let mut last = self.last.lock().unwrap_or_else(|e| e.into_inner());
        let next = wall.max(*last + 1);
        *last = next;
        next
    }

    fn wall_clock_ms() -> UnixMillis {
        chrono::Utc::now().timestamp_millis()
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Clock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Clock").finish_non_exhaustive()
    }
}
