//! Opaque entity identifiers.
//!
//! A slug is `[A-Za-z0-9]+`. Generated slugs are the hex tick followed by a
//! fixed-width hex random suffix, so they are unique without coordination
//! between callers and not guessable by counting.

use std::fmt;
use std::sync::Mutex;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Returns `true` iff `s` is non-empty and entirely ASCII alphanumeric.
///
/// Collaborators run every externally supplied identifier through this
/// before it becomes part of a store key.
pub fn is_valid_slug(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_alphanumeric())
}

/// User names follow the same alphabet as slugs.
pub fn is_valid_name(s: &str) -> bool {
    is_valid_slug(s)
}

/// A validated slug.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Slug(String);

impl Slug {
    /// Validate and wrap an externally supplied identifier.
    pub fn parse(s: &str) -> Result<Self, TypeError> {
        if is_valid_slug(s) {
            Ok(Self(s.to_string()))
        } else {
            Err(TypeError::InvalidSlug(s.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Slug {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if is_valid_slug(&value) {
            Ok(Self(value))
        } else {
            Err(TypeError::InvalidSlug(value))
        }
    }
}

impl From<Slug> for String {
    fn from(slug: Slug) -> Self {
        slug.0
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Slug({})", self.0)
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Source of unique slugs.
///
/// Holds one shared tick seeded from wall-clock milliseconds. Every call
/// moves the tick to `max(wall_clock, tick + 1)` under the lock, so no two
/// calls ever observe the same tick, and then appends 32 random bits.
/// Throughput is not bounded by clock resolution: within one millisecond the
/// tick simply runs ahead of the wall clock.
pub struct SlugGenerator {
    tick: Mutex<u64>,
}

impl SlugGenerator {
    pub fn new() -> Self {
        Self {
            tick: Mutex::new(Self::wall_clock_ms()),
        }
    }

    /// Generate a fresh slug, distinct from every other slug this generator
    /// has produced.
    pub fn new_slug(&self) -> Slug {
        let tick = self.advance();
        let suffix: u32 = rand::thread_rng().gen();
        Slug(format!("{tick:x}{suffix:08x}"))
    }

    fn advance(&self) -> u64 {
        let wall = Self::wall_clock_ms();
        let mut tick = self.tick.lock().unwrap_or_else(|e| e.into_inner());
        *tick = wall.max(*tick + 1);
        *tick
    }

    fn wall_clock_ms() -> u64 {
        chrono::Utc::now().timestamp_millis().max(0) as u64
    }
}

impl Default for SlugGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SlugGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlugGenerator").finish_non_exhaustive()
    }
}
