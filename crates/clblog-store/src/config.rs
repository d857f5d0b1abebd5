use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Tuning knobs for [`InMemoryObjectStore`](crate::InMemoryObjectStore).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Artificial delay applied to every get/set/scan, imitating a remote
    /// database round trip. `None` means no delay.
    pub simulated_latency_ms: Option<u64>,
}

impl StoreConfig {
    /// A configuration that delays every operation by `ms` milliseconds.
    pub fn with_latency_ms(ms: u64) -> Self {
        Self {
            simulated_latency_ms: Some(ms),
        }
    }

    pub fn latency(&self) -> Option<Duration> {
        self.simulated_latency_ms
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_has_no_latency() {
        let c = StoreConfig::default();
        assert_eq!(c.simulated_latency_ms, None);
        assert!(c.latency().is_none());
    }

    #[test]
    fn zero_latency_is_no_latency() {
        assert!(StoreConfig::with_latency_ms(0).latency().is_none());
    }

    #[test]
    fn latency_in_millis() {
        let c = StoreConfig::with_latency_ms(20);
        assert_eq!(c.latency(), Some(Duration::from_millis(20)));
    }

    #[test]
    fn deserializes_from_toml() {
        let c: StoreConfig = toml::from_str("simulated_latency_ms = 5").unwrap();
        assert_eq!(c, StoreConfig::with_latency_ms(5));
        let empty: StoreConfig = toml::from_str("").unwrap();
        assert_eq!(empty, StoreConfig::default());
    }
}
