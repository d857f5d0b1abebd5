use std::collections::BTreeMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::traits::{ObjectStore, Predicate};

static NEXT_STORE_ID: AtomicU64 = AtomicU64::new(1);

tokio::task_local! {
    /// Ids of the stores whose gate the current task holds.
    static HELD_GATES: Vec<u64>;
}

/// In-memory, `BTreeMap`-based object store.
///
/// Values live behind a `RwLock` that is only held for the duration of a
/// single map access, never across an await. Transactions serialize on a
/// separate FIFO-fair async gate that covers the whole keyspace.
pub struct InMemoryObjectStore<V> {
    id: u64,
    records: RwLock<BTreeMap<String, V>>,
    gate: Mutex<()>,
    config: StoreConfig,
}

impl<V> InMemoryObjectStore<V> {
    /// Create a new empty store with no simulated latency.
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    pub fn with_config(config: StoreConfig) -> Self {
        Self {
            id: NEXT_STORE_ID.fetch_add(1, Ordering::Relaxed),
            records: RwLock::new(BTreeMap::new()),
            gate: Mutex::new(()),
            config,
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Number of records currently stored.
    pub fn len(&self) -> usize {
        // A poisoned map is still a consistent map; every write is one insert.
        self.records
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[cfg(test)]
    fn in_transaction(&self) -> bool {
        HELD_GATES
            .try_with(|held| held.contains(&self.id))
            .unwrap_or(false)
    }

    /// Run `body` while holding the store-wide gate.
    ///
    /// No other `run_exclusive` body on this store executes while `body`
    /// does; waiting callers are admitted in arrival order. The body's result
    /// is returned as-is after the gate is released, including failures.
    ///
    /// The gate is released even if `body` panics.
    ///
    /// # Errors
    ///
    /// Calling this from inside a body already running on the same store
    /// returns [`StoreError::ReentrantTransaction`] (converted into `E`)
    /// without running `body`.
    ///
    /// # No rollback
    ///
    /// Writes `body` issued before failing are not undone. Callers must keep
    /// their writes idempotent or order them so a partial body is harmless.
    ///
    /// # Hazard
    ///
    /// There is no timeout. A body that never completes blocks every later
    /// transaction on this store.
    pub async fn run_exclusive<T, E, F, Fut>(&self, body: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: From<StoreError>,
    {
        let mut held = HELD_GATES.try_with(|h| h.clone()).unwrap_or_default();
        if held.contains(&self.id) {
            warn!(store = self.id, "refusing reentrant transaction");
            return Err(StoreError::ReentrantTransaction.into());
        }
        held.push(self.id);

        let outcome = {
            let _gate = self.gate.lock().await;
            debug!(store = self.id, "transaction begin");
            HELD_GATES.scope(held, body()).await
        };

        if outcome.is_err() {
            debug!(
                store = self.id,
                "transaction body failed; earlier writes remain applied"
            );
        } else {
            debug!(store = self.id, "transaction end");
        }
        outcome
    }

    async fn pause(&self) {
        if let Some(latency) = self.config.latency() {
            tokio::time::sleep(latency).await;
        }
    }
}

impl<V> Default for InMemoryObjectStore<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<V> ObjectStore for InMemoryObjectStore<V>
where
    V: Clone + Send + Sync,
{
    type Value = V;

    async fn get(&self, key: &str) -> StoreResult<Option<V>> {
        self.pause().await;
        let map = self.records.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(map.get(key).cloned())
    }

    async fn set(&self, key: &str, value: V) -> StoreResult<()> {
        self.pause().await;
        let mut map = self.records.write().map_err(|_| StoreError::LockPoisoned)?;
        map.insert(key.to_string(), value);
        debug!(key, "record written");
        Ok(())
    }

    async fn scan(&self, prefix: &str, filter: Option<Predicate<'_, V>>) -> StoreResult<Vec<V>> {
        self.pause().await;
        let map = self.records.read().map_err(|_| StoreError::LockPoisoned)?;
        let found: Vec<V> = map
            .range(prefix.to_string()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(_, v)| v)
            .filter(|v| filter.map_or(true, |f| f(*v)))
            .cloned()
            .collect();
        debug!(prefix, matched = found.len(), "scan");
        Ok(found)
    }
}

impl<V> std::fmt::Debug for InMemoryObjectStore<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryObjectStore")
            .field("id", &self.id)
            .field("record_count", &self.len())
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    type Store = InMemoryObjectStore<i64>;

    // -----------------------------------------------------------------------
    // Point operations
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn get_missing_is_none() {
        let store = Store::new();
        assert_eq!(store.get("blogs/nope").await.unwrap(), None);
        assert!(!store.contains("blogs/nope").await.unwrap());
    }

    #[tokio::test]
    async fn set_then_get() {
        let store = Store::new();
        store.set("users/Alice", 7).await.unwrap();
        assert_eq!(store.get("users/Alice").await.unwrap(), Some(7));
        assert!(store.contains("users/Alice").await.unwrap());
    }

    #[tokio::test]
    async fn set_overwrites() {
        let store = Store::new();
        store.set("k", 1).await.unwrap();
        store.set("k", 2).await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some(2));
        assert_eq!(store.len(), 1);
    }

    // -----------------------------------------------------------------------
    // Scans
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn scan_respects_prefix() {
        let store = Store::new();
        store.set("comments/a", 1).await.unwrap();
        store.set("comments/b", 2).await.unwrap();
        store.set("blogs/a", 3).await.unwrap();
        store.set("commentsX", 4).await.unwrap();

        let mut found = store.scan("comments/", None).await.unwrap();
        found.sort_unstable();
        assert_eq!(found, vec![1, 2]);
    }

    #[tokio::test]
    async fn scan_applies_filter() {
        let store = Store::new();
        for (i, k) in ["users/a", "users/b", "users/c"].iter().enumerate() {
            store.set(k, i as i64).await.unwrap();
        }
        let even: Predicate<'_, i64> = &|v: &i64| v % 2 == 0;
        let mut found = store.scan("users/", Some(even)).await.unwrap();
        found.sort_unstable();
        assert_eq!(found, vec![0, 2]);
    }

    #[tokio::test]
    async fn scan_empty_prefix_returns_everything() {
        let store = Store::new();
        store.set("a/1", 1).await.unwrap();
        store.set("b/1", 2).await.unwrap();
        assert_eq!(store.scan("", None).await.unwrap().len(), 2);
    }

    // -----------------------------------------------------------------------
    // Transactions
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn run_exclusive_returns_body_result() {
        let store = Store::new();
        let out: StoreResult<i64> = store
            .run_exclusive(|| async {
                store.set("k", 41).await?;
                Ok(store.get("k").await?.unwrap_or(0) + 1)
            })
            .await;
        assert_eq!(out, Ok(42));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_read_modify_write_never_loses_increments() {
        let store = Arc::new(Store::with_config(StoreConfig::with_latency_ms(1)));
        store.set("counter", 0).await.unwrap();

        const K: usize = 40;
        let handles: Vec<_> = (0..K)
            .map(|_| {
                let store = Arc::clone(&store);
                tokio::spawn(async move {
                    store
                        .run_exclusive(|| async {
                            let current = store.get("counter").await?.unwrap_or(0);
                            tokio::task::yield_now().await;
                            store.set("counter", current + 1).await
                        })
                        .await
                })
            })
            .collect();

        for h in handles {
            h.await.unwrap().unwrap();
        }
        assert_eq!(store.get("counter").await.unwrap(), Some(K as i64));
    }

    async fn bump<S: ObjectStore<Value = i64>>(store: &S, key: &str) -> StoreResult<i64> {
        let next = store.get(key).await?.unwrap_or(0) + 1;
        store.set(key, next).await?;
        Ok(next)
    }

    #[tokio::test]
    async fn generic_store_code_runs_inside_a_transaction() {
        let store = Store::new();
        let out = store
            .run_exclusive(|| async {
                bump(&store, "n").await?;
                bump(&store, "n").await
            })
            .await;
        assert_eq!(out, Ok(2));
        assert_eq!(store.get("n").await.unwrap(), Some(2));
    }

    #[tokio::test]
    async fn reentrant_call_fails_fast() {
        let store = Store::new();
        let out: StoreResult<()> = store
            .run_exclusive(|| async {
                assert!(store.in_transaction());
                store.run_exclusive(|| async { Ok::<_, StoreError>(()) }).await
            })
            .await;
        assert_eq!(out, Err(StoreError::ReentrantTransaction));
        assert!(!store.in_transaction());
    }

    #[tokio::test]
    async fn nesting_across_different_stores_is_allowed() {
        let outer = Store::new();
        let inner = Store::new();
        let out: StoreResult<Option<i64>> = outer
            .run_exclusive(|| async {
                inner
                    .run_exclusive(|| async {
                        inner.set("k", 5).await?;
                        inner.get("k").await
                    })
                    .await
            })
            .await;
        assert_eq!(out, Ok(Some(5)));
    }

    #[tokio::test]
    async fn failed_body_keeps_earlier_writes() {
        #[derive(Debug, PartialEq)]
        enum BodyError {
            Store(StoreError),
            Boom,
        }
        impl From<StoreError> for BodyError {
            fn from(e: StoreError) -> Self {
                Self::Store(e)
            }
        }

        let store = Store::new();
        let out: Result<(), BodyError> = store
            .run_exclusive(|| async {
                store.set("first", 1).await?;
                Err(BodyError::Boom)
            })
            .await;
        assert_eq!(out, Err(BodyError::Boom));
        assert_eq!(store.get("first").await.unwrap(), Some(1));

        // The gate was released.
        let again: StoreResult<()> = store.run_exclusive(|| async { Ok(()) }).await;
        assert!(again.is_ok());
    }

    #[tokio::test]
    async fn panicking_body_releases_gate() {
        let store = Arc::new(Store::new());
        let s = Arc::clone(&store);
        let joined = tokio::spawn(async move {
            s.run_exclusive(|| async {
                s.set("half", 1).await?;
                if s.in_transaction() {
                    panic!("body exploded");
                }
                Ok::<(), StoreError>(())
            })
            .await
        })
        .await;
        assert!(joined.is_err());

        let out: StoreResult<Option<i64>> = tokio::time::timeout(
            Duration::from_secs(1),
            store.run_exclusive(|| async { store.get("half").await }),
        )
        .await
        .expect("gate must be free after a panic");
        assert_eq!(out, Ok(Some(1)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn waiters_are_admitted_in_arrival_order() {
        let store = Arc::new(Store::new());
        let order = Arc::new(std::sync::Mutex::new(Vec::new()));
        let (release_tx, release_rx) = tokio::sync::oneshot::channel::<()>();
        let (held_tx, held_rx) = tokio::sync::oneshot::channel::<()>();

        let holder = {
            let store = Arc::clone(&store);
            tokio::spawn(async move {
                store
                    .run_exclusive(|| async move {
                        let _ = held_tx.send(());
                        let _ = release_rx.await;
                        Ok::<_, StoreError>(())
                    })
                    .await
            })
        };
        held_rx.await.unwrap();

        let mut waiters = Vec::new();
        for i in 0..4 {
            let store = Arc::clone(&store);
            let order = Arc::clone(&order);
            waiters.push(tokio::spawn(async move {
                store
                    .run_exclusive(|| async {
                        order.lock().unwrap().push(i);
                        Ok::<_, StoreError>(())
                    })
                    .await
            }));
            // Let each waiter reach the gate before the next one starts.
            tokio::time::sleep(Duration::from_millis(20)).await;
        }

        release_tx.send(()).unwrap();
        holder.await.unwrap().unwrap();
        for w in waiters {
            w.await.unwrap().unwrap();
        }
        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2, 3]);
    }

    // -----------------------------------------------------------------------
    // Latency and utilities
    // -----------------------------------------------------------------------

    #[tokio::test(start_paused = true)]
    async fn simulated_latency_delays_operations() {
        let store = Store::with_config(StoreConfig::with_latency_ms(20));
        let start = tokio::time::Instant::now();
        store.set("k", 1).await.unwrap();
        store.get("k").await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(40));
    }

    #[test]
    fn len_and_is_empty() {
        let store = Store::new();
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
    }

    #[tokio::test]
    async fn len_survives_a_poisoned_lock() {
        let store = Store::new();
        store.set("a", 1).await.unwrap();
        store.set("b", 2).await.unwrap();

        let poisoner = std::thread::scope(|sc| {
            sc.spawn(|| {
                let _guard = store.records.write().unwrap();
                panic!("poison the map");
            })
            .join()
        });
        assert!(poisoner.is_err());
        assert!(store.records.is_poisoned());

        assert_eq!(store.len(), 2);
        assert!(!store.is_empty());
        assert_eq!(store.get("a").await, Err(StoreError::LockPoisoned));
    }

    #[test]
    fn distinct_stores_have_distinct_ids() {
        let a = Store::new();
        let b = Store::new();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn debug_format() {
        let store = Store::default();
        let debug = format!("{store:?}");
        assert!(debug.contains("InMemoryObjectStore"));
        assert!(debug.contains("record_count"));
    }
}
