use async_trait::async_trait;

use crate::error::StoreResult;

/// Optional filter applied by [`ObjectStore::scan`].
pub type Predicate<'a, V> = &'a (dyn Fn(&V) -> bool + Send + Sync);

/// Key/value record store.
///
/// All implementations must satisfy these invariants:
/// - `get` on a missing key is `Ok(None)`, never an error.
/// - `set` is an upsert; it overwrites whatever was at the key.
/// - `scan` returns every value whose key starts with the prefix that also
///   passes the predicate. Callers must not rely on the order.
/// - Values are snapshots. A value returned from `get` is never changed by a
///   later `set`.
///
/// # Transactions
///
/// This trait carries no transaction primitive. The exclusivity gate is
/// state of the concrete store, so `run_exclusive` lives there (see
/// [`InMemoryObjectStore::run_exclusive`](crate::InMemoryObjectStore::run_exclusive)).
/// Code generic over `ObjectStore` takes the store by reference and is
/// called from inside a body passed to the concrete store's
/// `run_exclusive`.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    type Value: Clone + Send + Sync;

    /// Point lookup.
    async fn get(&self, key: &str) -> StoreResult<Option<Self::Value>>;

    /// Upsert `value` at `key`.
    async fn set(&self, key: &str, value: Self::Value) -> StoreResult<()>;

    /// All values under `prefix`, optionally filtered.
    async fn scan(
        &self,
        prefix: &str,
        filter: Option<Predicate<'_, Self::Value>>,
    ) -> StoreResult<Vec<Self::Value>>;

    /// Check whether a key is present.
    async fn contains(&self, key: &str) -> StoreResult<bool> {
        Ok(self.get(key).await?.is_some())
    }
}
