//! Atomic counter cells and dynamically keyed counter groups.

use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;

/// Monotonic `u64` counter.
///
/// Cloning yields another handle to the same cell. The cell lives on the heap,
/// so a handle stays valid while the map that issued it grows or rehashes.
#[derive(Clone, Default)]
pub struct Counter(Arc<AtomicU64>);

impl Counter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment by 1.
    pub fn inc(&self) {
        self.add(1);
    }

    /// Increment by an arbitrary value.
    pub fn add(&self, v: u64) {
        self.0.fetch_add(v, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }

    /// True when both handles point at the same cell.
    pub fn same_cell(&self, other: &Counter) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Counter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Counter").field(&self.get()).finish()
    }
}

/// Counters keyed by a label discovered at runtime.
///
/// Lookups of an existing key only take a shared shard lock and never
/// allocate. The first insertion of a key goes through the entry API, which
/// holds the shard write lock for the duration of the insert, so racing
/// creators of the same key all end up with one cell. While that lock is
/// held, lookups and increments of other keys hashed to the same shard wait
/// for it; keys in other shards and handles already returned by
/// [`CounterGroup::counter`] are unaffected. Entries are never removed.
pub struct CounterGroup<K>
where
    K: Eq + Hash,
{
    map: DashMap<K, Counter>,
}

impl<K> Default for CounterGroup<K>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self { map: DashMap::new() }
    }
}

impl<K> CounterGroup<K>
where
    K: Eq + Hash + Clone + fmt::Debug,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the counter for `key`, creating it on first use.
    pub fn counter<Q>(&self, key: &Q) -> Counter
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ToOwned<Owned = K> + ?Sized,
    {
        if let Some(c) = self.map.get(key) {
            return c.value().clone();
        }

        let mut created = false;
        let counter = self
            .map
            .entry(key.to_owned())
            .or_insert_with(|| {
                created = true;
                Counter::new()
            })
            .value()
            .clone();

        if created {
            tracing::debug!(key = ?key.to_owned(), "new counter key");
        }
        counter
    }

    /// Increment the counter for `key` by 1.
    pub fn inc<Q>(&self, key: &Q)
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ToOwned<Owned = K> + ?Sized,
    {
        self.add(key, 1);
    }

    pub fn add<Q>(&self, key: &Q, v: u64)
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ToOwned<Owned = K> + ?Sized,
    {
        // Fast path skips the handle clone.
        if let Some(c) = self.map.get(key) {
            c.value().add(v);
            return;
        }
        self.counter(key).add(v);
    }

    /// Value for `key` without creating it.
    pub fn get<Q>(&self, key: &Q) -> Option<u64>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.map.get(key).map(|c| c.value().get())
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Copy out every (key, value) pair.
    ///
    /// Shards are visited one at a time under a shared lock. Keys inserted
    /// while the walk is in progress may or may not show up; keys present
    /// before it started always do.
    pub fn values(&self) -> Vec<(K, u64)> {
        self.map
            .iter()
            .map(|r| (r.key().clone(), r.value().get()))
            .collect()
    }
}
