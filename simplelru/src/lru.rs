// Copyright 2026 simplelru Project Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::{
    fmt::Debug,
    hash::{BuildHasher, Hash},
    iter::FusedIterator,
};

use equivalent::Equivalent;
use hashbrown::{DefaultHashBuilder, HashTable};
use simplelru_common::{
    dlist::{self, Dlist},
    slab::Token,
    strict_assert, strict_assert_eq,
};

use crate::{
    builder::LruBuilder,
    error::{Error, Result},
    listener::Listeners,
};

/// Upper bound of the entries reserved up front, so a huge capacity does not allocate eagerly.
const PREALLOCATE_LIMIT: usize = 1 << 16;

struct Record<K, V> {
    key: K,
    value: V,
    hash: u64,
}

/// A fixed-capacity key-value cache with least-recently-used eviction.
///
/// Entries live in a slab-backed list ordered from the most recently used (front) to the least recently used (back).
/// A hash table maps the hash of each key to the [`Token`] of its list node, so lookups, promotions and evictions are
/// all O(1).
///
/// Inserting a new key into a full cache evicts the entry at the back. A successful [`Lru::get`] or an overwriting
/// [`Lru::add`] promotes the entry to the front, while [`Lru::peek`] and [`Lru::contains`] never change the order.
///
/// The cache is designed for a single owner. It does no internal locking, and callers that share it across threads
/// must wrap it themselves, e.g. in a `Mutex`. It is `Send` and `Sync` whenever its keys, values and hash builder are.
///
/// # Listeners
///
/// An acquire listener and an evict listener can be registered with [`LruBuilder`]. They run inline before the
/// triggering operation returns. See [`crate::AcquireListener`] and [`crate::EvictListener`] for when each fires.
///
/// The cache is consistent whenever a listener runs. If a listener panics, the triggering operation has already taken
/// effect and the cache stays within its capacity.
pub struct Lru<K, V, S = DefaultHashBuilder> {
    capacity: usize,

    indexer: HashTable<Token>,
    list: Dlist<Record<K, V>>,

    hash_builder: S,
    listeners: Listeners<K, V>,
}

impl<K, V> Lru<K, V>
where
    K: Hash + Eq,
{
    /// Create a cache holding at most `capacity` entries, without listeners.
    ///
    /// Returns [`Error::ConfigError`] if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self> {
        LruBuilder::new(capacity).build()
    }
}

impl<K, V, S> Lru<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    pub(crate) fn with_parts(capacity: usize, hash_builder: S, listeners: Listeners<K, V>) -> Result<Self> {
        Self::check_capacity(capacity)?;
        tracing::debug!(capacity, ?listeners, "[lru]: create cache");
        let reserved = capacity.min(PREALLOCATE_LIMIT);
        Ok(Self {
            capacity,
            indexer: HashTable::with_capacity(reserved),
            list: Dlist::with_capacity(reserved),
            hash_builder,
            listeners,
        })
    }

    /// Add a value to the cache, returning `true` if an eviction occurred.
    ///
    /// If the key already exists, its value is replaced and the entry becomes the most recently used one. The replaced
    /// value is dropped without calling the evict listener. Otherwise the entry is inserted at the front and, if the
    /// cache was full, the least recently used entry is evicted.
    ///
    /// The acquire listener is called with the new value in both cases.
    pub fn add(&mut self, key: K, value: V) -> bool {
        let hash = self.hash_builder.hash_one(&key);
        match self.find(hash, &key) {
            Some(token) => {
                self.list[token].value = value;
                self.acquire(token);
                false
            }
            None => self.insert(hash, key, value).1,
        }
    }

    /// Look up a key, adding the given value if it is absent.
    ///
    /// Returns the cached value, whether an eviction occurred and whether the value was added.
    ///
    /// If the key exists, this behaves like [`Lru::get`]: the entry is promoted, the stored value is returned and the
    /// given value is dropped. Otherwise this behaves like [`Lru::add`].
    pub fn get_or_add(&mut self, key: K, value: V) -> (&V, bool, bool) {
        let hash = self.hash_builder.hash_one(&key);
        match self.find(hash, &key) {
            Some(token) => {
                self.acquire(token);
                (&self.list[token].value, false, false)
            }
            None => {
                let (token, evicted) = self.insert(hash, key, value);
                (&self.list[token].value, evicted, true)
            }
        }
    }

    /// Look up a key's value, marking the entry as the most recently used one.
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        Q: Hash + Equivalent<K> + ?Sized,
    {
        let token = self.find(self.hash_builder.hash_one(key), key)?;
        self.acquire(token);
        Some(&self.list[token].value)
    }

    /// Mutable version of [`Lru::get`].
    ///
    /// The acquire listener observes the value before the caller mutates it.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        Q: Hash + Equivalent<K> + ?Sized,
    {
        let token = self.find(self.hash_builder.hash_one(key), key)?;
        self.acquire(token);
        Some(&mut self.list[token].value)
    }

    /// Check if a key is in the cache, without updating its recency.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        Q: Hash + Equivalent<K> + ?Sized,
    {
        self.find(self.hash_builder.hash_one(key), key).is_some()
    }

    /// Look up a key's value without updating its recency.
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        Q: Hash + Equivalent<K> + ?Sized,
    {
        self.find(self.hash_builder.hash_one(key), key)
            .map(|token| &self.list[token].value)
    }

    /// Mutable version of [`Lru::peek`].
    pub fn peek_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        Q: Hash + Equivalent<K> + ?Sized,
    {
        let token = self.find(self.hash_builder.hash_one(key), key)?;
        Some(&mut self.list[token].value)
    }

    /// Remove a key from the cache, returning `true` if it was present.
    pub fn remove<Q>(&mut self, key: &Q) -> bool
    where
        Q: Hash + Equivalent<K> + ?Sized,
    {
        self.pop(key).is_some()
    }

    /// Remove a key from the cache and return the removed entry.
    pub fn pop<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        Q: Hash + Equivalent<K> + ?Sized,
    {
        let token = self.find(self.hash_builder.hash_one(key), key)?;
        let record = self.detach(token)?;
        self.listeners.on_evict(&record.key, &record.value);
        Some((record.key, record.value))
    }

    /// Remove and return the least recently used entry.
    pub fn remove_oldest(&mut self) -> Option<(K, V)> {
        let record = self.detach(self.list.back_token()?)?;
        self.listeners.on_evict(&record.key, &record.value);
        Some((record.key, record.value))
    }

    /// Change the capacity of the cache, returning the count of evicted entries.
    ///
    /// Shrinking evicts least recently used entries until the cache fits.
    pub fn resize(&mut self, capacity: usize) -> Result<usize> {
        Self::check_capacity(capacity)?;

        let evicted = self.list.len().saturating_sub(capacity);
        for _ in 0..evicted {
            self.evict();
        }
        tracing::debug!(from = self.capacity, to = capacity, evicted, "[lru]: resize cache");
        self.capacity = capacity;

        self.check();
        Ok(evicted)
    }

    /// Remove every entry from the cache.
    ///
    /// The evict listener is called once per removed entry. The order of the calls is unspecified.
    pub fn purge(&mut self) {
        tracing::debug!(count = self.list.len(), reserved = self.list.capacity(), "[lru]: purge cache");

        self.indexer.clear();
        // The drained list is emptied even if a listener unwinds, and keeps its reserved slots.
        for record in self.list.drain() {
            self.listeners.on_evict(&record.key, &record.value);
        }
    }

    fn find<Q>(&self, hash: u64, key: &Q) -> Option<Token>
    where
        Q: Hash + Equivalent<K> + ?Sized,
    {
        let list = &self.list;
        self.indexer
            .find(hash, |&token| key.equivalent(&list[token].key))
            .copied()
    }

    /// Insert a key that is not in the cache yet, evicting the oldest entry on overflow.
    fn insert(&mut self, hash: u64, key: K, value: V) -> (Token, bool) {
        let token = self.list.push_front(Record { key, value, hash });
        let list = &self.list;
        self.indexer.insert_unique(hash, token, |&token| list[token].hash);

        // The overflow is unlinked before any listener runs, so the cache never exceeds its capacity.
        let overflow = if self.list.len() > self.capacity {
            self.list.back_token().and_then(|token| self.detach(token))
        } else {
            None
        };
        self.check();

        let record = &self.list[token];
        self.listeners.on_acquire(&record.key, &record.value);

        let evicted = overflow.is_some();
        if let Some(record) = overflow {
            tracing::trace!(hash = record.hash, "[lru]: evict entry");
            self.listeners.on_evict(&record.key, &record.value);
        }

        (token, evicted)
    }

    fn acquire(&mut self, token: Token) {
        self.list.move_to_front(token);
        let record = &self.list[token];
        self.listeners.on_acquire(&record.key, &record.value);
    }

    fn evict(&mut self) {
        let Some(record) = self.list.back_token().and_then(|token| self.detach(token)) else {
            return;
        };
        tracing::trace!(hash = record.hash, "[lru]: evict entry");
        self.listeners.on_evict(&record.key, &record.value);
    }

    /// Unlink a node from both the indexer and the list.
    fn detach(&mut self, token: Token) -> Option<Record<K, V>> {
        let record = self.list.remove(token)?;
        let indexed = self
            .indexer
            .find_entry(record.hash, |&t| t == token)
            .map(|entry| entry.remove())
            .is_ok();
        strict_assert!(indexed);
        self.check();
        Some(record)
    }

    fn check(&self) {
        strict_assert_eq!(self.indexer.len(), self.list.len());
        strict_assert!(self.list.len() <= self.capacity);
    }

    fn check_capacity(capacity: usize) -> Result<()> {
        if capacity == 0 {
            return Err(Error::config(format!("capacity must be positive, given: {capacity}")));
        }
        Ok(())
    }
}

impl<K, V, S> Lru<K, V, S> {
    /// Get the least recently used entry without updating its recency.
    pub fn get_oldest(&self) -> Option<(&K, &V)> {
        self.list.back().map(|record| (&record.key, &record.value))
    }

    /// Iterate over the keys, from the least recently used to the most recently used.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// Iterate over the values, from the least recently used to the most recently used.
    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    /// Iterate over the entries, from the least recently used to the most recently used.
    ///
    /// Iterating does not update recency.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.list.iter(),
        }
    }

    /// Count of cached entries.
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// Returns `true` if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Max count of cached entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<K, V, S> Debug for Lru<K, V, S>
where
    K: Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lru")
            .field("capacity", &self.capacity)
            .field("len", &self.len())
            .field("keys", &self.keys().collect::<Vec<_>>())
            .field("listeners", &self.listeners)
            .finish()
    }
}

impl<'a, K, V, S> IntoIterator for &'a Lru<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the entries of a [`Lru`], from the least recently used to the most recently used.
pub struct Iter<'a, K, V> {
    inner: dlist::Iter<'a, Record<K, V>>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|record| (&record.key, &record.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|record| (&record.key, &record.value))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

/// Iterator over the keys of a [`Lru`], from the least recently used to the most recently used.
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, _)| key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Keys<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(key, _)| key)
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}

impl<K, V> FusedIterator for Keys<'_, K, V> {}

/// Iterator over the values of a [`Lru`], from the least recently used to the most recently used.
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Values<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, value)| value)
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}

impl<K, V> FusedIterator for Values<'_, K, V> {}

#[cfg(test)]
mod tests {
    use std::{
        panic::{catch_unwind, AssertUnwindSafe},
        rc::Rc,
        sync::Arc,
    };

    use itertools::Itertools;
    use parking_lot::Mutex;

    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Event {
        Acquire(u64, u64),
        Evict(u64, u64),
    }

    type Events = Arc<Mutex<Vec<Event>>>;

    fn lru_with_events(capacity: usize) -> (Lru<u64, u64>, Events) {
        let events = Events::default();
        let lru = LruBuilder::new(capacity)
            .with_acquire_listener({
                let events = events.clone();
                move |k: &u64, v: &u64| events.lock().push(Event::Acquire(*k, *v))
            })
            .with_evict_listener({
                let events = events.clone();
                move |k: &u64, v: &u64| events.lock().push(Event::Evict(*k, *v))
            })
            .build()
            .unwrap();
        (lru, events)
    }

    fn keys<K: Copy, V, S>(lru: &Lru<K, V, S>) -> Vec<K> {
        lru.keys().copied().collect_vec()
    }

    #[test_log::test]
    fn test_lru_ordering() {
        let mut lru = Lru::new(8).unwrap();
        for i in 1..=5u64 {
            assert!(!lru.add(i, i));
        }
        assert_eq!(keys(&lru), vec![1, 2, 3, 4, 5]);

        assert_eq!(lru.get(&1), Some(&1));
        assert_eq!(keys(&lru), vec![2, 3, 4, 5, 1]);

        assert_eq!(lru.get(&42), None);
        assert_eq!(keys(&lru), vec![2, 3, 4, 5, 1]);
    }

    #[test_log::test]
    fn test_evict_on_overflow() {
        let (mut lru, events) = lru_with_events(2);

        assert!(!lru.add(1, 1));
        assert!(!lru.add(2, 2));
        assert!(lru.add(3, 3));

        assert!(!lru.contains(&1));
        assert_eq!(keys(&lru), vec![2, 3]);
        assert_eq!(lru.len(), 2);
        assert_eq!(
            *events.lock(),
            vec![
                Event::Acquire(1, 1),
                Event::Acquire(2, 2),
                Event::Acquire(3, 3),
                Event::Evict(1, 1),
            ]
        );
    }

    #[test_log::test]
    fn test_overwrite_is_not_eviction() {
        let (mut lru, events) = lru_with_events(2);

        lru.add(1, 1);
        lru.add(2, 2);
        assert!(!lru.add(1, 99));

        assert_eq!(lru.get(&1), Some(&99));
        assert_eq!(keys(&lru), vec![2, 1]);
        assert!(events.lock().iter().all(|e| !matches!(e, Event::Evict(..))));
        assert_eq!(events.lock()[2], Event::Acquire(1, 99));
    }

    #[test_log::test]
    fn test_peek_and_contains_keep_order() {
        let (mut lru, events) = lru_with_events(3);
        for i in 1..=3 {
            lru.add(i, i * 10);
        }
        events.lock().clear();

        assert_eq!(lru.peek(&1), Some(&10));
        assert!(lru.contains(&1));
        assert_eq!(lru.peek(&4), None);
        assert!(!lru.contains(&4));
        assert_eq!(lru.get_oldest(), Some((&1, &10)));

        assert_eq!(keys(&lru), vec![1, 2, 3]);
        assert!(events.lock().is_empty());

        // The oldest entry is still the one evicted.
        lru.add(4, 40);
        assert_eq!(keys(&lru), vec![2, 3, 4]);
    }

    #[test_log::test]
    fn test_get_or_add() {
        let (mut lru, events) = lru_with_events(1);

        assert_eq!(lru.get_or_add(1, 5), (&5, false, true));
        assert_eq!(lru.get_or_add(1, 999), (&5, false, false));
        assert_eq!(lru.get_or_add(2, 7), (&7, true, true));

        assert_eq!(
            *events.lock(),
            vec![
                Event::Acquire(1, 5),
                Event::Acquire(1, 5),
                Event::Acquire(2, 7),
                Event::Evict(1, 5),
            ]
        );
    }

    #[test_log::test]
    fn test_remove() {
        let (mut lru, events) = lru_with_events(4);
        for i in 1..=3 {
            lru.add(i, i);
        }
        events.lock().clear();

        assert!(lru.remove(&2));
        assert!(!lru.remove(&2));
        assert_eq!(keys(&lru), vec![1, 3]);

        assert_eq!(lru.pop(&3), Some((3, 3)));
        assert_eq!(lru.pop(&3), None);
        assert_eq!(keys(&lru), vec![1]);

        assert_eq!(*events.lock(), vec![Event::Evict(2, 2), Event::Evict(3, 3)]);
    }

    #[test_log::test]
    fn test_remove_and_get_oldest() {
        let (mut lru, events) = lru_with_events(3);
        assert_eq!(lru.get_oldest(), None);
        assert_eq!(lru.remove_oldest(), None);

        for i in 1..=3 {
            lru.add(i, i);
        }
        lru.get(&1);
        events.lock().clear();

        assert_eq!(lru.get_oldest(), Some((&2, &2)));
        assert_eq!(lru.get_oldest(), Some((&2, &2)));
        assert!(events.lock().is_empty());

        assert_eq!(lru.remove_oldest(), Some((2, 2)));
        assert_eq!(lru.remove_oldest(), Some((3, 3)));
        assert_eq!(keys(&lru), vec![1]);
        assert_eq!(*events.lock(), vec![Event::Evict(2, 2), Event::Evict(3, 3)]);
    }

    #[test_log::test]
    fn test_purge() {
        let (mut lru, events) = lru_with_events(8);
        for i in 0..5 {
            lru.add(i, i);
        }
        events.lock().clear();

        lru.purge();

        assert_eq!(lru.len(), 0);
        assert!(lru.is_empty());
        assert_eq!(lru.keys().count(), 0);
        assert_eq!(lru.get_oldest(), None);

        let evicted = events
            .lock()
            .iter()
            .map(|e| match e {
                Event::Evict(k, _) => *k,
                Event::Acquire(..) => panic!("unexpected acquire on purge: {e:?}"),
            })
            .sorted()
            .collect_vec();
        assert_eq!(evicted, vec![0, 1, 2, 3, 4]);

        // The cache is still usable after purge.
        lru.add(7, 7);
        assert_eq!(keys(&lru), vec![7]);
    }

    #[test_log::test]
    fn test_purge_keeps_reserved_slots() {
        let mut lru = Lru::new(64).unwrap();
        let reserved = lru.list.capacity();
        assert!(reserved >= 64);

        for round in 0..3u64 {
            for i in 0..64 {
                lru.add(i, round);
            }
            lru.purge();
            assert!(lru.is_empty());
            assert_eq!(lru.list.capacity(), reserved);
            assert!(lru.indexer.capacity() >= 64);
        }

        lru.add(1, 1);
        assert_eq!(keys(&lru), vec![1]);
    }

    #[test_log::test]
    fn test_panicking_acquire_listener_keeps_capacity() {
        let evicted = Arc::new(Mutex::new(vec![]));
        let mut lru = LruBuilder::new(2)
            .with_acquire_listener(|k: &u64, _: &u64| assert_ne!(*k, 3, "acquire listener failure"))
            .with_evict_listener({
                let evicted = evicted.clone();
                move |k: &u64, _: &u64| evicted.lock().push(*k)
            })
            .build()
            .unwrap();
        lru.add(1, 1);
        lru.add(2, 2);

        let res = catch_unwind(AssertUnwindSafe(|| lru.add(3, 3)));
        assert!(res.is_err());

        // The overflow entry left before the listener failed.
        assert_eq!(lru.len(), 2);
        assert!(lru.len() <= lru.capacity());
        assert_eq!(keys(&lru), vec![2, 3]);
        assert!(!lru.contains(&1));
        assert!(evicted.lock().is_empty());

        assert!(lru.add(4, 4));
        assert_eq!(keys(&lru), vec![3, 4]);
        assert_eq!(*evicted.lock(), vec![2]);
    }

    #[test_log::test]
    fn test_panicking_evict_listener_on_purge() {
        let mut lru = LruBuilder::new(4)
            .with_evict_listener(|_: &u64, _: &u64| panic!("evict listener failure"))
            .build()
            .unwrap();
        for i in 0..4 {
            lru.add(i, i);
        }

        let res = catch_unwind(AssertUnwindSafe(|| lru.purge()));
        assert!(res.is_err());

        assert!(lru.is_empty());
        assert!((0..4).all(|i| !lru.contains(&i)));
        assert!(!lru.add(9, 9));
        assert_eq!(keys(&lru), vec![9]);
    }

    #[test_log::test]
    fn test_share_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Lru<u64, u64>>();
        assert_send_sync::<Lru<String, Vec<u8>>>();

        let (lru, events) = lru_with_events(2);
        let lru = Arc::new(Mutex::new(lru));

        let handles = (0..4u64)
            .map(|i| {
                let lru = lru.clone();
                std::thread::spawn(move || {
                    lru.lock().add(i, i);
                })
            })
            .collect_vec();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(lru.lock().len(), 2);
        let events = events.lock();
        assert_eq!(events.iter().filter(|e| matches!(e, Event::Acquire(..))).count(), 4);
        assert_eq!(events.iter().filter(|e| matches!(e, Event::Evict(..))).count(), 2);
    }

    #[test_log::test]
    fn test_listener_counts() {
        let n = 16;
        let (mut lru, events) = lru_with_events(n);
        for i in 0..=n as u64 {
            lru.add(i, i);
        }
        let acquires = events.lock().iter().filter(|e| matches!(e, Event::Acquire(..))).count();
        let evicts = events.lock().iter().filter(|e| matches!(e, Event::Evict(..))).count();
        assert_eq!(acquires, n + 1);
        assert_eq!(evicts, 1);
        assert_eq!(lru.len(), n);
    }

    #[test_log::test]
    fn test_get_mut_and_peek_mut() {
        let (mut lru, events) = lru_with_events(3);
        for i in 1..=3 {
            lru.add(i, i);
        }
        events.lock().clear();

        *lru.peek_mut(&1).unwrap() += 100;
        assert_eq!(keys(&lru), vec![1, 2, 3]);
        assert!(events.lock().is_empty());

        *lru.get_mut(&1).unwrap() += 100;
        assert_eq!(keys(&lru), vec![2, 3, 1]);
        assert_eq!(lru.peek(&1), Some(&201));
        assert_eq!(*events.lock(), vec![Event::Acquire(1, 101)]);

        assert!(lru.get_mut(&42).is_none());
        assert!(lru.peek_mut(&42).is_none());
    }

    #[test_log::test]
    fn test_resize() {
        let (mut lru, events) = lru_with_events(4);
        for i in 1..=4 {
            lru.add(i, i);
        }
        events.lock().clear();

        assert_eq!(lru.resize(2).unwrap(), 2);
        assert_eq!(lru.capacity(), 2);
        assert_eq!(keys(&lru), vec![3, 4]);
        assert_eq!(*events.lock(), vec![Event::Evict(1, 1), Event::Evict(2, 2)]);

        assert!(matches!(lru.resize(0), Err(Error::ConfigError(_))));
        assert_eq!(lru.capacity(), 2);

        assert_eq!(lru.resize(3).unwrap(), 0);
        assert!(!lru.add(5, 5));
        assert_eq!(keys(&lru), vec![3, 4, 5]);
        assert!(lru.add(6, 6));
        assert_eq!(keys(&lru), vec![4, 5, 6]);
    }

    #[test_log::test]
    fn test_iterators() {
        let mut lru = Lru::new(4).unwrap();
        for i in 1..=4u64 {
            lru.add(i, i * 10);
        }
        lru.get(&2);

        assert_eq!(lru.keys().len(), 4);
        assert_eq!(lru.keys().rev().copied().collect_vec(), vec![2, 4, 3, 1]);
        assert_eq!(lru.values().copied().collect_vec(), vec![10, 30, 40, 20]);
        assert_eq!(
            lru.iter().map(|(k, v)| (*k, *v)).collect_vec(),
            vec![(1, 10), (3, 30), (4, 40), (2, 20)]
        );
        assert_eq!((&lru).into_iter().count(), 4);

        // An owned snapshot is not affected by later mutation.
        let snapshot = keys(&lru);
        lru.add(5, 50);
        assert_eq!(snapshot, vec![1, 3, 4, 2]);
        assert_eq!(keys(&lru), vec![3, 4, 2, 5]);
    }

    #[test_log::test]
    fn test_iterators_are_fused() {
        fn assert_fused<I: FusedIterator>(iter: I) -> I {
            iter
        }

        let mut lru = Lru::new(2).unwrap();
        lru.add(1u64, 10u64);

        let mut keys = assert_fused(lru.keys());
        assert_eq!(keys.next(), Some(&1));
        assert_eq!(keys.next(), None);
        assert_eq!(keys.next(), None);

        let mut values = assert_fused(lru.values());
        assert_eq!(values.next_back(), Some(&10));
        assert_eq!(values.next(), None);
        assert_eq!(values.next_back(), None);

        let mut iter = assert_fused(lru.iter());
        assert_eq!(iter.next(), Some((&1, &10)));
        assert_eq!(iter.next(), None);
    }

    #[test_log::test]
    fn test_borrowed_key_lookup() {
        let mut lru = Lru::new(2).unwrap();
        lru.add("hello".to_string(), 1);
        lru.add("world".to_string(), 2);

        assert!(lru.contains("hello"));
        assert_eq!(lru.peek("world"), Some(&2));
        assert_eq!(lru.get("hello"), Some(&1));
        assert!(lru.remove("world"));
        assert_eq!(lru.keys().cloned().collect_vec(), vec!["hello".to_string()]);
    }

    #[test_log::test]
    fn test_capacity_one() {
        let (mut lru, events) = lru_with_events(1);
        assert!(!lru.add(1, 1));
        assert!(!lru.add(1, 2));
        assert!(lru.add(2, 2));
        assert_eq!(keys(&lru), vec![2]);
        assert_eq!(lru.get(&1), None);
        assert_eq!(
            *events.lock(),
            vec![
                Event::Acquire(1, 1),
                Event::Acquire(1, 2),
                Event::Acquire(2, 2),
                Event::Evict(1, 2),
            ]
        );
    }

    #[test_log::test]
    fn test_values_dropped_on_leave() {
        let value = Rc::new(());
        let mut lru = Lru::new(1).unwrap();

        lru.add(1u64, value.clone());
        assert_eq!(Rc::strong_count(&value), 2);

        // Overwrite releases the old value.
        lru.add(1, value.clone());
        assert_eq!(Rc::strong_count(&value), 2);

        // Eviction releases the evicted value.
        lru.add(2, Rc::new(()));
        assert_eq!(Rc::strong_count(&value), 1);

        lru.add(3, value.clone());
        assert_eq!(Rc::strong_count(&value), 2);
        lru.purge();
        assert_eq!(Rc::strong_count(&value), 1);
    }

    #[test_log::test]
    fn test_debug() {
        let mut lru = Lru::new(3).unwrap();
        lru.add(1u64, "a");
        lru.add(2u64, "b");
        assert_eq!(
            format!("{lru:?}"),
            "Lru { capacity: 3, len: 2, keys: [1, 2], listeners: Listeners { acquire: false, evict: false } }"
        );
    }
}
