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

use std::fmt::Debug;

/// Listener called whenever an entry becomes the most recently used one.
///
/// It fires on insertion of a new key, on value replacement of an existing key, and on a successful read. The entry is
/// already at the front of the recency order with its current value when the listener runs. If the insertion overflows
/// the cache, the least recently used entry has already left, and the evict listener is called for it afterwards.
pub trait AcquireListener<K, V>: FnMut(&K, &V) + Send + Sync + 'static {}
impl<K, V, T> AcquireListener<K, V> for T where T: FnMut(&K, &V) + Send + Sync + 'static {}

/// Listener called whenever an entry leaves the cache.
///
/// It fires on capacity eviction, explicit removal and purge, but not on value replacement. The entry is already
/// unlinked from the cache when the listener runs.
pub trait EvictListener<K, V>: FnMut(&K, &V) + Send + Sync + 'static {}
impl<K, V, T> EvictListener<K, V> for T where T: FnMut(&K, &V) + Send + Sync + 'static {}

/// Optional listener slots of a cache. Firing an empty slot is a no-op.
pub(crate) struct Listeners<K, V> {
    pub(crate) acquire: Option<Box<dyn AcquireListener<K, V>>>,
    pub(crate) evict: Option<Box<dyn EvictListener<K, V>>>,
}

impl<K, V> Default for Listeners<K, V> {
    fn default() -> Self {
        Self {
            acquire: None,
            evict: None,
        }
    }
}

impl<K, V> Debug for Listeners<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listeners")
            .field("acquire", &self.acquire.is_some())
            .field("evict", &self.evict.is_some())
            .finish()
    }
}

impl<K, V> Listeners<K, V> {
    pub(crate) fn on_acquire(&mut self, key: &K, value: &V) {
        if let Some(listener) = self.acquire.as_mut() {
            listener(key, value);
        }
    }

    pub(crate) fn on_evict(&mut self, key: &K, value: &V) {
        if let Some(listener) = self.evict.as_mut() {
            listener(key, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use parking_lot::Mutex;

    use super::*;

    #[test]
    fn test_empty_listeners_are_noop() {
        let mut listeners = Listeners::<u64, u64>::default();
        listeners.on_acquire(&1, &1);
        listeners.on_evict(&1, &1);
        assert_eq!(format!("{listeners:?}"), "Listeners { acquire: false, evict: false }");
    }

    #[test]
    fn test_listeners_fire() {
        let log = Arc::new(Mutex::new(vec![]));

        let mut listeners = Listeners::<u64, &'static str>::default();
        listeners.acquire = Some(Box::new({
            let log = log.clone();
            move |k: &u64, v: &&'static str| log.lock().push(format!("acquire {k} {v}"))
        }));
        listeners.evict = Some(Box::new({
            let log = log.clone();
            move |k: &u64, v: &&'static str| log.lock().push(format!("evict {k} {v}"))
        }));

        listeners.on_acquire(&1, &"a");
        listeners.on_evict(&2, &"b");

        assert_eq!(*log.lock(), vec!["acquire 1 a".to_string(), "evict 2 b".to_string()]);
    }
}
