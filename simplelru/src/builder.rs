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

use std::hash::{BuildHasher, Hash};

use hashbrown::DefaultHashBuilder;
use serde::{Deserialize, Serialize};

use crate::{error::Result, listener::Listeners, lru::Lru};

/// Serializable configuration of a [`Lru`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LruConfig {
    /// Max count of cached entries.
    ///
    /// Must be positive, or building the cache fails.
    pub capacity: usize,
}

/// Builder for [`Lru`].
pub struct LruBuilder<K, V, S = DefaultHashBuilder> {
    capacity: usize,
    hash_builder: S,
    listeners: Listeners<K, V>,
}

impl<K, V> LruBuilder<K, V> {
    /// Create a builder for a cache holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            hash_builder: DefaultHashBuilder::default(),
            listeners: Listeners::default(),
        }
    }

    /// Create a builder from a [`LruConfig`].
    pub fn from_config(config: &LruConfig) -> Self {
        Self::new(config.capacity)
    }
}

impl<K, V, S> LruBuilder<K, V, S> {
    /// Set the listener called whenever an entry is inserted, overwritten or read.
    pub fn with_acquire_listener<F>(mut self, listener: F) -> Self
    where
        F: FnMut(&K, &V) + Send + Sync + 'static,
    {
        self.listeners.acquire = Some(Box::new(listener));
        self
    }

    /// Set the listener called whenever an entry is evicted, removed or purged.
    pub fn with_evict_listener<F>(mut self, listener: F) -> Self
    where
        F: FnMut(&K, &V) + Send + Sync + 'static,
    {
        self.listeners.evict = Some(Box::new(listener));
        self
    }

    /// Set the hash builder used to index keys.
    pub fn with_hash_builder<OS>(self, hash_builder: OS) -> LruBuilder<K, V, OS>
    where
        OS: BuildHasher,
    {
        LruBuilder {
            capacity: self.capacity,
            hash_builder,
            listeners: self.listeners,
        }
    }

    /// Build the cache.
    ///
    /// Fails with [`crate::Error::ConfigError`] if the capacity is zero.
    pub fn build(self) -> Result<Lru<K, V, S>>
    where
        K: Hash + Eq,
        S: BuildHasher,
    {
        Lru::with_parts(self.capacity, self.hash_builder, self.listeners)
    }
}
