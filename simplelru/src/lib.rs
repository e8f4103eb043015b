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

//! A fixed-capacity, single-owner key-value cache with least-recently-used eviction.
//!
//! ```
//! use simplelru::Lru;
//!
//! let mut lru = Lru::new(2).unwrap();
//! lru.add("a", 1);
//! lru.add("b", 2);
//!
//! // Reading "a" makes "b" the least recently used entry.
//! assert_eq!(lru.get("a"), Some(&1));
//! assert!(lru.add("c", 3));
//!
//! assert!(!lru.contains("b"));
//! assert_eq!(lru.keys().copied().collect::<Vec<_>>(), vec!["a", "c"]);
//! ```
//!
//! Listeners observe entries becoming current and leaving the cache:
//!
//! ```
//! use std::sync::{Arc, Mutex};
//!
//! use simplelru::LruBuilder;
//!
//! let evicted = Arc::new(Mutex::new(vec![]));
//!
//! let mut lru = LruBuilder::new(1)
//!     .with_evict_listener({
//!         let evicted = evicted.clone();
//!         move |k: &u64, v: &String| evicted.lock().unwrap().push((*k, v.clone()))
//!     })
//!     .build()
//!     .unwrap();
//!
//! lru.add(1, "one".to_string());
//! lru.add(2, "two".to_string());
//!
//! assert_eq!(*evicted.lock().unwrap(), vec![(1, "one".to_string())]);
//! ```

mod builder;
mod error;
mod listener;
mod lru;

/// Re-exported types of the crate.
pub mod prelude;

pub use prelude::*;
