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

//! Shared components for simplelru.

/// Assertion macros that can be promoted from debug-only to always-on.
pub mod assert;
/// Doubly-linked list whose nodes live in a [`slab::Slab`].
pub mod dlist;
/// Slab arena addressed by stable [`slab::Token`]s.
pub mod slab;
