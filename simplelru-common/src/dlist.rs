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
    iter::FusedIterator,
    ops::{Index, IndexMut},
};

use crate::{
    slab::{Slab, Token},
    strict_assert, strict_assert_eq,
};

struct DlistNode<T> {
    val: T,

    prev: Option<Token>,
    next: Option<Token>,
}

/// Doubly-linked list with nodes allocated in a [`Slab`].
///
/// Every node is addressed by the [`Token`] returned on insertion. The token stays valid until the node is removed,
/// so positional operations like [`Dlist::remove`] and [`Dlist::move_to_front`] are O(1).
///
/// The head is the front of the list and the tail is the back.
pub struct Dlist<T> {
    slab: Slab<DlistNode<T>>,
    head: Option<Token>,
    tail: Option<Token>,
}

impl<T> Default for Dlist<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Debug for Dlist<T>
where
    T: Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T> Dlist<T> {
    /// Create an empty list.
    pub const fn new() -> Self {
        Self {
            slab: Slab::new(),
            head: None,
            tail: None,
        }
    }

    /// Create an empty list with room for `capacity` nodes before reallocating.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slab: Slab::with_capacity(capacity),
            head: None,
            tail: None,
        }
    }

    /// Reference of the value at the back.
    pub fn back(&self) -> Option<&T> {
        self.tail.map(|token| &self.slab[token].val)
    }

    /// Token of the node at the front.
    pub fn front_token(&self) -> Option<Token> {
        self.head
    }

    /// Token of the node at the back.
    pub fn back_token(&self) -> Option<Token> {
        self.tail
    }

    /// Link a new node at the front.
    pub fn push_front(&mut self, val: T) -> Token {
        let token = self.slab.insert(DlistNode {
            val,
            prev: None,
            next: None,
        });
        self.link_front(token);
        token
    }

    /// Unlink and return the front value.
    pub fn pop_front(&mut self) -> Option<T> {
        let token = self.head?;
        self.remove(token)
    }

    /// Unlink and return the back value.
    pub fn pop_back(&mut self) -> Option<T> {
        let token = self.tail?;
        self.remove(token)
    }

    /// Unlink the node with the given token and return its value.
    ///
    /// Returns `None` if the token does not point to a live node.
    pub fn remove(&mut self, token: Token) -> Option<T> {
        if !self.slab.contains(token) {
            return None;
        }
        self.unlink(token);
        self.slab.remove(token).map(|node| node.val)
    }

    /// Move the node with the given token to the front.
    ///
    /// # Panics
    ///
    /// Panics if the token does not point to a live node.
    pub fn move_to_front(&mut self, token: Token) {
        if self.head == Some(token) {
            return;
        }
        self.unlink(token);
        self.link_front(token);
    }

    /// Count of live nodes.
    pub fn len(&self) -> usize {
        self.slab.len()
    }

    /// Returns `true` if the list has no nodes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Count of nodes the list holds without reallocating.
    pub fn capacity(&self) -> usize {
        self.slab.capacity()
    }

    /// Drop all nodes.
    pub fn clear(&mut self) {
        self.slab.clear();
        self.head = None;
        self.tail = None;
    }

    /// Unlink all nodes, yielding their values from front to back.
    ///
    /// Nodes not consumed by the caller are dropped with the iterator.
    pub fn drain(&mut self) -> Drain<'_, T> {
        Drain { list: self }
    }

    /// Iterate over the values from front to back.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            slab: &self.slab,
            front: self.head,
            back: self.tail,
            remains: self.len(),
        }
    }

    fn link_front(&mut self, token: Token) {
        let head = self.head;
        {
            let node = &mut self.slab[token];
            node.prev = None;
            node.next = head;
        }
        match head {
            Some(head) => self.slab[head].prev = Some(token),
            None => self.tail = Some(token),
        }
        self.head = Some(token);
    }

    fn unlink(&mut self, token: Token) {
        let (prev, next) = {
            let node = &mut self.slab[token];
            (node.prev.take(), node.next.take())
        };

        match prev {
            Some(prev) => self.slab[prev].next = next,
            None => {
                strict_assert_eq!(self.head, Some(token));
                self.head = next;
            }
        }
        match next {
            Some(next) => self.slab[next].prev = prev,
            None => {
                strict_assert_eq!(self.tail, Some(token));
                self.tail = prev;
            }
        }

        strict_assert!(self.head.is_some() == self.tail.is_some());
    }
}

impl<T> Index<Token> for Dlist<T> {
    type Output = T;

    fn index(&self, token: Token) -> &Self::Output {
        &self.slab[token].val
    }
}

impl<T> IndexMut<Token> for Dlist<T> {
    fn index_mut(&mut self, token: Token) -> &mut Self::Output {
        &mut self.slab[token].val
    }
}

impl<'a, T> IntoIterator for &'a Dlist<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Borrowing iterator over a [`Dlist`], from front to back.
pub struct Iter<'a, T> {
    slab: &'a Slab<DlistNode<T>>,
    front: Option<Token>,
    back: Option<Token>,
    remains: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remains == 0 {
            return None;
        }
        let node = &self.slab[self.front?];
        self.front = node.next;
        self.remains -= 1;
        Some(&node.val)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remains, Some(self.remains))
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remains == 0 {
            return None;
        }
        let node = &self.slab[self.back?];
        self.back = node.prev;
        self.remains -= 1;
        Some(&node.val)
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

/// Draining iterator over a [`Dlist`], from front to back.
pub struct Drain<'a, T> {
    list: &'a mut Dlist<T>,
}

impl<T> Iterator for Drain<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.list.pop_front()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.list.len(), Some(self.list.len()))
    }
}

impl<T> ExactSizeIterator for Drain<'_, T> {}

impl<T> Drop for Drain<'_, T> {
    fn drop(&mut self) {
        self.list.clear();
    }
}
