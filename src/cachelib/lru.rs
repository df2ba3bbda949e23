//! Fixed-capacity least-recently-used map behind a single lock

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::errors::{Result, StarframeError};

struct LruNode<K, V> {
    key: K,
    value: V,
    prev: Option<usize>,
    next: Option<usize>,
}

/// Recency list stored in a slab; `head` is most recently used
struct LruState<K, V> {
    index: HashMap<K, usize>,
    slots: Vec<Option<LruNode<K, V>>>,
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    max_size: usize,
}

impl<K: Eq + Hash + Clone, V> LruState<K, V> {
    fn new(max_size: usize) -> Self {
        Self {
            index: HashMap::new(),
            slots: Vec::new(),
            free: Vec::new(),
            head: None,
            tail: None,
            max_size,
        }
    }

    fn node(&self, slot: usize) -> Option<&LruNode<K, V>> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, slot: usize) -> Option<&mut LruNode<K, V>> {
        self.slots.get_mut(slot).and_then(Option::as_mut)
    }

    fn detach(&mut self, slot: usize) {
        let (prev, next) = match self.node(slot) {
            Some(node) => (node.prev, node.next),
            None => return,
        };

        match prev {
            Some(p) => {
                if let Some(node) = self.node_mut(p) {
                    node.next = next;
                }
            }
            None => self.head = next,
        }
        match next {
            Some(n) => {
                if let Some(node) = self.node_mut(n) {
                    node.prev = prev;
                }
            }
            None => self.tail = prev,
        }
    }

    fn push_front(&mut self, slot: usize) {
        let old_head = self.head;
        if let Some(node) = self.node_mut(slot) {
            node.prev = None;
            node.next = old_head;
        }
        match old_head {
            Some(h) => {
                if let Some(node) = self.node_mut(h) {
                    node.prev = Some(slot);
                }
            }
            None => self.tail = Some(slot),
        }
        self.head = Some(slot);
    }

    fn touch(&mut self, slot: usize) {
        if self.head != Some(slot) {
            self.detach(slot);
            self.push_front(slot);
        }
    }

    fn get(&mut self, key: &K) -> Option<&V> {
        let slot = *self.index.get(key)?;
        self.touch(slot);
        self.node(slot).map(|n| &n.value)
    }

    fn insert(&mut self, key: K, value: V) {
        if let Some(&slot) = self.index.get(&key) {
            if let Some(node) = self.node_mut(slot) {
                node.value = value;
            }
            self.touch(slot);
            return;
        }

        let node = LruNode {
            key: key.clone(),
            value,
            prev: None,
            next: None,
        };
        let slot = match self.free.pop() {
            Some(slot) => {
                self.slots[slot] = Some(node);
                slot
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        };
        self.index.insert(key, slot);
        self.push_front(slot);
        self.shrink_to(self.max_size);
    }

    fn evict_lru(&mut self) -> bool {
        let Some(slot) = self.tail else {
            return false;
        };
        self.detach(slot);
        if let Some(node) = self.slots[slot].take() {
            self.index.remove(&node.key);
        }
        self.free.push(slot);
        true
    }

    fn shrink_to(&mut self, max_size: usize) {
        let mut evicted = 0usize;
        while self.index.len() > max_size && self.evict_lru() {
            evicted += 1;
        }
        if evicted > 0 {
            log::debug!("cache evicted {evicted} least recently used entries (max_size = {max_size})");
        }
    }

    fn clear(&mut self) {
        self.index.clear();
        self.slots.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
    }

    /// Keys from most to least recently used
    fn keys_by_recency(&self) -> Vec<K> {
        let mut keys = Vec::with_capacity(self.index.len());
        let mut cursor = self.head;
        while let Some(slot) = cursor {
            match self.node(slot) {
                Some(node) => {
                    keys.push(node.key.clone());
                    cursor = node.next;
                }
                None => break,
            }
        }
        keys
    }
}

/// Thread-safe LRU map with O(1) lookup, refresh and eviction
///
/// Every operation takes the one internal lock. Values are cloned out so the
/// lock is never held while callers use them, and [`LruCache::fetch`] runs
/// its computation with the lock released.
pub struct LruCache<K, V> {
    state: Mutex<LruState<K, V>>,
}

impl<K: Eq + Hash + Clone, V: Clone> LruCache<K, V> {
    /// Create a cache holding at most `max_size` entries
    pub fn new(max_size: usize) -> Result<Self> {
        NonZeroUsize::new(max_size)
            .map(Self::with_capacity)
            .ok_or(StarframeError::InvalidCacheSize(max_size))
    }

    pub fn with_capacity(max_size: NonZeroUsize) -> Self {
        Self {
            state: Mutex::new(LruState::new(max_size.get())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, LruState<K, V>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Look up a value, marking it most recently used
    pub fn get(&self, key: &K) -> Option<V> {
        self.lock().get(key).cloned()
    }

    /// Insert or replace a value, evicting the least recently used entry when full
    pub fn set(&self, key: K, value: V) {
        self.lock().insert(key, value);
    }

    /// Return the cached value or compute, store and return it
    ///
    /// Concurrent misses on the same key may each compute; the last write wins.
    pub fn fetch<F: FnOnce() -> V>(&self, key: K, compute: F) -> V {
        if let Some(value) = self.get(&key) {
            return value;
        }
        let value = compute();
        self.set(key, value.clone());
        value
    }

    /// Like [`LruCache::fetch`] for fallible computations; errors are not cached
    pub fn try_fetch<E, F: FnOnce() -> std::result::Result<V, E>>(
        &self,
        key: K,
        compute: F,
    ) -> std::result::Result<V, E> {
        if let Some(value) = self.get(&key) {
            return Ok(value);
        }
        let value = compute()?;
        self.set(key, value.clone());
        Ok(value)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.lock().index.contains_key(key)
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn size(&self) -> usize {
        self.lock().index.len()
    }

    pub fn max_size(&self) -> usize {
        self.lock().max_size
    }

    /// Change the capacity, evicting immediately when it shrinks
    pub fn set_max_size(&self, max_size: usize) -> Result<()> {
        if max_size == 0 {
            return Err(StarframeError::InvalidCacheSize(max_size));
        }
        let mut state = self.lock();
        state.max_size = max_size;
        state.shrink_to(max_size);
        Ok(())
    }

    /// Keys ordered from most to least recently used
    pub fn keys(&self) -> Vec<K> {
        self.lock().keys_by_recency()
    }
}

impl<K, V> fmt::Debug for LruCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f.debug_struct("LruCache")
            .field("size", &state.index.len())
            .field("max_size", &state.max_size)
            .finish()
    }
}
