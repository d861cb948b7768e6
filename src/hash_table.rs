//! A separate-chaining hash table keyed by name, shared by the Warehouse
//! and the Cookbook.
//!
//! The hash function is a polynomial rolling hash over printable ASCII,
//! prime base 67, exactly as specified. Resizing triggers once
//! `occupied / size` crosses the golden-ratio-derived load factor
//! `0.618...`, growing the bucket array by a fixed block and rehashing
//! every chain. Chain nodes are individually boxed, so a resize only moves
//! `Box` pointers between bucket slots — it never reallocates or copies a
//! stored value, which is what lets callers keep long-lived handles
//! (`Rc`s) into the payload across resizes.

use log::debug;

const HASH_PRIME: u64 = 67;
const RESIZE_BLOCK: usize = 32;
const LOAD_FACTOR: f64 = 0.618_033_988_75; // golden ratio minus one

struct Node<V> {
    key: Box<str>,
    value: V,
    next: Option<Box<Node<V>>>,
}

pub struct ChainMap<V> {
    buckets: Vec<Option<Box<Node<V>>>>,
    occupied: usize,
    len: usize,
}

impl<V> ChainMap<V> {
    pub fn new() -> Self {
        ChainMap::with_size(RESIZE_BLOCK)
    }

    fn with_size(size: usize) -> Self {
        let mut buckets = Vec::with_capacity(size);
        buckets.resize_with(size, || None);
        ChainMap {
            buckets,
            occupied: 0,
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    /// Polynomial rolling hash: `h <- (h + (c - 0x20 + 1) * p^i) mod size`.
    fn hash(key: &str, size: usize) -> usize {
        let mut hash: u64 = 0;
        let mut prime_pow: u64 = 1;
        let size64 = size as u64;

        for c in key.bytes() {
            let mapped = (c as u64).saturating_sub(0x20) + 1;
            hash = (hash + mapped * prime_pow) % size64;
            prime_pow = (prime_pow * HASH_PRIME) % size64;
        }

        hash as usize
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        let idx = Self::hash(key, self.buckets.len());
        let mut cur = self.buckets[idx].as_deref();

        while let Some(node) = cur {
            if &*node.key == key {
                return Some(&node.value);
            }
            cur = node.next.as_deref();
        }

        None
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Inserts `value` under `key`, or leaves the table untouched and
    /// returns `false` if `key` is already present.
    pub fn insert(&mut self, key: &str, value: V) -> bool {
        if self.contains_key(key) {
            return false;
        }

        self.maybe_grow();

        let idx = Self::hash(key, self.buckets.len());
        if self.buckets[idx].is_none() {
            self.occupied += 1;
        }

        let node = Box::new(Node {
            key: key.into(),
            value,
            next: self.buckets[idx].take(),
        });
        self.buckets[idx] = Some(node);
        self.len += 1;
        true
    }

    /// Returns the existing value for `key`, or inserts `default()` first.
    pub fn get_or_insert_with(&mut self, key: &str, default: impl FnOnce() -> V) -> &mut V {
        if !self.contains_key(key) {
            self.insert(key, default());
        }

        let idx = Self::hash(key, self.buckets.len());
        let mut cur = self.buckets[idx].as_deref_mut();

        loop {
            match cur {
                Some(node) if &*node.key == key => return &mut node.value,
                Some(node) => cur = node.next.as_deref_mut(),
                None => unreachable!("key was just inserted"),
            }
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<V> {
        let idx = Self::hash(key, self.buckets.len());
        let mut slot = &mut self.buckets[idx];

        loop {
            match slot {
                Some(node) if &*node.key == key => {
                    let mut owned = slot.take().unwrap();
                    *slot = owned.next.take();
                    self.len -= 1;
                    if self.buckets[idx].is_none() {
                        self.occupied -= 1;
                    }
                    return Some(owned.value);
                }
                Some(node) => slot = &mut node.next,
                None => return None,
            }
        }
    }

    fn maybe_grow(&mut self) {
        let size = self.buckets.len();
        if size == 0 || (self.occupied as f64 / size as f64) > LOAD_FACTOR {
            self.rehash(size + RESIZE_BLOCK);
        }
    }

    fn rehash(&mut self, new_size: usize) {
        debug!(
            "ChainMap resize: {} -> {new_size} buckets ({} entries)",
            self.buckets.len(),
            self.len
        );

        let mut new_buckets: Vec<Option<Box<Node<V>>>> = Vec::with_capacity(new_size);
        new_buckets.resize_with(new_size, || None);

        for mut slot in std::mem::take(&mut self.buckets) {
            while let Some(mut node) = slot.take() {
                slot = node.next.take();
                let idx = Self::hash(&node.key, new_size);
                node.next = new_buckets[idx].take();
                new_buckets[idx] = Some(node);
            }
        }

        self.buckets = new_buckets;
        self.occupied = self
            .buckets
            .iter()
            .filter(|bucket| bucket.is_some())
            .count();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.buckets.iter().flat_map(|bucket| {
            let mut cur = bucket.as_deref();
            std::iter::from_fn(move || {
                let node = cur?;
                cur = node.next.as_deref();
                Some((&*node.key, &node.value))
            })
        })
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut V)> {
        self.buckets.iter_mut().flat_map(|bucket| {
            let mut cur = bucket.as_deref_mut();
            std::iter::from_fn(move || {
                let node = cur.take()?;
                cur = node.next.as_deref_mut();
                Some((&*node.key, &mut node.value))
            })
        })
    }
}

impl<V> Default for ChainMap<V> {
    fn default() -> Self {
        Self::new()
    }
}
