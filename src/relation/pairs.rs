use crate::key::Key;

use std::collections::HashSet;

/// An ordered set of `(left key, right key)` pairs evidencing a relation.
///
/// Duplicate pairs collapse; distinct pairs keep the order in which they were first seen.
#[derive(Debug, Clone)]
pub struct PairSet<K> {
    pairs: Vec<(K, K)>,
    seen: HashSet<(K, K)>,
}

impl<K: Key> PairSet<K> {
    pub fn new() -> Self {
        PairSet {
            pairs: vec![],
            seen: HashSet::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Insert a pair, returning whether it was new.
    pub fn insert(&mut self, pair: (K, K)) -> bool {
        if self.seen.contains(&pair) {
            return false;
        }
        self.seen.insert(pair.clone());
        self.pairs.push(pair);
        true
    }

    pub fn extend(&mut self, pairs: impl IntoIterator<Item = (K, K)>) {
        for pair in pairs {
            self.insert(pair);
        }
    }

    /// Union `other` into `self`, appending its new pairs in their order.
    pub fn absorb(&mut self, other: PairSet<K>) {
        self.extend(other.pairs)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(K, K)> {
        self.pairs.iter()
    }

    pub fn as_slice(&self) -> &[(K, K)] {
        &self.pairs
    }
}

impl<K: Key> Default for PairSet<K> {
    fn default() -> Self {
        Self::new()
    }
}
