use crate::key::Key;

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;

/// Objects of one entity kind, deduplicated by key.
///
/// Iteration follows insertion order. The first object stored for a key wins: later objects for
/// the same key are discarded without being constructed.
#[derive(Debug, Clone)]
pub struct EntityStore<K, T> {
    // keys[i] is the key of objects[i]
    keys: Vec<K>,
    objects: Vec<Arc<T>>,
    positions: HashMap<K, usize>,
}

impl<K: Key, T> EntityStore<K, T> {
    pub fn new() -> Self {
        EntityStore {
            keys: vec![],
            objects: vec![],
            positions: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Store the object produced by `value` under `key`, unless `key` is already present.
    ///
    /// `value` is only evaluated when the key is new. Returns whether an object was inserted.
    pub fn insert_with(&mut self, key: K, value: impl FnOnce() -> T) -> bool {
        self.insert_shared_with(key, || Arc::new(value()))
    }

    fn insert_shared_with(&mut self, key: K, value: impl FnOnce() -> Arc<T>) -> bool {
        match self.positions.entry(key) {
            Entry::Occupied(_) => false,
            Entry::Vacant(entry) => {
                let position = self.objects.len();
                self.keys.push(entry.key().clone());
                self.objects.push(value());
                entry.insert(position);
                true
            }
        }
    }

    /// Merge `other` into `self`. Objects already in `self` take precedence.
    pub fn absorb(&mut self, other: EntityStore<K, T>) {
        for (key, object) in other.keys.into_iter().zip(other.objects) {
            self.insert_shared_with(key, || object);
        }
    }

    pub fn get(&self, key: &K) -> Option<&Arc<T>> {
        self.position(key).map(|i| &self.objects[i])
    }

    /// Insertion index of the object stored under `key`.
    pub fn position(&self, key: &K) -> Option<usize> {
        self.positions.get(key).copied()
    }

    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    pub fn objects(&self) -> &[Arc<T>] {
        &self.objects
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &Arc<T>)> {
        self.keys.iter().zip(self.objects.iter())
    }
}

impl<K: Key, T> Default for EntityStore<K, T> {
    fn default() -> Self {
        Self::new()
    }
}
