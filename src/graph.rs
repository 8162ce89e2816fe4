//! The accumulator of a fold: deduplicated objects per entity kind and key pairs per relation.
use crate::entity::{EntityKind, EntityStore, KindId};
use crate::fold::Monoid;
use crate::key::{Key, Object};
use crate::relation::{PairSet, RelationKind};

use core::any::Any;
use core::fmt;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;

/// A type-erased entity store or pair set.
///
/// Every part registered under a [`KindId`] has the same concrete type, fixed by the descriptor
/// that owns the id, so downcasts of parts found under the same id cannot fail.
trait Part: Any + Send {
    fn absorb_boxed(&mut self, other: Box<dyn Part>);
    fn len(&self) -> usize;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<K: Key, T: Object> Part for EntityStore<K, T> {
    fn absorb_boxed(&mut self, other: Box<dyn Part>) {
        let other = other
            .into_any()
            .downcast::<EntityStore<K, T>>()
            .expect("entity kind id maps to a single store type");
        self.absorb(*other);
    }

    fn len(&self) -> usize {
        EntityStore::len(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

impl<K: Key> Part for PairSet<K> {
    fn absorb_boxed(&mut self, other: Box<dyn Part>) {
        let other = other
            .into_any()
            .downcast::<PairSet<K>>()
            .expect("relation kind id maps to a single pair type");
        self.absorb(*other);
    }

    fn len(&self) -> usize {
        PairSet::len(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

fn merge_parts(into: &mut HashMap<KindId, Box<dyn Part>>, from: HashMap<KindId, Box<dyn Part>>) {
    for (id, part) in from {
        match into.entry(id) {
            Entry::Occupied(mut entry) => entry.get_mut().absorb_boxed(part),
            Entry::Vacant(entry) => {
                entry.insert(part);
            }
        }
    }
}

/// Objects loaded by entity kinds and key pairs loaded by relations.
///
/// An [`ObjectGraph`] is a [`Monoid`]: [`Monoid::combine`] is associative with
/// [`ObjectGraph::empty`] as its unit, so partial graphs accumulated from disjoint partitions of
/// the rows can be merged in any association order. It is not commutative: when both operands
/// hold an object for the same key, the left operand's object is kept.
///
/// Access is not synchronized; a graph is owned by one thread at a time.
#[derive(Default)]
pub struct ObjectGraph {
    entities: HashMap<KindId, Box<dyn Part>>,
    relations: HashMap<KindId, Box<dyn Part>>,
}

impl ObjectGraph {
    /// The empty graph with no objects and no pairs.
    pub fn empty() -> Self {
        ObjectGraph {
            entities: HashMap::new(),
            relations: HashMap::new(),
        }
    }

    /// True when the graph holds neither objects nor pairs.
    pub fn is_empty(&self) -> bool {
        self.entities.values().all(|p| p.len() == 0)
            && self.relations.values().all(|p| p.len() == 0)
    }

    /// Add the object built by `value` under `key`, unless `kind` already has an object for
    /// `key`. `value` is not evaluated for known keys. Returns whether an object was added.
    pub fn add_entity<Row, T: Object, K: Key>(
        &mut self,
        kind: &EntityKind<Row, T, K>,
        key: K,
        value: impl FnOnce() -> T,
    ) -> bool {
        self.entities
            .entry(kind.id())
            .or_insert_with(|| Box::new(EntityStore::<K, T>::new()) as Box<dyn Part>)
            .as_any_mut()
            .downcast_mut::<EntityStore<K, T>>()
            .expect("entity kind id maps to a single store type")
            .insert_with(key, value)
    }

    /// Union `pairs` into the pairs loaded for `relation`.
    pub fn add_relation_pairs<Row, L, R, K: Key>(
        &mut self,
        relation: &RelationKind<Row, L, R, K>,
        pairs: impl IntoIterator<Item = (K, K)>,
    ) {
        let mut pairs = pairs.into_iter().peekable();
        if pairs.peek().is_none() {
            return;
        }
        self.relations
            .entry(relation.id())
            .or_insert_with(|| Box::new(PairSet::<K>::new()) as Box<dyn Part>)
            .as_any_mut()
            .downcast_mut::<PairSet<K>>()
            .expect("relation kind id maps to a single pair type")
            .extend(pairs);
    }

    /// The store of `kind`, if any object of that kind was loaded.
    pub fn store<Row, T: Object, K: Key>(
        &self,
        kind: &EntityKind<Row, T, K>,
    ) -> Option<&EntityStore<K, T>> {
        self.entities.get(&kind.id()).map(|part| {
            part.as_any()
                .downcast_ref::<EntityStore<K, T>>()
                .expect("entity kind id maps to a single store type")
        })
    }

    /// The pairs of `relation`, if any were loaded.
    pub fn pair_set<Row, L, R, K: Key>(
        &self,
        relation: &RelationKind<Row, L, R, K>,
    ) -> Option<&PairSet<K>> {
        self.relations.get(&relation.id()).map(|part| {
            part.as_any()
                .downcast_ref::<PairSet<K>>()
                .expect("relation kind id maps to a single pair type")
        })
    }

    /// Objects loaded by `kind`, in insertion order.
    pub fn objects<Row, T: Object, K: Key>(&self, kind: &EntityKind<Row, T, K>) -> Vec<Arc<T>> {
        self.store(kind)
            .map(|store| store.objects().to_vec())
            .unwrap_or_default()
    }

    /// Keys loaded by `kind`, in insertion order.
    pub fn keys<Row, T: Object, K: Key>(&self, kind: &EntityKind<Row, T, K>) -> Vec<K> {
        self.store(kind)
            .map(|store| store.keys().to_vec())
            .unwrap_or_default()
    }

    /// Pairs loaded by `relation`, in first-seen order.
    pub fn pairs<Row, L, R, K: Key>(&self, relation: &RelationKind<Row, L, R, K>) -> Vec<(K, K)> {
        self.pair_set(relation)
            .map(|pairs| pairs.as_slice().to_vec())
            .unwrap_or_default()
    }

    pub fn object_count<Row, T: Object, K: Key>(&self, kind: &EntityKind<Row, T, K>) -> usize {
        self.store(kind).map_or(0, EntityStore::len)
    }

    pub fn pair_count<Row, L, R, K: Key>(&self, relation: &RelationKind<Row, L, R, K>) -> usize {
        self.pair_set(relation).map_or(0, PairSet::len)
    }
}

impl Monoid for ObjectGraph {
    fn empty() -> Self {
        ObjectGraph::empty()
    }

    /// Merge `other` into `self`. Objects already in `self` win key collisions; pairs are
    /// unioned, appending those new to `self` in `other`'s order.
    fn combine(mut self, other: Self) -> Self {
        merge_parts(&mut self.entities, other.entities);
        merge_parts(&mut self.relations, other.relations);
        self
    }
}

impl fmt::Debug for ObjectGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let objects: usize = self.entities.values().map(|p| p.len()).sum();
        let pairs: usize = self.relations.values().map(|p| p.len()).sum();
        f.debug_struct("ObjectGraph")
            .field("entity_kinds", &self.entities.len())
            .field("objects", &objects)
            .field("relations", &self.relations.len())
            .field("pairs", &pairs)
            .finish()
    }
}
