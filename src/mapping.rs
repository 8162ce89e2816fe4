//! Resolving relation pairs into linked objects.
//!
//! Linking happens strictly after every row has been loaded: pairs are resolved by key lookup in
//! entity stores that are already complete, so cyclic and self-referential relations need no
//! placeholders and no recursion.
use crate::arity::Arity;
use crate::entity::EntityStore;
use crate::error::{LoadError, Result};
use crate::graph::ObjectGraph;
use crate::key::{Key, Object};
use crate::relation::{RelationKind, Setter};

use std::sync::Arc;

/// The objects linked to one object through a relation.
#[derive(Debug)]
pub struct Adjacency<K, A, B> {
    pub key: K,
    pub object: Arc<A>,
    pub linked: Vec<Arc<B>>,
    /// keys of `linked`, index for index
    pub linked_keys: Vec<K>,
}

/// Both directions of a resolved relation.
///
/// `successors` has one entry per left object and `predecessors` one per right object, in entity
/// store order; objects taking part in no pair have an empty `linked` list. Linked objects follow
/// pair encounter order.
#[derive(Debug)]
pub struct ObjectMapping<K, L, R> {
    pub successors: Vec<Adjacency<K, L, R>>,
    pub predecessors: Vec<Adjacency<K, R, L>>,
}

impl<K: Key, L: Object, R: Object> ObjectMapping<K, L, R> {
    /// Resolve the pairs of `relation` loaded into `graph`.
    ///
    /// # Errors
    ///
    /// [`LoadError::UnknownKey`] if a pair refers to a key missing from its entity store.
    pub fn resolve<Row>(
        graph: &ObjectGraph,
        relation: &RelationKind<Row, L, R, K>,
    ) -> Result<Self> {
        let empty_left = EntityStore::new();
        let empty_right = EntityStore::new();
        let left = graph.store(relation.left()).unwrap_or(&empty_left);
        let right = graph.store(relation.right()).unwrap_or(&empty_right);

        let mut successors = adjacency::<K, L, R>(left);
        let mut predecessors = adjacency::<K, R, L>(right);

        if let Some(pairs) = graph.pair_set(relation) {
            for (lk, rk) in pairs.iter() {
                let l = lookup(left, relation.left().name(), lk)?;
                let r = lookup(right, relation.right().name(), rk)?;
                successors[l].linked.push(Arc::clone(&right.objects()[r]));
                successors[l].linked_keys.push(rk.clone());
                predecessors[r].linked.push(Arc::clone(&left.objects()[l]));
                predecessors[r].linked_keys.push(lk.clone());
            }
        }

        Ok(ObjectMapping {
            successors,
            predecessors,
        })
    }
}

fn adjacency<K: Key, A, B>(store: &EntityStore<K, A>) -> Vec<Adjacency<K, A, B>> {
    store
        .iter()
        .map(|(key, object)| Adjacency {
            key: key.clone(),
            object: Arc::clone(object),
            linked: vec![],
            linked_keys: vec![],
        })
        .collect()
}

fn lookup<K: Key, T>(store: &EntityStore<K, T>, entity: &str, key: &K) -> Result<usize> {
    store.position(key).ok_or_else(|| LoadError::UnknownKey {
        entity: entity.to_string(),
        key: format!("{key:?}"),
    })
}

impl<Row, L: Object, R: Object, K: Key> RelationKind<Row, L, R, K> {
    /// Resolve this relation in `graph` and call its setters.
    ///
    /// The left setter is called once per left object with its successors, the right setter once
    /// per right object with its predecessors, each reshaped to the arity the setter takes.
    ///
    /// # Errors
    ///
    /// [`LoadError::UnknownKey`] from [`ObjectMapping::resolve`], or
    /// [`LoadError::ArityViolation`] when a `ONE` side does not resolve to exactly one object or
    /// a `ZERO_OR_ONE` side resolves to more than one.
    pub fn link(&self, graph: &ObjectGraph) -> Result<()> {
        let mapping = ObjectMapping::resolve(graph, self)?;
        if let Some(setter) = self.left_setter() {
            self.link_side(setter, mapping.successors)?;
        }
        if let Some(setter) = self.right_setter() {
            self.link_side(setter, mapping.predecessors)?;
        }
        Ok(())
    }

    fn link_side<A, B>(
        &self,
        setter: &Setter<A, B>,
        adjacency: Vec<Adjacency<K, A, B>>,
    ) -> Result<()> {
        match setter {
            Setter::Many(set) => {
                for a in adjacency {
                    set(&a.object, a.linked);
                }
            }
            Setter::One(set) => {
                for a in adjacency {
                    if !Arity::One.admits(a.linked.len()) {
                        return Err(self.arity_violation(Arity::One, &a.key, &a.linked_keys));
                    }
                    let b = a.linked.into_iter().next();
                    set(&a.object, b.expect("ONE admits exactly one linked object"));
                }
            }
            Setter::ZeroOrOne(set) => {
                for a in adjacency {
                    if !Arity::ZeroOrOne.admits(a.linked.len()) {
                        return Err(self.arity_violation(Arity::ZeroOrOne, &a.key, &a.linked_keys));
                    }
                    set(&a.object, a.linked.into_iter().next());
                }
            }
        }
        Ok(())
    }

    fn arity_violation(&self, expected: Arity, key: &K, linked: &[K]) -> LoadError {
        LoadError::ArityViolation {
            relation: format!("<{}, {}>", self.left(), self.right()),
            left_arity: self.left_arity(),
            right_arity: self.right_arity(),
            expected,
            found: linked.len(),
            object: format!("{key:?}"),
            linked: linked.iter().map(|k| format!("{k:?}")).collect(),
        }
    }
}
