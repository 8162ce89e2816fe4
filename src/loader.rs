//! Immutable loader configuration and the [`Fold`] it implements.
use crate::entity::{EntityKind, KindId};
use crate::error::{LoadError, Result};
use crate::fold::{self, Fold, Monoid};
use crate::graph::ObjectGraph;
use crate::key::{Key, Object};
use crate::relation::RelationKind;

use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, trace};

/// An entity kind with its object type and key type erased.
trait AnyEntity<Row>: Send + Sync {
    fn accumulate(&self, graph: &mut ObjectGraph, row: &Row);
}

impl<Row, T: Object, K: Key> AnyEntity<Row> for EntityKind<Row, T, K> {
    fn accumulate(&self, graph: &mut ObjectGraph, row: &Row) {
        if let Some(key) = self.key(row) {
            graph.add_entity(self, key, || self.value(row));
        }
    }
}

/// A relation kind with its object types and key type erased.
trait AnyRelation<Row>: Send + Sync {
    fn accumulate(&self, graph: &mut ObjectGraph, row: &Row);
    fn link(&self, graph: &ObjectGraph) -> Result<()>;
    fn describe(&self) -> String;
    fn pair_count(&self, graph: &ObjectGraph) -> usize;
}

impl<Row, L: Object, R: Object, K: Key> AnyRelation<Row> for RelationKind<Row, L, R, K> {
    fn accumulate(&self, graph: &mut ObjectGraph, row: &Row) {
        graph.add_relation_pairs(self, self.extract_pairs(row));
    }

    fn link(&self, graph: &ObjectGraph) -> Result<()> {
        RelationKind::link(self, graph)
    }

    fn describe(&self) -> String {
        self.to_string()
    }

    fn pair_count(&self, graph: &ObjectGraph) -> usize {
        graph.pair_count(self)
    }
}

/// The entity kind whose objects a [`Loader`] returns.
trait Roots<T>: Send + Sync {
    fn objects(&self, graph: &ObjectGraph) -> Vec<Arc<T>>;
}

impl<Row, T: Object, K: Key> Roots<T> for EntityKind<Row, T, K> {
    fn objects(&self, graph: &ObjectGraph) -> Vec<Arc<T>> {
        graph.objects(self)
    }
}

struct LoaderInner<Row, T> {
    root: Box<dyn Roots<T>>,
    entities: Vec<Box<dyn AnyEntity<Row>>>,
    relations: Vec<Box<dyn AnyRelation<Row>>>,
}

/// Turns rows of type `Row` into linked objects of the root type `T`.
///
/// A [`Loader`] is an immutable configuration: the entity kinds to read from each row, the
/// relations between them, and the root kind whose objects are returned. Every fold run gets its
/// own fresh [`ObjectGraph`] from [`Fold::create`], so one loader can serve any number of
/// concurrent runs.
///
/// Use [`Loader::load`] for a sequential run, [`Loader::par_load`] to fold on the rayon thread
/// pool, or drive the [`Fold`] implementation directly from another reduction engine.
///
/// # Row lifetime
///
/// `Row` must be `'static`: the loader keeps its entity kinds and relations as trait objects, and
/// those own their key readers. Rows are only ever borrowed during a run, so rows that borrow
/// from a result buffer are loaded by reading them into an owned row type first:
///
/// ```rust
/// use rowlink::prelude::*;
///
/// struct Row {
///     id: Option<u32>,
///     name: String,
/// }
///
/// let name = EntityKind::new("name", |r: &Row| r.id, |r: &Row| r.name.clone());
/// let loader = Loader::builder(&name).build();
///
/// // Borrowed records, such as the lines of a local buffer.
/// let buffer = String::from("1,one\n2,two\n1,uno");
/// let rows: Vec<Row> = buffer
///     .lines()
///     .filter_map(|line| line.split_once(','))
///     .map(|(id, name)| Row { id: id.parse().ok(), name: name.to_string() })
///     .collect();
///
/// let names = loader.load(&rows).unwrap();
/// assert_eq!(names.iter().map(|n| n.as_str()).collect::<Vec<_>>(), vec!["one", "two"]);
/// ```
pub struct Loader<Row, T> {
    inner: Arc<LoaderInner<Row, T>>,
}

impl<Row, T> Clone for Loader<Row, T> {
    fn clone(&self) -> Self {
        Loader {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<Row: 'static, T: Object> Loader<Row, T> {
    pub fn builder<K: Key>(root: &EntityKind<Row, T, K>) -> LoaderBuilder<Row, T> {
        LoaderBuilder::new(root)
    }

    /// Fold `rows` sequentially and return the root objects, linked, in first-seen order.
    pub fn load<'a>(&self, rows: impl IntoIterator<Item = &'a Row>) -> Result<Vec<Arc<T>>>
    where
        Row: 'a,
    {
        fold::sequential(self, rows)
    }

    /// Like [`Loader::load`], but exactly one root object must be loaded.
    pub fn load_one<'a>(&self, rows: impl IntoIterator<Item = &'a Row>) -> Result<Arc<T>>
    where
        Row: 'a,
    {
        self.load_optional(rows)?.ok_or(LoadError::NoObjects)
    }

    /// Like [`Loader::load`], but at most one root object may be loaded.
    pub fn load_optional<'a>(
        &self,
        rows: impl IntoIterator<Item = &'a Row>,
    ) -> Result<Option<Arc<T>>>
    where
        Row: 'a,
    {
        let mut objects = self.load(rows)?;
        match objects.len() {
            0 | 1 => Ok(objects.pop()),
            count => Err(LoadError::MultipleObjects { count }),
        }
    }

    /// Fold `rows` on the rayon thread pool. The result equals that of [`Loader::load`].
    #[cfg(feature = "parallel")]
    pub fn par_load(&self, rows: &[Row]) -> Result<Vec<Arc<T>>>
    where
        Row: Sync,
    {
        debug!(rows = rows.len(), "loading rows in parallel");
        fold::parallel(self, rows)
    }

    pub fn entity_count(&self) -> usize {
        self.inner.entities.len()
    }

    pub fn relation_count(&self) -> usize {
        self.inner.relations.len()
    }
}

impl<Row: 'static, T: Object> Fold<Row> for Loader<Row, T> {
    type Acc = ObjectGraph;
    type Output = Vec<Arc<T>>;
    type Error = LoadError;

    fn create(&self) -> ObjectGraph {
        ObjectGraph::empty()
    }

    /// Load the object of every entity kind whose key is present in `row`, and the pairs of every
    /// relation.
    fn accumulate(&self, graph: &mut ObjectGraph, row: &Row) {
        for entity in &self.inner.entities {
            entity.accumulate(graph, row);
        }
        for relation in &self.inner.relations {
            relation.accumulate(graph, row);
        }
    }

    fn combine(&self, a: ObjectGraph, b: ObjectGraph) -> ObjectGraph {
        a.combine(b)
    }

    /// Link every relation, then return the root objects.
    ///
    /// Relations are independent of each other and are linked in declaration order.
    fn finish(&self, graph: ObjectGraph) -> Result<Vec<Arc<T>>> {
        debug!(relations = self.inner.relations.len(), "linking object graph");
        for relation in &self.inner.relations {
            trace!(
                relation = %relation.describe(),
                pairs = relation.pair_count(&graph),
                "linking relation"
            );
            relation.link(&graph)?;
        }
        let objects = self.inner.root.objects(&graph);
        debug!(objects = objects.len(), "loaded root objects");
        Ok(objects)
    }
}

/// Collects the entity kinds and relations of a [`Loader`].
///
/// Both sides of every relation are registered automatically; [`LoaderBuilder::entity`] is only
/// needed for kinds that take part in no relation. Kinds and relations registered more than once
/// are kept once.
pub struct LoaderBuilder<Row, T> {
    root: Box<dyn Roots<T>>,
    entities: Vec<Box<dyn AnyEntity<Row>>>,
    relations: Vec<Box<dyn AnyRelation<Row>>>,
    registered: HashSet<KindId>,
}

impl<Row: 'static, T: Object> LoaderBuilder<Row, T> {
    pub fn new<K: Key>(root: &EntityKind<Row, T, K>) -> Self {
        let builder = LoaderBuilder {
            root: Box::new(root.clone()),
            entities: vec![],
            relations: vec![],
            registered: HashSet::new(),
        };
        builder.entity(root)
    }

    /// Register an entity kind to load from every row.
    pub fn entity<U: Object, K: Key>(mut self, kind: &EntityKind<Row, U, K>) -> Self {
        if self.registered.insert(kind.id()) {
            self.entities.push(Box::new(kind.clone()));
        }
        self
    }

    /// Register a relation and both of its entity kinds.
    pub fn relation<L: Object, R: Object, K: Key>(
        mut self,
        relation: &RelationKind<Row, L, R, K>,
    ) -> Self {
        if self.registered.insert(relation.id()) {
            self.relations.push(Box::new(relation.clone()));
        }
        self.entity(relation.left()).entity(relation.right())
    }

    pub fn build(self) -> Loader<Row, T> {
        Loader {
            inner: Arc::new(LoaderInner {
                root: self.root,
                entities: self.entities,
                relations: self.relations,
            }),
        }
    }
}
