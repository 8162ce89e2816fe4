use crate::key::{Key, Object};

use core::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

static NEXT_KIND_ID: AtomicU64 = AtomicU64::new(0);

/// Identity of an entity or relation descriptor.
///
/// Ids are handed out once per constructed descriptor, so two descriptors built from the same
/// functions are still distinct kinds. Clones of a descriptor share its id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KindId(u64);

impl KindId {
    pub(crate) fn fresh() -> Self {
        KindId(NEXT_KIND_ID.fetch_add(1, Ordering::Relaxed))
    }
}

pub(crate) type KeyFn<Row, K> = Box<dyn Fn(&Row) -> Option<K> + Send + Sync>;
type ValueFn<Row, T> = Box<dyn Fn(&Row) -> T + Send + Sync>;

struct EntityKindInner<Row, T, K> {
    id: KindId,
    name: String,
    key: KeyFn<Row, K>,
    value: ValueFn<Row, T>,
}

/// Describes a class of objects of type `T`, addressed by a key of type `K`, that can be read
/// from rows of type `Row`.
///
/// An [`EntityKind`] holds no state of its own: objects read from rows live in an
/// [`crate::graph::ObjectGraph`], which uses the descriptor only as a lookup key.
pub struct EntityKind<Row, T, K> {
    inner: Arc<EntityKindInner<Row, T, K>>,
}

impl<Row, T: Object, K: Key> EntityKind<Row, T, K> {
    /// Create a new entity kind.
    ///
    /// `key` reads the key from a row and returns `None` when the row carries no object of this
    /// kind (for example, when a left join contributed only nulls). `value` decodes the object
    /// and is only called for rows whose key has not been seen yet.
    pub fn new(
        name: impl Into<String>,
        key: impl Fn(&Row) -> Option<K> + Send + Sync + 'static,
        value: impl Fn(&Row) -> T + Send + Sync + 'static,
    ) -> Self {
        EntityKind {
            inner: Arc::new(EntityKindInner {
                id: KindId::fresh(),
                name: name.into(),
                key: Box::new(key),
                value: Box::new(value),
            }),
        }
    }
}

impl<Row, T, K> EntityKind<Row, T, K> {
    pub fn id(&self) -> KindId {
        self.inner.id
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// The key of the object `row` carries, if any.
    pub fn key(&self, row: &Row) -> Option<K> {
        (self.inner.key)(row)
    }

    /// Decode the object carried by `row`.
    pub fn value(&self, row: &Row) -> T {
        (self.inner.value)(row)
    }
}

impl<Row, T, K> Clone for EntityKind<Row, T, K> {
    fn clone(&self) -> Self {
        EntityKind {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<Row, T, K> PartialEq for EntityKind<Row, T, K> {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl<Row, T, K> Eq for EntityKind<Row, T, K> {}

impl<Row, T, K> fmt::Debug for EntityKind<Row, T, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityKind")
            .field("id", &self.inner.id)
            .field("name", &self.inner.name)
            .finish()
    }
}

impl<Row, T, K> fmt::Display for EntityKind<Row, T, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inner.name)
    }
}
