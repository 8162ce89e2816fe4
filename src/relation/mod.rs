//! Relations between entity kinds.
//!
//! A [`RelationKind`] names two entity kinds, the arity of each side, how to read
//! `(left key, right key)` pairs from a row, and the callbacks used to link objects once all rows
//! are loaded.
//!
//! ```rust
//! use rowlink::entity::EntityKind;
//! use rowlink::relation::RelationKind;
//! use std::sync::{Arc, OnceLock};
//!
//! struct Row {
//!     foo_id: Option<i64>,
//!     bar_id: Option<i64>,
//!     bar_foo_id: Option<i64>,
//! }
//!
//! struct Foo { id: i64, bars: OnceLock<Vec<Arc<Bar>>> }
//! struct Bar { id: i64 }
//!
//! let foo = EntityKind::new("foo", |r: &Row| r.foo_id, |r: &Row| Foo {
//!     id: r.foo_id.unwrap_or_default(),
//!     bars: OnceLock::new(),
//! });
//! let bar = EntityKind::new("bar", |r: &Row| r.bar_id, |r: &Row| Bar {
//!     id: r.bar_id.unwrap_or_default(),
//! });
//!
//! // Each foo has many bars, each bar points at exactly one foo through `bar.foo_id`.
//! let foo_bars = RelationKind::builder(&foo, &bar)
//!     .one_to_many(|r: &Row| r.bar_foo_id, |r: &Row| r.bar_id)
//!     .set_many_left(|foo: &Arc<Foo>, bars| {
//!         let _ = foo.bars.set(bars);
//!     })
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(foo_bars.to_string(), "ONE-to-MANY relation <foo, bar>");
//! ```
pub mod builder;
pub mod pairs;

pub use builder::*;
pub use pairs::*;

use crate::arity::Arity;
use crate::entity::{EntityKind, KeyFn, KindId};
use crate::key::Key;

use core::fmt;
use std::sync::Arc;

pub(crate) type PairFn<Row, K> = Box<dyn Fn(&Row) -> Vec<(K, K)> + Send + Sync>;

/// A link callback, tagged by the arity of the objects it receives.
///
/// A left setter of a relation receives right objects and vice versa.
pub enum Setter<A, B> {
    One(Box<dyn Fn(&Arc<A>, Arc<B>) + Send + Sync>),
    ZeroOrOne(Box<dyn Fn(&Arc<A>, Option<Arc<B>>) + Send + Sync>),
    Many(Box<dyn Fn(&Arc<A>, Vec<Arc<B>>) + Send + Sync>),
}

impl<A, B> Setter<A, B> {
    pub fn arity(&self) -> Arity {
        match self {
            Setter::One(_) => Arity::One,
            Setter::ZeroOrOne(_) => Arity::ZeroOrOne,
            Setter::Many(_) => Arity::Many,
        }
    }
}

impl<A, B> fmt::Debug for Setter<A, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Setter({})", self.arity())
    }
}

/// How pairs are read from a row.
pub(crate) enum PairSource<Row, K> {
    /// Read one key for each side; emit a pair only if both are present.
    Keys {
        left: KeyFn<Row, K>,
        right: KeyFn<Row, K>,
    },
    Custom(PairFn<Row, K>),
}

struct RelationKindInner<Row, L, R, K> {
    id: KindId,
    left: EntityKind<Row, L, K>,
    right: EntityKind<Row, R, K>,
    left_arity: Arity,
    right_arity: Arity,
    left_setter: Option<Setter<L, R>>,
    right_setter: Option<Setter<R, L>>,
    pairs: PairSource<Row, K>,
}

/// A relation between objects of kind `left` and objects of kind `right`.
///
/// Like [`EntityKind`], a relation is an immutable descriptor compared by identity; the pairs it
/// reads live in an [`crate::graph::ObjectGraph`]. Construct one with [`RelationKind::builder`].
pub struct RelationKind<Row, L, R, K> {
    inner: Arc<RelationKindInner<Row, L, R, K>>,
}

impl<Row, L, R, K: Key> RelationKind<Row, L, R, K> {
    pub fn builder(
        left: &EntityKind<Row, L, K>,
        right: &EntityKind<Row, R, K>,
    ) -> RelationBuilder<Row, L, R, K> {
        RelationBuilder::new(left, right)
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_parts(
        left: EntityKind<Row, L, K>,
        right: EntityKind<Row, R, K>,
        left_arity: Arity,
        right_arity: Arity,
        left_setter: Option<Setter<L, R>>,
        right_setter: Option<Setter<R, L>>,
        pairs: PairSource<Row, K>,
    ) -> Self {
        RelationKind {
            inner: Arc::new(RelationKindInner {
                id: KindId::fresh(),
                left,
                right,
                left_arity,
                right_arity,
                left_setter,
                right_setter,
                pairs,
            }),
        }
    }

    /// The pairs evidenced by a single row; usually zero or one.
    pub fn extract_pairs(&self, row: &Row) -> Vec<(K, K)> {
        match &self.inner.pairs {
            PairSource::Keys { left, right } => match (left(row), right(row)) {
                (Some(l), Some(r)) => vec![(l, r)],
                _ => vec![],
            },
            PairSource::Custom(extract) => extract(row),
        }
    }
}

impl<Row, L, R, K> RelationKind<Row, L, R, K> {
    pub fn id(&self) -> KindId {
        self.inner.id
    }

    pub fn left(&self) -> &EntityKind<Row, L, K> {
        &self.inner.left
    }

    pub fn right(&self) -> &EntityKind<Row, R, K> {
        &self.inner.right
    }

    /// Number of right objects each left object is linked to.
    pub fn right_arity(&self) -> Arity {
        self.inner.right_arity
    }

    /// Number of left objects each right object is linked to.
    pub fn left_arity(&self) -> Arity {
        self.inner.left_arity
    }

    pub(crate) fn left_setter(&self) -> Option<&Setter<L, R>> {
        self.inner.left_setter.as_ref()
    }

    pub(crate) fn right_setter(&self) -> Option<&Setter<R, L>> {
        self.inner.right_setter.as_ref()
    }
}

impl<Row, L, R, K> Clone for RelationKind<Row, L, R, K> {
    fn clone(&self) -> Self {
        RelationKind {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<Row, L, R, K> PartialEq for RelationKind<Row, L, R, K> {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl<Row, L, R, K> Eq for RelationKind<Row, L, R, K> {}

impl<Row, L, R, K> fmt::Display for RelationKind<Row, L, R, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-to-{} relation <{}, {}>",
            self.inner.left_arity, self.inner.right_arity, self.inner.left, self.inner.right
        )
    }
}

impl<Row, L, R, K> fmt::Debug for RelationKind<Row, L, R, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelationKind")
            .field("id", &self.inner.id)
            .field("left", &self.inner.left)
            .field("right", &self.inner.right)
            .field("left_arity", &self.inner.left_arity)
            .field("right_arity", &self.inner.right_arity)
            .field("left_setter", &self.inner.left_setter)
            .field("right_setter", &self.inner.right_setter)
            .finish()
    }
}
