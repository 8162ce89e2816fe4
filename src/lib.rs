//! # Rowlink
//!
//! Fold the flat rows of a joined query into a graph of linked, deduplicated objects.
//!
//! A query joining several tables returns each parent once per child, and children of unrelated
//! joins once per combination:
//!
//! ```text
//!   foo.id  foo.name   bar.id  bar.foo_id
//!   ──────  ────────   ──────  ──────────
//!   1       "one"      10      1
//!   1       "one"      11      1
//!   2       "two"      null    null
//! ```
//!
//! A [`Loader`](crate::loader::Loader) reads every row with a set of
//! [`EntityKind`](crate::entity::EntityKind)s (how to read a key and an object from a row) and
//! [`RelationKind`](crate::relation::RelationKind)s (how to read a pair of related keys, the arity
//! of each side, and how to link objects). Objects are created once per key, and linking happens
//! only once every row has been seen.
//!
//! ```rust
//! use rowlink::prelude::*;
//! use std::sync::{Arc, OnceLock};
//!
//! struct Row {
//!     foo_id: Option<i64>,
//!     foo_name: &'static str,
//!     bar_id: Option<i64>,
//!     bar_foo_id: Option<i64>,
//! }
//!
//! struct Foo { name: &'static str, bars: OnceLock<Vec<Arc<Bar>>> }
//! struct Bar { id: i64 }
//!
//! let foo = EntityKind::new("foo", |r: &Row| r.foo_id, |r: &Row| Foo {
//!     name: r.foo_name,
//!     bars: OnceLock::new(),
//! });
//! let bar = EntityKind::new("bar", |r: &Row| r.bar_id, |r: &Row| Bar {
//!     id: r.bar_id.unwrap_or_default(),
//! });
//! let foo_bars = RelationKind::builder(&foo, &bar)
//!     .one_to_many(|r: &Row| r.bar_foo_id, |r: &Row| r.bar_id)
//!     .set_many_left(|foo: &Arc<Foo>, bars| {
//!         let _ = foo.bars.set(bars);
//!     })
//!     .build()
//!     .unwrap();
//!
//! let loader = Loader::builder(&foo).relation(&foo_bars).build();
//! let rows = [
//!     Row { foo_id: Some(1), foo_name: "one", bar_id: Some(10), bar_foo_id: Some(1) },
//!     Row { foo_id: Some(1), foo_name: "one", bar_id: Some(11), bar_foo_id: Some(1) },
//!     Row { foo_id: Some(2), foo_name: "two", bar_id: None, bar_foo_id: None },
//! ];
//!
//! let foos = loader.load(&rows).unwrap();
//! assert_eq!(foos.len(), 2);
//! assert_eq!(foos[0].name, "one");
//! let ids: Vec<i64> = foos[0].bars.get().unwrap().iter().map(|b| b.id).collect();
//! assert_eq!(ids, vec![10, 11]);
//! assert!(foos[1].bars.get().unwrap().is_empty());
//! ```
//!
//! # Reduction
//!
//! [`Loader`](crate::loader::Loader) implements the [`Fold`](crate::fold::Fold) protocol: a fresh
//! [`ObjectGraph`](crate::graph::ObjectGraph) per partition, one accumulate step per row, an
//! associative combine of partial graphs, and a finish step that links and returns the roots.
//! With the default `parallel` feature, [`Loader::par_load`](crate::loader::Loader::par_load)
//! folds rows on the rayon thread pool and yields the same objects as a sequential load.
pub mod arity;
pub mod error;
pub mod key;

pub mod entity;
pub mod relation;

pub mod fold;
pub mod graph;
pub mod mapping;

pub mod loader;

pub mod prelude {
    //! The types needed to declare and run a loader.
    pub use crate::arity::*;
    pub use crate::entity::EntityKind;
    pub use crate::error::{ConfigError, LoadError};
    pub use crate::fold::{Fold, Monoid};
    pub use crate::graph::ObjectGraph;
    pub use crate::loader::{Loader, LoaderBuilder};
    pub use crate::relation::{RelationKind, Setter};
}
