//! Errors raised while configuring relations and while finishing a fold.
use crate::arity::{Arity, Side};

use thiserror::Error;

/// Errors reported by [`crate::fold::Fold::finish`] and the [`crate::loader::Loader`]
/// conveniences.
///
/// Accumulating and combining never fail: a partial graph is incomplete by nature, so all
/// validation happens once every row has been seen.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// A relation pair refers to a key that no row loaded into the entity store.
    #[error("unknown key requested from entity {entity}: {key}")]
    UnknownKey { entity: String, key: String },

    /// A `ONE` or `ZERO_OR_ONE` side resolved to the wrong number of objects. `linked` holds the
    /// keys of the objects it resolved to.
    #[error(
        "{left_arity}-to-{right_arity} relation {relation} expects {expected} linked object(s) \
         for key {object}, found {found} [{}]",
        .linked.join(", ")
    )]
    ArityViolation {
        relation: String,
        left_arity: Arity,
        right_arity: Arity,
        expected: Arity,
        found: usize,
        object: String,
        linked: Vec<String>,
    },

    /// `load_one` found no root objects.
    #[error("no objects were loaded")]
    NoObjects,

    /// `load_one` or `load_optional` found more than one root object.
    #[error("expected at most one object, {count} were loaded")]
    MultipleObjects { count: usize },
}

/// Malformed relation declarations, reported by [`crate::relation::RelationBuilder::build`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("relation between {left} and {right} declares no arities")]
    ArityNotSet { left: String, right: String },

    #[error("relation type between {left} and {right} is already set")]
    ArityAlreadySet { left: String, right: String },

    /// A setter's shape does not match the arity it receives. The left setter receives the
    /// right arity and vice versa.
    #[error(
        "{side} setter of relation between {left} and {right} takes {setter}, \
         but the declared arity is {declared}"
    )]
    SetterArityMismatch {
        left: String,
        right: String,
        side: Side,
        declared: Arity,
        setter: Arity,
    },

    #[error("relation between {left} and {right} has no setters")]
    NoSetter { left: String, right: String },

    #[error("relation between {left} and {right} has neither key columns nor a pair extractor")]
    NoPairSource { left: String, right: String },
}

pub type Result<T, E = LoadError> = core::result::Result<T, E>;
