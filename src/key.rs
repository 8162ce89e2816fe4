use core::fmt::Debug;
use core::hash::Hash;

/// Scalar key identifying an object within one [`crate::entity::EntityKind`].
///
/// Compound keys are not supported: a key is a single orderable, hashable value such as an
/// integer or a UUID. Any type with the right bounds qualifies.
pub trait Key: Clone + Eq + Hash + Ord + Debug + Send + Sync + 'static {}

impl<T: Clone + Eq + Hash + Ord + Debug + Send + Sync + 'static> Key for T {}

/// Bound on the objects an [`crate::entity::EntityKind`] constructs.
///
/// Objects are shared as `Arc<T>` between the graph, the link setters and the caller, and may be
/// built on one worker thread and linked on another.
pub trait Object: Send + Sync + 'static {}

impl<T: Send + Sync + 'static> Object for T {}
