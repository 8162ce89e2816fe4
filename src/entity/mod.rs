//! Entity kinds and the per-kind stores of deduplicated objects.
pub mod kind;
pub mod store;

pub use kind::*;
pub use store::*;
