//! Value shapes held by the keyspace.
//!
//! - `types`: the tagged [`Value`] variant and its [`ValueType`] tag.
//! - `zset`: the [`SortedSet`] with its coupled score/order/rank structures.
//! - `range`: rank and index window normalisation.

pub mod range;
pub mod types;
pub mod zset;

pub use range::*;
pub use types::*;
pub use zset::*;
