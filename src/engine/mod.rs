//! Keyspace engine.
//!
//! - `storage`: the [`Storage`] trait with the keyspace operations.
//! - `memory`: [`InMemoryStore`], the value store and its type guard.
//! - `string`, `list`, `set`, `hash`, `zset`: per-family operations on
//!   [`InMemoryStore`].
//! - `shared`: [`SharedStore`], a lock-guarded handle for multi-threaded hosts.

pub mod hash;
pub mod list;
pub mod memory;
pub mod set;
pub mod shared;
pub mod storage;
pub mod string;
pub mod zset;

pub use memory::*;
pub use shared::*;
pub use storage::*;
