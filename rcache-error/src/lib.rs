//! Centralised error handling for rcache.
//!
//! Every fallible keyspace operation returns [`StoreResult`]. Absence of a
//! key or member is never an error; it is reported through `Option`, `bool`
//! or zero counts by the operation itself.

pub mod status_code;
pub mod store;

pub use status_code::*;
pub use store::*;
