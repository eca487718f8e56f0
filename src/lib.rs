//! rcache: an embeddable, in-memory keyspace store.
//!
//! Strings, lists, sets, hashes and sorted sets live in one flat namespace
//! of string keys; every key holds exactly one type. Operations are plain
//! methods on [`InMemoryStore`]; [`SharedStore`] adds a coarse lock for
//! multi-threaded hosts and [`CommandExecutor`] runs textual commands.

/// Textual command parsing and execution (SET, ZADD, ...).
pub mod command;
/// Settings loading.
pub mod config;
/// Value shapes: the tagged value and the sorted set.
pub mod database;
/// Keyspace engine: the store, its type guard and the per-family operations.
pub mod engine;
/// Error and result types.
pub mod error;
/// `tracing` subscriber initialisation.
pub mod logging;

// -----------------------------------------------------------------------------
//  Frequently used public types
// -----------------------------------------------------------------------------

pub use command::{parse_command, Command, CommandExecute, CommandExecutor, Reply};
pub use config::{LogFormat, LoggingConfig, Settings, SlowLogConfig, StoreConfig};
pub use database::{SortedSet, Value, ValueType};
pub use engine::{InMemoryStore, SharedStore, Storage};
pub use error::{ParseError, StatusCode, StoreError, StoreResult};
pub use logging::{init_logging, LoggingError};
