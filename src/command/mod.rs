//! Command layer on top of the store.
//!
//! - `execute`: the [`Command`] enum, the [`CommandExecute`] trait and the
//!   [`CommandExecutor`] (logging, slow log, last error).
//! - `parser`: textual command parsing.
//! - `reply`: the [`Reply`] returned by every command.

pub mod execute;
pub mod parser;
pub mod reply;

pub use execute::*;
pub use parser::*;
pub use reply::*;
