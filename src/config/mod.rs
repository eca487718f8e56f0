//! Runtime settings loaded with the `config` crate.

pub mod settings;

pub use settings::*;
