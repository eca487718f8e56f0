pub mod parser;

pub use parser::ParseError;
pub use rcache_error::{StatusCode, StoreError, StoreResult};
