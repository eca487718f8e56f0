use std::collections::HashMap;

use tracing::{debug, trace};

use super::storage::Storage;
use crate::{
    config::StoreConfig,
    database::{Value, ValueType},
    error::{StoreError, StoreResult},
};

/// Single-threaded keyspace.
///
/// Owns every value; the type tag of a key is the discriminant of its
/// [`Value`]. The per-family operations live in the sibling modules
/// (`string`, `list`, `set`, `hash`, `zset`) as further `impl` blocks.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    data: HashMap<String, Value>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-sizes the key table.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: HashMap::with_capacity(capacity),
        }
    }

    pub fn from_config(config: &StoreConfig) -> Self {
        Self::with_capacity(config.initial_capacity)
    }

    /// Same as [`Storage::flushdb`]; there is a single database.
    pub fn flushall(&mut self) {
        self.flushdb();
    }

    /// Fails with `WrongType` if `key` exists with a tag other than
    /// `expected`. An absent key passes.
    pub fn check_type(
        &self,
        key: &str,
        expected: ValueType,
    ) -> StoreResult<()> {
        match self.type_of(key) {
            Some(actual) if actual != expected => {
                debug!(key, %expected, %actual, "type check failed");
                Err(wrong_type(key, expected, actual))
            }
            _ => Ok(()),
        }
    }

    /// Type-checked read access.
    pub(crate) fn get_typed(
        &self,
        key: &str,
        expected: ValueType,
    ) -> StoreResult<Option<&Value>> {
        self.check_type(key, expected)?;
        Ok(self.data.get(key))
    }

    /// Type-checked write access to an existing key.
    pub(crate) fn get_typed_mut(
        &mut self,
        key: &str,
        expected: ValueType,
    ) -> StoreResult<Option<&mut Value>> {
        self.check_type(key, expected)?;
        Ok(self.data.get_mut(key))
    }

    /// Type-checked write access, materialising the key with `init` when it
    /// is absent.
    pub(crate) fn get_or_create(
        &mut self,
        key: &str,
        expected: ValueType,
        init: impl FnOnce() -> Value,
    ) -> StoreResult<&mut Value> {
        self.check_type(key, expected)?;
        Ok(self.data.entry(key.to_string()).or_insert_with(|| {
            trace!(key, ty = %expected, "key created");
            init()
        }))
    }

    /// Stores `value` under `key`, replacing whatever was there.
    pub(crate) fn put(
        &mut self,
        key: &str,
        value: Value,
    ) {
        self.data.insert(key.to_string(), value);
    }

    /// Deletes `key` if it holds an empty container.
    pub(crate) fn purge_if_empty(
        &mut self,
        key: &str,
    ) {
        let empty = match self.data.get(key) {
            Some(Value::List(l)) => l.is_empty(),
            Some(Value::Set(s)) => s.is_empty(),
            Some(Value::Hash(h)) => h.is_empty(),
            Some(Value::ZSet(z)) => z.is_empty(),
            _ => false,
        };
        if empty {
            trace!(key, "empty container removed");
            self.data.remove(key);
        }
    }
}

pub(crate) fn wrong_type(
    key: &str,
    expected: ValueType,
    actual: ValueType,
) -> StoreError {
    StoreError::WrongType {
        key: key.to_string(),
        expected: expected.as_str(),
        actual: actual.as_str(),
    }
}

impl Storage for InMemoryStore {
    fn exists(
        &self,
        key: &str,
    ) -> bool {
        self.data.contains_key(key)
    }

    fn del(
        &mut self,
        key: &str,
    ) -> bool {
        self.data.remove(key).is_some()
    }

    fn rename(
        &mut self,
        from: &str,
        to: &str,
    ) -> StoreResult<()> {
        let value = self.data.remove(from).ok_or_else(|| StoreError::NoSuchKey {
            key: from.to_string(),
        })?;
        trace!(from, to, "key renamed");
        self.data.insert(to.to_string(), value);
        Ok(())
    }

    fn renamenx(
        &mut self,
        from: &str,
        to: &str,
    ) -> StoreResult<bool> {
        if !self.exists(from) {
            return Err(StoreError::NoSuchKey {
                key: from.to_string(),
            });
        }
        if self.exists(to) {
            return Ok(false);
        }
        self.rename(from, to)?;
        Ok(true)
    }

    fn type_of(
        &self,
        key: &str,
    ) -> Option<ValueType> {
        self.data.get(key).map(Value::value_type)
    }

    fn dbsize(&self) -> usize {
        self.data.len()
    }

    fn flushdb(&mut self) {
        debug!(keys = self.data.len(), "keyspace flushed");
        self.data.clear();
    }
}
