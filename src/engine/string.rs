//! String family: text, integer and float scalars.

use super::{InMemoryStore, Storage};
use crate::{
    database::{Value, ValueType},
    error::{StoreError, StoreResult},
};

impl InMemoryStore {
    /// Reads a scalar. Absent keys read as `None`.
    pub fn get(
        &self,
        key: &str,
    ) -> StoreResult<Option<Value>> {
        Ok(self.get_typed(key, ValueType::String)?.cloned())
    }

    /// Stores a scalar, creating the key or replacing its previous scalar.
    ///
    /// Containers and non-finite floats are rejected with `InvalidValue`.
    pub fn set(
        &mut self,
        key: &str,
        value: impl Into<Value>,
    ) -> StoreResult<()> {
        let value = value.into().into_scalar()?;
        self.check_type(key, ValueType::String)?;
        self.put(key, value);
        Ok(())
    }

    /// Stores the scalar only if the key is absent.
    pub fn set_nx(
        &mut self,
        key: &str,
        value: impl Into<Value>,
    ) -> StoreResult<bool> {
        let value = value.into().into_scalar()?;
        if self.exists(key) {
            return Ok(false);
        }
        self.put(key, value);
        Ok(true)
    }

    /// Stores a new scalar and returns the one it replaced.
    pub fn get_set(
        &mut self,
        key: &str,
        value: impl Into<Value>,
    ) -> StoreResult<Option<Value>> {
        let value = value.into().into_scalar()?;
        let previous = self.get(key)?;
        self.put(key, value);
        Ok(previous)
    }

    pub fn incr(
        &mut self,
        key: &str,
    ) -> StoreResult<i64> {
        self.incr_by(key, 1)
    }

    pub fn decr(
        &mut self,
        key: &str,
    ) -> StoreResult<i64> {
        self.incr_by(key, -1)
    }

    pub fn decr_by(
        &mut self,
        key: &str,
        delta: i64,
    ) -> StoreResult<i64> {
        let delta = delta
            .checked_neg()
            .ok_or_else(|| StoreError::invalid("decrement would overflow"))?;
        self.incr_by(key, delta)
    }

    /// Adds `delta` to an integer value. An absent key starts at `0`.
    pub fn incr_by(
        &mut self,
        key: &str,
        delta: i64,
    ) -> StoreResult<i64> {
        let current = match self.get(key)? {
            None => 0,
            Some(v) => match v.to_int() {
                Some(n) => n,
                // Fractional values keep their precision through incr_by_float only.
                None if v.to_float().is_some() => {
                    return Err(StoreError::invalid(format!(
                        "value at key '{key}' is not an integer"
                    )));
                }
                None => {
                    return Err(StoreError::NotANumber {
                        key: key.to_string(),
                    })
                }
            },
        };
        let next = current
            .checked_add(delta)
            .ok_or_else(|| StoreError::invalid("increment would overflow"))?;
        self.put(key, Value::Int(next));
        Ok(next)
    }

    /// Adds `delta` to a numeric value, storing a float.
    pub fn incr_by_float(
        &mut self,
        key: &str,
        delta: f64,
    ) -> StoreResult<f64> {
        if !delta.is_finite() {
            return Err(StoreError::invalid("increment is not a finite number"));
        }
        let current = match self.get(key)? {
            None => 0.0,
            Some(v) => v.to_float().ok_or_else(|| StoreError::NotANumber {
                key: key.to_string(),
            })?,
        };
        let next = current + delta;
        if !next.is_finite() {
            return Err(StoreError::invalid("increment would produce a non-finite value"));
        }
        self.put(key, Value::Float(next));
        Ok(next)
    }

    /// Appends the text form of `value`; returns the new length in bytes.
    pub fn append(
        &mut self,
        key: &str,
        value: impl Into<Value>,
    ) -> StoreResult<usize> {
        let suffix = value
            .into()
            .into_scalar()?
            .as_text()
            .unwrap_or_default();
        let mut text = match self.get(key)? {
            Some(v) => v.as_text().unwrap_or_default(),
            None => String::new(),
        };
        text.push_str(&suffix);
        let len = text.len();
        self.put(key, Value::Str(text));
        Ok(len)
    }

    /// Length in bytes of the text form; `0` when absent.
    pub fn strlen(
        &self,
        key: &str,
    ) -> StoreResult<usize> {
        Ok(self
            .get(key)?
            .and_then(|v| v.as_text())
            .map_or(0, |s| s.len()))
    }

    /// Reads several keys. Absent or non-string keys read as `None`.
    pub fn mget(
        &self,
        keys: &[&str],
    ) -> Vec<Option<Value>> {
        keys.iter()
            .map(|key| self.get(key).ok().flatten())
            .collect()
    }

    /// Stores several scalars. Nothing is written unless every entry is a
    /// valid scalar aimed at an absent or string key.
    pub fn mset(
        &mut self,
        entries: Vec<(&str, Value)>,
    ) -> StoreResult<()> {
        let mut checked = Vec::with_capacity(entries.len());
        for (key, value) in entries {
            self.check_type(key, ValueType::String)?;
            checked.push((key, value.into_scalar()?));
        }
        for (key, value) in checked {
            self.put(key, value);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_rejects_containers() {
        let mut store = InMemoryStore::new();
        let err = store
            .set("k", Value::List(Default::default()))
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidValue(_)));
        assert!(!store.exists("k"));
    }

    #[test]
    fn test_set_on_other_type_fails() {
        let mut store = InMemoryStore::new();
        store.sadd("s", "x").unwrap();
        assert!(matches!(
            store.set("s", "text"),
            Err(StoreError::WrongType { .. })
        ));
        assert!(store.sismember("s", "x").unwrap());
    }

    #[test]
    fn test_incr_by_initialises_absent_key() {
        let mut store = InMemoryStore::new();
        assert_eq!(store.incr_by("n", 5).unwrap(), 5);
        assert_eq!(store.get("n").unwrap(), Some(Value::Int(5)));
        assert_eq!(store.decr_by("m", 3).unwrap(), -3);
        assert_eq!(store.incr("n").unwrap(), 6);
        assert_eq!(store.decr("n").unwrap(), 5);
    }

    #[test]
    fn test_incr_by_numeric_text() {
        let mut store = InMemoryStore::new();
        store.set("n", "10").unwrap();
        assert_eq!(store.incr_by("n", 5).unwrap(), 15);
        assert_eq!(store.get("n").unwrap(), Some(Value::Int(15)));
    }

    #[test]
    fn test_incr_by_non_numeric_leaves_value() {
        let mut store = InMemoryStore::new();
        store.set("n", "x").unwrap();
        assert_eq!(
            store.incr_by("n", 1),
            Err(StoreError::NotANumber { key: "n".into() })
        );
        assert_eq!(store.get("n").unwrap(), Some(Value::from("x")));
    }

    #[test]
    fn test_incr_overflow_is_invalid() {
        let mut store = InMemoryStore::new();
        store.set("n", i64::MAX).unwrap();
        assert!(matches!(
            store.incr("n"),
            Err(StoreError::InvalidValue(_))
        ));
        assert_eq!(store.get("n").unwrap(), Some(Value::Int(i64::MAX)));
    }

    #[test]
    fn test_incr_by_float() {
        let mut store = InMemoryStore::new();
        store.set("f", 10i64).unwrap();
        assert_eq!(store.incr_by_float("f", 0.5).unwrap(), 10.5);
        assert_eq!(store.get("f").unwrap(), Some(Value::Float(10.5)));
        assert!(store.incr_by_float("f", f64::NAN).is_err());
    }

    #[test]
    fn test_incr_after_incr_by_float() {
        let mut store = InMemoryStore::new();
        store.incr_by_float("n", 5.0).unwrap();
        assert_eq!(store.get("n").unwrap(), Some(Value::Float(5.0)));
        assert_eq!(store.incr_by("n", 1).unwrap(), 6);
        assert_eq!(store.get("n").unwrap(), Some(Value::Int(6)));

        store.set("t", "7.0").unwrap();
        assert_eq!(store.incr("t").unwrap(), 8);
    }

    #[test]
    fn test_incr_by_fractional_value_is_invalid() {
        let mut store = InMemoryStore::new();
        store.set("f", 1.5).unwrap();
        assert!(matches!(
            store.incr_by("f", 1),
            Err(StoreError::InvalidValue(_))
        ));
        assert_eq!(store.get("f").unwrap(), Some(Value::Float(1.5)));
        assert_eq!(store.incr_by_float("f", 1.0).unwrap(), 2.5);

        store.set("big", 1e300).unwrap();
        assert!(matches!(
            store.incr("big"),
            Err(StoreError::InvalidValue(_))
        ));
    }

    #[test]
    fn test_append_and_strlen() {
        let mut store = InMemoryStore::new();
        assert_eq!(store.append("s", "foo").unwrap(), 3);
        assert_eq!(store.append("s", 42i64).unwrap(), 5);
        assert_eq!(store.get("s").unwrap(), Some(Value::from("foo42")));
        assert_eq!(store.strlen("s").unwrap(), 5);
        assert_eq!(store.strlen("missing").unwrap(), 0);
    }

    #[test]
    fn test_get_set_returns_previous() {
        let mut store = InMemoryStore::new();
        assert_eq!(store.get_set("k", "a").unwrap(), None);
        assert_eq!(store.get_set("k", "b").unwrap(), Some(Value::from("a")));
        assert_eq!(store.get("k").unwrap(), Some(Value::from("b")));
    }

    #[test]
    fn test_set_nx() {
        let mut store = InMemoryStore::new();
        assert!(store.set_nx("k", "a").unwrap());
        assert!(!store.set_nx("k", "b").unwrap());
        assert_eq!(store.get("k").unwrap(), Some(Value::from("a")));
    }

    #[test]
    fn test_mset_is_all_or_nothing() {
        let mut store = InMemoryStore::new();
        store.lpush("list", "x").unwrap();
        let result = store.mset(vec![("a", Value::from("1")), ("list", Value::from("2"))]);
        assert!(matches!(result, Err(StoreError::WrongType { .. })));
        assert!(!store.exists("a"));

        store
            .mset(vec![("a", Value::from("1")), ("b", Value::Int(2))])
            .unwrap();
        assert_eq!(
            store.mget(&["a", "b", "list", "zzz"]),
            vec![Some(Value::from("1")), Some(Value::Int(2)), None, None]
        );
    }
}
