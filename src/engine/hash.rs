//! Hash family: string fields mapped to string values.

use std::collections::HashMap;

use super::{memory::wrong_type, InMemoryStore};
use crate::{
    database::{Value, ValueType},
    error::{StoreError, StoreResult},
};

impl InMemoryStore {
    fn hash(
        &self,
        key: &str,
    ) -> StoreResult<Option<&HashMap<String, String>>> {
        Ok(match self.get_typed(key, ValueType::Hash)? {
            Some(Value::Hash(hash)) => Some(hash),
            _ => None,
        })
    }

    fn hash_mut(
        &mut self,
        key: &str,
    ) -> StoreResult<Option<&mut HashMap<String, String>>> {
        Ok(match self.get_typed_mut(key, ValueType::Hash)? {
            Some(Value::Hash(hash)) => Some(hash),
            _ => None,
        })
    }

    fn hash_entry(
        &mut self,
        key: &str,
    ) -> StoreResult<&mut HashMap<String, String>> {
        match self.get_or_create(key, ValueType::Hash, || Value::Hash(HashMap::new()))? {
            Value::Hash(hash) => Ok(hash),
            other => Err(wrong_type(key, ValueType::Hash, other.value_type())),
        }
    }

    /// Sets a field. Returns `true` if the field is new.
    pub fn hset(
        &mut self,
        key: &str,
        field: impl Into<String>,
        value: impl Into<String>,
    ) -> StoreResult<bool> {
        Ok(self
            .hash_entry(key)?
            .insert(field.into(), value.into())
            .is_none())
    }

    /// Sets a field only if it does not exist yet.
    pub fn hsetnx(
        &mut self,
        key: &str,
        field: impl Into<String>,
        value: impl Into<String>,
    ) -> StoreResult<bool> {
        let field = field.into();
        if self.hexists(key, &field)? {
            return Ok(false);
        }
        self.hset(key, field, value)
    }

    pub fn hget(
        &self,
        key: &str,
        field: &str,
    ) -> StoreResult<Option<String>> {
        Ok(self.hash(key)?.and_then(|h| h.get(field)).cloned())
    }

    pub fn hexists(
        &self,
        key: &str,
        field: &str,
    ) -> StoreResult<bool> {
        Ok(self.hash(key)?.is_some_and(|h| h.contains_key(field)))
    }

    /// Removes a field. Returns `true` if it existed.
    pub fn hdel(
        &mut self,
        key: &str,
        field: &str,
    ) -> StoreResult<bool> {
        let removed = self
            .hash_mut(key)?
            .is_some_and(|h| h.remove(field).is_some());
        self.purge_if_empty(key);
        Ok(removed)
    }

    pub fn hlen(
        &self,
        key: &str,
    ) -> StoreResult<usize> {
        Ok(self.hash(key)?.map_or(0, HashMap::len))
    }

    /// Every field/value pair, sorted by field.
    pub fn hgetall(
        &self,
        key: &str,
    ) -> StoreResult<Vec<(String, String)>> {
        let mut pairs: Vec<(String, String)> = self
            .hash(key)?
            .into_iter()
            .flatten()
            .map(|(f, v)| (f.clone(), v.clone()))
            .collect();
        pairs.sort_unstable_by(|a, b| a.0.cmp(&b.0));
        Ok(pairs)
    }

    /// Field names, sorted.
    pub fn hkeys(
        &self,
        key: &str,
    ) -> StoreResult<Vec<String>> {
        Ok(self.hgetall(key)?.into_iter().map(|(f, _)| f).collect())
    }

    /// Values, ordered by their field names.
    pub fn hvals(
        &self,
        key: &str,
    ) -> StoreResult<Vec<String>> {
        Ok(self.hgetall(key)?.into_iter().map(|(_, v)| v).collect())
    }

    /// Values for several fields, `None` where a field is missing.
    pub fn hmget(
        &self,
        key: &str,
        fields: &[&str],
    ) -> StoreResult<Vec<Option<String>>> {
        let hash = self.hash(key)?;
        Ok(fields
            .iter()
            .map(|f| hash.and_then(|h| h.get(*f)).cloned())
            .collect())
    }

    /// Sets several fields at once.
    pub fn hmset(
        &mut self,
        key: &str,
        entries: Vec<(String, String)>,
    ) -> StoreResult<()> {
        if entries.is_empty() {
            // Nothing to write; still reject a key of another type.
            return self.check_type(key, ValueType::Hash);
        }
        self.hash_entry(key)?.extend(entries);
        Ok(())
    }

    /// Adds `delta` to an integer field; an absent field starts at `0`.
    pub fn hincr_by(
        &mut self,
        key: &str,
        field: &str,
        delta: i64,
    ) -> StoreResult<i64> {
        let current = match self.hget(key, field)? {
            None => 0,
            Some(v) => v
                .trim()
                .parse::<i64>()
                .map_err(|_| StoreError::NotANumber {
                    key: key.to_string(),
                })?,
        };
        let next = current
            .checked_add(delta)
            .ok_or_else(|| StoreError::invalid("increment would overflow"))?;
        self.hash_entry(key)?
            .insert(field.to_string(), next.to_string());
        Ok(next)
    }

    pub fn hdecr_by(
        &mut self,
        key: &str,
        field: &str,
        delta: i64,
    ) -> StoreResult<i64> {
        let delta = delta
            .checked_neg()
            .ok_or_else(|| StoreError::invalid("decrement would overflow"))?;
        self.hincr_by(key, field, delta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Storage;

    #[test]
    fn test_hset_and_hget() {
        let mut store = InMemoryStore::new();
        assert!(store.hset("h", "f", "1").unwrap());
        assert!(!store.hset("h", "f", "2").unwrap());
        assert_eq!(store.hget("h", "f").unwrap().as_deref(), Some("2"));
        assert_eq!(store.hget("h", "missing").unwrap(), None);
        assert_eq!(store.hget("missing", "f").unwrap(), None);
    }

    #[test]
    fn test_hsetnx() {
        let mut store = InMemoryStore::new();
        assert!(store.hsetnx("h", "f", "1").unwrap());
        assert!(!store.hsetnx("h", "f", "2").unwrap());
        assert_eq!(store.hget("h", "f").unwrap().as_deref(), Some("1"));
    }

    #[test]
    fn test_hdel_last_field_deletes_key() {
        let mut store = InMemoryStore::new();
        store.hset("h", "f", "v").unwrap();
        assert!(store.hexists("h", "f").unwrap());
        assert!(store.hdel("h", "f").unwrap());
        assert!(!store.hdel("h", "f").unwrap());
        assert!(!store.exists("h"));
        assert_eq!(store.hlen("h").unwrap(), 0);
    }

    #[test]
    fn test_field_sorted_listings() {
        let mut store = InMemoryStore::new();
        store
            .hmset(
                "h",
                vec![
                    ("b".into(), "2".into()),
                    ("a".into(), "1".into()),
                    ("c".into(), "3".into()),
                ],
            )
            .unwrap();
        assert_eq!(store.hkeys("h").unwrap(), vec!["a", "b", "c"]);
        assert_eq!(store.hvals("h").unwrap(), vec!["1", "2", "3"]);
        assert_eq!(
            store.hgetall("h").unwrap()[0],
            ("a".to_string(), "1".to_string())
        );
        assert_eq!(
            store.hmget("h", &["c", "zzz"]).unwrap(),
            vec![Some("3".to_string()), None]
        );
    }

    #[test]
    fn test_hincr_by() {
        let mut store = InMemoryStore::new();
        assert_eq!(store.hincr_by("h", "n", 5).unwrap(), 5);
        assert_eq!(store.hincr_by("h", "n", 2).unwrap(), 7);
        assert_eq!(store.hdecr_by("h", "n", 10).unwrap(), -3);

        store.hset("h", "s", "abc").unwrap();
        assert_eq!(
            store.hincr_by("h", "s", 1),
            Err(StoreError::NotANumber { key: "h".into() })
        );
        assert_eq!(store.hget("h", "s").unwrap().as_deref(), Some("abc"));
    }

    #[test]
    fn test_hash_ops_on_wrong_type() {
        let mut store = InMemoryStore::new();
        store.sadd("s", "x").unwrap();
        assert!(matches!(
            store.hset("s", "f", "v"),
            Err(StoreError::WrongType { .. })
        ));
        assert!(matches!(
            store.hmset("s", Vec::new()),
            Err(StoreError::WrongType { .. })
        ));
        assert!(store.hgetall("s").is_err());
    }
}
