//! List family.

use std::collections::VecDeque;

use super::{memory::wrong_type, InMemoryStore};
use crate::{
    database::{normalize_range, resolve_index, Value, ValueType},
    error::{StoreError, StoreResult},
};

impl InMemoryStore {
    fn list(
        &self,
        key: &str,
    ) -> StoreResult<Option<&VecDeque<String>>> {
        Ok(match self.get_typed(key, ValueType::List)? {
            Some(Value::List(list)) => Some(list),
            _ => None,
        })
    }

    fn list_mut(
        &mut self,
        key: &str,
    ) -> StoreResult<Option<&mut VecDeque<String>>> {
        Ok(match self.get_typed_mut(key, ValueType::List)? {
            Some(Value::List(list)) => Some(list),
            _ => None,
        })
    }

    fn list_entry(
        &mut self,
        key: &str,
    ) -> StoreResult<&mut VecDeque<String>> {
        match self.get_or_create(key, ValueType::List, || Value::List(VecDeque::new()))? {
            Value::List(list) => Ok(list),
            other => Err(wrong_type(key, ValueType::List, other.value_type())),
        }
    }

    /// Prepends a value; returns the new length.
    pub fn lpush(
        &mut self,
        key: &str,
        value: impl Into<String>,
    ) -> StoreResult<usize> {
        let list = self.list_entry(key)?;
        list.push_front(value.into());
        Ok(list.len())
    }

    /// Appends a value; returns the new length.
    pub fn rpush(
        &mut self,
        key: &str,
        value: impl Into<String>,
    ) -> StoreResult<usize> {
        let list = self.list_entry(key)?;
        list.push_back(value.into());
        Ok(list.len())
    }

    /// Prepends only if the list exists; returns the length (`0` if absent).
    pub fn lpushx(
        &mut self,
        key: &str,
        value: impl Into<String>,
    ) -> StoreResult<usize> {
        Ok(match self.list_mut(key)? {
            Some(list) => {
                list.push_front(value.into());
                list.len()
            }
            None => 0,
        })
    }

    /// Appends only if the list exists; returns the length (`0` if absent).
    pub fn rpushx(
        &mut self,
        key: &str,
        value: impl Into<String>,
    ) -> StoreResult<usize> {
        Ok(match self.list_mut(key)? {
            Some(list) => {
                list.push_back(value.into());
                list.len()
            }
            None => 0,
        })
    }

    pub fn lpop(
        &mut self,
        key: &str,
    ) -> StoreResult<Option<String>> {
        let popped = self.list_mut(key)?.and_then(VecDeque::pop_front);
        self.purge_if_empty(key);
        Ok(popped)
    }

    pub fn rpop(
        &mut self,
        key: &str,
    ) -> StoreResult<Option<String>> {
        let popped = self.list_mut(key)?.and_then(VecDeque::pop_back);
        self.purge_if_empty(key);
        Ok(popped)
    }

    pub fn llen(
        &self,
        key: &str,
    ) -> StoreResult<usize> {
        Ok(self.list(key)?.map_or(0, VecDeque::len))
    }

    /// Elements in the inclusive window `[start, end]`; a negative `end`
    /// reaches the last element.
    pub fn lrange(
        &self,
        key: &str,
        start: i64,
        end: i64,
    ) -> StoreResult<Vec<String>> {
        let Some(list) = self.list(key)? else {
            return Ok(Vec::new());
        };
        Ok(normalize_range(start, end, list.len())
            .map(|w| list.range(w).cloned().collect())
            .unwrap_or_default())
    }

    /// Keeps only the inclusive window. Returns `false` if the key is absent.
    pub fn ltrim(
        &mut self,
        key: &str,
        start: i64,
        end: i64,
    ) -> StoreResult<bool> {
        let Some(list) = self.list_mut(key)? else {
            return Ok(false);
        };
        match normalize_range(start, end, list.len()) {
            Some(w) => {
                list.truncate(w.end);
                list.drain(..w.start);
            }
            None => list.clear(),
        }
        self.purge_if_empty(key);
        Ok(true)
    }

    /// Element at `index`; negative indexes count from the tail.
    pub fn lindex(
        &self,
        key: &str,
        index: i64,
    ) -> StoreResult<Option<String>> {
        Ok(self
            .list(key)?
            .and_then(|list| resolve_index(index, list.len()).and_then(|i| list.get(i)))
            .cloned())
    }

    /// Overwrites the element at `index`.
    pub fn lset(
        &mut self,
        key: &str,
        index: i64,
        value: impl Into<String>,
    ) -> StoreResult<()> {
        let list = self.list_mut(key)?.ok_or_else(|| StoreError::NoSuchKey {
            key: key.to_string(),
        })?;
        let idx = resolve_index(index, list.len())
            .ok_or_else(|| StoreError::invalid(format!("index {index} out of range")))?;
        list[idx] = value.into();
        Ok(())
    }

    /// Removes occurrences of `value`.
    ///
    /// `count > 0` removes up to `count` matches scanning from the head,
    /// `count < 0` up to `|count|` from the tail, `count == 0` all of them.
    /// Returns the number removed.
    pub fn lrem(
        &mut self,
        key: &str,
        count: i64,
        value: &str,
    ) -> StoreResult<usize> {
        let Some(list) = self.list_mut(key)? else {
            return Ok(0);
        };
        let limit = if count == 0 {
            usize::MAX
        } else {
            usize::try_from(count.unsigned_abs()).unwrap_or(usize::MAX)
        };

        let mut removed = 0;
        if count >= 0 {
            list.retain(|item| {
                let hit = removed < limit && item == value;
                removed += usize::from(hit);
                !hit
            });
        } else {
            let mut idx = list.len();
            while idx > 0 && removed < limit {
                idx -= 1;
                if list[idx] == value {
                    list.remove(idx);
                    removed += 1;
                }
            }
        }
        self.purge_if_empty(key);
        Ok(removed)
    }

    /// Pops from the tail of `src` and pushes onto the head of `dst`.
    ///
    /// Both keys are type-checked before either is touched.
    pub fn rpoplpush(
        &mut self,
        src: &str,
        dst: &str,
    ) -> StoreResult<Option<String>> {
        self.check_type(dst, ValueType::List)?;
        let Some(item) = self.rpop(src)? else {
            return Ok(None);
        };
        self.lpush(dst, item.clone())?;
        Ok(Some(item))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Storage;

    /// Mirrors `lpush a, lpush b, lpush c` → [c, b, a].
    fn cba() -> InMemoryStore {
        let mut store = InMemoryStore::new();
        for v in ["a", "b", "c"] {
            store.lpush("list", v).unwrap();
        }
        store
    }

    #[test]
    fn test_push_and_pop_both_ends() {
        let mut store = cba();
        assert_eq!(store.rpush("list", "d").unwrap(), 4);
        assert_eq!(store.lpop("list").unwrap().as_deref(), Some("c"));
        assert_eq!(store.rpop("list").unwrap().as_deref(), Some("d"));
        assert_eq!(store.llen("list").unwrap(), 2);
    }

    #[test]
    fn test_popping_last_element_deletes_key() {
        let mut store = InMemoryStore::new();
        store.rpush("l", "only").unwrap();
        assert_eq!(store.lpop("l").unwrap().as_deref(), Some("only"));
        assert!(!store.exists("l"));
        assert_eq!(store.lpop("l").unwrap(), None);
    }

    #[test]
    fn test_pushx_requires_existing_list() {
        let mut store = cba();
        assert_eq!(store.lpushx("list", "d").unwrap(), 4);
        assert_eq!(store.rpushx("missing", "d").unwrap(), 0);
        assert!(!store.exists("missing"));
    }

    #[test]
    fn test_lrange_windows() {
        let store = cba();
        assert_eq!(store.lrange("list", 0, -1).unwrap(), vec!["c", "b", "a"]);
        assert_eq!(store.lrange("list", 1, 2).unwrap(), vec!["b", "a"]);
        assert_eq!(store.lrange("list", 1, 100).unwrap(), vec!["b", "a"]);
        assert!(store.lrange("list", 5, 9).unwrap().is_empty());
        assert!(store.lrange("missing", 0, -1).unwrap().is_empty());
    }

    #[test]
    fn test_ltrim() {
        let mut store = cba();
        assert!(store.ltrim("list", 0, 1).unwrap());
        assert_eq!(store.lrange("list", 0, -1).unwrap(), vec!["c", "b"]);
        assert!(!store.ltrim("missing", 0, -1).unwrap());
        assert!(store.ltrim("list", 5, 6).unwrap());
        assert!(!store.exists("list"));
    }

    #[test]
    fn test_lindex_and_lset() {
        let mut store = cba();
        assert_eq!(store.lindex("list", 0).unwrap().as_deref(), Some("c"));
        assert_eq!(store.lindex("list", -1).unwrap().as_deref(), Some("a"));
        assert_eq!(store.lindex("list", 3).unwrap(), None);

        store.lset("list", 0, "test").unwrap();
        assert_eq!(store.lindex("list", 0).unwrap().as_deref(), Some("test"));
        assert_eq!(store.llen("list").unwrap(), 3);
        assert!(matches!(
            store.lset("list", 9, "x"),
            Err(StoreError::InvalidValue(_))
        ));
        assert!(matches!(
            store.lset("missing", 0, "x"),
            Err(StoreError::NoSuchKey { .. })
        ));
    }

    #[test]
    fn test_lrem_from_head() {
        let mut store = cba();
        store.lpush("list", "a").unwrap();
        store.lpush("list", "a").unwrap();
        // [a, a, c, b, a]
        assert_eq!(store.lrem("list", 2, "a").unwrap(), 2);
        assert_eq!(store.lrange("list", 0, -1).unwrap(), vec!["c", "b", "a"]);
    }

    #[test]
    fn test_lrem_from_tail() {
        let mut store = cba();
        store.lpush("list", "a").unwrap();
        store.lpush("list", "a").unwrap();
        assert_eq!(store.lrem("list", -2, "a").unwrap(), 2);
        assert_eq!(store.lrange("list", 0, -1).unwrap(), vec!["a", "c", "b"]);
    }

    #[test]
    fn test_lrem_zero_removes_all() {
        let mut store = cba();
        store.rpush("list", "a").unwrap();
        assert_eq!(store.lrem("list", 0, "a").unwrap(), 2);
        assert_eq!(store.lrange("list", 0, -1).unwrap(), vec!["c", "b"]);
        assert_eq!(store.lrem("list", 0, "zzz").unwrap(), 0);
    }

    #[test]
    fn test_rpoplpush() {
        let mut store = cba();
        store.lpush("other", "c").unwrap();
        store.lpush("other", "d").unwrap();
        assert_eq!(
            store.rpoplpush("list", "other").unwrap().as_deref(),
            Some("a")
        );
        assert_eq!(store.lrange("list", 0, -1).unwrap(), vec!["c", "b"]);
        assert_eq!(store.lrange("other", 0, -1).unwrap(), vec!["a", "d", "c"]);
    }

    #[test]
    fn test_rpoplpush_wrong_destination_type_keeps_source() {
        let mut store = cba();
        store.set("str", "x").unwrap();
        assert!(matches!(
            store.rpoplpush("list", "str"),
            Err(StoreError::WrongType { .. })
        ));
        assert_eq!(store.llen("list").unwrap(), 3);
    }
}
