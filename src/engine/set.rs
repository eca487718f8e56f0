//! Set family, including two-key set algebra.

use std::collections::HashSet;

use rand::Rng;

use super::{memory::wrong_type, InMemoryStore, Storage};
use crate::{
    database::{Value, ValueType},
    error::StoreResult,
};

impl InMemoryStore {
    fn set_ref(
        &self,
        key: &str,
    ) -> StoreResult<Option<&HashSet<String>>> {
        Ok(match self.get_typed(key, ValueType::Set)? {
            Some(Value::Set(set)) => Some(set),
            _ => None,
        })
    }

    fn set_mut(
        &mut self,
        key: &str,
    ) -> StoreResult<Option<&mut HashSet<String>>> {
        Ok(match self.get_typed_mut(key, ValueType::Set)? {
            Some(Value::Set(set)) => Some(set),
            _ => None,
        })
    }

    fn set_entry(
        &mut self,
        key: &str,
    ) -> StoreResult<&mut HashSet<String>> {
        match self.get_or_create(key, ValueType::Set, || Value::Set(HashSet::new()))? {
            Value::Set(set) => Ok(set),
            other => Err(wrong_type(key, ValueType::Set, other.value_type())),
        }
    }

    /// Both operands of an algebra call, each absent or a set.
    fn set_pair(
        &self,
        a: &str,
        b: &str,
    ) -> StoreResult<(Option<&HashSet<String>>, Option<&HashSet<String>>)> {
        Ok((self.set_ref(a)?, self.set_ref(b)?))
    }

    /// Adds a member. Returns `true` if it was not already present.
    pub fn sadd(
        &mut self,
        key: &str,
        member: impl Into<String>,
    ) -> StoreResult<bool> {
        Ok(self.set_entry(key)?.insert(member.into()))
    }

    pub fn srem(
        &mut self,
        key: &str,
        member: &str,
    ) -> StoreResult<bool> {
        let removed = self.set_mut(key)?.is_some_and(|set| set.remove(member));
        self.purge_if_empty(key);
        Ok(removed)
    }

    pub fn sismember(
        &self,
        key: &str,
        member: &str,
    ) -> StoreResult<bool> {
        Ok(self.set_ref(key)?.is_some_and(|set| set.contains(member)))
    }

    /// All members, sorted.
    pub fn smembers(
        &self,
        key: &str,
    ) -> StoreResult<Vec<String>> {
        Ok(sorted(self.set_ref(key)?.into_iter().flatten()))
    }

    pub fn scard(
        &self,
        key: &str,
    ) -> StoreResult<usize> {
        Ok(self.set_ref(key)?.map_or(0, HashSet::len))
    }

    /// Removes and returns a random member.
    pub fn spop(
        &mut self,
        key: &str,
    ) -> StoreResult<Option<String>> {
        let Some(set) = self.set_mut(key)? else {
            return Ok(None);
        };
        let picked = pick(set).cloned();
        if let Some(member) = &picked {
            set.remove(member);
        }
        self.purge_if_empty(key);
        Ok(picked)
    }

    /// Returns a random member without removing it.
    pub fn srandmember(
        &self,
        key: &str,
    ) -> StoreResult<Option<String>> {
        Ok(self.set_ref(key)?.and_then(pick).cloned())
    }

    /// Moves `member` from `src` to `dst`. Returns `false` if `src` does
    /// not contain it.
    pub fn smove(
        &mut self,
        src: &str,
        dst: &str,
        member: &str,
    ) -> StoreResult<bool> {
        self.check_type(dst, ValueType::Set)?;
        if !self.srem(src, member)? {
            return Ok(false);
        }
        self.sadd(dst, member)?;
        Ok(true)
    }

    pub fn sinter(
        &self,
        a: &str,
        b: &str,
    ) -> StoreResult<Vec<String>> {
        Ok(match self.set_pair(a, b)? {
            (Some(a), Some(b)) => sorted(a.intersection(b)),
            _ => Vec::new(),
        })
    }

    pub fn sunion(
        &self,
        a: &str,
        b: &str,
    ) -> StoreResult<Vec<String>> {
        let (a, b) = self.set_pair(a, b)?;
        let members: HashSet<&String> = a.into_iter().chain(b).flatten().collect();
        Ok(sorted(members))
    }

    /// Members of `a` that are not in `b`.
    pub fn sdiff(
        &self,
        a: &str,
        b: &str,
    ) -> StoreResult<Vec<String>> {
        Ok(match self.set_pair(a, b)? {
            (Some(a), Some(b)) => sorted(a.difference(b)),
            (Some(a), None) => sorted(a),
            (None, _) => Vec::new(),
        })
    }

    /// Stores `sinter(a, b)` in `dst`, replacing it. Returns the size.
    pub fn sinterstore(
        &mut self,
        dst: &str,
        a: &str,
        b: &str,
    ) -> StoreResult<usize> {
        let members = self.sinter(a, b)?;
        Ok(self.store_set(dst, members))
    }

    pub fn sunionstore(
        &mut self,
        dst: &str,
        a: &str,
        b: &str,
    ) -> StoreResult<usize> {
        let members = self.sunion(a, b)?;
        Ok(self.store_set(dst, members))
    }

    pub fn sdiffstore(
        &mut self,
        dst: &str,
        a: &str,
        b: &str,
    ) -> StoreResult<usize> {
        let members = self.sdiff(a, b)?;
        Ok(self.store_set(dst, members))
    }

    /// Replaces `dst` with the given members; an empty result deletes it.
    fn store_set(
        &mut self,
        dst: &str,
        members: Vec<String>,
    ) -> usize {
        let len = members.len();
        if len == 0 {
            self.del(dst);
        } else {
            self.put(dst, Value::Set(members.into_iter().collect()));
        }
        len
    }
}

fn sorted<'a>(members: impl IntoIterator<Item = &'a String>) -> Vec<String> {
    let mut out: Vec<String> = members.into_iter().cloned().collect();
    out.sort_unstable();
    out
}

fn pick(set: &HashSet<String>) -> Option<&String> {
    if set.is_empty() {
        return None;
    }
    let idx = rand::thread_rng().gen_range(0..set.len());
    set.iter().nth(idx)
}
