//! Sorted-set family.
//!
//! Every call resolves the key through the type guard and then delegates
//! to [`SortedSet`], which keeps scores, order and ranks consistent. An
//! absent key reads as an empty set; removals that empty a set delete the
//! key.

use tracing::trace;

use super::{memory::wrong_type, InMemoryStore};
use crate::{
    database::{SortedSet, Value, ValueType},
    error::{StoreError, StoreResult},
};

impl InMemoryStore {
    fn zset(
        &self,
        key: &str,
    ) -> StoreResult<Option<&SortedSet>> {
        Ok(match self.get_typed(key, ValueType::ZSet)? {
            Some(Value::ZSet(zset)) => Some(zset),
            _ => None,
        })
    }

    fn zset_mut(
        &mut self,
        key: &str,
    ) -> StoreResult<Option<&mut SortedSet>> {
        Ok(match self.get_typed_mut(key, ValueType::ZSet)? {
            Some(Value::ZSet(zset)) => Some(zset),
            _ => None,
        })
    }

    fn zset_entry(
        &mut self,
        key: &str,
    ) -> StoreResult<&mut SortedSet> {
        match self.get_or_create(key, ValueType::ZSet, || Value::ZSet(SortedSet::new()))? {
            Value::ZSet(zset) => Ok(zset),
            other => Err(wrong_type(key, ValueType::ZSet, other.value_type())),
        }
    }

    /// Adds `member` with `score`, or moves an existing member to `score`.
    ///
    /// Returns `true` if the member is new. Members with equal scores keep
    /// insertion order. A NaN or infinite score is rejected before anything
    /// is touched.
    pub fn zadd(
        &mut self,
        key: &str,
        score: f64,
        member: impl Into<String>,
    ) -> StoreResult<bool> {
        let score = finite_score(score)?;
        let member = member.into();
        let zset = self.zset_entry(key)?;
        let is_new = zset.insert(member, score);
        trace!(key, score, is_new, "zadd");
        Ok(is_new)
    }

    /// Removes `member`. Returns `true` if it was present.
    pub fn zrem(
        &mut self,
        key: &str,
        member: &str,
    ) -> StoreResult<bool> {
        let removed = self
            .zset_mut(key)?
            .is_some_and(|z| z.remove(member).is_some());
        self.purge_if_empty(key);
        Ok(removed)
    }

    /// Adds `delta` to the member's score (an absent member starts at `0`).
    pub fn zincr_by(
        &mut self,
        key: &str,
        delta: f64,
        member: impl Into<String>,
    ) -> StoreResult<f64> {
        let delta = finite_score(delta)?;
        let member = member.into();
        let current = self.zscore(key, &member)?.unwrap_or(0.0);
        let next = finite_score(current + delta)?;
        self.zset_entry(key)?.insert(member, next);
        Ok(next)
    }

    pub fn zdecr_by(
        &mut self,
        key: &str,
        delta: f64,
        member: impl Into<String>,
    ) -> StoreResult<f64> {
        self.zincr_by(key, -delta, member)
    }

    pub fn zscore(
        &self,
        key: &str,
        member: &str,
    ) -> StoreResult<Option<f64>> {
        Ok(self.zset(key)?.and_then(|z| z.score(member)))
    }

    /// Zero-based ascending rank.
    pub fn zrank(
        &self,
        key: &str,
        member: &str,
    ) -> StoreResult<Option<usize>> {
        Ok(self.zset(key)?.and_then(|z| z.rank(member)))
    }

    /// Zero-based descending rank, `zcard - zrank - 1`.
    pub fn zrevrank(
        &self,
        key: &str,
        member: &str,
    ) -> StoreResult<Option<usize>> {
        Ok(self.zset(key)?.and_then(|z| z.rev_rank(member)))
    }

    pub fn zcard(
        &self,
        key: &str,
    ) -> StoreResult<usize> {
        Ok(self.zset(key)?.map_or(0, SortedSet::len))
    }

    /// Number of members in the inclusive rank window.
    pub fn zcount(
        &self,
        key: &str,
        start: i64,
        end: i64,
    ) -> StoreResult<usize> {
        Ok(self.zset(key)?.map_or(0, |z| z.count_in_ranks(start, end)))
    }

    pub fn zrange(
        &self,
        key: &str,
        start: i64,
        end: i64,
    ) -> StoreResult<Vec<String>> {
        Ok(self
            .zset(key)?
            .map(|z| z.range(start, end))
            .unwrap_or_default())
    }

    pub fn zrange_with_scores(
        &self,
        key: &str,
        start: i64,
        end: i64,
    ) -> StoreResult<Vec<(String, f64)>> {
        Ok(self
            .zset(key)?
            .map(|z| z.range_with_scores(start, end))
            .unwrap_or_default())
    }

    pub fn zrevrange(
        &self,
        key: &str,
        start: i64,
        end: i64,
    ) -> StoreResult<Vec<String>> {
        Ok(self
            .zset(key)?
            .map(|z| z.rev_range(start, end))
            .unwrap_or_default())
    }

    pub fn zrevrange_with_scores(
        &self,
        key: &str,
        start: i64,
        end: i64,
    ) -> StoreResult<Vec<(String, f64)>> {
        Ok(self
            .zset(key)?
            .map(|z| z.rev_range_with_scores(start, end))
            .unwrap_or_default())
    }

    /// Members with `min <= score <= max`, ascending.
    pub fn zrange_by_score(
        &self,
        key: &str,
        min: f64,
        max: f64,
    ) -> StoreResult<Vec<String>> {
        Ok(members(self.zrange_by_score_with_scores(key, min, max)?))
    }

    pub fn zrange_by_score_with_scores(
        &self,
        key: &str,
        min: f64,
        max: f64,
    ) -> StoreResult<Vec<(String, f64)>> {
        check_bounds(min, max)?;
        Ok(self
            .zset(key)?
            .map(|z| z.range_by_score(min, max))
            .unwrap_or_default())
    }

    /// Members with `min <= score <= max`, descending.
    pub fn zrevrange_by_score(
        &self,
        key: &str,
        min: f64,
        max: f64,
    ) -> StoreResult<Vec<String>> {
        Ok(members(self.zrevrange_by_score_with_scores(key, min, max)?))
    }

    pub fn zrevrange_by_score_with_scores(
        &self,
        key: &str,
        min: f64,
        max: f64,
    ) -> StoreResult<Vec<(String, f64)>> {
        check_bounds(min, max)?;
        Ok(self
            .zset(key)?
            .map(|z| z.rev_range_by_score(min, max))
            .unwrap_or_default())
    }

    /// Removes the inclusive rank window. Returns the number removed.
    pub fn zrem_range_by_rank(
        &mut self,
        key: &str,
        start: i64,
        end: i64,
    ) -> StoreResult<usize> {
        let removed = self
            .zset_mut(key)?
            .map_or(0, |z| z.remove_range_by_rank(start, end));
        self.purge_if_empty(key);
        Ok(removed)
    }

    /// Removes members with `min <= score <= max`. Returns the number removed.
    pub fn zrem_range_by_score(
        &mut self,
        key: &str,
        min: f64,
        max: f64,
    ) -> StoreResult<usize> {
        check_bounds(min, max)?;
        let removed = self
            .zset_mut(key)?
            .map_or(0, |z| z.remove_range_by_score(min, max));
        self.purge_if_empty(key);
        Ok(removed)
    }
}

fn finite_score(score: f64) -> StoreResult<f64> {
    if score.is_finite() {
        Ok(score)
    } else {
        Err(StoreError::invalid(format!("score {score} is not a finite number")))
    }
}

/// Score bounds may be infinite (open-ended) but never NaN.
fn check_bounds(
    min: f64,
    max: f64,
) -> StoreResult<()> {
    if min.is_nan() || max.is_nan() {
        return Err(StoreError::invalid("score bound is NaN"));
    }
    Ok(())
}

fn members(pairs: Vec<(String, f64)>) -> Vec<String> {
    pairs.into_iter().map(|(m, _)| m).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Storage;

    fn abc() -> InMemoryStore {
        let mut store = InMemoryStore::new();
        store.zadd("z", 1.0, "a").unwrap();
        store.zadd("z", 2.0, "b").unwrap();
        store.zadd("z", 3.0, "c").unwrap();
        store
    }

    #[test]
    fn test_zadd_orders_by_score() {
        let mut store = InMemoryStore::new();
        assert!(store.zadd("z", 3.0, "c").unwrap());
        assert!(store.zadd("z", 1.0, "a").unwrap());
        assert!(store.zadd("z", 2.0, "b").unwrap());
        assert_eq!(store.zrange("z", 0, -1).unwrap(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_readd_repositions() {
        let mut store = abc();
        assert!(!store.zadd("z", 10.0, "a").unwrap());
        assert_eq!(store.zrange("z", 0, -1).unwrap(), vec!["b", "c", "a"]);
        assert_eq!(store.zrank("z", "a").unwrap(), Some(2));
        assert_eq!(store.zcard("z").unwrap(), 3);
    }

    #[test]
    fn test_zadd_rejects_non_finite_score() {
        let mut store = abc();
        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(matches!(
                store.zadd("z", bad, "a"),
                Err(StoreError::InvalidValue(_))
            ));
        }
        assert_eq!(store.zscore("z", "a").unwrap(), Some(1.0));
        assert!(store.zadd("fresh", f64::NAN, "a").is_err());
        assert!(!store.exists("fresh"));
    }

    #[test]
    fn test_zrem_renumbers_and_purges() {
        let mut store = abc();
        assert!(store.zrem("z", "a").unwrap());
        assert!(!store.zrem("z", "a").unwrap());
        assert_eq!(store.zrank("z", "b").unwrap(), Some(0));
        assert_eq!(store.zrank("z", "c").unwrap(), Some(1));

        store.zrem("z", "b").unwrap();
        store.zrem("z", "c").unwrap();
        assert!(!store.exists("z"));
    }

    #[test]
    fn test_zincr_and_zdecr() {
        let mut store = abc();
        assert_eq!(store.zincr_by("z", 5.0, "a").unwrap(), 6.0);
        assert_eq!(store.zrevrank("z", "a").unwrap(), Some(0));
        assert_eq!(store.zdecr_by("z", 6.0, "a").unwrap(), 0.0);
        assert_eq!(store.zrank("z", "a").unwrap(), Some(0));
        assert_eq!(store.zincr_by("z", 2.5, "new").unwrap(), 2.5);
        assert!(store.zincr_by("z", f64::NAN, "a").is_err());
    }

    #[test]
    fn test_reverse_queries() {
        let store = abc();
        assert_eq!(store.zrevrange("z", 0, -1).unwrap(), vec!["c", "b", "a"]);
        assert_eq!(
            store.zrevrange_with_scores("z", 0, 0).unwrap(),
            vec![("c".to_string(), 3.0)]
        );
        assert_eq!(store.zrevrank("z", "c").unwrap(), Some(0));
    }

    #[test]
    fn test_score_ranges() {
        let store = abc();
        assert_eq!(store.zrange_by_score("z", 1.0, 2.0).unwrap(), vec!["a", "b"]);
        assert_eq!(
            store.zrevrange_by_score("z", 2.0, f64::INFINITY).unwrap(),
            vec!["c", "b"]
        );
        assert_eq!(
            store
                .zrange_by_score_with_scores("z", f64::NEG_INFINITY, 1.0)
                .unwrap(),
            vec![("a".to_string(), 1.0)]
        );
        assert!(store.zrange_by_score("z", 5.0, 1.0).unwrap().is_empty());
        assert!(matches!(
            store.zrange_by_score("z", f64::NAN, 1.0),
            Err(StoreError::InvalidValue(_))
        ));
    }

    #[test]
    fn test_zcount_rank_window() {
        let store = abc();
        assert_eq!(store.zcount("z", 0, -1).unwrap(), 3);
        assert_eq!(store.zcount("z", 1, 1).unwrap(), 1);
        assert_eq!(store.zcount("missing", 0, -1).unwrap(), 0);
    }

    #[test]
    fn test_remove_ranges() {
        let mut store = abc();
        assert_eq!(store.zrem_range_by_rank("z", 0, 0).unwrap(), 1);
        assert_eq!(store.zrange("z", 0, -1).unwrap(), vec!["b", "c"]);
        assert_eq!(store.zrem_range_by_score("z", 2.0, 3.0).unwrap(), 2);
        assert!(!store.exists("z"));
        assert_eq!(store.zrem_range_by_score("z", 0.0, 1.0).unwrap(), 0);
    }

    #[test]
    fn test_absent_key_reads_empty() {
        let store = InMemoryStore::new();
        assert_eq!(store.zscore("none", "m").unwrap(), None);
        assert_eq!(store.zrank("none", "m").unwrap(), None);
        assert_eq!(store.zcard("none").unwrap(), 0);
        assert!(store.zrange("none", 0, -1).unwrap().is_empty());
    }

    #[test]
    fn test_zset_ops_on_wrong_type() {
        let mut store = InMemoryStore::new();
        store.set("s", "v").unwrap();
        assert_eq!(
            store.zadd("s", 1.0, "m"),
            Err(StoreError::WrongType {
                key: "s".into(),
                expected: "zset",
                actual: "string",
            })
        );
        assert!(store.zrange("s", 0, -1).is_err());
    }
}
