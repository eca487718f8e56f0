//! Sorted set.
//!
//! A sorted set keeps three structures in lock-step:
//!
//! - `scores`: member → score;
//! - `order`: members sorted ascending by score, equal scores kept in
//!   insertion order;
//! - `ranks`: member → index into `order`.
//!
//! All fields are private and every mutating method leaves them mutually
//! consistent before returning, so callers can never observe a member whose
//! rank points at another member. Inserts and removals are O(n) (the tail of
//! `order` is shifted and renumbered); lookups of score and rank are O(1).

use std::{collections::HashMap, fmt, ops::Range};

use ordered_float::OrderedFloat;
use serde::{
    de::{self, SeqAccess, Visitor},
    ser::SerializeSeq,
    Deserialize, Deserializer, Serialize, Serializer,
};

use super::range::normalize_range;

#[derive(Clone, Default, PartialEq)]
pub struct SortedSet {
    scores: HashMap<String, OrderedFloat<f64>>,
    order: Vec<String>,
    ranks: HashMap<String, usize>,
}

impl SortedSet {
    /// Creates an empty sorted set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(
        &self,
        member: &str,
    ) -> bool {
        self.scores.contains_key(member)
    }

    pub fn score(
        &self,
        member: &str,
    ) -> Option<f64> {
        self.scores.get(member).map(|s| s.0)
    }

    /// Zero-based ascending rank.
    pub fn rank(
        &self,
        member: &str,
    ) -> Option<usize> {
        self.ranks.get(member).copied()
    }

    /// Zero-based descending rank.
    pub fn rev_rank(
        &self,
        member: &str,
    ) -> Option<usize> {
        self.rank(member).map(|r| self.len() - r - 1)
    }

    /// Inserts `member` or moves it to `score`.
    ///
    /// Returns `true` if the member is new. The member lands after every
    /// member whose score is less than or equal to `score`. The caller
    /// guarantees `score` is finite.
    pub fn insert(
        &mut self,
        member: String,
        score: f64,
    ) -> bool {
        debug_assert!(score.is_finite(), "sorted set scores must be finite");
        let is_new = self.detach(&member).is_none();
        let score = OrderedFloat(score);

        let scores = &self.scores;
        let pos = self
            .order
            .partition_point(|m| scores.get(m).is_some_and(|s| *s <= score));

        self.order.insert(pos, member.clone());
        self.scores.insert(member, score);
        self.renumber_from(pos);
        is_new
    }

    /// Adds `delta` to the member's score (starting from `0` when absent)
    /// and repositions it. Returns the new score.
    pub fn incr(
        &mut self,
        member: String,
        delta: f64,
    ) -> f64 {
        let score = self.score(&member).unwrap_or(0.0) + delta;
        self.insert(member, score);
        score
    }

    /// Removes a member, returning its score.
    pub fn remove(
        &mut self,
        member: &str,
    ) -> Option<f64> {
        self.detach(member)
    }

    /// Members in the inclusive rank window, ascending.
    pub fn range(
        &self,
        start: i64,
        end: i64,
    ) -> Vec<String> {
        self.window(start, end)
            .map(|w| self.order[w].to_vec())
            .unwrap_or_default()
    }

    /// Members and scores in the inclusive rank window, ascending.
    pub fn range_with_scores(
        &self,
        start: i64,
        end: i64,
    ) -> Vec<(String, f64)> {
        self.window(start, end)
            .map(|w| self.with_scores(&self.order[w]).collect())
            .unwrap_or_default()
    }

    /// Members in the inclusive window over the descending order.
    pub fn rev_range(
        &self,
        start: i64,
        end: i64,
    ) -> Vec<String> {
        self.rev_range_with_scores(start, end)
            .into_iter()
            .map(|(m, _)| m)
            .collect()
    }

    /// Members and scores in the inclusive window over the descending order.
    pub fn rev_range_with_scores(
        &self,
        start: i64,
        end: i64,
    ) -> Vec<(String, f64)> {
        let Some(w) = self.window(start, end) else {
            return Vec::new();
        };
        // Descending rank r maps to ascending rank len - 1 - r.
        let len = self.len();
        let asc = (len - w.end)..(len - w.start);
        self.with_scores(&self.order[asc]).rev().collect()
    }

    /// Number of members in the inclusive rank window.
    pub fn count_in_ranks(
        &self,
        start: i64,
        end: i64,
    ) -> usize {
        self.window(start, end).map_or(0, |w| w.len())
    }

    /// Members with `min <= score <= max`, ascending.
    pub fn range_by_score(
        &self,
        min: f64,
        max: f64,
    ) -> Vec<(String, f64)> {
        let w = self.score_window(min, max);
        self.with_scores(&self.order[w]).collect()
    }

    /// Members with `min <= score <= max`, descending.
    pub fn rev_range_by_score(
        &self,
        min: f64,
        max: f64,
    ) -> Vec<(String, f64)> {
        let w = self.score_window(min, max);
        self.with_scores(&self.order[w]).rev().collect()
    }

    /// Removes the inclusive rank window. Returns the number removed.
    pub fn remove_range_by_rank(
        &mut self,
        start: i64,
        end: i64,
    ) -> usize {
        match self.window(start, end) {
            Some(w) => self.remove_span(w),
            None => 0,
        }
    }

    /// Removes every member with `min <= score <= max`.
    pub fn remove_range_by_score(
        &mut self,
        min: f64,
        max: f64,
    ) -> usize {
        let w = self.score_window(min, max);
        self.remove_span(w)
    }

    /// Iterates `(member, score)` in ascending order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (&str, f64)> + '_ {
        self.order
            .iter()
            .map(|m| (m.as_str(), self.scores.get(m).map_or(f64::NAN, |s| s.0)))
    }

    /// Checks the structural invariants: every member appears once in each
    /// structure, `order[ranks[m]] == m`, and `order` is non-decreasing by
    /// score.
    pub fn validate_invariants(&self) -> Result<(), String> {
        if self.scores.len() != self.order.len() || self.ranks.len() != self.order.len() {
            return Err(format!(
                "size mismatch: scores={}, order={}, ranks={}",
                self.scores.len(),
                self.order.len(),
                self.ranks.len()
            ));
        }
        let mut prev: Option<OrderedFloat<f64>> = None;
        for (idx, member) in self.order.iter().enumerate() {
            let score = *self
                .scores
                .get(member)
                .ok_or_else(|| format!("member {member:?} has no score"))?;
            match self.ranks.get(member) {
                Some(&r) if r == idx => {}
                other => return Err(format!("member {member:?} at {idx} has rank {other:?}")),
            }
            if prev.is_some_and(|p| p > score) {
                return Err(format!("order broken at rank {idx} ({member:?})"));
            }
            prev = Some(score);
        }
        Ok(())
    }

    /// Splices a member out of all three structures.
    fn detach(
        &mut self,
        member: &str,
    ) -> Option<f64> {
        let rank = self.ranks.remove(member)?;
        self.order.remove(rank);
        let score = self.scores.remove(member);
        self.renumber_from(rank);
        score.map(|s| s.0)
    }

    /// Removes `order[span]` and renumbers the members behind it.
    fn remove_span(
        &mut self,
        span: Range<usize>,
    ) -> usize {
        let start = span.start;
        let removed: Vec<String> = self.order.drain(span).collect();
        for member in &removed {
            self.scores.remove(member);
            self.ranks.remove(member);
        }
        self.renumber_from(start);
        removed.len()
    }

    /// Rewrites `ranks` for every member at or after `start`.
    fn renumber_from(
        &mut self,
        start: usize,
    ) {
        for (offset, member) in self.order[start..].iter().enumerate() {
            let rank = start + offset;
            match self.ranks.get_mut(member) {
                Some(r) => *r = rank,
                None => {
                    self.ranks.insert(member.clone(), rank);
                }
            }
        }
    }

    fn window(
        &self,
        start: i64,
        end: i64,
    ) -> Option<Range<usize>> {
        normalize_range(start, end, self.len())
    }

    /// Index span of members with `min <= score <= max`.
    fn score_window(
        &self,
        min: f64,
        max: f64,
    ) -> Range<usize> {
        let (min, max) = (OrderedFloat(min), OrderedFloat(max));
        let score_of = |m: &String| self.scores.get(m).copied().unwrap_or_default();
        let lo = self.order.partition_point(|m| score_of(m) < min);
        let hi = self.order.partition_point(|m| score_of(m) <= max);
        lo..hi.max(lo)
    }

    fn with_scores<'a>(
        &'a self,
        members: &'a [String],
    ) -> impl DoubleEndedIterator<Item = (String, f64)> + 'a {
        members.iter().map(|m| {
            let score = self.scores.get(m).map_or(f64::NAN, |s| s.0);
            (m.clone(), score)
        })
    }
}

impl fmt::Debug for SortedSet {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Pairs whose score is NaN or infinite are skipped.
impl FromIterator<(String, f64)> for SortedSet {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        let mut set = SortedSet::new();
        for (member, score) in iter.into_iter().filter(|(_, s)| s.is_finite()) {
            set.insert(member, score);
        }
        set
    }
}

// Serialized as an ordered sequence of `(member, score)` pairs; the rank
// index is rebuilt on load.
impl Serialize for SortedSet {
    fn serialize<S>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for pair in self.iter() {
            seq.serialize_element(&pair)?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for SortedSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct SortedSetVisitor;

        impl<'de> Visitor<'de> for SortedSetVisitor {
            type Value = SortedSet;

            fn expecting(
                &self,
                f: &mut fmt::Formatter,
            ) -> fmt::Result {
                f.write_str("a sequence of (member, score) pairs")
            }

            fn visit_seq<A>(
                self,
                mut seq: A,
            ) -> Result<SortedSet, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut set = SortedSet::new();
                while let Some((member, score)) = seq.next_element::<(String, f64)>()? {
                    if !score.is_finite() {
                        return Err(de::Error::custom(format!(
                            "score of {member:?} is not finite"
                        )));
                    }
                    set.insert(member, score);
                }
                Ok(set)
            }
        }

        deserializer.deserialize_seq(SortedSetVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abc() -> SortedSet {
        let mut z = SortedSet::new();
        z.insert("a".into(), 1.0);
        z.insert("c".into(), 3.0);
        z.insert("b".into(), 2.0);
        z
    }

    #[test]
    fn test_insert_keeps_ascending_order() {
        let z = abc();
        assert_eq!(z.range(0, -1), vec!["a", "b", "c"]);
        assert_eq!(z.rank("b"), Some(1));
        assert!(z.validate_invariants().is_ok());
    }

    #[test]
    fn test_equal_scores_keep_insertion_order() {
        let mut z = SortedSet::new();
        z.insert("x".into(), 5.0);
        z.insert("y".into(), 5.0);
        z.insert("w".into(), 5.0);
        assert_eq!(z.range(0, -1), vec!["x", "y", "w"]);
    }

    #[test]
    fn test_reinsert_reports_existing_and_moves() {
        let mut z = abc();
        assert!(!z.insert("a".into(), 10.0));
        assert_eq!(z.len(), 3);
        assert_eq!(z.range(0, -1), vec!["b", "c", "a"]);
        assert_eq!(z.rank("a"), Some(2));
        assert_eq!(z.rank("b"), Some(0));
        assert!(z.validate_invariants().is_ok());
    }

    #[test]
    fn test_remove_renumbers_following_members() {
        let mut z = abc();
        assert_eq!(z.remove("a"), Some(1.0));
        assert_eq!(z.rank("b"), Some(0));
        assert_eq!(z.rank("c"), Some(1));
        assert_eq!(z.remove("a"), None);
        assert!(z.validate_invariants().is_ok());
    }

    #[test]
    fn test_incr_repositions() {
        let mut z = SortedSet::new();
        z.insert("a".into(), 1.0);
        z.insert("b".into(), 2.0);
        assert_eq!(z.incr("a".into(), 5.0), 6.0);
        assert_eq!(z.range(0, -1), vec!["b", "a"]);
        assert_eq!(z.incr("new".into(), -1.0), -1.0);
        assert_eq!(z.rank("new"), Some(0));
    }

    #[test]
    fn test_rev_rank_and_rev_range() {
        let z = abc();
        assert_eq!(z.rev_rank("a"), Some(2));
        assert_eq!(z.rev_range(0, -1), vec!["c", "b", "a"]);
        assert_eq!(z.rev_range(0, 0), vec!["c"]);
        assert_eq!(
            z.rev_range_with_scores(1, 2),
            vec![("b".to_string(), 2.0), ("a".to_string(), 1.0)]
        );
    }

    #[test]
    fn test_range_by_score_is_closed() {
        let z = abc();
        let got: Vec<_> = z.range_by_score(1.5, 3.0).into_iter().map(|(m, _)| m).collect();
        assert_eq!(got, vec!["b", "c"]);
        let rev: Vec<_> = z
            .rev_range_by_score(1.0, 2.0)
            .into_iter()
            .map(|(m, _)| m)
            .collect();
        assert_eq!(rev, vec!["b", "a"]);
        assert!(z.range_by_score(3.5, 1.0).is_empty());
    }

    #[test]
    fn test_remove_range_by_rank() {
        let mut z = abc();
        assert_eq!(z.remove_range_by_rank(0, 1), 2);
        assert_eq!(z.range(0, -1), vec!["c"]);
        assert_eq!(z.rank("c"), Some(0));
        assert_eq!(z.score("a"), None);
        assert!(z.validate_invariants().is_ok());
    }

    #[test]
    fn test_remove_range_by_score() {
        let mut z = abc();
        z.insert("d".into(), 4.0);
        assert_eq!(z.remove_range_by_score(2.0, 3.0), 2);
        assert_eq!(z.range(0, -1), vec!["a", "d"]);
        assert_eq!(z.rank("d"), Some(1));
        assert_eq!(z.remove_range_by_score(10.0, 20.0), 0);
        assert!(z.validate_invariants().is_ok());
    }

    #[test]
    fn test_count_in_ranks() {
        let z = abc();
        assert_eq!(z.count_in_ranks(0, -1), 3);
        assert_eq!(z.count_in_ranks(1, 1), 1);
        assert_eq!(z.count_in_ranks(5, 9), 0);
    }

    #[test]
    fn test_serde_rebuilds_ranks() {
        let mut z = abc();
        z.insert("tie".into(), 2.0);
        let json = serde_json::to_string(&z).unwrap();
        let restored: SortedSet = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, z);
        assert!(restored.validate_invariants().is_ok());
    }

    #[test]
    fn test_from_iter_skips_non_finite_scores() {
        let z: SortedSet = [
            ("b".to_string(), 1.0),
            ("a".to_string(), f64::NAN),
            ("c".to_string(), f64::INFINITY),
            ("d".to_string(), 0.5),
        ]
        .into_iter()
        .collect();
        assert_eq!(z.range(0, -1), vec!["d", "b"]);
        assert_eq!(z.score("a"), None);
        assert!(z.validate_invariants().is_ok());

        let bad = r#"[["b", 1.0], ["a", 1e999]]"#;
        assert!(serde_json::from_str::<SortedSet>(bad).is_err());
    }
}
