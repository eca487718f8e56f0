//! Rank/index window normalisation shared by lists and sorted sets.

use std::ops::Range;

/// Turns an inclusive `[start, end]` window into a half-open range over a
/// sequence of `len` elements.
///
/// A negative `end` means "through the last element"; a negative `start`
/// is clamped to `0`. Both bounds are clamped to `[0, len)`. Returns `None`
/// when the window selects nothing.
pub fn normalize_range(
    start: i64,
    end: i64,
    len: usize,
) -> Option<Range<usize>> {
    if len == 0 {
        return None;
    }
    let last = len - 1;
    let start = usize::try_from(start.max(0)).unwrap_or(usize::MAX);
    let end = if end < 0 {
        last
    } else {
        usize::try_from(end).map_or(last, |e| e.min(last))
    };
    if start > end {
        return None;
    }
    Some(start..end + 1)
}

/// Resolves a possibly negative element index (`-1` is the last element).
pub fn resolve_index(
    index: i64,
    len: usize,
) -> Option<usize> {
    let len = i64::try_from(len).ok()?;
    let idx = if index < 0 { len + index } else { index };
    (0..len).contains(&idx).then_some(idx as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_window() {
        assert_eq!(normalize_range(0, -1, 3), Some(0..3));
        assert_eq!(normalize_range(0, -5, 3), Some(0..3));
    }

    #[test]
    fn test_clamping() {
        assert_eq!(normalize_range(-4, 1, 3), Some(0..2));
        assert_eq!(normalize_range(1, 100, 3), Some(1..3));
    }

    #[test]
    fn test_empty_windows() {
        assert_eq!(normalize_range(0, -1, 0), None);
        assert_eq!(normalize_range(3, 5, 3), None);
        assert_eq!(normalize_range(2, 1, 3), None);
    }

    #[test]
    fn test_resolve_index() {
        assert_eq!(resolve_index(0, 3), Some(0));
        assert_eq!(resolve_index(-1, 3), Some(2));
        assert_eq!(resolve_index(-3, 3), Some(0));
        assert_eq!(resolve_index(-4, 3), None);
        assert_eq!(resolve_index(3, 3), None);
    }
}
