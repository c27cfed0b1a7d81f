//! Wildcard matching for colon-delimited cache keys

/// Segment wildcard; on its own it matches every key
pub const WILDCARD: &str = "*";

/// Match `key` against `pattern` segment by segment.
///
/// Both are split on `:` and must have the same number of segments; a `*`
/// segment matches any single segment. The pattern `*` alone matches all.
pub fn matches_pattern(key: &str, pattern: &str) -> bool {
    if pattern == WILDCARD {
        return true;
    }

    let key_segments: Vec<&str> = key.split(':').collect();
    let pattern_segments: Vec<&str> = pattern.split(':').collect();
    if key_segments.len() != pattern_segments.len() {
        return false;
    }

    key_segments
        .iter()
        .zip(pattern_segments.iter())
        .all(|(k, p)| *p == WILDCARD || k == p)
}
