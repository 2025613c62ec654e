//! Dotted-name helpers
//!
//! Rule names are segments joined by `" . "`, e.g. `transport . voiture . km`.
//! References written inside a rule's conditions and defaults may be relative
//! to that rule's namespace; [`merge`] turns them into absolute names.

use std::collections::HashSet;

/// Separator between the segments of a dotted-name
pub const SEPARATOR: &str = " . ";

/// Whether `name` can identify a rule at all
pub fn is_valid_dotted_name(name: &str) -> bool {
    !name.trim().is_empty()
}

/// Resolve `suffix` inside the namespace that encloses `root`
///
/// The last segment of `root` is dropped, then every segment of `suffix` is
/// appended unless it already appears. Order is first-seen, so
/// `merge("a . b . c", "b . d")` is `"a . b . d"`.
pub fn merge(root: &str, suffix: &str) -> String {
    let mut root_segments: Vec<&str> = root.split(SEPARATOR).collect();
    root_segments.pop();

    let mut seen: HashSet<&str> = HashSet::new();
    let mut merged: Vec<&str> = Vec::new();

    for segment in root_segments.into_iter().chain(suffix.split(SEPARATOR)) {
        if seen.insert(segment) {
            merged.push(segment);
        }
    }

    merged.join(SEPARATOR)
}
