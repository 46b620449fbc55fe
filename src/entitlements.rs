//! Entitlement resolution rule.
//!
//! Entitlement ids are opaque strings with one composition rule: a full
//! course bundle (`<course>-full`) covers every block of that course
//! (`<course>-block-<n>`). This module is the single place that rule lives;
//! call sites never pattern-match on ids themselves.

use std::collections::HashSet;

/// The set of entitlement ids that satisfy a request for `target`.
///
/// Always contains `target` itself. When `target` has the block shape
/// `<course>-block-<n>`, the course's full bundle id is added. No other
/// wildcard or hierarchy exists.
pub fn satisfiers(target: &str) -> Vec<String> {
    let mut ids = vec![target.to_string()];
    if let Some(course) = block_course(target) {
        ids.push(full_id(course));
    }
    ids
}

/// Whether an owned entitlement set grants access to `target`.
pub fn has_access(owned: &HashSet<String>, target: &str) -> bool {
    satisfiers(target).iter().any(|id| owned.contains(id))
}

/// Whether an id has the block shape `<course>-block-<n>`.
pub fn is_block(target: &str) -> bool {
    block_course(target).is_some()
}

/// Entitlement id of a single block within a course.
pub fn block_id(course: &str, block: u32) -> String {
    format!("{course}-block-{block}")
}

/// Entitlement id of a course's full bundle.
pub fn full_id(course: &str) -> String {
    format!("{course}-full")
}

/// The course id of a block-shaped entitlement, or None for any other id.
///
/// The block number must be a non-empty run of ASCII digits; the course
/// part must be non-empty. The last `-block-` wins so course ids containing
/// the literal text still parse.
fn block_course(target: &str) -> Option<&str> {
    let idx = target.rfind("-block-")?;
    let (course, rest) = target.split_at(idx);
    let number = &rest["-block-".len()..];
    if course.is_empty() || number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(course)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(ids: &[&str]) -> HashSet<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn direct_membership_grants_access() {
        let set = owned(&["course-2-block-1"]);
        assert!(has_access(&set, "course-2-block-1"));
        assert!(!has_access(&set, "course-2-block-4"));
    }

    #[test]
    fn full_bundle_covers_every_block() {
        let set = owned(&["course-1-full"]);
        assert!(has_access(&set, "course-1-block-2"));
        assert!(has_access(&set, "course-1-block-17"));
        assert!(!has_access(&set, "course-2-block-1"));
    }

    #[test]
    fn sibling_block_grants_nothing() {
        let set = owned(&["course-1-block-3"]);
        assert!(!has_access(&set, "course-1-block-2"));
    }

    #[test]
    fn full_id_is_only_satisfied_directly() {
        let set = owned(&["course-1-block-1"]);
        assert!(!has_access(&set, "course-1-full"));
    }

    #[test]
    fn empty_set_grants_nothing() {
        assert!(!has_access(&HashSet::new(), "course-1-block-1"));
    }

    #[test]
    fn satisfiers_of_block_shape() {
        assert_eq!(
            satisfiers("course-1-block-2"),
            vec!["course-1-block-2".to_string(), "course-1-full".to_string()]
        );
    }

    #[test]
    fn satisfiers_of_non_block_shape() {
        // No digits, no course part, or no marker at all
        assert_eq!(satisfiers("course-1-full").len(), 1);
        assert_eq!(satisfiers("course-1-block-").len(), 1);
        assert_eq!(satisfiers("course-1-block-x2").len(), 1);
        assert_eq!(satisfiers("-block-2").len(), 1);
        assert_eq!(satisfiers("standalone").len(), 1);
    }

    #[test]
    fn last_block_marker_wins() {
        // A course id containing "-block-" still resolves to its bundle
        assert_eq!(
            satisfiers("intro-block-course-block-3"),
            vec![
                "intro-block-course-block-3".to_string(),
                "intro-block-course-full".to_string()
            ]
        );
    }

    #[test]
    fn id_builders_round_trip_through_the_rule() {
        let block = block_id("course-4", 2);
        let full = full_id("course-4");
        let set = owned(&[full.as_str()]);
        assert!(has_access(&set, &block));
    }
}
