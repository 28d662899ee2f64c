//! Namespace derivation: course code → index namespace.

use tracing::debug;

/// Derives the storage namespace for a course.
///
/// The whole composed string `course-<course_short>` is lowercased and every
/// character outside `[a-z0-9-]` is replaced with `-`; sanitizing only the
/// suffix would let punctuation in the course code interact with the literal
/// prefix in surprising ways.
///
/// Total function: any input (including the empty string, which yields
/// `course-`) maps to a valid namespace. Distinct course codes that sanitize
/// identically share a namespace.
pub fn resolve_namespace(course_short: &str) -> String {
    let namespace: String = format!("course-{course_short}")
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' {
                c
            } else {
                '-'
            }
        })
        .collect();

    debug!(course = %course_short, %namespace, "resolved course namespace");
    namespace
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_replaces_punctuation() {
        assert_eq!(resolve_namespace("CSE-1111!"), "course-cse-1111-");
    }

    #[test]
    fn empty_input_yields_bare_prefix() {
        assert_eq!(resolve_namespace(""), "course-");
    }

    #[test]
    fn deterministic_and_charset_constrained() {
        let inputs = ["Math 101", "ΦΥΣ-202", "bio_301", "ALGO//2"];
        for input in inputs {
            let a = resolve_namespace(input);
            let b = resolve_namespace(input);
            assert_eq!(a, b);
            assert!(a.starts_with("course-"));
            assert!(
                a.chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'),
                "unexpected char in {a}"
            );
        }
    }

    #[test]
    fn spaces_and_underscores_become_dashes() {
        assert_eq!(resolve_namespace("Math 101"), "course-math-101");
        assert_eq!(resolve_namespace("bio_301"), "course-bio-301");
    }
}
