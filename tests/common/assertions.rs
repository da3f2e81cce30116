//! Common assertion helpers for test output validation

#![allow(dead_code)]

use git_revcache::CacheContents;
use predicates::prelude::*;

pub fn not_in_git_repo() -> impl Predicate<str> {
    predicates::str::contains("Not in a git repository")
}

pub fn no_cache() -> impl Predicate<str> {
    predicates::str::contains("No revision cache")
}

pub fn has_field(label: &str, value: &str) -> impl Predicate<str> {
    predicates::str::is_match(format!(r"{label}:\s+.*{value}")).unwrap()
}

/// Asserts both maps hold the same keys in the same order with equal records
pub fn assert_same_revisions(actual: &CacheContents, expected: &CacheContents) {
    let actual_keys: Vec<_> = actual.revisions.keys().collect();
    let expected_keys: Vec<_> = expected.revisions.keys().collect();
    assert_eq!(actual_keys, expected_keys);
    for (key, record) in &expected.revisions {
        assert_eq!(actual.revisions.get(key), Some(record), "record for {key}");
    }
}
