//! Revision identifiers used as keys of the file-status index.
//!
//! A [`RevisionKey`] is normally the 40-character hex sha of a commit, but the
//! index also holds a few synthetic entries that are never written to disk:
//! the working-directory sentinel [`ZERO_SHA`], the [`CUSTOM_SHA`] sentinel for
//! hand-built revisions, and merge-aggregate views keyed by
//! [`ALL_MERGE_FILES`] followed by the merge sha.

use std::borrow::Borrow;
use std::fmt;

/// Width of a persisted revision key.
pub const SHA_LENGTH: usize = 40;

/// Working directory (uncommitted) state.
pub const ZERO_SHA: &str = "0000000000000000000000000000000000000000";

/// A synthetically constructed revision.
pub const CUSTOM_SHA: &str = "CUSTOM";

/// Prefix of merge-aggregate keys.
pub const ALL_MERGE_FILES: &str = "ALL_MERGE_FILES";

/// First character of every merge-aggregate key.
pub const MERGE_AGGREGATE_MARKER: char = 'A';

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RevisionKey(String);

impl RevisionKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn zero() -> Self {
        Self(ZERO_SHA.to_string())
    }

    pub fn custom() -> Self {
        Self(CUSTOM_SHA.to_string())
    }

    /// Key of the merge-aggregate view over all parents of `sha`
    pub fn merge_aggregate(sha: &str) -> Self {
        Self(format!("{ALL_MERGE_FILES}{sha}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == ZERO_SHA
    }

    pub fn is_custom(&self) -> bool {
        self.0 == CUSTOM_SHA
    }

    pub fn is_merge_aggregate(&self) -> bool {
        self.0.starts_with(MERGE_AGGREGATE_MARKER)
    }

    /// Whether this key is written to the cache file.
    ///
    /// Sentinels and merge aggregates are cheap to regenerate and are skipped.
    pub fn is_persistable(&self) -> bool {
        !(self.is_zero() || self.is_custom() || self.is_merge_aggregate())
    }

    /// Whether this key can be re-split from a fixed-width blob
    pub fn has_persisted_width(&self) -> bool {
        self.0.len() == SHA_LENGTH && self.0.is_ascii()
    }
}

impl fmt::Display for RevisionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RevisionKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<String> for RevisionKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl From<git2::Oid> for RevisionKey {
    fn from(oid: git2::Oid) -> Self {
        Self(oid.to_string())
    }
}

impl Borrow<str> for RevisionKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}
