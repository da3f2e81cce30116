//! Per-revision file-status records and the tables they index into.
//!
//! The history walker fills a [`CacheContents`]: an insertion-ordered map from
//! [`RevisionKey`] to [`FileStatusRecord`] plus the directory and file
//! [`PathTable`]s. Records store table indices instead of strings, so every
//! distinct path is kept once no matter how many revisions touch it.
//!
//! # Public API
//! - [`FileStatusRecord`]: Files touched by one revision, with their status flags
//! - [`MergeParent`]: Which parent of a merge the record is relative to
//! - [`PathTable`]: Interning table of directory or file names
//! - [`RevFileMap`]: Ordered revision → record map
//! - [`CacheContents`]: Everything the cache persists

use crate::core::{file_status::FileStatus, revision::RevisionKey};
use indexmap::IndexMap;
use std::collections::HashMap;

/// Revision index, iterated in insertion order.
pub type RevFileMap = IndexMap<RevisionKey, FileStatusRecord>;

/// Parent a file-status record is computed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergeParent {
    #[default]
    NotMerge,
    /// Zero-based parent index of a merge commit
    Parent(u32),
}

impl MergeParent {
    const NOT_MERGE_WIRE: i32 = -1;

    pub fn to_wire(self) -> i32 {
        match self {
            MergeParent::NotMerge => Self::NOT_MERGE_WIRE,
            MergeParent::Parent(n) => n as i32,
        }
    }

    /// Decode the stored value; any negative value means "not a merge"
    pub fn from_wire(value: i32) -> Self {
        if value < 0 {
            MergeParent::NotMerge
        } else {
            MergeParent::Parent(value as u32)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FileStatusRecord {
    /// Indices into the file table
    pub names: Vec<u32>,
    /// Indices into the directory table
    pub dirs: Vec<u32>,
    pub status: Vec<FileStatus>,
    pub merge_parent: MergeParent,
}

impl FileStatusRecord {
    pub fn new(merge_parent: MergeParent) -> Self {
        Self {
            merge_parent,
            ..Default::default()
        }
    }

    pub fn push(&mut self, dir: u32, name: u32, status: FileStatus) {
        self.dirs.push(dir);
        self.names.push(name);
        self.status.push(status);
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Resolve the record's entries to `(path, status)` pairs.
    ///
    /// Entries whose indices fall outside the tables are skipped.
    pub fn paths<'a>(
        &'a self,
        dirs: &'a PathTable,
        files: &'a PathTable,
    ) -> impl Iterator<Item = (String, FileStatus)> + 'a {
        self.dirs
            .iter()
            .zip(&self.names)
            .zip(&self.status)
            .filter_map(move |((&dir, &name), &status)| {
                let dir = dirs.get(dir)?;
                let name = files.get(name)?;
                let path = if dir.is_empty() {
                    name.to_string()
                } else {
                    format!("{dir}/{name}")
                };
                Some((path, status))
            })
    }
}

/// Ordered table of distinct strings referenced by index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathTable {
    entries: Vec<String>,
    lookup: HashMap<String, u32>,
}

impl PathTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the index of `value`, appending it when unseen
    pub fn intern(&mut self, value: &str) -> u32 {
        if let Some(&idx) = self.lookup.get(value) {
            return idx;
        }
        let idx = self.entries.len() as u32;
        self.entries.push(value.to_string());
        self.lookup.insert(value.to_string(), idx);
        idx
    }

    pub fn get(&self, idx: u32) -> Option<&str> {
        self.entries.get(idx as usize).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.entries
    }
}

impl From<Vec<String>> for PathTable {
    /// Build a table keeping the given order. Duplicates keep their slot but
    /// lookups resolve to the first occurrence.
    fn from(entries: Vec<String>) -> Self {
        let mut lookup = HashMap::with_capacity(entries.len());
        for (idx, entry) in entries.iter().enumerate() {
            lookup.entry(entry.clone()).or_insert(idx as u32);
        }
        Self { entries, lookup }
    }
}

/// The revision index together with its path tables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CacheContents {
    pub revisions: RevFileMap,
    pub dirs: PathTable,
    pub files: PathTable,
}

impl CacheContents {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when nothing was loaded (cold start)
    pub fn is_empty(&self) -> bool {
        self.revisions.is_empty() && self.dirs.is_empty() && self.files.is_empty()
    }

    /// Number of revisions that `save` would write
    pub fn persistable_count(&self) -> usize {
        self.revisions
            .keys()
            .filter(|key| key.is_persistable())
            .count()
    }
}
