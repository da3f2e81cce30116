//! Type-safe per-file change status.
//!
//! This module defines [`FileStatus`], the flag stored for every file of a
//! revision's file-status record. On disk each flag is a single character,
//! so a record's flags form one short string.
//!
//! # Public API
//! - [`FileStatus`]: Enumeration of the change kinds a revision can apply to a file
//!
//! # Key Features
//! - **git2 integration**: Direct conversion from `git2::Delta`
//! - **Compact encoding**: One character per flag for the cache file
//! - **Display formatting**: Consistent representation for CLI output

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FileStatus {
    /// Modified file (M)
    Modified,
    /// Deleted file (D)
    Deleted,
    /// New file (A)
    New,
    /// Renamed file (R)
    Renamed,
    /// Copied file (C)
    Copied,
    /// Anything git reports that has no dedicated flag (?)
    Unknown,
}

impl FileStatus {
    /// Convert from a git2 diff delta
    pub fn from_delta(delta: git2::Delta) -> FileStatus {
        match delta {
            git2::Delta::Added => FileStatus::New,
            git2::Delta::Deleted => FileStatus::Deleted,
            git2::Delta::Modified | git2::Delta::Typechange => FileStatus::Modified,
            git2::Delta::Renamed => FileStatus::Renamed,
            git2::Delta::Copied => FileStatus::Copied,
            _ => FileStatus::Unknown,
        }
    }

    /// Character written to the cache file
    pub fn as_char(&self) -> char {
        match self {
            FileStatus::Modified => 'M',
            FileStatus::Deleted => 'D',
            FileStatus::New => 'A',
            FileStatus::Renamed => 'R',
            FileStatus::Copied => 'C',
            FileStatus::Unknown => '?',
        }
    }

    /// Parse a flag character; unknown characters are rejected so corrupted
    /// records are never silently accepted
    pub fn from_char(c: char) -> Option<FileStatus> {
        match c {
            'M' => Some(FileStatus::Modified),
            'D' => Some(FileStatus::Deleted),
            'A' => Some(FileStatus::New),
            'R' => Some(FileStatus::Renamed),
            'C' => Some(FileStatus::Copied),
            '?' => Some(FileStatus::Unknown),
            _ => None,
        }
    }

    /// Get human-readable description for status
    pub fn description(&self) -> &'static str {
        match self {
            FileStatus::Modified => "modified",
            FileStatus::Deleted => "deleted",
            FileStatus::New => "new",
            FileStatus::Renamed => "renamed",
            FileStatus::Copied => "copied",
            FileStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}
