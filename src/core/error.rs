//! Domain-specific error types and error handling utilities.
//!
//! This module defines [`RevCacheError`] which covers every failure mode of the
//! revision cache, the history walker and the CLI. It uses `thiserror` for
//! ergonomic error definitions and includes constructors for the variants that
//! carry a path and an underlying I/O error.
//!
//! # Public API
//! - [`RevCacheError`]: Main error enum covering all failure modes
//! - [`Result<T>`]: Type alias for `std::result::Result<T, RevCacheError>`
//!
//! # Error Categories
//! - **Input contract**: Empty root path, empty mapping, malformed revision keys
//! - **Environment**: Missing directory, unreadable or unwritable cache files
//! - **Format**: Magic/version mismatch, corrupted or truncated streams
//! - **Walker**: Repository discovery, git2 failures, cancellation

use std::path::PathBuf;
use thiserror::Error;

/// Domain-specific error types for git-revcache
#[derive(Error, Debug)]
pub enum RevCacheError {
    // Git repository errors
    #[error("Not in a git repository")]
    NotInGitRepo,

    #[error("Git repository error: {0}")]
    GitRepo(#[from] git2::Error),

    #[error("Invalid UTF-8 path in repository")]
    InvalidUtf8Path,

    #[error("Operation cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Input contract errors
    #[error("Cache root path is empty")]
    EmptyRootPath,

    #[error("Nothing to save: the revision map is empty")]
    EmptyCache,

    #[error("Invalid revision key '{key}': expected 40 ASCII characters")]
    InvalidRevisionKey { key: String },

    #[error("Invalid record for revision '{key}': {reason}")]
    InvalidRecord { key: String, reason: String },

    // Cache environment errors
    #[error("Cache directory does not exist: {path}")]
    CacheDirectoryNotFound { path: PathBuf },

    #[error("Failed to write cache file '{path}': {source}")]
    CacheWriteFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to read cache file '{path}': {source}")]
    CacheReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Access denied replacing cache file '{path}': {source}")]
    CacheReplaceFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    // Cache format errors
    #[error("Cache file '{path}' has an unsupported format (magic {magic:#010x}, version {version})")]
    CacheFormatMismatch {
        path: PathBuf,
        magic: u32,
        version: i32,
    },

    #[error("Cache data is corrupted: {reason}")]
    CacheCorrupted { reason: String },

    // Configuration errors
    #[error("Invalid compression level {level}: expected a value between 0 and 9")]
    InvalidCompressionLevel { level: u32 },

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience type alias for Results using RevCacheError
pub type Result<T> = std::result::Result<T, RevCacheError>;

impl RevCacheError {
    /// Create an invalid revision key error
    pub fn invalid_revision_key(key: impl Into<String>) -> Self {
        Self::InvalidRevisionKey { key: key.into() }
    }

    /// Create an invalid record error
    pub fn invalid_record(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidRecord {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Create a cache directory not found error
    pub fn cache_directory_not_found(path: impl Into<PathBuf>) -> Self {
        Self::CacheDirectoryNotFound { path: path.into() }
    }

    /// Create a cache write failed error
    pub fn cache_write_failed(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::CacheWriteFailed {
            path: path.into(),
            source,
        }
    }

    /// Create a cache read failed error
    pub fn cache_read_failed(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::CacheReadFailed {
            path: path.into(),
            source,
        }
    }

    /// Create a cache replace failed error
    pub fn cache_replace_failed(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::CacheReplaceFailed {
            path: path.into(),
            source,
        }
    }

    /// Create a format mismatch error
    pub fn cache_format_mismatch(path: impl Into<PathBuf>, magic: u32, version: i32) -> Self {
        Self::CacheFormatMismatch {
            path: path.into(),
            magic,
            version,
        }
    }

    /// Create a corrupted cache error
    pub fn cache_corrupted(reason: impl Into<String>) -> Self {
        Self::CacheCorrupted {
            reason: reason.into(),
        }
    }
}
