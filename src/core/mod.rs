//! Core functionality for the git-revcache tool.
//!
//! This module provides the revision cache itself together with the data
//! model it persists, the binary stream codec, the history walker that
//! produces records, and the error, configuration and output plumbing.

pub mod cache;
pub mod cancel;
pub mod config;
pub mod dirs;
pub mod error;
pub mod file_status;
pub mod git;
pub mod output;
pub mod record;
pub mod revision;
pub mod stream;

// === Error handling ===
pub use error::{RevCacheError, Result};

// === Revision cache ===
// Save/load of the per-revision file-status index
pub use cache::{RevisionCache, CACHE_FILE_NAME, CACHE_MAGIC, CACHE_VERSION};

// === Data model ===
pub use file_status::FileStatus;
pub use record::{CacheContents, FileStatusRecord, MergeParent, PathTable, RevFileMap};
pub use revision::{RevisionKey, CUSTOM_SHA, SHA_LENGTH, ZERO_SHA};

// === Git operations ===
// History walking that produces the records the cache persists
pub use cancel::CancelToken;
pub use git::{GitRepo, WalkStats};

// === Configuration ===
pub use config::Config;

// === Output formatting ===
pub use output::{print_error, print_field, print_info, print_section_header, print_success};
