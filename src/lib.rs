//! git-revcache - A persistent cache of per-revision file status for git history browsers.
//!
//! Deriving which files every commit touched means diffing the whole history.
//! This library stores that index in a compact compressed file inside the git
//! directory and reloads it on later runs, so only new revisions are diffed.
//!
//! # Public API
//! The main public interface is re-exported from the [`core`] module, which provides:
//! - [`RevisionCache`] save/load of the index
//! - The data model: revision keys, file-status records, path tables
//! - History walking with cooperative cancellation
//! - Error handling and result types

pub mod commands;
pub mod core;

// Re-export the core public API for external users
pub use core::{
    CacheContents,
    CancelToken,
    Config,
    FileStatus,
    FileStatusRecord,
    GitRepo,
    MergeParent,
    PathTable,
    RevCacheError,
    RevFileMap,
    RevisionCache,
    RevisionKey,
    Result,
    WalkStats,
};
