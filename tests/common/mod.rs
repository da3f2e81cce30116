//! Shared test utilities for git-revcache
//!
//! Integration tests work against real temporary git repositories created with
//! the `git` binary, mirroring how the tool is used.

pub mod assertions;
pub mod fixtures;
pub mod repository;
