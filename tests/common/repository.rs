//! Git repository management and setup utilities
//!
//! Provides functions for creating temporary repositories and shaping their
//! history with commits, branches and merges.

#![allow(dead_code)]

use git_revcache::core::error::{RevCacheError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// Test repository setup result. The TempDir must be kept alive for the
/// duration of the test to prevent cleanup.
pub struct TestRepo {
    pub temp_dir: TempDir,
    pub path: PathBuf,
}

impl TestRepo {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn git_dir(&self) -> PathBuf {
        self.path.join(".git")
    }
}

fn git(repo_path: &Path, args: &[&str]) -> Result<String> {
    let output = Command::new("git")
        .args(args)
        .current_dir(repo_path)
        .output()
        .map_err(RevCacheError::Io)?;
    if !output.status.success() {
        return Err(RevCacheError::Io(std::io::Error::other(format!(
            "git {} failed: {}",
            args.join(" "),
            String::from_utf8_lossy(&output.stderr).trim()
        ))));
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Sets up a fresh git repository with user configuration to avoid prompts
pub fn setup_test_repo() -> Result<TestRepo> {
    let temp_dir = TempDir::new().map_err(RevCacheError::Io)?;
    let repo_path = temp_dir.path().to_path_buf();

    git(&repo_path, &["init", "-q"])?;
    git(&repo_path, &["config", "user.name", "Test User"])?;
    git(&repo_path, &["config", "user.email", "test@example.com"])?;
    git(&repo_path, &["config", "commit.gpgsign", "false"])?;

    Ok(TestRepo {
        temp_dir,
        path: repo_path,
    })
}

/// Creates a file (and its parent directories) with the given content
pub fn create_file(repo_path: &Path, filename: &str, content: &str) -> Result<()> {
    let path = repo_path.join(filename);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(RevCacheError::Io)?;
    }
    fs::write(path, content).map_err(RevCacheError::Io)?;
    Ok(())
}

pub fn remove_file(repo_path: &Path, filename: &str) -> Result<()> {
    fs::remove_file(repo_path.join(filename)).map_err(RevCacheError::Io)?;
    Ok(())
}

/// Stages everything and commits, returning the new commit sha
pub fn commit_all(repo_path: &Path, message: &str) -> Result<String> {
    git(repo_path, &["add", "-A"])?;
    git(repo_path, &["commit", "-q", "-m", message])?;
    head_sha(repo_path)
}

pub fn head_sha(repo_path: &Path) -> Result<String> {
    git(repo_path, &["rev-parse", "HEAD"])
}

pub fn create_branch(repo_path: &Path, name: &str) -> Result<()> {
    git(repo_path, &["checkout", "-q", "-b", name])?;
    Ok(())
}

/// Switches back to the previously checked out branch
pub fn checkout_previous(repo_path: &Path) -> Result<()> {
    git(repo_path, &["checkout", "-q", "-"])?;
    Ok(())
}

/// Merges `branch` into the current branch with a merge commit
pub fn merge(repo_path: &Path, branch: &str) -> Result<String> {
    git(repo_path, &["merge", "-q", "--no-ff", "--no-edit", branch])?;
    head_sha(repo_path)
}
