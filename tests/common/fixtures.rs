//! Test data generation utilities and predefined scenarios

#![allow(dead_code)]

use super::repository::*;
use git_revcache::core::error::Result;
use git_revcache::{CacheContents, FileStatus, FileStatusRecord, MergeParent, RevisionKey};

/// Scenario: three linear commits touching nested paths.
/// Returns the repository and the commit shas, oldest first.
pub fn create_linear_repo() -> Result<(TestRepo, Vec<String>)> {
    let repo = setup_test_repo()?;
    let mut shas = Vec::new();

    create_file(&repo.path, "README.md", "hello\n")?;
    create_file(&repo.path, "src/main.rs", "fn main() {}\n")?;
    shas.push(commit_all(&repo.path, "Initial commit")?);

    create_file(&repo.path, "src/main.rs", "fn main() { println!(); }\n")?;
    create_file(&repo.path, "src/lib.rs", "pub mod core;\n")?;
    shas.push(commit_all(&repo.path, "Add library")?);

    remove_file(&repo.path, "README.md")?;
    shas.push(commit_all(&repo.path, "Drop readme")?);

    Ok((repo, shas))
}

/// Scenario: a feature branch merged back with a merge commit.
/// Returns the repository and the merge commit sha.
pub fn create_merge_repo() -> Result<(TestRepo, String)> {
    let repo = setup_test_repo()?;
    create_file(&repo.path, "base.txt", "base\n")?;
    commit_all(&repo.path, "Base")?;

    create_branch(&repo.path, "feature")?;
    create_file(&repo.path, "feature.txt", "feature\n")?;
    commit_all(&repo.path, "Feature work")?;

    checkout_previous(&repo.path)?;
    create_file(&repo.path, "docs/main.txt", "main\n")?;
    commit_all(&repo.path, "Main work")?;

    let merge_sha = merge(&repo.path, "feature")?;
    Ok((repo, merge_sha))
}

/// 40-character key derived from a number
pub fn sha(n: u32) -> String {
    format!("{n:040x}")
}

/// In-memory index of `count` revisions spread over a few directories
pub fn sample_contents(count: u32) -> CacheContents {
    let mut contents = CacheContents::new();
    let statuses = [
        FileStatus::Modified,
        FileStatus::New,
        FileStatus::Deleted,
        FileStatus::Renamed,
        FileStatus::Copied,
        FileStatus::Unknown,
    ];
    for n in 0..count {
        let merge_parent = if n % 5 == 4 {
            MergeParent::Parent(1)
        } else {
            MergeParent::NotMerge
        };
        let mut record = FileStatusRecord::new(merge_parent);
        for i in 0..(n % 4 + 1) {
            let dir = contents.dirs.intern(&format!("src/module{}", (n + i) % 3));
            let name = contents.files.intern(&format!("file{}.rs", (n * 7 + i) % 11));
            record.push(dir, name, statuses[((n + i) % 6) as usize]);
        }
        contents.revisions.insert(RevisionKey::new(sha(n + 1)), record);
    }
    contents
}
