//! Git repository access and history walking.
//!
//! This module provides [`GitRepo`], a thin wrapper over `git2` that produces
//! the per-revision file-status index the cache persists.
//!
//! # Public API
//! - [`GitRepo`]: Repository discovery, metadata, and history walking
//! - [`WalkStats`]: Counts of computed and reused revisions after a walk
//!
//! # Key Features
//! - **Seeded walks**: Revisions already present in a loaded cache are reused
//! - **Merge handling**: One record per merge parent, plus an in-memory
//!   aggregate over all parents
//! - **Cancellation**: The walk checks a [`CancelToken`] once per revision

use crate::core::{
    cancel::CancelToken,
    error::{RevCacheError, Result},
    file_status::FileStatus,
    record::{CacheContents, FileStatusRecord, MergeParent, PathTable},
    revision::RevisionKey,
};
use git2::{Delta, DiffFindOptions, Repository, Sort, Tree};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

pub struct GitRepo {
    repo: Repository,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkStats {
    /// Revisions whose status was derived from the repository
    pub computed: usize,
    /// Revisions taken from the seed
    pub reused: usize,
}

impl GitRepo {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Repository::discover(path)?;
        Ok(GitRepo { repo })
    }

    /// The `.git` directory, where the cache file lives
    pub fn git_dir(&self) -> PathBuf {
        self.repo.path().to_path_buf()
    }

    pub fn get_current_branch(&self) -> Result<String> {
        let head = self.repo.head()?;

        if let Some(branch_name) = head.shorthand() {
            if head.is_branch() {
                return Ok(branch_name.to_string());
            }
            if let Some(oid) = head.target() {
                // Detached HEAD
                return Ok(format!("detached at {}", &oid.to_string()[..7]));
            }
        }
        Ok("-none-".to_string())
    }

    /// Walk the history reachable from HEAD and fill in file-status records.
    ///
    /// `seed` is typically the result of loading the cache: its records are
    /// kept as they are and its tables keep growing, so seeded indices stay
    /// valid. At most `limit` revisions are visited.
    pub fn walk_history(
        &self,
        seed: CacheContents,
        cancel: &CancelToken,
        limit: Option<usize>,
    ) -> Result<(CacheContents, WalkStats)> {
        let mut contents = seed;
        let mut stats = WalkStats::default();

        let head = match self.repo.head().ok().and_then(|head| head.target()) {
            Some(oid) => oid,
            None => {
                log::debug!("Repository has no commits, nothing to walk");
                return Ok((contents, stats));
            }
        };

        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
        revwalk.push(head)?;

        for (visited, oid) in revwalk.enumerate() {
            if limit.is_some_and(|limit| visited >= limit) {
                log::debug!("Walk limit of {visited} revisions reached");
                break;
            }
            cancel.check()?;

            let oid = oid?;
            let key = RevisionKey::from(oid);
            if contents.revisions.contains_key(&key) {
                stats.reused += 1;
                continue;
            }

            let commit = self.repo.find_commit(oid)?;
            let tree = commit.tree()?;
            let parents = commit.parent_count();

            if parents <= 1 {
                let parent_tree = match parents {
                    0 => None,
                    _ => Some(commit.parent(0)?.tree()?),
                };
                let record = self.diff_record(
                    parent_tree.as_ref(),
                    &tree,
                    MergeParent::NotMerge,
                    &mut contents.dirs,
                    &mut contents.files,
                )?;
                contents.revisions.insert(key, record);
            } else {
                // every parent's diff interns into the shared tables: the
                // aggregate indexes them, so they are saved even when no
                // persisted record refers to them
                let mut aggregate = FileStatusRecord::new(MergeParent::NotMerge);
                let mut seen = HashSet::new();
                for idx in 0..parents {
                    let parent_tree = commit.parent(idx)?.tree()?;
                    let record = self.diff_record(
                        Some(&parent_tree),
                        &tree,
                        MergeParent::Parent(idx as u32),
                        &mut contents.dirs,
                        &mut contents.files,
                    )?;
                    for ((&dir, &name), &status) in
                        record.dirs.iter().zip(&record.names).zip(&record.status)
                    {
                        if seen.insert((dir, name)) {
                            aggregate.push(dir, name, status);
                        }
                    }
                    // the per-revision entry is relative to the first parent
                    if idx == 0 {
                        contents.revisions.insert(key.clone(), record);
                    }
                }
                contents
                    .revisions
                    .insert(RevisionKey::merge_aggregate(key.as_str()), aggregate);
            }
            stats.computed += 1;
        }

        log::debug!(
            "Walk finished: {} computed, {} reused",
            stats.computed,
            stats.reused
        );
        Ok((contents, stats))
    }

    fn diff_record(
        &self,
        old_tree: Option<&Tree<'_>>,
        new_tree: &Tree<'_>,
        merge_parent: MergeParent,
        dirs: &mut PathTable,
        files: &mut PathTable,
    ) -> Result<FileStatusRecord> {
        let mut diff = self
            .repo
            .diff_tree_to_tree(old_tree, Some(new_tree), None)?;
        let mut find_opts = DiffFindOptions::new();
        find_opts.renames(true).copies(true);
        diff.find_similar(Some(&mut find_opts))?;

        let mut record = FileStatusRecord::new(merge_parent);
        for delta in diff.deltas() {
            let file = match delta.status() {
                Delta::Deleted => delta.old_file(),
                _ => delta.new_file(),
            };
            let path = file
                .path()
                .and_then(Path::to_str)
                .ok_or(RevCacheError::InvalidUtf8Path)?;
            let (dir, name) = split_path(path);
            record.push(
                dirs.intern(dir),
                files.intern(name),
                FileStatus::from_delta(delta.status()),
            );
        }
        Ok(record)
    }
}

/// Split a repository path into directory and file name
fn split_path(path: &str) -> (&str, &str) {
    path.rsplit_once('/').unwrap_or(("", path))
}
