use crate::core::{
    cache::RevisionCache,
    error::{RevCacheError, Result},
    git::GitRepo,
    output::{print_field, print_info, print_section_header},
    record::CacheContents,
};
use std::env;
use std::fs;

/// Summarize the cache, or list the files of one cached revision
pub fn execute_info(revision: Option<String>) -> Result<()> {
    let current_dir = env::current_dir()?;
    let git_repo = GitRepo::open(&current_dir).map_err(|_| RevCacheError::NotInGitRepo)?;
    let cache = RevisionCache::new(git_repo.git_dir());

    let path = cache.cache_path();
    if !path.exists() {
        print_info("No revision cache. Run 'git-revcache build' to create one.");
        return Ok(());
    }
    let contents = cache.load()?;

    match revision {
        Some(prefix) => print_revision(&contents, &prefix),
        None => {
            let size = fs::metadata(&path)?.len();
            let branch = git_repo
                .get_current_branch()
                .unwrap_or_else(|_| "-none-".to_string());

            print_section_header("Revision cache");
            print_field("Branch", &branch);
            print_field("Path", &path.display().to_string());
            print_field("Size", &format!("{size} bytes"));
            print_field("Revisions", &contents.revisions.len().to_string());
            print_field("Directories", &contents.dirs.len().to_string());
            print_field("Files", &contents.files.len().to_string());
            println!();
            Ok(())
        }
    }
}

fn print_revision(contents: &CacheContents, prefix: &str) -> Result<()> {
    let Some((key, record)) = contents
        .revisions
        .iter()
        .find(|(key, _)| key.as_str().starts_with(prefix))
    else {
        print_info(&format!("Revision {prefix} is not cached"));
        return Ok(());
    };

    print_section_header(&format!("Revision {key}"));
    for (path, status) in record.paths(&contents.dirs, &contents.files) {
        print_field(status.description(), &path);
    }
    println!();
    Ok(())
}
