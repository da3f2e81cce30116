use crate::core::{
    cache::RevisionCache,
    error::{RevCacheError, Result},
    git::GitRepo,
    output::{print_info, print_success},
};
use std::env;

pub fn execute_clear() -> Result<()> {
    let current_dir = env::current_dir()?;
    let git_repo = GitRepo::open(&current_dir).map_err(|_| RevCacheError::NotInGitRepo)?;

    if RevisionCache::new(git_repo.git_dir()).remove()? {
        print_success("Revision cache removed");
    } else {
        print_info("No revision cache to remove");
    }
    Ok(())
}
