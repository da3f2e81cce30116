use crate::core::{
    cache::RevisionCache,
    cancel::CancelToken,
    config::Config,
    error::{RevCacheError, Result},
    git::GitRepo,
    output::{print_info, print_success},
    record::CacheContents,
};
use std::env;

pub fn execute_build(limit: Option<usize>) -> Result<()> {
    let current_dir = env::current_dir()?;
    let git_repo = GitRepo::open(&current_dir).map_err(|_| RevCacheError::NotInGitRepo)?;

    let config = Config::load().unwrap_or_else(|e| {
        log::warn!("Ignoring unreadable configuration: {e}");
        Config::default()
    });

    let cache =
        RevisionCache::new(git_repo.git_dir()).with_compression_level(config.compression_level);

    // A broken cache only costs us the speedup, so fall back to a cold start
    let seed = cache.load().unwrap_or_else(|e| {
        log::warn!("Cache load failed, rebuilding from scratch: {e}");
        CacheContents::new()
    });
    log::debug!("Seeded walk with {} cached revisions", seed.revisions.len());

    let (contents, stats) =
        git_repo.walk_history(seed, &CancelToken::new(), limit.or(config.walk_limit))?;

    if contents.revisions.is_empty() {
        print_info("No commits yet, nothing to cache");
        return Ok(());
    }

    cache.save(&contents)?;

    print_success(&format!(
        "Cached {} revisions ({} computed, {} reused)",
        contents.persistable_count(),
        stats.computed,
        stats.reused
    ));
    Ok(())
}
