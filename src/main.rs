use clap::{Parser, Subcommand};
use git_revcache::commands::*;
use git_revcache::core::{
    error::{RevCacheError, Result},
    print_error,
};
use std::env;

#[derive(Parser)]
#[command(name = "git-revcache")]
#[command(about = "Persistent per-revision file status cache for git repositories")]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Walk the history from HEAD and save the revision cache
    Build {
        /// Maximum number of revisions to visit
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Show cache statistics, or the files of one cached revision
    Info {
        /// Revision sha (or unique prefix) to show
        revision: Option<String>,
    },
    /// Remove the revision cache of the current repository
    Clear,
    /// Show or update the configuration
    Config {
        /// zlib compression level used when saving (0-9)
        #[arg(long)]
        compression_level: Option<u32>,
        /// Maximum revisions visited by build (0 for unlimited)
        #[arg(long)]
        walk_limit: Option<usize>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Configure logging based on --debug flag
    if cli.debug {
        env::set_var("RUST_LOG", "debug");
    } else if env::var_os("RUST_LOG").is_none() {
        env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    let result = match cli.command {
        Commands::Build { limit } => execute_build(limit),
        Commands::Info { revision } => execute_info(revision),
        Commands::Clear => execute_clear(),
        Commands::Config {
            compression_level,
            walk_limit,
        } => execute_config(compression_level, walk_limit),
    };

    if let Err(e) = result {
        if let RevCacheError::NotInGitRepo = e {
            print_error("Not in a git repository");
        } else {
            print_error(&e.to_string());
        }
        std::process::exit(1);
    }

    Ok(())
}
