mod args;
mod cache;
mod committer;
mod error;
mod logging;
mod menu;
mod outcome;
mod replacer;
mod rules;
mod scanner;

use anyhow::{Result, Context};
use atty::Stream;
use cache::CollisionPolicy;
use error::ExitCode;
use log::{error, warn};
use std::io;
use std::path::{Path, PathBuf};
use std::process;

/// Main entry point of the application
/// Handles argument parsing and executes the program with error handling
fn main() {
    let args = args::parse();
    logging::init_logging(args.verbose, args.quiet);

    let code = match run(args) {
        Ok(()) => ExitCode::Success,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::Failure
        }
    };
    process::exit(code.as_i32());
}

/// Runs the operation selected by the provided arguments
///
/// # Arguments
/// * `args` - Parsed command line arguments
fn run(args: args::Args) -> Result<()> {
    let policy = if args.detect_collisions {
        CollisionPolicy::Detect
    } else {
        CollisionPolicy::Overwrite
    };

    match args.mode {
        args::Mode::ClearCache => {
            cache::clear_cache(required(&args.cache_dir, "--cache-dir")?)?;
        },
        args::Mode::Commit => {
            let cache_dir = required(&args.cache_dir, "--cache-dir")?;
            let new_ext = args.new_ext.as_deref().context("--new-ext is required")?;
            committer::commit(cache_dir, &committer::default_commit_dir()?, new_ext)?;
        },
        args::Mode::Parse => {
            let cache_dir = required(&args.cache_dir, "--cache-dir")?;
            let rules = required(&args.rules, "--rules")?;
            replacer::parse_aggregate(&cache::aggregate_path(cache_dir), rules, args.output.as_deref())?;
        },
        args::Mode::Cache => {
            let cache_dir = required(&args.cache_dir, "--cache-dir")?;
            let parent = required(&args.parent, "--parent")?;
            let files = scanner::discover(parent, &args.target_name);
            if files.is_empty() {
                warn!("No {} files found under {}", args.target_name, parent.display());
            } else {
                cache::cache_files(&files, cache_dir, &cache::aggregate_path(cache_dir), policy)?;
            }
        },
        args::Mode::Menu => {
            if let Some(missing) = args::missing_flags(&args) {
                warn!("Incomplete flags (missing {}), falling back to the interactive menu", missing);
            }
            let settings = menu::MenuSettings {
                target_name: args.target_name.clone(),
                policy,
                commit_dir: committer::default_commit_dir()?,
                show_banner: atty::is(Stream::Stdin),
            };
            menu::Menu::new(io::stdin().lock(), io::stdout(), settings).run()?;
        },
    }

    Ok(())
}

fn required<'a>(value: &'a Option<PathBuf>, flag: &str) -> Result<&'a Path> {
    value.as_deref().with_context(|| format!("{} is required", flag))
}
