use clap::{Parser, ArgAction};
use std::path::PathBuf;

/// File name looked for during discovery when none is given
pub const DEFAULT_TARGET_NAME: &str = "code.txt";

/// Execution mode of the application
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Mode {
    #[default]
    Menu,        // No complete flag combination, run the interactive menu
    Cache,       // Discover target files and cache their first lines
    ClearCache,  // Delete the cache directory
    Commit,      // Materialize cached lines under a new extension
    Parse,       // Apply JSON rules to the aggregate file
}

/// Command line arguments parser
#[derive(Parser, Debug)]
#[command(version, about = "Discover, cache, commit and template code.txt snippets")]
#[command(name = "compose")]
pub struct Args {
    /// Parent directory to scan for target files
    #[arg(long = "parent", value_name = "DIR")]
    pub parent: Option<PathBuf>,

    /// Directory to store cached files
    #[arg(long = "cache-dir", value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Commit cached files
    #[arg(long = "commit")]
    pub commit: bool,

    /// New file extension for committed files (e.g. ".py")
    #[arg(long = "new-ext", value_name = "EXT", allow_hyphen_values = true)]
    pub new_ext: Option<String>,

    /// Clear the cache directory
    #[arg(long = "clear-cache")]
    pub clear_cache: bool,

    /// Parse aggregate.txt using replacement rules
    #[arg(long = "parse")]
    pub parse: bool,

    /// Path to JSON file with replacement rules
    #[arg(long = "rules", value_name = "FILE")]
    pub rules: Option<PathBuf>,

    /// Optional output file for the parsed aggregate
    #[arg(long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// File name to look for during discovery
    #[arg(long = "target-name", value_name = "NAME", default_value = DEFAULT_TARGET_NAME)]
    pub target_name: String,

    /// Skip files whose cache entry name was already used in the same run
    #[arg(long = "detect-collisions")]
    pub detect_collisions: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,

    /// Only report errors
    #[arg(short = 'q', long = "quiet", conflicts_with = "verbose")]
    pub quiet: bool,

    #[arg(skip)]
    pub mode: Mode,
}

/// Parse command line arguments and resolve the execution mode
pub fn parse() -> Args {
    let mut args = Args::parse();
    args.mode = resolve_mode(&args);
    args
}

/// Pick the operation selected by the flag combination.
///
/// Checked in order: clear cache, commit, parse, discovery + caching.
/// Anything else falls back to the interactive menu.
pub fn resolve_mode(args: &Args) -> Mode {
    let has_cache = args.cache_dir.is_some();

    if args.clear_cache && has_cache {
        Mode::ClearCache
    } else if args.commit && has_cache && args.new_ext.is_some() {
        Mode::Commit
    } else if args.parse && has_cache && args.rules.is_some() {
        Mode::Parse
    } else if args.parent.is_some() && has_cache {
        Mode::Cache
    } else {
        Mode::Menu
    }
}

/// Describe which flags are missing when operation flags were given but
/// no complete combination matched.
///
/// # Returns
/// * `Option<String>` - `None` when no operation flag was given at all
pub fn missing_flags(args: &Args) -> Option<String> {
    if args.mode != Mode::Menu {
        return None;
    }

    let mut missing = Vec::new();
    let needs_cache = args.clear_cache || args.commit || args.parse || args.parent.is_some();

    if needs_cache && args.cache_dir.is_none() {
        missing.push("--cache-dir");
    }
    if args.commit && args.new_ext.is_none() {
        missing.push("--new-ext");
    }
    if args.parse && args.rules.is_none() {
        missing.push("--rules");
    }

    if missing.is_empty() {
        None
    } else {
        Some(missing.join(", "))
    }
}
