use crate::cache::read_first_line;
use crate::outcome::{ItemOutcome, Summary};
use anyhow::{Result, Context, anyhow};
use ignore::WalkBuilder;
use log::{info, warn};
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Name of the commit directory next to the executable
pub const COMMIT_DIR_NAME: &str = "commit";

/// Commit directory used by the CLI and the menu: `<exe dir>/commit`
pub fn default_commit_dir() -> Result<PathBuf> {
    let exe = env::current_exe().context("Failed to locate the running executable")?;
    let exe_dir = exe.parent()
        .ok_or_else(|| anyhow!("Executable has no parent directory: {}", exe.display()))?;
    Ok(exe_dir.join(COMMIT_DIR_NAME))
}

/// Rewrite every cached file into `commit_dir` under a new extension
///
/// # Arguments
/// * `cache_dir` - Cache directory, walked recursively
/// * `commit_dir` - Flat output directory, created if absent
/// * `new_ext` - Extension appended to each file stem, separator included (e.g. ".py")
///
/// # Returns
/// * `Result<Summary>` - One outcome per cached file. Files mapping to the
///   same committed name overwrite each other in walk order.
pub fn commit(cache_dir: &Path, commit_dir: &Path, new_ext: &str) -> Result<Summary> {
    fs::create_dir_all(commit_dir)
        .with_context(|| format!("Failed to create commit directory: {}", commit_dir.display()))?;

    let mut summary = Summary::default();

    if !cache_dir.is_dir() {
        warn!("Cache directory not found: {}", cache_dir.display());
        return Ok(summary);
    }

    let walker = WalkBuilder::new(cache_dir)
        .standard_filters(false)
        .build();

    for result in walker {
        let entry = match result {
            Ok(entry) => entry,
            Err(err) => {
                warn!("Error walking {}: {}", cache_dir.display(), err);
                continue;
            }
        };

        if !entry.file_type().map_or(false, |ft| ft.is_file()) {
            continue;
        }

        let source = entry.path();
        match commit_one(source, commit_dir, new_ext) {
            Ok(dest) => {
                info!("Committed: {}", dest.display());
                summary.record(ItemOutcome::Done { source: source.to_path_buf(), dest });
            },
            Err(err) => {
                warn!("Failed to commit {}: {}", source.display(), err);
                summary.record(ItemOutcome::Skipped { source: source.to_path_buf(), reason: err.to_string() });
            }
        }
    }

    info!("Committed {} files to {} ({} skipped)", summary.done_count(), commit_dir.display(), summary.skipped_count());
    Ok(summary)
}

/// Committed file name: the source stem followed by `new_ext`
pub fn committed_name(source: &Path, new_ext: &str) -> String {
    let stem = source.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!("{}{}", stem, new_ext)
}

fn commit_one(source: &Path, commit_dir: &Path, new_ext: &str) -> io::Result<PathBuf> {
    let line = read_first_line(source)?;
    let dest = commit_dir.join(committed_name(source, new_ext));
    fs::write(&dest, format!("{}\n", line))?;
    Ok(dest)
}
