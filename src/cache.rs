use crate::outcome::{ItemOutcome, Summary};
use anyhow::{Result, Context};
use log::{debug, info, warn};
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Name of the aggregate file inside a cache directory
pub const AGGREGATE_FILE_NAME: &str = "aggregate.txt";

/// What to do when two files map to the same cache entry in one run
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum CollisionPolicy {
    /// The later file overwrites the earlier cache entry
    #[default]
    Overwrite,
    /// The later file is skipped and left out of the aggregate
    Detect,
}

/// Path of the aggregate file for `cache_dir`
pub fn aggregate_path(cache_dir: &Path) -> PathBuf {
    cache_dir.join(AGGREGATE_FILE_NAME)
}

/// Read the first line of a file with surrounding whitespace removed.
///
/// `\n`, `\r\n` and a lone `\r` all end a line.
pub fn read_first_line(path: &Path) -> io::Result<String> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut line = String::new();
    reader.read_line(&mut line)?;
    let first = line.split('\r').next().unwrap_or_default();
    Ok(first.trim().to_string())
}

/// Cache the first line of every file and write the aggregate file
///
/// # Arguments
/// * `paths` - Files to cache, in order
/// * `cache_dir` - Directory receiving one subdirectory per file stem
/// * `aggregate_file` - File receiving all cached lines, newline-joined
/// * `policy` - Handling of files sharing a stem
///
/// # Returns
/// * `Result<Summary>` - One outcome per input path. Only writing the
///   aggregate file or creating `cache_dir` can fail the whole run.
pub fn cache_files(
    paths: &[PathBuf],
    cache_dir: &Path,
    aggregate_file: &Path,
    policy: CollisionPolicy,
) -> Result<Summary> {
    fs::create_dir_all(cache_dir)
        .with_context(|| format!("Failed to create cache directory: {}", cache_dir.display()))?;

    let mut summary = Summary::default();
    let mut aggregated = Vec::new();
    let mut used_keys = HashSet::new();

    for path in paths {
        let key = cache_key(path);

        if policy == CollisionPolicy::Detect && used_keys.contains(&key) {
            let reason = format!("cache entry {:?} already written in this run", key);
            warn!("Skipping {}: {}", path.display(), reason);
            summary.record(ItemOutcome::Skipped { source: path.clone(), reason });
            continue;
        }

        match cache_one(path, cache_dir, &key) {
            Ok((line, dest)) => {
                debug!("Cached {} -> {}", path.display(), dest.display());
                aggregated.push(line);
                used_keys.insert(key);
                summary.record(ItemOutcome::Done { source: path.clone(), dest });
            },
            Err(err) => {
                warn!("Error caching {}: {}", path.display(), err);
                summary.record(ItemOutcome::Skipped { source: path.clone(), reason: err.to_string() });
            }
        }
    }

    fs::write(aggregate_file, aggregated.join("\n"))
        .with_context(|| format!("Failed to write aggregate file: {}", aggregate_file.display()))?;

    info!("Cached {} files to {}", summary.done_count(), aggregate_file.display());
    if summary.skipped_count() > 0 {
        warn!("Skipped {} of {} files", summary.skipped_count(), paths.len());
    }
    Ok(summary)
}

/// Cache directory entry name: the file name without its extension
fn cache_key(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn cache_one(path: &Path, cache_dir: &Path, key: &str) -> io::Result<(String, PathBuf)> {
    let line = read_first_line(path)?;

    let file_name = path.file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"))?;

    let subdir = cache_dir.join(key);
    fs::create_dir_all(&subdir)?;

    let dest = subdir.join(file_name);
    fs::write(&dest, format!("{}\n", line))?;

    Ok((line, dest))
}

/// Delete the cache directory and everything in it
///
/// # Returns
/// * `Result<bool>` - `false` when there was no cache directory to delete
pub fn clear_cache(cache_dir: &Path) -> Result<bool> {
    if !cache_dir.is_dir() {
        warn!("Cache directory not found: {}", cache_dir.display());
        return Ok(false);
    }

    fs::remove_dir_all(cache_dir)
        .with_context(|| format!("Failed to clear cache: {}", cache_dir.display()))?;
    info!("Cleared cache: {}", cache_dir.display());
    Ok(true)
}
