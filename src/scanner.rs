use ignore::WalkBuilder;
use log::{debug, warn};
use std::env;
use std::path::{Path, PathBuf};

/// Find every file named `target_name` below `parent_dir`
///
/// # Arguments
/// * `parent_dir` - Root of the scan
/// * `target_name` - Exact file name to match
///
/// # Returns
/// * `Vec<PathBuf>` - Absolute paths in walk order. A missing or unreadable
///   root gives an empty list.
pub fn discover(parent_dir: &Path, target_name: &str) -> Vec<PathBuf> {
    // An empty path is not the working directory
    if parent_dir.as_os_str().is_empty() {
        warn!("Parent directory not given, nothing to scan");
        return Vec::new();
    }

    let root = absolute_root(parent_dir);

    // No ignore-file filtering and hidden directories are walked too
    let walker = WalkBuilder::new(&root)
        .standard_filters(false)
        .build();

    let mut matched = Vec::new();

    for result in walker {
        let entry = match result {
            Ok(entry) => entry,
            Err(err) => {
                warn!("Error walking {}: {}", root.display(), err);
                continue;
            }
        };

        // The root itself is never a match, even when it is a file
        if entry.depth() == 0 || entry.path().is_dir() {
            continue;
        }

        if entry.file_name() == target_name {
            debug!("Discovered {}", entry.path().display());
            matched.push(entry.into_path());
        }
    }

    matched
}

/// Anchor a possibly relative directory at the current working directory
fn absolute_root(dir: &Path) -> PathBuf {
    if let Ok(canonical) = dir.canonicalize() {
        return canonical;
    }
    if dir.is_absolute() {
        return dir.to_path_buf();
    }
    env::current_dir()
        .map(|cwd| cwd.join(dir))
        .unwrap_or_else(|_| dir.to_path_buf())
}
