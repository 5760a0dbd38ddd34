use crate::error::{MergeError, Result};
use glob::glob;
use log::{debug, info, warn};
use std::path::{Path, PathBuf};

/// Default tile pattern when the input is a directory
pub const DEFAULT_PATTERN: &str = "*.tif";

/// Turn the input argument into a glob pattern: a directory is combined
/// with `pattern`, anything else is taken as a pattern already.
pub fn resolve_pattern(input: &str, pattern: &str) -> String {
    let path = Path::new(input);
    if path.is_dir() {
        path.join(pattern).to_string_lossy().to_string()
    } else {
        input.to_string()
    }
}

/// Find the tiles to merge, sorted by path.
///
/// Fails with [`MergeError::NoInputFiles`] when nothing matches, so no
/// output is ever produced from an empty set.
pub fn discover_tiles(input: &str, pattern: &str) -> Result<Vec<PathBuf>> {
    let pattern = resolve_pattern(input, pattern);
    info!("Scanning for tiles with pattern: {}", pattern);

    let mut files = Vec::new();
    for entry in glob(&pattern)? {
        match entry {
            Ok(path) if path.is_file() => files.push(path),
            Ok(path) => debug!("Skipping non-file match {:?}", path),
            Err(e) => warn!("Bad path from glob: {:?}", e),
        }
    }

    if files.is_empty() {
        return Err(MergeError::NoInputFiles(pattern));
    }

    files.sort();
    info!("Found {} tiles", files.len());
    Ok(files)
}
