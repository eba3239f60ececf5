//! Removal of the build output directory

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::utils::paths::dir_size;

/// What happened to the output directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanOutcome {
    /// Directory existed and was deleted
    Removed { size: u64 },
    /// Dry run: directory exists and would be deleted
    WouldRemove { size: u64 },
    /// Nothing to do
    Missing,
}

/// Remove `output_dir` and everything below it.
///
/// A missing directory is not an error. A path that exists but is a plain
/// file is removed as well so the build can recreate the directory.
pub fn clean_output_dir(output_dir: &Path, dry_run: bool) -> Result<CleanOutcome> {
    let metadata = match fs::symlink_metadata(output_dir) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(CleanOutcome::Missing),
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to inspect {}", output_dir.display()))
        }
    };

    let size = if metadata.is_dir() {
        dir_size(output_dir)
    } else {
        metadata.len()
    };

    if dry_run {
        return Ok(CleanOutcome::WouldRemove { size });
    }

    let removed = if metadata.is_dir() {
        fs::remove_dir_all(output_dir)
    } else {
        fs::remove_file(output_dir)
    };
    removed.with_context(|| format!("Failed to remove {}", output_dir.display()))?;

    Ok(CleanOutcome::Removed { size })
}
