//! Path utilities for wasmkit

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use walkdir::WalkDir;

use crate::config::CONFIG_FILE_NAME;
use crate::utils::terminal::print_warning;

/// Locate the project root.
///
/// An explicit directory wins. Otherwise the nearest ancestor of the current
/// directory holding Wasmkit.toml is used, falling back to the current
/// directory itself.
pub fn resolve_project_root(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(dir) = explicit {
        return dir
            .canonicalize()
            .with_context(|| format!("Project directory does not exist: {}", dir.display()));
    }

    let current_dir = std::env::current_dir().context("Failed to get current directory")?;
    match find_project_root_from(&current_dir) {
        Some(root) => Ok(root),
        None => {
            print_warning(&format!(
                "{} not found, using {} as the project root",
                CONFIG_FILE_NAME,
                current_dir.display()
            ));
            Ok(current_dir)
        }
    }
}

/// Find the project root starting from a specific directory
pub fn find_project_root_from(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(CONFIG_FILE_NAME).is_file())
        .map(Path::to_path_buf)
}

/// Total size in bytes of the regular files below `path`
pub fn dir_size(path: &Path) -> u64 {
    WalkDir::new(path)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter_map(|e| e.metadata().ok())
        .filter(|m| m.is_file())
        .map(|m| m.len())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_find_project_root_from_nested_dir() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join(CONFIG_FILE_NAME), "").unwrap();
        let nested = root.join("src").join("deep");
        fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_project_root_from(&nested).unwrap(), root);
    }

    #[test]
    fn test_find_project_root_without_config() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("a");
        fs::create_dir_all(&nested).unwrap();

        // An ancestor outside the temp dir could hold a Wasmkit.toml, so only
        // assert the result is not inside the temp dir.
        if let Some(found) = find_project_root_from(&nested) {
            assert!(!found.starts_with(temp_dir.path()));
        }
    }

    #[test]
    fn test_explicit_root_must_exist() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope");
        assert!(resolve_project_root(Some(&missing)).is_err());

        let found = resolve_project_root(Some(temp_dir.path())).unwrap();
        assert_eq!(found, temp_dir.path().canonicalize().unwrap());
    }

    #[test]
    fn test_dir_size_counts_nested_files() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("wasm32-unknown-unknown").join("release");
        fs::create_dir_all(&nested).unwrap();
        fs::write(temp_dir.path().join("a.txt"), vec![0u8; 100]).unwrap();
        fs::write(nested.join("game.wasm"), vec![0u8; 24]).unwrap();

        assert_eq!(dir_size(temp_dir.path()), 124);
    }
}
