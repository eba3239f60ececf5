//! Dependency manifest: one identifier per line

use std::path::Path;

use anyhow::{Context, Result};

use crate::utils::terminal::print_warning;

/// Parse manifest text. Blank lines and `#` comments are skipped.
pub fn parse_manifest(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// Read the manifest at `path`; a missing file yields no dependencies
pub fn read_manifest(path: &Path) -> Result<Vec<String>> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(parse_manifest(&content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            print_warning(&format!(
                "Dependency manifest {} not found, nothing to install",
                path.display()
            ));
            Ok(Vec::new())
        }
        Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
    }
}
