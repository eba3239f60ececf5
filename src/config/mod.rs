//! Project configuration: the optional Wasmkit.toml and the resolved layout

mod wasmkit_toml;

use std::path::{Path, PathBuf};

use anyhow::Result;

pub use wasmkit_toml::{BuildConfig, WasmkitConfig, CONFIG_FILE_NAME};

/// Absolute paths every command works with, resolved once at startup
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectLayout {
    pub root: PathBuf,
    pub output_dir: PathBuf,
    pub source_dir: PathBuf,
    pub static_dir: PathBuf,
    pub manifest: PathBuf,
}

impl ProjectLayout {
    /// Resolve the configured (possibly relative) paths against `root`
    pub fn resolve(root: &Path, config: &WasmkitConfig) -> Self {
        let project = &config.project;
        Self {
            root: root.to_path_buf(),
            output_dir: root.join(&project.output_dir),
            source_dir: root.join(&project.source_dir),
            static_dir: root.join(&project.static_dir),
            manifest: root.join(&project.manifest),
        }
    }
}

/// Everything a command needs: the parsed config plus its resolved layout
#[derive(Debug, Clone)]
pub struct Project {
    pub config: WasmkitConfig,
    pub layout: ProjectLayout,
}

impl Project {
    /// Load Wasmkit.toml (if any) from `root` and resolve the layout
    pub fn load(root: &Path) -> Result<Self> {
        let config = WasmkitConfig::load_from_root(root)?;
        let layout = ProjectLayout::resolve(root, &config);
        Ok(Self { config, layout })
    }

    /// Display name used in banners
    pub fn name(&self) -> &str {
        &self.config.project.name
    }
}
