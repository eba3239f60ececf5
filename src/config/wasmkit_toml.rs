//! Wasmkit.toml configuration parsing
//!
//! The file is optional. Every key has a default matching the conventional
//! project layout, so an absent file and an empty file behave the same.
//!
//! ```toml
//! [project]
//! name = "Rust Web Game"
//! static_dir = "pub"
//!
//! [build]
//! target = "wasm32-unknown-unknown"
//!
//! [server]
//! port = 8888
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::error::WasmkitError;

/// Name of the configuration file looked up at the project root
pub const CONFIG_FILE_NAME: &str = "Wasmkit.toml";

/// Root configuration from Wasmkit.toml
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct WasmkitConfig {
    pub project: ProjectConfig,
    pub build: BuildConfig,
    pub server: ServerConfig,
    pub setup: SetupConfig,
}

/// `[project]`: display name and directory layout, relative to the root
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectConfig {
    /// Display name used in banners
    pub name: String,
    /// Build output directory, removed before every build
    pub output_dir: PathBuf,
    /// Working directory of the build subprocess
    pub source_dir: PathBuf,
    /// Directory served by `wasmkit serve`
    pub static_dir: PathBuf,
    /// Dependency manifest, one identifier per line
    pub manifest: PathBuf,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: "Rust Web Game".to_string(),
            output_dir: PathBuf::from("target"),
            source_dir: PathBuf::from("src"),
            static_dir: PathBuf::from("pub"),
            manifest: PathBuf::from("requirements.txt"),
        }
    }
}

/// `[build]`: how the toolchain is invoked
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Toolchain executable
    pub toolchain: String,
    /// Leading arguments selecting the plugin subcommand
    pub subcommand: Vec<String>,
    /// Compilation target identifier
    pub target: String,
    /// Arguments passed to every build regardless of profile
    pub extra_args: Vec<String>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            toolchain: "cargo".to_string(),
            subcommand: vec!["web".to_string(), "build".to_string()],
            target: "wasm32-unknown-unknown".to_string(),
            extra_args: vec![
                "--color".to_string(),
                "always".to_string(),
                "--verbose".to_string(),
            ],
        }
    }
}

/// `[server]`: where the static file server listens
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8888,
        }
    }
}

impl ServerConfig {
    /// `host:port` string suitable for binding
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// `[setup]`: environment installer settings
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SetupConfig {
    /// Package manager argv prefix; manifest identifiers are appended
    pub package_manager: Vec<String>,
    /// Toolchain plugin installed with `cargo install`
    pub plugin: String,
}

impl Default for SetupConfig {
    fn default() -> Self {
        Self {
            package_manager: vec!["pip".to_string(), "install".to_string()],
            plugin: "cargo-web".to_string(),
        }
    }
}

impl WasmkitConfig {
    /// Parse configuration from a TOML string
    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        let config: WasmkitConfig = toml::from_str(content)
            .map_err(|e| WasmkitError::config_error(path, e.message().to_string()))?;
        config.validate(path)?;
        Ok(config)
    }

    /// Load `Wasmkit.toml` from the project root, or defaults when absent
    pub fn load_from_root(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE_NAME);
        if !path.is_file() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse(&content, &path)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if self.server.port == 0 {
            return Err(WasmkitError::config_error(path, "server.port must be between 1 and 65535").into());
        }
        if self.build.toolchain.trim().is_empty() {
            return Err(WasmkitError::config_error(path, "build.toolchain must not be empty").into());
        }
        if self.setup.package_manager.is_empty() {
            return Err(WasmkitError::config_error(path, "setup.package_manager must name a program").into());
        }
        Ok(())
    }
}
