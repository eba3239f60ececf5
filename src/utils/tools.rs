//! Tool detection for the external programs wasmkit drives

use std::path::PathBuf;
use std::process::Command;

use which::which;

use crate::config::WasmkitConfig;

/// Tool detection result
#[derive(Debug, Clone)]
pub struct ToolInfo {
    /// Tool name
    pub name: String,
    /// Path to the tool executable
    pub path: PathBuf,
    /// First line of `tool --version`, if it printed one
    pub version: Option<String>,
}

/// Tool requirement level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolRequirement {
    /// Nothing works without it
    Required,
    /// One command degrades without it, warn only
    Recommended,
}

/// One entry of the environment check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCheck {
    pub name: String,
    pub requirement: ToolRequirement,
    pub used_by: &'static str,
}

/// Check if a tool exists and return its information
pub fn check_tool(tool_name: &str) -> Option<ToolInfo> {
    let path = which(tool_name).ok()?;
    Some(ToolInfo {
        name: tool_name.to_string(),
        path,
        version: get_tool_version(tool_name),
    })
}

fn get_tool_version(tool_name: &str) -> Option<String> {
    let output = Command::new(tool_name).arg("--version").output().ok()?;
    if !output.status.success() {
        return None;
    }
    let version = String::from_utf8_lossy(&output.stdout);
    let first = version.lines().next()?.trim();
    (!first.is_empty()).then(|| first.to_string())
}

/// The tools the commands of this project shell out to
pub fn environment_checks(config: &WasmkitConfig) -> Vec<ToolCheck> {
    let mut checks = vec![
        ToolCheck {
            name: config.build.toolchain.clone(),
            requirement: ToolRequirement::Required,
            used_by: "build, setup",
        },
        ToolCheck {
            name: "rustup".to_string(),
            requirement: ToolRequirement::Recommended,
            used_by: "setup",
        },
        ToolCheck {
            // cargo resolves `cargo web` to the `cargo-web` executable
            name: format!("{}-{}", config.build.toolchain, plugin_subcommand(config)),
            requirement: ToolRequirement::Recommended,
            used_by: "build",
        },
    ];

    if let Some(manager) = config.setup.package_manager.first() {
        checks.push(ToolCheck {
            name: manager.clone(),
            requirement: ToolRequirement::Recommended,
            used_by: "setup",
        });
    }

    checks
}

fn plugin_subcommand(config: &WasmkitConfig) -> &str {
    config
        .build
        .subcommand
        .first()
        .map(String::as_str)
        .unwrap_or("build")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_checks_default_config() {
        let checks = environment_checks(&WasmkitConfig::default());
        let names: Vec<&str> = checks.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["cargo", "rustup", "cargo-web", "pip"]);
        assert_eq!(checks[0].requirement, ToolRequirement::Required);
        assert!(checks[1..]
            .iter()
            .all(|c| c.requirement == ToolRequirement::Recommended));
    }

    #[cfg(unix)]
    #[test]
    fn test_check_common_tool() {
        assert!(check_tool("sh").is_some());
    }
}
