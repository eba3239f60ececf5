//! Error types and helpers for user-friendly error messages
//!
//! Every variant carries an actionable hint that is printed below the
//! error itself by [`WasmkitError::display_with_hints`].

use std::path::PathBuf;

use thiserror::Error;

/// Custom error types with helpful context and suggestions
#[derive(Error, Debug)]
pub enum WasmkitError {
    /// Wasmkit.toml could not be read or parsed
    #[error("Configuration error in {}: {message}", .path.display())]
    Config {
        path: PathBuf,
        message: String,
        hint: String,
    },

    /// Tool/executable not found
    #[error("Missing tool: {tool}")]
    MissingTool {
        tool: String,
        required_for: String,
        hint: String,
    },

    /// A subprocess could not be started at all
    #[error("Failed to execute {program}: {message}")]
    Spawn {
        program: String,
        message: String,
        hint: String,
    },

    /// The static file server could not start
    #[error("Server error on {addr}: {message}")]
    Server {
        addr: String,
        message: String,
        hint: String,
    },
}

impl WasmkitError {
    /// Create a configuration error with the default hint
    pub fn config_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            message: message.into(),
            hint: hints::invalid_wasmkit_toml().to_string(),
        }
    }

    /// Create a missing tool error
    pub fn missing_tool(
        tool: impl Into<String>,
        required_for: impl Into<String>,
        hint: impl Into<String>,
    ) -> Self {
        Self::MissingTool {
            tool: tool.into(),
            required_for: required_for.into(),
            hint: hint.into(),
        }
    }

    /// Create a spawn error, picking the install hint from the program name
    pub fn spawn(program: impl Into<String>, message: impl Into<String>) -> Self {
        let program = program.into();
        let hint = hints::for_tool(&program).to_string();
        Self::Spawn {
            program,
            message: message.into(),
            hint,
        }
    }

    /// Create a server bind error
    pub fn server(addr: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Server {
            addr: addr.into(),
            message: message.into(),
            hint: hints::port_in_use().to_string(),
        }
    }

    /// The hint attached to this error
    pub fn hint(&self) -> &str {
        match self {
            WasmkitError::Config { hint, .. }
            | WasmkitError::MissingTool { hint, .. }
            | WasmkitError::Spawn { hint, .. }
            | WasmkitError::Server { hint, .. } => hint,
        }
    }

    /// Display error with formatting and hints
    pub fn display_with_hints(&self) {
        use console::style;

        eprintln!("\n{} {}", style("ERROR:").red().bold(), self);

        if let WasmkitError::MissingTool { required_for, .. } = self {
            eprintln!("  required for: {}", required_for);
        }

        eprintln!("\n{} {}", style("HINT:").yellow().bold(), self.hint());
        eprintln!();
    }
}

/// Common error hints for missing tools and bad setups
pub mod hints {
    /// Get hint for missing cargo/rustup
    pub fn rustup() -> &'static str {
        "Install the Rust toolchain from https://rustup.rs/ and make sure\n\
         ~/.cargo/bin is in your PATH."
    }

    /// Get hint for missing cargo-web
    pub fn cargo_web() -> &'static str {
        "Install the cargo-web plugin:\n\
         • Run: wasmkit setup\n\
         • Or: cargo install cargo-web"
    }

    /// Get hint for missing package manager
    pub fn package_manager() -> &'static str {
        "Install the package manager configured in [setup].package_manager,\n\
         or point that key at one that is available in your PATH."
    }

    /// Get hint for an invalid Wasmkit.toml
    pub fn invalid_wasmkit_toml() -> &'static str {
        "Wasmkit.toml is invalid. Common issues:\n\
         • Unknown key (only [project], [build], [server], [setup] are accepted)\n\
         • Invalid TOML syntax (check quotes, brackets, commas)\n\
         • Port outside 1-65535"
    }

    /// Get hint for a port that cannot be bound
    pub fn port_in_use() -> &'static str {
        "Another process may already be listening on this port.\n\
         Stop it, or set a different port in Wasmkit.toml:\n\
         \n\
         [server]\n\
         port = 8889"
    }

    /// Pick an installation hint from a program name
    pub fn for_tool(program: &str) -> &'static str {
        match program {
            "cargo" | "rustup" => rustup(),
            "cargo-web" => cargo_web(),
            "pip" | "pip3" | "python" | "python3" => package_manager(),
            _ => "Install this tool and ensure it's in your PATH",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_error_picks_tool_hint() {
        let err = WasmkitError::spawn("rustup", "No such file or directory");
        assert_eq!(err.hint(), hints::rustup());
        assert!(err.to_string().contains("rustup"));
    }

    #[test]
    fn test_config_error_mentions_path() {
        let err = WasmkitError::config_error("/tmp/Wasmkit.toml", "unknown field `foo`");
        let message = err.to_string();
        assert!(message.contains("/tmp/Wasmkit.toml"));
        assert!(message.contains("unknown field"));
    }

    #[test]
    fn test_unknown_tool_has_generic_hint() {
        assert_eq!(
            hints::for_tool("frobnicate"),
            "Install this tool and ensure it's in your PATH"
        );
    }
}
