//! CLI argument parsing using clap derive macros

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands::{
    build::BuildCommand, check::CheckCommand, clean::CleanCommand, serve::ServeCommand,
    setup::SetupCommand,
};
use crate::config::Project;
use crate::utils::paths::resolve_project_root;

/// wasmkit - build, host and set up a Rust WebAssembly game
#[derive(Parser, Debug)]
#[command(name = "wasmkit")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Project root (defaults to the nearest directory containing Wasmkit.toml)
    #[arg(short = 'C', long, global = true, env = "WASMKIT_PROJECT_DIR")]
    pub project_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Clean the output directory and build with cargo web
    Build(BuildCommand),

    /// Remove the build output directory
    Clean(CleanCommand),

    /// Serve the static content directory over HTTP
    Serve(ServeCommand),

    /// Install dependencies, the wasm target and the cargo-web plugin
    Setup(SetupCommand),

    /// Check that the required external tools are installed
    Check(CheckCommand),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        if self.no_color {
            console::set_colors_enabled(false);
            console::set_colors_enabled_stderr(false);
        }

        let root = resolve_project_root(self.project_dir.as_deref())?;
        let project = Project::load(&root)?;

        match self.command {
            Commands::Build(cmd) => cmd.execute(&project, self.verbose),
            Commands::Clean(cmd) => cmd.execute(&project, self.verbose),
            Commands::Serve(cmd) => cmd.execute(&project, self.verbose),
            Commands::Setup(cmd) => cmd.execute(&project, self.verbose),
            Commands::Check(cmd) => cmd.execute(&project, self.verbose),
        }
    }
}
