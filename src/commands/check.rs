//! Check command implementation
//!
//! Looks up the external programs the other commands shell out to and
//! reports what is missing, with install hints.

use anyhow::Result;
use clap::Args;
use console::style;

use crate::config::Project;
use crate::error::hints;
use crate::utils::tools::{check_tool, environment_checks, ToolRequirement};

/// Check that the required external tools are installed
#[derive(Args, Debug)]
pub struct CheckCommand {}

impl CheckCommand {
    /// Execute the check command; exits 1 when a required tool is missing
    pub fn execute(self, project: &Project, verbose: bool) -> Result<()> {
        println!("🔍 Checking environment for {}...\n", project.name());

        let mut missing_required = 0;
        let mut missing_recommended = 0;

        for check in environment_checks(&project.config) {
            match check_tool(&check.name) {
                Some(info) => {
                    let version = info.version.as_deref().unwrap_or("unknown version");
                    println!("  {} {} ({})", style("✓").green(), info.name, version);
                    if verbose {
                        println!("      {}", info.path.display());
                    }
                }
                None => {
                    let marker = match check.requirement {
                        ToolRequirement::Required => {
                            missing_required += 1;
                            style("✗").red()
                        }
                        ToolRequirement::Recommended => {
                            missing_recommended += 1;
                            style("!").yellow()
                        }
                    };
                    println!(
                        "  {} {} not found (used by: {})",
                        marker, check.name, check.used_by
                    );
                    for line in hints::for_tool(&check.name).lines() {
                        println!("      {}", line);
                    }
                }
            }
        }

        println!();
        if missing_required > 0 {
            println!(
                "{} {} required tool(s) missing",
                style("ERROR:").red().bold(),
                missing_required
            );
            std::process::exit(1);
        }

        if missing_recommended > 0 {
            println!(
                "{} {} recommended tool(s) missing, run `wasmkit setup`",
                style("WARNING:").yellow().bold(),
                missing_recommended
            );
        } else {
            println!("{} all tools found", style("OK:").green().bold());
        }

        Ok(())
    }
}
