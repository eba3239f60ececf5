//! Build command implementation

use anyhow::Result;
use clap::Args;

use crate::build::{BuildProfile, Builder};
use crate::config::Project;
use crate::error::{hints, WasmkitError};
use crate::exec::{command_exists, SystemRunner};
use crate::utils::terminal::{print_error, print_info, print_step};

/// Clean the output directory and build the game
#[derive(Args, Debug)]
pub struct BuildCommand {
    /// Build profile: "debug" (any casing) for an unoptimized build,
    /// anything else for release
    #[arg(value_name = "PROFILE", allow_hyphen_values = true)]
    pub profile: Option<String>,

    /// Accepted and ignored
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, hide = true)]
    pub ignored: Vec<String>,
}

impl BuildCommand {
    /// Execute the build command.
    ///
    /// Exits the process with the toolchain's exit code when it fails.
    pub fn execute(self, project: &Project, verbose: bool) -> Result<()> {
        println!("Building: {}", project.name());

        if let Some(option) = &self.profile {
            print_step(&format!("Build option: '{}'", option));
        }
        if verbose && !self.ignored.is_empty() {
            print_info(&format!("Ignoring arguments: {}", self.ignored.join(" ")));
        }
        let profile = BuildProfile::from_arg(self.profile.as_deref());
        print_step(&format!("Build mode = {}", profile));

        let toolchain = &project.config.build.toolchain;
        if !command_exists(toolchain) {
            return Err(WasmkitError::missing_tool(
                toolchain,
                "building the game",
                hints::for_tool(toolchain),
            )
            .into());
        }

        let mut runner = SystemRunner::new(verbose);
        let report = Builder::new(project, &mut runner).run(profile)?;

        if !report.success() {
            print_error(&format!(
                "{} build failed with exit code {}",
                report.profile, report.result.exit_code
            ));
            std::process::exit(process_exit_code(report.result.exit_code));
        }

        println!("Build complete!");
        Ok(())
    }
}

/// Our own exit status for a failed child; signals (-1) map to 1
fn process_exit_code(child_code: i32) -> i32 {
    if child_code > 0 {
        child_code
    } else {
        1
    }
}
