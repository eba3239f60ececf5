//! Setup command implementation

use anyhow::Result;
use clap::Args;

use crate::config::Project;
use crate::exec::SystemRunner;
use crate::setup::{Installer, SetupStep};
use crate::utils::terminal::print_warning;

/// Install dependencies, the wasm target and the build plugin
#[derive(Args, Debug)]
pub struct SetupCommand {}

impl SetupCommand {
    /// Execute the setup command. Step failures are reported, never fatal.
    pub fn execute(self, project: &Project, verbose: bool) -> Result<()> {
        println!("Setting up: {}", project.name());

        let mut runner = SystemRunner::new(verbose);
        let report = Installer::new(project, &mut runner, verbose).run()?;

        if report
            .status_of(SetupStep::Target)
            .is_some_and(|status| !status.is_success())
        {
            print_warning(&format!(
                "{} was not registered, `wasmkit build` will fail until it is",
                project.config.build.target
            ));
        }

        let failed = report
            .steps
            .iter()
            .filter(|r| !r.status.is_success())
            .count();
        if failed == 0 {
            println!(
                "Setup complete! ({} dependencies declared)",
                report.dependencies.len()
            );
        } else {
            println!(
                "Setup finished with {} of {} steps reporting problems",
                failed,
                report.steps.len()
            );
        }

        Ok(())
    }
}
