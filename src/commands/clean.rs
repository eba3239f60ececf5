//! Clean command implementation

use anyhow::Result;
use clap::Args;

use crate::build::{clean_output_dir, report_clean, CleanOutcome};
use crate::config::Project;
use crate::utils::terminal::print_phase;

/// Remove the build output directory
#[derive(Args, Debug)]
pub struct CleanCommand {
    /// Show what would be deleted
    #[arg(long)]
    pub dry_run: bool,
}

impl CleanCommand {
    /// Execute the clean command
    pub fn execute(self, project: &Project, _verbose: bool) -> Result<()> {
        let output_dir = &project.layout.output_dir;

        print_phase("Cleaning");
        let outcome = clean_output_dir(output_dir, self.dry_run)?;
        report_clean(outcome, &output_dir.display().to_string());

        if matches!(outcome, CleanOutcome::WouldRemove { .. }) {
            println!("💡 Tip: Run without --dry-run to actually delete the files");
        }

        Ok(())
    }
}
