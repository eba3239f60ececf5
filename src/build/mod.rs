//! Clean-then-build pipeline around the `cargo web` toolchain plugin
//!
//! A build always runs the same phases in order:
//!
//! ```text
//! {Cleaning}   remove the output directory if present
//! {Pre-Build}
//! {Building}   <toolchain> <subcommand...> <extra args...> [--release] --target <target>
//! {Post-Build}
//! ```
//!
//! The toolchain's exit code is reported back to the caller untouched.

pub mod clean;

use std::fmt;

use anyhow::Result;

use crate::config::{BuildConfig, Project};
use crate::exec::{CommandResult, CommandRunner, CommandSpec, OutputMode};
use crate::utils::terminal::{format_size, print_phase, print_step};

pub use clean::{clean_output_dir, CleanOutcome};

/// Build profile selecting optimization flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BuildProfile {
    #[default]
    Release,
    Debug,
}

impl BuildProfile {
    /// `"debug"` in any casing selects Debug; anything else, or nothing, Release
    pub fn from_arg(arg: Option<&str>) -> Self {
        match arg {
            Some(value) if value.eq_ignore_ascii_case("debug") => BuildProfile::Debug,
            _ => BuildProfile::Release,
        }
    }

    pub fn is_release(self) -> bool {
        self == BuildProfile::Release
    }
}

impl fmt::Display for BuildProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildProfile::Release => write!(f, "Release"),
            BuildProfile::Debug => write!(f, "Debug"),
        }
    }
}

/// Assemble the toolchain invocation for `profile`
pub fn build_command(config: &BuildConfig, profile: BuildProfile) -> CommandSpec {
    let mut spec = CommandSpec::new(&config.toolchain)
        .args(config.subcommand.iter().cloned())
        .args(config.extra_args.iter().cloned());

    if profile.is_release() {
        spec = spec.arg("--release");
    }

    spec.arg("--target").arg(&config.target)
}

/// Outcome of a full build
#[derive(Debug)]
pub struct BuildReport {
    pub profile: BuildProfile,
    pub result: CommandResult,
}

impl BuildReport {
    pub fn success(&self) -> bool {
        self.result.success
    }
}

/// Report the clean step the way both `build` and `clean` print it
pub fn report_clean(outcome: CleanOutcome, display: &str) {
    match outcome {
        CleanOutcome::Removed { size } => {
            print_step(&format!("Removed {} ({})", display, format_size(size)))
        }
        CleanOutcome::WouldRemove { size } => {
            print_step(&format!("[DRY RUN] Would remove {} ({})", display, format_size(size)))
        }
        CleanOutcome::Missing => {
            print_step(&format!("{} does not exist yet - skipping removal", display))
        }
    }
}

/// Drives the build phases with a pluggable process runner
pub struct Builder<'a, R: CommandRunner> {
    project: &'a Project,
    runner: &'a mut R,
}

impl<'a, R: CommandRunner> Builder<'a, R> {
    pub fn new(project: &'a Project, runner: &'a mut R) -> Self {
        Self { project, runner }
    }

    /// Clean the output directory, then run the toolchain once
    pub fn run(&mut self, profile: BuildProfile) -> Result<BuildReport> {
        let layout = &self.project.layout;

        print_phase("Cleaning");
        let clean = clean_output_dir(&layout.output_dir, false)?;
        report_clean(clean, &layout.output_dir.display().to_string());

        print_phase("Pre-Build");

        print_phase("Building");
        let spec = build_command(&self.project.config.build, profile).current_dir(&layout.source_dir);
        print_step(&format!("Running: {}", spec));
        let result = self.runner.run(&spec, OutputMode::Inherit)?;
        print_step(&format!("{} returned: {}", tool_label(&spec), result.exit_code));
        print_step(&format!("Took {:.2}s", result.duration.as_secs_f64()));

        print_phase("Post-Build");

        Ok(BuildReport { profile, result })
    }
}

/// `cargo web build` style label: the program plus its subcommand words
fn tool_label(spec: &CommandSpec) -> String {
    let words: Vec<&str> = std::iter::once(spec.program.as_str())
        .chain(
            spec.args
                .iter()
                .map(String::as_str)
                .take_while(|a| !a.starts_with('-')),
        )
        .collect();
    words.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::RecordingRunner;
    use std::fs;
    use tempfile::TempDir;

    fn project_in(temp_dir: &TempDir) -> Project {
        Project::load(temp_dir.path()).unwrap()
    }

    #[test]
    fn test_profile_from_arg() {
        assert_eq!(BuildProfile::from_arg(None), BuildProfile::Release);
        assert_eq!(BuildProfile::from_arg(Some("debug")), BuildProfile::Debug);
        assert_eq!(BuildProfile::from_arg(Some("DeBuG")), BuildProfile::Debug);
        assert_eq!(BuildProfile::from_arg(Some("release")), BuildProfile::Release);
        assert_eq!(BuildProfile::from_arg(Some("debugging")), BuildProfile::Release);
        assert_eq!(BuildProfile::from_arg(Some("")), BuildProfile::Release);
    }

    #[test]
    fn test_release_command_line() {
        let spec = build_command(&BuildConfig::default(), BuildProfile::Release);
        assert_eq!(spec.program, "cargo");
        assert_eq!(
            spec.args,
            vec![
                "web",
                "build",
                "--color",
                "always",
                "--verbose",
                "--release",
                "--target",
                "wasm32-unknown-unknown"
            ]
        );
    }

    #[test]
    fn test_debug_command_line_has_no_release_flag() {
        let spec = build_command(&BuildConfig::default(), BuildProfile::Debug);
        assert!(!spec.has_arg("--release"));
        assert!(spec.has_arg("wasm32-unknown-unknown"));
    }

    #[test]
    fn test_tool_label() {
        let spec = build_command(&BuildConfig::default(), BuildProfile::Release);
        assert_eq!(tool_label(&spec), "cargo web build");
    }

    #[test]
    fn test_build_without_output_dir_runs_toolchain_once() {
        let temp_dir = TempDir::new().unwrap();
        let project = project_in(&temp_dir);
        let mut runner = RecordingRunner::default();

        let report = Builder::new(&project, &mut runner)
            .run(BuildProfile::from_arg(None))
            .unwrap();

        assert!(report.success());
        assert!(!project.layout.output_dir.exists());
        assert_eq!(runner.invocations.len(), 1);

        let (spec, mode) = &runner.invocations[0];
        assert_eq!(*mode, OutputMode::Inherit);
        assert!(spec.has_arg("--release"));
        assert!(spec.has_arg("wasm32-unknown-unknown"));
        assert_eq!(spec.cwd.as_deref(), Some(project.layout.source_dir.as_path()));
    }

    #[test]
    fn test_build_removes_previous_output() {
        let temp_dir = TempDir::new().unwrap();
        let project = project_in(&temp_dir);
        fs::create_dir_all(project.layout.output_dir.join("debug")).unwrap();
        let mut runner = RecordingRunner::default();

        let report = Builder::new(&project, &mut runner)
            .run(BuildProfile::Debug)
            .unwrap();

        assert_eq!(report.profile, BuildProfile::Debug);
        assert!(!project.layout.output_dir.exists());
        assert!(!runner.specs()[0].has_arg("--release"));
    }

    #[test]
    fn test_failed_toolchain_exit_code_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let project = project_in(&temp_dir);
        let mut runner = RecordingRunner::default().with_exit_code("cargo", 101);

        let report = Builder::new(&project, &mut runner)
            .run(BuildProfile::Release)
            .unwrap();

        assert!(!report.success());
        assert_eq!(report.result.exit_code, 101);
        assert_eq!(runner.invocations.len(), 1);
    }

    #[test]
    fn test_configured_toolchain_is_used() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("Wasmkit.toml"),
            r#"
[project]
source_dir = "game"

[build]
subcommand = ["build"]
target = "wasm32-wasip1"
extra_args = []
"#,
        )
        .unwrap();
        let project = project_in(&temp_dir);
        let mut runner = RecordingRunner::default();

        Builder::new(&project, &mut runner)
            .run(BuildProfile::Release)
            .unwrap();

        let spec = runner.specs()[0];
        assert_eq!(spec.args, vec!["build", "--release", "--target", "wasm32-wasip1"]);
        assert_eq!(spec.cwd.as_deref(), Some(temp_dir.path().join("game").as_path()));
    }
}
