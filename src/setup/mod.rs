//! Environment installer
//!
//! Runs three independent, best-effort steps in order: install the manifest
//! dependencies, register the wasm target with rustup, install the toolchain
//! plugin. A failing step is logged and the next one still runs.

pub mod manifest;

use anyhow::Result;

use crate::config::Project;
use crate::exec::{CommandResult, CommandRunner, CommandSpec, OutputMode};
use crate::utils::terminal::{create_spinner, print_info, print_success, print_warning};

use manifest::read_manifest;

/// Which installer step a report belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupStep {
    Dependencies,
    Target,
    Plugin,
}

impl SetupStep {
    fn label(self) -> &'static str {
        match self {
            SetupStep::Dependencies => "Installing dependencies",
            SetupStep::Target => "Registering compilation target",
            SetupStep::Plugin => "Installing build plugin",
        }
    }
}

/// How a single step ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepStatus {
    /// Nothing to do
    Skipped,
    /// Process ran and exited with this code
    Exited(i32),
    /// Process could not be started
    SpawnFailed(String),
}

impl StepStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, StepStatus::Skipped | StepStatus::Exited(0))
    }
}

/// Result of one step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    pub step: SetupStep,
    pub status: StepStatus,
}

/// Result of the whole installer run
#[derive(Debug, Clone, Default)]
pub struct SetupReport {
    pub dependencies: Vec<String>,
    pub steps: Vec<StepReport>,
}

impl SetupReport {
    pub fn status_of(&self, step: SetupStep) -> Option<&StepStatus> {
        self.steps.iter().find(|r| r.step == step).map(|r| &r.status)
    }
}

/// Runs the installer steps with a pluggable process runner
pub struct Installer<'a, R: CommandRunner> {
    project: &'a Project,
    runner: &'a mut R,
    verbose: bool,
}

impl<'a, R: CommandRunner> Installer<'a, R> {
    pub fn new(project: &'a Project, runner: &'a mut R, verbose: bool) -> Self {
        Self {
            project,
            runner,
            verbose,
        }
    }

    /// Run all steps; only a manifest read error stops the installer
    pub fn run(&mut self) -> Result<SetupReport> {
        let mut report = SetupReport {
            dependencies: read_manifest(&self.project.layout.manifest)?,
            steps: Vec::new(),
        };

        let deps = self.install_dependencies(&report.dependencies);
        report.steps.push(deps);

        let target = self.add_target();
        report.steps.push(target);

        let plugin = self.install_plugin();
        report.steps.push(plugin);

        Ok(report)
    }

    fn install_dependencies(&mut self, dependencies: &[String]) -> StepReport {
        let step = SetupStep::Dependencies;
        if dependencies.is_empty() {
            print_info("No dependencies declared, skipping install");
            return StepReport {
                step,
                status: StepStatus::Skipped,
            };
        }

        print_info(&format!("Declared dependencies: {}", dependencies.join(", ")));

        let Some(spec) = CommandSpec::from_argv(&self.project.config.setup.package_manager) else {
            return StepReport {
                step,
                status: StepStatus::Skipped,
            };
        };
        let spec = spec
            .args(dependencies.iter().cloned())
            .current_dir(&self.project.layout.root);

        let status = self.run_step(step, &spec);
        log_status(step, &status);
        StepReport { step, status }
    }

    fn add_target(&mut self) -> StepReport {
        let step = SetupStep::Target;
        let spec = CommandSpec::new("rustup")
            .args(["target", "add"])
            .arg(&self.project.config.build.target);

        let status = self.run_step(step, &spec);
        log_status(step, &status);
        StepReport { step, status }
    }

    fn install_plugin(&mut self) -> StepReport {
        let step = SetupStep::Plugin;
        let spec = CommandSpec::new(&self.project.config.build.toolchain)
            .arg("install")
            .arg(&self.project.config.setup.plugin);

        let status = self.run_step(step, &spec);
        match &status {
            StepStatus::Exited(0) => log_status(step, &status),
            StepStatus::Exited(code) => print_warning(&format!(
                "{} exited with {} (it may already be installed), continuing",
                spec, code
            )),
            _ => log_status(step, &status),
        }
        StepReport { step, status }
    }

    fn run_step(&mut self, step: SetupStep, spec: &CommandSpec) -> StepStatus {
        let result: Result<CommandResult> = if self.verbose {
            print_info(&format!("{}: {}", step.label(), spec));
            self.runner.run(spec, OutputMode::Inherit)
        } else {
            let spinner = create_spinner(&format!("{}: {}", step.label(), spec));
            let result = self.runner.run(spec, OutputMode::Capture);
            spinner.finish_and_clear();
            result
        };

        match result {
            Ok(result) => {
                if !result.success {
                    for captured in [&result.stdout, &result.stderr] {
                        if !captured.trim().is_empty() {
                            eprintln!("{}", captured.trim_end());
                        }
                    }
                }
                StepStatus::Exited(result.exit_code)
            }
            Err(e) => StepStatus::SpawnFailed(format!("{:#}", e)),
        }
    }
}

fn log_status(step: SetupStep, status: &StepStatus) {
    match status {
        StepStatus::Skipped => print_info(&format!("{}: skipped", step.label())),
        StepStatus::Exited(0) => print_success(&format!("{}: returned 0", step.label())),
        StepStatus::Exited(code) => {
            print_warning(&format!("{}: returned {}", step.label(), code))
        }
        StepStatus::SpawnFailed(message) => {
            print_warning(&format!("{}: {}", step.label(), message))
        }
    }
}
