//! Subprocess execution with explicit argument vectors

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};

use anyhow::Result;

use crate::error::WasmkitError;

/// A program invocation: never a shell string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
        }
    }

    /// Build a spec from an argv slice whose first element is the program
    pub fn from_argv(argv: &[String]) -> Option<Self> {
        let (program, args) = argv.split_first()?;
        Some(Self::new(program.clone()).args(args.iter().cloned()))
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.cwd = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Whether any argument equals `needle`
    #[cfg(test)]
    pub fn has_arg(&self, needle: &str) -> bool {
        self.args.iter().any(|a| a == needle)
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " \"{}\"", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

/// Result of a subprocess execution
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Whether the command succeeded (exit code 0)
    pub success: bool,

    /// Process exit code, -1 when terminated by a signal
    pub exit_code: i32,

    /// Captured standard output (empty when IO was inherited)
    pub stdout: String,

    /// Captured standard error (empty when IO was inherited)
    pub stderr: String,

    /// Execution duration
    pub duration: Duration,
}

impl CommandResult {
    /// Create a CommandResult from an exit status
    pub fn from_status(status: ExitStatus, stdout: String, stderr: String, duration: Duration) -> Self {
        let exit_code = status.code().unwrap_or(-1);
        Self {
            success: status.success(),
            exit_code,
            stdout,
            stderr,
            duration,
        }
    }

    /// A result carrying only an exit code
    #[cfg(test)]
    pub fn from_code(exit_code: i32) -> Self {
        Self {
            success: exit_code == 0,
            exit_code,
            stdout: String::new(),
            stderr: String::new(),
            duration: Duration::ZERO,
        }
    }
}

/// How the child's standard streams are wired
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Child writes straight to our terminal
    Inherit,
    /// Child output is captured into the result
    Capture,
}

/// Runs subprocesses; swapped out in tests to observe invocations
pub trait CommandRunner {
    fn run(&mut self, spec: &CommandSpec, mode: OutputMode) -> Result<CommandResult>;
}

/// Spawns real processes with `std::process::Command`
#[derive(Debug, Default)]
pub struct SystemRunner {
    verbose: bool,
}

impl SystemRunner {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl CommandRunner for SystemRunner {
    fn run(&mut self, spec: &CommandSpec, mode: OutputMode) -> Result<CommandResult> {
        if self.verbose {
            match &spec.cwd {
                Some(dir) => eprintln!("Executing: {} (in {})", spec, dir.display()),
                None => eprintln!("Executing: {}", spec),
            }
        }
        run_command(spec, mode)
    }
}

/// Run a command, blocking until it exits
pub fn run_command(spec: &CommandSpec, mode: OutputMode) -> Result<CommandResult> {
    let start = Instant::now();

    let mut cmd = Command::new(&spec.program);
    cmd.args(&spec.args);
    if let Some(dir) = &spec.cwd {
        cmd.current_dir(dir);
    }

    match mode {
        OutputMode::Inherit => {
            cmd.stdin(Stdio::inherit());
            cmd.stdout(Stdio::inherit());
            cmd.stderr(Stdio::inherit());

            let status = cmd
                .status()
                .map_err(|e| WasmkitError::spawn(&spec.program, e.to_string()))?;

            Ok(CommandResult::from_status(
                status,
                String::new(),
                String::new(),
                start.elapsed(),
            ))
        }
        OutputMode::Capture => {
            let output = cmd
                .output()
                .map_err(|e| WasmkitError::spawn(&spec.program, e.to_string()))?;

            let stdout = String::from_utf8_lossy(&output.stdout).to_string();
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();

            Ok(CommandResult::from_status(
                output.status,
                stdout,
                stderr,
                start.elapsed(),
            ))
        }
    }
}

/// Check if a command exists in PATH
pub fn command_exists(program: &str) -> bool {
    which::which(program).is_ok()
}

/// Records invocations and replays scripted exit codes
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingRunner {
    pub invocations: Vec<(CommandSpec, OutputMode)>,
    /// Exit code per program name; unlisted programs exit 0
    pub exit_codes: std::collections::HashMap<String, i32>,
    /// Programs that fail to spawn
    pub missing: Vec<String>,
}

#[cfg(test)]
impl RecordingRunner {
    pub fn with_exit_code(mut self, program: &str, code: i32) -> Self {
        self.exit_codes.insert(program.to_string(), code);
        self
    }

    pub fn with_missing(mut self, program: &str) -> Self {
        self.missing.push(program.to_string());
        self
    }

    pub fn specs(&self) -> Vec<&CommandSpec> {
        self.invocations.iter().map(|(spec, _)| spec).collect()
    }
}

#[cfg(test)]
impl CommandRunner for RecordingRunner {
    fn run(&mut self, spec: &CommandSpec, mode: OutputMode) -> Result<CommandResult> {
        self.invocations.push((spec.clone(), mode));
        if self.missing.contains(&spec.program) {
            return Err(WasmkitError::spawn(&spec.program, "No such file or directory").into());
        }
        let code = self.exit_codes.get(&spec.program).copied().unwrap_or(0);
        Ok(CommandResult::from_code(code))
    }
}
