//! Process execution

pub mod subprocess;

pub use subprocess::{
    command_exists, CommandResult, CommandRunner, CommandSpec, OutputMode, SystemRunner,
};

#[cfg(test)]
pub use subprocess::RecordingRunner;
