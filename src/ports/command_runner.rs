use crate::domain::{CommandOutput, SystemCommand};

/// Port for executing system commands.
///
/// Implementations never fail: a command that cannot be started is reported as a
/// failed [`CommandOutput`] so that apply steps can log it and continue.
pub trait CommandRunner {
    /// Run the command to completion and capture its output.
    fn execute(&self, command: &SystemCommand) -> CommandOutput;
}
