use std::sync::Mutex;

use crate::domain::{CommandOutput, SystemCommand};
use crate::ports::CommandRunner;

/// Records every command and succeeds unless told otherwise.
#[derive(Default)]
pub struct RecordingCommandRunner {
    recorded: Mutex<Vec<SystemCommand>>,
    failing: Mutex<Vec<String>>,
}

impl RecordingCommandRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every command whose command line contains `pattern`.
    pub fn fail_on(&self, pattern: &str) {
        self.failing.lock().unwrap().push(pattern.to_string());
    }

    pub fn recorded(&self) -> Vec<SystemCommand> {
        self.recorded.lock().unwrap().clone()
    }

    pub fn command_lines(&self) -> Vec<String> {
        self.recorded().iter().map(SystemCommand::command_line).collect()
    }

    /// Whether any recorded command line contains `pattern`.
    pub fn ran(&self, pattern: &str) -> bool {
        self.command_lines().iter().any(|line| line.contains(pattern))
    }
}

impl CommandRunner for RecordingCommandRunner {
    fn execute(&self, command: &SystemCommand) -> CommandOutput {
        self.recorded.lock().unwrap().push(command.clone());
        let line = command.command_line();
        if self.failing.lock().unwrap().iter().any(|p| line.contains(p.as_str())) {
            return CommandOutput {
                stdout: String::new(),
                stderr: format!("{}: simulated failure", command.program),
                status: 1,
            };
        }
        CommandOutput::default()
    }
}
