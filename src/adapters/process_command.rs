use std::process::Command;

use crate::domain::{CommandOutput, SystemCommand};
use crate::ports::CommandRunner;

/// Exit status reported when a command cannot be started.
const SPAWN_FAILURE_STATUS: i32 = 127;

/// Runs commands as local processes.
#[derive(Debug, Clone, Default)]
pub struct ProcessCommandRunner;

impl ProcessCommandRunner {
    pub fn new() -> Self {
        Self
    }

    fn build(command: &SystemCommand) -> Command {
        let mut process = match &command.run_as {
            Some(user) => {
                let mut su = Command::new("su");
                su.arg("-").arg(user).arg("-c").arg(shell_line(command));
                su
            }
            None => {
                let mut process = Command::new(&command.program);
                process.args(&command.args);
                process
            }
        };
        process.envs(command.env.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        process
    }
}

impl CommandRunner for ProcessCommandRunner {
    fn execute(&self, command: &SystemCommand) -> CommandOutput {
        match Self::build(command).output() {
            Ok(output) => CommandOutput {
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                status: output.status.code().unwrap_or(-1),
            },
            Err(err) => {
                tracing::error!("Could not start {}: {}", command.program, err);
                CommandOutput {
                    stdout: String::new(),
                    stderr: err.to_string(),
                    status: SPAWN_FAILURE_STATUS,
                }
            }
        }
    }
}

/// Command line for a login shell, with every word quoted as needed.
fn shell_line(command: &SystemCommand) -> String {
    std::iter::once(&command.program)
        .chain(command.args.iter())
        .map(|word| shell_quote(word))
        .collect::<Vec<_>>()
        .join(" ")
}

fn shell_quote(word: &str) -> String {
    let plain = !word.is_empty()
        && word.chars().all(|c| c.is_ascii_alphanumeric() || "-_./=:@%+,".contains(c));
    if plain { word.to_string() } else { format!("'{}'", word.replace('\'', r"'\''")) }
}
