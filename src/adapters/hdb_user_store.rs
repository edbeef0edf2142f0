use crate::domain::{SystemCommand, sidadm};
use crate::ports::{CommandRunner, SecureStore};

/// HANA secure user store queried through `hdbuserstore`.
pub struct HdbUserStore<R> {
    runner: R,
}

impl<R: CommandRunner> HdbUserStore<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }
}

impl<R: CommandRunner> SecureStore for HdbUserStore<R> {
    fn keys(&self, sid: &str) -> Vec<String> {
        if sid.is_empty() {
            return Vec::new();
        }
        let command = SystemCommand::new("hdbuserstore").arg("list").run_as(sidadm(sid));
        let output = self.runner.execute(&command);
        if !output.success() {
            tracing::warn!(
                "Could not list secure store keys for {}: {}",
                sid,
                output.details().unwrap_or_default()
            );
            return Vec::new();
        }
        parse_key_list(&output.stdout)
    }
}

/// Key names from `hdbuserstore list` output.
fn parse_key_list(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .filter_map(|line| line.strip_prefix("KEY "))
        .filter(|rest| !rest.contains(':'))
        .map(|rest| rest.trim().to_string())
        .filter(|key| !key.is_empty())
        .collect()
}
