use std::fmt;

/// External command to execute on the local node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemCommand {
    pub program: String,
    pub args: Vec<String>,
    /// Account to run the command as (HANA admin commands run as `<sid>adm`).
    pub run_as: Option<String>,
    pub env: Vec<(String, String)>,
}

impl SystemCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self { program: program.into(), args: Vec::new(), run_as: None, env: Vec::new() }
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

    pub fn run_as(mut self, user: impl Into<String>) -> Self {
        self.run_as = Some(user.into());
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Command line without the account or environment.
    pub fn command_line(&self) -> String {
        let mut parts = vec![self.program.clone()];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }
}

impl fmt::Display for SystemCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.run_as {
            Some(user) => write!(f, "[{}] {}", user, self.command_line()),
            None => f.write_str(&self.command_line()),
        }
    }
}

/// Captured result of a finished command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub status: i32,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status == 0
    }

    /// Output to attach to a log entry: stderr if present, else stdout.
    pub fn details(&self) -> Option<String> {
        let stderr = self.stderr.trim();
        let stdout = self.stdout.trim();
        if !stderr.is_empty() {
            Some(stderr.to_string())
        } else if !stdout.is_empty() {
            Some(stdout.to_string())
        } else {
            None
        }
    }
}

/// Name of the HANA administration account for a SID.
pub fn sidadm(sid: &str) -> String {
    format!("{}adm", sid.to_ascii_lowercase())
}
