use std::fmt;

use serde::Serialize;

/// Outcome of one external operation performed while applying a section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepOutcome {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Per-section log of apply steps.
///
/// Every entry is also emitted as a tracing event so that the node's log carries the
/// same success/failure trail as the returned report.
#[derive(Debug, Clone, Default)]
pub struct ApplyLog {
    steps: Vec<StepOutcome>,
}

impl ApplyLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Informational, always successful entry.
    pub fn info(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::info!("{}", message);
        self.steps.push(StepOutcome { success: true, message, details: None });
    }

    /// Record the outcome of an operation with its success and failure messages.
    pub fn status(
        &mut self,
        success: bool,
        success_message: &str,
        failure_message: &str,
        details: Option<String>,
    ) -> bool {
        let message = if success { success_message } else { failure_message };
        match (&details, success) {
            (_, true) => tracing::info!("{}", message),
            (Some(details), false) => tracing::error!("{}: {}", message, details),
            (None, false) => tracing::error!("{}", message),
        }
        self.steps.push(StepOutcome { success, message: message.to_string(), details });
        success
    }

    pub fn steps(&self) -> &[StepOutcome] {
        &self.steps
    }

    pub fn into_steps(self) -> Vec<StepOutcome> {
        self.steps
    }
}

/// Result of applying one section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplyReport {
    pub section: String,
    pub steps: Vec<StepOutcome>,
}

impl ApplyReport {
    pub fn new(section: impl Into<String>, log: ApplyLog) -> Self {
        Self { section: section.into(), steps: log.into_steps() }
    }

    /// True iff no step failed.
    pub fn succeeded(&self) -> bool {
        self.steps.iter().all(|s| s.success)
    }

    pub fn failures(&self) -> impl Iterator<Item = &StepOutcome> {
        self.steps.iter().filter(|s| !s.success)
    }
}

impl fmt::Display for ApplyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}:", self.section)?;
        for step in &self.steps {
            let mark = if step.success { "ok" } else { "FAILED" };
            writeln!(f, "  [{}] {}", mark, step.message)?;
            if let Some(details) = &step.details {
                if !step.success {
                    writeln!(f, "         {}", details)?;
                }
            }
        }
        Ok(())
    }
}
