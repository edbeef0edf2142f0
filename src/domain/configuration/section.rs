use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Serialize;
use serde_json::Value;

use crate::domain::{
    AppError, ApplyLog, ApplyReport, CheckTransaction, Description, NodeRole, SystemCommand,
    Validation, Verbosity,
};
use crate::ports::SystemContext;

use super::ScenarioConfiguration;

/// Tag for the closed set of configuration sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionId {
    Watchdog,
    Stonith,
    CommunicationLayer,
    ClusterMembers,
    Hana,
}

impl SectionId {
    /// Every section in the order it is applied.
    pub const APPLY_ORDER: [SectionId; 5] = [
        SectionId::Watchdog,
        SectionId::Stonith,
        SectionId::CommunicationLayer,
        SectionId::ClusterMembers,
        SectionId::Hana,
    ];

    pub fn key(self) -> &'static str {
        match self {
            SectionId::Watchdog => "watchdog",
            SectionId::Stonith => "stonith",
            SectionId::CommunicationLayer => "communication_layer",
            SectionId::ClusterMembers => "cluster_members",
            SectionId::Hana => "hana",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            SectionId::Watchdog => "Watchdog",
            SectionId::Stonith => "Fencing",
            SectionId::CommunicationLayer => "Communication Layer",
            SectionId::ClusterMembers => "Cluster Members",
            SectionId::Hana => "HANA",
        }
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for SectionId {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SectionId::APPLY_ORDER
            .into_iter()
            .find(|id| id.key() == s || id.key().replace('_', "-") == s)
            .ok_or_else(|| AppError::config_error(format!("Unknown section '{}'", s)))
    }
}

/// Capability shared by every configuration section.
///
/// Sections never mutate the root: `global` is a read-only view used to cross-check
/// peer sections (node role, cluster peers, communication rings).
pub trait ConfigSection {
    fn id(&self) -> SectionId;

    /// Issue this section's checks into `check`.
    fn check(
        &self,
        global: &ScenarioConfiguration,
        ctx: &SystemContext<'_>,
        check: &mut CheckTransaction<'_>,
    );

    fn validate(
        &self,
        global: &ScenarioConfiguration,
        ctx: &SystemContext<'_>,
        verbosity: Verbosity,
    ) -> Validation {
        let mut tx = ctx.checks.transaction();
        self.check(global, ctx, &mut tx);
        tx.finish(verbosity)
    }

    fn configured(&self, global: &ScenarioConfiguration, ctx: &SystemContext<'_>) -> bool {
        self.validate(global, ctx, Verbosity::Silent).is_valid()
    }

    fn description(&self) -> Description;

    /// Perform the section's changes for `role`.
    ///
    /// Refuses with [`AppError::NotConfigured`] unless the section validates. Failed
    /// commands are recorded in the report and do not stop later steps; template
    /// failures abort with an error.
    fn apply(
        &self,
        role: NodeRole,
        global: &ScenarioConfiguration,
        ctx: &SystemContext<'_>,
    ) -> Result<ApplyReport, AppError> {
        if !self.configured(global, ctx) {
            tracing::warn!("Refusing to apply unconfigured section {}", self.id());
            return Err(AppError::NotConfigured { section: self.id().title().to_string() });
        }
        let mut session = ApplySession::new(*ctx);
        self.apply_steps(role, global, &mut session)?;
        Ok(ApplyReport::new(self.id().title(), session.into_log()))
    }

    /// Section-specific apply sequence; called only for configured sections.
    fn apply_steps(
        &self,
        role: NodeRole,
        global: &ScenarioConfiguration,
        session: &mut ApplySession<'_>,
    ) -> Result<(), AppError>;
}

/// Services plus the running log of one section's apply.
pub struct ApplySession<'a> {
    ctx: SystemContext<'a>,
    log: ApplyLog,
}

impl<'a> ApplySession<'a> {
    pub fn new(ctx: SystemContext<'a>) -> Self {
        Self { ctx, log: ApplyLog::new() }
    }

    pub fn ctx(&self) -> &SystemContext<'a> {
        &self.ctx
    }

    pub fn log(&mut self) -> &mut ApplyLog {
        &mut self.log
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.log.info(message);
    }

    /// Run a command and record its outcome.
    pub fn exec(&mut self, command: SystemCommand, success: &str, failure: &str) -> bool {
        tracing::debug!("Executing {}", command);
        let output = self.ctx.commands.execute(&command);
        let details = if output.success() { None } else { output.details() };
        self.log.status(output.success(), success, failure, details)
    }

    pub fn has_template(&self, name: &str) -> bool {
        self.ctx.templates.has_template(name)
    }

    pub fn render(&self, name: &str, context: &Value) -> Result<String, AppError> {
        self.ctx.templates.render(name, context)
    }

    /// Write a file and record the outcome.
    pub fn write_file(&mut self, path: &Path, content: &str, success: &str, failure: &str) -> bool {
        let result = self.ctx.files.write_file(path, content);
        let details = result.as_ref().err().map(ToString::to_string);
        self.log.status(result.is_ok(), success, failure, details)
    }

    /// Write an artifact into the variable-data directory; failures are recorded and
    /// yield `None`.
    pub fn write_var_file(&mut self, basename: &str, content: &str) -> Option<PathBuf> {
        match self.ctx.files.write_var_file(basename, content, false) {
            Ok(path) => Some(path),
            Err(err) => {
                self.log.status(
                    false,
                    "",
                    &format!("Could not write {}", basename),
                    Some(err.to_string()),
                );
                None
            }
        }
    }

    pub fn into_log(self) -> ApplyLog {
        self.log
    }
}
