use std::path::PathBuf;

use crate::app::commands::validate;
use crate::domain::{AppError, ApplyReport, ScenarioConfiguration};
use crate::ports::SystemContext;

const INSTALL_LOG: &str = "install.log";

#[derive(Debug, Clone)]
pub struct InstallOutcome {
    pub reports: Vec<ApplyReport>,
    /// Timestamped copy of the reports, when it could be written.
    pub log_file: Option<PathBuf>,
}

impl InstallOutcome {
    pub fn succeeded(&self) -> bool {
        self.reports.iter().all(ApplyReport::succeeded)
    }

    pub fn failure_count(&self) -> usize {
        self.reports.iter().map(|r| r.failures().count()).sum()
    }
}

/// Apply every applicable section in order for the configured role.
///
/// Nothing is changed on the node unless the whole configuration validates.
pub fn execute(
    config: &ScenarioConfiguration,
    ctx: &SystemContext<'_>,
) -> Result<InstallOutcome, AppError> {
    let validation = validate::execute(config, ctx);
    if !validation.can_install {
        return Err(AppError::Validation(validation.messages()));
    }

    let role = config.role;
    tracing::info!("Installing as {} on {}", role, config.local_hostname);

    let mut reports = Vec::new();
    for section in config.sections() {
        tracing::info!("Applying {}", section.id().title());
        let report = section.apply(role, config, ctx)?;
        if !report.succeeded() {
            tracing::warn!(
                "{} finished with {} failed step(s)",
                report.section,
                report.failures().count()
            );
        }
        reports.push(report);
    }

    let content: String = reports.iter().map(ToString::to_string).collect();
    let log_file = match ctx.files.write_var_file(INSTALL_LOG, &content, true) {
        Ok(path) => {
            tracing::info!("Install log written to {}", path.display());
            Some(path)
        }
        Err(err) => {
            tracing::warn!("Could not write install log: {}", err);
            None
        }
    };

    Ok(InstallOutcome { reports, log_file })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SectionId;
    use crate::testing::{TestServices, valid_hana_configuration};

    #[test]
    fn refuses_incomplete_configuration_without_side_effects() {
        let services = TestServices::new();
        let mut config = valid_hana_configuration();
        config.hana.virtual_ip = "999.1.1.1".into();

        let err = execute(&config, &services.ctx()).unwrap_err();
        match err {
            AppError::Validation(messages) => {
                assert!(messages.iter().all(|m| m.starts_with("HANA: ")));
                assert!(messages.iter().any(|m| m.contains("Virtual IP")));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(services.commands.recorded().is_empty());
        assert!(services.files.paths().is_empty());
    }

    #[test]
    fn applies_sections_in_order_and_writes_log() {
        let services = TestServices::new();
        let outcome = execute(&valid_hana_configuration(), &services.ctx()).unwrap();

        let titles: Vec<_> = outcome.reports.iter().map(|r| r.section.as_str()).collect();
        let expected: Vec<_> = SectionId::APPLY_ORDER.iter().map(|id| id.title()).collect();
        assert_eq!(titles, expected);
        assert!(outcome.succeeded());
        assert_eq!(outcome.failure_count(), 0);

        let log_file = outcome.log_file.unwrap();
        assert_eq!(log_file, PathBuf::from("/var/lib/hana-ha/install_20260101_120000.log"));
        let log = services.files.written("/var/lib/hana-ha/install_20260101_120000.log").unwrap();
        assert!(log.starts_with("Watchdog:\n"));
        assert!(log.contains("HANA:\n"));
    }

    #[test]
    fn failed_commands_are_reported_not_raised() {
        let services = TestServices::new();
        services.commands.fail_on("crm configure load update");

        let outcome = execute(&valid_hana_configuration(), &services.ctx()).unwrap();
        assert!(!outcome.succeeded());
        assert_eq!(outcome.failure_count(), 1);
        let hana = outcome.reports.last().unwrap();
        assert_eq!(hana.section, "HANA");
        assert!(!hana.succeeded());
        assert!(services.commands.ran("SAPHanaSR-manageProvider"));
    }
}
