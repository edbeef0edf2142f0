//! Apply command implementation.

use std::path::Path;

use dialoguer::Confirm;

use crate::app::config::Settings;
use crate::domain::AppError;

/// Exit code 1 when any step failed.
pub fn run_apply(answers: &Path, settings: &Settings, yes: bool) -> Result<i32, AppError> {
    if !yes && !confirm(answers)? {
        println!("ℹ️ Nothing was changed");
        return Ok(0);
    }

    let outcome = crate::app::api::install(answers, settings)?;
    for report in &outcome.reports {
        print!("{}", report);
    }
    if let Some(path) = &outcome.log_file {
        println!("ℹ️ Install log: {}", path.display());
    }

    if outcome.succeeded() {
        println!("✅ Cluster node configured");
        Ok(0)
    } else {
        println!("⚠️ {} step(s) failed", outcome.failure_count());
        Ok(1)
    }
}

fn confirm(answers: &Path) -> Result<bool, AppError> {
    Confirm::new()
        .with_prompt(format!("Configure this node from {}?", answers.display()))
        .default(false)
        .interact()
        .map_err(|err| AppError::config_error(format!("Failed to read confirmation: {}", err)))
}
