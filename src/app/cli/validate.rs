//! Validate command implementation.

use std::path::Path;

use crate::app::config::Settings;
use crate::domain::AppError;

/// Exit code 1 when the configuration cannot be installed.
pub fn run_validate(answers: &Path, settings: &Settings) -> Result<i32, AppError> {
    let outcome = crate::app::api::validate(answers, settings)?;

    for section in &outcome.sections {
        if section.is_valid() {
            println!("✅ {}", section.section.title());
        } else {
            println!("❌ {}", section.section.title());
            for message in &section.messages {
                println!("   {}", message);
            }
        }
    }

    if outcome.can_install {
        println!("Configuration is ready to install.");
        Ok(0)
    } else {
        println!("Configuration is not complete.");
        Ok(1)
    }
}
