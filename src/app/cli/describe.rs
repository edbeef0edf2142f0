//! Describe command implementation.

use std::path::Path;

use crate::app::config::Settings;
use crate::domain::AppError;

pub fn run_describe(answers: &Path, settings: &Settings, overview: bool) -> Result<(), AppError> {
    let text = crate::app::api::describe(answers, settings, overview)?;
    print!("{}", text);
    Ok(())
}
