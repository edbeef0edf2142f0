//! API Facade for the application.
//!
//! This module exposes high-level functions that glue together context creation
//! and command execution.

use std::path::Path;

use crate::adapters::{HdbUserStore, LocalFileStore, ProcessCommandRunner, embedded_catalog};
use crate::app::AppContext;
use crate::app::commands;
use crate::app::config::{Answers, Settings};
use crate::domain::ScenarioConfiguration;

pub use crate::app::commands::install::InstallOutcome;
pub use crate::app::commands::products::{ProductSummary, ScenarioSummary};
pub use crate::app::commands::validate::ValidateOutcome;
pub use crate::domain::AppError;

type NodeContext = AppContext<ProcessCommandRunner, HdbUserStore<ProcessCommandRunner>, LocalFileStore>;

/// Create an `AppContext` wired to the local node.
fn create_context(settings: &Settings) -> NodeContext {
    let files = LocalFileStore::new(&settings.data_dir, &settings.var_dir);
    let secure_store = HdbUserStore::new(ProcessCommandRunner::new());
    AppContext::new(ProcessCommandRunner::new(), secure_store, files)
}

fn load(ctx: &NodeContext, answers: &Path) -> Result<ScenarioConfiguration, AppError> {
    let answers = Answers::load(answers)?;
    commands::load_configuration(ctx, answers)
}

/// Products and scenarios offered by the embedded catalog.
pub fn products() -> Vec<ProductSummary> {
    commands::products::execute(&embedded_catalog())
}

/// Validate the configuration described by an answers file.
pub fn validate(answers: &Path, settings: &Settings) -> Result<ValidateOutcome, AppError> {
    let ctx = create_context(settings);
    let config = load(&ctx, answers)?;
    Ok(commands::validate::execute(&config, &ctx.system()))
}

/// Describe the configuration described by an answers file.
pub fn describe(answers: &Path, settings: &Settings, overview: bool) -> Result<String, AppError> {
    let ctx = create_context(settings);
    let config = load(&ctx, answers)?;
    if overview {
        commands::describe::overview(&config, &ctx.system())
    } else {
        Ok(commands::describe::execute(&config))
    }
}

/// Apply the configuration described by an answers file to this node.
pub fn install(answers: &Path, settings: &Settings) -> Result<InstallOutcome, AppError> {
    let ctx = create_context(settings);
    let config = load(&ctx, answers)?;
    commands::install::execute(&config, &ctx.system())
}
