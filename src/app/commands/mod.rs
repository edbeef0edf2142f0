pub mod describe;
pub mod install;
pub mod products;
pub mod validate;

use crate::adapters::{embedded_catalog, probe_hostname, probe_platform};
use crate::app::AppContext;
use crate::app::config::Answers;
use crate::domain::{AppError, ScenarioConfiguration};
use crate::ports::{CommandRunner, FileStore, SecureStore};

/// Build the configuration described by `answers`, probing the host for missing facts.
pub fn load_configuration<C, S, F>(
    ctx: &AppContext<C, S, F>,
    answers: Answers,
) -> Result<ScenarioConfiguration, AppError>
where
    C: CommandRunner,
    S: SecureStore,
    F: FileStore,
{
    answers.into_configuration(
        embedded_catalog(),
        || probe_hostname(ctx.commands()),
        probe_platform,
    )
}
