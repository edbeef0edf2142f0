//! Ports for the external collaborators of the configuration engine.

mod command_runner;
mod file_store;
mod secure_store;
mod template_renderer;

pub use command_runner::CommandRunner;
pub use file_store::FileStore;
pub use secure_store::SecureStore;
pub use template_renderer::TemplateRenderer;

use crate::domain::SemanticChecks;

/// Borrowed view of every service a section needs to validate or apply itself.
#[derive(Clone, Copy)]
pub struct SystemContext<'a> {
    pub checks: &'a SemanticChecks,
    pub secure_store: &'a dyn SecureStore,
    pub commands: &'a dyn CommandRunner,
    pub templates: &'a dyn TemplateRenderer,
    pub files: &'a dyn FileStore,
}
