use crate::adapters::EmbeddedTemplates;
use crate::domain::SemanticChecks;
use crate::ports::{CommandRunner, FileStore, SecureStore, SystemContext};

/// Application context holding dependencies for command execution.
pub struct AppContext<C, S, F> {
    checks: SemanticChecks,
    commands: C,
    secure_store: S,
    templates: EmbeddedTemplates,
    files: F,
}

impl<C: CommandRunner, S: SecureStore, F: FileStore> AppContext<C, S, F> {
    /// Create a new application context with the embedded templates.
    pub fn new(commands: C, secure_store: S, files: F) -> Self {
        Self {
            checks: SemanticChecks::new(),
            commands,
            secure_store,
            templates: EmbeddedTemplates::new(),
            files,
        }
    }

    pub fn commands(&self) -> &C {
        &self.commands
    }

    pub fn files(&self) -> &F {
        &self.files
    }

    pub fn templates(&self) -> &EmbeddedTemplates {
        &self.templates
    }

    /// Borrowed services for validating and applying sections.
    pub fn system(&self) -> SystemContext<'_> {
        SystemContext {
            checks: &self.checks,
            secure_store: &self.secure_store,
            commands: &self.commands,
            templates: &self.templates,
            files: &self.files,
        }
    }
}
