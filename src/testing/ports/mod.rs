mod memory_file_store;
mod recording_command_runner;
mod static_secure_store;

pub use memory_file_store::MemoryFileStore;
pub use recording_command_runner::RecordingCommandRunner;
pub use static_secure_store::StaticSecureStore;

use crate::adapters::EmbeddedTemplates;
use crate::domain::SemanticChecks;
use crate::ports::SystemContext;

/// Every test double a section needs, plus the real embedded templates.
pub struct TestServices {
    pub checks: SemanticChecks,
    pub commands: RecordingCommandRunner,
    pub files: MemoryFileStore,
    pub secure_store: StaticSecureStore,
    pub templates: EmbeddedTemplates,
}

impl TestServices {
    pub fn new() -> Self {
        Self::with_secure_store_keys(&["backupkey", "SYSTEM"])
    }

    pub fn with_secure_store_keys(keys: &[&str]) -> Self {
        Self {
            checks: SemanticChecks::new(),
            commands: RecordingCommandRunner::new(),
            files: MemoryFileStore::new(),
            secure_store: StaticSecureStore::new(keys),
            templates: EmbeddedTemplates::new(),
        }
    }

    pub fn ctx(&self) -> SystemContext<'_> {
        SystemContext {
            checks: &self.checks,
            secure_store: &self.secure_store,
            commands: &self.commands,
            templates: &self.templates,
            files: &self.files,
        }
    }
}
