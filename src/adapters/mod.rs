pub mod embedded_assets;
pub mod hdb_user_store;
pub mod local_file_store;
pub mod process_command;
pub mod system_probe;

pub use embedded_assets::{EmbeddedTemplates, embedded_catalog};
pub use hdb_user_store::HdbUserStore;
pub use local_file_store::LocalFileStore;
pub use process_command::ProcessCommandRunner;
pub use system_probe::{probe_hostname, probe_platform};
