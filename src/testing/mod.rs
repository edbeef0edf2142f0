pub mod domain;
pub mod ports;

pub use domain::{test_catalog, valid_hana_configuration};
pub use ports::{MemoryFileStore, RecordingCommandRunner, StaticSecureStore, TestServices};
