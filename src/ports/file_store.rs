use std::path::{Path, PathBuf};

use crate::domain::AppError;

/// Port for the files the engine reads and writes on the local node.
pub trait FileStore {
    /// Write a file at an absolute location, replacing existing content.
    fn write_file(&self, path: &Path, content: &str) -> Result<(), AppError>;

    /// Write a generated artifact into the variable-data directory.
    ///
    /// With `timestamp`, the basename gets a `_YYYYMMDD_HHMMSS` suffix before its
    /// extension. Returns the path written.
    fn write_var_file(
        &self,
        basename: &str,
        content: &str,
        timestamp: bool,
    ) -> Result<PathBuf, AppError>;

    /// Read a file; `Ok(None)` when it does not exist.
    fn read_file(&self, path: &Path) -> Result<Option<String>, AppError>;

    /// Location of a static data file shipped with the tool.
    fn data_file_path(&self, basename: &str) -> PathBuf;
}
