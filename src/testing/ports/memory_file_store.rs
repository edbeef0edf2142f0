use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::domain::AppError;
use crate::ports::FileStore;

const VAR_DIR: &str = "/var/lib/hana-ha";
const DATA_DIR: &str = "/usr/share/hana-ha";
const FIXED_TIMESTAMP: &str = "20260101_120000";

/// In-memory file system keyed by absolute path.
#[derive(Default)]
pub struct MemoryFileStore {
    files: Mutex<BTreeMap<PathBuf, String>>,
}

impl MemoryFileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a file before the code under test reads it.
    pub fn seed(&self, path: &str, content: &str) {
        self.files.lock().unwrap().insert(PathBuf::from(path), content.to_string());
    }

    /// Current content of `path`, if any.
    pub fn written(&self, path: &str) -> Option<String> {
        self.files.lock().unwrap().get(Path::new(path)).cloned()
    }

    pub fn paths(&self) -> Vec<PathBuf> {
        self.files.lock().unwrap().keys().cloned().collect()
    }
}

impl FileStore for MemoryFileStore {
    fn write_file(&self, path: &Path, content: &str) -> Result<(), AppError> {
        self.files.lock().unwrap().insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn write_var_file(
        &self,
        basename: &str,
        content: &str,
        timestamp: bool,
    ) -> Result<PathBuf, AppError> {
        let name = match (timestamp, basename.rsplit_once('.')) {
            (false, _) => basename.to_string(),
            (true, Some((stem, ext))) => format!("{}_{}.{}", stem, FIXED_TIMESTAMP, ext),
            (true, None) => format!("{}_{}", basename, FIXED_TIMESTAMP),
        };
        let path = Path::new(VAR_DIR).join(name);
        self.write_file(&path, content)?;
        Ok(path)
    }

    fn read_file(&self, path: &Path) -> Result<Option<String>, AppError> {
        Ok(self.files.lock().unwrap().get(path).cloned())
    }

    fn data_file_path(&self, basename: &str) -> PathBuf {
        Path::new(DATA_DIR).join(basename)
    }
}
