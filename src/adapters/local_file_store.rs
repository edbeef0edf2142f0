use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::domain::AppError;
use crate::ports::FileStore;

/// File store backed by the local file system.
#[derive(Debug, Clone)]
pub struct LocalFileStore {
    data_dir: PathBuf,
    var_dir: PathBuf,
}

impl LocalFileStore {
    pub fn new(data_dir: impl Into<PathBuf>, var_dir: impl Into<PathBuf>) -> Self {
        Self { data_dir: data_dir.into(), var_dir: var_dir.into() }
    }

    pub fn var_dir(&self) -> &Path {
        &self.var_dir
    }
}

/// `name.ext` becomes `name_<stamp>.ext`.
fn timestamped(basename: &str, stamp: &str) -> String {
    match basename.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{}_{}.{}", stem, stamp, ext),
        _ => format!("{}_{}", basename, stamp),
    }
}

impl FileStore for LocalFileStore {
    fn write_file(&self, path: &Path, content: &str) -> Result<(), AppError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        tracing::debug!("Wrote {}", path.display());
        Ok(())
    }

    fn write_var_file(
        &self,
        basename: &str,
        content: &str,
        timestamp: bool,
    ) -> Result<PathBuf, AppError> {
        let name = if timestamp {
            timestamped(basename, &Local::now().format("%Y%m%d_%H%M%S").to_string())
        } else {
            basename.to_string()
        };
        let path = self.var_dir.join(name);
        self.write_file(&path, content)?;
        Ok(path)
    }

    fn read_file(&self, path: &Path) -> Result<Option<String>, AppError> {
        match fs::read_to_string(path) {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn data_file_path(&self, basename: &str) -> PathBuf {
        self.data_dir.join(basename)
    }
}
