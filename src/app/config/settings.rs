use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::domain::AppError;

pub const DEFAULT_SETTINGS_FILE: &str = "/etc/hana-ha/settings.toml";
pub const DATA_DIR_ENV: &str = "HANA_HA_DATA_DIR";
pub const VAR_DIR_ENV: &str = "HANA_HA_VAR_DIR";

/// Tool settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Static data files shipped with the tool.
    pub data_dir: PathBuf,
    /// Generated artifacts and install logs.
    pub var_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self { data_dir: PathBuf::from("/usr/share/hana-ha"), var_dir: PathBuf::from("/var/lib/hana-ha") }
    }
}

/// Command line overrides, highest precedence.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub settings_file: Option<PathBuf>,
    pub data_dir: Option<PathBuf>,
    pub var_dir: Option<PathBuf>,
}

impl Settings {
    pub fn parse(content: &str) -> Result<Self, AppError> {
        Ok(toml::from_str(content)?)
    }

    /// Settings file, then environment, then command line flags.
    pub fn load(overrides: &SettingsOverrides) -> Result<Self, AppError> {
        Self::resolve(overrides, Path::new(DEFAULT_SETTINGS_FILE), |key| {
            std::env::var_os(key).filter(|v| !v.is_empty()).map(PathBuf::from)
        })
    }

    fn resolve(
        overrides: &SettingsOverrides,
        default_file: &Path,
        env: impl Fn(&str) -> Option<PathBuf>,
    ) -> Result<Self, AppError> {
        let mut settings = match &overrides.settings_file {
            Some(path) => {
                let content = fs::read_to_string(path).map_err(|e| {
                    AppError::config_error(format!(
                        "Could not read settings file {}: {}",
                        path.display(),
                        e
                    ))
                })?;
                Self::parse(&content)?
            }
            None => match fs::read_to_string(default_file) {
                Ok(content) => Self::parse(&content)?,
                Err(err) if err.kind() == io::ErrorKind::NotFound => Self::default(),
                Err(err) => return Err(err.into()),
            },
        };

        if let Some(dir) = env(DATA_DIR_ENV) {
            settings.data_dir = dir;
        }
        if let Some(dir) = env(VAR_DIR_ENV) {
            settings.var_dir = dir;
        }
        if let Some(dir) = &overrides.data_dir {
            settings.data_dir = dir.clone();
        }
        if let Some(dir) = &overrides.var_dir {
            settings.var_dir = dir.clone();
        }
        tracing::debug!(
            "Using data dir {} and var dir {}",
            settings.data_dir.display(),
            settings.var_dir.display()
        );
        Ok(settings)
    }
}
