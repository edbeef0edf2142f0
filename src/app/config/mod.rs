//! Tool settings and answers file loading.

mod answers;
mod settings;

pub use answers::{Answers, ClusterMembersAnswers};
pub use settings::{DATA_DIR_ENV, DEFAULT_SETTINGS_FILE, Settings, SettingsOverrides, VAR_DIR_ENV};
