use std::io;

use thiserror::Error;

/// Library-wide error type for hana-ha operations.
#[derive(Debug, Error)]
pub enum AppError {
    /// Underlying I/O failure.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Configuration or environment issue.
    #[error("{0}")]
    Configuration(String),

    /// Product id is not part of the scenario catalog.
    #[error("Could not find product with ID '{0}'")]
    ProductNotFound(String),

    /// Scenario name is not offered by the selected product.
    #[error("Scenario '{scenario}' not found for product '{product}'")]
    ScenarioNotFound { scenario: String, product: String },

    /// A scenario was selected before any product.
    #[error("No product selected. Select a product before choosing a scenario.")]
    ProductNotSelected,

    /// Template is not registered with the renderer.
    #[error("Template '{0}' not found")]
    TemplateNotFound(String),

    /// Template rendering failed.
    #[error("Error rendering template '{template}': {reason}")]
    TemplateRender { template: String, reason: String },

    /// Apply was requested for a section that does not validate.
    #[error("Section '{section}' is not configured; refusing to apply it")]
    NotConfigured { section: String },

    /// Configuration does not pass validation.
    #[error("Configuration is not valid:\n{}", .0.join("\n"))]
    Validation(Vec<String>),

    /// Node role string could not be parsed.
    #[error("Invalid node role '{0}': must be one of master, primary, secondary")]
    InvalidRole(String),

    /// Platform string could not be parsed.
    #[error("Invalid platform '{0}': must be one of bare-metal, azure, aws, gcp")]
    InvalidPlatform(String),

    /// YAML parsing error.
    #[error("YAML parse error: {0}")]
    YamlParseError(#[from] serde_yaml::Error),

    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    TomlParseError(#[from] toml::de::Error),
}

impl AppError {
    pub fn config_error<S: Into<String>>(message: S) -> Self {
        AppError::Configuration(message.into())
    }

    /// Provide an `io::ErrorKind`-like view for callers expecting legacy behavior.
    pub fn kind(&self) -> io::ErrorKind {
        match self {
            AppError::Io(err) => err.kind(),
            AppError::Configuration(_)
            | AppError::Validation(_)
            | AppError::InvalidRole(_)
            | AppError::InvalidPlatform(_)
            | AppError::YamlParseError(_)
            | AppError::TomlParseError(_)
            | AppError::TemplateRender { .. } => io::ErrorKind::InvalidInput,
            AppError::ProductNotFound(_)
            | AppError::ScenarioNotFound { .. }
            | AppError::TemplateNotFound(_) => io::ErrorKind::NotFound,
            AppError::ProductNotSelected | AppError::NotConfigured { .. } => {
                io::ErrorKind::Other
            }
        }
    }
}
