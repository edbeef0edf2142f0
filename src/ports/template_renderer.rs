use serde_json::Value;

use crate::domain::AppError;

/// Port for rendering named templates.
pub trait TemplateRenderer {
    /// Whether a template with this name is available.
    fn has_template(&self, name: &str) -> bool;

    /// Render the named template with the given context.
    ///
    /// Fails with [`AppError::TemplateNotFound`] or [`AppError::TemplateRender`].
    fn render(&self, name: &str, context: &Value) -> Result<String, AppError>;
}
