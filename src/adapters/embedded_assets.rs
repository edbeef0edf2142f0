use include_dir::{Dir, include_dir};
use minijinja::{Environment, ErrorKind, UndefinedBehavior};
use serde_json::Value;

use crate::domain::{AppError, ScenarioCatalog};
use crate::ports::TemplateRenderer;

static TEMPLATES_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/assets/templates");
static SCENARIOS_YAML: &str = include_str!("../assets/scenarios.yml");

/// Scenario catalog shipped with the tool.
pub fn embedded_catalog() -> ScenarioCatalog {
    ScenarioCatalog::from_yaml(SCENARIOS_YAML)
}

/// Renderer over the templates compiled into the binary.
///
/// The environment is built once; every `.j2` file is registered under its file name.
pub struct EmbeddedTemplates {
    env: Environment<'static>,
}

impl Default for EmbeddedTemplates {
    fn default() -> Self {
        Self::new()
    }
}

impl EmbeddedTemplates {
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_keep_trailing_newline(true);
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.set_undefined_behavior(UndefinedBehavior::Strict);

        for file in TEMPLATES_DIR.files() {
            let (Some(name), Some(source)) =
                (file.path().file_name().and_then(|n| n.to_str()), file.contents_utf8())
            else {
                continue;
            };
            if let Err(err) = env.add_template(name, source) {
                tracing::error!("Skipping invalid template {}: {}", name, err);
            }
        }
        Self { env }
    }

    /// Names of every registered template.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.env.templates().map(|(name, _)| name).collect();
        names.sort_unstable();
        names
    }
}

impl TemplateRenderer for EmbeddedTemplates {
    fn has_template(&self, name: &str) -> bool {
        self.env.get_template(name).is_ok()
    }

    fn render(&self, name: &str, context: &Value) -> Result<String, AppError> {
        let template = self.env.get_template(name).map_err(|e| match e.kind() {
            ErrorKind::TemplateNotFound => AppError::TemplateNotFound(name.to_string()),
            _ => AppError::TemplateRender { template: name.to_string(), reason: e.to_string() },
        })?;
        template
            .render(context)
            .map_err(|e| AppError::TemplateRender { template: name.to_string(), reason: e.to_string() })
    }
}
