use crate::domain::{ScenarioConfiguration, SectionValidation};
use crate::ports::SystemContext;

#[derive(Debug, Clone)]
pub struct ValidateOutcome {
    pub sections: Vec<SectionValidation>,
    pub can_install: bool,
}

impl ValidateOutcome {
    /// Every problem, prefixed with its section title.
    pub fn messages(&self) -> Vec<String> {
        self.sections
            .iter()
            .flat_map(|report| {
                report.messages.iter().map(move |m| format!("{}: {}", report.section.title(), m))
            })
            .collect()
    }
}

pub fn execute(config: &ScenarioConfiguration, ctx: &SystemContext<'_>) -> ValidateOutcome {
    let sections = config.validation_report(ctx);
    let can_install = config.can_install(ctx);
    if !can_install {
        tracing::warn!("Configuration is not complete; {} problem(s) found", count(&sections));
    }
    ValidateOutcome { sections, can_install }
}

fn count(sections: &[SectionValidation]) -> usize {
    sections.iter().map(|s| s.messages.len()).sum()
}
