use std::fmt::Write as _;

use serde_json::json;

use crate::domain::{AppError, ScenarioConfiguration};
use crate::ports::SystemContext;

const OVERVIEW_TEMPLATE: &str = "config_overview.j2";

/// Plain description of every applicable section.
pub fn execute(config: &ScenarioConfiguration) -> String {
    let mut text = String::new();
    for (id, description) in config.descriptions() {
        let _ = writeln!(text, "== {} ==", id.title());
        text.push_str(&description.to_string());
        text.push('\n');
    }
    text
}

/// Full overview including selection, node facts and outstanding problems.
pub fn overview(config: &ScenarioConfiguration, ctx: &SystemContext<'_>) -> Result<String, AppError> {
    let report = config.validation_report(ctx);
    let sections: Vec<_> = config
        .descriptions()
        .into_iter()
        .map(|(id, description)| {
            let messages = report
                .iter()
                .find(|r| r.section == id)
                .map(|r| r.messages.clone())
                .unwrap_or_default();
            json!({
                "title": id.title(),
                "entries": description.entries(),
                "messages": messages,
            })
        })
        .collect();

    let context = json!({
        "product": config.product_name().unwrap_or("(none)"),
        "scenario": config.scenario().map(|s| s.name.as_str()).unwrap_or("(none)"),
        "role": config.role.as_str(),
        "platform": config.platform.as_str(),
        "sections": sections,
    });
    ctx.templates.render(OVERVIEW_TEMPLATE, &context)
}
