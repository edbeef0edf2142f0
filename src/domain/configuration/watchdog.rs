use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::{AppError, CheckTransaction, Description, NodeRole, SystemCommand};
use crate::ports::SystemContext;

use super::{ApplySession, ConfigSection, ScenarioConfiguration, SectionId};

const MODULES_LOAD_CONF: &str = "/etc/modules-load.d/watchdog.conf";

/// Kernel watchdog modules to load on boot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Watchdog {
    pub modules: Vec<String>,
}

impl Default for Watchdog {
    fn default() -> Self {
        Self { modules: vec!["softdog".into()] }
    }
}

impl ConfigSection for Watchdog {
    fn id(&self) -> SectionId {
        SectionId::Watchdog
    }

    fn check(
        &self,
        _global: &ScenarioConfiguration,
        _ctx: &SystemContext<'_>,
        check: &mut CheckTransaction<'_>,
    ) {
        check.non_empty(&self.modules, Some("At least one watchdog module is required."), "Watchdog");
        for module in &self.modules {
            check.identifier(module, "Watchdog module");
        }
        check.unique(&self.modules, Some("Watchdog modules have to be unique."), "Watchdog");
    }

    fn description(&self) -> Description {
        let mut dsc = Description::new();
        dsc.parameter("Watchdog modules", self.modules.join(", "));
        dsc
    }

    fn apply_steps(
        &self,
        _role: NodeRole,
        _global: &ScenarioConfiguration,
        session: &mut ApplySession<'_>,
    ) -> Result<(), AppError> {
        let conf = session.render("watchdog.conf.j2", &json!({ "modules": self.modules }))?;
        session.write_file(
            Path::new(MODULES_LOAD_CONF),
            &conf,
            "Configured watchdog modules to load on boot",
            "Could not configure watchdog modules to load on boot",
        );
        for module in &self.modules {
            session.exec(
                SystemCommand::new("modprobe").arg(module),
                &format!("Loaded watchdog module {}", module),
                &format!("Could not load watchdog module {}", module),
            );
        }
        Ok(())
    }
}
