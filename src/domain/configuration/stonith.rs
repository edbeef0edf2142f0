use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::{AppError, CheckTransaction, Description, NodeRole, SystemCommand};
use crate::ports::SystemContext;

use super::{ApplySession, ConfigSection, ScenarioConfiguration, SectionId};

const SBD_SYSCONFIG: &str = "/etc/sysconfig/sbd";
const DELAYED_START_VALUES: &[&str] = &["no", "yes"];

/// SBD-based fencing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Stonith {
    /// Shared block devices used by SBD.
    pub devices: Vec<String>,
    pub sbd_options: String,
    pub sbd_delayed_start: String,
}

impl Default for Stonith {
    fn default() -> Self {
        Self { devices: Vec::new(), sbd_options: "-W".into(), sbd_delayed_start: "no".into() }
    }
}

impl ConfigSection for Stonith {
    fn id(&self) -> SectionId {
        SectionId::Stonith
    }

    fn check(
        &self,
        _global: &ScenarioConfiguration,
        _ctx: &SystemContext<'_>,
        check: &mut CheckTransaction<'_>,
    ) {
        check.non_empty(&self.devices, Some("At least one SBD device is required."), "SBD devices");
        check.unique(&self.devices, Some("SBD devices have to be unique."), "SBD devices");
        for device in &self.devices {
            if !device.starts_with('/') {
                check.fail(
                    "SBD device",
                    format!("'{}' is not an absolute device path.", device),
                );
            }
        }
        check.element_in_set(
            &self.sbd_delayed_start.as_str(),
            DELAYED_START_VALUES,
            None,
            "SBD delayed start",
        );
    }

    fn description(&self) -> Description {
        let mut dsc = Description::new();
        dsc.parameter("SBD devices", self.devices.join(", "))
            .parameter("SBD options", &self.sbd_options)
            .parameter("SBD delayed start", &self.sbd_delayed_start);
        dsc
    }

    fn apply_steps(
        &self,
        role: NodeRole,
        _global: &ScenarioConfiguration,
        session: &mut ApplySession<'_>,
    ) -> Result<(), AppError> {
        let context = json!({
            "devices": self.devices.join(";"),
            "sbd_options": self.sbd_options,
            "sbd_delayed_start": self.sbd_delayed_start,
        });
        let sysconfig = session.render("sbd.sysconfig.j2", &context)?;
        session.write_file(
            Path::new(SBD_SYSCONFIG),
            &sysconfig,
            "Wrote the SBD configuration",
            "Could not write the SBD configuration",
        );

        if role.is_master() {
            for device in &self.devices {
                session.exec(
                    SystemCommand::new("sbd").args(["-d", device.as_str(), "create"]),
                    &format!("Initialized SBD device {}", device),
                    &format!("Could not initialize SBD device {}", device),
                );
            }
        }
        session.exec(
            SystemCommand::new("systemctl").args(["enable", "sbd"]),
            "Enabled the SBD service",
            "Could not enable the SBD service",
        );
        Ok(())
    }
}
