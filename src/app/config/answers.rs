use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::domain::{
    AppError, ClusterNode, CommunicationLayer, Hana, NodeRole, Platform, ScenarioCatalog,
    ScenarioConfiguration, Stonith, Watchdog,
};

/// Node list and passwords as written in the answers file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClusterMembersAnswers {
    pub nodes: Vec<ClusterNode>,
    pub host_passwords: BTreeMap<String, String>,
}

/// Pre-filled answers for every wizard page.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Answers {
    pub product: String,
    pub scenario: Option<String>,
    /// Derived from the node order when absent.
    pub role: Option<NodeRole>,
    /// Probed from the DMI vendor when absent.
    pub platform: Option<Platform>,
    /// Probed with `hostname -s` when absent.
    pub local_hostname: Option<String>,
    pub cluster_members: Option<ClusterMembersAnswers>,
    pub communication_layer: Option<CommunicationLayer>,
    pub stonith: Option<Stonith>,
    pub watchdog: Option<Watchdog>,
    pub hana: Option<Hana>,
}

impl Answers {
    pub fn from_yaml(content: &str) -> Result<Self, AppError> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self, AppError> {
        let content = fs::read_to_string(path).map_err(|e| {
            AppError::config_error(format!("Could not read answers file {}: {}", path.display(), e))
        })?;
        Self::from_yaml(&content)
    }

    /// Build the configuration through the same setters the wizard uses.
    ///
    /// `probe_hostname` and `probe_platform` are only called for facts the file leaves
    /// out.
    pub fn into_configuration(
        self,
        catalog: ScenarioCatalog,
        probe_hostname: impl FnOnce() -> Result<String, AppError>,
        probe_platform: impl FnOnce() -> Platform,
    ) -> Result<ScenarioConfiguration, AppError> {
        let mut config = ScenarioConfiguration::new(catalog);
        config.set_product(&self.product)?;
        if let Some(scenario) = &self.scenario {
            config.set_scenario(scenario)?;
        }

        config.local_hostname = match self.local_hostname {
            Some(name) => name,
            None => probe_hostname()?,
        };
        config.platform = self.platform.unwrap_or_else(probe_platform);

        if let Some(answers) = self.cluster_members {
            let members = config.cluster_members.as_mut().ok_or_else(|| {
                AppError::config_error("cluster_members requires a scenario to be selected")
            })?;
            for (index, node) in answers.nodes.into_iter().enumerate() {
                members.update_node(index, node)?;
            }
            members.host_passwords = answers.host_passwords;
        }
        if let Some(layer) = self.communication_layer {
            let rings = layer.number_of_rings;
            config.communication_layer = layer;
            config.communication_layer.set_number_of_rings(rings);
        }
        if let Some(stonith) = self.stonith {
            config.stonith = stonith;
        }
        if let Some(watchdog) = self.watchdog {
            config.watchdog = watchdog;
        }
        if let Some(hana) = self.hana {
            config.hana = hana;
        }

        config.role = self.role.unwrap_or_else(|| config.role_from_cluster());
        tracing::info!(
            "Loaded configuration for {} as {} on {}",
            config.local_hostname,
            config.role,
            config.platform
        );
        Ok(config)
    }
}
