//! Scenario configuration: the root aggregate and its sections.

pub mod cluster_members;
pub mod communication_layer;
pub mod hana;
pub mod section;
pub mod stonith;
pub mod watchdog;

use std::fmt::Write as _;

pub use cluster_members::{ClusterMembers, ClusterNode, Peer};
pub use communication_layer::{CommunicationLayer, FIREWALL_CONFIGS, Ring, TransportMode};
pub use hana::{
    HANA_FW_SERVICES, HANA_OPERATION_MODES, HANA_REPLICATION_MODES, Hana, ProductionConstraints,
    TypedConstraints,
};
pub use section::{ApplySession, ConfigSection, SectionId};
pub use stonith::Stonith;
pub use watchdog::Watchdog;

use crate::domain::{AppError, Description, NodeRole, Platform, Product, Scenario, ScenarioCatalog, Verbosity};
use crate::ports::SystemContext;

/// Validation messages of one section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionValidation {
    pub section: SectionId,
    pub messages: Vec<String>,
}

impl SectionValidation {
    pub fn is_valid(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Root aggregate: product and scenario selection plus every section.
#[derive(Debug, Clone)]
pub struct ScenarioConfiguration {
    catalog: ScenarioCatalog,
    product: Option<Product>,
    scenario: Option<Scenario>,
    pub role: NodeRole,
    pub platform: Platform,
    pub local_hostname: String,
    /// Present once a scenario is selected.
    pub cluster_members: Option<ClusterMembers>,
    pub communication_layer: CommunicationLayer,
    pub stonith: Stonith,
    pub watchdog: Watchdog,
    pub hana: Hana,
}

impl ScenarioConfiguration {
    pub fn new(catalog: ScenarioCatalog) -> Self {
        Self {
            catalog,
            product: None,
            scenario: None,
            role: NodeRole::default(),
            platform: Platform::default(),
            local_hostname: String::new(),
            cluster_members: None,
            communication_layer: CommunicationLayer::default(),
            stonith: Stonith::default(),
            watchdog: Watchdog::default(),
            hana: Hana::default(),
        }
    }

    pub fn catalog(&self) -> &ScenarioCatalog {
        &self.catalog
    }

    pub fn product(&self) -> Option<&Product> {
        self.product.as_ref()
    }

    pub fn product_id(&self) -> Option<&str> {
        self.product.as_ref().map(|p| p.id.as_str())
    }

    pub fn product_name(&self) -> Option<&str> {
        self.product.as_ref().map(|p| p.name.as_str())
    }

    pub fn scenario(&self) -> Option<&Scenario> {
        self.scenario.as_ref()
    }

    /// Select the product by id. An unknown id leaves the selection unchanged.
    pub fn set_product(&mut self, id: &str) -> Result<(), AppError> {
        let product = self
            .catalog
            .product(id)
            .cloned()
            .ok_or_else(|| AppError::ProductNotFound(id.to_string()))?;
        tracing::info!("Selected product {} ({})", product.id, product.name);
        self.product = Some(product);
        Ok(())
    }

    /// Select a scenario of the current product.
    ///
    /// Recreates the cluster membership sized to the scenario, discarding any earlier
    /// node edits.
    pub fn set_scenario(&mut self, name: &str) -> Result<(), AppError> {
        let product = self.product.as_ref().ok_or(AppError::ProductNotSelected)?;
        let scenario = product.scenario(name).cloned().ok_or_else(|| AppError::ScenarioNotFound {
            scenario: name.to_string(),
            product: product.id.clone(),
        })?;
        tracing::info!(
            "Selected scenario '{}' with {} nodes",
            scenario.name,
            scenario.number_of_nodes
        );
        self.cluster_members = Some(ClusterMembers::new(scenario.number_of_nodes));
        self.scenario = Some(scenario);
        Ok(())
    }

    /// Scenarios of the selected product.
    pub fn all_scenarios(&self) -> &[Scenario] {
        self.product.as_ref().map(|p| p.scenarios.as_slice()).unwrap_or(&[])
    }

    /// One paragraph per scenario of the selected product.
    pub fn scenarios_help(&self) -> String {
        let mut help = String::new();
        for scenario in self.all_scenarios() {
            let _ = writeln!(help, "{} ({} nodes)", scenario.name, scenario.number_of_nodes);
            if !scenario.description.is_empty() {
                let _ = writeln!(help, "  {}", scenario.description.trim());
            }
        }
        help
    }

    pub fn hana_required(&self) -> bool {
        self.product.as_ref().is_some_and(Product::requires_hana)
    }

    /// Other cluster nodes as seen from the local host.
    pub fn peers(&self) -> Vec<Peer> {
        self.cluster_members
            .as_ref()
            .map(|m| m.peers(&self.local_hostname))
            .unwrap_or_default()
    }

    /// Role implied by the cluster model: the first configured node is the master.
    pub fn role_from_cluster(&self) -> NodeRole {
        let first = self.cluster_members.as_ref().and_then(|m| m.nodes.first());
        match first {
            Some(node) if node.host_name != self.local_hostname => NodeRole::Secondary,
            _ => NodeRole::Master,
        }
    }

    /// Applicable sections in the order they are applied.
    pub fn apply_order(&self) -> Vec<SectionId> {
        SectionId::APPLY_ORDER.into_iter().filter(|id| self.section(*id).is_some()).collect()
    }

    /// Applicable sections in apply order.
    pub fn sections(&self) -> Vec<&dyn ConfigSection> {
        SectionId::APPLY_ORDER.into_iter().filter_map(|id| self.section(id)).collect()
    }

    /// The section for `id`, or `None` while it is not applicable.
    pub fn section(&self, id: SectionId) -> Option<&dyn ConfigSection> {
        match id {
            SectionId::Watchdog => Some(&self.watchdog),
            SectionId::Stonith => Some(&self.stonith),
            SectionId::CommunicationLayer => Some(&self.communication_layer),
            SectionId::ClusterMembers => {
                self.cluster_members.as_ref().map(|m| m as &dyn ConfigSection)
            }
            SectionId::Hana if self.hana_required() => Some(&self.hana),
            SectionId::Hana => None,
        }
    }

    /// True iff every applicable section is configured.
    pub fn can_install(&self, ctx: &SystemContext<'_>) -> bool {
        self.sections().into_iter().all(|section| section.configured(self, ctx))
    }

    /// Verbose validation of every applicable section.
    pub fn validation_report(&self, ctx: &SystemContext<'_>) -> Vec<SectionValidation> {
        self.sections()
            .into_iter()
            .map(|section| SectionValidation {
                section: section.id(),
                messages: section.validate(self, ctx, Verbosity::Verbose).into_messages(),
            })
            .collect()
    }

    /// Description of every applicable section.
    pub fn descriptions(&self) -> Vec<(SectionId, Description)> {
        self.sections().into_iter().map(|s| (s.id(), s.description())).collect()
    }
}
