use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::{AppError, CheckTransaction, Description, NodeRole, SystemCommand};
use crate::ports::SystemContext;

use super::{ApplySession, ConfigSection, ScenarioConfiguration, SectionId};

/// Accepted values of the firewall configuration choice.
pub const FIREWALL_CONFIGS: &[&str] = &["done", "off", "setup"];

const MAX_RINGS: usize = 2;
const COROSYNC_CONF: &str = "/etc/corosync/corosync.conf";
const CSYNC2_KEY: &str = "/etc/csync2/key_hagroup";

/// Corosync transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    #[default]
    Unicast,
    Multicast,
}

impl TransportMode {
    /// Value of the corosync `transport` option.
    pub fn corosync_transport(self) -> &'static str {
        match self {
            TransportMode::Unicast => "udpu",
            TransportMode::Multicast => "udp",
        }
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportMode::Unicast => f.write_str("unicast"),
            TransportMode::Multicast => f.write_str("multicast"),
        }
    }
}

/// One corosync ring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ring {
    /// Bind network address.
    pub address: String,
    pub mask: String,
    pub port: String,
    /// Multicast group, only used in multicast mode.
    pub mcast: String,
}

impl Default for Ring {
    fn default() -> Self {
        Self { address: String::new(), mask: "24".into(), port: "5405".into(), mcast: String::new() }
    }
}

impl Ring {
    /// Network in CIDR notation.
    pub fn network(&self) -> String {
        format!("{}/{}", self.address, self.mask)
    }
}

/// Corosync communication layer and firewall choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommunicationLayer {
    pub cluster_name: String,
    pub transport_mode: TransportMode,
    pub number_of_rings: usize,
    pub rings: Vec<Ring>,
    pub expected_votes: String,
    pub enable_secauth: bool,
    pub enable_csync2: bool,
    /// One of [`FIREWALL_CONFIGS`].
    pub fw_config: String,
}

impl Default for CommunicationLayer {
    fn default() -> Self {
        Self {
            cluster_name: "hacluster".into(),
            transport_mode: TransportMode::Unicast,
            number_of_rings: 1,
            rings: vec![
                Ring::default(),
                Ring { port: "5407".into(), ..Ring::default() },
            ],
            expected_votes: "2".into(),
            enable_secauth: false,
            enable_csync2: false,
            fw_config: "done".into(),
        }
    }
}

impl CommunicationLayer {
    /// Change the ring count, adding default rings as needed.
    pub fn set_number_of_rings(&mut self, number: usize) {
        self.number_of_rings = number;
        while self.rings.len() < number {
            self.rings.push(Ring::default());
        }
    }

    /// Rings that are in use.
    pub fn active_rings(&self) -> &[Ring] {
        let count = self.number_of_rings.min(self.rings.len());
        &self.rings[..count]
    }

    fn multicast(&self) -> bool {
        self.transport_mode == TransportMode::Multicast
    }

    fn template_context(&self, global: &ScenarioConfiguration) -> serde_json::Value {
        let rings: Vec<_> = self
            .active_rings()
            .iter()
            .enumerate()
            .map(|(number, ring)| {
                json!({
                    "number": number,
                    "address": ring.address,
                    "port": ring.port,
                    "mcast": ring.mcast,
                })
            })
            .collect();
        let nodes: Vec<_> = global
            .cluster_members
            .as_ref()
            .map(|members| {
                members
                    .nodes
                    .iter()
                    .map(|n| {
                        json!({
                            "host_name": n.host_name,
                            "ip_ring1": n.ip_ring1,
                            "ip_ring2": n.ip_ring2,
                            "node_id": n.node_id,
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();
        json!({
            "cluster_name": self.cluster_name,
            "transport": self.transport_mode.corosync_transport(),
            "multicast": self.multicast(),
            "secauth": if self.enable_secauth { "on" } else { "off" },
            "expected_votes": self.expected_votes,
            "two_node": self.expected_votes.trim() == "2",
            "rings": rings,
            "nodes": nodes,
        })
    }
}

impl ConfigSection for CommunicationLayer {
    fn id(&self) -> SectionId {
        SectionId::CommunicationLayer
    }

    fn check(
        &self,
        _global: &ScenarioConfiguration,
        _ctx: &SystemContext<'_>,
        check: &mut CheckTransaction<'_>,
    ) {
        check.identifier(&self.cluster_name, "Cluster name");
        check.integer_in_range(
            self.number_of_rings as i64,
            1,
            MAX_RINGS as i64,
            Some("The number of rings has to be 1 or 2."),
            "Number of rings",
        );
        if self.rings.len() < self.number_of_rings {
            check.fail(
                "Rings",
                format!(
                    "{} rings requested, but only {} are defined.",
                    self.number_of_rings,
                    self.rings.len()
                ),
            );
        }

        for (index, ring) in self.active_rings().iter().enumerate() {
            let n = index + 1;
            check.ipv4(&ring.address, &format!("Ring {} address", n));
            check.nonneg_integer(&ring.mask, &format!("Ring {} mask", n));
            check.integer_in_range(
                &ring.mask,
                1,
                32,
                Some("CIDR mask has to be between 1 and 32."),
                &format!("Ring {} mask", n),
            );
            check.port(&ring.port, &format!("Ring {} port", n));
            if self.multicast() {
                check.ipv4(&ring.mcast, &format!("Ring {} multicast address", n));
            }
        }
        let addresses: Vec<&str> = self.active_rings().iter().map(|r| r.address.as_str()).collect();
        check.unique(&addresses, Some("Ring addresses have to be unique."), "Ring addresses");

        check.nonneg_integer(&self.expected_votes, "Expected votes");
        check.element_in_set(
            &self.fw_config.as_str(),
            FIREWALL_CONFIGS,
            None,
            "Firewall configuration",
        );
    }

    fn description(&self) -> Description {
        let mut dsc = Description::new();
        dsc.parameter("Cluster name", &self.cluster_name)
            .parameter("Transport mode", self.transport_mode)
            .parameter("Number of rings", self.number_of_rings);
        for (index, ring) in self.active_rings().iter().enumerate() {
            let value = if self.multicast() {
                format!("{}:{} (multicast {})", ring.network(), ring.port, ring.mcast)
            } else {
                format!("{}:{}", ring.network(), ring.port)
            };
            dsc.parameter(format!("Ring {}", index + 1), value);
        }
        dsc.parameter("Expected votes", &self.expected_votes)
            .parameter("Secure authentication", self.enable_secauth)
            .parameter("csync2", self.enable_csync2)
            .parameter("Firewall configuration", &self.fw_config);
        dsc
    }

    fn apply_steps(
        &self,
        role: NodeRole,
        global: &ScenarioConfiguration,
        session: &mut ApplySession<'_>,
    ) -> Result<(), AppError> {
        let conf = session.render("corosync.conf.j2", &self.template_context(global))?;
        session.write_file(
            Path::new(COROSYNC_CONF),
            &conf,
            "Wrote the corosync configuration",
            "Could not write the corosync configuration",
        );

        if !role.is_master() {
            return Ok(());
        }
        if self.enable_secauth {
            session.exec(
                SystemCommand::new("corosync-keygen").arg("-l"),
                "Generated the corosync authentication key",
                "Could not generate the corosync authentication key",
            );
        }
        if self.enable_csync2 {
            session.exec(
                SystemCommand::new("csync2").args(["-k", CSYNC2_KEY]),
                "Generated the csync2 key",
                "Could not generate the csync2 key",
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Verbosity;
    use crate::testing::{TestServices, valid_hana_configuration};

    #[test]
    fn default_layer_needs_ring_address() {
        let services = TestServices::new();
        let config = valid_hana_configuration();
        let layer = CommunicationLayer::default();
        let messages = layer.validate(&config, &services.ctx(), Verbosity::Verbose).into_messages();
        assert_eq!(messages.len(), 1, "{:?}", messages);
        assert!(messages[0].contains("Ring 1 address"));
    }

    #[test]
    fn multicast_requires_group_address() {
        let services = TestServices::new();
        let mut config = valid_hana_configuration();
        config.communication_layer.transport_mode = TransportMode::Multicast;
        let layer = &config.communication_layer;
        assert!(!layer.configured(&config, &services.ctx()));

        config.communication_layer.rings[0].mcast = "239.0.0.1".into();
        let layer = &config.communication_layer;
        assert!(layer.configured(&config, &services.ctx()));
    }

    #[test]
    fn rejects_unknown_firewall_choice_and_bad_ring_count() {
        let services = TestServices::new();
        let mut config = valid_hana_configuration();
        config.communication_layer.fw_config = "maybe".into();
        config.communication_layer.number_of_rings = 3;
        let layer = &config.communication_layer;
        let messages = layer.validate(&config, &services.ctx(), Verbosity::Verbose).into_messages();
        assert!(messages.iter().any(|m| m.contains("Firewall configuration")));
        assert!(messages.iter().any(|m| m.contains("Number of rings")));
    }

    #[test]
    fn set_number_of_rings_grows_ring_list() {
        let mut layer = CommunicationLayer { rings: vec![], ..CommunicationLayer::default() };
        layer.set_number_of_rings(2);
        assert_eq!(layer.rings.len(), 2);
        assert_eq!(layer.active_rings().len(), 2);
    }

    #[test]
    fn apply_writes_corosync_conf_and_keys_on_master() {
        let services = TestServices::new();
        let mut config = valid_hana_configuration();
        config.communication_layer.enable_secauth = true;
        let layer = &config.communication_layer;
        let report = layer.apply(NodeRole::Master, &config, &services.ctx()).unwrap();
        assert!(report.succeeded());

        let conf = services.files.written(COROSYNC_CONF).expect("corosync.conf written");
        assert!(conf.contains("cluster_name: hacluster"));
        assert!(conf.contains("ring0_addr: 192.168.100.11"));
        assert!(conf.contains("secauth: on"));
        assert!(services.commands.ran("corosync-keygen -l"));
    }

    #[test]
    fn secondary_does_not_generate_keys() {
        let services = TestServices::new();
        let mut config = valid_hana_configuration();
        config.communication_layer.enable_secauth = true;
        config.communication_layer.enable_csync2 = true;
        let layer = &config.communication_layer;
        layer.apply(NodeRole::Secondary, &config, &services.ctx()).unwrap();
        assert!(services.commands.recorded().is_empty());
    }
}
