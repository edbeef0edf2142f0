use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{AppError, CheckTransaction, Description, NodeRole, SystemCommand};
use crate::ports::SystemContext;

use super::{ApplySession, ConfigSection, ScenarioConfiguration, SectionId};

/// One cluster node as entered by the operator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterNode {
    pub host_name: String,
    pub ip_ring1: String,
    pub ip_ring2: String,
    pub node_id: String,
}

/// Another cluster node as seen from the local one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Peer {
    pub host_name: String,
    pub password: String,
}

/// Cluster membership, sized by the selected scenario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterMembers {
    number_of_nodes: usize,
    pub nodes: Vec<ClusterNode>,
    pub host_passwords: BTreeMap<String, String>,
}

impl ClusterMembers {
    /// Empty membership with `number_of_nodes` placeholder nodes.
    pub fn new(number_of_nodes: usize) -> Self {
        let nodes = (1..=number_of_nodes)
            .map(|id| ClusterNode { node_id: id.to_string(), ..ClusterNode::default() })
            .collect();
        Self { number_of_nodes, nodes, host_passwords: BTreeMap::new() }
    }

    pub fn number_of_nodes(&self) -> usize {
        self.number_of_nodes
    }

    /// Replace the node at `index` (zero-based).
    pub fn update_node(&mut self, index: usize, node: ClusterNode) -> Result<(), AppError> {
        let slot = self.nodes.get_mut(index).ok_or_else(|| {
            AppError::config_error(format!(
                "Node index {} out of range: the scenario has {} nodes",
                index + 1,
                self.number_of_nodes
            ))
        })?;
        *slot = node;
        Ok(())
    }

    pub fn node(&self, host_name: &str) -> Option<&ClusterNode> {
        self.nodes.iter().find(|n| n.host_name == host_name)
    }

    /// Nodes other than the local one, in configuration order.
    pub fn other_nodes(&self, local_host: &str) -> Vec<&ClusterNode> {
        self.nodes.iter().filter(|n| n.host_name != local_host).collect()
    }

    /// Other nodes with the password used to reach them.
    pub fn peers(&self, local_host: &str) -> Vec<Peer> {
        self.other_nodes(local_host)
            .into_iter()
            .map(|n| Peer {
                host_name: n.host_name.clone(),
                password: self.host_password(&n.host_name).to_string(),
            })
            .collect()
    }

    /// Host name of the primary, evaluated on the primary itself.
    pub fn primary_host(&self, local_host: &str) -> Option<&str> {
        self.node(local_host).or_else(|| self.nodes.first()).map(|n| n.host_name.as_str())
    }

    pub fn host_password(&self, host_name: &str) -> &str {
        self.host_passwords.get(host_name).map(String::as_str).unwrap_or("")
    }
}

impl ConfigSection for ClusterMembers {
    fn id(&self) -> SectionId {
        SectionId::ClusterMembers
    }

    fn check(
        &self,
        global: &ScenarioConfiguration,
        _ctx: &SystemContext<'_>,
        check: &mut CheckTransaction<'_>,
    ) {
        let expected = global.scenario().map(|s| s.number_of_nodes).unwrap_or(self.number_of_nodes);
        if self.nodes.len() != expected {
            check.fail(
                "Cluster nodes",
                format!(
                    "The selected scenario requires {} nodes, but {} are configured.",
                    expected,
                    self.nodes.len()
                ),
            );
        }

        let comm = &global.communication_layer;
        let networks: Vec<String> = comm.active_rings().iter().map(|r| r.network()).collect();

        for (index, node) in self.nodes.iter().enumerate() {
            let n = index + 1;
            check.hostname(&node.host_name, &format!("Node {} host name", n));
            check.nonneg_integer(&node.node_id, &format!("Node {} ID", n));
            let ips = [&node.ip_ring1, &node.ip_ring2];
            for (ring, (network, ip)) in networks.iter().zip(ips).enumerate() {
                let label = format!("Node {} IP address (ring {})", n, ring + 1);
                check.ipv4(ip, &label);
                check.ipv4_in_network_cidr(ip, network, &label);
            }
        }

        let host_names: Vec<&str> = self.nodes.iter().map(|n| n.host_name.as_str()).collect();
        check.unique(&host_names, Some("Host names have to be unique."), "Host names");
        let node_ids: Vec<&str> = self.nodes.iter().map(|n| n.node_id.as_str()).collect();
        check.unique(&node_ids, Some("Node IDs have to be unique."), "Node IDs");
        if !networks.is_empty() {
            let ring1: Vec<&str> = self.nodes.iter().map(|n| n.ip_ring1.as_str()).collect();
            check.unique(&ring1, Some("IP addresses have to be unique."), "Ring 1 addresses");
        }
        if networks.len() > 1 {
            let ring2: Vec<&str> = self.nodes.iter().map(|n| n.ip_ring2.as_str()).collect();
            check.unique(&ring2, Some("IP addresses have to be unique."), "Ring 2 addresses");
        }
    }

    fn description(&self) -> Description {
        let mut dsc = Description::new();
        for (index, node) in self.nodes.iter().enumerate() {
            let ips: Vec<&str> = [node.ip_ring1.as_str(), node.ip_ring2.as_str()]
                .into_iter()
                .filter(|ip| !ip.is_empty())
                .collect();
            dsc.parameter(
                format!("Node {}", index + 1),
                format!("{} ({}), ID {}", node.host_name, ips.join(", "), node.node_id),
            );
        }
        dsc
    }

    fn apply_steps(
        &self,
        role: NodeRole,
        global: &ScenarioConfiguration,
        session: &mut ApplySession<'_>,
    ) -> Result<(), AppError> {
        session.exec(
            SystemCommand::new("systemctl").args(["enable", "pacemaker"]),
            "Enabled the pacemaker service",
            "Could not enable the pacemaker service",
        );
        if role.is_master() {
            session.exec(
                SystemCommand::new("systemctl").args(["start", "pacemaker"]),
                "Started the cluster stack",
                "Could not start the cluster stack",
            );
            return Ok(());
        }

        match self.other_nodes(&global.local_hostname).first() {
            Some(primary) => {
                session.exec(
                    SystemCommand::new("crm")
                        .args(["cluster", "join", "-y", "-c"])
                        .arg(&primary.host_name),
                    &format!("Joined the cluster through {}", primary.host_name),
                    &format!("Could not join the cluster through {}", primary.host_name),
                );
            }
            None => {
                session.log().status(false, "", "Could not determine the primary node to join", None);
            }
        }
        Ok(())
    }
}
