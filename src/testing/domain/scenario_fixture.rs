use crate::adapters::embedded_catalog;
use crate::domain::{ClusterNode, NodeRole, ScenarioCatalog, ScenarioConfiguration};

pub fn test_catalog() -> ScenarioCatalog {
    embedded_catalog()
}

/// Two-node performance-optimized HANA setup that passes every check, seen from the
/// master `hana01`.
pub fn valid_hana_configuration() -> ScenarioConfiguration {
    let mut config = ScenarioConfiguration::new(test_catalog());
    config.set_product("HANA").unwrap();
    config.set_scenario("Scale Up: Performance-optimized").unwrap();
    config.role = NodeRole::Master;
    config.local_hostname = "hana01".into();

    let members = config.cluster_members.as_mut().unwrap();
    members
        .update_node(0, ClusterNode {
            host_name: "hana01".into(),
            ip_ring1: "192.168.100.11".into(),
            ip_ring2: String::new(),
            node_id: "1".into(),
        })
        .unwrap();
    members
        .update_node(1, ClusterNode {
            host_name: "hana02".into(),
            ip_ring1: "192.168.100.12".into(),
            ip_ring2: String::new(),
            node_id: "2".into(),
        })
        .unwrap();
    members.host_passwords.insert("hana02".into(), "linux".into());

    config.communication_layer.rings[0].address = "192.168.100.0".into();
    config.communication_layer.rings[0].mask = "24".into();

    config.stonith.devices = vec!["/dev/disk/by-id/sbd-1".into()];

    let hana = &mut config.hana;
    hana.system_id = "PRD".into();
    hana.instance = "00".into();
    hana.virtual_ip = "192.168.100.200".into();
    hana.site_name_1 = "WALLDORF".into();
    hana.site_name_2 = "ROT".into();
    hana.backup_user = "backupkey".into();
    config
}
