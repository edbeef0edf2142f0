//! HANA firewall service handling.

pub const HANA_FIREWALL_SYSCONFIG: &str = "/etc/sysconfig/hana-firewall";

/// firewalld services generated by `hana-firewall`.
pub const HANA_FW_SERVICES: &[&str] = &[
    "hana-cockpit",
    "hana-database-client",
    "hana-data-provisioning",
    "hana-http-web-access",
    "hana-internal-distributed-communication",
    "hana-internal-system-replication",
    "hana-lifecycle-manager",
    "sap-software-provisioning-manager",
    "sap-special-support",
];

const INSTANCE_NUMBERS_KEY: &str = "HANA_INSTANCE_NUMBERS";

/// Add `instance` to the space-separated `HANA_INSTANCE_NUMBERS` list of the
/// hana-firewall sysconfig, appending the key when it is missing. Other lines are left
/// untouched.
pub fn with_instance_number(content: &str, instance: &str) -> String {
    let prefix = format!("{}=", INSTANCE_NUMBERS_KEY);
    let mut found = false;
    let mut lines: Vec<String> = content
        .lines()
        .map(|line| match line.trim_start().strip_prefix(&prefix) {
            Some(value) => {
                found = true;
                let mut instances: Vec<&str> = value.trim_matches('"').split_whitespace().collect();
                if !instances.contains(&instance) {
                    instances.push(instance);
                }
                format!("{}\"{}\"", prefix, instances.join(" "))
            }
            None => line.to_string(),
        })
        .collect();
    if !found {
        lines.push(format!("{}\"{}\"", prefix, instance));
    }
    let mut updated = lines.join("\n");
    updated.push('\n');
    updated
}
