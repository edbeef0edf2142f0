//! HANA System Replication section.

mod apply;
mod commands;
mod firewall;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::domain::{AppError, CheckTransaction, Description, NodeRole, sidadm};
use crate::ports::SystemContext;

use super::{ApplySession, ConfigSection, ScenarioConfiguration, SectionId};

pub use firewall::HANA_FW_SERVICES;

pub const HANA_REPLICATION_MODES: &[&str] = &["sync", "syncmem", "async"];
pub const HANA_OPERATION_MODES: &[&str] = &["delta_datashipping", "logreplay"];
const BOOLEAN_STRINGS: &[&str] = &["true", "false"];

/// Resource constraints for the production instance in a cost-optimized setup.
///
/// Kept as strings as entered; [`ProductionConstraints::typed`] parses them once they
/// have passed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductionConstraints {
    /// Global allocation limit in MB.
    pub global_alloc_limit: String,
    pub preload_column_tables: String,
}

impl Default for ProductionConstraints {
    fn default() -> Self {
        Self { global_alloc_limit: "0".into(), preload_column_tables: "false".into() }
    }
}

/// Parsed production constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TypedConstraints {
    pub global_alloc_limit: u64,
    pub preload_column_tables: bool,
}

impl ProductionConstraints {
    pub fn typed(&self) -> Option<TypedConstraints> {
        let global_alloc_limit = self.global_alloc_limit.trim().parse().ok()?;
        let preload_column_tables = match self.preload_column_tables.as_str() {
            "true" => true,
            "false" => false,
            _ => return None,
        };
        Some(TypedConstraints { global_alloc_limit, preload_column_tables })
    }

    fn check(&self, check: &mut CheckTransaction<'_>) {
        check.element_in_set(
            &self.preload_column_tables.as_str(),
            BOOLEAN_STRINGS,
            Some("The field must contain a boolean value: 'true' or 'false'"),
            "Preload column tables",
        );
        check.nonneg_integer(&self.global_alloc_limit, "Global allocation limit");
    }
}

/// HANA System Replication configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Hana {
    pub system_id: String,
    pub instance: String,
    pub virtual_ip: String,
    pub virtual_ip_mask: String,
    pub replication_mode: String,
    pub operation_mode: String,
    pub prefer_takeover: bool,
    pub auto_register: bool,
    pub site_name_1: String,
    pub site_name_2: String,
    /// Secure store key used to create the backup.
    pub backup_user: String,
    pub backup_file: String,
    pub perform_backup: bool,
    /// Non-production instance running on the secondary (cost-optimized scenario).
    additional_instance: bool,
    pub np_system_id: String,
    pub np_instance: String,
    pub production_constraints: ProductionConstraints,
}

impl Default for Hana {
    fn default() -> Self {
        Self {
            system_id: String::new(),
            instance: String::new(),
            virtual_ip: String::new(),
            virtual_ip_mask: "24".into(),
            replication_mode: HANA_REPLICATION_MODES[0].into(),
            operation_mode: HANA_OPERATION_MODES[0].into(),
            prefer_takeover: true,
            auto_register: false,
            site_name_1: String::new(),
            site_name_2: String::new(),
            backup_user: "system".into(),
            backup_file: "backup".into(),
            perform_backup: true,
            additional_instance: false,
            np_system_id: "QAS".into(),
            np_instance: "10".into(),
            production_constraints: ProductionConstraints::default(),
        }
    }
}

impl Hana {
    pub fn additional_instance(&self) -> bool {
        self.additional_instance
    }

    /// Toggle the non-production instance. Enabling it resets the production
    /// constraints to their defaults.
    pub fn set_additional_instance(&mut self, value: bool) {
        self.additional_instance = value;
        if value {
            self.production_constraints = ProductionConstraints::default();
        }
    }

    pub fn sidadm(&self) -> String {
        sidadm(&self.system_id)
    }

    /// Name of the SAPHana cluster resource.
    pub fn resource_name(&self) -> String {
        format!("rsc_SAPHana_{}_HDB{}", self.system_id, self.instance)
    }

    /// Checks for the backup settings; only meaningful on the master node.
    pub fn backup_checks(&self, ctx: &SystemContext<'_>, check: &mut CheckTransaction<'_>) {
        check.identifier(&self.backup_file, "Backup settings/Backup file name");
        check.identifier(&self.backup_user, "Backup settings/Secure store key");
        let keys: Vec<String> =
            ctx.secure_store.keys(&self.system_id).iter().map(|k| k.to_lowercase()).collect();
        check.element_in_set(
            &self.backup_user.to_lowercase(),
            &keys,
            Some("There is no such HANA user store key detected."),
            "Secure store key",
        );
    }

    fn template_context(&self, global: &ScenarioConfiguration) -> Value {
        let members = global.cluster_members.as_ref();
        let primary_host = members
            .and_then(|m| m.primary_host(&global.local_hostname))
            .unwrap_or_default();
        let secondary_host = members
            .and_then(|m| m.other_nodes(&global.local_hostname).first().map(|n| n.host_name.clone()))
            .unwrap_or_default();
        json!({
            "system_id": self.system_id,
            "sid_lower": self.system_id.to_lowercase(),
            "sidadm": self.sidadm(),
            "instance": self.instance,
            "virtual_ip": self.virtual_ip,
            "virtual_ip_mask": self.virtual_ip_mask,
            "replication_mode": self.replication_mode,
            "operation_mode": self.operation_mode,
            "prefer_takeover": self.prefer_takeover,
            "auto_register": self.auto_register,
            "site_name_1": self.site_name_1,
            "site_name_2": self.site_name_2,
            "additional_instance": self.additional_instance,
            "np_system_id": self.np_system_id,
            "np_instance": self.np_instance,
            "production_constraints": self.production_constraints.typed(),
            "primary_host": primary_host,
            "secondary_host": secondary_host,
            "platform": global.platform.as_str(),
        })
    }
}

impl ConfigSection for Hana {
    fn id(&self) -> SectionId {
        SectionId::Hana
    }

    fn check(
        &self,
        global: &ScenarioConfiguration,
        ctx: &SystemContext<'_>,
        check: &mut CheckTransaction<'_>,
    ) {
        check.ipv4(&self.virtual_ip, "Virtual IP");
        check.nonneg_integer(&self.virtual_ip_mask, "Virtual IP mask");
        check.integer_in_range(
            &self.virtual_ip_mask,
            1,
            32,
            Some("CIDR mask has to be between 1 and 32."),
            "Virtual IP mask",
        );
        check.sap_instance_number(&self.instance, "Instance Number");
        check.sap_sid(&self.system_id, "System ID");
        check.element_in_set(
            &self.replication_mode.as_str(),
            HANA_REPLICATION_MODES,
            Some(&format!(
                "Value should be one of the following: {}.",
                HANA_REPLICATION_MODES.join(",")
            )),
            "Replication mode",
        );
        check.element_in_set(
            &self.operation_mode.as_str(),
            HANA_OPERATION_MODES,
            Some(&format!(
                "Value should be one of the following: {}.",
                HANA_OPERATION_MODES.join(",")
            )),
            "Operation mode",
        );
        check.identifier(&self.site_name_1, "Site name 1");
        check.identifier(&self.site_name_2, "Site name 2");

        if self.perform_backup && global.role.is_master() {
            self.backup_checks(ctx, check);
        }

        if self.additional_instance {
            check.sap_instance_number(&self.np_instance, "Non-Production Instance Number");
            check.sap_sid(&self.np_system_id, "Non-Production System ID");
            check.not_equal(
                &self.instance,
                &self.np_instance,
                Some("SAP HANA instance numbers should not collide"),
                "Instance number",
            );
            check.not_equal(
                &self.system_id,
                &self.np_system_id,
                Some("SAP HANA System IDs should not collide"),
                "System ID",
            );
            self.production_constraints.check(check);
        }
    }

    fn description(&self) -> Description {
        let mut dsc = Description::new();
        if self.additional_instance {
            dsc.header("Production instance");
        }
        dsc.parameter("System ID", &self.system_id)
            .parameter("Instance", &self.instance)
            .parameter("Replication mode", &self.replication_mode)
            .parameter("Operation mode", &self.operation_mode)
            .parameter("Virtual IP", format!("{}/{}", self.virtual_ip, self.virtual_ip_mask))
            .parameter("Prefer takeover", self.prefer_takeover)
            .parameter("Automatic registration", self.auto_register)
            .parameter("Site 1 name", &self.site_name_1)
            .parameter("Site 2 name", &self.site_name_2)
            .parameter("Perform backup", self.perform_backup);
        if self.perform_backup {
            dsc.parameter("Secure store key", &self.backup_user)
                .parameter("Backup file", &self.backup_file);
        }
        if self.additional_instance {
            dsc.header("Non-production instance")
                .parameter("System ID", &self.np_system_id)
                .parameter("Instance", &self.np_instance)
                .header("Production system constraints")
                .parameter(
                    "Global allocation limit (MB)",
                    &self.production_constraints.global_alloc_limit,
                )
                .parameter(
                    "Column tables preload",
                    &self.production_constraints.preload_column_tables,
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
        self.run_apply(role, global, session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DescriptionEntry, Verbosity};
    use crate::testing::{TestServices, valid_hana_configuration};

    fn messages(config: &ScenarioConfiguration, services: &TestServices) -> Vec<String> {
        config.hana.validate(config, &services.ctx(), Verbosity::Verbose).into_messages()
    }

    #[test]
    fn valid_configuration_passes() {
        let services = TestServices::new();
        let config = valid_hana_configuration();
        assert!(messages(&config, &services).is_empty());
        assert!(config.hana.configured(&config, &services.ctx()));
    }

    #[test]
    fn default_configuration_reports_every_problem() {
        let services = TestServices::new();
        let mut config = valid_hana_configuration();
        config.hana = Hana::default();
        let errors = messages(&config, &services);
        for field in ["Virtual IP", "Instance Number", "System ID", "Site name 1", "Site name 2"] {
            assert!(
                errors.iter().any(|m| m.contains(&format!("'{}'", field))),
                "missing error for {field}: {errors:?}"
            );
        }
    }

    #[test]
    fn mask_out_of_range_is_reported() {
        let services = TestServices::new();
        let mut config = valid_hana_configuration();
        config.hana.virtual_ip_mask = "33".into();
        let errors = messages(&config, &services);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("CIDR mask has to be between 1 and 32."));
    }

    #[test]
    fn unknown_replication_mode_is_reported() {
        let services = TestServices::new();
        let mut config = valid_hana_configuration();
        config.hana.replication_mode = "fullsync".into();
        let errors = messages(&config, &services);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("sync,syncmem,async"));
    }

    #[test]
    fn backup_key_must_exist_in_secure_store_on_master() {
        let services = TestServices::with_secure_store_keys(&["OTHER"]);
        let config = valid_hana_configuration();
        let errors = messages(&config, &services);
        assert_eq!(errors, vec![
            "Invalid entry for 'Secure store key' \"backupkey\": There is no such HANA user store key detected."
                .to_string()
        ]);
    }

    #[test]
    fn backup_key_match_is_case_insensitive() {
        let services = TestServices::with_secure_store_keys(&["BACKUPKEY"]);
        let config = valid_hana_configuration();
        assert!(messages(&config, &services).is_empty());
    }

    #[test]
    fn backup_settings_are_ignored_on_secondary() {
        let services = TestServices::with_secure_store_keys(&[]);
        let mut config = valid_hana_configuration();
        config.role = NodeRole::Secondary;
        config.hana.backup_user = "not a key".into();
        assert!(messages(&config, &services).is_empty());
    }

    #[test]
    fn additional_instance_collisions_fail() {
        let services = TestServices::new();
        let mut config = valid_hana_configuration();
        config.hana.set_additional_instance(true);
        config.hana.np_instance = config.hana.instance.clone();
        let errors = messages(&config, &services);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("SAP HANA instance numbers should not collide"));

        config.hana.np_instance = "20".into();
        config.hana.np_system_id = config.hana.system_id.clone();
        let errors = messages(&config, &services);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("SAP HANA System IDs should not collide"));
    }

    #[test]
    fn production_constraints_are_validated() {
        let services = TestServices::new();
        let mut config = valid_hana_configuration();
        config.hana.set_additional_instance(true);
        config.hana.production_constraints.preload_column_tables = "yes".into();
        config.hana.production_constraints.global_alloc_limit = "-5".into();
        let errors = messages(&config, &services);
        assert_eq!(errors.len(), 2, "{errors:?}");
        assert!(config.hana.production_constraints.typed().is_none());
    }

    #[test]
    fn large_allocation_limit_validates_and_parses() {
        let services = TestServices::new();
        let mut config = valid_hana_configuration();
        config.hana.set_additional_instance(true);
        config.hana.production_constraints.global_alloc_limit = u64::MAX.to_string();
        assert!(messages(&config, &services).is_empty());
        assert_eq!(
            config.hana.production_constraints.typed().map(|c| c.global_alloc_limit),
            Some(u64::MAX)
        );
    }

    #[test]
    fn operation_mode_must_be_known() {
        let services = TestServices::new();
        let mut config = valid_hana_configuration();
        config.hana.operation_mode = "fastforward".into();
        let errors = messages(&config, &services);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("'Operation mode'"));
    }

    #[test]
    fn enabling_additional_instance_resets_constraints() {
        let mut hana = Hana::default();
        hana.production_constraints.global_alloc_limit = "1024".into();
        hana.set_additional_instance(true);
        assert_eq!(
            hana.production_constraints.typed(),
            Some(TypedConstraints { global_alloc_limit: 0, preload_column_tables: false })
        );
    }

    #[test]
    fn description_groups_instances() {
        let config = valid_hana_configuration();
        let plain = config.hana.description();
        assert_eq!(plain.value_of("System ID"), Some("PRD"));
        assert_eq!(plain.value_of("Virtual IP"), Some("192.168.100.200/24"));
        assert!(!plain.entries().iter().any(|e| matches!(e, DescriptionEntry::Header { .. })));

        let mut hana = config.hana.clone();
        hana.set_additional_instance(true);
        hana.perform_backup = false;
        let dsc = hana.description();
        let headers: Vec<_> = dsc
            .entries()
            .iter()
            .filter_map(|e| match e {
                DescriptionEntry::Header { text } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(
            headers,
            vec!["Production instance", "Non-production instance", "Production system constraints"]
        );
        assert_eq!(dsc.value_of("Backup file"), None);
    }
}
