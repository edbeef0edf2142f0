use std::path::Path;

use crate::domain::{AppError, NodeRole, Platform, SystemCommand};

use super::super::{ApplySession, ScenarioConfiguration};
use super::firewall::{HANA_FIREWALL_SYSCONFIG, HANA_FW_SERVICES, with_instance_number};
use super::{Hana, commands};

const SUDOERS_FILE: &str = "/etc/sudoers.d/saphanasr.conf";
const SUDOERS_TEMPLATE: &str = "SUDOERS_HANASR.j2";
const CLUSTER_CONFIG_TEMPLATE: &str = "cluster_config.j2";
const FIREWALL_CMD: &str = "/usr/bin/firewall-cmd";

/// HA/DR provider hooks installed into global.ini.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Provider {
    SapHanaSr,
    TakeoverBlocker,
    ServiceCheck,
    CostOptimized,
}

impl Provider {
    fn key(self) -> &'static str {
        match self {
            Provider::SapHanaSr => "SAPHANA_SR",
            Provider::TakeoverBlocker => "SUS_TKOVER",
            Provider::ServiceCheck => "SUS_CHKSRV",
            Provider::CostOptimized => "SUS_COSTOPT",
        }
    }

    fn basename(self) -> String {
        format!("GLOBAL_INI_{}", self.key())
    }
}

fn providers_for(role: NodeRole, additional_instance: bool) -> Vec<Provider> {
    let mut providers = vec![Provider::SapHanaSr];
    if additional_instance {
        if !role.is_master() {
            providers.push(Provider::CostOptimized);
        }
    } else {
        providers.push(Provider::ServiceCheck);
        providers.push(Provider::TakeoverBlocker);
    }
    providers
}

impl Hana {
    pub(super) fn run_apply(
        &self,
        role: NodeRole,
        global: &ScenarioConfiguration,
        session: &mut ApplySession<'_>,
    ) -> Result<(), AppError> {
        self.configure_firewall(role, &global.communication_layer.fw_config, session);

        if role.is_master() {
            if self.perform_backup {
                session.exec(
                    commands::backup(self),
                    "HANA backup completed",
                    "HANA backup failed",
                );
            }
            self.copy_keys(global, session);
            session.exec(
                commands::enable_primary(self),
                "Enabled HANA System Replication on the primary site",
                "Could not enable HANA System Replication on the primary site",
            );
            self.configure_crm(global, session)?;
        } else {
            self.register_secondary(global, session);
        }

        self.install_sudoers(session)?;
        self.install_providers(role, session)?;
        Ok(())
    }

    fn configure_firewall(&self, role: NodeRole, fw_config: &str, session: &mut ApplySession<'_>) {
        match fw_config {
            "done" => session.info("Firewall is already configured"),
            "off" => {
                session.info("Firewall will be turned off");
                session.exec(
                    SystemCommand::new("systemctl").args(["stop", "firewalld"]),
                    "Firewall was turned off",
                    "Could not turn off the firewall",
                );
            }
            "setup" => self.setup_firewall(role, session),
            other => {
                session.log().status(
                    false,
                    "",
                    "Invalid firewall configuration status",
                    Some(other.to_string()),
                );
            }
        }
    }

    fn setup_firewall(&self, role: NodeRole, session: &mut ApplySession<'_>) {
        let path = Path::new(HANA_FIREWALL_SYSCONFIG);
        let current = match session.ctx().files.read_file(path) {
            Ok(content) => content.unwrap_or_default(),
            Err(err) => {
                session.log().status(
                    false,
                    "",
                    "Could not read the HANA firewall configuration",
                    Some(err.to_string()),
                );
                return;
            }
        };
        let updated = with_instance_number(&current, &self.instance);
        session.write_file(
            path,
            &updated,
            "Updated the HANA firewall configuration",
            "Could not update the HANA firewall configuration",
        );
        session.exec(
            SystemCommand::new("/usr/sbin/hana-firewall").arg("generate-firewalld-services"),
            "Generated HANA firewall services",
            "Could not generate HANA firewall services",
        );
        session.exec(
            SystemCommand::new(FIREWALL_CMD).arg("--reload"),
            "Reloaded firewalld",
            "Could not reload firewalld",
        );
        if !role.is_master() {
            session.exec(
                SystemCommand::new(FIREWALL_CMD).args(["--add-port", "8080/tcp"]),
                "Opened port 8080/tcp",
                "Could not open port 8080/tcp",
            );
        }
        for &service in HANA_FW_SERVICES {
            session.exec(
                SystemCommand::new(FIREWALL_CMD).args(["--add-service", service]),
                &format!("Added firewall service {}", service),
                &format!("Could not add firewall service {}", service),
            );
            session.exec(
                SystemCommand::new(FIREWALL_CMD).args(["--permanent", "--add-service", service]),
                &format!("Added permanent firewall service {}", service),
                &format!("Could not add permanent firewall service {}", service),
            );
        }
    }

    fn copy_keys(&self, global: &ScenarioConfiguration, session: &mut ApplySession<'_>) {
        let peers = global.peers();
        let Some(peer) = peers.first() else {
            session.log().status(false, "", "No secondary node to copy the PKI files to", None);
            return;
        };
        for file in commands::ssfs_files(&self.system_id) {
            session.exec(
                commands::copy_to_peer(&file, peer),
                &format!("Copied {} to {}", file, peer.host_name),
                &format!("Could not copy {} to {}", file, peer.host_name),
            );
        }
    }

    fn configure_crm(
        &self,
        global: &ScenarioConfiguration,
        session: &mut ApplySession<'_>,
    ) -> Result<(), AppError> {
        let config = session.render(CLUSTER_CONFIG_TEMPLATE, &self.template_context(global))?;
        let Some(path) = session.write_var_file("cluster.config", &config) else {
            return Ok(());
        };
        session.exec(
            SystemCommand::new("crm")
                .args(["configure", "load", "update"])
                .arg(path.display().to_string()),
            "Configured necessary cluster resources for HANA System Replication",
            "Could not configure HANA cluster resources",
        );
        Ok(())
    }

    fn register_secondary(&self, global: &ScenarioConfiguration, session: &mut ApplySession<'_>) {
        let primary = global
            .cluster_members
            .as_ref()
            .and_then(|m| m.other_nodes(&global.local_hostname).first().map(|n| n.host_name.clone()));
        session.exec(
            commands::stop(self),
            "Stopped HANA",
            "Could not stop HANA",
        );
        match primary {
            Some(primary) => {
                session.exec(
                    commands::register_secondary(self, &primary),
                    &format!("Registered the secondary site with {}", primary),
                    &format!("Could not register the secondary site with {}", primary),
                );
            }
            None => {
                session.log().status(false, "", "Could not determine the primary node", None);
            }
        }
        if global.platform == Platform::Azure {
            session.exec(
                commands::cleanup_resource(self),
                "Cleaned up the SAPHana resource",
                "Could not clean up the SAPHana resource",
            );
        }
        session.exec(
            commands::start(self),
            "Started HANA",
            "Could not start HANA",
        );
    }

    fn install_sudoers(&self, session: &mut ApplySession<'_>) -> Result<(), AppError> {
        if !session.has_template(SUDOERS_TEMPLATE) {
            return Ok(());
        }
        let context = serde_json::json!({
            "sid_lower": self.system_id.to_lowercase(),
            "sidadm": self.sidadm(),
            "site_name_1": self.site_name_1,
            "site_name_2": self.site_name_2,
        });
        let sudoers = session.render(SUDOERS_TEMPLATE, &context)?;
        session.write_file(
            Path::new(SUDOERS_FILE),
            &sudoers,
            "Installed sudoers rules for the SAPHanaSR hooks",
            "Could not install sudoers rules for the SAPHanaSR hooks",
        );
        Ok(())
    }

    fn install_providers(&self, role: NodeRole, session: &mut ApplySession<'_>) -> Result<(), AppError> {
        let context = serde_json::json!({
            "system_id": self.system_id,
            "instance": self.instance,
            "np_system_id": self.np_system_id,
            "np_instance": self.np_instance,
            "production_constraints": self.production_constraints.typed(),
        });
        for provider in providers_for(role, self.additional_instance) {
            let basename = provider.basename();
            let template = format!("{}.j2", basename);
            let ini_path = if session.has_template(&template) {
                let content = session.render(&template, &context)?;
                match session.write_var_file(&basename, &content) {
                    Some(path) => path,
                    None => continue,
                }
            } else {
                session.ctx().files.data_file_path(&basename)
            };
            session.exec(
                commands::add_provider(self, &ini_path.display().to_string()),
                &format!("Installed the {} provider hook", provider.key()),
                &format!("Could not install the {} provider hook", provider.key()),
            );
        }
        session.exec(
            commands::reload_providers(self),
            "Reloaded HANA HA/DR providers",
            "Could not reload HANA HA/DR providers",
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ConfigSection;
    use crate::ports::{SystemContext, TemplateRenderer};
    use crate::testing::{TestServices, valid_hana_configuration};
    use serde_json::Value;

    /// Embedded templates with the plugin fragments removed.
    struct WithoutProviderTemplates<'a>(&'a dyn TemplateRenderer);

    impl TemplateRenderer for WithoutProviderTemplates<'_> {
        fn has_template(&self, name: &str) -> bool {
            !name.starts_with("GLOBAL_INI_") && self.0.has_template(name)
        }

        fn render(&self, name: &str, context: &Value) -> Result<String, AppError> {
            if name.starts_with("GLOBAL_INI_") {
                return Err(AppError::TemplateNotFound(name.to_string()));
            }
            self.0.render(name, context)
        }
    }

    #[test]
    fn provider_selection_follows_scenario() {
        assert_eq!(
            providers_for(NodeRole::Master, false),
            vec![Provider::SapHanaSr, Provider::ServiceCheck, Provider::TakeoverBlocker]
        );
        assert_eq!(providers_for(NodeRole::Master, true), vec![Provider::SapHanaSr]);
        assert_eq!(
            providers_for(NodeRole::Secondary, true),
            vec![Provider::SapHanaSr, Provider::CostOptimized]
        );
    }

    #[test]
    fn master_runs_backup_replication_and_cluster_load() {
        let services = TestServices::new();
        let config = valid_hana_configuration();
        let report = config.hana.apply(NodeRole::Master, &config, &services.ctx()).unwrap();
        assert!(report.succeeded(), "{}", report);

        let lines = services.commands.command_lines();
        let position = |needle: &str| lines.iter().position(|l| l.contains(needle)).unwrap();
        assert!(position("BACKUP DATA") < position("-sr_enable"));
        assert!(position("-sr_enable") < position("crm configure load update"));
        assert!(services.commands.ran("crm configure load update /var/lib/hana-ha/cluster.config"));
        assert!(services.commands.ran("GLOBAL_INI_SUS_TKOVER"));
        assert!(services.commands.ran("GLOBAL_INI_SUS_CHKSRV"));
        assert!(!services.commands.ran("GLOBAL_INI_SUS_COSTOPT"));
        assert!(services.commands.ran("hdbnsutil -reloadHADRProviders"));
        assert!(services.files.written(SUDOERS_FILE).is_some());

        let copy = services
            .commands
            .recorded()
            .into_iter()
            .find(|c| c.program == "sshpass")
            .expect("PKI files copied with a password");
        assert!(copy.command_line().contains("root@hana02:"));
    }

    #[test]
    fn cost_optimized_constraints_name_the_production_system() {
        let services = TestServices::new();
        let mut config = valid_hana_configuration();
        config.hana.system_id = "HA1".into();
        config.hana.np_system_id = "QAS".into();
        config.hana.set_additional_instance(true);
        let report = config.hana.apply(NodeRole::Master, &config, &services.ctx()).unwrap();
        assert!(report.succeeded(), "{}", report);

        let resources = services.files.written("/var/lib/hana-ha/cluster.config").unwrap();
        assert!(resources.contains("colocation col_QAS_never_with_HA1-ip -inf:"), "{resources}");
        assert!(!resources.contains("PRD"));
    }

    #[test]
    fn secondary_registers_and_restarts() {
        let services = TestServices::new();
        let mut config = valid_hana_configuration();
        config.local_hostname = "hana02".into();
        config.role = NodeRole::Secondary;
        config.hana.set_additional_instance(true);
        let report = config.hana.apply(NodeRole::Secondary, &config, &services.ctx()).unwrap();
        assert!(report.succeeded(), "{}", report);

        let lines = services.commands.command_lines();
        assert_eq!(lines[0], "HDB stop");
        assert!(lines[1].contains("--remoteHost=hana01"));
        assert_eq!(lines[2], "HDB start");
        assert!(!services.commands.ran("BACKUP DATA"));
        assert!(!services.commands.ran("crm resource cleanup"));
        assert!(services.commands.ran("GLOBAL_INI_SUS_COSTOPT"));
        assert!(!services.commands.ran("GLOBAL_INI_SUS_TKOVER"));
    }

    #[test]
    fn azure_secondary_cleans_up_resource() {
        let services = TestServices::new();
        let mut config = valid_hana_configuration();
        config.local_hostname = "hana02".into();
        config.role = NodeRole::Secondary;
        config.platform = Platform::Azure;
        config.hana.apply(NodeRole::Secondary, &config, &services.ctx()).unwrap();
        assert!(services.commands.ran("crm resource cleanup rsc_SAPHana_PRD_HDB00"));
    }

    #[test]
    fn firewall_setup_updates_sysconfig_and_services() {
        let services = TestServices::new();
        services.files.seed(HANA_FIREWALL_SYSCONFIG, "HANA_INSTANCE_NUMBERS=\"\"\n");
        let mut config = valid_hana_configuration();
        config.communication_layer.fw_config = "setup".into();
        config.hana.apply(NodeRole::Master, &config, &services.ctx()).unwrap();

        let sysconfig = services.files.written(HANA_FIREWALL_SYSCONFIG).unwrap();
        assert_eq!(sysconfig, "HANA_INSTANCE_NUMBERS=\"00\"\n");
        assert!(services.commands.ran("hana-firewall generate-firewalld-services"));
        assert!(services.commands.ran("firewall-cmd --permanent --add-service hana-database-client"));
        assert!(!services.commands.ran("--add-port"));
    }

    #[test]
    fn firewall_setup_opens_admin_port_on_secondary() {
        let services = TestServices::new();
        let mut config = valid_hana_configuration();
        config.local_hostname = "hana02".into();
        config.role = NodeRole::Secondary;
        config.communication_layer.fw_config = "setup".into();
        let report = config.hana.apply(NodeRole::Secondary, &config, &services.ctx()).unwrap();
        assert!(report.succeeded(), "{}", report);

        assert!(services.commands.ran("firewall-cmd --add-port 8080/tcp"));
        let lines = services.commands.command_lines();
        let position = |needle: &str| lines.iter().position(|l| l.contains(needle)).unwrap();
        assert!(position("firewall-cmd --add-port") < position("HDB stop"));
    }

    #[test]
    fn firewall_done_runs_no_firewall_commands() {
        let services = TestServices::new();
        let mut config = valid_hana_configuration();
        config.communication_layer.fw_config = "done".into();
        let report = config.hana.apply(NodeRole::Master, &config, &services.ctx()).unwrap();
        assert!(report.succeeded(), "{}", report);
        assert!(!services.commands.ran("firewall"));
        assert!(services.files.written(HANA_FIREWALL_SYSCONFIG).is_none());
    }

    #[test]
    fn providers_without_template_register_data_file() {
        let services = TestServices::new();
        let templates = WithoutProviderTemplates(&services.templates);
        let ctx = SystemContext { templates: &templates, ..services.ctx() };
        let config = valid_hana_configuration();
        let report = config.hana.apply(NodeRole::Master, &config, &ctx).unwrap();
        assert!(report.succeeded(), "{}", report);

        assert!(services.commands.ran("--add --sid PRD /usr/share/hana-ha/GLOBAL_INI_SAPHANA_SR"));
        assert!(services.commands.ran("/usr/share/hana-ha/GLOBAL_INI_SUS_TKOVER"));
        assert!(!services.commands.ran("/var/lib/hana-ha/GLOBAL_INI_"));
        assert!(services.commands.ran("hdbnsutil -reloadHADRProviders"));
    }

    #[test]
    fn firewall_off_stops_firewalld() {
        let services = TestServices::new();
        let mut config = valid_hana_configuration();
        config.communication_layer.fw_config = "off".into();
        config.hana.apply(NodeRole::Master, &config, &services.ctx()).unwrap();
        assert_eq!(services.commands.command_lines()[0], "systemctl stop firewalld");
        assert!(!services.commands.ran("firewall-cmd"));
    }

    #[test]
    fn failed_command_does_not_stop_later_steps() {
        let services = TestServices::new();
        services.commands.fail_on("BACKUP DATA");
        let config = valid_hana_configuration();
        let report = config.hana.apply(NodeRole::Master, &config, &services.ctx()).unwrap();
        assert!(!report.succeeded());
        assert_eq!(report.failures().count(), 1);
        assert!(services.commands.ran("-sr_enable"));
        assert!(services.commands.ran("-reloadHADRProviders"));
    }

    #[test]
    fn refuses_to_apply_unconfigured_section() {
        let services = TestServices::new();
        let config = valid_hana_configuration();
        let err = Hana::default().apply(NodeRole::Master, &config, &services.ctx()).unwrap_err();
        assert!(matches!(err, AppError::NotConfigured { ref section } if section == "HANA"));
        assert!(services.commands.recorded().is_empty());
    }
}
