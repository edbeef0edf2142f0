//! Commands issued against the HANA database and the cluster.

use crate::domain::{Peer, SystemCommand, sidadm};

use super::Hana;

const HA_PROVIDER_TOOL: &str = "/usr/sbin/SAPHanaSR-manageProvider";

fn as_sidadm(hana: &Hana, program: &str) -> SystemCommand {
    SystemCommand::new(program).run_as(sidadm(&hana.system_id))
}

/// Full data backup through the secure store key.
pub fn backup(hana: &Hana) -> SystemCommand {
    as_sidadm(hana, "hdbsql").args([
        "-U".to_string(),
        hana.backup_user.clone(),
        format!("BACKUP DATA USING FILE ('{}')", hana.backup_file),
    ])
}

/// Secure store files that have to be identical on every site.
pub fn ssfs_files(sid: &str) -> [String; 2] {
    let base = format!("/usr/sap/{}/SYS/global/security/rsecssfs", sid);
    [format!("{}/data/SSFS_{}.DAT", base, sid), format!("{}/key/SSFS_{}.KEY", base, sid)]
}

/// Copy one secure store file to the peer, using the peer password when one is known.
pub fn copy_to_peer(path: &str, peer: &Peer) -> SystemCommand {
    let target = format!("root@{}:{}", peer.host_name, path);
    let ssh_opts = ["-o", "StrictHostKeyChecking=no"];
    if peer.password.is_empty() {
        SystemCommand::new("scp").args(ssh_opts).arg(path).arg(target)
    } else {
        SystemCommand::new("sshpass")
            .args(["-e", "scp"])
            .args(ssh_opts)
            .arg(path)
            .arg(target)
            .env("SSHPASS", &peer.password)
    }
}

pub fn enable_primary(hana: &Hana) -> SystemCommand {
    as_sidadm(hana, "hdbnsutil")
        .args(["-sr_enable".to_string(), format!("--name={}", hana.site_name_1)])
}

pub fn register_secondary(hana: &Hana, primary_host: &str) -> SystemCommand {
    as_sidadm(hana, "hdbnsutil").args([
        "-sr_register".to_string(),
        format!("--remoteHost={}", primary_host),
        format!("--remoteInstance={}", hana.instance),
        format!("--replicationMode={}", hana.replication_mode),
        format!("--operationMode={}", hana.operation_mode),
        format!("--name={}", hana.site_name_2),
    ])
}

pub fn stop(hana: &Hana) -> SystemCommand {
    as_sidadm(hana, "HDB").arg("stop")
}

pub fn start(hana: &Hana) -> SystemCommand {
    as_sidadm(hana, "HDB").arg("start")
}

/// Register an HA/DR provider hook described by `ini_path`.
pub fn add_provider(hana: &Hana, ini_path: &str) -> SystemCommand {
    as_sidadm(hana, HA_PROVIDER_TOOL).args(["--add", "--sid", hana.system_id.as_str(), ini_path])
}

pub fn reload_providers(hana: &Hana) -> SystemCommand {
    as_sidadm(hana, "hdbnsutil").arg("-reloadHADRProviders")
}

pub fn cleanup_resource(hana: &Hana) -> SystemCommand {
    SystemCommand::new("crm").args(["resource", "cleanup"]).arg(hana.resource_name())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hana() -> Hana {
        Hana {
            system_id: "PRD".into(),
            instance: "00".into(),
            site_name_1: "WALLDORF".into(),
            site_name_2: "ROT".into(),
            backup_user: "backupkey".into(),
            ..Hana::default()
        }
    }

    #[test]
    fn database_commands_run_as_sidadm() {
        let hana = hana();
        let cmd = backup(&hana);
        assert_eq!(cmd.run_as.as_deref(), Some("prdadm"));
        assert_eq!(cmd.command_line(), "hdbsql -U backupkey BACKUP DATA USING FILE ('backup')");
        assert_eq!(enable_primary(&hana).command_line(), "hdbnsutil -sr_enable --name=WALLDORF");
        assert_eq!(
            register_secondary(&hana, "hana01").command_line(),
            "hdbnsutil -sr_register --remoteHost=hana01 --remoteInstance=00 \
             --replicationMode=sync --operationMode=delta_datashipping --name=ROT"
        );
    }

    #[test]
    fn copy_uses_sshpass_only_with_password() {
        let [dat, _] = ssfs_files("PRD");
        assert_eq!(dat, "/usr/sap/PRD/SYS/global/security/rsecssfs/data/SSFS_PRD.DAT");

        let with_password = Peer { host_name: "hana02".into(), password: "linux".into() };
        let cmd = copy_to_peer(&dat, &with_password);
        assert_eq!(cmd.program, "sshpass");
        assert_eq!(cmd.env, vec![("SSHPASS".to_string(), "linux".to_string())]);
        assert!(!cmd.command_line().contains("linux"));

        let without = Peer { host_name: "hana02".into(), password: String::new() };
        let cmd = copy_to_peer(&dat, &without);
        assert_eq!(cmd.program, "scp");
        assert!(cmd.command_line().ends_with("root@hana02:/usr/sap/PRD/SYS/global/security/rsecssfs/data/SSFS_PRD.DAT"));
    }
}
