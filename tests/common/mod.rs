//! Shared testing utilities for hana-ha CLI tests.

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Answers for a two-node performance-optimized cluster seen from its master. Backup is
/// disabled so that no secure store lookup is needed.
pub const VALID_ANSWERS: &str = r#"
product: HANA
scenario: "Scale Up: Performance-optimized"
role: master
platform: bare-metal
local_hostname: hana01
cluster_members:
  nodes:
    - host_name: hana01
      ip_ring1: 192.168.100.11
      node_id: "1"
    - host_name: hana02
      ip_ring1: 192.168.100.12
      node_id: "2"
  host_passwords:
    hana02: linux
communication_layer:
  rings:
    - address: 192.168.100.0
      mask: "24"
stonith:
  devices: [/dev/disk/by-id/sbd-1]
hana:
  system_id: PRD
  instance: "00"
  virtual_ip: 192.168.100.200
  site_name_1: WALLDORF
  site_name_2: ROT
  perform_backup: false
"#;

/// Testing harness providing an isolated environment for CLI exercises.
#[allow(dead_code)]
pub struct TestContext {
    root: TempDir,
}

#[allow(dead_code)]
impl TestContext {
    /// Create a new isolated environment.
    pub fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp directory for tests");
        fs::create_dir_all(root.path().join("var")).expect("Failed to create var directory");
        fs::create_dir_all(root.path().join("data")).expect("Failed to create data directory");
        Self { root }
    }

    pub fn root(&self) -> &Path {
        self.root.path()
    }

    pub fn var_dir(&self) -> PathBuf {
        self.root.path().join("var")
    }

    /// Write an answers file and return its path.
    pub fn answers(&self, name: &str, content: &str) -> PathBuf {
        let path = self.root.path().join(name);
        fs::write(&path, content).expect("Failed to write answers file");
        path
    }

    /// Answers file derived from [`VALID_ANSWERS`] with one line replaced.
    pub fn answers_with(&self, name: &str, from: &str, to: &str) -> PathBuf {
        assert!(VALID_ANSWERS.contains(from), "fixture does not contain {from:?}");
        self.answers(name, &VALID_ANSWERS.replace(from, to))
    }

    /// Build a command for invoking the compiled `hana-ha` binary with isolated
    /// directories and no settings file.
    pub fn cli(&self) -> Command {
        let mut cmd = Command::cargo_bin("hana-ha").expect("Failed to locate hana-ha binary");
        cmd.current_dir(self.root())
            .env_remove("RUST_LOG")
            .env_remove("HANA_HA_DATA_DIR")
            .env_remove("HANA_HA_VAR_DIR")
            .arg("--settings")
            .arg(self.settings_file())
            .arg("--var-dir")
            .arg(self.var_dir());
        cmd
    }

    fn settings_file(&self) -> PathBuf {
        let path = self.root.path().join("settings.toml");
        if !path.exists() {
            let content = format!("data_dir = {:?}\n", self.root.path().join("data"));
            fs::write(&path, content).expect("Failed to write settings file");
        }
        path
    }
}
