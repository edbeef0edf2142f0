//! Facts about the local node.

use std::fs;
use std::path::Path;

use crate::domain::{AppError, Platform, SystemCommand};
use crate::ports::CommandRunner;

const SYS_VENDOR: &str = "/sys/class/dmi/id/sys_vendor";

/// Short host name of the local node.
pub fn probe_hostname(runner: &dyn CommandRunner) -> Result<String, AppError> {
    let output = runner.execute(&SystemCommand::new("hostname").arg("-s"));
    let name = output.stdout.trim();
    if !output.success() || name.is_empty() {
        return Err(AppError::config_error(format!(
            "Could not determine the local host name: {}",
            output.details().unwrap_or_else(|| "empty output".to_string())
        )));
    }
    Ok(name.to_string())
}

/// Hosting platform derived from the DMI vendor; bare metal when unknown.
pub fn probe_platform() -> Platform {
    probe_platform_from(Path::new(SYS_VENDOR))
}

fn probe_platform_from(path: &Path) -> Platform {
    match fs::read_to_string(path) {
        Ok(vendor) => Platform::from_sys_vendor(&vendor),
        Err(err) => {
            tracing::debug!("Could not read {}: {}", path.display(), err);
            Platform::BareMetal
        }
    }
}
