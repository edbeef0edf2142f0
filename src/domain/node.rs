use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::AppError;

/// Position of the local node in the cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum NodeRole {
    /// Primary node: owns the replication source and configures the cluster.
    #[default]
    Master,
    Secondary,
}

impl NodeRole {
    pub fn is_master(self) -> bool {
        self == NodeRole::Master
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NodeRole::Master => "master",
            NodeRole::Secondary => "secondary",
        }
    }
}

impl FromStr for NodeRole {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "master" | "primary" => Ok(NodeRole::Master),
            "secondary" | "slave" => Ok(NodeRole::Secondary),
            _ => Err(AppError::InvalidRole(s.to_string())),
        }
    }
}

impl TryFrom<String> for NodeRole {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<NodeRole> for String {
    fn from(value: NodeRole) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for NodeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hosting platform of the local node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Platform {
    #[default]
    BareMetal,
    Azure,
    Aws,
    Gcp,
}

impl Platform {
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::BareMetal => "bare-metal",
            Platform::Azure => "azure",
            Platform::Aws => "aws",
            Platform::Gcp => "gcp",
        }
    }

    /// Map the DMI system vendor string to a platform.
    pub fn from_sys_vendor(vendor: &str) -> Self {
        let vendor = vendor.trim();
        if vendor.starts_with("Microsoft") {
            Platform::Azure
        } else if vendor.starts_with("Amazon") {
            Platform::Aws
        } else if vendor.starts_with("Google") {
            Platform::Gcp
        } else {
            Platform::BareMetal
        }
    }
}

impl FromStr for Platform {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bare-metal" | "baremetal" | "bare_metal" => Ok(Platform::BareMetal),
            "azure" => Ok(Platform::Azure),
            "aws" | "amazon" => Ok(Platform::Aws),
            "gcp" | "google" => Ok(Platform::Gcp),
            _ => Err(AppError::InvalidPlatform(s.to_string())),
        }
    }
}

impl TryFrom<String> for Platform {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Platform> for String {
    fn from(value: Platform) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
