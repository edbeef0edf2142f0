//! hana-ha: validate and provision SAP HANA System Replication high-availability clusters.

pub mod adapters;
pub mod app;
pub mod domain;
pub mod ports;

#[cfg(test)]
pub(crate) mod testing;

pub use app::api;
pub use app::api::{
    InstallOutcome, ProductSummary, ScenarioSummary, ValidateOutcome, describe, install, products,
    validate,
};
pub use app::config::{Answers, Settings, SettingsOverrides};
pub use domain::{AppError, ApplyReport, NodeRole, Platform, ScenarioConfiguration, SectionId};
