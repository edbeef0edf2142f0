pub mod apply_log;
pub mod catalog;
pub mod checks;
pub mod configuration;
pub mod description;
pub mod error;
pub mod node;
pub mod system_command;

pub use apply_log::{ApplyLog, ApplyReport, StepOutcome};
pub use catalog::{HANA_PRODUCT_ID, Product, Scenario, ScenarioCatalog};
pub use checks::{
    Check, CheckInput, CheckRecord, CheckTransaction, RESERVED_SIDS, SemanticChecks, Validation,
    Verbosity, error_string,
};
pub use configuration::{
    ApplySession, ClusterMembers, ClusterNode, CommunicationLayer, ConfigSection, Hana, Peer,
    ProductionConstraints, Ring, ScenarioConfiguration, SectionId, SectionValidation, Stonith,
    TransportMode, TypedConstraints, Watchdog,
};
pub use description::{Description, DescriptionEntry};
pub use error::AppError;
pub use node::{NodeRole, Platform};
pub use system_command::{CommandOutput, SystemCommand, sidadm};
