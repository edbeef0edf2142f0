mod scenario_fixture;

pub use scenario_fixture::{test_catalog, valid_hana_configuration};
