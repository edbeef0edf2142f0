use serde::Serialize;

use crate::domain::ScenarioCatalog;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScenarioSummary {
    pub name: String,
    pub number_of_nodes: usize,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductSummary {
    pub id: String,
    pub name: String,
    pub scenarios: Vec<ScenarioSummary>,
}

pub fn execute(catalog: &ScenarioCatalog) -> Vec<ProductSummary> {
    catalog
        .products()
        .iter()
        .map(|product| ProductSummary {
            id: product.id.clone(),
            name: product.name.clone(),
            scenarios: product
                .scenarios
                .iter()
                .map(|scenario| ScenarioSummary {
                    name: scenario.name.clone(),
                    number_of_nodes: scenario.number_of_nodes,
                    description: scenario.description.trim().to_string(),
                })
                .collect(),
        })
        .collect()
}
