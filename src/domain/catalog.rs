//! Product and scenario catalog.

use serde::Deserialize;

/// Product id whose scenarios require the HANA section.
pub const HANA_PRODUCT_ID: &str = "HANA";

/// Deployment scenario offered by a product.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Scenario {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub number_of_nodes: usize,
}

/// Product with its scenarios.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Product {
    pub id: String,
    #[serde(rename = "string_name")]
    pub name: String,
    #[serde(default)]
    pub scenarios: Vec<Scenario>,
}

impl Product {
    pub fn scenario(&self, name: &str) -> Option<&Scenario> {
        self.scenarios.iter().find(|s| s.name == name)
    }

    pub fn requires_hana(&self) -> bool {
        self.id == HANA_PRODUCT_ID
    }
}

#[derive(Debug, Deserialize)]
struct CatalogEntry {
    product: Product,
}

/// Immutable catalog loaded once per process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScenarioCatalog {
    products: Vec<Product>,
}

impl ScenarioCatalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// Parse the catalog document.
    ///
    /// Entries that do not match the schema are skipped, and a document that is not a
    /// YAML sequence yields an empty catalog: lookups then report the product as not
    /// found.
    pub fn from_yaml(content: &str) -> Self {
        let entries: Vec<serde_yaml::Value> = match serde_yaml::from_str(content) {
            Ok(entries) => entries,
            Err(err) => {
                tracing::warn!("Scenario catalog is not a list of products: {}", err);
                return Self::default();
            }
        };

        let mut products = Vec::new();
        for (index, entry) in entries.into_iter().enumerate() {
            match serde_yaml::from_value::<CatalogEntry>(entry) {
                Ok(entry) => products.push(entry.product),
                Err(err) => tracing::warn!("Skipping catalog entry #{}: {}", index, err),
            }
        }
        Self { products }
    }

    pub fn product(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }
}
