//! Products command implementation.

use crate::domain::AppError;

pub fn run_products() -> Result<(), AppError> {
    for product in crate::app::api::products() {
        println!("{} ({})", product.id, product.name);
        for scenario in product.scenarios {
            println!("  {} ({} nodes)", scenario.name, scenario.number_of_nodes);
            if !scenario.description.is_empty() {
                println!("    {}", scenario.description);
            }
        }
    }
    Ok(())
}
