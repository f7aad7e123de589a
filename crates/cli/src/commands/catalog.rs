//! Catalog browsing commands.

#![allow(clippy::print_stdout)]

use bakeline_client::Bakeline;
use bakeline_client::error::Result;
use bakeline_core::ProductId;

/// List all products.
pub async fn list(app: &Bakeline) -> Result<()> {
    let products = app.catalog().list_products().await?;

    println!("{:<6} {:<30} {:<6} {:>10}", "ID", "NAME", "KIND", "BASE");
    for product in products.iter() {
        println!(
            "{:<6} {:<30} {:<6} {:>10}",
            product.id,
            product.name,
            format!("{:?}", product.kind).to_lowercase(),
            product.base_price,
        );
    }
    Ok(())
}

/// Show one product with its option groups and items.
pub async fn show(app: &Bakeline, id: i64) -> Result<()> {
    let product = app.catalog().get_product(ProductId::new(id)).await?;

    println!("{} (#{})", product.name, product.id);
    println!("  kind: {:?}", product.kind);
    println!("  base price: {}", product.base_price);
    if let Some(description) = &product.description {
        println!("  {description}");
    }

    for group in &product.option_groups {
        let flags = match (group.is_required, group.allow_multiple) {
            (true, true) => " (required, multiple)",
            (true, false) => " (required)",
            (false, true) => " (multiple)",
            (false, false) => "",
        };
        println!("  {}{flags}", group.name);
        for item in &group.option_items {
            match item.multiplier {
                Some(multiplier) => {
                    println!("    [{}] {} x{multiplier}", item.id, item.name);
                }
                None => println!("    [{}] {} +{}", item.id, item.name, item.price),
            }
        }
    }
    Ok(())
}
