//! Cart commands.

#![allow(clippy::print_stdout)]

use bakeline_client::Bakeline;
use bakeline_client::error::Result;
use bakeline_core::cart::{Cart, resolve_line_total};
use bakeline_core::{CatalogSnapshot, OptionItemId, PriceChannel, ProductId};

fn option_ids(raw: &[i64]) -> Vec<OptionItemId> {
    raw.iter().copied().map(OptionItemId::new).collect()
}

async fn snapshot_for(app: &Bakeline, cart: &Cart) -> Result<CatalogSnapshot> {
    let ids: Vec<ProductId> = cart.lines().iter().map(|line| line.product_id).collect();
    app.catalog().snapshot(&ids).await
}

fn print_cart(cart: &Cart, channel: PriceChannel, catalog: &CatalogSnapshot) {
    if cart.is_empty() {
        println!("(cart is empty)");
        return;
    }

    for line in cart.lines() {
        let name = line
            .product_name
            .clone()
            .or_else(|| catalog.get(&line.product_id).map(|p| p.name.clone()))
            .unwrap_or_else(|| format!("#{}", line.product_id));
        let total = resolve_line_total(line, channel, catalog)
            .map_or_else(|| "-".to_string(), |total| total.to_string());
        let options = catalog
            .get(&line.product_id)
            .map(|product| {
                product
                    .selections_for(&line.option_item_ids)
                    .into_iter()
                    .flat_map(|(_, items)| items)
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .unwrap_or_default();

        println!("{:<30} x{:<4} {:>10}  {options}", name, line.quantity, total);
    }
    println!("{:>46}", format!("subtotal: {}", cart.subtotal(channel, catalog)));
}

/// Show the current cart with resolved prices.
pub async fn show(app: &Bakeline, channel: PriceChannel) -> Result<()> {
    let cart = app.cart().fetch().await?;
    let catalog = snapshot_for(app, &cart).await?;
    print_cart(&cart, channel, &catalog);
    Ok(())
}

/// Add a product, merging with an existing identical line.
pub async fn add(app: &Bakeline, id: i64, quantity: u32, options: &[i64]) -> Result<()> {
    let cart = app
        .cart()
        .add(ProductId::new(id), quantity, option_ids(options))
        .await?;
    let catalog = snapshot_for(app, &cart).await?;
    print_cart(&cart, PriceChannel::Retail, &catalog);
    Ok(())
}

/// Remove a line by product + selection identity.
pub async fn remove(app: &Bakeline, id: i64, options: &[i64]) -> Result<()> {
    let cart = app
        .cart()
        .remove(ProductId::new(id), &option_ids(options))
        .await?;
    let catalog = snapshot_for(app, &cart).await?;
    print_cart(&cart, PriceChannel::Retail, &catalog);
    Ok(())
}

/// Set a line's quantity.
pub async fn set_quantity(app: &Bakeline, id: i64, quantity: u32, options: &[i64]) -> Result<()> {
    let cart = app
        .cart()
        .set_quantity(ProductId::new(id), &option_ids(options), quantity)
        .await?;
    let catalog = snapshot_for(app, &cart).await?;
    print_cart(&cart, PriceChannel::Retail, &catalog);
    Ok(())
}

/// Empty the cart.
pub async fn clear(app: &Bakeline) -> Result<()> {
    app.cart().clear().await?;
    println!("cart cleared");
    Ok(())
}

/// Place an order from the current cart.
pub async fn checkout(app: &Bakeline) -> Result<()> {
    let order = app.orders().checkout().await?;
    println!("order #{} placed ({} lines)", order.id, order.lines.len());
    Ok(())
}
