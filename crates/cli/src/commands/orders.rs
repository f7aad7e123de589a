//! Order history commands.

#![allow(clippy::print_stdout)]

use chrono::NaiveDate;

use bakeline_client::Bakeline;
use bakeline_client::error::Result;
use bakeline_client::orders::OrderApi;
use bakeline_core::totals::{TotalDisplay, line_final_amount, line_initial_amount};
use bakeline_core::{CatalogSnapshot, Order, OrderId, PriceChannel, ProductId};

fn format_total(display: &TotalDisplay) -> String {
    match display {
        TotalDisplay::Unified(amount) => amount.to_string(),
        TotalDisplay::Revised { initial, r#final } => {
            let revised = r#final;
            format!("{revised} (was {initial})")
        }
    }
}

async fn snapshot_for(app: &Bakeline, orders: &[Order]) -> Result<CatalogSnapshot> {
    let ids: Vec<ProductId> = orders
        .iter()
        .flat_map(|order| order.lines.iter().map(|line| line.product_id))
        .collect();
    app.catalog().snapshot(&ids).await
}

/// List orders, optionally restricted to one delivery date.
pub async fn list(app: &Bakeline, date: Option<NaiveDate>, channel: PriceChannel) -> Result<()> {
    let (orders, meta) = app.orders().list_orders(date).await?;
    let catalog = snapshot_for(app, &orders).await?;

    println!("{:<8} {:<12} {:<12} {:>20}", "ID", "ORDERED", "DELIVERY", "TOTAL");
    for order in &orders {
        let delivery = order
            .delivery_date
            .map_or_else(|| "-".to_string(), |date| date.to_string());
        let total = OrderApi::total_display(order, channel, &catalog);
        println!(
            "{:<8} {:<12} {:<12} {:>20}",
            order.id,
            order.ordered_at.date_naive(),
            delivery,
            format_total(&total),
        );
    }

    if let Some(pagination) = meta.pagination {
        println!(
            "page {}/{} ({} orders)",
            pagination.page, pagination.total_pages, pagination.total_items
        );
    }
    Ok(())
}

/// Show one order with per-line fulfillment state and amounts.
pub async fn show(app: &Bakeline, id: i64, channel: PriceChannel) -> Result<()> {
    let order = app.orders().get_order(OrderId::new(id)).await?;
    let catalog = snapshot_for(app, std::slice::from_ref(&order)).await?;

    println!("order #{}", order.id);
    if let Some(name) = &order.customer_name {
        println!("  customer: {name}");
    }
    println!("  ordered: {}", order.ordered_at);
    if let Some(date) = order.delivery_date {
        println!("  delivery: {date}");
    }

    for line in &order.lines {
        let name = line
            .product_name
            .clone()
            .or_else(|| catalog.get(&line.product_id).map(|p| p.name.clone()))
            .unwrap_or_else(|| format!("#{}", line.product_id));
        let initial = line_initial_amount(line, channel, &catalog);
        let fulfilled = line_final_amount(line, channel, &catalog);
        println!(
            "  {:<28} x{:<4} {:?}/{:?}  {initial} -> {fulfilled}",
            name, line.quantity, line.production_status, line.delivery_status,
        );
    }

    let total = OrderApi::total_display(&order, channel, &catalog);
    println!("  total: {}", format_total(&total));
    Ok(())
}
