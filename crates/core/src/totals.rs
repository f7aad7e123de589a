//! Order total aggregation: initial (as-ordered) vs. final (as-fulfilled).
//!
//! Everything here is pure and synchronous. Unresolvable numeric inputs
//! coerce to zero; aggregation never fails and never produces NaN-style
//! placeholders in a displayed total.
//!
//! The per-line final-amount precedence mirrors the backend contract:
//! explicit final snapshot, then terminal failure => 0, then fulfilled
//! quantity x unit price, then Completed-without-detail => full quantity,
//! then the initial snapshot/recomputation. Partially-completed lines with
//! no quantity detail fall through to the initial amount (treated as "no
//! fulfillment information yet"); whether that is the intended business rule
//! is a backend-contract question, not something this module can decide.

use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::pricing;
use crate::types::catalog::CatalogSnapshot;
use crate::types::id::ProductId;
use crate::types::money::amounts_match;
use crate::types::order::{Order, OrderLine};
use crate::types::status::{PriceChannel, ProductionStatus};

/// Display-ready order total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TotalDisplay {
    /// Initial and final agree within the half-cent tolerance.
    Unified(Decimal),
    /// Fulfillment changed the amount; show both figures side by side.
    Revised { initial: Decimal, r#final: Decimal },
}

impl TotalDisplay {
    /// The amount the customer is actually charged.
    #[must_use]
    pub const fn payable(&self) -> Decimal {
        match self {
            Self::Unified(amount) | Self::Revised { r#final: amount, .. } => *amount,
        }
    }
}

/// Resolved unit price for an order line: initial snapshot for the channel,
/// else local recomputation, else zero.
fn resolve_unit(line: &OrderLine, channel: PriceChannel, catalog: &CatalogSnapshot) -> Decimal {
    line.initial_unit_price(channel)
        .or_else(|| {
            catalog
                .get(&line.product_id)
                .map(|product| pricing::unit_price_for_ids(product, &line.option_item_ids))
        })
        .unwrap_or(Decimal::ZERO)
}

/// As-ordered amount for a line.
#[must_use]
pub fn line_initial_amount(
    line: &OrderLine,
    channel: PriceChannel,
    catalog: &CatalogSnapshot,
) -> Decimal {
    line.initial_total_price(channel).unwrap_or_else(|| {
        resolve_unit(line, channel, catalog) * Decimal::from(line.quantity)
    })
}

/// As-fulfilled amount for a line.
///
/// Invariant: once production or delivery has progressed, the result reflects
/// the actually produced/delivered quantity, never the ordered quantity.
#[must_use]
pub fn line_final_amount(
    line: &OrderLine,
    channel: PriceChannel,
    catalog: &CatalogSnapshot,
) -> Decimal {
    // 1. An explicit backend final snapshot is authoritative.
    if let Some(total) = line.final_total_price(channel) {
        return total;
    }

    // 2. Nothing was (or will be) fulfilled.
    if line.delivery_status.is_terminal_failure() || line.production_status.is_cancelled() {
        return Decimal::ZERO;
    }

    let unit = resolve_unit(line, channel, catalog);

    // 3. A known fulfilled quantity wins; delivered is preferred over
    //    produced when both are reported and anything was delivered.
    let delivered = line.delivered_quantity.filter(|&quantity| quantity > 0);
    let produced = line.produced_quantity.filter(|&quantity| quantity > 0);
    if let Some(quantity) = delivered.or(produced) {
        return unit * Decimal::from(quantity);
    }

    // 4. Production finished with no quantity detail: assume the full order.
    if line.production_status == ProductionStatus::Completed {
        return unit * Decimal::from(line.quantity);
    }

    // 5. No fulfillment information yet: fall back to the initial amount.
    line.initial_total_price(channel)
        .unwrap_or_else(|| unit * Decimal::from(line.quantity))
}

/// As-ordered total for a whole order, preferring the backend's own figure.
#[must_use]
pub fn order_initial_total(
    order: &Order,
    channel: PriceChannel,
    catalog: &CatalogSnapshot,
) -> Decimal {
    order.initial_total_amount(channel).unwrap_or_else(|| {
        order
            .lines
            .iter()
            .map(|line| line_initial_amount(line, channel, catalog))
            .sum()
    })
}

/// As-fulfilled total for a whole order, preferring the backend's own figure.
#[must_use]
pub fn order_final_total(
    order: &Order,
    channel: PriceChannel,
    catalog: &CatalogSnapshot,
) -> Decimal {
    order.final_total_amount(channel).unwrap_or_else(|| {
        order
            .lines
            .iter()
            .map(|line| line_final_amount(line, channel, catalog))
            .sum()
    })
}

/// Display-ready total: unified when initial and final agree within half a
/// cent, side-by-side otherwise.
#[must_use]
pub fn order_total_display(
    order: &Order,
    channel: PriceChannel,
    catalog: &CatalogSnapshot,
) -> TotalDisplay {
    let initial = order_initial_total(order, channel, catalog);
    let r#final = order_final_total(order, channel, catalog);
    if amounts_match(initial, r#final) {
        TotalDisplay::Unified(r#final)
    } else {
        TotalDisplay::Revised { initial, r#final }
    }
}

/// Per-product roll-up of a day's orders, for the distributor daily view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyProductSummary {
    pub product_id: ProductId,
    pub product_name: String,
    /// Units ordered across all lines.
    pub ordered: u32,
    /// Units reported produced.
    pub produced: u32,
    /// Units reported delivered.
    pub delivered: u32,
    /// Sum of as-fulfilled line amounts.
    pub final_amount: Decimal,
}

/// Fold a set of orders into per-product fulfillment summaries.
///
/// Output is sorted by product name for stable display.
#[must_use]
pub fn daily_rollup(
    orders: &[Order],
    channel: PriceChannel,
    catalog: &CatalogSnapshot,
) -> Vec<DailyProductSummary> {
    let mut by_product: HashMap<ProductId, DailyProductSummary> = HashMap::new();

    for order in orders {
        for line in &order.lines {
            let entry = by_product
                .entry(line.product_id)
                .or_insert_with(|| DailyProductSummary {
                    product_id: line.product_id,
                    product_name: line
                        .product_name
                        .clone()
                        .or_else(|| catalog.get(&line.product_id).map(|p| p.name.clone()))
                        .unwrap_or_else(|| format!("#{}", line.product_id)),
                    ordered: 0,
                    produced: 0,
                    delivered: 0,
                    final_amount: Decimal::ZERO,
                });
            entry.ordered += line.quantity;
            entry.produced += line.produced_quantity.unwrap_or(0);
            entry.delivered += line.delivered_quantity.unwrap_or(0);
            entry.final_amount += line_final_amount(line, channel, catalog);
        }
    }

    let mut summaries: Vec<DailyProductSummary> = by_product.into_values().collect();
    summaries.sort_by(|a, b| a.product_name.cmp(&b.product_name));
    summaries
}
