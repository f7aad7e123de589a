//! Order and order line types, including fulfillment state.
//!
//! Order lines are created at checkout from the cart snapshot and thereafter
//! mutated only by backend production/delivery events. The client reads and
//! folds these values; it never writes them back.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{OptionItemId, OrderId, OrderItemId, ProductId, UserId};
use super::money;
use super::status::{DeliveryStatus, PriceChannel, ProductionStatus};

/// A line item on a placed order.
///
/// Superset of a cart line: carries fulfillment state plus "initial"
/// (as-ordered) and "final" (as-fulfilled) price snapshots. The invariant for
/// final amounts is that they reflect what was actually produced/delivered,
/// never the originally ordered quantity once fulfillment has progressed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    /// Order line ID.
    pub id: OrderItemId,
    /// Product ordered.
    pub product_id: ProductId,
    /// Product name at order time.
    #[serde(default)]
    pub product_name: Option<String>,
    /// Originally ordered quantity.
    pub quantity: u32,
    /// Selected option items.
    #[serde(default)]
    pub option_item_ids: Vec<OptionItemId>,
    /// Production progress.
    #[serde(default)]
    pub production_status: ProductionStatus,
    /// Delivery progress.
    #[serde(default)]
    pub delivery_status: DeliveryStatus,
    /// Quantity actually produced, when known.
    #[serde(default)]
    pub produced_quantity: Option<u32>,
    /// Quantity actually delivered, when known.
    #[serde(default)]
    pub delivered_quantity: Option<u32>,

    /// Legacy single-channel unit price snapshot.
    #[serde(with = "money::lenient_opt", default)]
    pub unit_price: Option<Decimal>,
    /// Legacy single-channel line total snapshot.
    #[serde(with = "money::lenient_opt", default)]
    pub total_price: Option<Decimal>,
    /// As-ordered retail unit price.
    #[serde(with = "money::lenient_opt", default)]
    pub initial_retail_unit_price: Option<Decimal>,
    /// As-ordered retail line total.
    #[serde(with = "money::lenient_opt", default)]
    pub initial_retail_total_price: Option<Decimal>,
    /// As-ordered wholesale unit price.
    #[serde(with = "money::lenient_opt", default)]
    pub initial_wholesale_unit_price: Option<Decimal>,
    /// As-ordered wholesale line total.
    #[serde(with = "money::lenient_opt", default)]
    pub initial_wholesale_total_price: Option<Decimal>,
    /// As-fulfilled retail line total.
    #[serde(with = "money::lenient_opt", default)]
    pub final_retail_total_price: Option<Decimal>,
    /// As-fulfilled wholesale line total.
    #[serde(with = "money::lenient_opt", default)]
    pub final_wholesale_total_price: Option<Decimal>,
}

impl OrderLine {
    /// As-ordered unit price snapshot for a channel, falling back to legacy.
    #[must_use]
    pub const fn initial_unit_price(&self, channel: PriceChannel) -> Option<Decimal> {
        let channel_price = match channel {
            PriceChannel::Retail => self.initial_retail_unit_price,
            PriceChannel::Wholesale => self.initial_wholesale_unit_price,
        };
        match channel_price {
            Some(price) => Some(price),
            None => self.unit_price,
        }
    }

    /// As-ordered line total snapshot for a channel, falling back to legacy.
    #[must_use]
    pub const fn initial_total_price(&self, channel: PriceChannel) -> Option<Decimal> {
        let channel_total = match channel {
            PriceChannel::Retail => self.initial_retail_total_price,
            PriceChannel::Wholesale => self.initial_wholesale_total_price,
        };
        match channel_total {
            Some(total) => Some(total),
            None => self.total_price,
        }
    }

    /// As-fulfilled line total snapshot for a channel, if the backend sent one.
    #[must_use]
    pub const fn final_total_price(&self, channel: PriceChannel) -> Option<Decimal> {
        match channel {
            PriceChannel::Retail => self.final_retail_total_price,
            PriceChannel::Wholesale => self.final_wholesale_total_price,
        }
    }
}

/// A placed order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Order ID.
    pub id: OrderId,
    /// Ordering customer.
    #[serde(default)]
    pub user_id: Option<UserId>,
    /// Customer display name.
    #[serde(default)]
    pub customer_name: Option<String>,
    /// When the order was placed.
    pub ordered_at: DateTime<Utc>,
    /// Requested delivery/pickup date, when scheduled.
    #[serde(default)]
    pub delivery_date: Option<chrono::NaiveDate>,
    /// Line items.
    #[serde(default)]
    pub lines: Vec<OrderLine>,

    /// Backend-computed as-ordered retail total.
    #[serde(with = "money::lenient_opt", default)]
    pub initial_retail_total_amount: Option<Decimal>,
    /// Backend-computed as-fulfilled retail total.
    #[serde(with = "money::lenient_opt", default)]
    pub final_retail_total_amount: Option<Decimal>,
    /// Backend-computed as-ordered wholesale total.
    #[serde(with = "money::lenient_opt", default)]
    pub initial_wholesale_total_amount: Option<Decimal>,
    /// Backend-computed as-fulfilled wholesale total.
    #[serde(with = "money::lenient_opt", default)]
    pub final_wholesale_total_amount: Option<Decimal>,
}

impl Order {
    /// Backend-computed as-ordered order total for a channel.
    #[must_use]
    pub const fn initial_total_amount(&self, channel: PriceChannel) -> Option<Decimal> {
        match channel {
            PriceChannel::Retail => self.initial_retail_total_amount,
            PriceChannel::Wholesale => self.initial_wholesale_total_amount,
        }
    }

    /// Backend-computed as-fulfilled order total for a channel.
    #[must_use]
    pub const fn final_total_amount(&self, channel: PriceChannel) -> Option<Decimal> {
        match channel {
            PriceChannel::Retail => self.final_retail_total_amount,
            PriceChannel::Wholesale => self.final_wholesale_total_amount,
        }
    }
}
