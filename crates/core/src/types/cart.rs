//! Cart line items and their identity rules.

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{OptionItemId, ProductId};
use super::money;
use super::status::PriceChannel;

/// A single line in a shopping cart.
///
/// Identity is the pair (product id, option item id set); the selection order
/// never matters for comparison. Price snapshot fields, when present, were
/// computed by the backend and are authoritative: local recomputation is
/// strictly a fallback for absent snapshots.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Product being ordered.
    pub product_id: ProductId,
    /// Display name as known at add time (may lag the catalog).
    #[serde(default)]
    pub product_name: Option<String>,
    /// Ordered quantity; always positive while in the cart.
    pub quantity: u32,
    /// Selected option items across all groups.
    #[serde(default)]
    pub option_item_ids: Vec<OptionItemId>,
    /// Legacy single-channel unit price snapshot.
    #[serde(with = "money::lenient_opt", default)]
    pub unit_price: Option<Decimal>,
    /// Legacy single-channel line total snapshot.
    #[serde(with = "money::lenient_opt", default)]
    pub total_price: Option<Decimal>,
    /// End-customer unit price snapshot.
    #[serde(with = "money::lenient_opt", default)]
    pub retail_unit_price: Option<Decimal>,
    /// End-customer line total snapshot.
    #[serde(with = "money::lenient_opt", default)]
    pub retail_total_price: Option<Decimal>,
    /// Distributor unit price snapshot.
    #[serde(with = "money::lenient_opt", default)]
    pub wholesale_unit_price: Option<Decimal>,
    /// Distributor line total snapshot.
    #[serde(with = "money::lenient_opt", default)]
    pub wholesale_total_price: Option<Decimal>,
}

impl CartLine {
    /// Create a bare line with no price snapshots.
    #[must_use]
    pub fn new(product_id: ProductId, quantity: u32, option_item_ids: Vec<OptionItemId>) -> Self {
        Self {
            product_id,
            product_name: None,
            quantity,
            option_item_ids,
            unit_price: None,
            total_price: None,
            retail_unit_price: None,
            retail_total_price: None,
            wholesale_unit_price: None,
            wholesale_total_price: None,
        }
    }

    /// The order-independent selection set used for identity comparison.
    #[must_use]
    pub fn option_set(&self) -> BTreeSet<OptionItemId> {
        self.option_item_ids.iter().copied().collect()
    }

    /// Whether this line refers to the same product + selection combination.
    #[must_use]
    pub fn same_identity(&self, product_id: ProductId, option_item_ids: &[OptionItemId]) -> bool {
        self.product_id == product_id
            && self.option_set() == option_item_ids.iter().copied().collect()
    }

    /// Server-computed unit price for a channel, if any.
    ///
    /// The channel snapshot wins over the legacy one; both being absent means
    /// the caller should fall back to local recomputation.
    #[must_use]
    pub const fn snapshot_unit_price(&self, channel: PriceChannel) -> Option<Decimal> {
        let channel_price = match channel {
            PriceChannel::Retail => self.retail_unit_price,
            PriceChannel::Wholesale => self.wholesale_unit_price,
        };
        match channel_price {
            Some(price) => Some(price),
            None => self.unit_price,
        }
    }

    /// Server-computed line total for a channel, if any.
    #[must_use]
    pub const fn snapshot_total_price(&self, channel: PriceChannel) -> Option<Decimal> {
        let channel_total = match channel {
            PriceChannel::Retail => self.retail_total_price,
            PriceChannel::Wholesale => self.wholesale_total_price,
        };
        match channel_total {
            Some(total) => Some(total),
            None => self.total_price,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_ignores_option_order() {
        let line = CartLine::new(
            ProductId::new(1),
            2,
            vec![OptionItemId::new(5), OptionItemId::new(3)],
        );
        assert!(line.same_identity(
            ProductId::new(1),
            &[OptionItemId::new(3), OptionItemId::new(5)]
        ));
        assert!(!line.same_identity(ProductId::new(1), &[OptionItemId::new(3)]));
        assert!(!line.same_identity(ProductId::new(2), &[]));
    }

    #[test]
    fn test_channel_snapshot_beats_legacy() {
        let mut line = CartLine::new(ProductId::new(1), 1, vec![]);
        line.unit_price = Some(Decimal::new(9000, 0));
        line.retail_unit_price = Some(Decimal::new(9500, 0));
        assert_eq!(
            line.snapshot_unit_price(PriceChannel::Retail),
            Some(Decimal::new(9500, 0))
        );
        // No wholesale snapshot: legacy fills in.
        assert_eq!(
            line.snapshot_unit_price(PriceChannel::Wholesale),
            Some(Decimal::new(9000, 0))
        );
    }

    #[test]
    fn test_wire_parsing_with_string_snapshots() {
        let line: CartLine = serde_json::from_value(serde_json::json!({
            "productId": 7,
            "quantity": 3,
            "optionItemIds": [1, 2],
            "retailUnitPrice": "4500",
        }))
        .unwrap();
        assert_eq!(line.retail_unit_price, Some(Decimal::new(4500, 0)));
        assert_eq!(line.unit_price, None);
    }
}
