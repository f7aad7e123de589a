//! Status and category enums for catalog and fulfillment entities.

use serde::{Deserialize, Serialize};

/// Pricing category of a product.
///
/// The two categories price their option selections differently:
/// - [`Cake`](Self::Cake): tray-size options carry a multiplier; only the
///   largest selected multiplier applies, on top of flat add-ons.
/// - [`Baked`](Self::Baked): flat add-ons only, and the filling-selection
///   group is free.
///
/// Unknown wire values deserialize as `Baked` (the additive rules are the
/// safe default for a category we do not recognize).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductKind {
    Cake,
    #[default]
    #[serde(other)]
    Baked,
}

/// Production progress of an order line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductionStatus {
    #[default]
    Pending,
    PartiallyCompleted,
    Completed,
    Cancelled,
}

impl ProductionStatus {
    /// Whether this status means the line will never be produced.
    #[must_use]
    pub const fn is_cancelled(self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Delivery progress of an order line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryStatus {
    #[default]
    Pending,
    ReadyForDelivery,
    PartiallyDelivered,
    Delivered,
    Failed,
    Cancelled,
}

impl DeliveryStatus {
    /// Whether this status means nothing will be delivered.
    #[must_use]
    pub const fn is_terminal_failure(self) -> bool {
        matches!(self, Self::Failed | Self::Cancelled)
    }
}

/// Which priced view of a line item applies: end-customer or distributor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PriceChannel {
    #[default]
    Retail,
    Wholesale,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_format() {
        let s: DeliveryStatus = serde_json::from_str("\"READY_FOR_DELIVERY\"").unwrap();
        assert_eq!(s, DeliveryStatus::ReadyForDelivery);
        assert_eq!(
            serde_json::to_string(&ProductionStatus::PartiallyCompleted).unwrap(),
            "\"PARTIALLY_COMPLETED\""
        );
    }

    #[test]
    fn test_unknown_product_kind_defaults_to_baked() {
        let kind: ProductKind = serde_json::from_str("\"SEASONAL_SPECIAL\"").unwrap();
        assert_eq!(kind, ProductKind::Baked);
    }

    #[test]
    fn test_terminal_failure() {
        assert!(DeliveryStatus::Failed.is_terminal_failure());
        assert!(DeliveryStatus::Cancelled.is_terminal_failure());
        assert!(!DeliveryStatus::PartiallyDelivered.is_terminal_failure());
    }
}
