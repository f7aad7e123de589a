//! Catalog types: products, option groups, and option items.
//!
//! These mirror the ordering backend's JSON shapes (camelCase keys, numeric
//! fields that may arrive as strings). Group and item order is meaningful and
//! preserved as received.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{OptionGroupId, OptionItemId, ProductId};
use super::money;
use super::status::ProductKind;

/// Group name conventionally used for flavor/filling selection.
///
/// Items in this group are free on additive products regardless of their
/// nominal price field. Matching is case-insensitive; this is a backend
/// naming convention, not a schema-level flag.
pub const FILLING_GROUP_NAME: &str = "filling";

/// In-memory catalog snapshot keyed by product id.
///
/// Populated from catalog fetches; used as the fallback source for local
/// price recomputation when a cart line carries no server price snapshot.
pub type CatalogSnapshot = HashMap<ProductId, Product>;

/// A selectable variant within an option group.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionItem {
    /// Option item ID.
    pub id: OptionItemId,
    /// Display name (e.g., "Chocolate", "Large Tray").
    pub name: String,
    /// Additive price adjustment. Unparseable values coerce to zero.
    #[serde(with = "money::lenient_price", default)]
    pub price: Decimal,
    /// Scaling factor for quantity-like variants (e.g., tray size).
    /// Absent or unparseable values stay absent.
    #[serde(with = "money::lenient_opt", default)]
    pub multiplier: Option<Decimal>,
}

/// A named set of selectable product variants (e.g., size, flavor).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionGroup {
    /// Option group ID.
    pub id: OptionGroupId,
    /// Group name (e.g., "Size", "Filling").
    pub name: String,
    /// Whether a selection in this group is mandatory at order time.
    #[serde(default)]
    pub is_required: bool,
    /// Whether multiple items may be selected (checkbox vs. single-select).
    #[serde(default)]
    pub allow_multiple: bool,
    /// Items in display order.
    #[serde(default)]
    pub option_items: Vec<OptionItem>,
}

impl OptionGroup {
    /// Whether this is the conventionally named flavor/filling group.
    #[must_use]
    pub fn is_filling(&self) -> bool {
        self.name.trim().eq_ignore_ascii_case(FILLING_GROUP_NAME)
    }

    /// Find an item in this group by display name.
    #[must_use]
    pub fn item_by_name(&self, name: &str) -> Option<&OptionItem> {
        self.option_items.iter().find(|item| item.name == name)
    }
}

/// A product in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Product ID.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Pricing category.
    #[serde(default)]
    pub kind: ProductKind,
    /// Base price before option adjustments.
    #[serde(with = "money::lenient_price", default)]
    pub base_price: Decimal,
    /// Plain text description.
    #[serde(default)]
    pub description: Option<String>,
    /// Product image URL.
    #[serde(default)]
    pub image_url: Option<String>,
    /// Option groups in display order.
    #[serde(default)]
    pub option_groups: Vec<OptionGroup>,
}

impl Product {
    /// Find an option item anywhere in this product, with its owning group.
    #[must_use]
    pub fn find_option_item(&self, id: OptionItemId) -> Option<(&OptionGroup, &OptionItem)> {
        self.option_groups.iter().find_map(|group| {
            group
                .option_items
                .iter()
                .find(|item| item.id == id)
                .map(|item| (group, item))
        })
    }

    /// Re-derive group membership for a set of selected option item ids.
    ///
    /// Returns group name -> selected item names, in the product's group
    /// order. Ids that no longer resolve to an item are dropped silently;
    /// stale references are tolerated, not errors.
    #[must_use]
    pub fn selections_for(&self, option_item_ids: &[OptionItemId]) -> Vec<(String, Vec<String>)> {
        self.option_groups
            .iter()
            .filter_map(|group| {
                let names: Vec<String> = group
                    .option_items
                    .iter()
                    .filter(|item| option_item_ids.contains(&item.id))
                    .map(|item| item.name.clone())
                    .collect();
                if names.is_empty() {
                    None
                } else {
                    Some((group.name.clone(), names))
                }
            })
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;

    /// A cake with tray sizes (multipliers) and a paid topping group.
    pub(crate) fn cake_product() -> Product {
        serde_json::from_value(serde_json::json!({
            "id": 1,
            "name": "Honey Cake",
            "kind": "CAKE",
            "basePrice": "10000",
            "optionGroups": [
                {
                    "id": 10,
                    "name": "Tray Size",
                    "isRequired": true,
                    "allowMultiple": false,
                    "optionItems": [
                        {"id": 101, "name": "Small", "price": 0, "multiplier": "1"},
                        {"id": 102, "name": "Double", "price": 0, "multiplier": 2},
                        {"id": 103, "name": "Triple", "price": 0, "multiplier": "3"}
                    ]
                },
                {
                    "id": 11,
                    "name": "Topping",
                    "allowMultiple": true,
                    "optionItems": [
                        {"id": 111, "name": "Nuts", "price": "500"},
                        {"id": 112, "name": "Jujube", "price": 700}
                    ]
                }
            ]
        }))
        .unwrap()
    }

    /// A baked good with a free filling group and a paid extras group.
    pub(crate) fn baked_product() -> Product {
        serde_json::from_value(serde_json::json!({
            "id": 2,
            "name": "Steamed Bun",
            "kind": "BAKED",
            "basePrice": 3000,
            "optionGroups": [
                {
                    "id": 20,
                    "name": "Filling",
                    "isRequired": true,
                    "optionItems": [
                        {"id": 201, "name": "Red Bean", "price": 1000},
                        {"id": 202, "name": "Chestnut", "price": "1500"}
                    ]
                },
                {
                    "id": 21,
                    "name": "Extras",
                    "allowMultiple": true,
                    "optionItems": [
                        {"id": 211, "name": "Gift Wrap", "price": 2000}
                    ]
                }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_catalog_wire_parsing() {
        let product = cake_product();
        assert_eq!(product.kind, ProductKind::Cake);
        assert_eq!(product.base_price, Decimal::new(10_000, 0));
        let (group, item) = product.find_option_item(OptionItemId::new(102)).unwrap();
        assert_eq!(group.name, "Tray Size");
        assert_eq!(item.multiplier, Some(Decimal::new(2, 0)));
    }

    #[test]
    fn test_filling_group_detection() {
        let product = baked_product();
        assert!(product.option_groups[0].is_filling());
        assert!(!product.option_groups[1].is_filling());
    }

    #[test]
    fn test_selections_drop_stale_ids() {
        let product = cake_product();
        let selections = product.selections_for(&[
            OptionItemId::new(102),
            OptionItemId::new(111),
            OptionItemId::new(999), // stale
        ]);
        assert_eq!(
            selections,
            vec![
                ("Tray Size".to_string(), vec!["Double".to_string()]),
                ("Topping".to_string(), vec!["Nuts".to_string()]),
            ]
        );
    }
}
