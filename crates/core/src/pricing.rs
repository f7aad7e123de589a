//! Unit-price calculation over product option groups.
//!
//! The calculator is total: it never fails. Incomplete or stale inputs
//! degrade to the base price (or zero after clamping), because a price is
//! always needed for display even when the catalog and the cart disagree.
//!
//! # Rules
//!
//! Cake products (multiplicative category):
//! - selected items with a multiplier above 1 compete for a single running
//!   maximum; multipliers never stack
//! - every other selected item adds its price to the base
//! - result = (base + additive selections) x max multiplier (default 1)
//!
//! Baked products (additive category):
//! - every selected item adds its price to the base, except items in the
//!   filling group, which are free regardless of their nominal price

use rust_decimal::Decimal;

use crate::types::catalog::{OptionGroup, OptionItem, Product};
use crate::types::id::OptionItemId;
use crate::types::status::ProductKind;

/// Selected option names per group: (group name, selected item names).
pub type Selections = [(String, Vec<String>)];

/// Compute the unit price of a product given named selections per group.
///
/// Selection names that do not resolve to an item in their group are ignored;
/// that is a defined tolerance for stale references, not an error. The result
/// is clamped to be non-negative.
#[must_use]
pub fn unit_price(product: &Product, selections: &Selections) -> Decimal {
    let price = match product.kind {
        ProductKind::Cake => cake_price(product, selections),
        ProductKind::Baked => baked_price(product, selections),
    };
    price.max(Decimal::ZERO)
}

/// Compute the unit price from selected option item ids.
///
/// Group membership is re-derived from the product's own option groups, so a
/// line whose selections predate a catalog change simply loses the stale ids.
#[must_use]
pub fn unit_price_for_ids(product: &Product, option_item_ids: &[OptionItemId]) -> Decimal {
    unit_price(product, &product.selections_for(option_item_ids))
}

fn selected_items<'a>(
    group: &'a OptionGroup,
    selections: &'a Selections,
) -> impl Iterator<Item = &'a OptionItem> {
    selections
        .iter()
        .filter(|(name, _)| *name == group.name)
        .flat_map(|(_, names)| names.iter())
        .filter_map(|name| group.item_by_name(name))
}

fn cake_price(product: &Product, selections: &Selections) -> Decimal {
    let mut additive = product.base_price;
    let mut max_multiplier = Decimal::ONE;

    for group in &product.option_groups {
        for item in selected_items(group, selections) {
            match item.multiplier {
                Some(multiplier) if multiplier > Decimal::ONE => {
                    max_multiplier = max_multiplier.max(multiplier);
                }
                _ => additive += item.price,
            }
        }
    }

    additive * max_multiplier
}

fn baked_price(product: &Product, selections: &Selections) -> Decimal {
    let mut price = product.base_price;

    for group in &product.option_groups {
        if group.is_filling() {
            continue;
        }
        for item in selected_items(group, selections) {
            price += item.price;
        }
    }

    price
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::catalog::tests::{baked_product, cake_product};

    fn dec(n: i64) -> Decimal {
        Decimal::new(n, 0)
    }

    fn select(pairs: &[(&str, &[&str])]) -> Vec<(String, Vec<String>)> {
        pairs
            .iter()
            .map(|(group, names)| {
                (
                    (*group).to_string(),
                    names.iter().map(ToString::to_string).collect(),
                )
            })
            .collect()
    }

    #[test]
    fn test_cake_additive_only_selections() {
        // base 10000 + nuts 500 + jujube 700, multiplier stays 1
        let product = cake_product();
        let selections = select(&[("Topping", &["Nuts", "Jujube"])]);
        assert_eq!(unit_price(&product, &selections), dec(11_200));
    }

    #[test]
    fn test_cake_multiplier_applies_after_additions() {
        // (10000 + 500) * 2
        let product = cake_product();
        let selections = select(&[("Tray Size", &["Double"]), ("Topping", &["Nuts"])]);
        assert_eq!(unit_price(&product, &selections), dec(21_000));
    }

    #[test]
    fn test_cake_multipliers_do_not_stack() {
        // max(2, 3) = 3, not 6
        let product = cake_product();
        let selections = select(&[("Tray Size", &["Double", "Triple"])]);
        assert_eq!(unit_price(&product, &selections), dec(30_000));
    }

    #[test]
    fn test_cake_unit_multiplier_is_additive() {
        // "Small" has multiplier 1: price adds (0 here), no scaling
        let product = cake_product();
        let selections = select(&[("Tray Size", &["Small"])]);
        assert_eq!(unit_price(&product, &selections), dec(10_000));
    }

    #[test]
    fn test_baked_filling_is_free() {
        // filling nominally 1500 contributes 0; extras count
        let product = baked_product();
        let selections = select(&[("Filling", &["Chestnut"]), ("Extras", &["Gift Wrap"])]);
        assert_eq!(unit_price(&product, &selections), dec(5000));
    }

    #[test]
    fn test_unknown_selection_names_ignored() {
        let product = baked_product();
        let selections = select(&[("Extras", &["Discontinued Thing"]), ("No Such Group", &["X"])]);
        assert_eq!(unit_price(&product, &selections), dec(3000));
    }

    #[test]
    fn test_empty_selection_is_base_price() {
        assert_eq!(unit_price(&cake_product(), &[]), dec(10_000));
    }

    #[test]
    fn test_price_by_ids_rederives_groups() {
        use crate::types::id::OptionItemId;
        let product = cake_product();
        // Double tray + nuts, plus a stale id that must be ignored
        let price = unit_price_for_ids(
            &product,
            &[
                OptionItemId::new(102),
                OptionItemId::new(111),
                OptionItemId::new(404),
            ],
        );
        assert_eq!(price, dec(21_000));
    }
}
