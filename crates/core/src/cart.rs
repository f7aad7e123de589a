//! Cart line collection with merge, reorder, and price-resolution semantics.
//!
//! The cart is an ordered list. Mutations preserve the display order of
//! untouched lines: new lines append, existing lines keep their position,
//! and a wholesale replacement from a server refetch is re-sorted to match
//! the previous local order before new lines are appended.

use rust_decimal::Decimal;

use crate::pricing;
use crate::types::cart::CartLine;
use crate::types::catalog::CatalogSnapshot;
use crate::types::id::{OptionItemId, ProductId};
use crate::types::status::PriceChannel;

/// An ordered collection of cart lines.
#[derive(Debug, Clone, Default)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Wrap lines already in display order.
    #[must_use]
    pub const fn from_lines(lines: Vec<CartLine>) -> Self {
        Self { lines }
    }

    /// Lines in display order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Consume the cart, yielding its lines.
    #[must_use]
    pub fn into_lines(self) -> Vec<CartLine> {
        self.lines
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn unit_count(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }

    fn position_of(&self, product_id: ProductId, option_item_ids: &[OptionItemId]) -> Option<usize> {
        self.lines
            .iter()
            .position(|line| line.same_identity(product_id, option_item_ids))
    }

    /// Add a line, merging into an existing identity match.
    ///
    /// A match sums quantities and drops the matched line's total snapshots
    /// (they no longer describe the merged quantity; unit snapshots remain
    /// valid). A new identity appends.
    pub fn add(&mut self, line: CartLine) {
        if let Some(index) = self.position_of(line.product_id, &line.option_item_ids)
            && let Some(existing) = self.lines.get_mut(index)
        {
            existing.quantity += line.quantity;
            existing.total_price = None;
            existing.retail_total_price = None;
            existing.wholesale_total_price = None;
        } else {
            self.lines.push(line);
        }
    }

    /// Remove the line with this identity. Missing targets are a no-op.
    pub fn remove(&mut self, product_id: ProductId, option_item_ids: &[OptionItemId]) {
        if let Some(index) = self.position_of(product_id, option_item_ids) {
            self.lines.remove(index);
        }
    }

    /// Set the quantity of the line with this identity.
    ///
    /// Returns whether a line was found. Translating a non-positive quantity
    /// into a removal is the caller's responsibility; this method does not
    /// auto-remove at zero.
    pub fn set_quantity(
        &mut self,
        product_id: ProductId,
        option_item_ids: &[OptionItemId],
        quantity: u32,
    ) -> bool {
        if let Some(index) = self.position_of(product_id, option_item_ids)
            && let Some(line) = self.lines.get_mut(index)
        {
            line.quantity = quantity;
            line.total_price = None;
            line.retail_total_price = None;
            line.wholesale_total_price = None;
            true
        } else {
            false
        }
    }

    /// Remove all lines.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Replace the cart with freshly fetched lines, keeping local order.
    ///
    /// Lines whose identity was already present keep their previous relative
    /// positions; lines new to the cart append in server order. Lines the
    /// server no longer reports disappear.
    pub fn replace_preserving_order(&mut self, fetched: Vec<CartLine>) {
        let mut incoming = fetched;
        let mut reordered = Vec::with_capacity(incoming.len());

        for known in &self.lines {
            if let Some(index) = incoming
                .iter()
                .position(|line| line.same_identity(known.product_id, &known.option_item_ids))
            {
                reordered.push(incoming.remove(index));
            }
        }
        reordered.extend(incoming);

        self.lines = reordered;
    }

    /// Displayed subtotal: sum of resolved line totals, skipping lines with
    /// no resolvable price (those render a placeholder instead).
    #[must_use]
    pub fn subtotal(&self, channel: PriceChannel, catalog: &CatalogSnapshot) -> Decimal {
        self.lines
            .iter()
            .filter_map(|line| resolve_line_total(line, channel, catalog))
            .sum()
    }
}

/// Resolve a line's displayed unit price.
///
/// Precedence: channel snapshot, then legacy snapshot, then local
/// recomputation against the catalog snapshot. `None` means no source could
/// resolve and the UI should show a neutral placeholder rather than a number.
#[must_use]
pub fn resolve_unit_price(
    line: &CartLine,
    channel: PriceChannel,
    catalog: &CatalogSnapshot,
) -> Option<Decimal> {
    line.snapshot_unit_price(channel).or_else(|| {
        catalog
            .get(&line.product_id)
            .map(|product| pricing::unit_price_for_ids(product, &line.option_item_ids))
    })
}

/// Resolve a line's displayed total, preferring a server total snapshot.
#[must_use]
pub fn resolve_line_total(
    line: &CartLine,
    channel: PriceChannel,
    catalog: &CatalogSnapshot,
) -> Option<Decimal> {
    line.snapshot_total_price(channel).or_else(|| {
        resolve_unit_price(line, channel, catalog)
            .map(|unit| unit * Decimal::from(line.quantity))
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::catalog::tests::{baked_product, cake_product};

    fn ids(raw: &[i64]) -> Vec<OptionItemId> {
        raw.iter().copied().map(OptionItemId::new).collect()
    }

    fn catalog() -> CatalogSnapshot {
        [cake_product(), baked_product()]
            .into_iter()
            .map(|product| (product.id, product))
            .collect()
    }

    #[test]
    fn test_add_merges_identity_match() {
        let mut cart = Cart::new();
        cart.add(CartLine::new(ProductId::new(1), 2, ids(&[102, 111])));
        // Same selection in a different order merges, never duplicates.
        cart.add(CartLine::new(ProductId::new(1), 3, ids(&[111, 102])));
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].quantity, 5);
    }

    #[test]
    fn test_add_appends_different_options() {
        let mut cart = Cart::new();
        cart.add(CartLine::new(ProductId::new(1), 1, ids(&[102])));
        cart.add(CartLine::new(ProductId::new(1), 1, ids(&[103])));
        assert_eq!(cart.lines().len(), 2);
    }

    #[test]
    fn test_merge_drops_stale_total_snapshots() {
        let mut first = CartLine::new(ProductId::new(2), 1, ids(&[201]));
        first.retail_unit_price = Some(Decimal::new(3000, 0));
        first.retail_total_price = Some(Decimal::new(3000, 0));
        let mut cart = Cart::new();
        cart.add(first);
        cart.add(CartLine::new(ProductId::new(2), 2, ids(&[201])));

        let merged = &cart.lines()[0];
        assert_eq!(merged.quantity, 3);
        assert_eq!(merged.retail_unit_price, Some(Decimal::new(3000, 0)));
        assert_eq!(merged.retail_total_price, None);
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut cart = Cart::new();
        cart.add(CartLine::new(ProductId::new(1), 1, ids(&[102])));
        cart.remove(ProductId::new(1), &ids(&[103]));
        cart.remove(ProductId::new(9), &[]);
        assert_eq!(cart.lines().len(), 1);
    }

    #[test]
    fn test_set_quantity_does_not_auto_remove_at_zero() {
        let mut cart = Cart::new();
        cart.add(CartLine::new(ProductId::new(1), 4, ids(&[102])));
        assert!(cart.set_quantity(ProductId::new(1), &ids(&[102]), 0));
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].quantity, 0);
        assert!(!cart.set_quantity(ProductId::new(8), &[], 2));
    }

    #[test]
    fn test_replace_preserves_local_order() {
        let mut cart = Cart::new();
        cart.add(CartLine::new(ProductId::new(1), 1, ids(&[102])));
        cart.add(CartLine::new(ProductId::new(2), 1, ids(&[201])));
        cart.add(CartLine::new(ProductId::new(1), 1, ids(&[103])));

        // Server returns the same cart in a different order, plus one new line.
        cart.replace_preserving_order(vec![
            CartLine::new(ProductId::new(1), 2, ids(&[103])),
            CartLine::new(ProductId::new(2), 9, ids(&[202])),
            CartLine::new(ProductId::new(2), 1, ids(&[201])),
            CartLine::new(ProductId::new(1), 1, ids(&[102])),
        ]);

        let order: Vec<(i64, u32)> = cart
            .lines()
            .iter()
            .map(|line| (line.product_id.as_i64(), line.quantity))
            .collect();
        // Known lines keep positions (with refreshed quantities); new line appends.
        assert_eq!(order, vec![(1, 1), (2, 1), (1, 2), (2, 9)]);
    }

    #[test]
    fn test_price_resolution_prefers_snapshots() {
        let catalog = catalog();
        let mut line = CartLine::new(ProductId::new(1), 2, ids(&[102]));

        // No snapshot: local recomputation (10000 * 2 tray) = 20000.
        assert_eq!(
            resolve_unit_price(&line, PriceChannel::Retail, &catalog),
            Some(Decimal::new(20_000, 0))
        );

        line.unit_price = Some(Decimal::new(19_000, 0));
        line.retail_unit_price = Some(Decimal::new(19_500, 0));
        assert_eq!(
            resolve_unit_price(&line, PriceChannel::Retail, &catalog),
            Some(Decimal::new(19_500, 0))
        );
        assert_eq!(
            resolve_line_total(&line, PriceChannel::Retail, &catalog),
            Some(Decimal::new(39_000, 0))
        );
    }

    #[test]
    fn test_unresolvable_line_yields_none_and_is_skipped() {
        let catalog = catalog();
        let unknown = CartLine::new(ProductId::new(77), 1, vec![]);
        assert_eq!(
            resolve_unit_price(&unknown, PriceChannel::Retail, &catalog),
            None
        );

        let mut cart = Cart::new();
        cart.add(CartLine::new(ProductId::new(2), 1, ids(&[211])));
        cart.add(unknown);
        // Subtotal counts the resolvable line only: 3000 + 2000 gift wrap.
        assert_eq!(
            cart.subtotal(PriceChannel::Retail, &catalog),
            Decimal::new(5000, 0)
        );
    }
}
