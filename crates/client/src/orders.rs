//! Orders: checkout, history, and the distributor daily view.
//!
//! Total arithmetic lives in `bakeline_core::totals`; this module only moves
//! orders over the wire and feeds them to the pure roll-ups.

use chrono::NaiveDate;

use bakeline_core::totals::{self, TotalDisplay};
use bakeline_core::{CatalogSnapshot, Order, OrderId, PriceChannel};

use crate::api::ApiClient;
use crate::envelope::Meta;
use crate::error::Result;

/// Client for order endpoints.
#[derive(Clone)]
pub struct OrderApi {
    api: ApiClient,
}

impl OrderApi {
    /// Create an order client sharing the given transport.
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Place an order from the current server cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, including business rejections
    /// such as an empty cart.
    pub async fn checkout(&self) -> Result<Order> {
        let order: Order = self.api.post("/orders", &serde_json::json!({})).await?;
        tracing::info!(order_id = %order.id, "order placed");
        Ok(order)
    }

    /// List the caller's orders, optionally restricted to a delivery date.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list_orders(&self, date: Option<NaiveDate>) -> Result<(Vec<Order>, Meta)> {
        let path = date.map_or_else(
            || "/orders".to_string(),
            |date| format!("/orders?date={date}"),
        );
        self.api.get_with_meta(&path).await
    }

    /// Fetch a single order.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the order does not exist.
    pub async fn get_order(&self, id: OrderId) -> Result<Order> {
        self.api.get(&format!("/orders/{id}")).await
    }

    /// Display-ready total for an order: unified when the as-ordered and
    /// as-fulfilled amounts agree, side-by-side otherwise.
    #[must_use]
    pub fn total_display(
        order: &Order,
        channel: PriceChannel,
        catalog: &CatalogSnapshot,
    ) -> TotalDisplay {
        totals::order_total_display(order, channel, catalog)
    }
}
