//! Bakeline Client - Typed client for the Bakeline ordering API.
//!
//! # Architecture
//!
//! - The backend is the source of truth for carts, orders, and prices; this
//!   crate keeps only display state and a guest cart on disk
//! - Every response goes through [`envelope`] normalization, so callers see
//!   typed [`error::ApiError`]s and never a raw transport failure
//! - Catalog reads are cached in-memory via `moka` (5 minute TTL)
//! - Page-level failures (5xx, lost connection, expired session) are
//!   published on an explicit [`events::SignalBus`] instead of being smuggled
//!   through ambient channels
//!
//! # Example
//!
//! ```rust,ignore
//! use bakeline_client::{Bakeline, config::ClientConfig};
//!
//! let app = Bakeline::new(ClientConfig::from_env()?)?;
//!
//! let products = app.catalog().list_products().await?;
//! app.cart()
//!     .add(products[0].id, 2, vec![])
//!     .await?;
//! let order = app.orders().checkout().await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod config;
pub mod envelope;
pub mod error;
pub mod events;
pub mod orders;
pub mod session;
pub mod upload;

use chrono::NaiveDate;

use bakeline_core::totals::{self, DailyProductSummary};
use bakeline_core::{PriceChannel, ProductId};

use config::ClientConfig;
use error::Result;

/// Entry point bundling the shared client state.
///
/// Cheaply cloneable; all services share one HTTP client, one session store,
/// and one signal bus.
#[derive(Clone)]
pub struct Bakeline {
    api: api::ApiClient,
    catalog: catalog::CatalogApi,
    cart: cart::CartService,
    orders: orders::OrderApi,
    uploads: upload::UploadApi,
    auth: auth::AuthApi,
}

impl Bakeline {
    /// Wire up all services from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let signals = events::SignalBus::new();
        let session = session::SessionStore::load(config.session_file.clone());
        let api = api::ApiClient::new(&config, session, signals)?;
        let catalog = catalog::CatalogApi::new(api.clone());
        let cart = cart::CartService::new(api.clone(), config.cart_file.clone());
        let orders = orders::OrderApi::new(api.clone());
        let uploads = upload::UploadApi::new(api.clone());
        let auth = auth::AuthApi::new(api.clone(), cart.clone());

        Ok(Self {
            api,
            catalog,
            cart,
            orders,
            uploads,
            auth,
        })
    }

    /// Catalog browsing (cached).
    #[must_use]
    pub const fn catalog(&self) -> &catalog::CatalogApi {
        &self.catalog
    }

    /// Cart operations (server-backed, guest fallback).
    #[must_use]
    pub const fn cart(&self) -> &cart::CartService {
        &self.cart
    }

    /// Orders and the distributor daily view.
    #[must_use]
    pub const fn orders(&self) -> &orders::OrderApi {
        &self.orders
    }

    /// File uploads.
    #[must_use]
    pub const fn uploads(&self) -> &upload::UploadApi {
        &self.uploads
    }

    /// Login, logout, and session state.
    #[must_use]
    pub const fn auth(&self) -> &auth::AuthApi {
        &self.auth
    }

    /// Subscribe to page-level signals (critical errors, notifications,
    /// session expiry).
    #[must_use]
    pub fn signals(&self) -> tokio::sync::broadcast::Receiver<events::Signal> {
        self.api.signals().subscribe()
    }

    /// Distributor daily view: a date's orders folded into per-product
    /// produced/delivered summaries.
    ///
    /// Fetches the day's orders, then the catalog snapshots for every
    /// product they reference, so recompute-based amounts see real prices.
    ///
    /// # Errors
    ///
    /// Returns an error if the orders or catalog cannot be fetched.
    pub async fn daily_summary(
        &self,
        date: NaiveDate,
        channel: PriceChannel,
    ) -> Result<Vec<DailyProductSummary>> {
        let (orders, _) = self.orders.list_orders(Some(date)).await?;
        let ids: Vec<ProductId> = orders
            .iter()
            .flat_map(|order| order.lines.iter().map(|line| line.product_id))
            .collect();
        let catalog = self.catalog.snapshot(&ids).await?;
        Ok(totals::daily_rollup(&orders, channel, &catalog))
    }
}
