//! Catalog reads with an in-memory cache.
//!
//! Products change rarely, so reads are cached with `moka` (5-minute TTL,
//! bounded capacity). The cached entries double as the catalog snapshot the
//! cart falls back to when a line carries no usable price snapshot.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;

use bakeline_core::{CatalogSnapshot, Product, ProductId};

use crate::api::ApiClient;
use crate::error::Result;

/// Cached value types.
#[derive(Debug, Clone)]
enum CacheValue {
    Product(Box<Product>),
    Products(Arc<Vec<Product>>),
}

/// Client for catalog endpoints.
///
/// Products are cached for 5 minutes.
#[derive(Clone)]
pub struct CatalogApi {
    api: ApiClient,
    cache: Cache<String, CacheValue>,
}

impl CatalogApi {
    /// Create a new catalog client sharing the given transport.
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Self { api, cache }
    }

    /// List all products.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list_products(&self) -> Result<Arc<Vec<Product>>> {
        let cache_key = "products".to_string();

        if let Some(CacheValue::Products(products)) = self.cache.get(&cache_key).await {
            tracing::debug!("catalog cache hit: product list");
            return Ok(products);
        }

        let products: Vec<Product> = self.api.get("/products").await?;
        let products = Arc::new(products);

        self.cache
            .insert(cache_key, CacheValue::Products(Arc::clone(&products)))
            .await;

        Ok(products)
    }

    /// Fetch a single product by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the product does not exist.
    pub async fn get_product(&self, id: ProductId) -> Result<Product> {
        let cache_key = format!("product:{id}");

        if let Some(CacheValue::Product(product)) = self.cache.get(&cache_key).await {
            tracing::debug!(%id, "catalog cache hit: product");
            return Ok(*product);
        }

        let product: Product = self.api.get(&format!("/products/{id}")).await?;

        self.cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    /// Build a catalog snapshot covering the given product ids.
    ///
    /// Ids absent from the catalog are silently dropped; local price
    /// recomputation treats a missing product as "price unknown".
    ///
    /// # Errors
    ///
    /// Returns an error if the product list cannot be fetched.
    pub async fn snapshot(&self, ids: &[ProductId]) -> Result<CatalogSnapshot> {
        let products = self.list_products().await?;
        Ok(products
            .iter()
            .filter(|product| ids.contains(&product.id))
            .map(|product| (product.id, product.clone()))
            .collect())
    }

    /// Invalidate a cached product.
    pub async fn invalidate_product(&self, id: ProductId) {
        let cache_key = format!("product:{id}");
        self.cache.invalidate(&cache_key).await;
    }

    /// Invalidate all cached catalog data.
    pub async fn invalidate_all(&self) {
        self.cache.invalidate_all();
        self.cache.run_pending_tasks().await;
    }
}
