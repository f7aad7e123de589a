//! Server-backed cart with a local fallback.
//!
//! Authenticated sessions treat the backend as the source of truth: every
//! mutation is a write followed by a refetch, and the refetched list is merged
//! through [`Cart::replace_preserving_order`] so lines do not jump around in
//! the UI. Guests get the same semantics against a JSON file on disk, which is
//! what gets merged into the server cart at login.
//!
//! The same file also backs the offline path: when the backend is unreachable
//! (connection-level failure, never a business rejection) a mutation lands in
//! the local cart instead of being lost, and the next login merge reconciles
//! it with the server.

use std::future::Future;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use serde::Serialize;

use bakeline_core::cart::Cart;
use bakeline_core::{CartLine, OptionItemId, ProductId};

use crate::api::ApiClient;
use crate::error::Result;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AddLineRequest {
    product_id: ProductId,
    quantity: u32,
    option_item_ids: Vec<OptionItemId>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SetQuantityRequest<'a> {
    product_id: ProductId,
    option_item_ids: &'a [OptionItemId],
    quantity: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RemoveLineRequest<'a> {
    product_id: ProductId,
    option_item_ids: &'a [OptionItemId],
}

#[derive(Serialize)]
struct MergeRequest {
    lines: Vec<CartLine>,
}

/// Cart operations, server-backed when logged in, file-backed for guests.
#[derive(Clone)]
pub struct CartService {
    api: ApiClient,
    /// Last server-confirmed view, used to keep line order stable across
    /// refetches.
    known: Arc<RwLock<Cart>>,
    local_path: PathBuf,
}

impl CartService {
    /// Create a cart service sharing the given transport.
    #[must_use]
    pub fn new(api: ApiClient, local_path: PathBuf) -> Self {
        Self {
            api,
            known: Arc::new(RwLock::new(Cart::new())),
            local_path,
        }
    }

    fn is_authenticated(&self) -> bool {
        self.api.session().is_authenticated()
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Current cart contents.
    ///
    /// # Errors
    ///
    /// Returns an error if the server fetch fails for any reason other than
    /// an unreachable backend; in that case the local cart is shown instead.
    /// Guest carts never fail; a missing or corrupt local file reads as empty.
    pub async fn fetch(&self) -> Result<Cart> {
        if !self.is_authenticated() {
            return Ok(self.load_local());
        }
        match self.api.get::<Vec<CartLine>>("/cart").await {
            Ok(lines) => Ok(self.reconcile(lines)),
            Err(error) if error.is_no_connection() => {
                tracing::warn!("backend unreachable, showing local cart");
                Ok(self.load_local())
            }
            Err(error) => Err(error),
        }
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Add a product to the cart, merging with an existing identical line.
    ///
    /// # Errors
    ///
    /// Returns an error if the server rejects the write. An unreachable
    /// backend is not an error: the line goes into the local cart and the
    /// next login merge carries it to the server.
    pub async fn add(
        &self,
        product_id: ProductId,
        quantity: u32,
        option_item_ids: Vec<OptionItemId>,
    ) -> Result<Cart> {
        let server = async {
            let request = AddLineRequest {
                product_id,
                quantity,
                option_item_ids: option_item_ids.clone(),
            };
            let _: serde_json::Value = self.api.post("/cart/items", &request).await?;
            self.refetch().await
        };
        self.with_local_fallback(server, |cart| {
            cart.add(CartLine::new(product_id, quantity, option_item_ids.clone()));
        })
        .await
    }

    /// Set the quantity of an existing line. A missing line is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the server rejects the write; an unreachable
    /// backend falls back to the local cart.
    pub async fn set_quantity(
        &self,
        product_id: ProductId,
        option_item_ids: &[OptionItemId],
        quantity: u32,
    ) -> Result<Cart> {
        let server = async {
            let request = SetQuantityRequest {
                product_id,
                option_item_ids,
                quantity,
            };
            let _: serde_json::Value = self.api.patch("/cart/items", &request).await?;
            self.refetch().await
        };
        self.with_local_fallback(server, |cart| {
            cart.set_quantity(product_id, option_item_ids, quantity);
        })
        .await
    }

    /// Remove a line by identity. A missing line is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the server rejects the write; an unreachable
    /// backend falls back to the local cart.
    pub async fn remove(
        &self,
        product_id: ProductId,
        option_item_ids: &[OptionItemId],
    ) -> Result<Cart> {
        let server = async {
            let request = RemoveLineRequest {
                product_id,
                option_item_ids,
            };
            let _: serde_json::Value = self.api.delete("/cart/items", Some(&request)).await?;
            self.refetch().await
        };
        self.with_local_fallback(server, |cart| {
            cart.remove(product_id, option_item_ids);
        })
        .await
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the server rejects the write; an unreachable
    /// backend clears the local cart.
    pub async fn clear(&self) -> Result<()> {
        let server = async {
            let _: serde_json::Value = self
                .api
                .delete::<(), serde_json::Value>("/cart", None)
                .await?;
            if let Ok(mut known) = self.known.write() {
                known.clear();
            }
            Ok(Cart::new())
        };
        self.with_local_fallback(server, Cart::clear).await?;
        Ok(())
    }

    /// Merge the guest cart into the server cart after login.
    ///
    /// One merge call posting the local lines, then the local store is
    /// cleared. The call is at-least-once; folding duplicate merges is the
    /// server's contract. An empty guest cart skips the call entirely.
    ///
    /// # Errors
    ///
    /// Returns an error if the merge request fails; the local cart is kept
    /// so the merge can be retried.
    pub async fn merge_on_login(&self) -> Result<()> {
        let local = self.load_local();
        if local.is_empty() {
            return Ok(());
        }

        let line_count = local.lines().len();
        let request = MergeRequest {
            lines: local.into_lines(),
        };
        let _: serde_json::Value = self.api.post("/cart/merge", &request).await?;
        tracing::info!(line_count, "guest cart merged into server cart");

        self.clear_local();
        Ok(())
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Run a server mutation, or apply the same change to the file-backed
    /// cart when there is no session or the backend is unreachable.
    ///
    /// Business rejections (4xx/5xx) still propagate: only a request that
    /// never reached the server degrades to the local path.
    async fn with_local_fallback(
        &self,
        server: impl Future<Output = Result<Cart>>,
        apply: impl FnOnce(&mut Cart),
    ) -> Result<Cart> {
        if !self.is_authenticated() {
            return Ok(self.mutate_local(apply));
        }
        match server.await {
            Ok(cart) => Ok(cart),
            Err(error) if error.is_no_connection() => {
                tracing::warn!("backend unreachable, applying cart change locally");
                Ok(self.mutate_local(apply))
            }
            Err(error) => Err(error),
        }
    }

    async fn refetch(&self) -> Result<Cart> {
        let lines: Vec<CartLine> = self.api.get("/cart").await?;
        Ok(self.reconcile(lines))
    }

    /// Fold a fetched line list into the known view, keeping prior order.
    fn reconcile(&self, lines: Vec<CartLine>) -> Cart {
        match self.known.write() {
            Ok(mut known) => {
                known.replace_preserving_order(lines);
                known.clone()
            }
            Err(_) => Cart::from_lines(lines),
        }
    }

    fn load_local(&self) -> Cart {
        std::fs::read_to_string(&self.local_path)
            .ok()
            .and_then(|raw| serde_json::from_str::<Vec<CartLine>>(&raw).ok())
            .map_or_else(Cart::new, Cart::from_lines)
    }

    fn mutate_local(&self, apply: impl FnOnce(&mut Cart)) -> Cart {
        let mut cart = self.load_local();
        apply(&mut cart);
        self.save_local(&cart);
        cart
    }

    fn save_local(&self, cart: &Cart) {
        if let Some(parent) = self.local_path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        match serde_json::to_string(cart.lines())
            .map_err(std::io::Error::other)
            .and_then(|json| std::fs::write(&self.local_path, json))
        {
            Ok(()) => {}
            Err(e) => tracing::warn!("failed to persist guest cart: {e}"),
        }
    }

    fn clear_local(&self) {
        if let Err(e) = std::fs::remove_file(&self.local_path)
            && e.kind() != std::io::ErrorKind::NotFound
        {
            tracing::warn!("failed to remove guest cart file: {e}");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::events::SignalBus;
    use crate::session::SessionStore;

    fn guest_service(dir: &std::path::Path) -> CartService {
        let config = ClientConfig::new("https://api.invalid/".parse().unwrap());
        let session = SessionStore::load(dir.join("session.json"));
        let api = ApiClient::new(&config, session, SignalBus::new()).unwrap();
        CartService::new(api, dir.join("cart.json"))
    }

    #[tokio::test]
    async fn test_guest_cart_persists_across_services() {
        let dir = tempfile::tempdir().unwrap();
        let service = guest_service(dir.path());

        service
            .add(ProductId::new(1), 2, vec![OptionItemId::new(9)])
            .await
            .unwrap();
        service.add(ProductId::new(2), 1, vec![]).await.unwrap();

        // A second service over the same file sees the same cart.
        let reopened = guest_service(dir.path());
        let cart = reopened.fetch().await.unwrap();
        assert_eq!(cart.lines().len(), 2);
        assert_eq!(cart.unit_count(), 3);
    }

    #[tokio::test]
    async fn test_guest_add_merges_identical_lines() {
        let dir = tempfile::tempdir().unwrap();
        let service = guest_service(dir.path());

        let selection = vec![OptionItemId::new(3), OptionItemId::new(5)];
        service
            .add(ProductId::new(1), 1, selection.clone())
            .await
            .unwrap();
        // Same identity, different selection order.
        let cart = service
            .add(
                ProductId::new(1),
                2,
                vec![OptionItemId::new(5), OptionItemId::new(3)],
            )
            .await
            .unwrap();

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].quantity, 3);
    }

    #[tokio::test]
    async fn test_guest_remove_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let service = guest_service(dir.path());

        service.add(ProductId::new(1), 1, vec![]).await.unwrap();
        let cart = service.remove(ProductId::new(1), &[]).await.unwrap();
        assert!(cart.is_empty());

        // Removing a missing line is a no-op, not an error.
        let cart = service.remove(ProductId::new(42), &[]).await.unwrap();
        assert!(cart.is_empty());

        service.add(ProductId::new(2), 4, vec![]).await.unwrap();
        service.clear().await.unwrap();
        assert!(service.fetch().await.unwrap().is_empty());
    }

    fn offline_service(dir: &std::path::Path) -> CartService {
        // Port 9 (discard) has no listener: connects are refused, which
        // surfaces as the no-connection error the fallback keys on.
        let config = ClientConfig::new("http://127.0.0.1:9/".parse().unwrap());
        let session = SessionStore::load(dir.join("session.json"));
        session.establish(secrecy::SecretString::from("tok-offline"));
        let api = ApiClient::new(&config, session, SignalBus::new()).unwrap();
        CartService::new(api, dir.join("cart.json"))
    }

    #[tokio::test]
    async fn test_unreachable_backend_falls_back_to_local_cart() {
        let dir = tempfile::tempdir().unwrap();
        let service = offline_service(dir.path());
        assert!(service.api.session().is_authenticated());

        // The write is not lost: it lands in the file-backed cart.
        let cart = service
            .add(ProductId::new(1), 2, vec![OptionItemId::new(7)])
            .await
            .unwrap();
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.unit_count(), 2);

        // Same merge semantics as the guest path.
        let cart = service
            .add(ProductId::new(1), 3, vec![OptionItemId::new(7)])
            .await
            .unwrap();
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.unit_count(), 5);

        let cart = service
            .set_quantity(ProductId::new(1), &[OptionItemId::new(7)], 4)
            .await
            .unwrap();
        assert_eq!(cart.unit_count(), 4);
        let cart = service
            .remove(ProductId::new(1), &[OptionItemId::new(7)])
            .await
            .unwrap();
        assert!(cart.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_backend_fetch_shows_local_cart() {
        let dir = tempfile::tempdir().unwrap();
        let service = offline_service(dir.path());
        service.add(ProductId::new(3), 1, vec![]).await.unwrap();

        // A fresh service over the same files still authenticates and still
        // cannot reach the backend; the persisted local cart is shown.
        let reopened = offline_service(dir.path());
        let cart = reopened.fetch().await.unwrap();
        assert_eq!(cart.lines().len(), 1);
    }

    #[tokio::test]
    async fn test_corrupt_local_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("cart.json"), "{broken").unwrap();
        let service = guest_service(dir.path());
        assert!(service.fetch().await.unwrap().is_empty());
    }
}
