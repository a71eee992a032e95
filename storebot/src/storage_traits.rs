use std::{collections::HashMap, sync::Arc};

use serde::{Deserialize, Serialize};
use teloxide::types::UserId;

use crate::errors::Result;

/// A purchasable catalog item.
///
/// Cart and order entries hold full copies of this struct captured at the
/// time the item was added, so later catalog edits never change what a user
/// already put in a cart or bought.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub image: String,
    pub category: String,
}

/// Fields of a product about to be added to the catalog; the id is assigned
/// by the catalog store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub price: f64,
    pub description: String,
    pub image: String,
    pub category: String,
}

/// Sum of snapshot prices. Totals are always derived from the snapshots,
/// never recomputed from the current catalog.
pub fn total_price(items: &[Product]) -> f64 {
    items.iter().map(|p| p.price).sum()
}

/// Trait for catalog storage operations
#[async_trait::async_trait]
pub trait CatalogStorageTrait: Send + Sync {
    /// Get all products in catalog order
    async fn products(&self) -> Vec<Product>;

    /// Look up a single product by id
    async fn product(&self, id: u64) -> Option<Product>;

    /// Add a product, assigning the next free id (max existing + 1, or 1)
    async fn add_product(&self, new: NewProduct) -> Result<Product>;

    /// Remove the first product with a matching id; returns whether a
    /// removal occurred. The catalog is persisted either way.
    async fn remove_product(&self, id: u64) -> bool;
}

/// Trait for per-user cart storage operations
#[async_trait::async_trait]
pub trait CartStorageTrait: Send + Sync {
    /// Get a user's cart, empty if none
    async fn cart(&self, user_id: UserId) -> Vec<Product>;

    /// Append a product snapshot to a user's cart
    async fn add_item(&self, user_id: UserId, product: Product);

    /// Reset a user's cart to an empty sequence. The mapping key is kept.
    async fn clear_cart(&self, user_id: UserId);
}

/// Trait for per-user order history operations. Orders are grouped: each
/// completed checkout appends one `Vec<Product>` to the user's history.
#[async_trait::async_trait]
pub trait OrderStorageTrait: Send + Sync {
    /// Get a user's order history, empty if none
    async fn orders(&self, user_id: UserId) -> Vec<Vec<Product>>;

    /// Record a completed purchase
    async fn append_order(&self, user_id: UserId, items: Vec<Product>);

    /// Get the full order map, for aggregate stats
    async fn all_orders(&self) -> HashMap<UserId, Vec<Vec<Product>>>;
}

/// Combined storage trait that provides all storage operations.
/// Allows converting to specific trait objects for handlers that only need a
/// subset of functionality.
pub trait StorageTrait: Send + Sync {
    /// Convert to CatalogStorageTrait trait object
    fn as_catalog_storage(self: Arc<Self>) -> Arc<dyn CatalogStorageTrait>;

    /// Convert to CartStorageTrait trait object
    fn as_cart_storage(self: Arc<Self>) -> Arc<dyn CartStorageTrait>;

    /// Convert to OrderStorageTrait trait object
    fn as_order_storage(self: Arc<Self>) -> Arc<dyn OrderStorageTrait>;
}
