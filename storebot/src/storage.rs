use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use serde::{Serialize, de::DeserializeOwned};
use teloxide::types::UserId;
use tokio::{fs, sync::Mutex};

use crate::{
    errors::{Result, StoreError},
    storage_traits::{
        CartStorageTrait, CatalogStorageTrait, NewProduct, OrderStorageTrait, Product,
        StorageTrait,
    },
};

/// Persisted file names, relative to the data directory.
pub const PRODUCTS_FILE: &str = "products.json";
pub const CART_FILE: &str = "cart_data.json";
pub const ORDERS_FILE: &str = "orders_data.json";
pub const PURCHASE_LOG_FILE: &str = "purchase.log";

// Type aliases for complex storage types
type CartData = HashMap<UserId, Vec<Product>>;
type OrderData = HashMap<UserId, Vec<Vec<Product>>>;

/// Next free product id: maximum existing id + 1, or 1 for an empty catalog.
/// Ids are never reused while the entry holding the maximum exists.
fn next_product_id(products: &[Product]) -> u64 {
    products.iter().map(|p| p.id).max().unwrap_or(0) + 1
}

fn validate_price(price: f64) -> Result<()> {
    if !price.is_finite() || price < 0.0 {
        return Err(StoreError::Validation(format!(
            "price must be a non-negative number, got {price}"
        )));
    }
    Ok(())
}

fn build_product(products: &[Product], new: NewProduct) -> Result<Product> {
    validate_price(new.price)?;
    Ok(Product {
        id: next_product_id(products),
        name: new.name,
        description: new.description,
        price: new.price,
        image: new.image,
        category: new.category,
    })
}

/// Read a whole store file. A missing file is a first run; a malformed one
/// is logged and treated as empty for the session.
async fn load_json<T: DeserializeOwned + Default>(path: &Path) -> T {
    match fs::read_to_string(path).await {
        Ok(content) => match serde_json::from_str(&content) {
            Ok(value) => value,
            Err(e) => {
                log::warn!(
                    "{}: {}",
                    StoreError::Corrupted(path.to_path_buf()),
                    e
                );
                T::default()
            }
        },
        Err(_) => T::default(),
    }
}

/// Rewrite a whole store file. Failures are logged, not surfaced to the chat
/// user; the in-memory state stays authoritative for the session.
async fn save_json<T: Serialize>(path: &Path, value: &T) {
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent).await;
    }
    match serde_json::to_string_pretty(value) {
        Ok(content) => {
            if let Err(e) = fs::write(path, content).await {
                log::error!("Failed to write {}: {}", path.display(), e);
            }
        }
        Err(e) => log::error!("Failed to serialize {}: {}", path.display(), e),
    }
}

/// In-memory catalog storage
#[derive(Clone)]
pub struct CatalogStorage {
    data: Arc<Mutex<Vec<Product>>>,
}

impl CatalogStorage {
    pub fn new() -> Self {
        Self {
            data: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait::async_trait]
impl CatalogStorageTrait for CatalogStorage {
    async fn products(&self) -> Vec<Product> {
        self.data.lock().await.clone()
    }

    async fn product(&self, id: u64) -> Option<Product> {
        self.data.lock().await.iter().find(|p| p.id == id).cloned()
    }

    async fn add_product(&self, new: NewProduct) -> Result<Product> {
        let mut products = self.data.lock().await;
        let product = build_product(&products, new)?;
        products.push(product.clone());
        Ok(product)
    }

    async fn remove_product(&self, id: u64) -> bool {
        let mut products = self.data.lock().await;
        let before = products.len();
        products.retain(|p| p.id != id);
        products.len() != before
    }
}

/// In-memory cart storage
#[derive(Clone)]
pub struct CartStorage {
    data: Arc<Mutex<CartData>>,
}

impl CartStorage {
    pub fn new() -> Self {
        Self {
            data: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

#[async_trait::async_trait]
impl CartStorageTrait for CartStorage {
    async fn cart(&self, user_id: UserId) -> Vec<Product> {
        self.data.lock().await.get(&user_id).cloned().unwrap_or_default()
    }

    async fn add_item(&self, user_id: UserId, product: Product) {
        let mut carts = self.data.lock().await;
        carts.entry(user_id).or_default().push(product);
    }

    async fn clear_cart(&self, user_id: UserId) {
        let mut carts = self.data.lock().await;
        // Keep the mapping key; a checked-out user keeps an empty cart entry
        carts.insert(user_id, Vec::new());
    }
}

/// In-memory order history storage
#[derive(Clone)]
pub struct OrderStorage {
    data: Arc<Mutex<OrderData>>,
}

impl OrderStorage {
    pub fn new() -> Self {
        Self {
            data: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

#[async_trait::async_trait]
impl OrderStorageTrait for OrderStorage {
    async fn orders(&self, user_id: UserId) -> Vec<Vec<Product>> {
        self.data.lock().await.get(&user_id).cloned().unwrap_or_default()
    }

    async fn append_order(&self, user_id: UserId, items: Vec<Product>) {
        let mut orders = self.data.lock().await;
        orders.entry(user_id).or_default().push(items);
    }

    async fn all_orders(&self) -> OrderData {
        self.data.lock().await.clone()
    }
}

/// Catalog storage backed by `products.json`. The file holds the whole
/// catalog and is rewritten on every mutation. The lock is held across the
/// whole mutate-then-persist sequence, so at most one mutation is in flight
/// at a time.
#[derive(Clone)]
pub struct JsonCatalogStorage {
    path: PathBuf,
    data: Arc<Mutex<Vec<Product>>>,
}

impl JsonCatalogStorage {
    pub async fn open(path: PathBuf) -> Self {
        let data = load_json(&path).await;
        Self {
            path,
            data: Arc::new(Mutex::new(data)),
        }
    }
}

#[async_trait::async_trait]
impl CatalogStorageTrait for JsonCatalogStorage {
    async fn products(&self) -> Vec<Product> {
        self.data.lock().await.clone()
    }

    async fn product(&self, id: u64) -> Option<Product> {
        self.data.lock().await.iter().find(|p| p.id == id).cloned()
    }

    async fn add_product(&self, new: NewProduct) -> Result<Product> {
        let mut products = self.data.lock().await;
        let product = build_product(&products, new)?;
        products.push(product.clone());
        save_json(&self.path, &*products).await;
        Ok(product)
    }

    async fn remove_product(&self, id: u64) -> bool {
        let mut products = self.data.lock().await;
        let before = products.len();
        products.retain(|p| p.id != id);
        let removed = products.len() != before;
        save_json(&self.path, &*products).await;
        removed
    }
}

/// Cart storage backed by `cart_data.json`
#[derive(Clone)]
pub struct JsonCartStorage {
    path: PathBuf,
    data: Arc<Mutex<CartData>>,
}

impl JsonCartStorage {
    pub async fn open(path: PathBuf) -> Self {
        let data = load_json(&path).await;
        Self {
            path,
            data: Arc::new(Mutex::new(data)),
        }
    }
}

#[async_trait::async_trait]
impl CartStorageTrait for JsonCartStorage {
    async fn cart(&self, user_id: UserId) -> Vec<Product> {
        self.data.lock().await.get(&user_id).cloned().unwrap_or_default()
    }

    async fn add_item(&self, user_id: UserId, product: Product) {
        let mut carts = self.data.lock().await;
        carts.entry(user_id).or_default().push(product);
        save_json(&self.path, &*carts).await;
    }

    async fn clear_cart(&self, user_id: UserId) {
        let mut carts = self.data.lock().await;
        carts.insert(user_id, Vec::new());
        save_json(&self.path, &*carts).await;
    }
}

/// Order history storage backed by `orders_data.json`. Entries are only ever
/// appended, one group per completed checkout.
#[derive(Clone)]
pub struct JsonOrderStorage {
    path: PathBuf,
    data: Arc<Mutex<OrderData>>,
}

impl JsonOrderStorage {
    pub async fn open(path: PathBuf) -> Self {
        let data = load_json(&path).await;
        Self {
            path,
            data: Arc::new(Mutex::new(data)),
        }
    }
}

#[async_trait::async_trait]
impl OrderStorageTrait for JsonOrderStorage {
    async fn orders(&self, user_id: UserId) -> Vec<Vec<Product>> {
        self.data.lock().await.get(&user_id).cloned().unwrap_or_default()
    }

    async fn append_order(&self, user_id: UserId, items: Vec<Product>) {
        let mut orders = self.data.lock().await;
        orders.entry(user_id).or_default().push(items);
        save_json(&self.path, &*orders).await;
    }

    async fn all_orders(&self) -> OrderData {
        self.data.lock().await.clone()
    }
}

/// Main storage structure that holds all bot data.
/// This is the primary storage container for the application.
#[derive(Clone)]
pub struct Storage {
    catalog: Arc<dyn CatalogStorageTrait>,
    carts: Arc<dyn CartStorageTrait>,
    orders: Arc<dyn OrderStorageTrait>,
}

impl Storage {
    /// Create a new storage with all stores in memory
    pub fn new() -> Self {
        Self {
            catalog: Arc::new(CatalogStorage::new()),
            carts: Arc::new(CartStorage::new()),
            orders: Arc::new(OrderStorage::new()),
        }
    }

    /// Open file-backed storage under the given data directory
    pub async fn open(data_dir: &Path) -> Self {
        Self {
            catalog: Arc::new(JsonCatalogStorage::open(data_dir.join(PRODUCTS_FILE)).await),
            carts: Arc::new(JsonCartStorage::open(data_dir.join(CART_FILE)).await),
            orders: Arc::new(JsonOrderStorage::open(data_dir.join(ORDERS_FILE)).await),
        }
    }
}

impl Default for Storage {
    fn default() -> Self {
        Self::new()
    }
}

impl StorageTrait for Storage {
    fn as_catalog_storage(self: Arc<Self>) -> Arc<dyn CatalogStorageTrait> {
        self.catalog.clone()
    }

    fn as_cart_storage(self: Arc<Self>) -> Arc<dyn CartStorageTrait> {
        self.carts.clone()
    }

    fn as_order_storage(self: Arc<Self>) -> Arc<dyn OrderStorageTrait> {
        self.orders.clone()
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::storage_traits::total_price;

    fn new_product(name: &str, price: f64) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            price,
            description: format!("{name} description"),
            image: "https://example.com/img.jpg".to_string(),
            category: "Fruit".to_string(),
        }
    }

    #[test]
    fn test_next_product_id() {
        assert_eq!(next_product_id(&[]), 1);
        let products = vec![
            Product {
                id: 3,
                name: "Mango".into(),
                description: String::new(),
                price: 5.0,
                image: String::new(),
                category: String::new(),
            },
            Product {
                id: 7,
                name: "Kiwi".into(),
                description: String::new(),
                price: 2.0,
                image: String::new(),
                category: String::new(),
            },
        ];
        assert_eq!(next_product_id(&products), 8);
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price(0.0).is_ok());
        assert!(validate_price(5.5).is_ok());
        assert!(matches!(
            validate_price(-1.0),
            Err(StoreError::Validation(_))
        ));
        assert!(matches!(
            validate_price(f64::NAN),
            Err(StoreError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_catalog_id_assignment_survives_removal() {
        let catalog = CatalogStorage::new();
        let first = catalog.add_product(new_product("Mango", 5.0)).await.unwrap();
        let second = catalog.add_product(new_product("Kiwi", 2.0)).await.unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);

        assert!(catalog.remove_product(first.id).await);
        assert!(!catalog.remove_product(first.id).await);

        // The surviving maximum keeps later ids unique
        let third = catalog.add_product(new_product("Pear", 3.0)).await.unwrap();
        assert_eq!(third.id, 3);
    }

    #[tokio::test]
    async fn test_json_catalog_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(PRODUCTS_FILE);

        let catalog = JsonCatalogStorage::open(path.clone()).await;
        catalog.add_product(new_product("Mango", 5.0)).await.unwrap();
        catalog.add_product(new_product("Kiwi", 2.0)).await.unwrap();
        let written = catalog.products().await;

        // A fresh handle over the same file sees identical content in order
        let reopened = JsonCatalogStorage::open(path).await;
        assert_eq!(reopened.products().await, written);
    }

    #[tokio::test]
    async fn test_corrupted_catalog_loads_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(PRODUCTS_FILE);
        fs::write(&path, "{not json").await.unwrap();

        let catalog = JsonCatalogStorage::open(path.clone()).await;
        assert!(catalog.products().await.is_empty());

        // Still usable: mutations overwrite the corrupt file
        catalog.add_product(new_product("Mango", 5.0)).await.unwrap();
        let reopened = JsonCatalogStorage::open(path).await;
        assert_eq!(reopened.products().await.len(), 1);
    }

    #[tokio::test]
    async fn test_cart_holds_snapshots_not_references() {
        let catalog = CatalogStorage::new();
        let carts = CartStorage::new();
        let user = UserId(42);

        let product = catalog.add_product(new_product("Mango", 5.0)).await.unwrap();
        carts.add_item(user, product.clone()).await;

        // A later catalog edit (remove + re-add at another price) must not
        // change what is already in the cart
        catalog.remove_product(product.id).await;
        catalog.add_product(new_product("Mango", 9.0)).await.unwrap();

        let cart = carts.cart(user).await;
        assert_eq!(total_price(&cart), 5.0);
    }

    #[tokio::test]
    async fn test_clear_cart_keeps_mapping_key() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CART_FILE);
        let carts = JsonCartStorage::open(path.clone()).await;
        let user = UserId(42);

        carts
            .add_item(
                user,
                Product {
                    id: 1,
                    name: "Mango".into(),
                    description: String::new(),
                    price: 5.0,
                    image: String::new(),
                    category: String::new(),
                },
            )
            .await;
        carts.clear_cart(user).await;
        assert!(carts.cart(user).await.is_empty());

        let content = fs::read_to_string(&path).await.unwrap();
        let parsed: CartData = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed.get(&user), Some(&Vec::new()));
    }

    #[tokio::test]
    async fn test_json_orders_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(ORDERS_FILE);
        let orders = JsonOrderStorage::open(path.clone()).await;
        let user = UserId(42);

        let items = vec![Product {
            id: 1,
            name: "Mango".into(),
            description: String::new(),
            price: 5.0,
            image: String::new(),
            category: String::new(),
        }];
        orders.append_order(user, items.clone()).await;
        orders.append_order(user, items.clone()).await;

        let reopened = JsonOrderStorage::open(path).await;
        let history = reopened.orders(user).await;
        assert_eq!(history.len(), 2);
        assert_eq!(history[0], items);
        assert_eq!(reopened.all_orders().await.len(), 1);
    }
}
