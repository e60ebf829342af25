use crate::core::{BlobStore, Cart, LineItem, Product, ProductId, ProductLookup, StockLookup};
use crate::utils::error::{CartError, Result};
use tokio::sync::{watch, Mutex};

pub const DEFAULT_STORAGE_KEY: &str = "@RocketShoes:cart";

/// Authoritative cart state for one session.
///
/// Every mutation holds the state lock from the first read until the new
/// snapshot is persisted, so concurrent callers are applied one after another
/// even though each of them awaits a lookup in the middle. Readers go through
/// the watch channel and never wait on a mutation in flight.
pub struct CartStore<S, P, B> {
    stock: S,
    products: P,
    storage: B,
    key: String,
    state: Mutex<Cart>,
    published: watch::Sender<Cart>,
}

impl<S, P, B> CartStore<S, P, B>
where
    S: StockLookup,
    P: ProductLookup,
    B: BlobStore,
{
    pub async fn open(stock: S, products: P, storage: B) -> Self {
        Self::open_with_key(stock, products, storage, DEFAULT_STORAGE_KEY).await
    }

    pub async fn open_with_key(stock: S, products: P, storage: B, key: impl Into<String>) -> Self {
        let key = key.into();
        let cart = restore(&storage, &key).await;
        let (published, _) = watch::channel(cart.clone());

        Self {
            stock,
            products,
            storage,
            key,
            state: Mutex::new(cart),
            published,
        }
    }

    /// Last committed cart.
    pub fn cart(&self) -> Cart {
        self.published.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Cart> {
        self.published.subscribe()
    }

    pub fn storage_key(&self) -> &str {
        &self.key
    }

    /// Adds one unit of the product.
    ///
    /// A product already in the cart is incremented only while the stock is
    /// strictly greater than the current amount. A new product is fetched from
    /// the catalog and appended with an amount of 1.
    pub async fn add_product(&self, product_id: ProductId) -> Result<Cart> {
        let mut cart = self.state.lock().await;

        let next = match cart.get(product_id).map(|item| item.amount) {
            Some(current) => {
                tracing::debug!(product_id, current, "Checking stock before increment");
                let stock = self.stock.stock(product_id).await?;

                if stock.amount <= current {
                    return Err(CartError::StockExceeded {
                        product_id,
                        requested: u64::from(current) + 1,
                        available: stock.amount,
                    });
                }

                cart.with_amount(product_id, current + 1)
            }
            None => {
                tracing::debug!(product_id, "Fetching product metadata");
                let product = self.products.product(product_id).await?;

                if product.id != product_id {
                    tracing::warn!(
                        product_id,
                        returned_id = product.id,
                        "Catalog returned a different product id, keeping the requested one"
                    );
                }

                cart.with_item(LineItem::from_product(Product {
                    id: product_id,
                    ..product
                }))
            }
        };

        self.commit(&mut cart, next).await;
        tracing::info!(product_id, items = cart.len(), "Product added to cart");
        Ok(cart.clone())
    }

    pub async fn remove_product(&self, product_id: ProductId) -> Result<Cart> {
        let mut cart = self.state.lock().await;

        if !cart.contains(product_id) {
            return Err(CartError::NotInCart { product_id });
        }

        let next = cart.without(product_id);
        self.commit(&mut cart, next).await;
        tracing::info!(product_id, items = cart.len(), "Product removed from cart");
        Ok(cart.clone())
    }

    /// Sets the amount of a product already in the cart. The stock check is
    /// inclusive: an amount equal to the stock is accepted.
    pub async fn update_product_amount(&self, product_id: ProductId, amount: i64) -> Result<Cart> {
        if amount < 1 {
            return Err(CartError::InvalidAmount { product_id, amount });
        }

        let mut cart = self.state.lock().await;

        tracing::debug!(product_id, amount, "Checking stock before update");
        let stock = self.stock.stock(product_id).await?;

        let requested = match u32::try_from(amount) {
            Ok(requested) if requested <= stock.amount => requested,
            _ => {
                return Err(CartError::StockExceeded {
                    product_id,
                    requested: amount.unsigned_abs(),
                    available: stock.amount,
                })
            }
        };

        if !cart.contains(product_id) {
            return Err(CartError::NotInCart { product_id });
        }

        let next = cart.with_amount(product_id, requested);
        self.commit(&mut cart, next).await;
        tracing::info!(product_id, amount = requested, "Product amount updated");
        Ok(cart.clone())
    }

    async fn commit(&self, cart: &mut Cart, next: Cart) {
        *cart = next;
        self.persist(cart).await;
        self.published.send_replace(cart.clone());
    }

    // The in-memory cart stays authoritative when a save fails.
    async fn persist(&self, cart: &Cart) {
        let snapshot = match cart.to_snapshot() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::error!(key = %self.key, error = %e, "Failed to serialize cart snapshot");
                return;
            }
        };

        tracing::debug!(key = %self.key, bytes = snapshot.len(), "Persisting cart snapshot");
        if let Err(e) = self.storage.save(&self.key, &snapshot).await {
            tracing::error!(key = %self.key, error = %e, "Failed to persist cart snapshot");
        }
    }
}

async fn restore<B: BlobStore>(storage: &B, key: &str) -> Cart {
    match storage.load(key).await {
        Ok(Some(snapshot)) => match Cart::from_snapshot(&snapshot) {
            Ok(cart) => {
                tracing::debug!(key, items = cart.len(), "Restored cart snapshot");
                cart
            }
            Err(e) => {
                tracing::warn!(key, error = %e, "Discarding malformed cart snapshot");
                Cart::new()
            }
        },
        Ok(None) => {
            tracing::debug!(key, "No cart snapshot found, starting empty");
            Cart::new()
        }
        Err(e) => {
            tracing::warn!(key, error = %e, "Could not read cart snapshot, starting empty");
            Cart::new()
        }
    }
}
