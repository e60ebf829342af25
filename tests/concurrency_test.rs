use cart_store::core::{ProductLookup, StockLookup};
use cart_store::{CartError, CartStore, MemoryBlobStore, Product, ProductId, Result, StockRecord};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Catalog whose lookups yield to the scheduler long enough for callers to overlap.
struct SlowCatalog {
    stock: u32,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl SlowCatalog {
    fn new(stock: u32) -> Arc<Self> {
        Arc::new(Self {
            stock,
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        })
    }

    async fn slow_call(&self) {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(20)).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait::async_trait]
impl StockLookup for SlowCatalog {
    async fn stock(&self, product_id: ProductId) -> Result<StockRecord> {
        self.slow_call().await;
        Ok(StockRecord {
            id: product_id,
            amount: self.stock,
        })
    }
}

#[async_trait::async_trait]
impl ProductLookup for SlowCatalog {
    async fn product(&self, product_id: ProductId) -> Result<Product> {
        self.slow_call().await;
        Ok(Product {
            id: product_id,
            metadata: serde_json::Map::new(),
        })
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_adds_are_not_lost() {
    let catalog = SlowCatalog::new(100);
    let storage = MemoryBlobStore::new();
    let store = Arc::new(CartStore::open(catalog.clone(), catalog.clone(), storage.clone()).await);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let store = store.clone();
            tokio::spawn(async move { store.add_product(1).await })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let cart = store.cart();
    assert_eq!(cart.len(), 1);
    assert_eq!(cart.get(1).unwrap().amount, 8);
    assert_eq!(catalog.max_in_flight.load(Ordering::SeqCst), 1);

    let persisted = storage.get(cart_store::core::cart_store::DEFAULT_STORAGE_KEY).unwrap();
    assert_eq!(cart_store::Cart::from_snapshot(&persisted).unwrap(), cart);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_adds_stop_at_stock_limit() {
    let catalog = SlowCatalog::new(3);
    let store = Arc::new(CartStore::open(catalog.clone(), catalog, MemoryBlobStore::new()).await);

    let handles: Vec<_> = (0..6)
        .map(|_| {
            let store = store.clone();
            tokio::spawn(async move { store.add_product(7).await })
        })
        .collect();

    let mut rejected = 0;
    for handle in handles {
        if let Err(err) = handle.await.unwrap() {
            assert!(matches!(err, CartError::StockExceeded { available: 3, .. }));
            rejected += 1;
        }
    }

    assert_eq!(rejected, 3);
    assert_eq!(store.cart().get(7).unwrap().amount, 3);
}

#[tokio::test]
async fn test_reads_do_not_wait_for_a_pending_mutation() {
    let catalog = SlowCatalog::new(5);
    let store = Arc::new(CartStore::open(catalog.clone(), catalog, MemoryBlobStore::new()).await);

    let writer = {
        let store = store.clone();
        tokio::spawn(async move { store.add_product(1).await })
    };
    tokio::task::yield_now().await;

    // the lookup is still sleeping; the last committed cart is empty
    assert!(store.cart().is_empty());

    writer.await.unwrap().unwrap();
    assert_eq!(store.cart().len(), 1);
}
