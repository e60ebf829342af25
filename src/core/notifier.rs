use crate::core::cart_store::CartStore;
use crate::core::{BlobStore, Cart, NotificationSink, ProductId, ProductLookup, StockLookup};
use crate::utils::error::{CartError, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// The four user-facing failure messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationMessages {
    pub stock_exceeded: String,
    pub add_failed: String,
    pub remove_failed: String,
    pub update_failed: String,
}

impl NotificationMessages {
    pub fn english() -> Self {
        Self {
            stock_exceeded: "Requested quantity exceeds available stock".to_string(),
            add_failed: "Failed to add product".to_string(),
            remove_failed: "Failed to remove product".to_string(),
            update_failed: "Failed to update product quantity".to_string(),
        }
    }

    pub fn brazilian_portuguese() -> Self {
        Self {
            stock_exceeded: "Quantidade solicitada fora de estoque".to_string(),
            add_failed: "Erro na adição do produto".to_string(),
            remove_failed: "Erro na remoção do produto".to_string(),
            update_failed: "Erro na alteração de quantidade do produto".to_string(),
        }
    }

    pub fn for_locale(locale: &str) -> Result<Self> {
        match locale.to_ascii_lowercase().as_str() {
            "en" | "en-us" => Ok(Self::english()),
            "pt" | "pt-br" => Ok(Self::brazilian_portuguese()),
            _ => Err(CartError::InvalidConfigValueError {
                field: "notifications.locale".to_string(),
                value: locale.to_string(),
                reason: "Supported locales: en, pt-BR".to_string(),
            }),
        }
    }
}

impl Default for NotificationMessages {
    fn default() -> Self {
        Self::english()
    }
}

/// Front for UI callers: failures are reported to the sink instead of being
/// returned, and an amount below 1 is ignored without a message. Each
/// operation returns whether the store accepted the mutation.
pub struct NotifyingCart<S, P, B, N> {
    store: Arc<CartStore<S, P, B>>,
    sink: N,
    messages: NotificationMessages,
}

impl<S, P, B, N> NotifyingCart<S, P, B, N>
where
    S: StockLookup,
    P: ProductLookup,
    B: BlobStore,
    N: NotificationSink,
{
    pub fn new(store: Arc<CartStore<S, P, B>>, sink: N) -> Self {
        Self {
            store,
            sink,
            messages: NotificationMessages::default(),
        }
    }

    pub fn with_messages(mut self, messages: NotificationMessages) -> Self {
        self.messages = messages;
        self
    }

    pub fn store(&self) -> &Arc<CartStore<S, P, B>> {
        &self.store
    }

    pub fn cart(&self) -> Cart {
        self.store.cart()
    }

    pub async fn add_product(&self, product_id: ProductId) -> bool {
        match self.store.add_product(product_id).await {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!(product_id, error = %e, "Add product failed");
                let message = match e {
                    CartError::StockExceeded { .. } => &self.messages.stock_exceeded,
                    _ => &self.messages.add_failed,
                };
                self.sink.error(message);
                false
            }
        }
    }

    pub async fn remove_product(&self, product_id: ProductId) -> bool {
        match self.store.remove_product(product_id).await {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!(product_id, error = %e, "Remove product failed");
                self.sink.error(&self.messages.remove_failed);
                false
            }
        }
    }

    pub async fn update_product_amount(&self, product_id: ProductId, amount: i64) -> bool {
        let message = match self.store.update_product_amount(product_id, amount).await {
            Ok(_) => return true,
            Err(CartError::InvalidAmount { .. }) => return false,
            Err(e @ CartError::StockExceeded { .. }) => {
                tracing::debug!(product_id, error = %e, "Update rejected");
                &self.messages.stock_exceeded
            }
            Err(e) => {
                tracing::debug!(product_id, error = %e, "Update failed");
                &self.messages.update_failed
            }
        };
        self.sink.error(message);
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Product, StockRecord};
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct FixedCatalog {
        stock: HashMap<ProductId, u32>,
    }

    #[async_trait::async_trait]
    impl StockLookup for FixedCatalog {
        async fn stock(&self, product_id: ProductId) -> Result<StockRecord> {
            match self.stock.get(&product_id) {
                Some(&amount) => Ok(StockRecord {
                    id: product_id,
                    amount,
                }),
                None => Err(CartError::UnexpectedStatus {
                    status: 500,
                    url: format!("http://catalog/stock/{}", product_id),
                }),
            }
        }
    }

    #[async_trait::async_trait]
    impl ProductLookup for FixedCatalog {
        async fn product(&self, product_id: ProductId) -> Result<Product> {
            if self.stock.contains_key(&product_id) {
                Ok(Product {
                    id: product_id,
                    metadata: serde_json::Map::new(),
                })
            } else {
                Err(CartError::NotFound {
                    resource: "product",
                    product_id,
                })
            }
        }
    }

    #[derive(Default)]
    struct NullStorage;

    impl BlobStore for NullStorage {
        async fn load(&self, _key: &str) -> Result<Option<String>> {
            Ok(None)
        }

        async fn save(&self, _key: &str, _value: &str) -> Result<()> {
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        messages: Mutex<Vec<String>>,
    }

    impl RecordingSink {
        fn take(&self) -> Vec<String> {
            std::mem::take(&mut *self.messages.lock().unwrap())
        }
    }

    impl NotificationSink for RecordingSink {
        fn error(&self, message: &str) {
            self.messages.lock().unwrap().push(message.to_string());
        }
    }

    async fn notifying_cart(
        stock: &[(ProductId, u32)],
    ) -> (
        NotifyingCart<Arc<FixedCatalog>, Arc<FixedCatalog>, NullStorage, Arc<RecordingSink>>,
        Arc<RecordingSink>,
    ) {
        let catalog = Arc::new(FixedCatalog {
            stock: stock.iter().copied().collect(),
        });
        let store = CartStore::open(catalog.clone(), catalog, NullStorage).await;
        let sink = Arc::new(RecordingSink::default());
        (NotifyingCart::new(Arc::new(store), sink.clone()), sink)
    }

    #[tokio::test]
    async fn test_add_reports_stock_and_lookup_failures() {
        let (cart, sink) = notifying_cart(&[(1, 1)]).await;

        cart.add_product(1).await;
        assert!(sink.take().is_empty());

        cart.add_product(1).await;
        assert_eq!(sink.take(), vec!["Requested quantity exceeds available stock"]);

        cart.add_product(2).await;
        assert_eq!(sink.take(), vec!["Failed to add product"]);

        assert_eq!(cart.cart().len(), 1);
    }

    #[tokio::test]
    async fn test_remove_reports_missing_product() {
        let (cart, sink) = notifying_cart(&[(1, 1)]).await;

        cart.remove_product(1).await;

        assert_eq!(sink.take(), vec!["Failed to remove product"]);
    }

    #[tokio::test]
    async fn test_update_messages() {
        let (cart, sink) = notifying_cart(&[(1, 5), (2, 5)]).await;
        cart.add_product(1).await;

        cart.update_product_amount(1, 0).await;
        cart.update_product_amount(1, -1).await;
        assert!(sink.take().is_empty());

        cart.update_product_amount(1, 10).await;
        assert_eq!(sink.take(), vec!["Requested quantity exceeds available stock"]);

        cart.update_product_amount(2, 1).await;
        assert_eq!(sink.take(), vec!["Failed to update product quantity"]);

        cart.update_product_amount(3, 1).await;
        assert_eq!(sink.take(), vec!["Failed to update product quantity"]);

        cart.update_product_amount(1, 3).await;
        assert!(sink.take().is_empty());
        assert_eq!(cart.cart().get(1).unwrap().amount, 3);
    }

    #[tokio::test]
    async fn test_outcome_reflects_acceptance_not_change() {
        let (cart, sink) = notifying_cart(&[(1, 5)]).await;
        assert!(cart.add_product(1).await);
        assert!(cart.update_product_amount(1, 2).await);

        // same amount again: accepted and persisted even though nothing moved
        let before = cart.cart();
        assert!(cart.update_product_amount(1, 2).await);
        assert_eq!(cart.cart(), before);
        assert!(sink.take().is_empty());

        assert!(!cart.update_product_amount(1, 0).await);
        assert!(!cart.update_product_amount(1, 6).await);
        assert!(!cart.remove_product(9).await);
        assert!(cart.remove_product(1).await);
        assert_eq!(
            sink.take(),
            vec![
                "Requested quantity exceeds available stock",
                "Failed to remove product"
            ]
        );
    }

    #[tokio::test]
    async fn test_localized_messages() {
        let (cart, sink) = notifying_cart(&[]).await;
        let cart = cart.with_messages(NotificationMessages::for_locale("pt-BR").unwrap());

        cart.add_product(1).await;
        cart.remove_product(1).await;

        assert_eq!(
            sink.take(),
            vec!["Erro na adição do produto", "Erro na remoção do produto"]
        );
    }

    #[test]
    fn test_unknown_locale_is_rejected() {
        assert_eq!(
            NotificationMessages::for_locale("EN").unwrap(),
            NotificationMessages::english()
        );
        assert!(NotificationMessages::for_locale("fr").is_err());
    }
}
