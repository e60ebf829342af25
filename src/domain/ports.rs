use crate::domain::model::{Product, ProductId, StockRecord};
use crate::utils::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait StockLookup: Send + Sync {
    async fn stock(&self, product_id: ProductId) -> Result<StockRecord>;
}

#[async_trait]
pub trait ProductLookup: Send + Sync {
    async fn product(&self, product_id: ProductId) -> Result<Product>;
}

/// Key-value store holding serialized cart snapshots.
pub trait BlobStore: Send + Sync {
    fn load(&self, key: &str) -> impl std::future::Future<Output = Result<Option<String>>> + Send;
    fn save(
        &self,
        key: &str,
        value: &str,
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait NotificationSink: Send + Sync {
    fn error(&self, message: &str);
}

pub trait ConfigProvider: Send + Sync {
    fn api_base_url(&self) -> &str;
    fn stock_path(&self) -> &str;
    fn product_path(&self) -> &str;
    fn request_timeout_seconds(&self) -> u64;
    fn storage_path(&self) -> &str;
    fn storage_key(&self) -> &str;
}

#[async_trait]
impl<T: StockLookup + ?Sized> StockLookup for std::sync::Arc<T> {
    async fn stock(&self, product_id: ProductId) -> Result<StockRecord> {
        (**self).stock(product_id).await
    }
}

#[async_trait]
impl<T: ProductLookup + ?Sized> ProductLookup for std::sync::Arc<T> {
    async fn product(&self, product_id: ProductId) -> Result<Product> {
        (**self).product(product_id).await
    }
}

impl<T: NotificationSink + ?Sized> NotificationSink for std::sync::Arc<T> {
    fn error(&self, message: &str) {
        (**self).error(message)
    }
}
