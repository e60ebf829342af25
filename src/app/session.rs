use crate::adapters::{HttpCatalog, LocalBlobStore};
use crate::core::cart_store::CartStore;
use crate::core::notifier::{NotificationMessages, NotifyingCart};
use crate::core::{ConfigProvider, NotificationSink};
use crate::utils::error::Result;
use std::sync::Arc;
use std::time::Duration;

/// Cart wired to the HTTP catalog and a file-backed snapshot.
pub type CartSession<N> = NotifyingCart<HttpCatalog, HttpCatalog, LocalBlobStore, N>;

/// Builds the collaborators from configuration and restores the saved cart.
pub async fn open_session<C, N>(
    config: &C,
    messages: NotificationMessages,
    sink: N,
) -> Result<CartSession<N>>
where
    C: ConfigProvider,
    N: NotificationSink,
{
    let catalog = HttpCatalog::new(
        config.api_base_url(),
        Duration::from_secs(config.request_timeout_seconds()),
    )?
    .with_paths(config.stock_path(), config.product_path());
    let storage = LocalBlobStore::new(config.storage_path());

    tracing::debug!(
        "Opening cart session (api: {}, storage: {})",
        config.api_base_url(),
        storage.path_for(config.storage_key()).display()
    );

    let store = CartStore::open_with_key(catalog.clone(), catalog, storage, config.storage_key()).await;
    tracing::info!("Cart session opened with {} items", store.cart().len());

    Ok(NotifyingCart::new(Arc::new(store), sink).with_messages(messages))
}
