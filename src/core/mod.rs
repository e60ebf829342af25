pub mod cart_store;
pub mod notifier;

pub use crate::domain::model::{Cart, LineItem, Product, ProductId, StockRecord};
pub use crate::domain::ports::{
    BlobStore, ConfigProvider, NotificationSink, ProductLookup, StockLookup,
};
pub use crate::utils::error::Result;
