pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliArgs;

pub use crate::adapters::{ConsoleSink, HttpCatalog, LocalBlobStore, MemoryBlobStore, TracingSink};
pub use crate::app::{open_session, CartSession};
pub use crate::config::TomlConfig;
pub use crate::core::cart_store::CartStore;
pub use crate::core::notifier::{NotificationMessages, NotifyingCart};
pub use crate::domain::model::{Cart, LineItem, Product, ProductId, StockRecord};
pub use crate::utils::error::{CartError, Result};
