use crate::domain::model::ProductId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CartError {
    #[error("Requested quantity {requested} of product {product_id} exceeds available stock ({available})")]
    StockExceeded {
        product_id: ProductId,
        requested: u64,
        available: u32,
    },

    #[error("Product {product_id} is not in the cart")]
    NotInCart { product_id: ProductId },

    #[error("Invalid amount {amount} for product {product_id}")]
    InvalidAmount { product_id: ProductId, amount: i64 },

    #[error("{resource} not found for product {product_id}")]
    NotFound {
        resource: &'static str,
        product_id: ProductId,
    },

    #[error("API request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Unexpected response status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Stock,
    Cart,
    Input,
    Collaborator,
    Storage,
    Configuration,
}

impl CartError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            CartError::StockExceeded { .. } => ErrorCategory::Stock,
            CartError::NotInCart { .. } => ErrorCategory::Cart,
            CartError::InvalidAmount { .. } => ErrorCategory::Input,
            CartError::NotFound { .. }
            | CartError::Network(_)
            | CartError::UnexpectedStatus { .. } => ErrorCategory::Collaborator,
            CartError::IoError(_) | CartError::SerializationError(_) => ErrorCategory::Storage,
            CartError::ConfigError { .. }
            | CartError::ConfigValidationError { .. }
            | CartError::InvalidConfigValueError { .. }
            | CartError::MissingConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    /// True when the failure came from the stock or product lookup rather than
    /// from the cart contents.
    pub fn is_collaborator_failure(&self) -> bool {
        self.category() == ErrorCategory::Collaborator
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Stock => "Choose a smaller quantity",
            ErrorCategory::Cart => "Refresh the cart and try again",
            ErrorCategory::Input => "Quantities must be at least 1",
            ErrorCategory::Collaborator => "Check that the catalog API is reachable",
            ErrorCategory::Storage => "Check permissions on the storage directory",
            ErrorCategory::Configuration => "Review the configuration file and CLI flags",
        }
    }
}

pub type Result<T> = std::result::Result<T, CartError>;
