use crate::core::cart_store::DEFAULT_STORAGE_KEY;
use crate::core::notifier::NotificationMessages;
use crate::core::ConfigProvider;
use crate::utils::error::{CartError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub api: ApiConfig,
    pub storage: StorageConfig,
    pub notifications: NotificationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
    pub stock_path: String,
    pub product_path: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3333".to_string(),
            timeout_seconds: 10,
            stock_path: "stock".to_string(),
            product_path: "product".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub path: String,
    pub key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: "./.cart".to_string(),
            key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

/// Locale picks the base messages; any message set here overrides it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    pub locale: String,
    pub stock_exceeded: Option<String>,
    pub add_failed: Option<String>,
    pub remove_failed: Option<String>,
    pub update_failed: Option<String>,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            locale: "en".to_string(),
            stock_exceeded: None,
            add_failed: None,
            remove_failed: None,
            update_failed: None,
        }
    }
}

impl NotificationConfig {
    pub fn messages(&self) -> Result<NotificationMessages> {
        let mut messages = NotificationMessages::for_locale(&self.locale)?;
        let overrides = [
            (&mut messages.stock_exceeded, &self.stock_exceeded),
            (&mut messages.add_failed, &self.add_failed),
            (&mut messages.remove_failed, &self.remove_failed),
            (&mut messages.update_failed, &self.update_failed),
        ];
        for (message, custom) in overrides {
            if let Some(custom) = custom {
                *message = custom.clone();
            }
        }
        Ok(messages)
    }
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(CartError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| CartError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are left as-is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| CartError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_url("api.base_url", &self.api.base_url)?;
        validation::validate_range("api.timeout_seconds", self.api.timeout_seconds, 1..=300)?;
        validation::validate_path_segment("api.stock_path", &self.api.stock_path)?;
        validation::validate_path_segment("api.product_path", &self.api.product_path)?;
        validation::validate_path("storage.path", &self.storage.path)?;
        validation::validate_non_empty_string("storage.key", &self.storage.key)?;
        self.notifications.messages()?;
        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn api_base_url(&self) -> &str {
        &self.api.base_url
    }

    fn stock_path(&self) -> &str {
        &self.api.stock_path
    }

    fn product_path(&self) -> &str {
        &self.api.product_path
    }

    fn request_timeout_seconds(&self) -> u64 {
        self.api.timeout_seconds
    }

    fn storage_path(&self) -> &str {
        &self.storage.path
    }

    fn storage_key(&self) -> &str {
        &self.storage.key
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
