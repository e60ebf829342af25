use crate::config::toml_config::TomlConfig;
use crate::core::ProductId;
use crate::utils::error::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "cart")]
#[command(about = "Manage a shopping cart against a catalog API")]
pub struct CliArgs {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "cart.toml")]
    pub config: PathBuf,

    /// Override the catalog API base URL
    #[arg(long)]
    pub api_url: Option<String>,

    /// Override the directory holding the cart snapshot
    #[arg(long)]
    pub storage_path: Option<String>,

    /// Override the notification locale (en, pt-BR)
    #[arg(long)]
    pub locale: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Compact,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Show the cart contents
    List,
    /// Add one unit of a product
    Add { product_id: ProductId },
    /// Remove a product from the cart
    Remove { product_id: ProductId },
    /// Set the quantity of a product already in the cart
    Update {
        product_id: ProductId,
        #[arg(allow_negative_numbers = true)]
        amount: i64,
    },
}

impl CliArgs {
    /// Reads the config file when it exists, then applies the command line overrides.
    pub fn load_config(&self) -> Result<TomlConfig> {
        let mut config = if self.config.exists() {
            TomlConfig::from_file(&self.config)?
        } else {
            tracing::debug!(
                "Config file {} not found, using defaults",
                self.config.display()
            );
            TomlConfig::default()
        };

        if let Some(api_url) = &self.api_url {
            config.api.base_url = api_url.clone();
        }
        if let Some(storage_path) = &self.storage_path {
            config.storage.path = storage_path.clone();
        }
        if let Some(locale) = &self.locale {
            config.notifications.locale = locale.clone();
        }

        Ok(config)
    }
}
