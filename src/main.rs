use anyhow::Context;
use cart_store::config::{CliArgs, Command, LogFormat};
use cart_store::utils::{logger, validation::Validate};
use cart_store::core::NotificationSink;
use cart_store::{open_session, Cart, ConsoleSink, NotificationMessages, TomlConfig, TracingSink};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    match args.log_format {
        LogFormat::Compact => logger::init_cli_logger(args.verbose),
        LogFormat::Json => logger::init_json_logger(args.verbose),
    }

    tracing::debug!("CLI args: {:?}", args);

    let config = match args.load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config.display(), e);
            eprintln!("💡 Make sure the file is valid TOML");
            std::process::exit(1);
        }
    };

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    let messages = config.notifications.messages()?;

    // notifications follow the log format
    let accepted = match args.log_format {
        LogFormat::Compact => run(&args.command, &config, messages, ConsoleSink).await?,
        LogFormat::Json => run(&args.command, &config, messages, TracingSink).await?,
    };

    // rejected mutations exit non-zero
    if !accepted {
        std::process::exit(2);
    }

    Ok(())
}

async fn run<N: NotificationSink>(
    command: &Command,
    config: &TomlConfig,
    messages: NotificationMessages,
    sink: N,
) -> anyhow::Result<bool> {
    let session = open_session(config, messages, sink)
        .await
        .context("failed to open cart session")?;

    let accepted = match *command {
        Command::List => true,
        Command::Add { product_id } => session.add_product(product_id).await,
        Command::Remove { product_id } => session.remove_product(product_id).await,
        Command::Update { product_id, amount } => {
            session.update_product_amount(product_id, amount).await
        }
    };

    print_cart(&session.cart());
    Ok(accepted)
}

fn print_cart(cart: &Cart) {
    if cart.is_empty() {
        println!("🛒 Cart is empty");
        return;
    }

    println!("{:>6}  {:<40}  {:>6}  {:>10}", "ID", "PRODUCT", "QTY", "PRICE");
    for item in cart.items() {
        let price = item
            .price()
            .map(|price| format!("{:.2}", price))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:>6}  {:<40}  {:>6}  {:>10}",
            item.id,
            item.title().unwrap_or("(untitled)"),
            item.amount,
            price
        );
    }
    println!(
        "📦 {} items, subtotal {:.2}",
        cart.total_items(),
        cart.subtotal()
    );
}
