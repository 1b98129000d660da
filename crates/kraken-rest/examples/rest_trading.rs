//! Example: REST API trading operations
//!
//! This example demonstrates how to:
//! - Load credentials from the environment or a key file
//! - Check account balances and open orders
//! - Validate an order without submitting it
//!
//! Run with: cargo run --example rest_trading
//!
//! NOTE: Set KRAKEN_API_KEY and KRAKEN_PRIVATE_KEY, or place a two-line
//! `kraken.key` file (key, then secret) in the working directory.

use kraken_rest::{ClientConfig, KrakenRestClient, OrderRequest, RestError};
use rust_decimal_macros::dec;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    println!("=== Kraken REST Trading Example ===\n");

    let config = match ClientConfig::new().with_env_credentials() {
        Ok(config) => config,
        Err(_) => match ClientConfig::new().with_key_file("kraken.key") {
            Ok(config) => config,
            Err(e) => {
                println!("No credentials available: {}", e);
                return Ok(());
            }
        },
    };
    let client = KrakenRestClient::with_config(config)?;

    // Balances
    println!("--- Balances ---");
    match client.get_balance().await {
        Ok(balance) => {
            for (asset, amount) in balance.non_zero() {
                println!("  {}: {}", asset, amount);
            }
        }
        Err(e) => println!("  Error: {}", e),
    }
    println!();

    // Open orders
    println!("--- Open Orders ---");
    match client.get_open_orders().await {
        Ok(orders) if orders.open.is_empty() => println!("  None"),
        Ok(orders) => {
            for (txid, order) in &orders.open {
                println!("  {}: {}", txid, order.descr.order);
            }
        }
        Err(e) => println!("  Error: {}", e),
    }
    println!();

    // Validate-only order from raw strings
    println!("--- Validate Order ---");
    let order = OrderRequest::from_strs("XBTUSD", "buy", "limit", "0.0001")?
        .with_price(dec!(10000))
        .with_flags_str("post")?
        .validate_only();

    match client.add_order(&order).await {
        Ok(response) => println!("  Accepted: {}", response.descr.order),
        Err(e @ RestError::Api { .. }) => {
            println!("  Rejected: {} (strategy: {:?})", e, e.recovery_strategy());
        }
        Err(e) => println!("  Error: {}", e),
    }

    // Local validation catches bad input before anything is sent
    if let Err(e) = OrderRequest::from_strs("XBTUSD", "hold", "limit", "1") {
        println!("  Local validation: {}", e);
    }

    Ok(())
}
