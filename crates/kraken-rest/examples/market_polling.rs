//! Example: incremental market data polling
//!
//! Polls recent trades and spreads for a pair. Each poll after the first
//! only returns what is new since the previous response.
//!
//! Run with: cargo run --example market_polling -- XBTUSD

use std::time::Duration;

use kraken_rest::KrakenRestClient;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("kraken_rest=info".parse()?))
        .init();

    let pair = std::env::args().nth(1).unwrap_or_else(|| "XBTUSD".to_string());
    let mut client = KrakenRestClient::new()?;

    let status = client.get_system_status().await?;
    println!("Exchange status: {} ({})", status.status, status.timestamp);

    for round in 1..=3 {
        let trades = client.get_recent_trades(&pair, None).await?;
        let spreads = client.get_recent_spreads(&pair, None).await?;

        let trade_count: usize = trades.data.values().map(Vec::len).sum();
        let spread_count: usize = spreads.data.values().map(Vec::len).sum();

        println!(
            "Round {}: {} new trades, {} new spreads (cursor {:?})",
            round,
            trade_count,
            spread_count,
            client.cursors().trades.get(&pair)
        );

        for (name, _) in trades.data.iter() {
            if let Some(last) = trades.trades(name).last() {
                println!("  {} last trade: {} {} @ {}", name, last.side, last.volume, last.price);
            }
        }

        tokio::time::sleep(Duration::from_secs(5)).await;
    }

    client.reset_cursors();
    let ohlc = client.get_ohlc(&pair, Some(60), None).await?;
    for (name, _) in ohlc.data.iter() {
        if let Some(candle) = ohlc.candles(name).last() {
            println!(
                "{} hourly candle: O {} H {} L {} C {}",
                name, candle.open, candle.high, candle.low, candle.close
            );
        }
    }

    Ok(())
}
