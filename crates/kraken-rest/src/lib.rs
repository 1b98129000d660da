//! REST API client for Kraken cryptocurrency exchange
//!
//! This crate provides a REST client for Kraken's spot API: public market
//! data, account queries and order placement.
//!
//! # Features
//!
//! - **Market Data**: Time, status, assets, pairs, ticker, orderbook, OHLC, spreads, trades
//! - **Polling**: OHLC, spread and trade calls remember the `last` cursor per pair
//! - **Account**: Balances, open/closed orders, trade history, positions, ledgers, volume
//! - **Trading**: Place and cancel orders
//!
//! # Authentication
//!
//! Private endpoints require API credentials. Each request carries a
//! strictly increasing nonce and an HMAC-SHA512 `API-Sign` header computed
//! by [`kraken_auth`] over the exact body that is sent.
//!
//! # Example
//!
//! ```no_run
//! use kraken_rest::{Credentials, KrakenRestClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Public endpoints (no auth required)
//!     let client = KrakenRestClient::new()?;
//!     let ticker = client.get_ticker("XBTUSD").await?;
//!     println!("BTC/USD: {:?}", ticker);
//!
//!     // Private endpoints (auth required)
//!     let creds = Credentials::from_env()?;
//!     let auth_client = KrakenRestClient::with_credentials(creds)?;
//!     let balance = auth_client.get_balance().await?;
//!     println!("Balances: {:?}", balance);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Errors
//!
//! Every call returns [`RestResult`]. Arguments are checked before anything
//! is sent; remote errors keep Kraken's codes verbatim in [`RestError::Api`].
//! The client never retries; use [`RestError::recovery_strategy`] to decide.

pub mod client;
pub mod cursor;
pub mod dispatcher;
pub mod endpoints;
pub mod error;
pub mod transport;
pub mod types;
pub mod validate;

// Re-export main types
pub use client::{ClientConfig, KrakenRestClient};
pub use dispatcher::{normalize_response, Dispatcher};
pub use error::{RestError, RestResult};
pub use kraken_auth::{AuthError, Credentials, NonceSource};
pub use transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, ReqwestTransport, TransportError};

#[cfg(any(test, feature = "test-utils"))]
pub use transport::MockTransport;

// Re-export endpoint-specific types
pub use types::{
    // Market data
    AssetInfo, AssetPairInfo, OhlcCandle, OhlcResult, OrderbookData, ServerTime, SpreadEntry,
    SpreadResult, SystemStatus, TickerInfo, TradeData, TradesResult,
    // Account
    BalanceInfo, ClosedOrdersResult, LedgerEntry, LedgersResult, OpenOrdersResult, OpenPosition,
    OrderInfo, TradeBalance, TradeHistoryEntry, TradeVolume, TradesHistoryResult,
    // Trading
    CancelOrderResult, OrderFlag, OrderRequest, OrderResponse, OrderSide, OrderType,
};
