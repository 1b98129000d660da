//! Main REST client implementation

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use kraken_auth::Credentials;
use tracing::{debug, info};

use crate::cursor::PollCursors;
use crate::dispatcher::{Dispatcher, DEFAULT_API_VERSION, DEFAULT_BASE_URL};
use crate::endpoints::{AccountEndpoints, MarketEndpoints, TradingEndpoints};
use crate::error::{RestError, RestResult};
use crate::transport::{HttpTransport, ReqwestTransport};
use crate::types::{
    BalanceInfo, CancelOrderResult, OhlcResult, OpenOrdersResult, OrderRequest, OrderResponse,
    OrderbookData, ServerTime, SpreadResult, SystemStatus, TickerInfo, TradesResult,
};

/// Default request timeout
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default user agent
pub const DEFAULT_USER_AGENT: &str = concat!("kraken-rest/", env!("CARGO_PKG_VERSION"));

/// Kraken REST API client
///
/// Provides access to both public and private endpoints. The client owns the
/// nonce source for its credentials and the cursors used by the polling
/// methods, so two clients never share either.
///
/// # Example
///
/// ```no_run
/// use kraken_rest::{ClientConfig, KrakenRestClient};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     // Public endpoints only
///     let mut client = KrakenRestClient::new()?;
///     let ticker = client.get_ticker("XBTUSD").await?;
///
///     // Polling: each call returns only what is new since the last one
///     let first = client.get_recent_trades("XBTUSD", None).await?;
///     let newer = client.get_recent_trades("XBTUSD", None).await?;
///
///     // With authentication for private endpoints
///     let config = ClientConfig::new().with_key_file("kraken.key")?;
///     let auth_client = KrakenRestClient::with_config(config)?;
///     let balance = auth_client.get_balance().await?;
///
///     Ok(())
/// }
/// ```
pub struct KrakenRestClient<T = ReqwestTransport> {
    dispatcher: Dispatcher<T>,
    cursors: PollCursors,
}

impl KrakenRestClient<ReqwestTransport> {
    /// Create a new client without authentication
    ///
    /// Only public endpoints will be available.
    pub fn new() -> RestResult<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new client with credentials
    pub fn with_credentials(credentials: Credentials) -> RestResult<Self> {
        Self::with_config(ClientConfig::new().with_credentials(credentials))
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: ClientConfig) -> RestResult<Self> {
        let user_agent = config.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT);
        let transport = ReqwestTransport::new(Duration::from_secs(config.timeout_secs), user_agent)?;
        Ok(Self::with_transport(config, transport))
    }
}

impl<T: HttpTransport> KrakenRestClient<T> {
    /// Create a client on top of a custom transport
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        info!(
            base_url = %config.base_url,
            authenticated = config.credentials.is_some(),
            "Created Kraken REST client"
        );

        Self {
            dispatcher: Dispatcher::new(
                transport,
                config.base_url,
                config.api_version,
                config.credentials,
            ),
            cursors: PollCursors::default(),
        }
    }

    /// Check if the client has credentials for private endpoints
    pub fn has_credentials(&self) -> bool {
        self.dispatcher.credentials().is_some()
    }

    /// Request dispatcher
    pub fn dispatcher(&self) -> &Dispatcher<T> {
        &self.dispatcher
    }

    /// Remembered polling cursors
    pub fn cursors(&self) -> &PollCursors {
        &self.cursors
    }

    /// Forget every polling cursor; the next poll for each pair starts from
    /// the beginning
    pub fn reset_cursors(&mut self) {
        debug!("Resetting polling cursors");
        self.cursors.reset();
    }

    // ========================================================================
    // Public Market Endpoints
    // ========================================================================

    /// Get market endpoints
    pub fn market(&self) -> MarketEndpoints<'_, T> {
        MarketEndpoints::new(&self.dispatcher)
    }

    /// Get server time
    pub async fn get_server_time(&self) -> RestResult<ServerTime> {
        self.market().get_server_time().await
    }

    /// Get system status
    pub async fn get_system_status(&self) -> RestResult<SystemStatus> {
        self.market().get_system_status().await
    }

    /// Get ticker information for a trading pair
    ///
    /// # Arguments
    /// * `pair` - Trading pair (e.g., "XBTUSD", "ETHUSD")
    pub async fn get_ticker(&self, pair: &str) -> RestResult<HashMap<String, TickerInfo>> {
        self.market().get_ticker(pair).await
    }

    /// Get ticker information for multiple trading pairs
    pub async fn get_tickers(&self, pairs: &[&str]) -> RestResult<HashMap<String, TickerInfo>> {
        self.market().get_tickers(pairs).await
    }

    /// Get orderbook depth for a trading pair
    ///
    /// # Arguments
    /// * `pair` - Trading pair
    /// * `count` - Number of price levels (1-500)
    pub async fn get_orderbook(
        &self,
        pair: &str,
        count: Option<u16>,
    ) -> RestResult<HashMap<String, OrderbookData>> {
        self.market().get_orderbook(pair, count).await
    }

    // ========================================================================
    // Incremental Polling
    // ========================================================================

    /// Get OHLC data, continuing from the remembered cursor
    ///
    /// An explicit `since` overrides the cursor. The `last` marker of the
    /// response becomes the cursor for `pair`.
    pub async fn get_ohlc(
        &mut self,
        pair: &str,
        interval: Option<u32>,
        since: Option<&str>,
    ) -> RestResult<OhlcResult> {
        let since = since.or_else(|| self.cursors.ohlc.get(pair)).map(str::to_string);
        let result = self.market().get_ohlc(pair, interval, since.as_deref()).await?;

        if let Some(last) = &result.last {
            self.cursors.ohlc.advance(pair, last.as_str());
        }
        Ok(result)
    }

    /// Get recent spreads, continuing from the remembered cursor
    pub async fn get_recent_spreads(&mut self, pair: &str, since: Option<&str>) -> RestResult<SpreadResult> {
        let since = since.or_else(|| self.cursors.spread.get(pair)).map(str::to_string);
        let result = self.market().get_recent_spreads(pair, since.as_deref()).await?;

        if let Some(last) = &result.last {
            self.cursors.spread.advance(pair, last.as_str());
        }
        Ok(result)
    }

    /// Get recent trades, continuing from the remembered cursor
    pub async fn get_recent_trades(&mut self, pair: &str, since: Option<&str>) -> RestResult<TradesResult> {
        let since = since.or_else(|| self.cursors.trades.get(pair)).map(str::to_string);
        let result = self.market().get_recent_trades(pair, since.as_deref()).await?;

        if let Some(last) = &result.last {
            self.cursors.trades.advance(pair, last.as_str());
        }
        Ok(result)
    }

    // ========================================================================
    // Private Account Endpoints
    // ========================================================================

    /// Get account endpoints (requires credentials)
    pub fn account(&self) -> RestResult<AccountEndpoints<'_, T>> {
        if !self.has_credentials() {
            return Err(RestError::AuthRequired);
        }
        Ok(AccountEndpoints::new(&self.dispatcher))
    }

    /// Get account balance
    pub async fn get_balance(&self) -> RestResult<BalanceInfo> {
        self.account()?.get_balance().await
    }

    /// Get open orders
    pub async fn get_open_orders(&self) -> RestResult<OpenOrdersResult> {
        self.account()?.get_open_orders(None, None).await
    }

    // ========================================================================
    // Private Trading Endpoints
    // ========================================================================

    /// Get trading endpoints (requires credentials)
    pub fn trading(&self) -> RestResult<TradingEndpoints<'_, T>> {
        if !self.has_credentials() {
            return Err(RestError::AuthRequired);
        }
        Ok(TradingEndpoints::new(&self.dispatcher))
    }

    /// Place a new order
    pub async fn add_order(&self, order: &OrderRequest) -> RestResult<OrderResponse> {
        self.trading()?.add_order(order).await
    }

    /// Cancel an order by transaction ID
    pub async fn cancel_order(&self, txid: &str) -> RestResult<CancelOrderResult> {
        self.trading()?.cancel_order(txid).await
    }

    /// Cancel all open orders
    pub async fn cancel_all_orders(&self) -> RestResult<CancelOrderResult> {
        self.trading()?.cancel_all_orders().await
    }
}

impl<T> std::fmt::Debug for KrakenRestClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KrakenRestClient")
            .field("dispatcher", &self.dispatcher)
            .field("cursors", &self.cursors)
            .finish()
    }
}

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API credentials (optional)
    pub credentials: Option<Credentials>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Custom user agent
    pub user_agent: Option<String>,
    /// API host
    pub base_url: String,
    /// Version path segment
    pub api_version: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            credentials: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_version: DEFAULT_API_VERSION,
        }
    }
}

impl ClientConfig {
    /// Create a new configuration builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set credentials
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Load credentials from a two-line key file
    pub fn with_key_file(self, path: impl AsRef<Path>) -> RestResult<Self> {
        Ok(self.with_credentials(Credentials::from_key_file(path)?))
    }

    /// Load credentials from `KRAKEN_API_KEY` and `KRAKEN_PRIVATE_KEY`
    pub fn with_env_credentials(self) -> RestResult<Self> {
        Ok(self.with_credentials(Credentials::from_env()?))
    }

    /// Set timeout
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Set the API host
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the version path segment
    pub fn with_api_version(mut self, api_version: u32) -> Self {
        self.api_version = api_version;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::MockTransport;
    use kraken_auth::AuthError;

    const SECRET: &str =
        "kQH5HW/8p1uGOVjbgWA7FunAmGO8lsSUXNsu3eow76sz84Q18fWxnyRzBHCd3pd5nE9qa99HAZtuZuj6F1huXg==";

    fn mock_client() -> KrakenRestClient<MockTransport> {
        KrakenRestClient::with_transport(
            ClientConfig::new().with_base_url("https://mock.test"),
            MockTransport::new(),
        )
    }

    fn last_url(client: &KrakenRestClient<MockTransport>) -> String {
        client.dispatcher().transport().last_request().unwrap().url
    }

    #[test]
    fn test_client_without_credentials() {
        let client = KrakenRestClient::new().unwrap();
        assert!(!client.has_credentials());
    }

    #[test]
    fn test_client_config_builder() {
        let config = ClientConfig::new()
            .with_timeout(60)
            .with_user_agent("test-agent")
            .with_api_version(1);

        assert_eq!(config.timeout_secs, 60);
        assert_eq!(config.user_agent, Some("test-agent".to_string()));
        assert_eq!(config.api_version, 1);
        assert_eq!(config.base_url, "https://api.kraken.com");
    }

    #[test]
    fn test_default_user_agent() {
        assert!(DEFAULT_USER_AGENT.starts_with("kraken-rest/"));
    }

    #[test]
    fn test_key_file_missing() {
        let result = ClientConfig::new().with_key_file("/nonexistent/kraken.key");
        assert!(matches!(
            result,
            Err(RestError::Auth(AuthError::MissingCredentials(_)))
        ));
    }

    #[test]
    fn test_auth_required_error() {
        let client = mock_client();
        assert!(matches!(client.account(), Err(RestError::AuthRequired)));
        assert!(matches!(client.trading(), Err(RestError::AuthRequired)));
    }

    #[tokio::test]
    async fn test_private_call_without_credentials_sends_nothing() {
        let client = mock_client();
        let result = client.get_balance().await;

        assert!(matches!(result, Err(RestError::AuthRequired)));
        assert!(client.dispatcher().transport().requests().is_empty());
    }

    #[tokio::test]
    async fn test_authenticated_client_reaches_private_endpoint() {
        let creds = Credentials::new("key", SECRET).unwrap();
        let client = KrakenRestClient::with_transport(
            ClientConfig::new()
                .with_base_url("https://mock.test")
                .with_credentials(creds),
            MockTransport::new(),
        );
        client
            .dispatcher()
            .transport()
            .push_body(r#"{"error":[],"result":{"open":{}}}"#);

        let orders = client.get_open_orders().await.unwrap();
        assert!(orders.open.is_empty());
        assert!(last_url(&client).ends_with("/0/private/OpenOrders"));
    }

    #[tokio::test]
    async fn test_trades_cursor_advances() {
        let mut client = mock_client();
        client
            .dispatcher()
            .transport()
            .push_body(r#"{"error":[],"result":{"XXBTZUSD":[],"last":42}}"#);
        client
            .dispatcher()
            .transport()
            .push_body(r#"{"error":[],"result":{"XXBTZUSD":[],"last":"43"}}"#);

        client.get_recent_trades("XBTUSD", None).await.unwrap();
        assert!(last_url(&client).ends_with("Trades?pair=XBTUSD"));
        assert_eq!(client.cursors().trades.get("XBTUSD"), Some("42"));

        client.get_recent_trades("XBTUSD", None).await.unwrap();
        assert!(last_url(&client).ends_with("Trades?pair=XBTUSD&since=42"));
        assert_eq!(client.cursors().trades.get("XBTUSD"), Some("43"));
    }

    #[tokio::test]
    async fn test_explicit_since_overrides_cursor() {
        let mut client = mock_client();
        client
            .dispatcher()
            .transport()
            .push_body(r#"{"error":[],"result":{"XXBTZUSD":[],"last":100}}"#);
        client
            .dispatcher()
            .transport()
            .push_body(r#"{"error":[],"result":{"XXBTZUSD":[],"last":200}}"#);

        client.get_ohlc("XBTUSD", Some(60), None).await.unwrap();
        client.get_ohlc("XBTUSD", Some(60), Some("7")).await.unwrap();

        assert!(last_url(&client).ends_with("OHLC?pair=XBTUSD&interval=60&since=7"));
        assert_eq!(client.cursors().ohlc.get("XBTUSD"), Some("200"));
    }

    #[tokio::test]
    async fn test_failed_poll_keeps_cursor() {
        let mut client = mock_client();
        client
            .dispatcher()
            .transport()
            .push_body(r#"{"error":[],"result":{"XXBTZUSD":[],"last":42}}"#);
        client
            .dispatcher()
            .transport()
            .push_body(r#"{"error":["EService:Unavailable"]}"#);

        client.get_recent_spreads("XBTUSD", None).await.unwrap();
        assert!(client.get_recent_spreads("XBTUSD", None).await.is_err());
        assert_eq!(client.cursors().spread.get("XBTUSD"), Some("42"));
    }

    #[tokio::test]
    async fn test_reset_cursors() {
        let mut client = mock_client();
        client
            .dispatcher()
            .transport()
            .push_body(r#"{"error":[],"result":{"XXBTZUSD":[],"last":42}}"#);
        client
            .dispatcher()
            .transport()
            .push_body(r#"{"error":[],"result":{"XXBTZUSD":[],"last":43}}"#);

        client.get_recent_trades("XBTUSD", None).await.unwrap();
        client.reset_cursors();
        assert!(client.cursors().trades.is_empty());

        client.get_recent_trades("XBTUSD", None).await.unwrap();
        assert!(last_url(&client).ends_with("Trades?pair=XBTUSD"));
    }
}
