//! Public market data endpoints
//!
//! These endpoints don't require authentication. Cursors are passed in
//! explicitly; see [`KrakenRestClient`](crate::KrakenRestClient) for
//! polling with remembered cursors.

use std::collections::HashMap;

use tracing::{debug, instrument, warn};

use crate::dispatcher::{Dispatcher, Params};
use crate::error::RestResult;
use crate::transport::HttpTransport;
use crate::types::{
    AssetInfo, AssetPairInfo, OhlcResult, OrderbookData, ServerTime, SpreadResult, SystemStatus,
    TickerInfo, TradesResult,
};

/// Largest `count` accepted by Depth
pub const MAX_DEPTH_COUNT: u16 = 500;

/// Public market data endpoints
pub struct MarketEndpoints<'a, T> {
    dispatcher: &'a Dispatcher<T>,
}

impl<'a, T: HttpTransport> MarketEndpoints<'a, T> {
    pub fn new(dispatcher: &'a Dispatcher<T>) -> Self {
        Self { dispatcher }
    }

    /// Get server time
    #[instrument(skip(self))]
    pub async fn get_server_time(&self) -> RestResult<ServerTime> {
        debug!("Fetching server time");
        self.dispatcher.public("Time", &[]).await
    }

    /// Get system status
    #[instrument(skip(self))]
    pub async fn get_system_status(&self) -> RestResult<SystemStatus> {
        debug!("Fetching system status");
        self.dispatcher.public("SystemStatus", &[]).await
    }

    /// Get asset info
    ///
    /// # Arguments
    /// * `assets` - Assets to get info for (e.g., ["XBT", "ETH"]); all when `None`
    #[instrument(skip(self))]
    pub async fn get_assets(&self, assets: Option<&[&str]>) -> RestResult<HashMap<String, AssetInfo>> {
        let mut params: Params = Vec::new();
        if let Some(assets) = assets {
            params.push(("asset", assets.join(",")));
        }

        debug!("Fetching asset info");
        self.dispatcher.public("Assets", &params).await
    }

    /// Get tradable asset pairs
    ///
    /// # Arguments
    /// * `pairs` - Pairs to get info for (e.g., ["XBTUSD", "ETHUSD"]); all when `None`
    #[instrument(skip(self))]
    pub async fn get_asset_pairs(
        &self,
        pairs: Option<&[&str]>,
    ) -> RestResult<HashMap<String, AssetPairInfo>> {
        let mut params: Params = Vec::new();
        if let Some(pairs) = pairs {
            params.push(("pair", pairs.join(",")));
        }

        debug!("Fetching asset pairs");
        self.dispatcher.public("AssetPairs", &params).await
    }

    /// Get ticker information
    ///
    /// # Arguments
    /// * `pair` - Trading pair (e.g., "XBTUSD")
    #[instrument(skip(self))]
    pub async fn get_ticker(&self, pair: &str) -> RestResult<HashMap<String, TickerInfo>> {
        debug!("Fetching ticker for {}", pair);
        self.dispatcher
            .public("Ticker", &[("pair", pair.to_string())])
            .await
    }

    /// Get ticker information for multiple pairs
    #[instrument(skip(self))]
    pub async fn get_tickers(&self, pairs: &[&str]) -> RestResult<HashMap<String, TickerInfo>> {
        debug!("Fetching tickers for {} pairs", pairs.len());
        self.dispatcher
            .public("Ticker", &[("pair", pairs.join(","))])
            .await
    }

    /// Get orderbook depth
    ///
    /// # Arguments
    /// * `pair` - Trading pair (e.g., "XBTUSD")
    /// * `count` - Maximum number of asks/bids (1-500)
    #[instrument(skip(self))]
    pub async fn get_orderbook(
        &self,
        pair: &str,
        count: Option<u16>,
    ) -> RestResult<HashMap<String, OrderbookData>> {
        let mut params: Params = vec![("pair", pair.to_string())];

        if let Some(count) = count {
            if count > MAX_DEPTH_COUNT {
                warn!(count, "Depth count clamped to {}", MAX_DEPTH_COUNT);
            }
            params.push(("count", count.min(MAX_DEPTH_COUNT).to_string()));
        }

        debug!("Fetching orderbook for {}", pair);
        self.dispatcher.public("Depth", &params).await
    }

    /// Get OHLC data
    ///
    /// # Arguments
    /// * `pair` - Trading pair (e.g., "XBTUSD")
    /// * `interval` - Time frame in minutes (1, 5, 15, 30, 60, 240, 1440, 10080, 21600)
    /// * `since` - Cursor from a previous response; from the beginning when `None`
    #[instrument(skip(self))]
    pub async fn get_ohlc(
        &self,
        pair: &str,
        interval: Option<u32>,
        since: Option<&str>,
    ) -> RestResult<OhlcResult> {
        let mut params: Params = vec![("pair", pair.to_string())];

        if let Some(interval) = interval {
            params.push(("interval", interval.to_string()));
        }
        if let Some(since) = since {
            params.push(("since", since.to_string()));
        }

        debug!("Fetching OHLC for {}", pair);
        self.dispatcher.public("OHLC", &params).await
    }

    /// Get recent spread data
    ///
    /// # Arguments
    /// * `pair` - Trading pair (e.g., "XBTUSD")
    /// * `since` - Cursor from a previous response; from the beginning when `None`
    #[instrument(skip(self))]
    pub async fn get_recent_spreads(&self, pair: &str, since: Option<&str>) -> RestResult<SpreadResult> {
        let mut params: Params = vec![("pair", pair.to_string())];

        if let Some(since) = since {
            params.push(("since", since.to_string()));
        }

        debug!("Fetching recent spreads for {}", pair);
        self.dispatcher.public("Spread", &params).await
    }

    /// Get recent trades
    ///
    /// # Arguments
    /// * `pair` - Trading pair (e.g., "XBTUSD")
    /// * `since` - Cursor from a previous response; from the beginning when `None`
    #[instrument(skip(self))]
    pub async fn get_recent_trades(&self, pair: &str, since: Option<&str>) -> RestResult<TradesResult> {
        let mut params: Params = vec![("pair", pair.to_string())];

        if let Some(since) = since {
            params.push(("since", since.to_string()));
        }

        debug!("Fetching recent trades for {}", pair);
        self.dispatcher.public("Trades", &params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RestError;
    use crate::transport::MockTransport;

    fn dispatcher() -> Dispatcher<MockTransport> {
        Dispatcher::new(MockTransport::new(), "https://mock.test", 0, None)
    }

    #[tokio::test]
    async fn test_server_time() {
        let dispatcher = dispatcher();
        dispatcher.transport().push_body(
            r#"{"error":[],"result":{"unixtime":1688669448,"rfc1123":"Thu, 06 Jul 23 18:50:48 +0000"}}"#,
        );

        let time = MarketEndpoints::new(&dispatcher).get_server_time().await.unwrap();
        assert_eq!(time.unixtime, 1688669448);
        assert!(dispatcher.transport().last_request().unwrap().url.ends_with("/0/public/Time"));
    }

    #[tokio::test]
    async fn test_orderbook_count_clamped() {
        let dispatcher = dispatcher();
        dispatcher.transport().push_body(
            r#"{"error":[],"result":{"XXBTZUSD":{"asks":[["30384.10000","2.059",1688671659]],"bids":[["30297.00000","0.115",1688671656]]}}}"#,
        );

        let books = MarketEndpoints::new(&dispatcher)
            .get_orderbook("XBTUSD", Some(1000))
            .await
            .unwrap();

        let book = &books["XXBTZUSD"];
        assert!(book.spread().is_some());
        assert!(dispatcher
            .transport()
            .last_request()
            .unwrap()
            .url
            .ends_with("Depth?pair=XBTUSD&count=500"));
    }

    #[tokio::test]
    async fn test_tickers_comma_list() {
        let dispatcher = dispatcher();
        dispatcher.transport().push_body(r#"{"error":[],"result":{}}"#);

        MarketEndpoints::new(&dispatcher)
            .get_tickers(&["XBTUSD", "ETHUSD"])
            .await
            .unwrap();

        assert!(dispatcher
            .transport()
            .last_request()
            .unwrap()
            .url
            .ends_with("Ticker?pair=XBTUSD%2CETHUSD"));
    }

    #[tokio::test]
    async fn test_explicit_since_is_sent() {
        let dispatcher = dispatcher();
        dispatcher
            .transport()
            .push_body(r#"{"error":[],"result":{"XXBTZUSD":[],"last":1688672106}}"#);

        let spreads = MarketEndpoints::new(&dispatcher)
            .get_recent_spreads("XBTUSD", Some("1688671834"))
            .await
            .unwrap();

        assert_eq!(spreads.last.as_deref(), Some("1688672106"));
        assert!(dispatcher
            .transport()
            .last_request()
            .unwrap()
            .url
            .ends_with("Spread?pair=XBTUSD&since=1688671834"));
    }

    #[tokio::test]
    async fn test_unknown_pair_is_api_error() {
        let dispatcher = dispatcher();
        dispatcher
            .transport()
            .push_body(r#"{"error":["EQuery:Unknown asset pair"]}"#);

        let err = MarketEndpoints::new(&dispatcher)
            .get_ticker("NOPE")
            .await
            .unwrap_err();
        assert!(matches!(err, RestError::Api { .. }));
        assert!(!err.is_retryable());
    }
}
