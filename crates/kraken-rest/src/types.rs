//! Types for Kraken REST API requests and responses

use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::str::FromStr;

use crate::cursor::deserialize_last;
use crate::error::{RestError, RestResult};

pub use kraken_types::{OrderFlag, OrderSide, OrderType};

fn decimal_at(row: &[Value], idx: usize) -> Option<Decimal> {
    match row.get(idx)? {
        Value::String(s) => s.parse().ok(),
        Value::Number(n) => n.to_string().parse().ok(),
        _ => None,
    }
}

fn u64_at(row: &[Value], idx: usize) -> Option<u64> {
    match row.get(idx)? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

fn f64_at(row: &[Value], idx: usize) -> Option<f64> {
    match row.get(idx)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

fn str_at(row: &[Value], idx: usize) -> Option<&str> {
    row.get(idx)?.as_str()
}

// ============================================================================
// Market Data Types
// ============================================================================

/// Server time response
#[derive(Debug, Clone, Deserialize)]
pub struct ServerTime {
    /// Unix timestamp
    pub unixtime: u64,
    /// RFC 1123 time string
    pub rfc1123: String,
}

/// System status response
#[derive(Debug, Clone, Deserialize)]
pub struct SystemStatus {
    /// online, maintenance, cancel_only or post_only
    pub status: String,
    /// Timestamp
    pub timestamp: String,
}

impl SystemStatus {
    /// Check if the exchange accepts new orders
    pub fn is_online(&self) -> bool {
        self.status == "online"
    }
}

/// Asset information
#[derive(Debug, Clone, Deserialize)]
pub struct AssetInfo {
    /// Asset class
    pub aclass: String,
    /// Alternate name
    pub altname: String,
    /// Decimals
    pub decimals: u32,
    /// Display decimals
    pub display_decimals: u32,
}

/// Asset pair information
#[derive(Debug, Clone, Deserialize)]
pub struct AssetPairInfo {
    /// Alternate pair name
    pub altname: String,
    /// WebSocket pair name
    pub wsname: Option<String>,
    /// Asset class of base
    pub aclass_base: String,
    /// Base asset
    pub base: String,
    /// Asset class of quote
    pub aclass_quote: String,
    /// Quote asset
    pub quote: String,
    /// Pair decimals
    pub pair_decimals: u32,
    /// Lot decimals
    pub lot_decimals: u32,
    /// Fee schedule array [volume, percent fee]
    #[serde(default)]
    pub fees: Vec<Vec<Value>>,
    /// Maker fee schedule
    pub fees_maker: Option<Vec<Vec<Value>>>,
    /// Minimum order size
    pub ordermin: Option<String>,
    /// Cost minimum
    pub costmin: Option<String>,
}

impl AssetPairInfo {
    /// Minimum order volume
    pub fn min_volume(&self) -> Option<Decimal> {
        self.ordermin.as_deref().and_then(|s| s.parse().ok())
    }
}

/// Ticker information for a trading pair
#[derive(Debug, Clone, Deserialize)]
pub struct TickerInfo {
    /// Ask [price, whole lot volume, lot volume]
    pub a: Vec<String>,
    /// Bid [price, whole lot volume, lot volume]
    pub b: Vec<String>,
    /// Last trade closed [price, lot volume]
    pub c: Vec<String>,
    /// Volume [today, last 24 hours]
    pub v: Vec<String>,
    /// Volume weighted average price [today, last 24 hours]
    pub p: Vec<String>,
    /// Number of trades [today, last 24 hours]
    pub t: Vec<u64>,
    /// Low [today, last 24 hours]
    pub l: Vec<String>,
    /// High [today, last 24 hours]
    pub h: Vec<String>,
    /// Today's opening price
    pub o: String,
}

impl TickerInfo {
    /// Best ask price
    pub fn ask_price(&self) -> Option<Decimal> {
        self.a.first().and_then(|s| s.parse().ok())
    }

    /// Best bid price
    pub fn bid_price(&self) -> Option<Decimal> {
        self.b.first().and_then(|s| s.parse().ok())
    }

    /// Last trade price
    pub fn last_price(&self) -> Option<Decimal> {
        self.c.first().and_then(|s| s.parse().ok())
    }

    /// Average of bid and ask
    pub fn mid_price(&self) -> Option<Decimal> {
        Some((self.ask_price()? + self.bid_price()?) / Decimal::TWO)
    }
}

/// Orderbook snapshot
#[derive(Debug, Clone, Deserialize)]
pub struct OrderbookData {
    /// Ask levels [price, volume, timestamp]
    pub asks: Vec<Vec<Value>>,
    /// Bid levels [price, volume, timestamp]
    pub bids: Vec<Vec<Value>>,
}

impl OrderbookData {
    /// Best ask price
    pub fn best_ask(&self) -> Option<Decimal> {
        self.asks.first().and_then(|level| decimal_at(level, 0))
    }

    /// Best bid price
    pub fn best_bid(&self) -> Option<Decimal> {
        self.bids.first().and_then(|level| decimal_at(level, 0))
    }

    /// Distance between best ask and best bid
    pub fn spread(&self) -> Option<Decimal> {
        Some(self.best_ask()? - self.best_bid()?)
    }
}

/// OHLC response: rows per pair plus the pagination marker
#[derive(Debug, Clone, Deserialize)]
pub struct OhlcResult {
    /// Cursor for the next poll
    #[serde(default, deserialize_with = "deserialize_last")]
    pub last: Option<String>,
    /// Raw rows keyed by pair
    #[serde(flatten)]
    pub data: HashMap<String, Vec<Vec<Value>>>,
}

impl OhlcResult {
    /// Parsed candles for a pair
    ///
    /// Rows that do not have the expected layout are skipped.
    pub fn candles(&self, pair: &str) -> Vec<OhlcCandle> {
        self.data
            .get(pair)
            .map(|rows| rows.iter().filter_map(|r| OhlcCandle::from_row(r)).collect())
            .unwrap_or_default()
    }
}

/// Individual OHLC candle
#[derive(Debug, Clone, PartialEq)]
pub struct OhlcCandle {
    /// Unix timestamp
    pub time: u64,
    /// Open price
    pub open: Decimal,
    /// High price
    pub high: Decimal,
    /// Low price
    pub low: Decimal,
    /// Close price
    pub close: Decimal,
    /// Volume weighted average price
    pub vwap: Decimal,
    /// Volume
    pub volume: Decimal,
    /// Number of trades
    pub count: u64,
}

impl OhlcCandle {
    /// Parse `[time, open, high, low, close, vwap, volume, count]`
    pub fn from_row(row: &[Value]) -> Option<Self> {
        Some(Self {
            time: u64_at(row, 0)?,
            open: decimal_at(row, 1)?,
            high: decimal_at(row, 2)?,
            low: decimal_at(row, 3)?,
            close: decimal_at(row, 4)?,
            vwap: decimal_at(row, 5)?,
            volume: decimal_at(row, 6)?,
            count: u64_at(row, 7)?,
        })
    }
}

/// Spread response: rows per pair plus the pagination marker
#[derive(Debug, Clone, Deserialize)]
pub struct SpreadResult {
    /// Cursor for the next poll
    #[serde(default, deserialize_with = "deserialize_last")]
    pub last: Option<String>,
    /// Raw rows keyed by pair
    #[serde(flatten)]
    pub data: HashMap<String, Vec<Vec<Value>>>,
}

impl SpreadResult {
    /// Parsed spread entries for a pair
    pub fn entries(&self, pair: &str) -> Vec<SpreadEntry> {
        self.data
            .get(pair)
            .map(|rows| rows.iter().filter_map(|r| SpreadEntry::from_row(r)).collect())
            .unwrap_or_default()
    }
}

/// Best bid and ask at a point in time
#[derive(Debug, Clone, PartialEq)]
pub struct SpreadEntry {
    /// Unix timestamp
    pub time: u64,
    /// Best bid
    pub bid: Decimal,
    /// Best ask
    pub ask: Decimal,
}

impl SpreadEntry {
    /// Parse `[time, bid, ask]`
    pub fn from_row(row: &[Value]) -> Option<Self> {
        Some(Self {
            time: u64_at(row, 0)?,
            bid: decimal_at(row, 1)?,
            ask: decimal_at(row, 2)?,
        })
    }
}

/// Recent trades response: rows per pair plus the pagination marker
#[derive(Debug, Clone, Deserialize)]
pub struct TradesResult {
    /// Cursor for the next poll
    #[serde(default, deserialize_with = "deserialize_last")]
    pub last: Option<String>,
    /// Raw rows keyed by pair
    #[serde(flatten)]
    pub data: HashMap<String, Vec<Vec<Value>>>,
}

impl TradesResult {
    /// Parsed trades for a pair
    pub fn trades(&self, pair: &str) -> Vec<TradeData> {
        self.data
            .get(pair)
            .map(|rows| rows.iter().filter_map(|r| TradeData::from_row(r)).collect())
            .unwrap_or_default()
    }
}

/// Trade from the public trades feed
#[derive(Debug, Clone, PartialEq)]
pub struct TradeData {
    /// Price
    pub price: Decimal,
    /// Volume
    pub volume: Decimal,
    /// Time (Unix timestamp with fraction)
    pub time: f64,
    /// Taker side
    pub side: OrderSide,
    /// "m" for market, "l" for limit
    pub order_type: String,
    /// Miscellaneous
    pub misc: String,
    /// Trade ID, when provided
    pub trade_id: Option<u64>,
}

impl TradeData {
    /// Parse `[price, volume, time, side, type, misc, trade_id]`
    pub fn from_row(row: &[Value]) -> Option<Self> {
        let side = match str_at(row, 3)? {
            "b" => OrderSide::Buy,
            "s" => OrderSide::Sell,
            _ => return None,
        };

        Some(Self {
            price: decimal_at(row, 0)?,
            volume: decimal_at(row, 1)?,
            time: f64_at(row, 2)?,
            side,
            order_type: str_at(row, 4)?.to_string(),
            misc: str_at(row, 5).unwrap_or_default().to_string(),
            trade_id: u64_at(row, 6),
        })
    }
}

// ============================================================================
// Account Types
// ============================================================================

/// Account balance per asset
#[derive(Debug, Clone, Deserialize)]
pub struct BalanceInfo(pub HashMap<String, String>);

impl BalanceInfo {
    /// Balance for a specific asset
    pub fn get(&self, asset: &str) -> Option<Decimal> {
        self.0.get(asset).and_then(|s| s.parse().ok())
    }

    /// All non-zero balances
    pub fn non_zero(&self) -> HashMap<String, Decimal> {
        self.iter()
            .filter(|(_, balance)| !balance.is_zero())
            .map(|(k, v)| (k.clone(), v))
            .collect()
    }

    /// Iterate over all parseable balances
    pub fn iter(&self) -> impl Iterator<Item = (&String, Decimal)> {
        self.0.iter().filter_map(|(k, v)| Some((k, v.parse().ok()?)))
    }
}

/// Trade balance (margin info)
#[derive(Debug, Clone, Deserialize)]
pub struct TradeBalance {
    /// Equivalent balance
    pub eb: String,
    /// Trade balance
    pub tb: String,
    /// Margin amount of open positions
    pub m: Option<String>,
    /// Unrealized P&L of open positions
    pub n: Option<String>,
    /// Cost basis of open positions
    pub c: Option<String>,
    /// Current floating valuation
    pub v: Option<String>,
    /// Equity
    pub e: Option<String>,
    /// Free margin
    pub mf: Option<String>,
    /// Margin level
    pub ml: Option<String>,
}

/// Order as returned by OpenOrders, ClosedOrders and QueryOrders
#[derive(Debug, Clone, Deserialize)]
pub struct OrderInfo {
    /// Order status
    pub status: String,
    /// User reference
    pub userref: Option<i64>,
    /// Open timestamp
    pub opentm: f64,
    /// Close timestamp (closed orders only)
    pub closetm: Option<f64>,
    /// Start timestamp
    pub starttm: Option<f64>,
    /// Expire timestamp
    pub expiretm: Option<f64>,
    /// Order description
    pub descr: OrderDescription,
    /// Volume
    pub vol: String,
    /// Executed volume
    pub vol_exec: String,
    /// Cost
    pub cost: String,
    /// Fee
    pub fee: String,
    /// Average price
    pub price: String,
    /// Stop price
    pub stopprice: Option<String>,
    /// Limit price
    pub limitprice: Option<String>,
    /// Miscellaneous
    #[serde(default)]
    pub misc: String,
    /// Order flags
    #[serde(default)]
    pub oflags: String,
    /// Close reason (closed orders only)
    pub reason: Option<String>,
    /// Trade IDs, when requested
    pub trades: Option<Vec<String>>,
}

/// Order description
#[derive(Debug, Clone, Deserialize)]
pub struct OrderDescription {
    /// Asset pair
    pub pair: String,
    /// buy or sell
    #[serde(rename = "type")]
    pub side: String,
    /// Order type
    pub ordertype: String,
    /// Primary price
    pub price: String,
    /// Secondary price
    pub price2: String,
    /// Leverage
    pub leverage: String,
    /// Human readable description
    pub order: String,
    /// Close order description
    #[serde(default)]
    pub close: String,
}

/// OpenOrders result
#[derive(Debug, Clone, Deserialize)]
pub struct OpenOrdersResult {
    /// Open orders keyed by transaction ID
    pub open: HashMap<String, OrderInfo>,
}

/// ClosedOrders result
#[derive(Debug, Clone, Deserialize)]
pub struct ClosedOrdersResult {
    /// Closed orders keyed by transaction ID
    pub closed: HashMap<String, OrderInfo>,
    /// Total matching orders
    pub count: u32,
}

/// Trade history entry
#[derive(Debug, Clone, Deserialize)]
pub struct TradeHistoryEntry {
    /// Order transaction ID
    pub ordertxid: String,
    /// Position transaction ID
    pub postxid: Option<String>,
    /// Pair
    pub pair: String,
    /// Time of trade
    pub time: f64,
    /// buy or sell
    #[serde(rename = "type")]
    pub side: String,
    /// Order type
    pub ordertype: String,
    /// Price
    pub price: String,
    /// Cost
    pub cost: String,
    /// Fee
    pub fee: String,
    /// Volume
    pub vol: String,
    /// Margin
    pub margin: Option<String>,
    /// Miscellaneous
    #[serde(default)]
    pub misc: String,
}

/// TradesHistory result
#[derive(Debug, Clone, Deserialize)]
pub struct TradesHistoryResult {
    /// Trades keyed by transaction ID
    pub trades: HashMap<String, TradeHistoryEntry>,
    /// Total matching trades
    pub count: u32,
}

/// Open margin position
#[derive(Debug, Clone, Deserialize)]
pub struct OpenPosition {
    /// Order transaction ID
    pub ordertxid: String,
    /// Position status
    pub posstatus: String,
    /// Pair
    pub pair: String,
    /// Time of position
    pub time: f64,
    /// buy or sell
    #[serde(rename = "type")]
    pub side: String,
    /// Order type
    pub ordertype: String,
    /// Cost
    pub cost: String,
    /// Fee
    pub fee: String,
    /// Volume
    pub vol: String,
    /// Closed volume
    pub vol_closed: String,
    /// Margin
    pub margin: String,
    /// Current value (with docalcs)
    pub value: Option<String>,
    /// Unrealized P&L (with docalcs)
    pub net: Option<String>,
    /// Terms
    pub terms: Option<String>,
    /// Rollover time
    pub rollovertm: Option<String>,
    /// Miscellaneous
    #[serde(default)]
    pub misc: String,
    /// Order flags
    #[serde(default)]
    pub oflags: String,
}

/// Ledger entry
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerEntry {
    /// Reference ID
    pub refid: String,
    /// Time
    pub time: f64,
    /// Entry type
    #[serde(rename = "type")]
    pub entry_type: String,
    /// Sub-type
    pub subtype: Option<String>,
    /// Asset class
    pub aclass: String,
    /// Asset
    pub asset: String,
    /// Amount
    pub amount: String,
    /// Fee
    pub fee: String,
    /// Balance after
    pub balance: String,
}

/// Ledgers result
#[derive(Debug, Clone, Deserialize)]
pub struct LedgersResult {
    /// Ledger entries keyed by ID
    pub ledger: HashMap<String, LedgerEntry>,
    /// Total matching entries
    pub count: u32,
}

/// 30-day trade volume and fee tiers
#[derive(Debug, Clone, Deserialize)]
pub struct TradeVolume {
    /// Currency for volume
    pub currency: String,
    /// Current 30-day volume
    pub volume: String,
    /// Taker fee tier per pair
    pub fees: Option<HashMap<String, FeeInfo>>,
    /// Maker fee tier per pair
    pub fees_maker: Option<HashMap<String, FeeInfo>>,
}

/// Fee tier info
#[derive(Debug, Clone, Deserialize)]
pub struct FeeInfo {
    /// Current fee
    pub fee: String,
    /// Minimum fee
    pub minfee: Option<String>,
    /// Maximum fee
    pub maxfee: Option<String>,
    /// Next tier volume
    pub nextvolume: Option<String>,
    /// Next tier fee
    pub nextfee: Option<String>,
    /// Tier volume
    pub tiervolume: Option<String>,
}

// ============================================================================
// Trading Types
// ============================================================================

/// Request to place an order
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRequest {
    /// Trading pair
    pub pair: String,
    /// Order side
    pub side: OrderSide,
    /// Order type
    pub order_type: OrderType,
    /// Order volume
    pub volume: Decimal,
    /// Price (limit price, or trigger price for conditional orders)
    pub price: Option<Decimal>,
    /// Secondary price
    pub price2: Option<Decimal>,
    /// Leverage (for margin)
    pub leverage: Option<String>,
    /// Order flags
    pub flags: Vec<OrderFlag>,
    /// Scheduled start time
    pub starttm: Option<String>,
    /// Expiration time
    pub expiretm: Option<String>,
    /// User reference ID
    pub userref: Option<i32>,
    /// Validate only (don't submit)
    pub validate: bool,
    /// Close order type
    pub close_order_type: Option<OrderType>,
    /// Close order price
    pub close_price: Option<Decimal>,
    /// Close order secondary price
    pub close_price2: Option<Decimal>,
}

impl OrderRequest {
    /// Create an order with only the required fields
    pub fn new(pair: impl Into<String>, side: OrderSide, order_type: OrderType, volume: Decimal) -> Self {
        Self {
            pair: pair.into(),
            side,
            order_type,
            volume,
            price: None,
            price2: None,
            leverage: None,
            flags: Vec::new(),
            starttm: None,
            expiretm: None,
            userref: None,
            validate: false,
            close_order_type: None,
            close_price: None,
            close_price2: None,
        }
    }

    /// Create a market order
    pub fn market(pair: impl Into<String>, side: OrderSide, volume: Decimal) -> Self {
        Self::new(pair, side, OrderType::Market, volume)
    }

    /// Create a limit order
    pub fn limit(pair: impl Into<String>, side: OrderSide, volume: Decimal, price: Decimal) -> Self {
        Self::new(pair, side, OrderType::Limit, volume).with_price(price)
    }

    /// Create an order from raw wire strings
    ///
    /// `side`, `order_type` and `volume` are checked here, so a bad value is
    /// reported before anything is sent.
    pub fn from_strs(pair: &str, side: &str, order_type: &str, volume: &str) -> RestResult<Self> {
        let side = OrderSide::from_str(side)?;
        let order_type = OrderType::from_str(order_type)?;
        let volume = Decimal::from_str(volume.trim())
            .map_err(|_| RestError::validation("volume", format!("not a decimal: {:?}", volume)))?;

        Ok(Self::new(pair, side, order_type, volume))
    }

    /// Set flags from a comma-separated list such as `"post,fciq"`
    pub fn with_flags_str(mut self, flags: &str) -> RestResult<Self> {
        self.flags = OrderFlag::parse_list(flags)?;
        Ok(self)
    }

    /// Set the primary price
    pub fn with_price(mut self, price: Decimal) -> Self {
        self.price = Some(price);
        self
    }

    /// Set the secondary price
    pub fn with_price2(mut self, price2: Decimal) -> Self {
        self.price2 = Some(price2);
        self
    }

    /// Add an order flag
    pub fn with_flag(mut self, flag: OrderFlag) -> Self {
        if !self.flags.contains(&flag) {
            self.flags.push(flag);
        }
        self
    }

    /// Set as post-only (maker only)
    pub fn post_only(self) -> Self {
        self.with_flag(OrderFlag::PostOnly)
    }

    /// Set leverage for margin trading
    pub fn with_leverage(mut self, leverage: impl Into<String>) -> Self {
        self.leverage = Some(leverage.into());
        self
    }

    /// Set the scheduled start time (`0`, `+<n>` or a Unix timestamp)
    pub fn with_start_time(mut self, starttm: impl Into<String>) -> Self {
        self.starttm = Some(starttm.into());
        self
    }

    /// Set the expiration time (`0`, `+<n>` or a Unix timestamp)
    pub fn with_expire_time(mut self, expiretm: impl Into<String>) -> Self {
        self.expiretm = Some(expiretm.into());
        self
    }

    /// Set user reference ID
    pub fn with_userref(mut self, userref: i32) -> Self {
        self.userref = Some(userref);
        self
    }

    /// Set as validate-only (don't actually submit)
    pub fn validate_only(mut self) -> Self {
        self.validate = true;
        self
    }

    /// Attach a conditional close order
    pub fn with_close(mut self, order_type: OrderType, price: Decimal, price2: Option<Decimal>) -> Self {
        self.close_order_type = Some(order_type);
        self.close_price = Some(price);
        self.close_price2 = price2;
        self
    }

    /// Request parameters, optional fields only when set
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params: Vec<(&'static str, String)> = vec![
            ("pair", self.pair.clone()),
            ("type", self.side.to_string()),
            ("ordertype", self.order_type.to_string()),
            ("volume", self.volume.to_string()),
        ];

        if let Some(price) = &self.price {
            params.push(("price", price.to_string()));
        }
        if let Some(price2) = &self.price2 {
            params.push(("price2", price2.to_string()));
        }
        if let Some(leverage) = &self.leverage {
            params.push(("leverage", leverage.clone()));
        }
        if !self.flags.is_empty() {
            params.push(("oflags", OrderFlag::join(&self.flags)));
        }
        if let Some(starttm) = &self.starttm {
            params.push(("starttm", starttm.clone()));
        }
        if let Some(expiretm) = &self.expiretm {
            params.push(("expiretm", expiretm.clone()));
        }
        if let Some(userref) = self.userref {
            params.push(("userref", userref.to_string()));
        }
        if self.validate {
            params.push(("validate", "true".to_string()));
        }
        if let Some(close_type) = &self.close_order_type {
            params.push(("close[ordertype]", close_type.to_string()));
        }
        if let Some(close_price) = &self.close_price {
            params.push(("close[price]", close_price.to_string()));
        }
        if let Some(close_price2) = &self.close_price2 {
            params.push(("close[price2]", close_price2.to_string()));
        }

        params
    }
}

/// Response from placing an order
#[derive(Debug, Clone, Deserialize)]
pub struct OrderResponse {
    /// Order description
    pub descr: OrderResponseDescription,
    /// Transaction IDs (absent for validate-only orders)
    pub txid: Option<Vec<String>>,
}

/// Order response description
#[derive(Debug, Clone, Deserialize)]
pub struct OrderResponseDescription {
    /// Order description
    pub order: String,
    /// Close order description
    pub close: Option<String>,
}

/// Cancel order result
#[derive(Debug, Clone, Deserialize)]
pub struct CancelOrderResult {
    /// Number of orders cancelled
    pub count: u32,
    /// Whether cancel is pending
    pub pending: Option<bool>,
}
