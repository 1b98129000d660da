//! Private account endpoints
//!
//! These endpoints require authentication.

use std::collections::HashMap;

use tracing::{debug, instrument};

use crate::dispatcher::{Dispatcher, Params};
use crate::error::RestResult;
use crate::transport::HttpTransport;
use crate::types::{
    BalanceInfo, ClosedOrdersResult, LedgerEntry, LedgersResult, OpenOrdersResult, OpenPosition,
    OrderInfo, TradeBalance, TradeHistoryEntry, TradeVolume, TradesHistoryResult,
};
use crate::validate::{check_id_list, check_range, join_ids};

fn push_opt<V: ToString>(params: &mut Params, name: &'static str, value: Option<V>) {
    if let Some(value) = value {
        params.push((name, value.to_string()));
    }
}

/// Private account endpoints
pub struct AccountEndpoints<'a, T> {
    dispatcher: &'a Dispatcher<T>,
}

impl<'a, T: HttpTransport> AccountEndpoints<'a, T> {
    pub fn new(dispatcher: &'a Dispatcher<T>) -> Self {
        Self { dispatcher }
    }

    /// Get account balance
    #[instrument(skip(self))]
    pub async fn get_balance(&self) -> RestResult<BalanceInfo> {
        self.dispatcher.private("Balance", &[]).await
    }

    /// Get trade balance (margin info)
    ///
    /// # Arguments
    /// * `aclass` - Asset class (default: "currency")
    /// * `asset` - Base asset for calculations (default: "ZUSD")
    #[instrument(skip(self))]
    pub async fn get_trade_balance(
        &self,
        aclass: Option<&str>,
        asset: Option<&str>,
    ) -> RestResult<TradeBalance> {
        let mut params: Params = Vec::new();
        push_opt(&mut params, "aclass", aclass);
        push_opt(&mut params, "asset", asset);

        self.dispatcher.private("TradeBalance", &params).await
    }

    /// Get open orders
    ///
    /// # Arguments
    /// * `trades` - Include trade IDs
    /// * `userref` - Filter by user reference
    #[instrument(skip(self))]
    pub async fn get_open_orders(
        &self,
        trades: Option<bool>,
        userref: Option<i32>,
    ) -> RestResult<OpenOrdersResult> {
        let mut params: Params = Vec::new();
        push_opt(&mut params, "trades", trades);
        push_opt(&mut params, "userref", userref);

        self.dispatcher.private("OpenOrders", &params).await
    }

    /// Get closed orders
    ///
    /// # Arguments
    /// * `trades` - Include trade IDs
    /// * `userref` - Filter by user reference
    /// * `start` - Start of range (requires `end`)
    /// * `end` - End of range
    /// * `ofs` - Offset for pagination
    /// * `closetime` - Which time to use (open, close, both)
    #[instrument(skip(self))]
    pub async fn get_closed_orders(
        &self,
        trades: Option<bool>,
        userref: Option<i32>,
        start: Option<u64>,
        end: Option<u64>,
        ofs: Option<u32>,
        closetime: Option<&str>,
    ) -> RestResult<ClosedOrdersResult> {
        check_range(start, end)?;

        let mut params: Params = Vec::new();
        push_opt(&mut params, "trades", trades);
        push_opt(&mut params, "userref", userref);
        push_opt(&mut params, "start", start);
        push_opt(&mut params, "end", end);
        push_opt(&mut params, "ofs", ofs);
        push_opt(&mut params, "closetime", closetime);

        self.dispatcher.private("ClosedOrders", &params).await
    }

    /// Query orders by transaction ID (at most 20)
    ///
    /// # Arguments
    /// * `txids` - Order transaction IDs
    /// * `trades` - Include trade IDs
    /// * `userref` - Filter by user reference
    #[instrument(skip(self, txids), fields(count = txids.len()))]
    pub async fn query_orders(
        &self,
        txids: &[&str],
        trades: Option<bool>,
        userref: Option<i32>,
    ) -> RestResult<HashMap<String, OrderInfo>> {
        check_id_list("txid", txids)?;

        let mut params: Params = vec![("txid", join_ids(txids))];
        push_opt(&mut params, "trades", trades);
        push_opt(&mut params, "userref", userref);

        self.dispatcher.private("QueryOrders", &params).await
    }

    /// Get trade history
    ///
    /// # Arguments
    /// * `trade_type` - Type of trades (all, any position, closed position, ...)
    /// * `trades` - Include related trades
    /// * `start` - Start of range (requires `end`)
    /// * `end` - End of range
    /// * `ofs` - Offset for pagination
    #[instrument(skip(self))]
    pub async fn get_trades_history(
        &self,
        trade_type: Option<&str>,
        trades: Option<bool>,
        start: Option<u64>,
        end: Option<u64>,
        ofs: Option<u32>,
    ) -> RestResult<TradesHistoryResult> {
        check_range(start, end)?;

        let mut params: Params = Vec::new();
        push_opt(&mut params, "type", trade_type);
        push_opt(&mut params, "trades", trades);
        push_opt(&mut params, "start", start);
        push_opt(&mut params, "end", end);
        push_opt(&mut params, "ofs", ofs);

        self.dispatcher.private("TradesHistory", &params).await
    }

    /// Query trades by transaction ID (at most 20)
    #[instrument(skip(self, txids), fields(count = txids.len()))]
    pub async fn query_trades(
        &self,
        txids: &[&str],
        trades: Option<bool>,
    ) -> RestResult<HashMap<String, TradeHistoryEntry>> {
        check_id_list("txid", txids)?;

        let mut params: Params = vec![("txid", join_ids(txids))];
        push_opt(&mut params, "trades", trades);

        self.dispatcher.private("QueryTrades", &params).await
    }

    /// Get open positions
    ///
    /// # Arguments
    /// * `txids` - Position transaction IDs (at most 20); all positions when empty
    /// * `docalcs` - Include profit/loss calculations
    #[instrument(skip(self, txids), fields(count = txids.len()))]
    pub async fn get_open_positions(
        &self,
        txids: &[&str],
        docalcs: Option<bool>,
    ) -> RestResult<HashMap<String, OpenPosition>> {
        check_id_list("txid", txids)?;

        let mut params: Params = Vec::new();
        if !txids.is_empty() {
            params.push(("txid", join_ids(txids)));
        }
        push_opt(&mut params, "docalcs", docalcs);

        self.dispatcher.private("OpenPositions", &params).await
    }

    /// Get ledger entries
    ///
    /// # Arguments
    /// * `asset` - Comma list of assets (default: all)
    /// * `aclass` - Asset class
    /// * `ledger_type` - Type (all, deposit, withdrawal, trade, margin)
    /// * `start` - Start of range (requires `end`)
    /// * `end` - End of range
    /// * `ofs` - Offset for pagination
    #[instrument(skip(self))]
    pub async fn get_ledgers(
        &self,
        asset: Option<&str>,
        aclass: Option<&str>,
        ledger_type: Option<&str>,
        start: Option<u64>,
        end: Option<u64>,
        ofs: Option<u32>,
    ) -> RestResult<LedgersResult> {
        check_range(start, end)?;

        let mut params: Params = Vec::new();
        push_opt(&mut params, "asset", asset);
        push_opt(&mut params, "aclass", aclass);
        push_opt(&mut params, "type", ledger_type);
        push_opt(&mut params, "start", start);
        push_opt(&mut params, "end", end);
        push_opt(&mut params, "ofs", ofs);

        self.dispatcher.private("Ledgers", &params).await
    }

    /// Query ledger entries by ID (at most 20)
    #[instrument(skip(self, ids), fields(count = ids.len()))]
    pub async fn query_ledgers(&self, ids: &[&str]) -> RestResult<HashMap<String, LedgerEntry>> {
        check_id_list("id", ids)?;

        let params: Params = vec![("id", join_ids(ids))];
        self.dispatcher.private("QueryLedgers", &params).await
    }

    /// Get 30-day trade volume and fee tiers
    ///
    /// # Arguments
    /// * `pairs` - Pairs to report fees for
    /// * `fee_info` - Include fee info
    #[instrument(skip(self))]
    pub async fn get_trade_volume(
        &self,
        pairs: Option<&[&str]>,
        fee_info: Option<bool>,
    ) -> RestResult<TradeVolume> {
        let mut params: Params = Vec::new();
        if let Some(pairs) = pairs {
            params.push(("pair", join_ids(pairs)));
        }
        push_opt(&mut params, "fee-info", fee_info);

        debug!("Fetching trade volume");
        self.dispatcher.private("TradeVolume", &params).await
    }
}
