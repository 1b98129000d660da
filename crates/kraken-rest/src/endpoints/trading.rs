//! Trading endpoints for order management
//!
//! These endpoints require authentication.

use tracing::{debug, instrument};

use crate::dispatcher::Dispatcher;
use crate::error::RestResult;
use crate::transport::HttpTransport;
use crate::types::{CancelOrderResult, OrderRequest, OrderResponse};

/// Trading endpoints for order management
pub struct TradingEndpoints<'a, T> {
    dispatcher: &'a Dispatcher<T>,
}

impl<'a, T: HttpTransport> TradingEndpoints<'a, T> {
    pub fn new(dispatcher: &'a Dispatcher<T>) -> Self {
        Self { dispatcher }
    }

    /// Add a new order
    ///
    /// Side, order type and flags are carried as enums, so an order that
    /// reaches this point is already valid; build from raw strings with
    /// [`OrderRequest::from_strs`].
    #[instrument(skip(self, order), fields(pair = %order.pair, side = %order.side, order_type = %order.order_type))]
    pub async fn add_order(&self, order: &OrderRequest) -> RestResult<OrderResponse> {
        let params = order.to_params();

        debug!(
            "Placing {} {} order for {} {}",
            order.side, order.order_type, order.volume, order.pair
        );

        self.dispatcher.private("AddOrder", &params).await
    }

    /// Cancel an order
    ///
    /// # Arguments
    /// * `txid` - Transaction ID or user reference of the order
    #[instrument(skip(self))]
    pub async fn cancel_order(&self, txid: &str) -> RestResult<CancelOrderResult> {
        debug!("Cancelling order {}", txid);
        self.dispatcher
            .private("CancelOrder", &[("txid", txid.to_string())])
            .await
    }

    /// Cancel all open orders
    #[instrument(skip(self))]
    pub async fn cancel_all_orders(&self) -> RestResult<CancelOrderResult> {
        debug!("Cancelling all open orders");
        self.dispatcher.private("CancelAll", &[]).await
    }
}
