//! Order side, order type and order flag enums
//!
//! Every enum parses from its wire string with [`FromStr`], so orders built
//! from untyped input are validated before anything is sent.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ParseEnumError;

/// Order side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    /// Buy order
    Buy,
    /// Sell order
    Sell,
}

impl OrderSide {
    /// Returns the side as used in request parameters
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Sell => "sell",
        }
    }

    /// Returns the opposite side
    pub fn opposite(&self) -> Self {
        match self {
            Self::Buy => Self::Sell,
            Self::Sell => Self::Buy,
        }
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderSide {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "buy" => Ok(Self::Buy),
            "sell" => Ok(Self::Sell),
            other => Err(ParseEnumError::new("type", other)),
        }
    }
}

/// Order types accepted by `AddOrder`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderType {
    /// Market order
    Market,
    /// Limit order
    Limit,
    /// Stop loss
    StopLoss,
    /// Take profit
    TakeProfit,
    /// Stop loss with a take profit leg
    StopLossProfit,
    /// Stop loss limit
    StopLossLimit,
    /// Take profit limit
    TakeProfitLimit,
    /// Trailing stop
    TrailingStop,
    /// Trailing stop limit
    TrailingStopLimit,
    /// Stop loss and limit
    StopLossAndLimit,
    /// Settle position
    SettlePosition,
}

impl OrderType {
    /// All supported order types
    pub const ALL: [OrderType; 11] = [
        Self::Market,
        Self::Limit,
        Self::StopLoss,
        Self::TakeProfit,
        Self::StopLossProfit,
        Self::StopLossLimit,
        Self::TakeProfitLimit,
        Self::TrailingStop,
        Self::TrailingStopLimit,
        Self::StopLossAndLimit,
        Self::SettlePosition,
    ];

    /// Returns the order type as used in request parameters
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Market => "market",
            Self::Limit => "limit",
            Self::StopLoss => "stop-loss",
            Self::TakeProfit => "take-profit",
            Self::StopLossProfit => "stop-loss-profit",
            Self::StopLossLimit => "stop-loss-limit",
            Self::TakeProfitLimit => "take-profit-limit",
            Self::TrailingStop => "trailing-stop",
            Self::TrailingStopLimit => "trailing-stop-limit",
            Self::StopLossAndLimit => "stop-loss-and-limit",
            Self::SettlePosition => "settle-position",
        }
    }

    /// Returns true if the order type carries a secondary price
    pub fn uses_price2(&self) -> bool {
        matches!(
            self,
            Self::StopLossProfit
                | Self::StopLossLimit
                | Self::TakeProfitLimit
                | Self::TrailingStopLimit
                | Self::StopLossAndLimit
        )
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ParseEnumError::new("ordertype", s))
    }
}

/// Order flags (`oflags`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderFlag {
    /// Volume in quote currency
    VolumeInQuote,
    /// Fee in base currency
    FeeInBase,
    /// Fee in quote currency
    FeeInQuote,
    /// No market price protection
    NoMarketPriceProtection,
    /// Post-only order
    PostOnly,
}

impl OrderFlag {
    /// Get the API string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VolumeInQuote => "viqc",
            Self::FeeInBase => "fcib",
            Self::FeeInQuote => "fciq",
            Self::NoMarketPriceProtection => "nompp",
            Self::PostOnly => "post",
        }
    }

    /// Parse a comma-separated flag list such as `"post,fciq"`
    ///
    /// Repeated flags are kept once, in first-seen order.
    pub fn parse_list(s: &str) -> Result<Vec<Self>, ParseEnumError> {
        let mut flags = Vec::new();
        for flag in s.split(',') {
            let flag: Self = flag.trim().parse()?;
            if !flags.contains(&flag) {
                flags.push(flag);
            }
        }
        Ok(flags)
    }

    /// Join flags into the comma-separated form sent on the wire
    pub fn join(flags: &[Self]) -> String {
        flags.iter().map(|f| f.as_str()).collect::<Vec<_>>().join(",")
    }
}

impl fmt::Display for OrderFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderFlag {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "viqc" => Ok(Self::VolumeInQuote),
            "fcib" => Ok(Self::FeeInBase),
            "fciq" => Ok(Self::FeeInQuote),
            "nompp" => Ok(Self::NoMarketPriceProtection),
            "post" => Ok(Self::PostOnly),
            other => Err(ParseEnumError::new("oflags", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_parsing() {
        assert_eq!("buy".parse::<OrderSide>().unwrap(), OrderSide::Buy);
        assert_eq!("sell".parse::<OrderSide>().unwrap(), OrderSide::Sell);

        let err = "hold".parse::<OrderSide>().unwrap_err();
        assert_eq!(err.field, "type");
        assert_eq!(err.value, "hold");
    }

    #[test]
    fn test_side_opposite() {
        assert_eq!(OrderSide::Buy.opposite(), OrderSide::Sell);
    }

    #[test]
    fn test_order_type_strings_round_trip() {
        for order_type in OrderType::ALL {
            assert_eq!(order_type.as_str().parse::<OrderType>().unwrap(), order_type);
        }
        assert_eq!(OrderType::ALL.len(), 11);
    }

    #[test]
    fn test_order_type_rejects_unknown() {
        let err = "iceberg".parse::<OrderType>().unwrap_err();
        assert_eq!(err.field, "ordertype");
        assert!("Limit".parse::<OrderType>().is_err());
    }

    #[test]
    fn test_order_type_serde_matches_wire() {
        let json = serde_json::to_string(&OrderType::StopLossAndLimit).unwrap();
        assert_eq!(json, "\"stop-loss-and-limit\"");
    }

    #[test]
    fn test_flag_list() {
        let flags = OrderFlag::parse_list("post,fciq").unwrap();
        assert_eq!(flags, vec![OrderFlag::PostOnly, OrderFlag::FeeInQuote]);
        assert_eq!(OrderFlag::join(&flags), "post,fciq");

        let err = OrderFlag::parse_list("post,ioc").unwrap_err();
        assert_eq!(err.field, "oflags");
        assert_eq!(err.value, "ioc");
    }

    #[test]
    fn test_flag_list_drops_repeats() {
        let flags = OrderFlag::parse_list("post,fciq,post").unwrap();
        assert_eq!(flags, vec![OrderFlag::PostOnly, OrderFlag::FeeInQuote]);
        assert_eq!(OrderFlag::join(&OrderFlag::parse_list("post,post").unwrap()), "post");
    }
}
