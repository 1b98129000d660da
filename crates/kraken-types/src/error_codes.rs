//! Kraken REST error code mapping
//!
//! The REST envelope reports failures as strings such as
//! `"EOrder:Insufficient funds"`. This module classifies them so callers can
//! decide what to do; nothing in the workspace retries on its own.

use std::time::Duration;

/// Suggested caller reaction to an API error
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RecoveryStrategy {
    /// Exponential backoff before retry
    Backoff {
        initial_ms: u64,
        max_ms: u64,
        multiplier: u32,
    },
    /// Fixed delay retry
    Retry { delay_ms: u64, max_attempts: u32 },
    /// Credentials or nonce need attention before the next private call
    CheckCredentials,
    /// Requires user intervention (e.g., add funds)
    UserAction { message: &'static str },
    /// The request itself is wrong; resending it will fail the same way
    FixRequest,
    /// Cannot recover programmatically
    Fatal,
    /// Manual investigation needed
    #[default]
    Manual,
}

impl RecoveryStrategy {
    /// Default exponential backoff for rate limits
    pub fn rate_limit_backoff() -> Self {
        Self::Backoff {
            initial_ms: 1000,
            max_ms: 60000,
            multiplier: 2,
        }
    }

    /// Default retry for transient service errors
    pub fn service_retry() -> Self {
        Self::Retry {
            delay_ms: 5000,
            max_attempts: 3,
        }
    }

    /// Get the initial delay duration
    pub fn initial_delay(&self) -> Option<Duration> {
        match self {
            Self::Backoff { initial_ms, .. } => Some(Duration::from_millis(*initial_ms)),
            Self::Retry { delay_ms, .. } => Some(Duration::from_millis(*delay_ms)),
            _ => None,
        }
    }

    /// Check if resending the same request may succeed
    pub fn allows_retry(&self) -> bool {
        matches!(self, Self::Backoff { .. } | Self::Retry { .. })
    }
}

/// Kraken API error categories, taken from the code prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// EAPI:* errors
    Api,
    /// EGeneral:* errors
    General,
    /// EService:* errors
    Service,
    /// EOrder:* errors
    Order,
    /// EFunding:* errors
    Funding,
    /// EQuery:* errors
    Query,
    /// ETrade:* errors
    Trade,
    /// Anything else
    Unknown,
}

impl ErrorCategory {
    fn from_prefix(prefix: &str) -> Self {
        match prefix {
            "EAPI" => Self::Api,
            "EGeneral" => Self::General,
            "EService" => Self::Service,
            "EOrder" => Self::Order,
            "EFunding" => Self::Funding,
            "EQuery" => Self::Query,
            "ETrade" => Self::Trade,
            _ => Self::Unknown,
        }
    }
}

/// One parsed entry of the envelope's `error` array
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KrakenApiError {
    /// The error string exactly as the exchange sent it
    pub raw: String,
    /// Recognised error code
    pub code: Option<KrakenErrorCode>,
    /// Error category
    pub category: ErrorCategory,
    /// Text after the category prefix
    pub message: String,
}

impl KrakenApiError {
    /// Parse a Kraken error string into a structured error
    pub fn parse(error: &str) -> Self {
        let (category, message) = match error.split_once(':') {
            Some((prefix, rest)) => (ErrorCategory::from_prefix(prefix), rest.trim().to_string()),
            None => (ErrorCategory::Unknown, error.to_string()),
        };

        Self {
            raw: error.to_string(),
            code: KrakenErrorCode::parse_code(error),
            category,
            message,
        }
    }

    /// Parse every entry of an `error` array
    pub fn parse_many(errors: &[String]) -> Vec<Self> {
        errors.iter().map(|e| Self::parse(e)).collect()
    }

    /// Get the recovery strategy for this error
    pub fn recovery_strategy(&self) -> RecoveryStrategy {
        self.code
            .map(|c| c.recovery_strategy())
            .unwrap_or_default()
    }

    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        self.recovery_strategy().allows_retry()
    }

    /// Check if this error points at the key, signature or nonce
    pub fn is_auth_error(&self) -> bool {
        self.code.is_some_and(|c| c.is_auth_error())
    }

    /// Check if this is a rate limit error
    pub fn is_rate_limit(&self) -> bool {
        self.code.is_some_and(|c| c.is_rate_limit())
    }
}

/// Known Kraken REST error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KrakenErrorCode {
    // EAPI
    RateLimitExceeded,
    InvalidKey,
    InvalidSignature,
    InvalidNonce,
    BadRequest,
    FeatureDisabled,

    // EGeneral
    InvalidArguments,
    PermissionDenied,
    UnknownAssetPair,
    UnknownAsset,
    TooManyRequests,
    TemporaryLockout,
    UnknownMethod,
    InternalError,

    // EService
    ServiceUnavailable,
    ServiceBusy,
    MarketCancelOnly,
    MarketPostOnly,
    DeadlineElapsed,

    // EOrder
    CannotOpenPosition,
    MarginAllowanceExceeded,
    InsufficientMargin,
    InsufficientFunds,
    OrderMinimumNotMet,
    CostMinimumNotMet,
    OrdersLimitExceeded,
    OrderRateLimitExceeded,
    PositionsLimitExceeded,
    UnknownOrder,
    UnknownPosition,
    InvalidPrice,

    // EFunding / EQuery / ETrade
    InvalidFundingAmount,
    QueryUnknownAssetPair,
    TradeUnknownPosition,
}

const KNOWN_CODES: &[(&str, KrakenErrorCode)] = &[
    ("EAPI:Rate limit exceeded", KrakenErrorCode::RateLimitExceeded),
    ("EAPI:Invalid key", KrakenErrorCode::InvalidKey),
    ("EAPI:Invalid signature", KrakenErrorCode::InvalidSignature),
    ("EAPI:Invalid nonce", KrakenErrorCode::InvalidNonce),
    ("EAPI:Bad request", KrakenErrorCode::BadRequest),
    ("EAPI:Feature disabled", KrakenErrorCode::FeatureDisabled),
    ("EGeneral:Invalid arguments", KrakenErrorCode::InvalidArguments),
    ("EGeneral:Permission denied", KrakenErrorCode::PermissionDenied),
    ("EGeneral:Unknown asset pair", KrakenErrorCode::UnknownAssetPair),
    ("EGeneral:Unknown asset", KrakenErrorCode::UnknownAsset),
    ("EGeneral:Too many requests", KrakenErrorCode::TooManyRequests),
    ("EGeneral:Temporary lockout", KrakenErrorCode::TemporaryLockout),
    ("EGeneral:Unknown method", KrakenErrorCode::UnknownMethod),
    ("EGeneral:Internal error", KrakenErrorCode::InternalError),
    ("EService:Unavailable", KrakenErrorCode::ServiceUnavailable),
    ("EService:Busy", KrakenErrorCode::ServiceBusy),
    ("EService:Market in cancel_only mode", KrakenErrorCode::MarketCancelOnly),
    ("EService:Market in post_only mode", KrakenErrorCode::MarketPostOnly),
    ("EService:Deadline elapsed", KrakenErrorCode::DeadlineElapsed),
    ("EOrder:Cannot open position", KrakenErrorCode::CannotOpenPosition),
    ("EOrder:Margin allowance exceeded", KrakenErrorCode::MarginAllowanceExceeded),
    ("EOrder:Insufficient margin", KrakenErrorCode::InsufficientMargin),
    ("EOrder:Insufficient funds", KrakenErrorCode::InsufficientFunds),
    ("EOrder:Order minimum not met", KrakenErrorCode::OrderMinimumNotMet),
    ("EOrder:Cost minimum not met", KrakenErrorCode::CostMinimumNotMet),
    ("EOrder:Orders limit exceeded", KrakenErrorCode::OrdersLimitExceeded),
    ("EOrder:Rate limit exceeded", KrakenErrorCode::OrderRateLimitExceeded),
    ("EOrder:Positions limit exceeded", KrakenErrorCode::PositionsLimitExceeded),
    ("EOrder:Unknown order", KrakenErrorCode::UnknownOrder),
    ("EOrder:Unknown position", KrakenErrorCode::UnknownPosition),
    ("EOrder:Invalid price", KrakenErrorCode::InvalidPrice),
    ("EFunding:Invalid amount", KrakenErrorCode::InvalidFundingAmount),
    ("EQuery:Unknown asset pair", KrakenErrorCode::QueryUnknownAssetPair),
    ("ETrade:Unknown position", KrakenErrorCode::TradeUnknownPosition),
];

impl KrakenErrorCode {
    /// Look up the code for an error string
    ///
    /// Exact matches win; otherwise a few well-known phrases are matched
    /// case-insensitively, since the exchange sometimes appends detail.
    pub fn parse_code(error: &str) -> Option<Self> {
        if let Some((_, code)) = KNOWN_CODES.iter().find(|(raw, _)| *raw == error) {
            return Some(*code);
        }

        let normalized = error.to_lowercase();
        let code = if normalized.contains("rate limit") {
            Self::RateLimitExceeded
        } else if normalized.contains("invalid nonce") {
            Self::InvalidNonce
        } else if normalized.contains("invalid signature") {
            Self::InvalidSignature
        } else if normalized.contains("invalid key") {
            Self::InvalidKey
        } else if normalized.contains("insufficient funds") {
            Self::InsufficientFunds
        } else if normalized.contains("unknown asset pair") {
            Self::UnknownAssetPair
        } else if normalized.contains("permission denied") {
            Self::PermissionDenied
        } else if normalized.contains("lockout") {
            Self::TemporaryLockout
        } else {
            return None;
        };
        Some(code)
    }

    /// The canonical error string for this code
    pub fn as_str(&self) -> &'static str {
        KNOWN_CODES
            .iter()
            .find(|(_, code)| code == self)
            .map(|(raw, _)| *raw)
            .unwrap_or("EGeneral:Unknown")
    }

    /// Get the recovery strategy for this error code
    pub fn recovery_strategy(&self) -> RecoveryStrategy {
        match self {
            Self::RateLimitExceeded | Self::TooManyRequests | Self::OrderRateLimitExceeded => {
                RecoveryStrategy::rate_limit_backoff()
            }
            Self::TemporaryLockout => RecoveryStrategy::Backoff {
                initial_ms: 60000,
                max_ms: 600000,
                multiplier: 2,
            },

            Self::InvalidKey | Self::InvalidSignature | Self::InvalidNonce => {
                RecoveryStrategy::CheckCredentials
            }

            Self::ServiceUnavailable | Self::ServiceBusy => RecoveryStrategy::service_retry(),
            Self::DeadlineElapsed => RecoveryStrategy::Retry {
                delay_ms: 1000,
                max_attempts: 5,
            },

            Self::InsufficientFunds => RecoveryStrategy::UserAction {
                message: "Insufficient funds - deposit more or reduce order size",
            },
            Self::InsufficientMargin | Self::MarginAllowanceExceeded => {
                RecoveryStrategy::UserAction {
                    message: "Insufficient margin - add collateral or reduce position",
                }
            }
            Self::OrderMinimumNotMet | Self::CostMinimumNotMet => RecoveryStrategy::UserAction {
                message: "Order size too small - increase quantity",
            },
            Self::OrdersLimitExceeded | Self::PositionsLimitExceeded => {
                RecoveryStrategy::UserAction {
                    message: "Too many open orders/positions - close some first",
                }
            }
            Self::MarketCancelOnly => RecoveryStrategy::UserAction {
                message: "Market in cancel-only mode - can only cancel orders",
            },
            Self::MarketPostOnly => RecoveryStrategy::UserAction {
                message: "Market in post-only mode - use post-only limit orders",
            },
            Self::CannotOpenPosition => RecoveryStrategy::UserAction {
                message: "Cannot open this position - check existing positions",
            },

            Self::InvalidArguments
            | Self::BadRequest
            | Self::InvalidPrice
            | Self::UnknownAssetPair
            | Self::UnknownAsset
            | Self::QueryUnknownAssetPair
            | Self::UnknownOrder
            | Self::UnknownPosition
            | Self::TradeUnknownPosition
            | Self::InvalidFundingAmount
            | Self::UnknownMethod => RecoveryStrategy::FixRequest,

            Self::PermissionDenied | Self::FeatureDisabled => RecoveryStrategy::Fatal,

            Self::InternalError => RecoveryStrategy::Manual,
        }
    }

    /// Check if this is an authentication-related error
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidKey | Self::InvalidSignature | Self::InvalidNonce | Self::PermissionDenied
        )
    }

    /// Check if this is a rate limit error
    pub fn is_rate_limit(&self) -> bool {
        matches!(
            self,
            Self::RateLimitExceeded | Self::TooManyRequests | Self::OrderRateLimitExceeded
        )
    }
}
