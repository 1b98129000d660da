//! Error types for REST API operations

use kraken_auth::AuthError;
use kraken_types::error_codes::{KrakenApiError, RecoveryStrategy};
use kraken_types::ParseEnumError;

use crate::transport::TransportError;

/// Errors that can occur during REST API operations
#[derive(Debug, thiserror::Error)]
pub enum RestError {
    /// Credential loading or signing failed
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Missing API credentials for private endpoint
    #[error("Authentication required for this endpoint")]
    AuthRequired,

    /// HTTP request failed
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Response body was empty
    #[error("Empty response")]
    EmptyResponse,

    /// Response body is not a well-formed envelope, or the result has an
    /// unexpected shape
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// API returned a non-empty `error` array
    #[error("API error: {}", errors.join(", "))]
    Api {
        /// Error codes exactly as returned by Kraken
        errors: Vec<String>,
        /// The first error, parsed
        error: KrakenApiError,
    },

    /// Argument rejected before sending
    #[error("Invalid {field}: {reason}")]
    Validation {
        /// Request parameter at fault
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },
}

impl RestError {
    /// Create an API error from error strings returned by Kraken
    pub fn from_api_errors(errors: Vec<String>) -> Self {
        let error = KrakenApiError::parse(errors.first().map(String::as_str).unwrap_or("Unknown error"));
        Self::Api { errors, error }
    }

    /// Create a validation error
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }

    /// The remote error codes, if this is an API error
    pub fn api_errors(&self) -> Option<&[String]> {
        match self {
            Self::Api { errors, .. } => Some(errors),
            _ => None,
        }
    }

    /// Get the recovery strategy for this error
    pub fn recovery_strategy(&self) -> RecoveryStrategy {
        match self {
            Self::Api { error, .. } => error.recovery_strategy(),
            Self::Transport(_) | Self::EmptyResponse => RecoveryStrategy::Retry {
                max_attempts: 3,
                delay_ms: 1000,
            },
            Self::Auth(_) | Self::AuthRequired => RecoveryStrategy::CheckCredentials,
            Self::Validation { .. } => RecoveryStrategy::FixRequest,
            Self::MalformedResponse(_) => RecoveryStrategy::Manual,
        }
    }

    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        self.recovery_strategy().allows_retry()
    }

    /// Check if this error indicates rate limiting
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::Api { error, .. } if error.is_rate_limit())
    }
}

impl From<ParseEnumError> for RestError {
    fn from(err: ParseEnumError) -> Self {
        Self::Validation {
            field: err.field,
            reason: format!("unsupported value {:?}", err.value),
        }
    }
}

/// Result type for REST operations
pub type RestResult<T> = Result<T, RestError>;
