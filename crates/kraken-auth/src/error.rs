//! Error types for authentication operations

/// Errors that can occur while loading credentials or signing requests
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Private key is not valid base64
    #[error("Invalid secret: {0}")]
    InvalidSecret(String),

    /// Key material source is absent or unreadable
    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    /// Key material was read but the API key or secret is empty
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    /// Environment variable not set
    #[error("Environment variable not set: {0}")]
    EnvVarNotSet(String),

    /// Parameters to sign carry no `nonce` entry
    #[error("Request parameters have no nonce")]
    MissingNonce,

    /// Parameters could not be form-encoded
    #[error("Encoding error: {0}")]
    Encoding(String),
}

/// Result type for authentication operations
pub type AuthResult<T> = Result<T, AuthError>;
