//! Authentication credentials for Kraken API
//!
//! Credentials are loaded once, up front, from a key file, the environment or
//! plain strings. Loading validates everything the signer needs, so a bad key
//! is reported at startup instead of on the first private request.
//!
//! # Security
//!
//! Private keys are stored using the `secrecy` crate which:
//! - Zeroizes memory on drop (prevents memory scanning)
//! - Prevents accidental logging via Debug impl
//! - Provides explicit access via `expose_secret()`

use secrecy::{ExposeSecret, SecretBox};
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::error::{AuthError, AuthResult};
use crate::signer::{decode_secret, sign_payload};

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "KRAKEN_API_KEY";
/// Environment variable holding the base64 private key
pub const PRIVATE_KEY_ENV: &str = "KRAKEN_PRIVATE_KEY";

/// API credentials for authenticated requests
///
/// Private keys are automatically zeroized when the Credentials are dropped,
/// preventing sensitive data from remaining in memory.
pub struct Credentials {
    /// API key (public)
    api_key: String,
    /// Private key (decoded from base64, zeroized on drop)
    private_key: SecretBox<Vec<u8>>,
}

impl Credentials {
    /// Create new credentials from API key and private key
    ///
    /// # Arguments
    /// * `api_key` - Your Kraken API key
    /// * `private_key` - Your private key (base64 encoded string)
    ///
    /// # Errors
    /// [`AuthError::InvalidCredentials`] if either value is empty,
    /// [`AuthError::InvalidSecret`] if the private key is not base64.
    pub fn new(api_key: impl Into<String>, private_key: impl AsRef<str>) -> AuthResult<Self> {
        let api_key = api_key.into().trim().to_string();
        let private_key = private_key.as_ref().trim();

        if api_key.is_empty() {
            return Err(AuthError::InvalidCredentials("API key is empty".to_string()));
        }
        if private_key.is_empty() {
            return Err(AuthError::InvalidCredentials("private key is empty".to_string()));
        }

        let decoded = decode_secret(private_key)?;
        if decoded.is_empty() {
            return Err(AuthError::InvalidCredentials(
                "private key decodes to zero bytes".to_string(),
            ));
        }

        Ok(Self {
            api_key,
            private_key: SecretBox::new(Box::new(decoded)),
        })
    }

    /// Load credentials from a two-line key file
    ///
    /// Line 1 holds the API key, line 2 the base64 private key.
    ///
    /// # Errors
    /// [`AuthError::MissingCredentials`] if the file cannot be read, plus the
    /// errors of [`Credentials::parse_key_material`].
    pub fn from_key_file(path: impl AsRef<Path>) -> AuthResult<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            AuthError::MissingCredentials(format!("unable to read {}: {}", path.display(), e))
        })?;

        debug!(path = %path.display(), "Loaded key file");
        Self::parse_key_material(&contents)
    }

    /// Parse the two-line key file format from a string
    pub fn parse_key_material(contents: &str) -> AuthResult<Self> {
        let mut lines = contents.lines().map(str::trim);
        let api_key = lines.next().unwrap_or_default();
        let private_key = lines.next().unwrap_or_default();

        if api_key.is_empty() || private_key.is_empty() {
            return Err(AuthError::InvalidCredentials(
                "key material needs an API key line and a private key line".to_string(),
            ));
        }

        Self::new(api_key, private_key)
    }

    /// Create credentials from environment variables
    ///
    /// Reads `KRAKEN_API_KEY` and `KRAKEN_PRIVATE_KEY` from the environment.
    pub fn from_env() -> AuthResult<Self> {
        let api_key = std::env::var(API_KEY_ENV)
            .map_err(|_| AuthError::EnvVarNotSet(API_KEY_ENV.to_string()))?;
        let private_key = std::env::var(PRIVATE_KEY_ENV)
            .map_err(|_| AuthError::EnvVarNotSet(PRIVATE_KEY_ENV.to_string()))?;

        Self::new(api_key, private_key)
    }

    /// Get the API key
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Sign a serialized request body
    ///
    /// # Arguments
    /// * `path` - API endpoint path (e.g., "/0/private/AddOrder")
    /// * `nonce` - Nonce contained in `post_data`
    /// * `post_data` - URL-encoded POST body, exactly as it will be sent
    ///
    /// # Returns
    /// Base64-encoded signature for the `API-Sign` header
    pub fn sign(&self, path: &str, nonce: &str, post_data: &str) -> AuthResult<String> {
        sign_payload(self.private_key.expose_secret(), path, nonce, post_data)
    }
}

impl Clone for Credentials {
    fn clone(&self) -> Self {
        Self {
            api_key: self.api_key.clone(),
            private_key: SecretBox::new(Box::new(self.private_key.expose_secret().clone())),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let visible: String = self.api_key.chars().take(8).collect();
        f.debug_struct("Credentials")
            .field("api_key", &format!("{}...", visible))
            .field("private_key", &"[REDACTED]")
            .finish()
    }
}
