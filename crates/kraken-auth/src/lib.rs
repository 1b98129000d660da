//! Authentication for Kraken's private REST endpoints
//!
//! This crate provides the three pieces a signed request needs:
//!
//! - [`Credentials`] - API key and zeroize-on-drop private key, loaded from a
//!   key file, the environment or strings
//! - [`NonceSource`] - strictly increasing millisecond nonces
//! - [`signer`] - the HMAC-SHA512 `API-Sign` computation
//!
//! # Example
//!
//! ```no_run
//! use kraken_auth::{Credentials, NonceSource};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let creds = Credentials::from_key_file("kraken.key")?;
//!     let nonces = NonceSource::new();
//!
//!     let nonce = nonces.next().to_string();
//!     let body = format!("nonce={}", nonce);
//!     let signature = creds.sign("/0/private/Balance", &nonce, &body)?;
//!     println!("API-Sign: {}", signature);
//!
//!     Ok(())
//! }
//! ```

mod credentials;
mod error;
mod nonce;
pub mod signer;

pub use credentials::{Credentials, API_KEY_ENV, PRIVATE_KEY_ENV};
pub use error::{AuthError, AuthResult};
pub use nonce::NonceSource;
