//! Shared types for the Kraken REST client
//!
//! This crate holds the wire-level vocabulary used across the workspace.
//! It has minimal dependencies and can be used independently.
//!
//! # Key Types
//!
//! - [`OrderSide`], [`OrderType`], [`OrderFlag`] - Validated order enums
//! - [`ParseEnumError`] - Rejected enum value
//! - [`KrakenApiError`], [`KrakenErrorCode`] - Kraken API error mapping

pub mod enums;
pub mod error;
pub mod error_codes;

pub use enums::*;
pub use error::*;
pub use error_codes::*;
