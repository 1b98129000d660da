//! API endpoint groups
//!
//! Each group borrows the client's dispatcher and maps typed arguments to
//! request parameters.

pub mod market;
pub mod account;
pub mod trading;

pub use market::MarketEndpoints;
pub use account::AccountEndpoints;
pub use trading::TradingEndpoints;
