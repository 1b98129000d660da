//! Pagination cursors for incremental market data
//!
//! OHLC, Spread and Trades responses carry a `last` marker. Passing it back
//! as `since` returns only newer entries. The client remembers the marker
//! per operation and pair so callers can simply poll.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::HashMap;

/// Remembered `since` values for one operation, keyed by requested pair
///
/// A pair with no entry has not been polled yet; the next request for it
/// starts from the beginning.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CursorTable {
    entries: HashMap<String, String>,
}

impl CursorTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Cursor for a pair, if one has been recorded
    pub fn get(&self, pair: &str) -> Option<&str> {
        self.entries.get(pair).map(String::as_str)
    }

    /// Record the `last` marker from a response
    pub fn advance(&mut self, pair: &str, last: impl Into<String>) {
        self.entries.insert(pair.to_string(), last.into());
    }

    /// Forget the cursor for one pair
    pub fn remove(&mut self, pair: &str) -> Option<String> {
        self.entries.remove(pair)
    }

    /// Forget all cursors
    pub fn reset(&mut self) {
        self.entries.clear();
    }

    /// Number of pairs with a cursor
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no cursor has been recorded
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The three cursor tables owned by a client
#[derive(Debug, Clone, Default)]
pub struct PollCursors {
    /// OHLC cursors
    pub ohlc: CursorTable,
    /// Spread cursors
    pub spread: CursorTable,
    /// Recent trades cursors
    pub trades: CursorTable,
}

impl PollCursors {
    /// Clear every table
    pub fn reset(&mut self) {
        self.ohlc.reset();
        self.spread.reset();
        self.trades.reset();
    }
}

/// Deserialize a `last` marker that may be sent as a number or a string
pub(crate) fn deserialize_last<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Marker {
        #[serde(default, deserialize_with = "deserialize_last")]
        last: Option<String>,
    }

    #[test]
    fn test_advance_and_get() {
        let mut table = CursorTable::new();
        assert_eq!(table.get("XBTUSD"), None);

        table.advance("XBTUSD", "42");
        assert_eq!(table.get("XBTUSD"), Some("42"));
        assert_eq!(table.get("ETHUSD"), None);

        table.advance("XBTUSD", "43");
        assert_eq!(table.get("XBTUSD"), Some("43"));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_reset() {
        let mut cursors = PollCursors::default();
        cursors.ohlc.advance("XBTUSD", "1");
        cursors.trades.advance("XBTUSD", "2");

        cursors.reset();
        assert!(cursors.ohlc.is_empty());
        assert!(cursors.trades.is_empty());
    }

    #[test]
    fn test_last_number_or_string() {
        let m: Marker = serde_json::from_str(r#"{"last": 1688671200}"#).unwrap();
        assert_eq!(m.last.as_deref(), Some("1688671200"));

        let m: Marker = serde_json::from_str(r#"{"last": "1688671969993150842"}"#).unwrap();
        assert_eq!(m.last.as_deref(), Some("1688671969993150842"));

        let m: Marker = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(m.last, None);
    }
}
