//! Price bar representation.

use chrono::NaiveDate;

/// One OHLCV observation for one instrument. Produced by the feed, never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceBar {
    pub code: String,
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

impl PriceBar {
    /// True when the bar's range reaches down to `price`.
    pub fn trades_at_or_below(&self, price: f64) -> bool {
        self.low <= price
    }

    /// True when the bar's range reaches up to `price`.
    pub fn trades_at_or_above(&self, price: f64) -> bool {
        self.high >= price
    }
}
