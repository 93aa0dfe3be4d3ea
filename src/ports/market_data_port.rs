//! Market data feed port trait.

use crate::domain::error::BandtraderError;
use crate::domain::ohlcv::PriceBar;

pub trait MarketDataPort {
    /// All bars for `code`, ascending by date.
    fn fetch_bars(&self, code: &str) -> Result<Vec<PriceBar>, BandtraderError>;

    fn list_instruments(&self) -> Result<Vec<String>, BandtraderError>;
}
