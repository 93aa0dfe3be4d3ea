#![allow(dead_code)]

use bandtrader::domain::error::BandtraderError;
pub use bandtrader::domain::ohlcv::PriceBar;
use bandtrader::domain::strategy::StrategyConfig;
use bandtrader::ports::market_data_port::MarketDataPort;
use chrono::NaiveDate;
use std::collections::HashMap;

pub struct MockMarketData {
    pub data: HashMap<String, Vec<PriceBar>>,
    pub errors: HashMap<String, String>,
}

impl MockMarketData {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, code: &str, bars: Vec<PriceBar>) -> Self {
        self.data.insert(code.to_string(), bars);
        self
    }

    pub fn with_error(mut self, code: &str, reason: &str) -> Self {
        self.errors.insert(code.to_string(), reason.to_string());
        self
    }
}

impl MarketDataPort for MockMarketData {
    fn fetch_bars(&self, code: &str) -> Result<Vec<PriceBar>, BandtraderError> {
        if let Some(reason) = self.errors.get(code) {
            return Err(BandtraderError::Data {
                reason: reason.clone(),
            });
        }
        Ok(self.data.get(code).cloned().unwrap_or_default())
    }

    fn list_instruments(&self) -> Result<Vec<String>, BandtraderError> {
        let mut codes: Vec<String> = self.data.keys().cloned().collect();
        codes.sort();
        Ok(codes)
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Flat bar: open, high, low and close all equal `close`.
pub fn make_bar(code: &str, date_str: &str, close: f64) -> PriceBar {
    make_ohlc_bar(code, date_str, close, close, close, close)
}

pub fn make_ohlc_bar(
    code: &str,
    date_str: &str,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
) -> PriceBar {
    PriceBar {
        code: code.to_string(),
        date: NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap(),
        open,
        high,
        low,
        close,
        volume: 1000,
    }
}

/// Flat bars on consecutive days starting 2024-01-01.
pub fn generate_bars(code: &str, closes: &[f64]) -> Vec<PriceBar> {
    let start = date(2024, 1, 1);
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| PriceBar {
            code: code.to_string(),
            date: start + chrono::Duration::days(i as i64),
            open: close,
            high: close,
            low: close,
            close,
            volume: 1000,
        })
        .collect()
}

/// Five-bar bands with k = 1.5 and the RSI filter off, so a single
/// outlier close of `100 ± d` after four closes of 100 breaks out.
pub fn band_config() -> StrategyConfig {
    StrategyConfig {
        stake: 10,
        period: 5,
        k: 1.5,
        allow_rsi: false,
        ..StrategyConfig::default()
    }
}
