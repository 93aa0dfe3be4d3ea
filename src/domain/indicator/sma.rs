//! Simple Moving Average over closing prices.
//!
//! SMA(n)[i] = sum(C[i-j] for j in 0..n-1) / n
//! Warmup: first (n-1) bars are invalid.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::PriceBar;

pub fn calculate_sma(bars: &[PriceBar], period: usize) -> IndicatorSeries {
    let mut values = Vec::with_capacity(bars.len());
    let warmup = period.saturating_sub(1);

    for (i, bar) in bars.iter().enumerate() {
        let valid = period > 0 && i >= warmup;

        let value = if valid {
            let window = &bars[i + 1 - period..=i];
            window.iter().map(|b| b.close).sum::<f64>() / period as f64
        } else {
            0.0
        };

        values.push(IndicatorPoint {
            date: bar.date,
            valid,
            value: IndicatorValue::Simple(value),
        });
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Sma(period),
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn make_bars(prices: &[f64]) -> Vec<PriceBar> {
        prices
            .iter()
            .enumerate()
            .map(|(i, &close)| PriceBar {
                code: "TEST".into(),
                date: NaiveDate::from_ymd_opt(2024, 1, (i + 1) as u32).unwrap(),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1000,
            })
            .collect()
    }

    #[test]
    fn sma_warmup() {
        let series = calculate_sma(&make_bars(&[1.0, 2.0, 3.0, 4.0]), 3);
        assert!(!series.values[0].valid);
        assert!(!series.values[1].valid);
        assert!(series.values[2].valid);
        assert!(series.values[3].valid);
    }

    #[test]
    fn sma_rolling_values() {
        let series = calculate_sma(&make_bars(&[1.0, 2.0, 3.0, 4.0]), 3);
        assert_eq!(series.values[2].simple(), Some(2.0));
        assert_eq!(series.values[3].simple(), Some(3.0));
    }

    #[test]
    fn sma_zero_period_never_valid() {
        let series = calculate_sma(&make_bars(&[1.0, 2.0]), 0);
        assert!(series.values.iter().all(|p| !p.valid));
    }
}
