//! Standard Deviation indicator.
//!
//! Population standard deviation over n closing prices.
//! STDDEV(n)[i] = sqrt(sum((C[i-j] - SMA(n)[i])^2 for j in 0..n-1) / n)
//! Warmup: first (n-1) bars are invalid.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::PriceBar;

/// Mean and population standard deviation of a window of closes.
fn mean_and_stddev(window: &[PriceBar]) -> (f64, f64) {
    let n = window.len() as f64;
    let mean = window.iter().map(|b| b.close).sum::<f64>() / n;
    let variance = window
        .iter()
        .map(|b| {
            let diff = b.close - mean;
            diff * diff
        })
        .sum::<f64>()
        / n;
    (mean, variance.sqrt())
}

pub fn calculate_stddev(bars: &[PriceBar], period: usize) -> IndicatorSeries {
    let mut values = Vec::with_capacity(bars.len());
    let warmup = period.saturating_sub(1);

    for (i, bar) in bars.iter().enumerate() {
        let valid = period > 0 && i >= warmup;

        let value = if valid {
            let (_, stddev) = mean_and_stddev(&bars[i + 1 - period..=i]);
            stddev
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
        indicator_type: IndicatorType::Stddev(period),
        values,
    }
}
