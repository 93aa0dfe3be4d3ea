//! Bollinger Bands indicator.
//!
//! Bollinger Bands consist of:
//! - Middle: Simple Moving Average (SMA) over n periods
//! - Upper: Middle + (k × StdDev)
//! - Lower: Middle - (k × StdDev)
//!
//! Where StdDev is population standard deviation (divides by N, not N-1).
//! Warmup: first (period-1) bars are invalid.

use crate::domain::indicator::sma::calculate_sma;
use crate::domain::indicator::stddev::calculate_stddev;
use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::PriceBar;

pub fn calculate_bollinger(bars: &[PriceBar], period: usize, k: f64) -> IndicatorSeries {
    let sma = calculate_sma(bars, period);
    let stddev = calculate_stddev(bars, period);

    let values = bars
        .iter()
        .zip(sma.values.iter().zip(&stddev.values))
        .map(|(bar, (mid, sd))| {
            let (valid, upper, middle, lower) = match (mid.simple(), sd.simple()) {
                (Some(middle), Some(sd)) => (true, middle + k * sd, middle, middle - k * sd),
                _ => (false, 0.0, 0.0, 0.0),
            };
            IndicatorPoint {
                date: bar.date,
                valid,
                value: IndicatorValue::Bollinger {
                    upper,
                    middle,
                    lower,
                },
            }
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Bollinger {
            period,
            stddev_mult_x100: (k * 100.0).round().max(0.0) as u32,
        },
        values,
    }
}
