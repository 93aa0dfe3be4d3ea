//! Per-bar indicator view used by the decision loop.
//!
//! Each field is `None` until its window has filled; invalid or non-finite
//! values never leave this module as numbers.

use crate::domain::indicator::bollinger::calculate_bollinger;
use crate::domain::indicator::rsi::calculate_rsi;
use crate::domain::indicator::{IndicatorPoint, IndicatorValue};
use crate::domain::ohlcv::PriceBar;
use crate::domain::strategy::StrategyConfig;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct IndicatorSnapshot {
    pub mid: Option<f64>,
    pub upper: Option<f64>,
    pub lower: Option<f64>,
    pub bandwidth: Option<f64>,
    pub oscillator: Option<f64>,
}

/// Band values of a snapshot that is past warm-up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bands {
    pub upper: f64,
    pub lower: f64,
    pub bandwidth: f64,
}

impl IndicatorSnapshot {
    /// `None` while either band is undefined.
    pub fn bands(&self) -> Option<Bands> {
        match (self.upper, self.lower) {
            (Some(upper), Some(lower)) => Some(Bands {
                upper,
                lower,
                bandwidth: self.bandwidth.unwrap_or(upper - lower),
            }),
            _ => None,
        }
    }
}

fn finite(v: f64) -> Option<f64> {
    v.is_finite().then_some(v)
}

fn band_fields(point: &IndicatorPoint) -> (Option<f64>, Option<f64>, Option<f64>) {
    match point.value {
        IndicatorValue::Bollinger {
            upper,
            middle,
            lower,
        } if point.valid => match (finite(upper), finite(middle), finite(lower)) {
            (Some(u), Some(m), Some(l)) => (Some(u), Some(m), Some(l)),
            _ => (None, None, None),
        },
        _ => (None, None, None),
    }
}

/// One snapshot per bar, aligned with `bars`.
pub fn compute_snapshots(bars: &[PriceBar], config: &StrategyConfig) -> Vec<IndicatorSnapshot> {
    let bollinger = calculate_bollinger(bars, config.period, config.k);
    let rsi = config
        .allow_rsi
        .then(|| calculate_rsi(bars, config.rsi_period));

    bollinger
        .values
        .iter()
        .enumerate()
        .map(|(i, point)| {
            let (upper, mid, lower) = band_fields(point);
            IndicatorSnapshot {
                mid,
                upper,
                lower,
                bandwidth: upper.zip(lower).map(|(u, l)| u - l),
                oscillator: rsi.as_ref().and_then(|s| s.values[i].simple()),
            }
        })
        .collect()
}
