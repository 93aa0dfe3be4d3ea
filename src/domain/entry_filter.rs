//! RSI entry filter.

use crate::domain::strategy::StrategyConfig;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Long,
    Short,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Long => write!(f, "long"),
            Direction::Short => write!(f, "short"),
        }
    }
}

/// Approves a new directional entry against the oscillator reading.
///
/// Always passes when the RSI filter is disabled. With the filter enabled a
/// missing reading fails closed. Thresholds are inclusive.
pub fn approve_entry(
    direction: Direction,
    oscillator: Option<f64>,
    config: &StrategyConfig,
) -> bool {
    if !config.allow_rsi {
        return true;
    }
    let Some(rsi) = oscillator.filter(|v| v.is_finite()) else {
        return false;
    };
    match direction {
        Direction::Long => rsi <= config.rsi_buy,
        Direction::Short => rsi >= config.rsi_sell,
    }
}
