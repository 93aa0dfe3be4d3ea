//! Stop-loss / take-profit exit evaluation.
//!
//! Thresholds are fractions of the ledger's average entry price. A triggered
//! exit always flattens the whole position.

use crate::domain::strategy::StrategyConfig;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    StopLoss,
    TakeProfit,
}

impl fmt::Display for ExitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitReason::StopLoss => write!(f, "stop-loss"),
            ExitReason::TakeProfit => write!(f, "take-profit"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExitSignal {
    pub reason: ExitReason,
    /// Quantity that flattens the position (`-position_size`).
    pub delta: i64,
}

pub fn stop_loss_hit(close: f64, position_size: i64, avg_price: f64, stop_loss: f64) -> bool {
    if position_size > 0 {
        close <= avg_price * (1.0 - stop_loss)
    } else {
        close >= avg_price * (1.0 + stop_loss)
    }
}

pub fn take_profit_hit(close: f64, position_size: i64, avg_price: f64, take_profit: f64) -> bool {
    if position_size > 0 {
        close >= avg_price * (1.0 + take_profit)
    } else {
        close <= avg_price * (1.0 - take_profit)
    }
}

/// `None` when exits are disabled, the position is flat, or the average
/// price is missing or non-positive. Stop-loss wins when both fire.
pub fn evaluate_exit(
    close: f64,
    position_size: i64,
    avg_price: Option<f64>,
    config: &StrategyConfig,
) -> Option<ExitSignal> {
    if !config.exit_rule || position_size == 0 {
        return None;
    }
    let avg_price = avg_price.filter(|p| p.is_finite() && *p > 0.0)?;

    let reason = if stop_loss_hit(close, position_size, avg_price, config.stop_loss) {
        ExitReason::StopLoss
    } else if take_profit_hit(close, position_size, avg_price, config.take_profit) {
        ExitReason::TakeProfit
    } else {
        return None;
    };

    Some(ExitSignal {
        reason,
        delta: -position_size,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> StrategyConfig {
        StrategyConfig {
            stop_loss: 0.10,
            take_profit: 0.20,
            ..StrategyConfig::default()
        }
    }

    #[test]
    fn disabled_or_flat_never_exits() {
        let off = StrategyConfig {
            exit_rule: false,
            ..config()
        };
        assert_eq!(evaluate_exit(50.0, 10, Some(100.0), &off), None);
        assert_eq!(evaluate_exit(50.0, 0, Some(100.0), &config()), None);
    }

    #[test]
    fn missing_or_bad_avg_price_never_exits() {
        assert_eq!(evaluate_exit(50.0, 10, None, &config()), None);
        assert_eq!(evaluate_exit(50.0, 10, Some(0.0), &config()), None);
        assert_eq!(evaluate_exit(50.0, 10, Some(-3.0), &config()), None);
    }

    #[test]
    fn long_stop_loss() {
        let signal = evaluate_exit(89.99, 7, Some(100.0), &config()).unwrap();
        assert_eq!(signal.reason, ExitReason::StopLoss);
        assert_eq!(signal.delta, -7);
        assert_eq!(evaluate_exit(90.01, 7, Some(100.0), &config()), None);
    }

    #[test]
    fn long_take_profit() {
        let signal = evaluate_exit(120.5, 7, Some(100.0), &config()).unwrap();
        assert_eq!(signal.reason, ExitReason::TakeProfit);
        assert_eq!(signal.delta, -7);
        assert_eq!(evaluate_exit(119.0, 7, Some(100.0), &config()), None);
    }

    #[test]
    fn short_stop_loss() {
        let signal = evaluate_exit(110.5, -4, Some(100.0), &config()).unwrap();
        assert_eq!(signal.reason, ExitReason::StopLoss);
        assert_eq!(signal.delta, 4);
        assert_eq!(evaluate_exit(109.0, -4, Some(100.0), &config()), None);
    }

    #[test]
    fn short_take_profit() {
        let signal = evaluate_exit(79.0, -4, Some(100.0), &config()).unwrap();
        assert_eq!(signal.reason, ExitReason::TakeProfit);
        assert_eq!(signal.delta, 4);
    }

    #[test]
    fn both_thresholds_produce_one_flatten() {
        // Zero-width thresholds make both conditions true at the entry price.
        let tight = StrategyConfig {
            stop_loss: 0.0,
            take_profit: 0.0,
            ..config()
        };
        let signal = evaluate_exit(100.0, 3, Some(100.0), &tight).unwrap();
        assert_eq!(signal.reason, ExitReason::StopLoss);
        assert_eq!(signal.delta, -3);
    }
}
