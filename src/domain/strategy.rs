//! Strategy parameters.
//!
//! Built once at startup and shared by reference with every component;
//! nothing mutates it during a run.

#[derive(Debug, Clone, PartialEq)]
pub struct StrategyConfig {
    /// Units traded per entry signal.
    pub stake: i64,
    /// Which configured instrument the strategy trades.
    pub instrument_index: usize,
    /// Band lookback (`n`).
    pub period: usize,
    /// Band width multiplier (`k`).
    pub k: f64,
    pub allow_short: bool,
    pub allow_rsi: bool,
    pub rsi_period: usize,
    pub rsi_buy: f64,
    pub rsi_sell: f64,
    /// Enables stop-loss / take-profit exits.
    pub exit_rule: bool,
    /// Stop-loss distance as a fraction of the average entry price.
    pub stop_loss: f64,
    /// Take-profit distance as a fraction of the average entry price.
    pub take_profit: f64,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        StrategyConfig {
            stake: 10,
            instrument_index: 0,
            period: 20,
            k: 2.0,
            allow_short: true,
            allow_rsi: true,
            rsi_period: 14,
            rsi_buy: 35.0,
            rsi_sell: 65.0,
            exit_rule: true,
            stop_loss: 0.10,
            take_profit: 0.20,
        }
    }
}

impl StrategyConfig {
    /// Bars of history needed before every enabled indicator is defined.
    pub fn warmup_bars(&self) -> usize {
        if self.allow_rsi {
            self.period.max(self.rsi_period + 1)
        } else {
            self.period
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = StrategyConfig::default();
        assert_eq!(c.stake, 10);
        assert_eq!(c.period, 20);
        assert!((c.k - 2.0).abs() < f64::EPSILON);
        assert!(c.allow_short);
        assert!(c.allow_rsi);
        assert_eq!(c.rsi_period, 14);
        assert!((c.rsi_buy - 35.0).abs() < f64::EPSILON);
        assert!((c.rsi_sell - 65.0).abs() < f64::EPSILON);
        assert!(c.exit_rule);
        assert!((c.stop_loss - 0.10).abs() < f64::EPSILON);
        assert!((c.take_profit - 0.20).abs() < f64::EPSILON);
    }

    #[test]
    fn warmup_follows_longest_window() {
        let c = StrategyConfig::default();
        assert_eq!(c.warmup_bars(), 20);

        let long_rsi = StrategyConfig {
            rsi_period: 30,
            ..StrategyConfig::default()
        };
        assert_eq!(long_rsi.warmup_bars(), 31);

        let no_rsi = StrategyConfig {
            allow_rsi: false,
            rsi_period: 30,
            ..StrategyConfig::default()
        };
        assert_eq!(no_rsi.warmup_bars(), 20);
    }
}
