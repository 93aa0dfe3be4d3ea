//! Configuration validation.
//!
//! Validates every field before a run starts; the decision loop itself never
//! sees an invalid parameter.

use crate::domain::error::BandtraderError;
use crate::ports::config_port::ConfigPort;

pub fn validate_strategy_config(config: &dyn ConfigPort) -> Result<(), BandtraderError> {
    validate_stake(config)?;
    validate_bands(config)?;
    validate_rsi(config)?;
    validate_exit_thresholds(config)?;
    Ok(())
}

pub fn validate_replay_config(config: &dyn ConfigPort) -> Result<(), BandtraderError> {
    validate_instruments(config)?;
    validate_ledger_config(config)
}

/// The `[ledger]` checks alone, for runs that name their instrument directly.
pub fn validate_ledger_config(config: &dyn ConfigPort) -> Result<(), BandtraderError> {
    validate_initial_cash(config)
}

fn validate_stake(config: &dyn ConfigPort) -> Result<(), BandtraderError> {
    if config.get_int("strategy", "stake", 10) < 1 {
        return Err(BandtraderError::invalid(
            "strategy",
            "stake",
            "stake must be at least 1",
        ));
    }
    Ok(())
}

fn validate_bands(config: &dyn ConfigPort) -> Result<(), BandtraderError> {
    if config.get_int("strategy", "n", 20) < 1 {
        return Err(BandtraderError::invalid(
            "strategy",
            "n",
            "band period must be at least 1",
        ));
    }
    let k = config.get_double("strategy", "k", 2.0);
    if !k.is_finite() || k < 0.0 {
        return Err(BandtraderError::invalid(
            "strategy",
            "k",
            "band multiplier must be non-negative",
        ));
    }
    Ok(())
}

fn validate_rsi(config: &dyn ConfigPort) -> Result<(), BandtraderError> {
    if !config.get_bool("strategy", "allow_rsi", true) {
        return Ok(());
    }
    if config.get_int("strategy", "rsi_period", 14) < 1 {
        return Err(BandtraderError::invalid(
            "strategy",
            "rsi_period",
            "rsi_period must be at least 1",
        ));
    }
    for (key, default) in [("rsi_buy", 35.0), ("rsi_sell", 65.0)] {
        let value = config.get_double("strategy", key, default);
        if !(0.0..=100.0).contains(&value) {
            return Err(BandtraderError::invalid(
                "strategy",
                key,
                format!("{} must be between 0 and 100", key),
            ));
        }
    }
    Ok(())
}

fn validate_exit_thresholds(config: &dyn ConfigPort) -> Result<(), BandtraderError> {
    if !config.get_bool("strategy", "exit_rule", true) {
        return Ok(());
    }
    let stop_loss = config.get_double("strategy", "stop_loss", 0.10);
    if !(0.0..1.0).contains(&stop_loss) {
        return Err(BandtraderError::invalid(
            "strategy",
            "stop_loss",
            "stop_loss must be a fraction in [0, 1)",
        ));
    }
    let take_profit = config.get_double("strategy", "take_profit", 0.20);
    if !take_profit.is_finite() || take_profit < 0.0 {
        return Err(BandtraderError::invalid(
            "strategy",
            "take_profit",
            "take_profit must be non-negative",
        ));
    }
    Ok(())
}

fn validate_instruments(config: &dyn ConfigPort) -> Result<(), BandtraderError> {
    let instruments = config.get_list("data", "instruments");
    if instruments.is_empty() {
        return Err(BandtraderError::missing("data", "instruments"));
    }
    let index = config.get_int("strategy", "instrument_index", 0);
    if index < 0 || index as usize >= instruments.len() {
        return Err(BandtraderError::invalid(
            "strategy",
            "instrument_index",
            format!(
                "instrument_index {} out of range for {} instruments",
                index,
                instruments.len()
            ),
        ));
    }
    Ok(())
}

fn validate_initial_cash(config: &dyn ConfigPort) -> Result<(), BandtraderError> {
    let cash = config.get_double("ledger", "initial_cash", 100_000.0);
    if !cash.is_finite() || cash <= 0.0 {
        return Err(BandtraderError::invalid(
            "ledger",
            "initial_cash",
            "initial_cash must be positive",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;

    fn adapter(content: &str) -> FileConfigAdapter {
        FileConfigAdapter::from_string(content).unwrap()
    }

    fn invalid_key(result: Result<(), BandtraderError>) -> String {
        match result {
            Err(BandtraderError::ConfigInvalid { key, .. }) => key,
            other => panic!("expected ConfigInvalid, got {:?}", other),
        }
    }

    #[test]
    fn empty_strategy_section_uses_valid_defaults() {
        assert!(validate_strategy_config(&adapter("[strategy]\n")).is_ok());
    }

    #[test]
    fn rejects_zero_stake() {
        let result = validate_strategy_config(&adapter("[strategy]\nstake = 0\n"));
        assert_eq!(invalid_key(result), "stake");
    }

    #[test]
    fn rejects_bad_bands() {
        assert_eq!(
            invalid_key(validate_strategy_config(&adapter("[strategy]\nn = 0\n"))),
            "n"
        );
        assert_eq!(
            invalid_key(validate_strategy_config(&adapter("[strategy]\nk = -1\n"))),
            "k"
        );
    }

    #[test]
    fn rsi_checks_only_when_enabled() {
        assert_eq!(
            invalid_key(validate_strategy_config(&adapter("[strategy]\nrsi_buy = 120\n"))),
            "rsi_buy"
        );
        assert_eq!(
            invalid_key(validate_strategy_config(&adapter("[strategy]\nrsi_period = 0\n"))),
            "rsi_period"
        );
        assert!(validate_strategy_config(&adapter(
            "[strategy]\nallow_rsi = false\nrsi_period = 0\n"
        ))
        .is_ok());
    }

    #[test]
    fn rejects_bad_exit_fractions() {
        assert_eq!(
            invalid_key(validate_strategy_config(&adapter("[strategy]\nstop_loss = 1.5\n"))),
            "stop_loss"
        );
        assert_eq!(
            invalid_key(validate_strategy_config(&adapter(
                "[strategy]\ntake_profit = -0.1\n"
            ))),
            "take_profit"
        );
    }

    #[test]
    fn replay_requires_instruments() {
        let result = validate_replay_config(&adapter("[data]\npath = .\n"));
        assert!(matches!(result, Err(BandtraderError::ConfigMissing { .. })));
    }

    #[test]
    fn replay_checks_instrument_index() {
        let result = validate_replay_config(&adapter(
            "[data]\ninstruments = BHP\n[strategy]\ninstrument_index = 1\n",
        ));
        assert_eq!(invalid_key(result), "instrument_index");
    }

    #[test]
    fn replay_checks_cash() {
        let result = validate_replay_config(&adapter(
            "[data]\ninstruments = BHP\n[ledger]\ninitial_cash = 0\n",
        ));
        assert_eq!(invalid_key(result), "initial_cash");
        assert!(validate_replay_config(&adapter("[data]\ninstruments = BHP, CBA\n")).is_ok());
    }

    #[test]
    fn ledger_checks_skip_instruments() {
        let config = adapter("[ledger]\ninitial_cash = -500\n");
        assert_eq!(invalid_key(validate_ledger_config(&config)), "initial_cash");
        assert!(validate_ledger_config(&adapter("[strategy]\nstake = 1\n")).is_ok());
    }
}
