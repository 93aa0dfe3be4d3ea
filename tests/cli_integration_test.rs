//! CLI integration tests: real INI files and CSV directories on disk.
//!
//! Tests cover:
//! - Config parsing (build_strategy_config, build_replay_config)
//! - Instrument resolution from `[data] instruments` and `instrument_index`
//! - Exit codes of each command for good and bad inputs

mod common;

use bandtrader::adapters::file_config_adapter::FileConfigAdapter;
use bandtrader::cli::{self, Cli, Command};
use bandtrader::domain::error::BandtraderError;
use bandtrader::domain::strategy::StrategyConfig;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tempfile::TempDir;

fn write_temp_ini(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

/// ExitCode has no PartialEq; compare through its Debug form.
fn same_exit(a: ExitCode, b: ExitCode) -> bool {
    format!("{:?}", a) == format!("{:?}", b)
}

fn write_csv(dir: &Path, code: &str, closes: &[f64]) {
    let mut content = String::from("date,open,high,low,close,volume\n");
    for bar in common::generate_bars(code, closes) {
        content.push_str(&format!(
            "{},{},{},{},{},{}\n",
            bar.date.format("%Y-%m-%d"),
            bar.open,
            bar.high,
            bar.low,
            bar.close,
            bar.volume
        ));
    }
    fs::write(dir.join(format!("{}.csv", code)), content).unwrap();
}

fn ini_for(data_dir: &Path) -> String {
    format!(
        r#"
[strategy]
stake = 10
instrument_index = 1
n = 5
k = 1.5
allow_short = true
allow_RSI = false
exit_rule = true
Stop_loss = 0.10
take_profit = 0.20

[data]
path = {}
instruments = BHP, CBA

[ledger]
initial_cash = 50000
"#,
        data_dir.display()
    )
}

fn data_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    write_csv(dir.path(), "BHP", &[100.0, 100.0, 100.0, 100.0, 110.0]);
    write_csv(
        dir.path(),
        "CBA",
        &[100.0, 100.0, 100.0, 100.0, 90.0, 95.0, 95.0],
    );
    dir
}

mod config_loading {
    use super::*;

    #[test]
    fn strategy_from_file() {
        let dir = data_dir();
        let ini = write_temp_ini(&ini_for(dir.path()));
        let adapter = FileConfigAdapter::from_file(ini.path()).unwrap();
        let strategy = cli::build_strategy_config(&adapter).unwrap();

        assert_eq!(strategy.stake, 10);
        assert_eq!(strategy.period, 5);
        assert!(!strategy.allow_rsi);
        assert_eq!(strategy.warmup_bars(), 5);
        assert_eq!(
            cli::resolve_instrument(&adapter, &strategy, None).unwrap(),
            "CBA"
        );
        assert_eq!(cli::build_replay_config(&adapter).unwrap().initial_cash, 50_000.0);
    }

    #[test]
    fn missing_instruments_is_config_error() {
        let adapter = FileConfigAdapter::from_string("[strategy]\nstake = 1\n").unwrap();
        let strategy = StrategyConfig::default();
        assert!(matches!(
            cli::resolve_instrument(&adapter, &strategy, None),
            Err(BandtraderError::ConfigMissing { .. })
        ));
        assert!(matches!(
            cli::build_replay_config(&adapter),
            Err(BandtraderError::ConfigMissing { .. })
        ));
    }
}

mod commands {
    use super::*;

    fn run(command: Command) -> ExitCode {
        cli::run(Cli { command })
    }

    #[test]
    fn validate_accepts_good_config() {
        let dir = data_dir();
        let ini = write_temp_ini(&ini_for(dir.path()));
        let code = run(Command::Validate {
            config: ini.path().to_path_buf(),
        });
        assert!(same_exit(code, ExitCode::SUCCESS));
    }

    #[test]
    fn validate_rejects_bad_value_with_config_exit_code() {
        let ini = write_temp_ini("[strategy]\nstake = 0\n[data]\ninstruments = BHP\n");
        let code = run(Command::Validate {
            config: ini.path().to_path_buf(),
        });
        assert!(same_exit(code, ExitCode::from(2)));
    }

    #[test]
    fn replay_runs_configured_instrument() {
        let dir = data_dir();
        let ini = write_temp_ini(&ini_for(dir.path()));
        let code = run(Command::Replay {
            config: ini.path().to_path_buf(),
            data: None,
            instrument: None,
        });
        assert!(same_exit(code, ExitCode::SUCCESS));
    }

    #[test]
    fn replay_with_overrides() {
        let dir = data_dir();
        let ini = write_temp_ini("[strategy]\nn = 5\nk = 1.5\nallow_rsi = false\n");
        let code = run(Command::Replay {
            config: ini.path().to_path_buf(),
            data: Some(dir.path().to_path_buf()),
            instrument: Some("BHP".to_string()),
        });
        assert!(same_exit(code, ExitCode::SUCCESS));
    }

    #[test]
    fn replay_with_instrument_still_checks_initial_cash() {
        let dir = data_dir();
        let ini = write_temp_ini(
            "[strategy]\nn = 5\nallow_rsi = false\n[ledger]\ninitial_cash = -500\n",
        );
        let code = run(Command::Replay {
            config: ini.path().to_path_buf(),
            data: Some(dir.path().to_path_buf()),
            instrument: Some("BHP".to_string()),
        });
        assert!(same_exit(code, ExitCode::from(2)));
    }

    #[test]
    fn replay_missing_csv_is_data_error() {
        let dir = data_dir();
        let ini = write_temp_ini(&ini_for(dir.path()));
        let code = run(Command::Replay {
            config: ini.path().to_path_buf(),
            data: None,
            instrument: Some("WES".to_string()),
        });
        assert!(same_exit(code, ExitCode::from(3)));
    }

    #[test]
    fn replay_empty_csv_is_no_data() {
        let dir = data_dir();
        fs::write(dir.path().join("EMPTY.csv"), "date,open,high,low,close,volume\n").unwrap();
        let ini = write_temp_ini(&ini_for(dir.path()));
        let code = run(Command::Replay {
            config: ini.path().to_path_buf(),
            data: None,
            instrument: Some("EMPTY".to_string()),
        });
        assert!(same_exit(code, ExitCode::from(5)));
    }

    #[test]
    fn missing_config_file_is_config_error() {
        let code = run(Command::Validate {
            config: PathBuf::from("/nonexistent/bandtrader.ini"),
        });
        assert!(same_exit(code, ExitCode::from(2)));
    }

    #[test]
    fn indicators_prints_for_configured_instrument() {
        let dir = data_dir();
        let ini = write_temp_ini(&ini_for(dir.path()));
        let code = run(Command::Indicators {
            config: ini.path().to_path_buf(),
            data: None,
            instrument: None,
        });
        assert!(same_exit(code, ExitCode::SUCCESS));
    }

    #[test]
    fn list_instruments_in_directory() {
        let dir = data_dir();
        let code = run(Command::ListInstruments {
            data: dir.path().to_path_buf(),
        });
        assert!(same_exit(code, ExitCode::SUCCESS));

        let code = run(Command::ListInstruments {
            data: PathBuf::from("/nonexistent/bandtrader-data"),
        });
        assert!(same_exit(code, ExitCode::from(1)));
    }
}
