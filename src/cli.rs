//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::paper_venue::PaperVenue;
use crate::domain::config_validation::{
    validate_ledger_config, validate_replay_config, validate_strategy_config,
};
use crate::domain::decision::DecisionOutcome;
use crate::domain::error::BandtraderError;
use crate::domain::indicator::snapshot::compute_snapshots;
use crate::domain::ohlcv::PriceBar;
use crate::domain::replay::{run_replay, ReplayConfig, ReplaySummary};
use crate::domain::strategy::StrategyConfig;
use crate::ports::config_port::ConfigPort;
use crate::ports::market_data_port::MarketDataPort;

#[derive(Parser, Debug)]
#[command(name = "bandtrader", about = "Bollinger band breakout decision engine")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Replay a CSV price history through the strategy on a paper venue
    Replay {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        data: Option<PathBuf>,
        #[arg(long)]
        instrument: Option<String>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Print per-bar indicator values as CSV
    Indicators {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        data: Option<PathBuf>,
        #[arg(long)]
        instrument: Option<String>,
    },
    /// List instruments available in the data directory
    ListInstruments {
        #[arg(short, long)]
        data: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Replay {
            config,
            data,
            instrument,
        } => run_replay_command(&config, data.as_deref(), instrument.as_deref()),
        Command::Validate { config } => run_validate(&config),
        Command::Indicators {
            config,
            data,
            instrument,
        } => run_indicators(&config, data.as_deref(), instrument.as_deref()),
        Command::ListInstruments { data } => run_list_instruments(&data),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn build_strategy_config(adapter: &dyn ConfigPort) -> Result<StrategyConfig, BandtraderError> {
    validate_strategy_config(adapter)?;
    let d = StrategyConfig::default();
    Ok(StrategyConfig {
        stake: adapter.get_int("strategy", "stake", d.stake),
        instrument_index: adapter
            .get_int("strategy", "instrument_index", d.instrument_index as i64)
            .max(0) as usize,
        period: adapter.get_int("strategy", "n", d.period as i64) as usize,
        k: adapter.get_double("strategy", "k", d.k),
        allow_short: adapter.get_bool("strategy", "allow_short", d.allow_short),
        allow_rsi: adapter.get_bool("strategy", "allow_rsi", d.allow_rsi),
        rsi_period: adapter
            .get_int("strategy", "rsi_period", d.rsi_period as i64)
            .max(0) as usize,
        rsi_buy: adapter.get_double("strategy", "rsi_buy", d.rsi_buy),
        rsi_sell: adapter.get_double("strategy", "rsi_sell", d.rsi_sell),
        exit_rule: adapter.get_bool("strategy", "exit_rule", d.exit_rule),
        stop_loss: adapter.get_double("strategy", "stop_loss", d.stop_loss),
        take_profit: adapter.get_double("strategy", "take_profit", d.take_profit),
    })
}

pub fn build_replay_config(adapter: &dyn ConfigPort) -> Result<ReplayConfig, BandtraderError> {
    validate_replay_config(adapter)?;
    Ok(read_replay_config(adapter))
}

fn read_replay_config(adapter: &dyn ConfigPort) -> ReplayConfig {
    ReplayConfig {
        initial_cash: adapter.get_double(
            "ledger",
            "initial_cash",
            ReplayConfig::default().initial_cash,
        ),
    }
}

/// The traded instrument: the override if given, else `instruments[instrument_index]`.
pub fn resolve_instrument(
    adapter: &dyn ConfigPort,
    strategy: &StrategyConfig,
    instrument_override: Option<&str>,
) -> Result<String, BandtraderError> {
    if let Some(code) = instrument_override {
        return Ok(code.to_string());
    }
    let instruments = adapter.get_list("data", "instruments");
    instruments
        .get(strategy.instrument_index)
        .cloned()
        .ok_or_else(|| BandtraderError::missing("data", "instruments"))
}

fn resolve_data_dir(adapter: &dyn ConfigPort, data_override: Option<&Path>) -> PathBuf {
    match data_override {
        Some(p) => p.to_path_buf(),
        None => adapter
            .get_string("data", "path")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(".")),
    }
}

fn load_bars(
    adapter: &dyn ConfigPort,
    strategy: &StrategyConfig,
    data_override: Option<&Path>,
    instrument_override: Option<&str>,
) -> Result<Vec<PriceBar>, BandtraderError> {
    let code = resolve_instrument(adapter, strategy, instrument_override)?;
    let data_dir = resolve_data_dir(adapter, data_override);
    eprintln!("Loading {} from {}", code, data_dir.display());

    let bars = CsvAdapter::new(data_dir).fetch_bars(&code)?;
    if bars.is_empty() {
        return Err(BandtraderError::NoData { code });
    }
    if bars.len() < strategy.warmup_bars() {
        eprintln!(
            "warning: {} has {} bars, fewer than the {} needed for warm-up",
            code,
            bars.len(),
            strategy.warmup_bars()
        );
    }
    Ok(bars)
}

fn run_replay_command(
    config_path: &Path,
    data_override: Option<&Path>,
    instrument_override: Option<&str>,
) -> Result<(), BandtraderError> {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = FileConfigAdapter::from_file(config_path)?;
    let strategy = build_strategy_config(&adapter)?;
    let replay_config = if instrument_override.is_some() {
        // An explicit instrument makes the [data] instrument list optional.
        validate_ledger_config(&adapter)?;
        read_replay_config(&adapter)
    } else {
        build_replay_config(&adapter)?
    };

    let bars = load_bars(&adapter, &strategy, data_override, instrument_override)?;
    eprintln!("  Processing: {} bars", bars.len());

    let mut venue = PaperVenue::new(replay_config.initial_cash);
    let summary = run_replay(&bars, &strategy, &mut venue);
    print_summary(&summary, replay_config.initial_cash);
    Ok(())
}

fn print_summary(summary: &ReplaySummary, initial_cash: f64) {
    let entries = summary.count_outcomes(|o| matches!(o, DecisionOutcome::Entry { .. }));
    let exits = summary.count_outcomes(|o| matches!(o, DecisionOutcome::Exit { .. }));
    let reductions = summary.count_outcomes(|o| matches!(o, DecisionOutcome::Reduction { .. }));
    let filtered = summary.count_outcomes(|o| matches!(o, DecisionOutcome::Filtered(_)));
    let blocked = summary.count_outcomes(|o| matches!(o, DecisionOutcome::CapitalBlocked { .. }));

    eprintln!("\n=== Replay Summary ===");
    eprintln!("Bars:             {}", summary.bars);
    eprintln!("Entries:          {}", entries);
    eprintln!("Exits (SL/TP):    {}", exits);
    eprintln!("Reductions:       {}", reductions);
    eprintln!("Filtered (RSI):   {}", filtered);
    eprintln!("Capital blocked:  {}", blocked);
    eprintln!("Orders submitted: {}", summary.orders_submitted);
    eprintln!("Fills:            {}", summary.fills);
    eprintln!("Cancelled:        {}", summary.cancellations);
    eprintln!("Rejected:         {}", summary.rejections);
    eprintln!(
        "Final position:   {:+} @ {}",
        summary.final_position.quantity,
        summary
            .final_position
            .avg_price
            .map(|p| format!("{:.2}", p))
            .unwrap_or_else(|| "-".to_string())
    );
    eprintln!(
        "Cash:             {:.2} (start {:.2})",
        summary.final_buying_power, initial_cash
    );
}

fn run_validate(config_path: &Path) -> Result<(), BandtraderError> {
    let adapter = FileConfigAdapter::from_file(config_path)?;
    let strategy = build_strategy_config(&adapter)?;
    build_replay_config(&adapter)?;
    println!(
        "Configuration is valid (n={}, k={}, stake={}, warm-up {} bars)",
        strategy.period,
        strategy.k,
        strategy.stake,
        strategy.warmup_bars()
    );
    Ok(())
}

fn fmt_opt(v: Option<f64>) -> String {
    v.map(|x| format!("{:.6}", x)).unwrap_or_default()
}

fn run_indicators(
    config_path: &Path,
    data_override: Option<&Path>,
    instrument_override: Option<&str>,
) -> Result<(), BandtraderError> {
    let adapter = FileConfigAdapter::from_file(config_path)?;
    let strategy = build_strategy_config(&adapter)?;
    let bars = load_bars(&adapter, &strategy, data_override, instrument_override)?;
    let snapshots = compute_snapshots(&bars, &strategy);

    let mut wtr = csv::Writer::from_writer(io::stdout().lock());
    let csv_err = |e: csv::Error| BandtraderError::Data {
        reason: format!("CSV write error: {}", e),
    };
    wtr.write_record(["date", "close", "mid", "upper", "lower", "bandwidth", "rsi"])
        .map_err(csv_err)?;
    for (bar, snap) in bars.iter().zip(&snapshots) {
        wtr.write_record([
            bar.date.format("%Y-%m-%d").to_string(),
            format!("{:.6}", bar.close),
            fmt_opt(snap.mid),
            fmt_opt(snap.upper),
            fmt_opt(snap.lower),
            fmt_opt(snap.bandwidth),
            fmt_opt(snap.oscillator),
        ])
        .map_err(csv_err)?;
    }
    wtr.flush()?;
    Ok(())
}

fn run_list_instruments(data_dir: &Path) -> Result<(), BandtraderError> {
    let codes = CsvAdapter::new(data_dir.to_path_buf()).list_instruments()?;
    if codes.is_empty() {
        eprintln!("No instruments found in {}", data_dir.display());
    }
    for code in codes {
        println!("{}", code);
    }
    Ok(())
}
