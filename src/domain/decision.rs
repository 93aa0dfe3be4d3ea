//! Per-bar decision state machine.
//!
//! `Warmup → ExitCheck → EntrySignal → SizeAndRoute → Idle`. An exit that
//! fires in `ExitCheck` skips `EntrySignal` entirely. Nothing carries over
//! between bars except the ledger's position, so [`decide`] is a pure
//! function of the bar, its indicator snapshot and the ledger snapshot.

use super::entry_filter::{approve_entry, Direction};
use super::exit_rule::{evaluate_exit, ExitReason};
use super::indicator::snapshot::{Bands, IndicatorSnapshot};
use super::ohlcv::PriceBar;
use super::order::OrderRequest;
use super::position::Position;
use super::risk_guard::RiskGuard;
use super::router::{route, TradeKind};
use super::strategy::StrategyConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionState {
    Warmup,
    ExitCheck,
    EntrySignal,
    SizeAndRoute,
    Idle,
}

/// Result of the `EntrySignal` stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntrySignal {
    None,
    Filtered(Direction),
    Trade { kind: TradeKind, delta: i64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DecisionOutcome {
    /// Bands undefined; nothing evaluated.
    Warmup,
    NoSignal,
    /// Breakout seen but rejected by the RSI filter.
    Filtered(Direction),
    Exit { reason: ExitReason, delta: i64 },
    Entry { direction: Direction, delta: i64 },
    Reduction { delta: i64 },
    /// The risk guard refused the market order.
    CapitalBlocked { kind: TradeKind, delta: i64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub outcome: DecisionOutcome,
    /// Orders cleared for submission, market first.
    pub orders: Vec<OrderRequest>,
    /// The auxiliary limit was refused by the guard.
    pub limit_blocked: bool,
    /// States visited, ending in `Idle`.
    pub path: Vec<DecisionState>,
    pub audit: Option<String>,
}

/// Breakout signal for a bar whose bands are defined.
pub fn entry_signal(
    close: f64,
    bands: &Bands,
    position: &Position,
    oscillator: Option<f64>,
    config: &StrategyConfig,
) -> EntrySignal {
    if close < bands.lower {
        if approve_entry(Direction::Long, oscillator, config) {
            EntrySignal::Trade {
                kind: TradeKind::Entry,
                delta: config.stake,
            }
        } else {
            EntrySignal::Filtered(Direction::Long)
        }
    } else if close > bands.upper {
        if config.allow_short {
            if approve_entry(Direction::Short, oscillator, config) {
                EntrySignal::Trade {
                    kind: TradeKind::Entry,
                    delta: -config.stake,
                }
            } else {
                EntrySignal::Filtered(Direction::Short)
            }
        } else if position.is_long() {
            // Defensive unwind of an open long; the filter does not apply.
            EntrySignal::Trade {
                kind: TradeKind::Reduction,
                delta: -config.stake.min(position.quantity),
            }
        } else {
            EntrySignal::None
        }
    } else {
        EntrySignal::None
    }
}

pub fn decide(
    bar: &PriceBar,
    snapshot: &IndicatorSnapshot,
    position: &Position,
    buying_power: f64,
    config: &StrategyConfig,
) -> Decision {
    let mut path = Vec::with_capacity(5);

    let Some(bands) = snapshot.bands() else {
        path.extend([DecisionState::Warmup, DecisionState::Idle]);
        return Decision {
            outcome: DecisionOutcome::Warmup,
            orders: Vec::new(),
            limit_blocked: false,
            path,
            audit: None,
        };
    };

    let close = bar.close;
    let was_flat = position.is_flat();
    let mut guard = RiskGuard::for_instrument(buying_power, &bar.code, close);

    path.push(DecisionState::ExitCheck);
    if let Some(exit) = evaluate_exit(close, position.quantity, position.avg_price, config) {
        path.push(DecisionState::SizeAndRoute);
        let routed = route(
            &bar.code,
            exit.delta,
            TradeKind::Exit,
            was_flat,
            &bands,
            bar.date,
            &mut guard,
        );
        path.push(DecisionState::Idle);

        let (outcome, audit) = if routed.market_blocked {
            (
                DecisionOutcome::CapitalBlocked {
                    kind: TradeKind::Exit,
                    delta: exit.delta,
                },
                "Overspend guard triggered on exit; skip order".to_string(),
            )
        } else {
            (
                DecisionOutcome::Exit {
                    reason: exit.reason,
                    delta: exit.delta,
                },
                format!(
                    "EXIT via {}: close={:.4} avg={:.4} | pos={:+}, delta={:+}",
                    exit.reason,
                    close,
                    position.avg_price.unwrap_or_default(),
                    position.quantity,
                    exit.delta
                ),
            )
        };
        return Decision {
            outcome,
            orders: routed.orders,
            limit_blocked: false,
            path,
            audit: Some(audit),
        };
    }

    path.push(DecisionState::EntrySignal);
    let (kind, delta) = match entry_signal(close, &bands, position, snapshot.oscillator, config) {
        EntrySignal::Trade { kind, delta } if delta != 0 => (kind, delta),
        EntrySignal::Filtered(direction) => {
            path.push(DecisionState::Idle);
            return Decision {
                outcome: DecisionOutcome::Filtered(direction),
                orders: Vec::new(),
                limit_blocked: false,
                path,
                audit: None,
            };
        }
        _ => {
            path.push(DecisionState::Idle);
            return Decision {
                outcome: DecisionOutcome::NoSignal,
                orders: Vec::new(),
                limit_blocked: false,
                path,
                audit: None,
            };
        }
    };

    path.push(DecisionState::SizeAndRoute);
    let routed = route(&bar.code, delta, kind, was_flat, &bands, bar.date, &mut guard);
    path.push(DecisionState::Idle);

    if routed.market_blocked {
        return Decision {
            outcome: DecisionOutcome::CapitalBlocked { kind, delta },
            orders: Vec::new(),
            limit_blocked: false,
            path,
            audit: Some("Overspend guard triggered; skip order".to_string()),
        };
    }

    let mut audit = format!("MARKET ORDER: {:+} @ {:.2}", delta, close);
    for order in &routed.orders {
        if let OrderRequest::Limit {
            quantity,
            limit_price,
            ..
        } = order
        {
            audit.push_str(&format!(" | EXTRA LIMIT PLACED: {:+} @ {:.2}", quantity, limit_price));
        }
    }
    if routed.limit_blocked {
        audit.push_str(" | extra limit skipped by overspend guard");
    }

    let outcome = match kind {
        TradeKind::Reduction => DecisionOutcome::Reduction { delta },
        _ => DecisionOutcome::Entry {
            direction: if delta > 0 {
                Direction::Long
            } else {
                Direction::Short
            },
            delta,
        },
    };

    Decision {
        outcome,
        orders: routed.orders,
        limit_blocked: routed.limit_blocked,
        path,
        audit: Some(audit),
    }
}
