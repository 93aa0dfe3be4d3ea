//! Sequential bar replay: drives a bar-clocked venue and the strategy.
//!
//! Per bar: advance the venue (resting orders fill or expire), hand its
//! notifications to the strategy, decide, submit, then hand over the
//! notifications the submissions produced.

use chrono::NaiveDate;
use log::info;

use super::decision::DecisionOutcome;
use super::engine::BandStrategy;
use super::indicator::snapshot::compute_snapshots;
use super::ohlcv::PriceBar;
use super::order::{OrderNotification, OrderStatus};
use super::position::Position;
use super::strategy::StrategyConfig;
use crate::ports::execution_port::{ExecutionPort, NotificationSource};
use crate::ports::ledger_port::LedgerPort;

/// Host-side settings for a replay run.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayConfig {
    pub initial_cash: f64,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        ReplayConfig {
            initial_cash: 100_000.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DecisionRecord {
    pub date: NaiveDate,
    pub close: f64,
    pub outcome: DecisionOutcome,
    pub orders_submitted: usize,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReplaySummary {
    pub bars: usize,
    pub records: Vec<DecisionRecord>,
    pub orders_submitted: usize,
    pub fills: usize,
    pub cancellations: usize,
    pub rejections: usize,
    pub final_position: Position,
    pub final_buying_power: f64,
}

impl ReplaySummary {
    fn count(&mut self, notifications: &[OrderNotification]) {
        for n in notifications {
            match n.status {
                OrderStatus::Completed { .. } => self.fills += 1,
                OrderStatus::Canceled => self.cancellations += 1,
                OrderStatus::Rejected => self.rejections += 1,
                OrderStatus::Submitted | OrderStatus::Accepted => {}
            }
        }
    }

    /// Number of bars whose decision matched `pred`.
    pub fn count_outcomes(&self, pred: impl Fn(&DecisionOutcome) -> bool) -> usize {
        self.records.iter().filter(|r| pred(&r.outcome)).count()
    }
}

fn deliver<V>(strategy: &BandStrategy<'_>, venue: &mut V, summary: &mut ReplaySummary)
where
    V: NotificationSource + ?Sized,
{
    let notifications = venue.drain_notifications();
    for n in &notifications {
        strategy.on_order_notification(n);
    }
    summary.count(&notifications);
}

/// Replays `bars` (one instrument, ascending dates) through the strategy.
pub fn run_replay<V>(bars: &[PriceBar], config: &StrategyConfig, venue: &mut V) -> ReplaySummary
where
    V: LedgerPort + ExecutionPort + NotificationSource + ?Sized,
{
    let strategy = BandStrategy::new(config);
    let snapshots = compute_snapshots(bars, config);
    let mut summary = ReplaySummary::default();

    for (bar, snapshot) in bars.iter().zip(&snapshots) {
        venue.advance(bar);
        deliver(&strategy, venue, &mut summary);

        let report = strategy.on_bar(bar, snapshot, venue);
        summary.orders_submitted += report.order_ids.len();
        summary.records.push(DecisionRecord {
            date: bar.date,
            close: bar.close,
            outcome: report.decision.outcome,
            orders_submitted: report.order_ids.len(),
        });

        deliver(&strategy, venue, &mut summary);
        summary.bars += 1;
    }

    if let Some(last) = bars.last() {
        summary.final_position = venue.position(&last.code);
    }
    summary.final_buying_power = venue.buying_power();

    info!(
        "replay finished: {} bars, {} orders, {} fills, {} cancelled, {} rejected",
        summary.bars,
        summary.orders_submitted,
        summary.fills,
        summary.cancellations,
        summary.rejections
    );
    summary
}
