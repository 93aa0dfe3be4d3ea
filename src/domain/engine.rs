//! Host-facing strategy: runs the pure decision for a bar, submits what it
//! routed and writes the audit trail.

use log::{debug, info, warn};

use super::decision::{decide, Decision, DecisionOutcome};
use super::indicator::snapshot::IndicatorSnapshot;
use super::ohlcv::PriceBar;
use super::order::{OrderId, OrderNotification, OrderStatus};
use super::strategy::StrategyConfig;
use crate::ports::execution_port::ExecutionPort;
use crate::ports::ledger_port::LedgerPort;

pub struct BandStrategy<'a> {
    config: &'a StrategyConfig,
}

/// A decision together with the venue ids of what was submitted.
#[derive(Debug, Clone, PartialEq)]
pub struct BarReport {
    pub decision: Decision,
    pub order_ids: Vec<OrderId>,
}

impl<'a> BandStrategy<'a> {
    pub fn new(config: &'a StrategyConfig) -> Self {
        BandStrategy { config }
    }

    /// Decides on `bar` against the venue's current ledger and submits the
    /// routed orders. Must complete before the next bar is presented.
    pub fn on_bar<V>(
        &self,
        bar: &PriceBar,
        snapshot: &IndicatorSnapshot,
        venue: &mut V,
    ) -> BarReport
    where
        V: LedgerPort + ExecutionPort + ?Sized,
    {
        let position = venue.position(&bar.code);
        let decision = decide(bar, snapshot, &position, venue.buying_power(), self.config);

        match (&decision.outcome, &decision.audit) {
            (DecisionOutcome::CapitalBlocked { .. }, Some(line)) => {
                warn!("{} [{}] {}", bar.date, bar.code, line)
            }
            (_, Some(line)) => info!("{} [{}] {}", bar.date, bar.code, line),
            (outcome, None) => debug!("{} [{}] {:?}", bar.date, bar.code, outcome),
        }

        let order_ids = decision
            .orders
            .iter()
            .map(|order| {
                let id = venue.submit(order);
                debug!(
                    "{} [{}] submitted #{} {} {:+}",
                    bar.date,
                    order.code(),
                    id,
                    if order.is_limit() { "limit" } else { "market" },
                    order.quantity()
                );
                id
            })
            .collect();
        BarReport {
            decision,
            order_ids,
        }
    }

    /// Logs terminal order events. Returns the audit line, if any.
    /// Never resubmits or compensates.
    pub fn on_order_notification(&self, notification: &OrderNotification) -> Option<String> {
        let line = match &notification.status {
            OrderStatus::Submitted | OrderStatus::Accepted => return None,
            OrderStatus::Completed { price, size } => format!(
                "{} executed at {:.2} for size {}",
                notification.side, price, size
            ),
            OrderStatus::Canceled => "Order Canceled".to_string(),
            OrderStatus::Rejected => "Order Rejected".to_string(),
        };
        info!(
            "{} [{}] #{} {}",
            notification.date, notification.code, notification.order_id, line
        );
        Some(line)
    }
}
