//! In-memory paper venue: ledger and execution venue in one.
//!
//! - Market orders fill at the close of the bar they are submitted on.
//! - Limit orders rest. On each later bar up to and including `valid_until`
//!   they fill at the limit, or at the open when the bar gaps through it.
//!   A limit still resting on a bar past `valid_until` is cancelled.
//! - Buys the cash cannot cover are rejected.
//!
//! No commission or slippage is modelled. Buying power is the cash balance.
//! The overspend guard charges exits as well, so a long that spent all the
//! cash cannot be stopped out here until cash comes back: each such bar is
//! logged as a blocked exit.

use chrono::NaiveDate;
use std::collections::HashMap;

use crate::domain::ohlcv::PriceBar;
use crate::domain::order::{OrderId, OrderNotification, OrderSide, OrderStatus};
use crate::domain::position::Position;
use crate::ports::execution_port::{ExecutionPort, NotificationSource};
use crate::ports::ledger_port::LedgerPort;

#[derive(Debug, Clone, PartialEq)]
pub struct RestingLimit {
    pub id: OrderId,
    pub code: String,
    pub quantity: i64,
    pub limit_price: f64,
    pub valid_until: NaiveDate,
    pub placed_on: NaiveDate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Fill {
    pub id: OrderId,
    pub code: String,
    pub date: NaiveDate,
    pub quantity: i64,
    pub price: f64,
}

#[derive(Debug, Clone)]
pub struct PaperVenue {
    cash: f64,
    positions: HashMap<String, Position>,
    last_bars: HashMap<String, PriceBar>,
    resting: Vec<RestingLimit>,
    fills: Vec<Fill>,
    pending: Vec<OrderNotification>,
    next_id: OrderId,
}

/// Position after applying a fill of `quantity` at `price`.
///
/// Adds average the price in, reductions keep it, flips restart at `price`.
pub fn apply_fill(position: Position, quantity: i64, price: f64) -> Position {
    let old = position.quantity;
    let new = old + quantity;
    if new == 0 {
        return Position::flat();
    }
    let avg = match position.avg_price {
        Some(avg) if old != 0 && old.signum() == quantity.signum() => {
            (old.unsigned_abs() as f64 * avg + quantity.unsigned_abs() as f64 * price)
                / new.unsigned_abs() as f64
        }
        Some(avg) if old != 0 && old.signum() == new.signum() => avg,
        _ => price,
    };
    Position::new(new, Some(avg))
}

impl PaperVenue {
    pub fn new(initial_cash: f64) -> Self {
        PaperVenue {
            cash: initial_cash,
            positions: HashMap::new(),
            last_bars: HashMap::new(),
            resting: Vec::new(),
            fills: Vec::new(),
            pending: Vec::new(),
            next_id: 1,
        }
    }

    /// Seeds an existing position, e.g. one carried in from a live account.
    pub fn with_position(mut self, code: &str, position: Position) -> Self {
        self.positions.insert(code.to_string(), position);
        self
    }

    pub fn cash(&self) -> f64 {
        self.cash
    }

    pub fn fills(&self) -> &[Fill] {
        &self.fills
    }

    pub fn resting(&self) -> &[RestingLimit] {
        &self.resting
    }

    fn allocate_id(&mut self) -> OrderId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn notify(
        &mut self,
        id: OrderId,
        code: &str,
        date: NaiveDate,
        quantity: i64,
        status: OrderStatus,
    ) {
        self.pending.push(OrderNotification {
            order_id: id,
            code: code.to_string(),
            date,
            side: OrderSide::of(quantity),
            status,
        });
    }

    fn affordable(&self, quantity: i64, price: f64) -> bool {
        quantity <= 0 || quantity as f64 * price <= self.cash
    }

    fn execute(&mut self, id: OrderId, code: &str, date: NaiveDate, quantity: i64, price: f64) {
        let position = self.position(code);
        self.positions
            .insert(code.to_string(), apply_fill(position, quantity, price));
        self.cash -= quantity as f64 * price;
        self.fills.push(Fill {
            id,
            code: code.to_string(),
            date,
            quantity,
            price,
        });
        self.notify(
            id,
            code,
            date,
            quantity,
            OrderStatus::Completed {
                price,
                size: quantity,
            },
        );
    }

    /// Price a resting limit trades at on `bar`, if it trades.
    fn limit_fill_price(order: &RestingLimit, bar: &PriceBar) -> Option<f64> {
        if order.quantity > 0 && bar.trades_at_or_below(order.limit_price) {
            Some(bar.open.min(order.limit_price))
        } else if order.quantity < 0 && bar.trades_at_or_above(order.limit_price) {
            Some(bar.open.max(order.limit_price))
        } else {
            None
        }
    }
}

impl LedgerPort for PaperVenue {
    fn position(&self, code: &str) -> Position {
        self.positions.get(code).copied().unwrap_or_default()
    }

    fn buying_power(&self) -> f64 {
        self.cash
    }
}

impl ExecutionPort for PaperVenue {
    fn submit_market(&mut self, code: &str, quantity: i64) -> OrderId {
        let id = self.allocate_id();
        let Some(bar) = self.last_bars.get(code).cloned() else {
            let date = NaiveDate::MIN;
            self.notify(id, code, date, quantity, OrderStatus::Rejected);
            return id;
        };

        self.notify(id, code, bar.date, quantity, OrderStatus::Submitted);
        if quantity == 0 || !self.affordable(quantity, bar.close) {
            self.notify(id, code, bar.date, quantity, OrderStatus::Rejected);
            return id;
        }
        self.notify(id, code, bar.date, quantity, OrderStatus::Accepted);
        self.execute(id, code, bar.date, quantity, bar.close);
        id
    }

    fn submit_limit(
        &mut self,
        code: &str,
        quantity: i64,
        limit_price: f64,
        valid_until: NaiveDate,
    ) -> OrderId {
        let id = self.allocate_id();
        let Some(date) = self.last_bars.get(code).map(|b| b.date) else {
            self.notify(id, code, NaiveDate::MIN, quantity, OrderStatus::Rejected);
            return id;
        };

        self.notify(id, code, date, quantity, OrderStatus::Submitted);
        if quantity == 0 || !limit_price.is_finite() || limit_price <= 0.0 {
            self.notify(id, code, date, quantity, OrderStatus::Rejected);
            return id;
        }
        self.notify(id, code, date, quantity, OrderStatus::Accepted);
        self.resting.push(RestingLimit {
            id,
            code: code.to_string(),
            quantity,
            limit_price,
            valid_until,
            placed_on: date,
        });
        id
    }
}

impl NotificationSource for PaperVenue {
    fn advance(&mut self, bar: &PriceBar) {
        self.last_bars.insert(bar.code.clone(), bar.clone());

        let (working, others): (Vec<_>, Vec<_>) = std::mem::take(&mut self.resting)
            .into_iter()
            .partition(|o| o.code == bar.code && o.placed_on < bar.date);
        self.resting = others;

        for order in working {
            if bar.date > order.valid_until {
                self.notify(order.id, &order.code, bar.date, order.quantity, OrderStatus::Canceled);
                continue;
            }
            match Self::limit_fill_price(&order, bar) {
                Some(price) if self.affordable(order.quantity, price) => {
                    self.execute(order.id, &order.code, bar.date, order.quantity, price)
                }
                Some(_) => self.notify(
                    order.id,
                    &order.code,
                    bar.date,
                    order.quantity,
                    OrderStatus::Rejected,
                ),
                None => self.resting.push(order),
            }
        }
    }

    fn drain_notifications(&mut self) -> Vec<OrderNotification> {
        std::mem::take(&mut self.pending)
    }
}
