//! Order routing: market order for every trade, plus an auxiliary limit
//! order resting beyond the band for fresh entries.

use chrono::{Days, NaiveDate};

use super::indicator::snapshot::Bands;
use super::order::{OrderIntent, OrderRequest};
use super::risk_guard::RiskGuard;

/// Fraction of the bandwidth the auxiliary limit sits beyond the band.
pub const LIMIT_BUFFER_FRACTION: f64 = 0.1;

/// What kind of trade a delta represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeKind {
    Entry,
    Reduction,
    Exit,
}

/// Orders that passed the guard, plus what was blocked.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Routed {
    pub orders: Vec<OrderRequest>,
    pub market_blocked: bool,
    pub limit_blocked: bool,
}

/// Limit price for an auxiliary entry order.
pub fn limit_price(delta: i64, bands: &Bands) -> f64 {
    let buffer = bands.bandwidth * LIMIT_BUFFER_FRACTION;
    if delta > 0 {
        bands.lower - buffer
    } else {
        bands.upper + buffer
    }
}

/// Last date an auxiliary limit placed on `date` may fill.
pub fn limit_valid_until(date: NaiveDate) -> NaiveDate {
    date.checked_add_days(Days::new(1)).unwrap_or(date)
}

pub fn route(
    code: &str,
    delta: i64,
    kind: TradeKind,
    was_flat: bool,
    bands: &Bands,
    date: NaiveDate,
    guard: &mut RiskGuard,
) -> Routed {
    let mut routed = Routed::default();
    if delta == 0 {
        return routed;
    }

    if !guard.approve(&[OrderIntent::new(code, delta)]) {
        routed.market_blocked = true;
        return routed;
    }
    routed.orders.push(OrderRequest::Market {
        code: code.to_string(),
        quantity: delta,
    });

    if kind != TradeKind::Entry || !was_flat {
        return routed;
    }

    // The limit mirrors the market order's full size.
    if !guard.approve(&[OrderIntent::new(code, delta)]) {
        routed.limit_blocked = true;
        return routed;
    }
    routed.orders.push(OrderRequest::Limit {
        code: code.to_string(),
        quantity: delta,
        limit_price: limit_price(delta, bands),
        valid_until: limit_valid_until(date),
    });

    routed
}
