//! Order intents, routed requests and venue notifications.

use chrono::NaiveDate;
use std::fmt;

/// Venue-assigned order identifier.
pub type OrderId = u64;

/// A proposed signed quantity change for one instrument.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderIntent {
    pub code: String,
    pub delta: i64,
}

impl OrderIntent {
    pub fn new(code: &str, delta: i64) -> Self {
        OrderIntent {
            code: code.to_string(),
            delta,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    pub fn of(quantity: i64) -> Self {
        if quantity >= 0 {
            OrderSide::Buy
        } else {
            OrderSide::Sell
        }
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderSide::Buy => write!(f, "BUY"),
            OrderSide::Sell => write!(f, "SELL"),
        }
    }
}

/// An order ready for the execution venue. Quantities are signed.
#[derive(Debug, Clone, PartialEq)]
pub enum OrderRequest {
    Market {
        code: String,
        quantity: i64,
    },
    Limit {
        code: String,
        quantity: i64,
        limit_price: f64,
        valid_until: NaiveDate,
    },
}

impl OrderRequest {
    pub fn code(&self) -> &str {
        match self {
            OrderRequest::Market { code, .. } | OrderRequest::Limit { code, .. } => code,
        }
    }

    pub fn quantity(&self) -> i64 {
        match self {
            OrderRequest::Market { quantity, .. } | OrderRequest::Limit { quantity, .. } => {
                *quantity
            }
        }
    }

    pub fn is_limit(&self) -> bool {
        matches!(self, OrderRequest::Limit { .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum OrderStatus {
    Submitted,
    Accepted,
    Completed { price: f64, size: i64 },
    Canceled,
    Rejected,
}

/// Lifecycle event delivered by the venue after submission.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderNotification {
    pub order_id: OrderId,
    pub code: String,
    pub date: NaiveDate,
    pub side: OrderSide,
    pub status: OrderStatus,
}
