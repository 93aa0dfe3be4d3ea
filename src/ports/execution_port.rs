//! Execution venue port trait.
//!
//! Submission is fire-and-forget: the venue reports fills, cancellations and
//! rejections later as `OrderNotification`s.

use chrono::NaiveDate;

use crate::domain::ohlcv::PriceBar;
use crate::domain::order::{OrderId, OrderNotification, OrderRequest};

pub trait ExecutionPort {
    fn submit_market(&mut self, code: &str, quantity: i64) -> OrderId;

    fn submit_limit(
        &mut self,
        code: &str,
        quantity: i64,
        limit_price: f64,
        valid_until: NaiveDate,
    ) -> OrderId;

    fn submit(&mut self, order: &OrderRequest) -> OrderId {
        match order {
            OrderRequest::Market { code, quantity } => self.submit_market(code, *quantity),
            OrderRequest::Limit {
                code,
                quantity,
                limit_price,
                valid_until,
            } => self.submit_limit(code, *quantity, *limit_price, *valid_until),
        }
    }
}

/// A venue driven bar by bar that reports order lifecycle events.
pub trait NotificationSource {
    /// Moves the venue's clock to `bar`, working resting orders against it.
    fn advance(&mut self, bar: &PriceBar);

    /// Notifications produced since the last drain, oldest first.
    fn drain_notifications(&mut self) -> Vec<OrderNotification>;
}
