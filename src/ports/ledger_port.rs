//! Portfolio / position ledger port trait.

use crate::domain::position::Position;

/// Read-only view of the account the strategy trades.
pub trait LedgerPort {
    fn position(&self, code: &str) -> Position;

    /// Capital available for new orders.
    fn buying_power(&self) -> f64;
}
