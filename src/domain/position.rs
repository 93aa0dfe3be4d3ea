//! Position snapshot as reported by the ledger.

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Position {
    /// Signed size: positive long, negative short.
    pub quantity: i64,
    /// Average entry price; defined iff `quantity != 0`.
    pub avg_price: Option<f64>,
}

impl Position {
    pub fn flat() -> Self {
        Position::default()
    }

    /// Drops the average price of a flat position so the invariant holds
    /// whatever the ledger reported.
    pub fn new(quantity: i64, avg_price: Option<f64>) -> Self {
        Position {
            quantity,
            avg_price: if quantity == 0 { None } else { avg_price },
        }
    }

    pub fn is_flat(&self) -> bool {
        self.quantity == 0
    }

    pub fn is_long(&self) -> bool {
        self.quantity > 0
    }

}
