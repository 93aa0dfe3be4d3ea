//! Pre-trade buying power check.
//!
//! A guard lives for one decision. Every approved batch is added to the
//! committed capital, so later batches in the same decision are checked as
//! incremental exposure on top of what already went out.

use std::collections::HashMap;

use super::order::OrderIntent;

#[derive(Debug, Clone)]
pub struct RiskGuard {
    buying_power: f64,
    committed: f64,
    price_map: HashMap<String, f64>,
}

impl RiskGuard {
    pub fn new(buying_power: f64, price_map: HashMap<String, f64>) -> Self {
        RiskGuard {
            buying_power,
            committed: 0.0,
            price_map,
        }
    }

    /// Guard for a single instrument priced at `price`.
    pub fn for_instrument(buying_power: f64, code: &str, price: f64) -> Self {
        let mut price_map = HashMap::new();
        price_map.insert(code.to_string(), price);
        RiskGuard::new(buying_power, price_map)
    }

    /// Capital needed to execute every intent at the current price, or `None`
    /// when any intent lacks a usable price.
    pub fn required_capital(&self, intents: &[OrderIntent]) -> Option<f64> {
        intents.iter().try_fold(0.0, |total, intent| {
            let price = self
                .price_map
                .get(&intent.code)
                .copied()
                .filter(|p| p.is_finite() && *p >= 0.0)?;
            Some(total + intent.delta.unsigned_abs() as f64 * price)
        })
    }

    /// All-or-nothing approval of a batch. Approved batches are committed.
    pub fn approve(&mut self, intents: &[OrderIntent]) -> bool {
        let Some(required) = self.required_capital(intents) else {
            return false;
        };
        if !self.buying_power.is_finite() || self.committed + required > self.buying_power {
            return false;
        }
        self.committed += required;
        true
    }
}
