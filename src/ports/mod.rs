//! Port traits for the collaborators the decision engine talks to.

pub mod config_port;
pub mod execution_port;
pub mod ledger_port;
pub mod market_data_port;
