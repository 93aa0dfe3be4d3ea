//! Core domain types and decision logic.

pub mod ohlcv;
pub mod position;
pub mod order;
pub mod strategy;
pub mod indicator;
pub mod entry_filter;
pub mod exit_rule;
pub mod risk_guard;
pub mod router;
pub mod decision;
pub mod engine;
pub mod replay;
pub mod config_validation;
pub mod error;
