//! Core domain types and logic.

pub mod ledger;
pub mod trade;
pub mod moving_average;
pub mod engine;
pub mod stats;
pub mod session;
pub mod config_validation;
pub mod error;
