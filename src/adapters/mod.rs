//! Concrete adapter implementations of the port traits.

pub mod file_config_adapter;
pub mod csv_price_feed;
pub mod csv_trade_log;
