//! Port traits decoupling the domain from its collaborators.

pub mod config_port;
pub mod price_port;
pub mod trade_log_port;
