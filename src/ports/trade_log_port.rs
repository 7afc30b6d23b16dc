//! Trade log persistence port trait.

use crate::domain::error::MeanrevError;
use crate::domain::trade::TradeRecord;

/// Side-effect sink for executed trades. Records arrive in execution order
/// and are never amended.
pub trait TradeLogPort {
    fn append(&mut self, record: &TradeRecord) -> Result<(), MeanrevError>;
}
