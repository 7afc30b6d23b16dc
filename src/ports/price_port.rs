//! Price source port trait.

use crate::domain::error::MeanrevError;

/// Sequential source of validated positive price observations.
///
/// Implementations own retry, rate limiting, and validation: only positive
/// prices may be yielded to the core.
pub trait PricePort {
    /// The next price observation, or `None` when the feed is exhausted.
    fn next_price(&mut self) -> Result<Option<f64>, MeanrevError>;
}
