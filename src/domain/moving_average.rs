//! Trailing simple moving average.

/// Unweighted mean of the most recent `period` prices.
///
/// Returns `None` while fewer than `period` observations exist, or when
/// `period` is zero.
pub fn trailing_average(prices: &[f64], period: usize) -> Option<f64> {
    if period == 0 || prices.len() < period {
        return None;
    }
    let window = &prices[prices.len() - period..];
    Some(window.iter().sum::<f64>() / period as f64)
}
