//! Session statistics derived from the trade history.
//!
//! Pure functions over the accumulated trade records, recomputed on demand;
//! no cached aggregate state. An empty history yields all-zero defaults.

use crate::domain::trade::TradeRecord;

const TRADING_DAYS_PER_YEAR: f64 = 252.0;

#[derive(Debug, Clone, PartialEq)]
pub struct SessionStats {
    pub total_trades: usize,
    /// Fraction of trades with positive realized P&L, over all trades.
    /// BUY trades always carry zero realized P&L and count as non-winning.
    pub win_rate: f64,
    /// Last cumulative P&L value in the history.
    pub total_pnl: f64,
    /// Maximum peak-to-subsequent-trough decline of cumulative P&L, in
    /// currency units.
    pub max_drawdown: f64,
    pub avg_pnl_per_trade: f64,
    pub best_trade: f64,
    pub worst_trade: f64,
    pub sharpe_ratio: f64,
}

impl SessionStats {
    pub fn compute(trades: &[TradeRecord], risk_free_rate: f64) -> Self {
        if trades.is_empty() {
            return SessionStats {
                total_trades: 0,
                win_rate: 0.0,
                total_pnl: 0.0,
                max_drawdown: 0.0,
                avg_pnl_per_trade: 0.0,
                best_trade: 0.0,
                worst_trade: 0.0,
                sharpe_ratio: 0.0,
            };
        }

        let pnls: Vec<f64> = trades.iter().map(|t| t.realized_pnl).collect();
        let cumulative: Vec<f64> = trades.iter().map(|t| t.cumulative_pnl).collect();

        let winners = pnls.iter().filter(|&&p| p > 0.0).count();
        let win_rate = winners as f64 / trades.len() as f64;

        let mut best = f64::NEG_INFINITY;
        let mut worst = f64::INFINITY;
        let mut sum = 0.0;
        for &pnl in &pnls {
            if pnl > best {
                best = pnl;
            }
            if pnl < worst {
                worst = pnl;
            }
            sum += pnl;
        }

        SessionStats {
            total_trades: trades.len(),
            win_rate,
            total_pnl: *cumulative.last().unwrap_or(&0.0),
            max_drawdown: compute_drawdown(&cumulative),
            avg_pnl_per_trade: sum / pnls.len() as f64,
            best_trade: best,
            worst_trade: worst,
            sharpe_ratio: compute_sharpe(&pnls, risk_free_rate),
        }
    }
}

fn compute_drawdown(cumulative: &[f64]) -> f64 {
    let Some(&first) = cumulative.first() else {
        return 0.0;
    };

    let mut peak = first;
    let mut max_drawdown = 0.0;
    for &value in &cumulative[1..] {
        if value > peak {
            peak = value;
        }
        let drawdown = peak - value;
        if drawdown > max_drawdown {
            max_drawdown = drawdown;
        }
    }
    max_drawdown
}

/// Sharpe-like ratio over per-trade realized P&L against a daily risk-free
/// rate. Zero with fewer than two trades or zero dispersion.
fn compute_sharpe(pnls: &[f64], risk_free_rate: f64) -> f64 {
    if pnls.len() < 2 {
        return 0.0;
    }

    let daily_rf = risk_free_rate / TRADING_DAYS_PER_YEAR;
    let excess: Vec<f64> = pnls.iter().map(|p| p - daily_rf).collect();

    let n = excess.len() as f64;
    let mean = excess.iter().sum::<f64>() / n;
    let variance = excess.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1.0);
    let stddev = variance.sqrt();

    if stddev > 0.0 { mean / stddev } else { 0.0 }
}
