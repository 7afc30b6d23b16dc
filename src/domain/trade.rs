//! Trade records and per-step status snapshots.

use chrono::{DateTime, Utc};
use std::fmt;

/// Side of an executed trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Buy,
    Sell,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

impl std::str::FromStr for Side {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BUY" => Ok(Side::Buy),
            "SELL" => Ok(Side::Sell),
            other => Err(format!("unknown trade side: {other}")),
        }
    }
}

/// Whether the strategy currently holds the asset.
///
/// Derived cache of ledger truth; the ledger's quantity is authoritative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionState {
    Flat,
    Long,
}

impl fmt::Display for PositionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PositionState::Flat => write!(f, "FLAT"),
            PositionState::Long => write!(f, "LONG"),
        }
    }
}

/// One executed trade. Immutable once appended to the trade history.
///
/// `price` is the slippage-adjusted execution price; `total_value` and
/// `cumulative_pnl` are valued at the observed market price of the step
/// that triggered the trade.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeRecord {
    pub executed_at: DateTime<Utc>,
    pub side: Side,
    pub price: f64,
    pub quantity: f64,
    pub slippage: f64,
    pub total_value: f64,
    pub realized_pnl: f64,
    pub cumulative_pnl: f64,
    pub trailing_average: f64,
}

/// Snapshot returned to the caller after each price observation.
///
/// `trailing_average` is `None` during warm-up, while fewer than the
/// configured period of observations exist.
#[derive(Debug, Clone, PartialEq)]
pub struct StepStatus {
    pub price: f64,
    pub trailing_average: Option<f64>,
    pub position: PositionState,
    pub total_value: f64,
    pub cumulative_pnl: f64,
    pub trade: Option<TradeRecord>,
}

impl StepStatus {
    pub fn is_warming_up(&self) -> bool {
        self.trailing_average.is_none()
    }
}
