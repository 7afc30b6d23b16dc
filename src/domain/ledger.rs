//! Cash/position ledger with strict solvency accounting.
//!
//! All monetary and quantity values are `f64`; solvency checks allow a
//! relative tolerance of [`SOLVENCY_TOLERANCE`] so that an all-in buy sized
//! as `cash / price` cannot be rejected by one ulp of rounding.

use crate::domain::error::MeanrevError;

/// Relative tolerance applied to overdraw/oversell checks.
pub const SOLVENCY_TOLERANCE: f64 = 1e-9;

fn exceeds(amount: f64, limit: f64) -> bool {
    amount > limit + SOLVENCY_TOLERANCE * limit.abs().max(1.0)
}

/// Point-in-time valuation of the ledger at a given market price.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerSummary {
    pub cash: f64,
    pub position_quantity: f64,
    pub cost_basis: f64,
    pub current_price: f64,
    pub market_value: f64,
    pub total_value: f64,
    pub initial_cash: f64,
    pub total_pnl: f64,
    pub total_pnl_pct: f64,
    pub unrealized_pnl: f64,
    pub trade_count: u64,
}

/// Owns cash and the held quantity of the single traded asset.
///
/// Invariants: `cash >= 0` and `position_quantity >= 0` after every
/// operation. `cost_basis` is the weighted-average acquisition price of the
/// current position and is exactly `0.0` whenever the position is flat.
#[derive(Debug, Clone, PartialEq)]
pub struct Ledger {
    cash: f64,
    position_quantity: f64,
    cost_basis: f64,
    initial_cash: f64,
    trade_count: u64,
}

impl Ledger {
    pub fn new(initial_cash: f64) -> Self {
        Ledger {
            cash: initial_cash,
            position_quantity: 0.0,
            cost_basis: 0.0,
            initial_cash,
            trade_count: 0,
        }
    }

    pub fn cash(&self) -> f64 {
        self.cash
    }

    pub fn position_quantity(&self) -> f64 {
        self.position_quantity
    }

    pub fn cost_basis(&self) -> f64 {
        self.cost_basis
    }

    pub fn initial_cash(&self) -> f64 {
        self.initial_cash
    }

    pub fn trade_count(&self) -> u64 {
        self.trade_count
    }

    pub fn is_flat(&self) -> bool {
        self.position_quantity == 0.0
    }

    /// Buy `quantity` units at `price`, deducting the cost from cash.
    ///
    /// The cost basis becomes the weighted average of the existing position
    /// and the new purchase. Rejects the order rather than clipping it when
    /// the cost exceeds available cash.
    pub fn buy(&mut self, quantity: f64, price: f64) -> Result<(), MeanrevError> {
        if quantity <= 0.0 {
            return Err(MeanrevError::InvalidOrder {
                reason: format!("buy quantity must be positive, got {quantity}"),
            });
        }
        if price <= 0.0 {
            return Err(MeanrevError::InvalidOrder {
                reason: format!("buy price must be positive, got {price}"),
            });
        }

        let cost = quantity * price;
        if exceeds(cost, self.cash) {
            return Err(MeanrevError::InsufficientFunds {
                available: self.cash,
                required: cost,
            });
        }

        self.cash = (self.cash - cost).max(0.0);

        if self.position_quantity > 0.0 {
            let total_cost = self.position_quantity * self.cost_basis + cost;
            self.position_quantity += quantity;
            self.cost_basis = total_cost / self.position_quantity;
        } else {
            self.position_quantity = quantity;
            self.cost_basis = price;
        }

        self.trade_count += 1;
        Ok(())
    }

    /// Sell `quantity` units at `price`, adding the proceeds to cash.
    ///
    /// Resets the cost basis to zero exactly when the sell takes the
    /// position to zero.
    pub fn sell(&mut self, quantity: f64, price: f64) -> Result<(), MeanrevError> {
        if quantity <= 0.0 {
            return Err(MeanrevError::InvalidOrder {
                reason: format!("sell quantity must be positive, got {quantity}"),
            });
        }
        if price <= 0.0 {
            return Err(MeanrevError::InvalidOrder {
                reason: format!("sell price must be positive, got {price}"),
            });
        }
        if exceeds(quantity, self.position_quantity) {
            return Err(MeanrevError::InsufficientPosition {
                held: self.position_quantity,
                requested: quantity,
            });
        }

        self.cash += quantity * price;
        self.position_quantity = (self.position_quantity - quantity).max(0.0);
        if self.position_quantity == 0.0 {
            self.cost_basis = 0.0;
        }

        self.trade_count += 1;
        Ok(())
    }

    /// Cash plus the position valued at `current_price`.
    pub fn total_value(&self, current_price: f64) -> f64 {
        self.cash + self.position_quantity * current_price
    }

    /// Mark-to-market gain on the held position; zero when flat.
    pub fn unrealized_pnl(&self, current_price: f64) -> f64 {
        if self.position_quantity == 0.0 {
            return 0.0;
        }
        self.position_quantity * (current_price - self.cost_basis)
    }

    /// Total portfolio gain since inception at `current_price`.
    pub fn total_pnl(&self, current_price: f64) -> f64 {
        self.total_value(current_price) - self.initial_cash
    }

    pub fn summary(&self, current_price: f64) -> LedgerSummary {
        let total_value = self.total_value(current_price);
        let total_pnl = self.total_pnl(current_price);
        LedgerSummary {
            cash: self.cash,
            position_quantity: self.position_quantity,
            cost_basis: self.cost_basis,
            current_price,
            market_value: self.position_quantity * current_price,
            total_value,
            initial_cash: self.initial_cash,
            total_pnl,
            total_pnl_pct: (total_pnl / self.initial_cash) * 100.0,
            unrealized_pnl: self.unrealized_pnl(current_price),
            trade_count: self.trade_count,
        }
    }
}
