//! Mean-reversion strategy engine.
//!
//! State machine over `{FLAT, LONG}` driven by one step function per price
//! observation. Entry buys all available cash below the trailing average;
//! exit sells the whole position above it. Equality with the average is a
//! dead zone and never triggers a transition.

use chrono::{DateTime, Utc};

use crate::domain::error::MeanrevError;
use crate::domain::ledger::Ledger;
use crate::domain::moving_average::trailing_average;
use crate::domain::trade::{PositionState, Side, StepStatus, TradeRecord};

/// Construction-time parameters for a simulation run.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub initial_cash: f64,
    pub ma_period: usize,
    pub slippage_rate: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            initial_cash: 10_000.0,
            ma_period: 20,
            slippage_rate: 0.001,
        }
    }
}

impl EngineConfig {
    /// Validate construction parameters. Failures here are fatal to startup.
    pub fn validate(&self) -> Result<(), MeanrevError> {
        if self.initial_cash <= 0.0 {
            return Err(MeanrevError::InvalidConfiguration {
                parameter: "initial_cash".into(),
                reason: format!("must be positive, got {}", self.initial_cash),
            });
        }
        if self.ma_period < 2 {
            return Err(MeanrevError::InvalidConfiguration {
                parameter: "ma_period".into(),
                reason: format!("must be at least 2, got {}", self.ma_period),
            });
        }
        if self.slippage_rate < 0.0 {
            return Err(MeanrevError::InvalidConfiguration {
                parameter: "slippage_rate".into(),
                reason: format!("must be non-negative, got {}", self.slippage_rate),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Signal {
    Enter,
    Exit,
    Hold,
}

/// Owns the ledger and the price/trade histories for one simulation run.
///
/// Single-threaded: each step runs to completion before the next is
/// accepted. Wrap in [`crate::domain::session::SharedSession`] when a
/// background poller and a foreground reader need concurrent access.
#[derive(Debug)]
pub struct StrategyEngine {
    config: EngineConfig,
    ledger: Ledger,
    price_history: Vec<f64>,
    trades: Vec<TradeRecord>,
    position: PositionState,
}

impl StrategyEngine {
    pub fn new(config: EngineConfig) -> Result<Self, MeanrevError> {
        config.validate()?;
        let ledger = Ledger::new(config.initial_cash);
        Ok(StrategyEngine {
            config,
            ledger,
            price_history: Vec::new(),
            trades: Vec::new(),
            position: PositionState::Flat,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn trades(&self) -> &[TradeRecord] {
        &self.trades
    }

    pub fn position(&self) -> PositionState {
        self.position
    }

    pub fn observations(&self) -> usize {
        self.price_history.len()
    }

    /// Observations still needed before the trailing average is available.
    pub fn warm_up_remaining(&self) -> usize {
        self.config.ma_period.saturating_sub(self.price_history.len())
    }

    /// Consume one price observation and run the strategy rule.
    ///
    /// The caller must only pass validated positive prices. A failed trade
    /// attempt propagates without corrupting state: the position flag only
    /// transitions after the ledger call succeeds.
    pub fn step(
        &mut self,
        observed_at: DateTime<Utc>,
        price: f64,
    ) -> Result<StepStatus, MeanrevError> {
        self.price_history.push(price);

        let Some(average) = trailing_average(&self.price_history, self.config.ma_period) else {
            return Ok(self.snapshot(price, None, None));
        };

        let trade = match self.evaluate_signal(price, average) {
            Signal::Enter => self.enter_long(observed_at, price, average)?,
            Signal::Exit => self.exit_long(observed_at, price, average)?,
            Signal::Hold => None,
        };

        Ok(self.snapshot(price, Some(average), trade))
    }

    /// Status for the latest observation without consuming a new one.
    /// `None` before the first price arrives.
    pub fn status(&self) -> Option<StepStatus> {
        let price = *self.price_history.last()?;
        let average = trailing_average(&self.price_history, self.config.ma_period);
        Some(self.snapshot(price, average, None))
    }

    fn snapshot(
        &self,
        price: f64,
        average: Option<f64>,
        trade: Option<TradeRecord>,
    ) -> StepStatus {
        StepStatus {
            price,
            trailing_average: average,
            position: self.position,
            total_value: self.ledger.total_value(price),
            cumulative_pnl: self.ledger.total_pnl(price),
            trade,
        }
    }

    fn evaluate_signal(&self, price: f64, average: f64) -> Signal {
        match self.position {
            PositionState::Flat if price < average => Signal::Enter,
            PositionState::Long if price > average => Signal::Exit,
            _ => Signal::Hold,
        }
    }

    fn enter_long(
        &mut self,
        observed_at: DateTime<Utc>,
        price: f64,
        average: f64,
    ) -> Result<Option<TradeRecord>, MeanrevError> {
        let available = self.ledger.cash();
        if available <= 0.0 {
            // Position flag has drifted from ledger truth; suppress rather
            // than let the ledger's overdraw check fire.
            return Ok(None);
        }

        let slippage = price * self.config.slippage_rate;
        let execution_price = price + slippage;
        let quantity = available / execution_price;

        self.ledger.buy(quantity, execution_price)?;
        self.position = PositionState::Long;

        let record = TradeRecord {
            executed_at: observed_at,
            side: Side::Buy,
            price: execution_price,
            quantity,
            slippage,
            total_value: self.ledger.total_value(price),
            realized_pnl: 0.0,
            cumulative_pnl: self.ledger.total_pnl(price),
            trailing_average: average,
        };
        self.trades.push(record.clone());
        Ok(Some(record))
    }

    fn exit_long(
        &mut self,
        observed_at: DateTime<Utc>,
        price: f64,
        average: f64,
    ) -> Result<Option<TradeRecord>, MeanrevError> {
        let quantity = self.ledger.position_quantity();
        if quantity <= 0.0 {
            return Ok(None);
        }

        let slippage = price * self.config.slippage_rate;
        let execution_price = price - slippage;

        // The sell below erases the cost basis, so realized P&L must be
        // computed first.
        let realized_pnl = (execution_price - self.ledger.cost_basis()) * quantity;

        self.ledger.sell(quantity, execution_price)?;
        self.position = PositionState::Flat;

        let record = TradeRecord {
            executed_at: observed_at,
            side: Side::Sell,
            price: execution_price,
            quantity,
            slippage,
            total_value: self.ledger.total_value(price),
            realized_pnl,
            cumulative_pnl: self.ledger.total_pnl(price),
            trailing_average: average,
        };
        self.trades.push(record.clone());
        Ok(Some(record))
    }
}
