//! Thread-safe single-writer owner of the strategy engine.
//!
//! The engine itself assumes at most one in-flight step. Embeddings that
//! poll prices on a background thread while a foreground reporter reads
//! status go through this handle: `submit_price` and `read_status` each
//! hold the lock for exactly one call.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};

use crate::domain::engine::{EngineConfig, StrategyEngine};
use crate::domain::error::MeanrevError;
use crate::domain::ledger::LedgerSummary;
use crate::domain::stats::SessionStats;
use crate::domain::trade::{StepStatus, TradeRecord};

#[derive(Clone)]
pub struct SharedSession {
    inner: Arc<Mutex<StrategyEngine>>,
}

impl SharedSession {
    pub fn new(config: EngineConfig) -> Result<Self, MeanrevError> {
        let engine = StrategyEngine::new(config)?;
        Ok(SharedSession {
            inner: Arc::new(Mutex::new(engine)),
        })
    }

    fn lock(&self) -> MutexGuard<'_, StrategyEngine> {
        // A panicked writer cannot leave a half-applied step: the engine
        // mutates the ledger exactly once per step, after all checks.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Run one strategy step. Serialized with all other session calls.
    pub fn submit_price(
        &self,
        observed_at: DateTime<Utc>,
        price: f64,
    ) -> Result<StepStatus, MeanrevError> {
        self.lock().step(observed_at, price)
    }

    /// Status snapshot for the latest observation; `None` before any price
    /// has been submitted.
    pub fn read_status(&self) -> Option<StepStatus> {
        self.lock().status()
    }

    /// Discard the engine and ledger and start a fresh run.
    pub fn restart(&self, config: EngineConfig) -> Result<(), MeanrevError> {
        let engine = StrategyEngine::new(config)?;
        *self.lock() = engine;
        Ok(())
    }

    pub fn trades(&self) -> Vec<TradeRecord> {
        self.lock().trades().to_vec()
    }

    pub fn session_stats(&self, risk_free_rate: f64) -> SessionStats {
        let guard = self.lock();
        SessionStats::compute(guard.trades(), risk_free_rate)
    }

    /// Ledger valuation at the latest observed price; `None` before any
    /// observation.
    pub fn ledger_summary(&self) -> Option<LedgerSummary> {
        let guard = self.lock();
        let price = guard.status()?.price;
        Some(guard.ledger().summary(price))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::trade::PositionState;
    use chrono::TimeZone;

    fn ts() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn session() -> SharedSession {
        SharedSession::new(EngineConfig {
            initial_cash: 1_000.0,
            ma_period: 3,
            slippage_rate: 0.0,
        })
        .unwrap()
    }

    #[test]
    fn read_status_before_any_price() {
        assert!(session().read_status().is_none());
    }

    #[test]
    fn submit_then_read() {
        let session = session();
        for price in [10.0, 9.0, 8.0] {
            session.submit_price(ts(), price).unwrap();
        }

        let status = session.read_status().unwrap();
        assert_eq!(status.position, PositionState::Long);
        assert!((status.price - 8.0).abs() < f64::EPSILON);
        assert_eq!(session.trades().len(), 1);
    }

    #[test]
    fn restart_discards_state() {
        let session = session();
        for price in [10.0, 9.0, 8.0] {
            session.submit_price(ts(), price).unwrap();
        }
        assert_eq!(session.trades().len(), 1);

        session
            .restart(EngineConfig {
                initial_cash: 5_000.0,
                ma_period: 4,
                slippage_rate: 0.0,
            })
            .unwrap();

        assert!(session.read_status().is_none());
        assert!(session.trades().is_empty());
        assert!(session.ledger_summary().is_none());
    }

    #[test]
    fn restart_rejects_invalid_config() {
        let session = session();
        let result = session.restart(EngineConfig {
            initial_cash: -1.0,
            ma_period: 3,
            slippage_rate: 0.0,
        });
        assert!(matches!(
            result,
            Err(MeanrevError::InvalidConfiguration { .. })
        ));
        // Old engine survives a failed restart
        session.submit_price(ts(), 10.0).unwrap();
        assert!(session.read_status().is_some());
    }

    #[test]
    fn ledger_summary_uses_latest_price() {
        let session = session();
        for price in [10.0, 9.0, 8.0, 7.0] {
            session.submit_price(ts(), price).unwrap();
        }

        let summary = session.ledger_summary().unwrap();
        assert!((summary.current_price - 7.0).abs() < f64::EPSILON);
        assert!((summary.unrealized_pnl - (-125.0)).abs() < 1e-9);
    }

    #[test]
    fn clones_share_one_engine() {
        let session = session();
        let writer = session.clone();
        let reader = session.clone();

        let handle = std::thread::spawn(move || {
            for price in [10.0, 9.0, 8.0] {
                writer.submit_price(ts(), price).unwrap();
            }
        });
        handle.join().unwrap();

        let status = reader.read_status().unwrap();
        assert_eq!(status.position, PositionState::Long);
    }
}
