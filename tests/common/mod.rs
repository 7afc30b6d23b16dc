//! Shared fixtures for integration tests.

use std::collections::HashMap;

use chrono::{DateTime, TimeZone, Utc};

use meanrev::domain::engine::EngineConfig;
use meanrev::domain::error::MeanrevError;
use meanrev::ports::config_port::ConfigPort;
use meanrev::ports::price_port::PricePort;

/// Fixed timestamp so replays compare equal across runs.
pub fn ts() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
}

pub fn small_config() -> EngineConfig {
    EngineConfig {
        initial_cash: 1_000.0,
        ma_period: 3,
        slippage_rate: 0.0,
    }
}

/// In-memory price source for driving replays without files.
pub struct MockPriceFeed {
    prices: std::vec::IntoIter<f64>,
}

impl MockPriceFeed {
    pub fn new(prices: &[f64]) -> Self {
        MockPriceFeed {
            prices: prices.to_vec().into_iter(),
        }
    }
}

impl PricePort for MockPriceFeed {
    fn next_price(&mut self) -> Result<Option<f64>, MeanrevError> {
        Ok(self.prices.next())
    }
}

/// In-memory configuration keyed by "section.key".
pub struct MockConfigAdapter {
    values: HashMap<String, String>,
}

impl MockConfigAdapter {
    pub fn new(entries: &[(&str, &str, &str)]) -> Self {
        let values = entries
            .iter()
            .map(|(section, key, value)| (format!("{section}.{key}"), value.to_string()))
            .collect();
        MockConfigAdapter { values }
    }
}

impl ConfigPort for MockConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.values.get(&format!("{section}.{key}")).cloned()
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.get_string(section, key)
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
        self.get_string(section, key)
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.get_string(section, key)
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }
}
