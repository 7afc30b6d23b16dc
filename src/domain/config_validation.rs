//! Configuration validation.
//!
//! Validates all simulation config fields before a run starts.

use crate::domain::error::MeanrevError;
use crate::ports::config_port::ConfigPort;

pub fn validate_simulation_config(config: &dyn ConfigPort) -> Result<(), MeanrevError> {
    validate_initial_cash(config)?;
    validate_ma_period(config)?;
    validate_slippage_rate(config)?;
    validate_risk_free_rate(config)?;
    Ok(())
}

fn validate_initial_cash(config: &dyn ConfigPort) -> Result<(), MeanrevError> {
    let value = config.get_double("simulation", "initial_cash", 0.0);
    if value <= 0.0 {
        return Err(MeanrevError::ConfigInvalid {
            section: "simulation".to_string(),
            key: "initial_cash".to_string(),
            reason: "initial_cash must be positive".to_string(),
        });
    }
    Ok(())
}

fn validate_ma_period(config: &dyn ConfigPort) -> Result<(), MeanrevError> {
    let value = config.get_int("simulation", "ma_period", 0);
    if value < 2 {
        return Err(MeanrevError::ConfigInvalid {
            section: "simulation".to_string(),
            key: "ma_period".to_string(),
            reason: "ma_period must be an integer of at least 2".to_string(),
        });
    }
    Ok(())
}

fn validate_slippage_rate(config: &dyn ConfigPort) -> Result<(), MeanrevError> {
    let value = config.get_double("simulation", "slippage_rate", 0.0);
    if value < 0.0 {
        return Err(MeanrevError::ConfigInvalid {
            section: "simulation".to_string(),
            key: "slippage_rate".to_string(),
            reason: "slippage_rate must be non-negative".to_string(),
        });
    }
    Ok(())
}

fn validate_risk_free_rate(config: &dyn ConfigPort) -> Result<(), MeanrevError> {
    let value = config.get_double("simulation", "risk_free_rate", 0.0);
    if value < 0.0 || value >= 1.0 {
        return Err(MeanrevError::ConfigInvalid {
            section: "simulation".to_string(),
            key: "risk_free_rate".to_string(),
            reason: "risk_free_rate must be between 0 and 1".to_string(),
        });
    }
    Ok(())
}
