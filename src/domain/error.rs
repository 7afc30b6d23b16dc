//! Domain error types.

/// Top-level error type for meanrev.
#[derive(Debug, thiserror::Error)]
pub enum MeanrevError {
    #[error("insufficient funds: have {available:.2}, need {required:.2}")]
    InsufficientFunds { available: f64, required: f64 },

    #[error("insufficient position: hold {held:.6}, asked to sell {requested:.6}")]
    InsufficientPosition { held: f64, requested: f64 },

    #[error("invalid order: {reason}")]
    InvalidOrder { reason: String },

    #[error("invalid configuration: {parameter}: {reason}")]
    InvalidConfiguration { parameter: String, reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("price feed error: {reason}")]
    PriceFeed { reason: String },

    #[error("trade log error: {reason}")]
    TradeLog { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&MeanrevError> for std::process::ExitCode {
    fn from(err: &MeanrevError) -> Self {
        let code: u8 = match err {
            MeanrevError::Io(_) => 1,
            MeanrevError::ConfigParse { .. }
            | MeanrevError::ConfigMissing { .. }
            | MeanrevError::ConfigInvalid { .. }
            | MeanrevError::InvalidConfiguration { .. } => 2,
            MeanrevError::PriceFeed { .. } | MeanrevError::TradeLog { .. } => 3,
            MeanrevError::InsufficientFunds { .. }
            | MeanrevError::InsufficientPosition { .. }
            | MeanrevError::InvalidOrder { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}
