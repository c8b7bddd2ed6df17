//! Domain error types.

/// Top-level error type for tradeloop.
#[derive(Debug, thiserror::Error)]
pub enum TradeLoopError {
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

    #[error("no data for {symbol}")]
    NoData { symbol: String },

    #[error("insufficient data for {symbol}: have {bars} bars, need {minimum}")]
    InsufficientData {
        symbol: String,
        bars: usize,
        minimum: usize,
    },

    #[error("data fetch failed for {symbol}: {reason}")]
    FetchFailed { symbol: String, reason: String },

    #[error("order transport error: {reason}")]
    Transport { reason: String },

    #[error("account query failed: {reason}")]
    Account { reason: String },

    #[error("notification failed: {reason}")]
    Notify { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl TradeLoopError {
    /// Whether the engine may keep ticking after this error.
    ///
    /// Everything the loop itself can produce is recoverable: data problems
    /// skip the symbol for one tick, transport problems are absorbed by the
    /// execution retry policy, notification problems are logged and dropped.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, TradeLoopError::Io(_))
    }
}

impl From<&TradeLoopError> for std::process::ExitCode {
    fn from(err: &TradeLoopError) -> Self {
        let code: u8 = match err {
            TradeLoopError::Io(_) => 1,
            TradeLoopError::ConfigParse { .. }
            | TradeLoopError::ConfigMissing { .. }
            | TradeLoopError::ConfigInvalid { .. } => 2,
            TradeLoopError::NoData { .. }
            | TradeLoopError::InsufficientData { .. }
            | TradeLoopError::FetchFailed { .. } => 3,
            TradeLoopError::Transport { .. } | TradeLoopError::Account { .. } => 4,
            TradeLoopError::Notify { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
