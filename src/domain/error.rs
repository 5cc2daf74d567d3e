//! Domain error types.

/// Top-level error type for stockscope.
///
/// Only the edges of the system (file adapters, config, series construction)
/// produce these. The evaluation core itself never returns an error to its
/// caller.
#[derive(Debug, thiserror::Error)]
pub enum StockscopeError {
    #[error("csv error in {file}: {reason}")]
    Csv { file: String, reason: String },

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

    #[error("invalid price series: {reason}")]
    InvalidSeries { reason: String },

    #[error("no price data for {code}")]
    NoData { code: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl StockscopeError {
    /// Process exit status for this error family.
    pub fn exit_status(&self) -> u8 {
        match self {
            StockscopeError::Io(_) => 1,
            StockscopeError::ConfigParse { .. }
            | StockscopeError::ConfigMissing { .. }
            | StockscopeError::ConfigInvalid { .. } => 2,
            StockscopeError::Csv { .. } | StockscopeError::InvalidSeries { .. } => 3,
            StockscopeError::NoData { .. } => 5,
        }
    }
}

impl From<&StockscopeError> for std::process::ExitCode {
    fn from(err: &StockscopeError) -> Self {
        std::process::ExitCode::from(err.exit_status())
    }
}

/// A fault raised inside a single indicator, scorer or fusion step.
///
/// Never crosses the evaluation boundary: [`crate::domain::analysis::guarded`]
/// turns it into an ERROR-tagged result.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnalysisError {
    #[error("{indicator} needs at least {minimum} bars, have {bars}")]
    InsufficientData {
        indicator: String,
        bars: usize,
        minimum: usize,
    },

    #[error("degenerate input: {reason}")]
    Degenerate { reason: String },

    #[error("computation failed: {reason}")]
    Computation { reason: String },
}
