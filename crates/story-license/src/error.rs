use thiserror::Error;

/// Errors returned by license purchase operations.
#[derive(Debug, Error)]
pub enum LicenseError {
    /// Bad input detected before anything is sent (missing wallet, bad address, ...).
    #[error("validation error: {0}")]
    ValidationError(String),

    /// The bridge aggregator returned a non-success status or a malformed body.
    #[error("upstream error: {0}")]
    UpstreamError(String),

    /// No wallet connected, or the wallet/node refused the transaction.
    #[error("wallet error: {0}")]
    WalletError(String),

    /// The destination transaction never showed up within the polling budget.
    #[error("destination resolution timed out after {attempts} attempts")]
    ResolutionTimeout { attempts: usize },

    #[error("chain error: {0}")]
    ChainError(String),

    #[error("config error: {0}")]
    ConfigError(String),

    #[error("serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}
