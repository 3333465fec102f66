use alloy_primitives::{hex::FromHexError, BlockNumber, BlockTimestamp};
use op_rules::{ConfigError, DepositDecodeError, FeeMarketError};

/// Error types for the `op-rules` commands
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Failed to read a file or stdin
    #[error("Failed to read input: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid hex string
    #[error("Invalid hex string: {0}")]
    InvalidHex(#[from] FromHexError),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Malformed JSON, or output that could not be serialized
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid chain configuration
    #[error("Invalid chain configuration: {0}")]
    Config(#[from] ConfigError),

    /// Malformed deposit transaction
    #[error("Invalid deposit transaction: {0}")]
    Deposit(#[from] DepositDecodeError),

    /// Parent block gas the base fee cannot be computed from
    #[error("Invalid parent block: {0}")]
    FeeMarket(#[from] FeeMarketError),

    /// No hardfork is active at the requested block
    #[error("No hardfork active at block {number} (timestamp {timestamp})")]
    NoActiveFork {
        /// Block number
        number: BlockNumber,
        /// Block timestamp
        timestamp: BlockTimestamp,
    },

    /// Failed to install the log subscriber
    #[error("Failed to initialize logging: {0}")]
    Logging(String),
}

/// Result type for the `op-rules` commands
pub type Result<T> = std::result::Result<T, CliError>;
