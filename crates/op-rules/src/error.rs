use crate::{ActivationKind, OpHardforkId};

/// Errors raised while turning a genesis configuration into protocol rules.
///
/// These are fatal: a chain cannot run with an invalid configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A later hardfork activates before an earlier one.
    #[error(
        "hardfork {later} activates at {later_at} before {earlier} which activates at {earlier_at}"
    )]
    HardforkOrdering {
        /// The earlier hardfork in fork order.
        earlier: OpHardforkId,
        /// Activation threshold of the earlier hardfork.
        earlier_at: u64,
        /// The later hardfork in fork order.
        later: OpHardforkId,
        /// Activation threshold of the later hardfork.
        later_at: u64,
    },
    /// A hardfork was given an activation on an axis it is not keyed on.
    #[error("hardfork {fork} must be activated by {expected}")]
    WrongActivationAxis {
        /// The misconfigured hardfork.
        fork: OpHardforkId,
        /// The axis the hardfork is keyed on.
        expected: ActivationKind,
    },
    /// A rollup-specific value was requested from a configuration that is not a rollup
    /// configuration.
    #[error("config options must be rollup genesis config options")]
    NotOptimismConfig,
    /// A fee market coefficient resolved to zero.
    #[error("fee market parameter {name} must be non-zero")]
    ZeroFeeMarketParam {
        /// Genesis key of the parameter.
        name: &'static str,
    },
    /// No rules bundle is defined for the requested hardfork.
    #[error("no protocol spec for hardfork {0}")]
    MissingProtocolSpec(OpHardforkId),
}

/// Errors raised while computing a base fee from a parent block.
///
/// The parent's header is invalid for the fee market, or the next base fee does not fit in a
/// `u64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FeeMarketError {
    /// The parent gas limit is below the elasticity, which leaves a zero gas target.
    #[error("parent gas limit {gas_limit} is below the elasticity multiplier {elasticity}")]
    GasLimitBelowElasticity {
        /// Gas limit of the parent block.
        gas_limit: u64,
        /// Elasticity multiplier of the fee market.
        elasticity: u64,
    },
    /// The parent used more gas than its limit.
    #[error("parent gas used {gas_used} exceeds its gas limit {gas_limit}")]
    GasUsedExceedsLimit {
        /// Gas used by the parent block.
        gas_used: u64,
        /// Gas limit of the parent block.
        gas_limit: u64,
    },
    /// The next base fee overflows `u64`.
    #[error("base fee overflows after parent base fee {parent_base_fee}")]
    BaseFeeOverflow {
        /// Base fee of the parent block.
        parent_base_fee: u64,
    },
}

/// Errors raised while decoding a deposit transaction.
///
/// The containing block or transaction must be rejected by the caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DepositDecodeError {
    /// The outer framing is not an RLP list.
    #[error("deposit transaction must be an RLP list")]
    NotAList,
    /// A fixed-size field has the wrong length.
    #[error("deposit field {field} has invalid length: expected={expected}, got={got}")]
    InvalidFieldLength {
        /// Name of the field.
        field: &'static str,
        /// Expected length in bytes.
        expected: usize,
        /// Actual length in bytes.
        got: usize,
    },
    /// The list holds more fields than a deposit transaction has.
    #[error("deposit transaction list has trailing fields")]
    TrailingFields,
    /// Bytes remain after the deposit transaction list.
    #[error("{0} trailing bytes after deposit transaction")]
    TrailingBytes(usize),
    /// The envelope does not carry the deposit transaction type.
    #[error("unexpected transaction type: {0:#04x}")]
    UnexpectedType(u8),
    /// The underlying RLP is malformed.
    #[error("malformed RLP: {0}")]
    Rlp(#[from] alloy_rlp::Error),
}

impl From<DepositDecodeError> for alloy_rlp::Error {
    fn from(err: DepositDecodeError) -> Self {
        match err {
            DepositDecodeError::Rlp(err) => err,
            DepositDecodeError::NotAList => Self::UnexpectedString,
            DepositDecodeError::InvalidFieldLength { .. } => Self::UnexpectedLength,
            DepositDecodeError::TrailingFields => Self::Custom("trailing fields"),
            DepositDecodeError::TrailingBytes(_) => Self::Custom("trailing bytes"),
            DepositDecodeError::UnexpectedType(_) => Self::Custom("unexpected transaction type"),
        }
    }
}
