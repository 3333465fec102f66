//! Deposit-aware transaction validation.
//!
//! [`OpTransactionValidator`] wraps the chain's standard validator. Deposits bypass every standard
//! check; only the system transaction gate applies to them. Every other transaction type is handed
//! to the standard validator unchanged.

use alloc::sync::Arc;

use alloy_primitives::{Address, BlockTimestamp};
use auto_impl::auto_impl;
use bitflags::bitflags;
use tracing::trace;

use crate::{HardforkSchedule, OpTxType, TxDeposit};

/// Transaction view needed by the deposit-aware validator.
#[auto_impl(&, Box, Arc)]
pub trait OpTxTr {
    /// Type of the transaction.
    fn tx_type(&self) -> OpTxType;

    /// Sender of the transaction.
    fn sender(&self) -> Address;

    /// Whether the transaction is a system transaction. Always `false` for non-deposits.
    fn is_system_transaction(&self) -> bool;

    /// Returns `true` if the transaction is a deposit.
    fn is_deposit(&self) -> bool {
        self.tx_type().is_deposit()
    }
}

impl OpTxTr for TxDeposit {
    fn tx_type(&self) -> OpTxType {
        OpTxType::Deposit
    }

    fn sender(&self) -> Address {
        self.from
    }

    fn is_system_transaction(&self) -> bool {
        self.is_system_transaction
    }
}

/// Options relaxing sender-side checks, e.g. for transaction pool admission.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ValidationParams {
    /// Accept a nonce above the account nonce.
    pub allow_future_nonce: bool,
    /// Accept a transaction whose upfront cost exceeds the sender balance.
    pub allow_exceeding_balance: bool,
}

/// Block the transaction is validated against.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ValidationContext {
    /// Timestamp of the block.
    pub block_timestamp: BlockTimestamp,
    /// Base fee of the block, if EIP-1559 is active.
    pub base_fee: Option<u64>,
    /// Blob gas price of the block, if blob gas is priced.
    pub blob_fee: Option<u128>,
    /// Sender-side options.
    pub params: ValidationParams,
}

/// A transaction validator. The chain's standard validator implements this for the transaction
/// types it understands.
pub trait TransactionValidator<Tx> {
    /// Sender account state consulted by [`Self::validate_for_sender`].
    type Account;
    /// Rejection reason.
    type Error;

    /// Stateless validation of `tx` in the given block.
    fn validate(&self, tx: &Tx, ctx: &ValidationContext) -> Result<(), Self::Error>;

    /// Validation of `tx` against its sender's account, `None` if the account does not exist.
    fn validate_for_sender(
        &self,
        tx: &Tx,
        account: Option<&Self::Account>,
        params: &ValidationParams,
    ) -> Result<(), Self::Error>;
}

/// Rejection reported by the [`OpTransactionValidator`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OpTransactionError<E> {
    /// Rejected by the standard validator.
    #[error("{0}")]
    Base(E),
    /// System deposits are not allowed once Regolith is active.
    #[error("system tx not supported: address = {sender}")]
    DepositSystemTxPostRegolith {
        /// Sender of the rejected deposit.
        sender: Address,
    },
}

impl<E> OpTransactionError<E> {
    /// Returns the sender carried by a rollup-specific rejection.
    pub const fn sender(&self) -> Option<Address> {
        match self {
            Self::Base(_) => None,
            Self::DepositSystemTxPostRegolith { sender } => Some(*sender),
        }
    }

    /// Returns the standard validator's rejection, if that is what this is.
    pub const fn as_base(&self) -> Option<&E> {
        match self {
            Self::Base(err) => Some(err),
            Self::DepositSystemTxPostRegolith { .. } => None,
        }
    }
}

/// Validator applying the rollup's deposit rules on top of a standard validator `V`.
#[derive(Debug, Clone)]
pub struct OpTransactionValidator<V> {
    schedule: Arc<HardforkSchedule>,
    inner: V,
}

impl<V> OpTransactionValidator<V> {
    /// Wraps `inner` with the rollup's deposit rules.
    pub const fn new(schedule: Arc<HardforkSchedule>, inner: V) -> Self {
        Self { schedule, inner }
    }

    /// The standard validator.
    pub const fn inner(&self) -> &V {
        &self.inner
    }

    /// The hardfork schedule the system transaction gate is evaluated against.
    pub fn schedule(&self) -> &HardforkSchedule {
        &self.schedule
    }
}

impl<Tx, V> TransactionValidator<Tx> for OpTransactionValidator<V>
where
    Tx: OpTxTr,
    V: TransactionValidator<Tx>,
{
    type Account = V::Account;
    type Error = OpTransactionError<V::Error>;

    fn validate(&self, tx: &Tx, ctx: &ValidationContext) -> Result<(), Self::Error> {
        if !tx.is_deposit() {
            return self.inner.validate(tx, ctx).map_err(OpTransactionError::Base);
        }
        if tx.is_system_transaction() && self.schedule.is_regolith(ctx.block_timestamp) {
            let sender = tx.sender();
            trace!(
                target: "op_rules::validator",
                %sender,
                timestamp = ctx.block_timestamp,
                "Rejected system deposit"
            );
            return Err(OpTransactionError::DepositSystemTxPostRegolith { sender });
        }
        Ok(())
    }

    fn validate_for_sender(
        &self,
        tx: &Tx,
        account: Option<&Self::Account>,
        params: &ValidationParams,
    ) -> Result<(), Self::Error> {
        if tx.is_deposit() {
            return Ok(());
        }
        self.inner.validate_for_sender(tx, account, params).map_err(OpTransactionError::Base)
    }
}

bitflags! {
    /// Set of transaction types a validator accepts.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct AcceptedTxTypes: u8 {
        /// Legacy transactions.
        const LEGACY = 1 << 0;
        /// EIP-2930 transactions.
        const EIP2930 = 1 << 1;
        /// EIP-1559 transactions.
        const EIP1559 = 1 << 2;
        /// EIP-4844 transactions.
        const EIP4844 = 1 << 3;
        /// EIP-7702 transactions.
        const EIP7702 = 1 << 4;
        /// Deposit transactions.
        const DEPOSIT = 1 << 5;
    }
}

impl AcceptedTxTypes {
    /// Types accepted by the rollup from Bedrock on. Blob transactions are never accepted.
    pub const ROLLUP: Self = Self::LEGACY
        .union(Self::EIP2930)
        .union(Self::EIP1559)
        .union(Self::DEPOSIT);

    /// Returns `true` if `ty` is in the set.
    pub const fn accepts(self, ty: OpTxType) -> bool {
        let flag = match ty {
            OpTxType::Legacy => Self::LEGACY,
            OpTxType::Eip2930 => Self::EIP2930,
            OpTxType::Eip1559 => Self::EIP1559,
            OpTxType::Eip4844 => Self::EIP4844,
            OpTxType::Eip7702 => Self::EIP7702,
            OpTxType::Deposit => Self::DEPOSIT,
        };
        self.contains(flag)
    }
}

/// Configuration handed to the standard validator of a rules bundle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ValidatorConfig {
    /// Accepted transaction types.
    pub accepted_types: AcceptedTxTypes,
    /// Reject signatures with a high `s` value (EIP-2).
    pub check_signature_malleability: bool,
    /// Chain id transactions must be signed for.
    pub chain_id: Option<u64>,
    /// EIP-3860 initcode size limit, if enforced.
    pub max_initcode_size: Option<usize>,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            accepted_types: AcceptedTxTypes::ROLLUP,
            check_signature_malleability: true,
            chain_id: None,
            max_initcode_size: None,
        }
    }
}

/// Builds [`OpTransactionValidator`]s sharing one hardfork schedule and configuration.
#[derive(Debug, Clone)]
pub struct OpTransactionValidatorFactory {
    schedule: Arc<HardforkSchedule>,
    config: ValidatorConfig,
}

impl OpTransactionValidatorFactory {
    /// Creates a new factory.
    pub const fn new(schedule: Arc<HardforkSchedule>, config: ValidatorConfig) -> Self {
        Self { schedule, config }
    }

    /// Configuration for the standard validator.
    pub const fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Returns a copy of the factory with a different configuration.
    pub fn with_config(&self, config: ValidatorConfig) -> Self {
        Self { schedule: self.schedule.clone(), config }
    }

    /// Wraps an already built standard validator.
    pub fn wrap<V>(&self, inner: V) -> OpTransactionValidator<V> {
        OpTransactionValidator::new(self.schedule.clone(), inner)
    }

    /// Builds the standard validator from this factory's configuration and wraps it.
    pub fn build<V, F>(&self, build_inner: F) -> OpTransactionValidator<V>
    where
        F: FnOnce(&ValidatorConfig) -> V,
    {
        self.wrap(build_inner(&self.config))
    }
}
