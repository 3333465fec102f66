//! The rollup's EIP-1559 fee market.
//!
//! Each hardfork selects a [`FeeMarketLayer`]. A fee market is resolved by starting from the base
//! chain's parameters and applying every layer up to the selected one in fork order; a layer only
//! sets the coefficients it overrides. The base fee and blob fee formulas are the base chain's,
//! taken from `alloy-eips`.

use alloy_eips::{
    eip1559::{calc_next_block_base_fee, BaseFeeParams, INITIAL_BASE_FEE},
    eip4844::{calc_blob_gasprice, calc_excess_blob_gas},
};
use alloy_primitives::BlockNumber;
use serde::{Deserialize, Serialize};

use crate::{FeeMarketError, FeeMarketParams};

/// Override layers of the fee market, in fork order.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FeeMarketLayer {
    /// Rollup EIP-1559 coefficients (`eip1559denominator`, `eip1559elasticity`).
    London,
    /// Canyon base fee max change denominator (`eip1559denominatorcanyon`).
    Canyon,
    /// Blob gas pricing.
    Cancun,
}

impl FeeMarketLayer {
    /// Every layer up to and including `self`, in application order.
    pub const fn chain(self) -> &'static [Self] {
        match self {
            Self::London => &[Self::London],
            Self::Canyon => &[Self::London, Self::Canyon],
            Self::Cancun => &[Self::London, Self::Canyon, Self::Cancun],
        }
    }
}

/// When EIP-1559 starts and what base fee its first block carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LondonActivation {
    /// The first block with a base fee.
    pub block: BlockNumber,
    /// The base fee of that block.
    pub initial_base_fee: u64,
}

impl Default for LondonActivation {
    fn default() -> Self {
        Self { block: 0, initial_base_fee: INITIAL_BASE_FEE }
    }
}

/// Gas figures of a parent block consumed by the base fee formula.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ParentGas {
    /// Base fee of the parent block.
    pub base_fee: u64,
    /// Gas used by the parent block.
    pub gas_used: u64,
    /// Gas limit of the parent block.
    pub gas_limit: u64,
}

/// Blob gas pricing. Only present on fee markets that implement the data fee.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[non_exhaustive]
pub struct BlobFeeMarket;

impl BlobFeeMarket {
    /// Blob gas price for the given excess blob gas, per EIP-4844.
    pub fn blob_gas_price_per_gas(&self, excess_blob_gas: u64) -> u128 {
        calc_blob_gasprice(excess_blob_gas)
    }

    /// Excess blob gas of a block given its parent's excess and usage.
    pub fn next_excess_blob_gas(
        &self,
        parent_excess_blob_gas: u64,
        parent_blob_gas_used: u64,
    ) -> u64 {
        calc_excess_blob_gas(parent_excess_blob_gas, parent_blob_gas_used)
    }
}

/// A resolved fee market.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OpFeeMarket {
    layer: FeeMarketLayer,
    base_fee_max_change_denominator: u64,
    slack_coefficient: u64,
    london: LondonActivation,
    blob: Option<BlobFeeMarket>,
}

impl OpFeeMarket {
    /// Resolves the fee market of `layer`: the base chain's parameters with every layer up to
    /// `layer` applied in order.
    pub fn resolve(
        layer: FeeMarketLayer,
        params: &FeeMarketParams,
        london: LondonActivation,
    ) -> Self {
        let base = BaseFeeParams::ethereum();
        let mut market = Self {
            layer,
            base_fee_max_change_denominator: base.max_change_denominator as u64,
            slack_coefficient: base.elasticity_multiplier as u64,
            london,
            blob: None,
        };
        for layer in layer.chain() {
            match layer {
                FeeMarketLayer::London => {
                    market.base_fee_max_change_denominator = params.eip1559_denominator;
                    market.slack_coefficient = params.eip1559_elasticity;
                }
                FeeMarketLayer::Canyon => {
                    market.base_fee_max_change_denominator = params.eip1559_denominator_canyon;
                }
                FeeMarketLayer::Cancun => market.blob = Some(BlobFeeMarket),
            }
        }
        market
    }

    /// The topmost layer applied.
    pub const fn layer(&self) -> FeeMarketLayer {
        self.layer
    }

    /// Bound on the per-block base fee change, as a divisor.
    pub const fn base_fee_max_change_denominator(&self) -> u64 {
        self.base_fee_max_change_denominator
    }

    /// Ratio of the gas limit to the gas target (elasticity).
    pub const fn slack_coefficient(&self) -> u64 {
        self.slack_coefficient
    }

    /// The coefficients in `alloy-eips` form.
    pub const fn base_fee_params(&self) -> BaseFeeParams {
        BaseFeeParams::new(
            self.base_fee_max_change_denominator as u128,
            self.slack_coefficient as u128,
        )
    }

    /// Returns the London activation of the chain.
    pub const fn london(&self) -> LondonActivation {
        self.london
    }

    /// Base fee of the block following `parent`.
    ///
    /// Fails if the parent's gas figures are invalid for this fee market or if the base fee
    /// overflows; the result never wraps.
    pub fn next_block_base_fee(&self, parent: ParentGas) -> Result<u64, FeeMarketError> {
        if parent.gas_limit < self.slack_coefficient {
            return Err(FeeMarketError::GasLimitBelowElasticity {
                gas_limit: parent.gas_limit,
                elasticity: self.slack_coefficient,
            });
        }
        if parent.gas_used > parent.gas_limit {
            return Err(FeeMarketError::GasUsedExceedsLimit {
                gas_used: parent.gas_used,
                gas_limit: parent.gas_limit,
            });
        }

        // `calc_next_block_base_fee` adds the increase unchecked.
        let gas_target = parent.gas_limit / self.slack_coefficient;
        if parent.gas_used > gas_target {
            let overflow = FeeMarketError::BaseFeeOverflow { parent_base_fee: parent.base_fee };
            let delta = u128::from(parent.base_fee) * u128::from(parent.gas_used - gas_target) /
                (u128::from(gas_target) * u128::from(self.base_fee_max_change_denominator));
            let increase = u64::try_from(delta.max(1)).map_err(|_| overflow)?;
            parent.base_fee.checked_add(increase).ok_or(overflow)?;
        }

        Ok(calc_next_block_base_fee(
            parent.gas_used,
            parent.gas_limit,
            parent.base_fee,
            self.base_fee_params(),
        ))
    }

    /// Base fee of block `number`, the configured initial base fee at the London block.
    pub fn compute_base_fee(
        &self,
        number: BlockNumber,
        parent: ParentGas,
    ) -> Result<u64, FeeMarketError> {
        if number == self.london.block {
            return Ok(self.london.initial_base_fee);
        }
        self.next_block_base_fee(parent)
    }

    /// Returns `true` if the fee market prices blob gas.
    pub const fn implements_data_fee(&self) -> bool {
        self.blob.is_some()
    }

    /// The blob gas pricing, absent before blob support.
    pub const fn blob_fee_market(&self) -> Option<BlobFeeMarket> {
        self.blob
    }
}
