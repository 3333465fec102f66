use core::fmt::Debug;

use serde::{Deserialize, Serialize};

use crate::{
    constants::fee_market::{
        DEFAULT_EIP1559_DENOMINATOR, DEFAULT_EIP1559_DENOMINATOR_CANYON,
        DEFAULT_EIP1559_ELASTICITY,
    },
    ConfigError, HardforkSchedule,
};

/// Rollup section of the genesis configuration.
///
/// Every value is optional here; [`FeeMarketParams::resolve`] turns it into concrete values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimismConfig {
    /// Elasticity multiplier of the EIP-1559 fee market.
    #[serde(
        default,
        rename = "eip1559elasticity",
        alias = "eip1559Elasticity",
        skip_serializing_if = "Option::is_none"
    )]
    pub eip1559_elasticity: Option<u64>,
    /// Base fee max change denominator before Canyon.
    #[serde(
        default,
        rename = "eip1559denominator",
        alias = "eip1559Denominator",
        skip_serializing_if = "Option::is_none"
    )]
    pub eip1559_denominator: Option<u64>,
    /// Base fee max change denominator from Canyon on.
    #[serde(
        default,
        rename = "eip1559denominatorcanyon",
        alias = "eip1559DenominatorCanyon",
        skip_serializing_if = "Option::is_none"
    )]
    pub eip1559_denominator_canyon: Option<u64>,
}

/// Fee market coefficients with every default applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeMarketParams {
    /// Base fee max change denominator before Canyon.
    pub eip1559_denominator: u64,
    /// Base fee max change denominator from Canyon on.
    pub eip1559_denominator_canyon: u64,
    /// Elasticity multiplier.
    pub eip1559_elasticity: u64,
}

impl Default for FeeMarketParams {
    fn default() -> Self {
        Self {
            eip1559_denominator: DEFAULT_EIP1559_DENOMINATOR,
            eip1559_denominator_canyon: DEFAULT_EIP1559_DENOMINATOR_CANYON,
            eip1559_elasticity: DEFAULT_EIP1559_ELASTICITY,
        }
    }
}

impl FeeMarketParams {
    /// Resolves the optional genesis values, falling back to the defaults.
    ///
    /// A coefficient resolving to zero is rejected since the base fee formula divides by it.
    pub fn resolve(config: Option<&OptimismConfig>) -> Result<Self, ConfigError> {
        let config = config.copied().unwrap_or_default();
        let params = Self {
            eip1559_denominator: config.eip1559_denominator.unwrap_or(DEFAULT_EIP1559_DENOMINATOR),
            eip1559_denominator_canyon: config
                .eip1559_denominator_canyon
                .unwrap_or(DEFAULT_EIP1559_DENOMINATOR_CANYON),
            eip1559_elasticity: config.eip1559_elasticity.unwrap_or(DEFAULT_EIP1559_ELASTICITY),
        };
        for (name, value) in [
            ("eip1559denominator", params.eip1559_denominator),
            ("eip1559denominatorcanyon", params.eip1559_denominator_canyon),
            ("eip1559elasticity", params.eip1559_elasticity),
        ] {
            if value == 0 {
                return Err(ConfigError::ZeroFeeMarketParam { name });
            }
        }
        Ok(params)
    }
}

/// Genesis configuration of a rollup chain.
///
/// Bedrock is keyed on block number, every later hardfork on block timestamp. An absent
/// threshold means the hardfork never activates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpGenesisConfig {
    /// Chain id.
    #[serde(default, alias = "chainid", skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<u64>,
    /// Block at which EIP-1559 activates.
    #[serde(default, alias = "londonblock", skip_serializing_if = "Option::is_none")]
    pub london_block: Option<u64>,
    /// Base fee of the London block.
    #[serde(default, alias = "basefeepergas", skip_serializing_if = "Option::is_none")]
    pub base_fee_per_gas: Option<u64>,
    /// Bedrock activation block.
    #[serde(default, alias = "bedrockblock", skip_serializing_if = "Option::is_none")]
    pub bedrock_block: Option<u64>,
    /// Regolith activation timestamp.
    #[serde(default, alias = "regolithtime", skip_serializing_if = "Option::is_none")]
    pub regolith_time: Option<u64>,
    /// Canyon activation timestamp.
    #[serde(default, alias = "canyontime", skip_serializing_if = "Option::is_none")]
    pub canyon_time: Option<u64>,
    /// Delta activation timestamp.
    #[serde(default, alias = "deltatime", skip_serializing_if = "Option::is_none")]
    pub delta_time: Option<u64>,
    /// Ecotone activation timestamp.
    #[serde(default, alias = "ecotonetime", skip_serializing_if = "Option::is_none")]
    pub ecotone_time: Option<u64>,
    /// Fjord activation timestamp.
    #[serde(default, alias = "fjordtime", skip_serializing_if = "Option::is_none")]
    pub fjord_time: Option<u64>,
    /// Granite activation timestamp.
    #[serde(default, alias = "granitetime", skip_serializing_if = "Option::is_none")]
    pub granite_time: Option<u64>,
    /// Holocene activation timestamp.
    #[serde(default, alias = "holocenetime", skip_serializing_if = "Option::is_none")]
    pub holocene_time: Option<u64>,
    /// Interop activation timestamp.
    #[serde(default, alias = "interoptime", skip_serializing_if = "Option::is_none")]
    pub interop_time: Option<u64>,
    /// Rollup fee market section.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optimism: Option<OptimismConfig>,
}

impl OpGenesisConfig {
    /// Resolves the fee market coefficients of this configuration.
    pub fn fee_market_params(&self) -> Result<FeeMarketParams, ConfigError> {
        FeeMarketParams::resolve(self.optimism.as_ref())
    }

    /// Builds and validates the hardfork schedule of this configuration.
    pub fn hardfork_schedule(&self) -> Result<HardforkSchedule, ConfigError> {
        HardforkSchedule::from_genesis(self)
    }
}

/// Read-only view over a chain's genesis configuration.
///
/// Only rollup configurations expose rollup-specific values through [`Self::as_optimism`].
pub trait GenesisConfigOptions: Debug + Send + Sync {
    /// Chain id, if configured.
    fn chain_id(&self) -> Option<u64>;

    /// Block at which EIP-1559 activates, if configured.
    fn london_block(&self) -> Option<u64>;

    /// Base fee of the London block, if configured.
    fn base_fee_per_gas(&self) -> Option<u64>;

    /// Returns the rollup configuration, or `None` if this is not a rollup configuration.
    fn as_optimism(&self) -> Option<&OpGenesisConfig> {
        None
    }

    /// Returns the rollup configuration or fails with [`ConfigError::NotOptimismConfig`].
    fn try_as_optimism(&self) -> Result<&OpGenesisConfig, ConfigError> {
        self.as_optimism().ok_or(ConfigError::NotOptimismConfig)
    }
}

impl GenesisConfigOptions for OpGenesisConfig {
    fn chain_id(&self) -> Option<u64> {
        self.chain_id
    }

    fn london_block(&self) -> Option<u64> {
        self.london_block
    }

    fn base_fee_per_gas(&self) -> Option<u64> {
        self.base_fee_per_gas
    }

    fn as_optimism(&self) -> Option<&OpGenesisConfig> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fee_market_defaults() {
        assert_eq!(FeeMarketParams::resolve(None), Ok(FeeMarketParams::default()));
        let params = FeeMarketParams::resolve(Some(&OptimismConfig::default())).unwrap();
        assert_eq!(params.eip1559_denominator, 50);
        assert_eq!(params.eip1559_denominator_canyon, 250);
        assert_eq!(params.eip1559_elasticity, 6);
    }

    #[test]
    fn test_fee_market_overrides() {
        let config = OptimismConfig {
            eip1559_elasticity: Some(10),
            eip1559_denominator: None,
            eip1559_denominator_canyon: Some(100),
        };
        let params = FeeMarketParams::resolve(Some(&config)).unwrap();
        assert_eq!(params.eip1559_denominator, 50);
        assert_eq!(params.eip1559_denominator_canyon, 100);
        assert_eq!(params.eip1559_elasticity, 10);
    }

    #[test]
    fn test_fee_market_zero_rejected() {
        let config = OptimismConfig { eip1559_elasticity: Some(0), ..Default::default() };
        assert_eq!(
            FeeMarketParams::resolve(Some(&config)),
            Err(ConfigError::ZeroFeeMarketParam { name: "eip1559elasticity" })
        );
    }

    #[test]
    fn test_deserialize_genesis() {
        let json = r#"{
            "chainId": 901,
            "londonBlock": 0,
            "bedrockBlock": 0,
            "regolithTime": 0,
            "canyontime": 1700000000,
            "optimism": {
                "eip1559elasticity": 6,
                "eip1559denominator": 50,
                "eip1559denominatorcanyon": 250
            }
        }"#;
        let config: OpGenesisConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.chain_id, Some(901));
        assert_eq!(config.canyon_time, Some(1_700_000_000));
        assert_eq!(config.ecotone_time, None);
        assert_eq!(config.fee_market_params().unwrap(), FeeMarketParams::default());
        assert_eq!(config.try_as_optimism().unwrap(), &config);
    }
}
