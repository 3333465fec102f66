//! Rules bundle selection from a genesis configuration.

use op_rules::{
    ConfigError, FeeMarketError, FeeMarketLayer, GenesisConfigOptions, OpGenesisConfig,
    OpHardforkId, OpSpecId, ParentGas, ProtocolSchedule,
};
use rstest::rstest;

const GENESIS: &str = r#"{
    "chainId": 10,
    "londonBlock": 0,
    "baseFeePerGas": 1000000000,
    "bedrockBlock": 0,
    "regolithTime": 0,
    "canyonTime": 100,
    "deltaTime": 200,
    "ecotoneTime": 300,
    "fjordTime": 400,
    "graniteTime": 500,
    "holoceneTime": 600
}"#;

/// A configuration of a chain that is not a rollup.
#[derive(Debug)]
struct MainnetConfig;

impl GenesisConfigOptions for MainnetConfig {
    fn chain_id(&self) -> Option<u64> {
        Some(1)
    }

    fn london_block(&self) -> Option<u64> {
        Some(12_965_000)
    }

    fn base_fee_per_gas(&self) -> Option<u64> {
        None
    }
}

fn genesis() -> OpGenesisConfig {
    serde_json::from_str(GENESIS).unwrap()
}

#[test]
fn test_rejects_non_rollup_config() {
    assert_eq!(ProtocolSchedule::new(&MainnetConfig).unwrap_err(), ConfigError::NotOptimismConfig);
}

#[test]
fn test_rejects_misordered_schedule() {
    let config = OpGenesisConfig { ecotone_time: Some(50), ..genesis() };
    assert!(matches!(
        ProtocolSchedule::new(&config),
        Err(ConfigError::HardforkOrdering { .. })
    ));
}

#[rstest]
#[case::regolith(0, OpHardforkId::REGOLITH, OpSpecId::REGOLITH)]
#[case::canyon(150, OpHardforkId::CANYON, OpSpecId::CANYON)]
#[case::delta(250, OpHardforkId::DELTA, OpSpecId::CANYON)]
#[case::ecotone(300, OpHardforkId::ECOTONE, OpSpecId::ECOTONE)]
#[case::fjord(450, OpHardforkId::FJORD, OpSpecId::FJORD)]
#[case::granite(599, OpHardforkId::GRANITE, OpSpecId::GRANITE)]
#[case::holocene(u64::MAX, OpHardforkId::HOLOCENE, OpSpecId::HOLOCENE)]
fn test_spec_at(#[case] timestamp: u64, #[case] fork: OpHardforkId, #[case] evm: OpSpecId) {
    let protocol = ProtocolSchedule::new(&genesis()).unwrap();
    let spec = protocol.spec_at(1, timestamp).unwrap();
    assert_eq!(spec.hardfork, fork);
    assert_eq!(spec.name, fork.to_string());
    assert_eq!(spec.evm.op_spec(), evm);
}

#[rstest]
#[case::default_params(None, OpHardforkId::REGOLITH, 50, 6)]
#[case::default_params_canyon(None, OpHardforkId::CANYON, 250, 6)]
#[case::default_params_holocene(None, OpHardforkId::HOLOCENE, 250, 6)]
#[case::overrides(
    Some(r#"{"eip1559Elasticity": 10, "eip1559Denominator": 8, "eip1559DenominatorCanyon": 16}"#),
    OpHardforkId::BEDROCK,
    8,
    10
)]
#[case::overrides_canyon(
    Some(r#"{"eip1559Elasticity": 10, "eip1559Denominator": 8, "eip1559DenominatorCanyon": 16}"#),
    OpHardforkId::ECOTONE,
    16,
    10
)]
fn test_fee_market_params(
    #[case] optimism: Option<&str>,
    #[case] fork: OpHardforkId,
    #[case] denominator: u64,
    #[case] elasticity: u64,
) {
    let config = OpGenesisConfig {
        optimism: optimism.map(|json| serde_json::from_str(json).unwrap()),
        ..genesis()
    };
    let spec = ProtocolSchedule::new(&config).unwrap().spec_for(fork).unwrap();
    assert_eq!(spec.fee_market.base_fee_max_change_denominator(), denominator);
    assert_eq!(spec.fee_market.slack_coefficient(), elasticity);
}

#[test]
fn test_rejects_zero_fee_param() {
    let config = OpGenesisConfig {
        optimism: Some(serde_json::from_str(r#"{"eip1559Denominator": 0}"#).unwrap()),
        ..genesis()
    };
    assert!(matches!(
        ProtocolSchedule::new(&config),
        Err(ConfigError::ZeroFeeMarketParam { .. })
    ));
}

#[test]
fn test_data_fee_follows_ecotone() {
    let protocol = ProtocolSchedule::new(&genesis()).unwrap();
    for (fork, spec) in protocol.iter() {
        assert_eq!(spec.implements_data_fee(), fork >= OpHardforkId::ECOTONE, "{fork}");
        let expected_layer = match fork {
            OpHardforkId::BEDROCK | OpHardforkId::REGOLITH => FeeMarketLayer::London,
            OpHardforkId::CANYON | OpHardforkId::DELTA => FeeMarketLayer::Canyon,
            _ => FeeMarketLayer::Cancun,
        };
        assert_eq!(spec.fee_market.layer(), expected_layer, "{fork}");
    }
}

#[test]
fn test_base_fee_across_canyon() {
    let protocol = ProtocolSchedule::new(&genesis()).unwrap();
    let parent = ParentGas { base_fee: 1_000_000_000, gas_used: 0, gas_limit: 30_000_000 };

    let regolith = protocol.spec_at(10, 99).unwrap();
    assert_eq!(regolith.fee_market.compute_base_fee(10, parent), Ok(980_000_000));
    let canyon = protocol.spec_at(11, 100).unwrap();
    assert_eq!(canyon.fee_market.compute_base_fee(11, parent), Ok(996_000_000));

    // The London block takes the configured initial base fee.
    assert_eq!(regolith.fee_market.compute_base_fee(0, parent), Ok(1_000_000_000));
}

#[rstest]
#[case::overflow(
    u64::MAX - 1,
    30_000_000,
    30_000_000,
    FeeMarketError::BaseFeeOverflow { parent_base_fee: u64::MAX - 1 }
)]
#[case::gas_limit_below_elasticity(
    1_000,
    1,
    5,
    FeeMarketError::GasLimitBelowElasticity { gas_limit: 5, elasticity: 6 }
)]
#[case::gas_used_above_limit(
    1_000,
    30_000_001,
    30_000_000,
    FeeMarketError::GasUsedExceedsLimit { gas_used: 30_000_001, gas_limit: 30_000_000 }
)]
fn test_base_fee_rejects_parent(
    #[case] base_fee: u64,
    #[case] gas_used: u64,
    #[case] gas_limit: u64,
    #[case] expected: FeeMarketError,
) {
    let protocol = ProtocolSchedule::new(&genesis()).unwrap();
    let parent = ParentGas { base_fee, gas_used, gas_limit };
    for (fork, spec) in protocol.iter() {
        assert_eq!(spec.fee_market.compute_base_fee(1, parent), Err(expected), "{fork}");
    }
}

#[test]
fn test_nothing_selected_before_bedrock() {
    let config = OpGenesisConfig { bedrock_block: Some(105_235_063), ..genesis() };
    let protocol = ProtocolSchedule::new(&config).unwrap();
    assert!(protocol.spec_at(100, 1).is_none());
    assert!(protocol.spec_at(105_235_062, u64::MAX).is_none());
    assert!(protocol.hardfork_schedule().activated_at(100, u64::MAX).is_empty());
    assert!(!protocol.hardfork_schedule().is_bedrock_block(100));

    let spec = protocol.spec_at(105_235_063, 600).unwrap();
    assert_eq!(spec.hardfork, OpHardforkId::HOLOCENE);
}

#[test]
fn test_missing_fork() {
    let protocol = ProtocolSchedule::new(&genesis()).unwrap();
    assert_eq!(
        protocol.spec_for(OpHardforkId::INTEROP).unwrap_err(),
        ConfigError::MissingProtocolSpec(OpHardforkId::INTEROP)
    );
    assert!(!protocol.hardfork_schedule().is_interop(u64::MAX));
}
