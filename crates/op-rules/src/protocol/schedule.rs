use alloc::{collections::BTreeMap, sync::Arc};

use alloy_primitives::{BlockNumber, BlockTimestamp};
use tracing::debug;

use crate::{
    ConfigError, GenesisConfigOptions, HardforkSchedule, OpHardforkId, OpProtocolSpec,
    OpProtocolSpecBuilder,
};

/// The rules bundles of a chain, selected by block.
///
/// Holds one shared [`OpProtocolSpec`] per hardfork scheduled in the genesis configuration.
/// Bundles of unscheduled hardforks are never built.
#[derive(Debug, Clone)]
pub struct ProtocolSchedule {
    schedule: Arc<HardforkSchedule>,
    specs: BTreeMap<OpHardforkId, Arc<OpProtocolSpec>>,
}

impl ProtocolSchedule {
    /// Builds the protocol schedule of a genesis configuration.
    ///
    /// Fails with [`ConfigError::NotOptimismConfig`] if the configuration is not a rollup
    /// configuration, or with the error of an invalid hardfork schedule or fee market section.
    pub fn new(config: &dyn GenesisConfigOptions) -> Result<Self, ConfigError> {
        let builder = OpProtocolSpecBuilder::new(config)?;
        let schedule = builder.schedule().clone();
        let specs = OpHardforkId::ALL
            .into_iter()
            .filter(|fork| schedule.threshold(*fork).is_some())
            .map(|fork| (fork, Arc::new(builder.build(fork))))
            .collect::<BTreeMap<_, _>>();
        debug!(
            target: "op_rules::protocol",
            chain_id = ?config.chain_id(),
            forks = specs.len(),
            "Built protocol schedule"
        );
        Ok(Self { schedule, specs })
    }

    /// The hardfork schedule bundles are selected with.
    pub fn hardfork_schedule(&self) -> &Arc<HardforkSchedule> {
        &self.schedule
    }

    /// Returns the bundle in force at the given block: that of the latest active hardfork.
    /// `None` before Bedrock.
    pub fn spec_at(
        &self,
        number: BlockNumber,
        timestamp: BlockTimestamp,
    ) -> Option<Arc<OpProtocolSpec>> {
        let fork = self.schedule.latest_active(number, timestamp)?;
        self.specs.get(&fork).cloned()
    }

    /// Returns the bundle of `fork`, failing with [`ConfigError::MissingProtocolSpec`] if the
    /// hardfork is not scheduled.
    pub fn spec_for(&self, fork: OpHardforkId) -> Result<Arc<OpProtocolSpec>, ConfigError> {
        self.specs.get(&fork).cloned().ok_or(ConfigError::MissingProtocolSpec(fork))
    }

    /// Scheduled hardforks and their bundles, in fork order.
    pub fn iter(&self) -> impl Iterator<Item = (OpHardforkId, &Arc<OpProtocolSpec>)> + '_ {
        self.specs.iter().map(|(fork, spec)| (*fork, spec))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OpGenesisConfig;

    fn config() -> OpGenesisConfig {
        OpGenesisConfig {
            chain_id: Some(10),
            bedrock_block: Some(100),
            regolith_time: Some(1_000),
            canyon_time: Some(2_000),
            ecotone_time: Some(3_000),
            ..Default::default()
        }
    }

    #[test]
    fn test_spec_at() {
        let protocol = ProtocolSchedule::new(&config()).unwrap();
        assert!(protocol.spec_at(99, 0).is_none());
        assert_eq!(protocol.spec_at(100, 999).unwrap().hardfork, OpHardforkId::BEDROCK);
        assert_eq!(protocol.spec_at(101, 1_000).unwrap().hardfork, OpHardforkId::REGOLITH);
        assert_eq!(protocol.spec_at(102, 2_500).unwrap().hardfork, OpHardforkId::CANYON);
        assert_eq!(protocol.spec_at(103, 3_000).unwrap().hardfork, OpHardforkId::ECOTONE);
    }

    #[test]
    fn test_no_spec_before_bedrock_block() {
        let config = OpGenesisConfig {
            bedrock_block: Some(105_235_063),
            regolith_time: Some(0),
            ..Default::default()
        };
        let protocol = ProtocolSchedule::new(&config).unwrap();
        assert!(protocol.spec_at(100, 1).is_none());
        assert!(protocol.spec_at(105_235_062, u64::MAX).is_none());
        assert_eq!(protocol.spec_at(105_235_063, 1).unwrap().hardfork, OpHardforkId::REGOLITH);
    }

    #[test]
    fn test_spec_for_unscheduled() {
        let protocol = ProtocolSchedule::new(&config()).unwrap();
        assert!(protocol.spec_for(OpHardforkId::CANYON).is_ok());
        assert_eq!(
            protocol.spec_for(OpHardforkId::FJORD).unwrap_err(),
            ConfigError::MissingProtocolSpec(OpHardforkId::FJORD)
        );
        assert_eq!(protocol.iter().count(), 4);
    }

    #[test]
    fn test_bundles_are_shared() {
        let protocol = ProtocolSchedule::new(&config()).unwrap();
        let first = protocol.spec_at(100, 0).unwrap();
        let second = protocol.spec_for(OpHardforkId::BEDROCK).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }
}
