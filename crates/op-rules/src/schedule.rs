use alloc::{collections::BTreeMap, vec::Vec};

use alloy_hardforks::{EthereumHardfork, EthereumHardforks, ForkCondition};
use alloy_op_hardforks::{OpHardfork, OpHardforks};
use alloy_primitives::{BlockNumber, BlockTimestamp};
use tracing::debug;

use crate::{ActivationKind, ConfigError, OpGenesisConfig, OpHardforkId};

/// The point of the chain a hardfork predicate is evaluated at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, derive_more::Display)]
pub enum ForkReference {
    /// A block number.
    #[display("block {_0}")]
    Block(BlockNumber),
    /// A block timestamp.
    #[display("timestamp {_0}")]
    Timestamp(BlockTimestamp),
}

/// Activation thresholds of the rollup hardforks.
///
/// Built once from the genesis configuration and shared read-only afterwards. Construction
/// guarantees that every hardfork is keyed on its own axis and that thresholds never decrease in
/// fork order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HardforkSchedule {
    activations: BTreeMap<OpHardforkId, ForkCondition>,
    london: ForkCondition,
}

impl Default for HardforkSchedule {
    /// A schedule where no hardfork ever activates.
    fn default() -> Self {
        Self { activations: BTreeMap::new(), london: ForkCondition::Block(0) }
    }
}

impl HardforkSchedule {
    /// Returns a builder for a [`HardforkSchedule`].
    pub fn builder() -> HardforkScheduleBuilder {
        HardforkScheduleBuilder::default()
    }

    /// Builds the schedule described by a genesis configuration.
    pub fn from_genesis(config: &OpGenesisConfig) -> Result<Self, ConfigError> {
        let mut builder = Self::builder().london(config.london_block.unwrap_or_default());
        if let Some(block) = config.bedrock_block {
            builder = builder.block(OpHardforkId::BEDROCK, block);
        }
        for (fork, time) in [
            (OpHardforkId::REGOLITH, config.regolith_time),
            (OpHardforkId::CANYON, config.canyon_time),
            (OpHardforkId::DELTA, config.delta_time),
            (OpHardforkId::ECOTONE, config.ecotone_time),
            (OpHardforkId::FJORD, config.fjord_time),
            (OpHardforkId::GRANITE, config.granite_time),
            (OpHardforkId::HOLOCENE, config.holocene_time),
            (OpHardforkId::INTEROP, config.interop_time),
        ] {
            if let Some(time) = time {
                builder = builder.timestamp(fork, time);
            }
        }
        builder.build()
    }

    /// Retrieves the [`ForkCondition`] of a hardfork, [`ForkCondition::Never`] if it is not
    /// scheduled.
    pub fn fork_activation(&self, fork: OpHardforkId) -> ForkCondition {
        self.activations.get(&fork).copied().unwrap_or(ForkCondition::Never)
    }

    /// Returns the activation threshold of a hardfork, if it is scheduled.
    pub fn threshold(&self, fork: OpHardforkId) -> Option<u64> {
        match self.fork_activation(fork) {
            ForkCondition::Block(n) | ForkCondition::Timestamp(n) => Some(n),
            _ => None,
        }
    }

    /// Returns `true` if the hardfork is active at the given reference.
    ///
    /// # Panics
    ///
    /// Panics if the reference is not on the axis the hardfork is keyed on, e.g. Bedrock queried
    /// with a timestamp. Such a query is a programming error.
    pub fn is_active(&self, fork: OpHardforkId, reference: ForkReference) -> bool {
        let condition = self.fork_activation(fork);
        match (fork.activation_kind(), reference) {
            (ActivationKind::Block, ForkReference::Block(number)) => {
                condition.active_at_block(number)
            }
            (ActivationKind::Timestamp, ForkReference::Timestamp(timestamp)) => {
                condition.active_at_timestamp(timestamp)
            }
            (kind, reference) => {
                panic!("hardfork {fork} is activated by {kind}, but was queried at {reference}")
            }
        }
    }

    /// Returns `true` if Bedrock is active at the given block number.
    pub fn is_bedrock_block(&self, number: BlockNumber) -> bool {
        self.is_active(OpHardforkId::BEDROCK, ForkReference::Block(number))
    }

    /// Returns `true` if Regolith is active at the given timestamp.
    pub fn is_regolith(&self, timestamp: BlockTimestamp) -> bool {
        self.is_active(OpHardforkId::REGOLITH, ForkReference::Timestamp(timestamp))
    }

    /// Returns `true` if Canyon is active at the given timestamp.
    pub fn is_canyon(&self, timestamp: BlockTimestamp) -> bool {
        self.is_active(OpHardforkId::CANYON, ForkReference::Timestamp(timestamp))
    }

    /// Returns `true` if Delta is active at the given timestamp.
    pub fn is_delta(&self, timestamp: BlockTimestamp) -> bool {
        self.is_active(OpHardforkId::DELTA, ForkReference::Timestamp(timestamp))
    }

    /// Returns `true` if Ecotone is active at the given timestamp.
    pub fn is_ecotone(&self, timestamp: BlockTimestamp) -> bool {
        self.is_active(OpHardforkId::ECOTONE, ForkReference::Timestamp(timestamp))
    }

    /// Returns `true` if Fjord is active at the given timestamp.
    pub fn is_fjord(&self, timestamp: BlockTimestamp) -> bool {
        self.is_active(OpHardforkId::FJORD, ForkReference::Timestamp(timestamp))
    }

    /// Returns `true` if Granite is active at the given timestamp.
    pub fn is_granite(&self, timestamp: BlockTimestamp) -> bool {
        self.is_active(OpHardforkId::GRANITE, ForkReference::Timestamp(timestamp))
    }

    /// Returns `true` if Holocene is active at the given timestamp.
    pub fn is_holocene(&self, timestamp: BlockTimestamp) -> bool {
        self.is_active(OpHardforkId::HOLOCENE, ForkReference::Timestamp(timestamp))
    }

    /// Returns `true` if Interop is active at the given timestamp.
    pub fn is_interop(&self, timestamp: BlockTimestamp) -> bool {
        self.is_active(OpHardforkId::INTEROP, ForkReference::Timestamp(timestamp))
    }

    /// Returns `true` if EIP-1559 is active at the given block number.
    pub fn is_london_block(&self, number: BlockNumber) -> bool {
        self.london.active_at_block(number)
    }

    /// Returns the block EIP-1559 activates at.
    pub fn london_block(&self) -> Option<BlockNumber> {
        match self.london {
            ForkCondition::Block(number) => Some(number),
            _ => None,
        }
    }

    /// Returns every hardfork active at the given block, in fork order. Empty before Bedrock,
    /// whatever the timestamps of later hardforks.
    pub fn activated_at(
        &self,
        number: BlockNumber,
        timestamp: BlockTimestamp,
    ) -> Vec<OpHardforkId> {
        if !self.is_bedrock_block(number) {
            return Vec::new();
        }
        OpHardforkId::ALL
            .into_iter()
            .filter(|fork| self.is_active(*fork, Self::reference_for(*fork, number, timestamp)))
            .collect()
    }

    /// Returns the latest hardfork active at the given block, `None` before Bedrock.
    pub fn latest_active(
        &self,
        number: BlockNumber,
        timestamp: BlockTimestamp,
    ) -> Option<OpHardforkId> {
        if !self.is_bedrock_block(number) {
            return None;
        }
        OpHardforkId::ALL
            .into_iter()
            .rev()
            .find(|fork| self.is_active(*fork, Self::reference_for(*fork, number, timestamp)))
    }

    /// Returns `true` if the given block is the first block under `fork`, i.e. the fork is active
    /// at the block but was not at its parent. Block 1 counts as the first block of every
    /// hardfork active at genesis.
    pub fn first_fork_block(
        &self,
        fork: OpHardforkId,
        parent: (BlockNumber, BlockTimestamp),
        current: (BlockNumber, BlockTimestamp),
    ) -> bool {
        let (parent_number, parent_timestamp) = parent;
        let (current_number, current_timestamp) = current;
        self.is_active(fork, Self::reference_for(fork, current_number, current_timestamp)) &&
            (current_number == 1 ||
                !self.is_active(fork, Self::reference_for(fork, parent_number, parent_timestamp)))
    }

    /// Picks the reference on the axis `fork` is keyed on.
    const fn reference_for(
        fork: OpHardforkId,
        number: BlockNumber,
        timestamp: BlockTimestamp,
    ) -> ForkReference {
        match fork.activation_kind() {
            ActivationKind::Block => ForkReference::Block(number),
            ActivationKind::Timestamp => ForkReference::Timestamp(timestamp),
        }
    }
}

/// Builder for a [`HardforkSchedule`], validated on [`HardforkScheduleBuilder::build`].
#[derive(Debug, Clone, Default)]
pub struct HardforkScheduleBuilder {
    activations: BTreeMap<OpHardforkId, ForkCondition>,
    london: Option<BlockNumber>,
}

impl HardforkScheduleBuilder {
    /// Sets the activation condition of a hardfork, replacing any previous one.
    pub fn with(mut self, fork: OpHardforkId, condition: ForkCondition) -> Self {
        self.activations.insert(fork, condition);
        self
    }

    /// Activates a hardfork at a block number.
    pub fn block(self, fork: OpHardforkId, number: BlockNumber) -> Self {
        self.with(fork, ForkCondition::Block(number))
    }

    /// Activates a hardfork at a timestamp.
    pub fn timestamp(self, fork: OpHardforkId, timestamp: BlockTimestamp) -> Self {
        self.with(fork, ForkCondition::Timestamp(timestamp))
    }

    /// Sets the block EIP-1559 activates at. Defaults to genesis.
    pub const fn london(mut self, number: BlockNumber) -> Self {
        self.london = Some(number);
        self
    }

    /// Activates every hardfork up to and including `last` at genesis.
    pub fn genesis_through(mut self, last: OpHardforkId) -> Self {
        for fork in OpHardforkId::ALL.into_iter().filter(|fork| last.is_enabled(*fork)) {
            let condition = match fork.activation_kind() {
                ActivationKind::Block => ForkCondition::Block(0),
                ActivationKind::Timestamp => ForkCondition::Timestamp(0),
            };
            self = self.with(fork, condition);
        }
        self
    }

    /// Validates the thresholds and builds the schedule.
    pub fn build(self) -> Result<HardforkSchedule, ConfigError> {
        let mut last_block: Option<(OpHardforkId, u64)> = None;
        let mut last_timestamp: Option<(OpHardforkId, u64)> = None;
        let mut activations = BTreeMap::new();

        for fork in OpHardforkId::ALL {
            let Some(condition) = self.activations.get(&fork).copied() else { continue };
            let expected = fork.activation_kind();
            let (threshold, last) = match (expected, condition) {
                (_, ForkCondition::Never) => continue,
                (ActivationKind::Block, ForkCondition::Block(n)) => (n, &mut last_block),
                (ActivationKind::Timestamp, ForkCondition::Timestamp(t)) => {
                    (t, &mut last_timestamp)
                }
                _ => return Err(ConfigError::WrongActivationAxis { fork, expected }),
            };
            if let Some((earlier, earlier_at)) = *last {
                if threshold < earlier_at {
                    return Err(ConfigError::HardforkOrdering {
                        earlier,
                        earlier_at,
                        later: fork,
                        later_at: threshold,
                    });
                }
            }
            *last = Some((fork, threshold));
            activations.insert(fork, condition);
        }

        let schedule = HardforkSchedule {
            activations,
            london: ForkCondition::Block(self.london.unwrap_or_default()),
        };
        debug!(target: "op_rules::schedule", ?schedule, "Built hardfork schedule");
        Ok(schedule)
    }
}

impl EthereumHardforks for HardforkSchedule {
    fn ethereum_fork_activation(&self, fork: EthereumHardfork) -> ForkCondition {
        match fork {
            EthereumHardfork::London => self.london,
            EthereumHardfork::Shanghai => self.fork_activation(OpHardforkId::CANYON),
            EthereumHardfork::Cancun => self.fork_activation(OpHardforkId::ECOTONE),
            fork if fork > EthereumHardfork::Cancun => ForkCondition::Never,
            _ => ForkCondition::Block(0),
        }
    }
}

impl OpHardforks for HardforkSchedule {
    fn op_fork_activation(&self, fork: OpHardfork) -> ForkCondition {
        match fork {
            OpHardfork::Bedrock => self.fork_activation(OpHardforkId::BEDROCK),
            OpHardfork::Regolith => self.fork_activation(OpHardforkId::REGOLITH),
            OpHardfork::Canyon => self.fork_activation(OpHardforkId::CANYON),
            OpHardfork::Ecotone => self.fork_activation(OpHardforkId::ECOTONE),
            OpHardfork::Fjord => self.fork_activation(OpHardforkId::FJORD),
            OpHardfork::Granite => self.fork_activation(OpHardforkId::GRANITE),
            OpHardfork::Holocene => self.fork_activation(OpHardforkId::HOLOCENE),
            OpHardfork::Interop => self.fork_activation(OpHardforkId::INTEROP),
            _ => ForkCondition::Never,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn staggered() -> HardforkSchedule {
        HardforkSchedule::builder()
            .block(OpHardforkId::BEDROCK, 100)
            .timestamp(OpHardforkId::REGOLITH, 1_000)
            .timestamp(OpHardforkId::CANYON, 2_000)
            .timestamp(OpHardforkId::ECOTONE, 3_000)
            .timestamp(OpHardforkId::FJORD, 4_000)
            .build()
            .unwrap()
    }

    #[test]
    fn test_named_predicates() {
        let schedule = staggered();
        assert!(!schedule.is_bedrock_block(99));
        assert!(schedule.is_bedrock_block(100));
        assert!(!schedule.is_regolith(999));
        assert!(schedule.is_regolith(1_000));
        assert!(schedule.is_canyon(2_000));
        assert!(!schedule.is_delta(u64::MAX));
        assert!(schedule.is_ecotone(3_001));
        assert!(!schedule.is_fjord(3_999));
        assert!(schedule.is_fjord(4_000));
        assert!(!schedule.is_granite(u64::MAX));
        assert!(!schedule.is_holocene(u64::MAX));
        assert!(!schedule.is_interop(u64::MAX));
    }

    #[test]
    fn test_ordering_violation() {
        let err = HardforkSchedule::builder()
            .timestamp(OpHardforkId::REGOLITH, 10)
            .timestamp(OpHardforkId::CANYON, 20)
            .timestamp(OpHardforkId::ECOTONE, 15)
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::HardforkOrdering {
                earlier: OpHardforkId::CANYON,
                earlier_at: 20,
                later: OpHardforkId::ECOTONE,
                later_at: 15,
            }
        );
    }

    #[test]
    fn test_absent_forks_are_skipped_by_ordering() {
        let schedule = HardforkSchedule::builder()
            .timestamp(OpHardforkId::REGOLITH, 10)
            .with(OpHardforkId::CANYON, ForkCondition::Never)
            .timestamp(OpHardforkId::FJORD, 10)
            .build()
            .unwrap();
        assert_eq!(schedule.threshold(OpHardforkId::CANYON), None);
        assert_eq!(schedule.threshold(OpHardforkId::FJORD), Some(10));
    }

    #[test]
    fn test_wrong_axis_rejected() {
        let err =
            HardforkSchedule::builder().timestamp(OpHardforkId::BEDROCK, 0).build().unwrap_err();
        assert_eq!(
            err,
            ConfigError::WrongActivationAxis {
                fork: OpHardforkId::BEDROCK,
                expected: ActivationKind::Block,
            }
        );
        let err = HardforkSchedule::builder().block(OpHardforkId::CANYON, 0).build().unwrap_err();
        assert!(matches!(err, ConfigError::WrongActivationAxis { fork: OpHardforkId::CANYON, .. }));
    }

    #[test]
    #[should_panic(expected = "queried at block 5")]
    fn test_wrong_axis_query_panics() {
        staggered().is_active(OpHardforkId::REGOLITH, ForkReference::Block(5));
    }

    #[test]
    fn test_latest_active() {
        let schedule = staggered();
        assert_eq!(schedule.latest_active(0, 0), None);
        assert_eq!(schedule.latest_active(100, 0), Some(OpHardforkId::BEDROCK));
        assert_eq!(schedule.latest_active(200, 2_500), Some(OpHardforkId::CANYON));
        assert_eq!(
            schedule.activated_at(200, 3_000),
            vec![
                OpHardforkId::BEDROCK,
                OpHardforkId::REGOLITH,
                OpHardforkId::CANYON,
                OpHardforkId::ECOTONE
            ]
        );
    }

    #[test]
    fn test_nothing_active_before_bedrock() {
        // Regolith at genesis time but Bedrock at a later block.
        let schedule = HardforkSchedule::builder()
            .block(OpHardforkId::BEDROCK, 105_235_063)
            .timestamp(OpHardforkId::REGOLITH, 0)
            .build()
            .unwrap();
        assert!(schedule.is_regolith(1));
        assert_eq!(schedule.latest_active(100, 1), None);
        assert!(schedule.activated_at(105_235_062, u64::MAX).is_empty());
        assert_eq!(schedule.latest_active(105_235_063, 1), Some(OpHardforkId::REGOLITH));
        assert_eq!(
            schedule.activated_at(105_235_063, 1),
            vec![OpHardforkId::BEDROCK, OpHardforkId::REGOLITH]
        );

        let unscheduled =
            HardforkSchedule::builder().timestamp(OpHardforkId::REGOLITH, 0).build().unwrap();
        assert_eq!(unscheduled.latest_active(u64::MAX, u64::MAX), None);
    }

    #[test]
    fn test_first_fork_block() {
        let schedule = staggered();
        assert!(schedule.first_fork_block(OpHardforkId::CANYON, (10, 1_999), (11, 2_001)));
        assert!(!schedule.first_fork_block(OpHardforkId::CANYON, (11, 2_001), (12, 2_003)));
        let genesis = HardforkSchedule::builder()
            .genesis_through(OpHardforkId::GRANITE)
            .build()
            .unwrap();
        assert!(genesis.first_fork_block(OpHardforkId::GRANITE, (0, 0), (1, 2)));
    }

    #[test]
    fn test_alloy_hardforks_view() {
        let schedule = staggered();
        assert!(schedule.is_shanghai_active_at_timestamp(2_000));
        assert!(!schedule.is_cancun_active_at_timestamp(2_999));
        assert!(schedule.is_london_active_at_block(0));
        assert_eq!(schedule.op_fork_activation(OpHardfork::Fjord), ForkCondition::Timestamp(4_000));
        assert_eq!(schedule.op_fork_activation(OpHardfork::Isthmus), ForkCondition::Never);
    }
}
