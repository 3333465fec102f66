use alloc::sync::Arc;

use op_revm::OpSpecId;
use revm::primitives::hardfork::SpecId;
use tracing::debug;

use crate::{
    constants::evm::{
        INITIAL_CONTRACT_NONCE, INVALID_CODE_PREFIX, MAX_CODE_SIZE, MAX_INITCODE_SIZE,
    },
    ConfigError, FeeMarketLayer, FeeMarketParams, GasCalculator, GenesisConfigOptions,
    HardforkSchedule, LondonActivation, OpFeeMarket, OpHardforkId, OpTransactionValidatorFactory,
    PrecompileRegistry, ValidatorConfig,
};

/// EVM version a bundle executes with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EvmVariant {
    spec: OpSpecId,
}

impl EvmVariant {
    /// Creates the variant for an Optimism EVM version.
    pub const fn new(spec: OpSpecId) -> Self {
        Self { spec }
    }

    /// The Optimism EVM version.
    pub const fn op_spec(&self) -> OpSpecId {
        self.spec
    }

    /// The Ethereum EVM version the operation set is taken from.
    pub const fn eth_spec(&self) -> SpecId {
        self.spec.into_eth_spec()
    }
}

/// How the transaction processor treats accounts around execution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransactionProcessorConfig {
    /// Delete empty touched accounts (EIP-161).
    pub clear_empty_accounts: bool,
    /// Pre-warm the coinbase (EIP-3651).
    pub warm_coinbase: bool,
}

/// Errors rejecting a contract creation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContractCreationError {
    /// Deployed code exceeds the size limit.
    #[error("Contract code size exceeded: size={size} > limit={limit}")]
    CodeSizeExceeded {
        /// Size of the deployed code.
        size: usize,
        /// The limit.
        limit: usize,
    },
    /// Initcode exceeds the size limit.
    #[error("Initcode size exceeded: size={size} > limit={limit}")]
    InitcodeSizeExceeded {
        /// Size of the initcode.
        size: usize,
        /// The limit.
        limit: usize,
    },
    /// Deployed code starts with a reserved byte.
    #[error("Contract code starts with reserved byte {0:#04x}")]
    InvalidCodePrefix(u8),
}

/// Rules applied to contract creation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ContractCreationRules {
    /// Limit on deployed code size.
    pub max_code_size: usize,
    /// Limit on initcode size, if enforced.
    pub max_initcode_size: Option<usize>,
    /// Rejected first byte of deployed code.
    pub invalid_prefix: u8,
    /// Nonce of a freshly created contract.
    pub initial_nonce: u64,
}

impl Default for ContractCreationRules {
    fn default() -> Self {
        Self {
            max_code_size: MAX_CODE_SIZE,
            max_initcode_size: None,
            invalid_prefix: INVALID_CODE_PREFIX,
            initial_nonce: INITIAL_CONTRACT_NONCE,
        }
    }
}

impl ContractCreationRules {
    /// Checks code returned by a creation before it is deployed.
    pub fn check_deployed_code(&self, code: &[u8]) -> Result<(), ContractCreationError> {
        if code.len() > self.max_code_size {
            return Err(ContractCreationError::CodeSizeExceeded {
                size: code.len(),
                limit: self.max_code_size,
            });
        }
        match code.first() {
            Some(&byte) if byte == self.invalid_prefix => {
                Err(ContractCreationError::InvalidCodePrefix(byte))
            }
            _ => Ok(()),
        }
    }

    /// Checks the initcode of a creation.
    pub fn check_initcode(&self, initcode: &[u8]) -> Result<(), ContractCreationError> {
        match self.max_initcode_size {
            Some(limit) if initcode.len() > limit => {
                Err(ContractCreationError::InitcodeSizeExceeded { size: initcode.len(), limit })
            }
            _ => Ok(()),
        }
    }
}

/// The rules bundle of one hardfork. Built once and shared read-only.
#[derive(Clone, Debug)]
pub struct OpProtocolSpec {
    /// The hardfork the bundle belongs to.
    pub hardfork: OpHardforkId,
    /// Name of the bundle.
    pub name: &'static str,
    /// Fee market.
    pub fee_market: OpFeeMarket,
    /// Gas calculator.
    pub gas_calculator: GasCalculator,
    /// EVM version.
    pub evm: EvmVariant,
    /// Registered precompiles.
    pub precompiles: PrecompileRegistry,
    /// Builder of the deposit-aware transaction validator.
    pub validator_factory: OpTransactionValidatorFactory,
    /// Transaction processor behavior.
    pub transaction_processor: TransactionProcessorConfig,
    /// Contract creation rules.
    pub contract_creation: ContractCreationRules,
}

impl OpProtocolSpec {
    /// Starts the bundle of `fork` from this one, carrying over every field.
    fn derive(&self, fork: OpHardforkId) -> Self {
        Self {
            hardfork: fork,
            name: fork.into(),
            evm: EvmVariant::new(fork.into_op_spec()),
            ..self.clone()
        }
    }

    /// Returns `true` if the bundle prices blob gas.
    pub const fn implements_data_fee(&self) -> bool {
        self.fee_market.implements_data_fee()
    }
}

/// Builds the rules bundle of each hardfork from a rollup genesis configuration.
///
/// Every bundle starts from the previous hardfork's bundle and overrides what the hardfork
/// changes.
#[derive(Debug, Clone)]
pub struct OpProtocolSpecBuilder {
    schedule: Arc<HardforkSchedule>,
    fee_params: FeeMarketParams,
    london: LondonActivation,
    chain_id: Option<u64>,
}

impl OpProtocolSpecBuilder {
    /// Creates a builder from a genesis configuration.
    ///
    /// Fails with [`ConfigError::NotOptimismConfig`] if the configuration is not a rollup
    /// configuration.
    pub fn new(config: &dyn GenesisConfigOptions) -> Result<Self, ConfigError> {
        let op_config = config.try_as_optimism()?;
        let london = LondonActivation {
            block: config.london_block().unwrap_or_default(),
            initial_base_fee: config
                .base_fee_per_gas()
                .unwrap_or(LondonActivation::default().initial_base_fee),
        };
        Ok(Self {
            schedule: Arc::new(op_config.hardfork_schedule()?),
            fee_params: op_config.fee_market_params()?,
            london,
            chain_id: config.chain_id(),
        })
    }

    /// The hardfork schedule shared by every bundle.
    pub const fn schedule(&self) -> &Arc<HardforkSchedule> {
        &self.schedule
    }

    /// Resolved fee market coefficients.
    pub const fn fee_params(&self) -> &FeeMarketParams {
        &self.fee_params
    }

    fn fee_market(&self, layer: FeeMarketLayer) -> OpFeeMarket {
        OpFeeMarket::resolve(layer, &self.fee_params, self.london)
    }

    /// Builds the bundle of `fork`.
    pub fn build(&self, fork: OpHardforkId) -> OpProtocolSpec {
        let spec = match fork {
            OpHardforkId::BEDROCK => self.bedrock_definition(),
            OpHardforkId::REGOLITH => self.regolith_definition(),
            OpHardforkId::CANYON => self.canyon_definition(),
            OpHardforkId::DELTA => self.delta_definition(),
            OpHardforkId::ECOTONE => self.ecotone_definition(),
            OpHardforkId::FJORD => self.fjord_definition(),
            OpHardforkId::GRANITE => self.granite_definition(),
            OpHardforkId::HOLOCENE => self.holocene_definition(),
            OpHardforkId::INTEROP => self.interop_definition(),
        };
        debug!(
            target: "op_rules::protocol",
            hardfork = %spec.hardfork,
            evm = ?spec.evm.op_spec(),
            denominator = spec.fee_market.base_fee_max_change_denominator(),
            data_fee = spec.implements_data_fee(),
            "Built protocol spec"
        );
        spec
    }

    /// Bedrock: London fee market and gas, Berlin precompiles, legacy, access list, dynamic fee
    /// and deposit transactions.
    pub fn bedrock_definition(&self) -> OpProtocolSpec {
        let fork = OpHardforkId::BEDROCK;
        OpProtocolSpec {
            hardfork: fork,
            name: fork.into(),
            fee_market: self.fee_market(FeeMarketLayer::London),
            gas_calculator: GasCalculator::london(),
            evm: EvmVariant::new(fork.into_op_spec()),
            precompiles: PrecompileRegistry::berlin(),
            validator_factory: OpTransactionValidatorFactory::new(
                self.schedule.clone(),
                ValidatorConfig { chain_id: self.chain_id, ..Default::default() },
            ),
            transaction_processor: TransactionProcessorConfig {
                clear_empty_accounts: true,
                warm_coinbase: false,
            },
            contract_creation: ContractCreationRules::default(),
        }
    }

    /// Regolith: same rules as Bedrock; the system transaction gate keys off the schedule.
    pub fn regolith_definition(&self) -> OpProtocolSpec {
        self.bedrock_definition().derive(OpHardforkId::REGOLITH)
    }

    /// Canyon: Shanghai, the Canyon denominator, a warm coinbase and the initcode size limit.
    ///
    /// The ordering follows the upstream rollup protocol: Canyon moves the EVM to Shanghai only,
    /// so the Berlin precompiles and the blob-less fee market carry over until Ecotone.
    pub fn canyon_definition(&self) -> OpProtocolSpec {
        let mut spec = self.regolith_definition().derive(OpHardforkId::CANYON);
        spec.fee_market = self.fee_market(FeeMarketLayer::Canyon);
        spec.gas_calculator = GasCalculator::shanghai();
        spec.transaction_processor.warm_coinbase = true;
        spec.contract_creation.max_initcode_size = Some(MAX_INITCODE_SIZE);
        spec.validator_factory = spec.validator_factory.with_config(ValidatorConfig {
            max_initcode_size: Some(MAX_INITCODE_SIZE),
            ..*spec.validator_factory.config()
        });
        spec
    }

    /// Delta: no execution changes.
    pub fn delta_definition(&self) -> OpProtocolSpec {
        self.canyon_definition().derive(OpHardforkId::DELTA)
    }

    /// Ecotone: Cancun, blob gas pricing and the point evaluation precompile. Blob transactions
    /// stay rejected.
    ///
    /// As upstream, this is the first bundle on Cancun; the data fee is priced from here on.
    pub fn ecotone_definition(&self) -> OpProtocolSpec {
        let mut spec = self.delta_definition().derive(OpHardforkId::ECOTONE);
        spec.fee_market = self.fee_market(FeeMarketLayer::Cancun);
        spec.gas_calculator = GasCalculator::cancun();
        spec.precompiles = PrecompileRegistry::cancun();
        spec
    }

    /// Fjord: `P256VERIFY` and the extended precompile address range.
    pub fn fjord_definition(&self) -> OpProtocolSpec {
        let mut spec = self.ecotone_definition().derive(OpHardforkId::FJORD);
        spec.gas_calculator = GasCalculator::fjord();
        spec.precompiles = PrecompileRegistry::fjord();
        spec
    }

    /// Granite: the BN254 pairing input limit.
    pub fn granite_definition(&self) -> OpProtocolSpec {
        let mut spec = self.fjord_definition().derive(OpHardforkId::GRANITE);
        spec.precompiles = PrecompileRegistry::granite();
        spec
    }

    /// Holocene: no execution changes beyond the EVM version.
    pub fn holocene_definition(&self) -> OpProtocolSpec {
        self.granite_definition().derive(OpHardforkId::HOLOCENE)
    }

    /// Interop: no execution changes beyond the EVM version.
    pub fn interop_definition(&self) -> OpProtocolSpec {
        self.holocene_definition().derive(OpHardforkId::INTEROP)
    }
}
