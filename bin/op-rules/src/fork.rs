use std::{fs, path::PathBuf};

use alloy_primitives::{BlockNumber, BlockTimestamp};
use clap::Parser;
use op_rules::{OpGenesisConfig, OpProtocolSpec, ParentGas, ProtocolSchedule};
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::common::{CliError, Result};

/// Resolve the hardfork and rules bundle active at a block
#[derive(Parser, Debug)]
pub struct Cmd {
    /// Genesis configuration of the chain (JSON)
    #[arg(long, value_name = "FILE")]
    pub genesis: PathBuf,

    /// Block number
    #[arg(long, default_value_t = 0)]
    pub block: BlockNumber,

    /// Block timestamp
    #[arg(long, default_value_t = 0)]
    pub timestamp: BlockTimestamp,

    /// Parent block gas, as `base_fee,gas_used,gas_limit`, to compute the block's base fee
    #[arg(long, value_name = "BASE_FEE,GAS_USED,GAS_LIMIT", value_parser = parse_parent_gas)]
    pub parent: Option<ParentGas>,
}

impl Cmd {
    /// Execute the fork command
    pub fn run(&self) -> Result<()> {
        let genesis: OpGenesisConfig = serde_json::from_str(&fs::read_to_string(&self.genesis)?)?;
        let output = self.resolve(&genesis)?;
        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }

    /// Resolves the block against `genesis` into the command's JSON output.
    fn resolve(&self, genesis: &OpGenesisConfig) -> Result<Value> {
        let protocol = ProtocolSchedule::new(genesis)?;
        info!(block = self.block, timestamp = self.timestamp, "Resolving protocol spec");

        let spec = protocol.spec_at(self.block, self.timestamp).ok_or(CliError::NoActiveFork {
            number: self.block,
            timestamp: self.timestamp,
        })?;
        let active = protocol.hardfork_schedule().activated_at(self.block, self.timestamp);
        debug!(?active, hardfork = %spec.hardfork, "Resolved protocol spec");

        let mut output = json!({
            "active": active,
            "hardfork": spec.name,
            "spec": describe(&spec),
        });
        if let Some(parent) = self.parent {
            output["baseFee"] = json!(spec.fee_market.compute_base_fee(self.block, parent)?);
        }
        Ok(output)
    }
}

/// JSON summary of a rules bundle.
fn describe(spec: &OpProtocolSpec) -> Value {
    let validator = spec.validator_factory.config();
    let mut precompiles = spec.precompiles.addresses().collect::<Vec<_>>();
    precompiles.sort();
    json!({
        "evm": format!("{:?}", spec.evm.op_spec()),
        "feeMarket": {
            "layer": spec.fee_market.layer(),
            "baseFeeMaxChangeDenominator": spec.fee_market.base_fee_max_change_denominator(),
            "elasticity": spec.fee_market.slack_coefficient(),
            "blobFeeMarket": spec.implements_data_fee(),
        },
        "gasCalculator": spec.gas_calculator.kind().to_string(),
        "precompiles": precompiles,
        "validator": {
            "acceptedTypes": validator.accepted_types.bits(),
            "chainId": validator.chain_id,
            "maxInitcodeSize": validator.max_initcode_size,
        },
        "warmCoinbase": spec.transaction_processor.warm_coinbase,
        "maxCodeSize": spec.contract_creation.max_code_size,
    })
}

/// Parses `base_fee,gas_used,gas_limit`.
fn parse_parent_gas(s: &str) -> Result<ParentGas> {
    let values = s
        .split(',')
        .map(|value| {
            value
                .trim()
                .parse::<u64>()
                .map_err(|err| CliError::InvalidInput(format!("{value}: {err}")))
        })
        .collect::<Result<Vec<_>>>()?;
    match values.as_slice() {
        &[base_fee, gas_used, gas_limit] => Ok(ParentGas { base_fee, gas_used, gas_limit }),
        _ => Err(CliError::InvalidInput(format!("expected BASE_FEE,GAS_USED,GAS_LIMIT, got {s}"))),
    }
}
