//! Constants of the rollup protocol rules.
//!
//! It groups the constants by the concern they belong to as sub-modules.

/// Constants of the EIP-1559 fee market.
pub mod fee_market {
    /// The base fee max change denominator used when the genesis configuration does not set
    /// `eip1559denominator`.
    pub const DEFAULT_EIP1559_DENOMINATOR: u64 = 50;
    /// The base fee max change denominator used from Canyon on when the genesis configuration
    /// does not set `eip1559denominatorcanyon`.
    pub const DEFAULT_EIP1559_DENOMINATOR_CANYON: u64 = 250;
    /// The elasticity multiplier used when the genesis configuration does not set
    /// `eip1559elasticity`.
    pub const DEFAULT_EIP1559_ELASTICITY: u64 = 6;
}

/// Constants of the `FastLZ` compression-length estimate.
pub mod flz {
    /// Number of slots of the estimator's hash table.
    pub const HASH_TABLE_SIZE: usize = 1 << 13;
    /// Mask selecting a hash table slot.
    pub const HASH_MASK: u64 = 0x1fff;
    /// Multiplicative constant of the estimator's 3-byte hash.
    pub const HASH_MULTIPLIER: u64 = 2_654_435_769;
    /// Largest backward distance a match may reference.
    pub const MAX_DISTANCE: u32 = 0x1fff;
    /// Number of trailing bytes that are never matched.
    pub const TRAILING_LITERALS: usize = 13;
    /// Maximum number of bytes covered by one literal instruction.
    pub const LITERAL_RUN: u32 = 32;
    /// Maximum match length covered by one match instruction.
    pub const MATCH_RUN: u32 = 262;
}

/// Constants of the deposit transaction.
pub mod deposit {
    /// Base in-memory footprint of a pooled deposit transaction.
    pub const DEPOSIT_SIZE: usize = 872;
    /// In-memory size of the source hash.
    pub const SOURCE_HASH_SIZE: usize = 32;
    /// In-memory size of the system transaction flag.
    pub const IS_SYSTEM_TX_SIZE: usize = 1;
    /// In-memory size of the mint value.
    pub const MINT_SIZE: usize = 32;
    /// In-memory size of a present `to` address.
    pub const TO_SIZE: usize = 20;
}

/// Constants of contract creation and precompiles.
pub mod evm {
    use alloy_primitives::{address, Address};

    /// Code size limits inherited from `revm`. The initcode limit applies from Canyon on.
    pub use revm::primitives::{eip170::MAX_CODE_SIZE, MAX_INITCODE_SIZE};

    /// EIP-3541 rejected first byte of deployed code.
    pub const INVALID_CODE_PREFIX: u8 = 0xEF;
    /// EIP-161 initial nonce of a created contract.
    pub const INITIAL_CONTRACT_NONCE: u64 = 1;

    /// Address of the RIP-7212 `P256VERIFY` precompile, registered from Fjord on.
    pub const P256VERIFY_ADDRESS: Address = address!("0000000000000000000000000000000000000100");
    /// Highest address (as an integer) treated as a precompile from Fjord on.
    pub const FJORD_MAX_PRECOMPILE: u16 = 0x100;
    /// Highest address (as an integer) treated as a precompile before Fjord.
    pub const CANCUN_MAX_PRECOMPILE: u16 = 0x0a;
}
