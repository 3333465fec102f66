//! Definitions of the rollup hardforks (`OpHardforkId`).

use core::{
    fmt::{self, Display},
    str::FromStr,
};
use op_revm::OpSpecId;
pub use revm::primitives::hardfork::UnknownHardfork;
use serde::{Deserialize, Serialize};

/// Rollup hardfork id, in activation order.
///
/// Each hardfork also corresponds to an Optimism EVM version ([`OpSpecId`]), which in turn maps
/// onto an Ethereum EVM version:
/// - [`OpHardforkId::BEDROCK`] -> [`OpSpecId::BEDROCK`] -> `MERGE`
/// - [`OpHardforkId::REGOLITH`] -> [`OpSpecId::REGOLITH`] -> `MERGE`
/// - [`OpHardforkId::CANYON`], [`OpHardforkId::DELTA`] -> [`OpSpecId::CANYON`] -> `SHANGHAI`
/// - [`OpHardforkId::ECOTONE`] -> [`OpSpecId::ECOTONE`] -> `CANCUN`
/// - [`OpHardforkId::FJORD`] -> [`OpSpecId::FJORD`] -> `CANCUN`
/// - [`OpHardforkId::GRANITE`] -> [`OpSpecId::GRANITE`] -> `CANCUN`
/// - [`OpHardforkId::HOLOCENE`] -> [`OpSpecId::HOLOCENE`] -> `CANCUN`
/// - [`OpHardforkId::INTEROP`] -> [`OpSpecId::INTEROP`] -> `PRAGUE`
#[repr(u8)]
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[allow(non_camel_case_types, clippy::upper_case_acronyms)]
#[non_exhaustive]
pub enum OpHardforkId {
    /// The Bedrock network upgrade, the first rollup fork. Activated by block number.
    BEDROCK,
    /// Regolith: deposit gas accounting fixes, system transactions disabled.
    REGOLITH,
    /// Canyon: Shanghai, EIP-1559 denominator override.
    CANYON,
    /// Delta: span batches.
    DELTA,
    /// Ecotone: Cancun, blob gas pricing for L1 data.
    ECOTONE,
    /// Fjord: RIP-7212 and `FastLZ`-based L1 data cost.
    FJORD,
    /// Granite: BN254 pairing input limit.
    GRANITE,
    /// Holocene: derivation pipeline and fee parameter updates.
    HOLOCENE,
    /// Interop: cross-chain messaging. Not finalized.
    INTEROP,
}

/// String identifiers for rollup hardforks.
#[allow(missing_docs)]
pub mod name {
    pub const BEDROCK: &str = "Bedrock";
    pub const REGOLITH: &str = "Regolith";
    pub const CANYON: &str = "Canyon";
    pub const DELTA: &str = "Delta";
    pub const ECOTONE: &str = "Ecotone";
    pub const FJORD: &str = "Fjord";
    pub const GRANITE: &str = "Granite";
    pub const HOLOCENE: &str = "Holocene";
    pub const INTEROP: &str = "Interop";
}

/// Axis a hardfork activation is keyed on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ActivationKind {
    /// Activated at a block number.
    #[display("block")]
    Block,
    /// Activated at a block timestamp.
    #[display("timestamp")]
    Timestamp,
}

impl OpHardforkId {
    /// All hardforks in activation order.
    pub const ALL: [Self; 9] = [
        Self::BEDROCK,
        Self::REGOLITH,
        Self::CANYON,
        Self::DELTA,
        Self::ECOTONE,
        Self::FJORD,
        Self::GRANITE,
        Self::HOLOCENE,
        Self::INTEROP,
    ];

    /// Returns whether the hardfork's rules are final. Non-final hardforks may still change.
    pub const fn finalized(self) -> bool {
        !matches!(self, Self::INTEROP)
    }

    /// Human readable description of the hardfork.
    pub const fn description(self) -> &'static str {
        match self {
            Self::BEDROCK => "Bedrock: the initial rollup protocol",
            Self::REGOLITH => "Regolith: deposit gas accounting, system transactions disabled",
            Self::CANYON => "Canyon: Shanghai and the EIP-1559 denominator override",
            Self::DELTA => "Delta: span batches",
            Self::ECOTONE => "Ecotone: Cancun and blob-based L1 data pricing",
            Self::FJORD => "Fjord: RIP-7212 and FastLZ-based L1 data cost",
            Self::GRANITE => "Granite: BN254 pairing input limit",
            Self::HOLOCENE => "Holocene: derivation and fee parameter updates",
            Self::INTEROP => "Interop: cross-chain messaging",
        }
    }

    /// The axis this hardfork's activation threshold is expressed on.
    pub const fn activation_kind(self) -> ActivationKind {
        match self {
            Self::BEDROCK => ActivationKind::Block,
            _ => ActivationKind::Timestamp,
        }
    }

    /// Converts the [`OpHardforkId`] into its corresponding [`OpSpecId`].
    pub const fn into_op_spec(self) -> OpSpecId {
        match self {
            Self::BEDROCK => OpSpecId::BEDROCK,
            Self::REGOLITH => OpSpecId::REGOLITH,
            Self::CANYON | Self::DELTA => OpSpecId::CANYON,
            Self::ECOTONE => OpSpecId::ECOTONE,
            Self::FJORD => OpSpecId::FJORD,
            Self::GRANITE => OpSpecId::GRANITE,
            Self::HOLOCENE => OpSpecId::HOLOCENE,
            Self::INTEROP => OpSpecId::INTEROP,
        }
    }

    /// Checks if the given hardfork is enabled once the current one is, i.e. `other` comes no
    /// later than `self`.
    pub const fn is_enabled(self, other: Self) -> bool {
        other as u8 <= self as u8
    }

    /// The hardfork preceding this one, if any.
    pub const fn parent(self) -> Option<Self> {
        match self {
            Self::BEDROCK => None,
            Self::REGOLITH => Some(Self::BEDROCK),
            Self::CANYON => Some(Self::REGOLITH),
            Self::DELTA => Some(Self::CANYON),
            Self::ECOTONE => Some(Self::DELTA),
            Self::FJORD => Some(Self::ECOTONE),
            Self::GRANITE => Some(Self::FJORD),
            Self::HOLOCENE => Some(Self::GRANITE),
            Self::INTEROP => Some(Self::HOLOCENE),
        }
    }
}

impl From<OpHardforkId> for &'static str {
    fn from(fork: OpHardforkId) -> Self {
        match fork {
            OpHardforkId::BEDROCK => name::BEDROCK,
            OpHardforkId::REGOLITH => name::REGOLITH,
            OpHardforkId::CANYON => name::CANYON,
            OpHardforkId::DELTA => name::DELTA,
            OpHardforkId::ECOTONE => name::ECOTONE,
            OpHardforkId::FJORD => name::FJORD,
            OpHardforkId::GRANITE => name::GRANITE,
            OpHardforkId::HOLOCENE => name::HOLOCENE,
            OpHardforkId::INTEROP => name::INTEROP,
        }
    }
}

impl FromStr for OpHardforkId {
    type Err = UnknownHardfork;

    /// Parses a hardfork name, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|fork| <&'static str>::from(*fork).eq_ignore_ascii_case(s))
            .ok_or(UnknownHardfork)
    }
}

impl From<OpHardforkId> for OpSpecId {
    fn from(fork: OpHardforkId) -> Self {
        fork.into_op_spec()
    }
}

impl Display for OpHardforkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str((*self).into())
    }
}
