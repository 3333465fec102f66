use core::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of the deposit transaction type.
pub const DEPOSIT_TX_TYPE_ID: u8 = 0x7E;

/// Transaction types known to the rollup.
#[repr(u8)]
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OpTxType {
    /// Legacy transaction.
    Legacy = 0,
    /// EIP-2930 access list transaction.
    Eip2930 = 1,
    /// EIP-1559 dynamic fee transaction.
    Eip1559 = 2,
    /// EIP-4844 blob transaction. Never accepted on the rollup.
    Eip4844 = 3,
    /// EIP-7702 set code transaction.
    Eip7702 = 4,
    /// Deposit transaction.
    Deposit = DEPOSIT_TX_TYPE_ID,
}

impl OpTxType {
    /// Returns `true` for the deposit type.
    pub const fn is_deposit(self) -> bool {
        matches!(self, Self::Deposit)
    }
}

impl From<OpTxType> for u8 {
    fn from(ty: OpTxType) -> Self {
        ty as Self
    }
}

impl TryFrom<u8> for OpTxType {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            0 => Self::Legacy,
            1 => Self::Eip2930,
            2 => Self::Eip1559,
            3 => Self::Eip4844,
            4 => Self::Eip7702,
            DEPOSIT_TX_TYPE_ID => Self::Deposit,
            other => return Err(other),
        })
    }
}

impl fmt::Display for OpTxType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Legacy => write!(f, "legacy"),
            Self::Eip2930 => write!(f, "eip2930"),
            Self::Eip1559 => write!(f, "eip1559"),
            Self::Eip4844 => write!(f, "eip4844"),
            Self::Eip7702 => write!(f, "eip7702"),
            Self::Deposit => write!(f, "deposit"),
        }
    }
}
