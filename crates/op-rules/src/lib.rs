//! Hardfork-gated protocol rules of an Optimism-style rollup.
//!
//! The crate covers the pieces of the rollup rule engine that must agree bit-for-bit between
//! independent nodes:
//! - the hardfork activation schedule ([`HardforkSchedule`]) and the fee market it selects
//!   ([`OpFeeMarket`]),
//! - the `FastLZ` compression-length estimate feeding the L1 data fee ([`flz_compress_len`],
//!   [`RollupGasData`]),
//! - the deposit transaction ([`TxDeposit`]) and the deposit-aware transaction validator
//!   ([`OpTransactionValidator`]),
//! - the per-fork rules bundles ([`OpProtocolSpec`]) and their selection by block
//!   ([`ProtocolSchedule`]).
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod constants;

mod config;
pub use config::*;

mod deposit;
pub use deposit::*;

mod error;
pub use error::*;

mod fee_market;
pub use fee_market::*;

mod flz;
pub use flz::*;

mod hardfork;
pub use hardfork::*;

mod protocol;
pub use protocol::*;

mod schedule;
pub use schedule::*;

mod tx_type;
pub use tx_type::*;

mod validator;
pub use validator::*;

pub use alloy_hardforks::ForkCondition;
pub use op_revm::OpSpecId;
pub use revm::primitives::hardfork::SpecId as EthSpecId;
