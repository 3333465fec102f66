//! `op-rules` CLI tool for inspecting rollup protocol rules
//!
//! Estimates the L1 data cost inputs of a payload, decodes deposit transactions and resolves
//! the hardfork and rules bundle active at a block of a chain.

use clap::Parser;

mod cmd;
pub use cmd::*;

/// Shared helpers: errors, hex input and logging
pub mod common;

/// Deposit transaction decoding
pub mod deposit;

/// `FastLZ` estimate of a payload
pub mod flz;

/// Hardfork and rules bundle resolution
pub mod fork;

fn main() -> Result<(), Error> {
    let cli = Cli::parse();
    cli.log_args.init()?;
    cli.cmd.run().inspect_err(|e| eprintln!("{e}"))
}
