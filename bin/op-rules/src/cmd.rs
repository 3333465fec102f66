use clap::{Parser, Subcommand};

use crate::common::{CliError, LogArgs};

/// Command-line interface of the `op-rules` tool
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Cli {
    /// Logging configuration
    #[command(flatten)]
    pub log_args: LogArgs,

    /// Command to run
    #[command(subcommand)]
    pub cmd: MainCmd,
}

/// Main command enumeration for the `op-rules` tool
#[derive(Subcommand, Debug)]
#[command(infer_subcommands = true)]
pub enum MainCmd {
    /// Estimate the compressed size and byte histogram of a payload
    Flz(crate::flz::Cmd),
    /// Decode a deposit transaction
    Deposit(crate::deposit::Cmd),
    /// Resolve the hardfork and rules bundle active at a block
    Fork(crate::fork::Cmd),
}

/// Error type of the `op-rules` tool
pub type Error = CliError;

impl MainCmd {
    /// Execute the main command
    pub fn run(&self) -> Result<(), Error> {
        match self {
            Self::Flz(cmd) => cmd.run(),
            Self::Deposit(cmd) => cmd.run(),
            Self::Fork(cmd) => cmd.run(),
        }
    }
}
