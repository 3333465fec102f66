use clap::Parser;
use op_rules::RollupGasData;
use tracing::debug;

use crate::common::{load_hex, Result};

/// Estimate the compressed size and byte histogram of a payload
#[derive(Parser, Debug)]
pub struct Cmd {
    /// Hex-encoded payload
    pub payload: Option<String>,

    /// File holding the hex-encoded payload, `-` for stdin
    #[arg(long, conflicts_with = "payload")]
    pub file: Option<String>,
}

impl Cmd {
    /// Execute the flz command
    pub fn run(&self) -> Result<()> {
        let payload = load_hex(self.payload.as_deref(), self.file.as_deref())?;
        let data = RollupGasData::from_payload(Some(&payload));
        debug!(len = payload.len(), fastlz_size = data.fastlz_size, "Estimated payload");
        println!("{}", serde_json::to_string_pretty(&data)?);
        Ok(())
    }
}
