use clap::Parser;
use op_rules::{TxDeposit, DEPOSIT_TX_TYPE_ID};
use serde_json::json;
use tracing::debug;

use crate::common::{load_hex, Result};

/// Decode a deposit transaction, either EIP-2718 enveloped (`0x7e` prefix) or as a bare RLP list
#[derive(Parser, Debug)]
pub struct Cmd {
    /// Hex-encoded transaction
    pub tx: Option<String>,

    /// File holding the hex-encoded transaction, `-` for stdin
    #[arg(long, conflicts_with = "tx")]
    pub file: Option<String>,
}

impl Cmd {
    /// Execute the deposit command
    pub fn run(&self) -> Result<()> {
        let bytes = load_hex(self.tx.as_deref(), self.file.as_deref())?;
        let tx = decode(&bytes)?;
        debug!(from = %tx.from, system = tx.is_system_transaction, "Decoded deposit");
        let output = json!({
            "hash": tx.tx_hash(),
            "size": tx.size(),
            "tx": tx,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }
}

/// Decodes either encoding of a deposit. An RLP list never starts with the type byte.
fn decode(bytes: &[u8]) -> Result<TxDeposit> {
    let tx = match bytes.first() {
        Some(&DEPOSIT_TX_TYPE_ID) => TxDeposit::decode_2718(bytes)?,
        _ => TxDeposit::decode_exact(bytes)?,
    };
    Ok(tx)
}
