//! Hex loading utilities for op-rules

use std::{fs, io::Read};

use alloy_primitives::hex;

use super::{CliError, Result};

/// Load hex-encoded bytes from an argument or a file. If the file is a dash (-), read from stdin.
/// Priority: arg > file. Fails if neither is provided.
pub fn load_hex(arg: Option<&str>, file: Option<&str>) -> Result<Vec<u8>> {
    let hex_string = match (arg, file) {
        (Some(arg), _) => arg.to_owned(),
        (None, Some("-")) => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
        (None, Some(file)) => fs::read_to_string(file)?,
        (None, None) => {
            return Err(CliError::InvalidInput("expected a hex argument or --file".to_owned()))
        }
    };

    decode_hex(&hex_string)
}

/// Decode hex string, handling optional 0x prefix
pub fn decode_hex(s: &str) -> Result<Vec<u8>> {
    let s = s.trim();
    let hex_str = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).unwrap_or(s);

    if hex_str.len() % 2 != 0 {
        return Err(CliError::InvalidInput(format!(
            "Invalid hex string length: {} (must be even)",
            hex_str.len()
        )));
    }

    Ok(hex::decode(hex_str)?)
}
