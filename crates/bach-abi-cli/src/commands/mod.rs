//! Subcommands

pub mod address;
pub mod call;
pub mod format;
pub mod types;

use bach_abi::Function;
use serde_json::Value as Json;

use crate::{config::Config, CliError};

/// Decode a hex argument, with or without `0x`
pub fn parse_hex(data: &str) -> Result<Vec<u8>, CliError> {
    let data = data.trim();
    Ok(hex::decode(data.strip_prefix("0x").unwrap_or(data))?)
}

/// Parse a JSON argument list or value
pub fn parse_json(raw: &str) -> Result<Json, CliError> {
    Ok(serde_json::from_str(raw)?)
}

/// Build a function descriptor with the configured selector hash
pub fn function(config: &Config, signature: &str, outputs: Option<&str>) -> Result<Function, CliError> {
    let mut hasher = config.hasher()?;
    Ok(Function::parse_with_hasher(
        signature,
        outputs.unwrap_or("()"),
        hasher.as_mut(),
    )?)
}
