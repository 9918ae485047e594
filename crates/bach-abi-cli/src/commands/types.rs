//! Single-type commands

use bach_abi::AbiType;
use clap::Subcommand;

use super::{parse_hex, parse_json};
use crate::{config::Config, json, output::Output, CliError};

/// Type subcommands
#[derive(Debug, Subcommand)]
pub enum TypeCommand {
    /// Print the canonical form of a type
    Canonical {
        /// Type string, e.g. "(uint,bool)[]"
        ty: String,
    },
    /// Encode a JSON value
    Encode {
        /// Type string
        ty: String,
        /// Value as JSON
        value: String,
        /// Use the non-standard packed encoding
        #[arg(long)]
        packed: bool,
    },
    /// Decode a hex-encoded value
    Decode {
        /// Type string
        ty: String,
        /// Encoded value (hex)
        data: String,
    },
}

impl TypeCommand {
    pub fn execute(self, _config: &Config, json: bool) -> Result<(), CliError> {
        match self {
            TypeCommand::Canonical { ty } => canonical(&ty, json),
            TypeCommand::Encode { ty, value, packed } => encode(&ty, &value, packed, json),
            TypeCommand::Decode { ty, data } => decode(&ty, &data, json),
        }
    }
}

fn canonical(ty: &str, json: bool) -> Result<(), CliError> {
    let t = AbiType::parse(ty)?;

    Output::new(json)
        .field("canonical", t.canonical_type())
        .field_bool("dynamic", t.is_dynamic())
        .message(t.canonical_type())
        .print();

    Ok(())
}

fn encode(ty: &str, value: &str, packed: bool, json: bool) -> Result<(), CliError> {
    let t = AbiType::parse(ty)?;
    let value = json::to_value(&t, &parse_json(value)?)?;
    let encoded = if packed {
        t.encode_packed(&value)?
    } else {
        t.encode(&value)?
    };
    let data = format!("0x{}", hex::encode(&encoded));

    Output::new(json)
        .field("type", t.canonical_type())
        .field("data", &data)
        .field_u64("length", encoded.len() as u64)
        .message(&data)
        .print();

    Ok(())
}

fn decode(ty: &str, data: &str, json: bool) -> Result<(), CliError> {
    let t = AbiType::parse(ty)?;
    let value = json::from_value(&t.decode(&parse_hex(data)?)?);

    Output::new(json)
        .field("type", t.canonical_type())
        .field_value("value", value.clone())
        .message(&value.to_string())
        .print();

    Ok(())
}
