//! Function call commands

use bach_abi::AbiObject;
use clap::Subcommand;

use super::{function, parse_hex, parse_json};
use crate::{config::Config, json, output::Output, CliError};

/// Call data subcommands
#[derive(Debug, Subcommand)]
pub enum CallCommand {
    /// Encode call data for a function
    Encode {
        /// Function signature, e.g. "transfer(address,uint256)"
        signature: String,
        /// Arguments as a JSON array
        #[arg(default_value = "[]")]
        args: String,
    },
    /// Decode call data, checking the selector
    Decode {
        /// Function signature
        signature: String,
        /// Call data (hex)
        data: String,
    },
    /// Decode return data against output types
    DecodeReturn {
        /// Function signature
        signature: String,
        /// Output types, e.g. "(bool,uint256)"
        outputs: String,
        /// Return data (hex)
        data: String,
    },
}

impl CallCommand {
    pub fn execute(self, config: &Config, json: bool) -> Result<(), CliError> {
        match self {
            CallCommand::Encode { signature, args } => encode(config, &signature, &args, json),
            CallCommand::Decode { signature, data } => decode(config, &signature, &data, json),
            CallCommand::DecodeReturn {
                signature,
                outputs,
                data,
            } => decode_return(config, &signature, &outputs, &data, json),
        }
    }
}

/// Print the selector of a function signature
pub fn selector(config: &Config, signature: &str, json: bool) -> Result<(), CliError> {
    let f = function(config, signature, None)?;
    let selector = format!("0x{}", f.selector_hex());

    Output::new(json)
        .field("signature", &f.canonical_signature())
        .field("selector", &selector)
        .field("hash_algorithm", f.hash_algorithm())
        .message(&selector)
        .print();

    Ok(())
}

fn encode(config: &Config, signature: &str, args: &str, json: bool) -> Result<(), CliError> {
    let f = function(config, signature, None)?;
    let args = json::to_tuple(f.inputs(), &parse_json(args)?)?;
    let call = f.encode_call(&args)?;
    let data = format!("0x{}", hex::encode(&call));

    Output::new(json)
        .field("signature", &f.canonical_signature())
        .field("data", &data)
        .field_u64("length", call.len() as u64)
        .message(&data)
        .print();

    Ok(())
}

fn decode(config: &Config, signature: &str, data: &str, json: bool) -> Result<(), CliError> {
    let f = function(config, signature, None)?;
    let args = json::from_tuple(&f.decode_call(&parse_hex(data)?)?);

    Output::new(json)
        .field("signature", &f.canonical_signature())
        .field_value("args", args.clone())
        .message(&args.to_string())
        .print();

    Ok(())
}

fn decode_return(
    config: &Config,
    signature: &str,
    outputs: &str,
    data: &str,
    json: bool,
) -> Result<(), CliError> {
    let f = function(config, signature, Some(outputs))?;
    let values = json::from_tuple(&f.decode_return(&parse_hex(data)?)?);

    Output::new(json)
        .field("outputs", f.outputs().canonical_type())
        .field_value("values", values.clone())
        .message(&values.to_string())
        .print();

    Ok(())
}
