//! Address checksum commands

use bach_abi::{to_checksum_address, validate_checksum_address};
use clap::Subcommand;

use crate::{config::Config, output::Output, CliError};

/// Address subcommands
#[derive(Debug, Subcommand)]
pub enum AddressCommand {
    /// Convert an address to its mixed-case checksum form
    Checksum {
        /// Address with 0x prefix, any case
        address: String,
    },
    /// Check that an address carries a valid checksum
    Validate {
        /// Checksum address
        address: String,
    },
}

impl AddressCommand {
    pub fn execute(self, _config: &Config, json: bool) -> Result<(), CliError> {
        match self {
            AddressCommand::Checksum { address } => checksum(&address, json),
            AddressCommand::Validate { address } => validate(&address, json),
        }
    }
}

fn checksum(address: &str, json: bool) -> Result<(), CliError> {
    let checksummed = to_checksum_address(address)?;

    Output::new(json)
        .field("address", &checksummed)
        .message(&checksummed)
        .print();

    Ok(())
}

fn validate(address: &str, json: bool) -> Result<(), CliError> {
    validate_checksum_address(address)?;

    Output::new(json)
        .field("address", address)
        .field_bool("valid", true)
        .message(&format!("{} is a valid checksum address", address))
        .print();

    Ok(())
}
