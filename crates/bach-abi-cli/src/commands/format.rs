//! Hex dump command

use bach_abi::{format_call_with, format_with, Labels};

use super::parse_hex;
use crate::{config::Config, output::Output, CliError};

/// Dump `data` one word per line, labelled per `labels` or the configured style
pub fn execute(
    config: &Config,
    data: &str,
    call: bool,
    labels: Option<Labels>,
    json: bool,
) -> Result<(), CliError> {
    let labels = match labels {
        Some(labels) => labels,
        None => config.label_style()?,
    };
    let bytes = parse_hex(data)?;
    let dump = if call {
        format_call_with(&bytes, labels)?
    } else {
        format_with(&bytes, labels)?
    };

    Output::new(json)
        .field_value("rows", dump.lines().collect())
        .message(&dump)
        .print();

    Ok(())
}
