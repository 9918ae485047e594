//! Hex dump of encoded buffers, one 32-byte word per line

use crate::error::{AbiError, Result};
use crate::function::Function;
use crate::validate::UNIT_LENGTH_BYTES;

const LABEL_LEN: usize = 6;
const LABEL_PADDED_LEN: usize = LABEL_LEN + 3;

/// Row label style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Labels {
    /// No labels
    None,
    /// Zero-based row numbers
    RowNumbers,
    /// Hex byte offset of each row
    #[default]
    Offsets,
}

impl Labels {
    fn label(&self, row: usize) -> String {
        match self {
            Labels::None => String::new(),
            Labels::RowNumbers => pad(0, &row.to_string()),
            Labels::Offsets => {
                let unpadded = format!("{:x}", row * UNIT_LENGTH_BYTES);
                pad(LABEL_LEN.saturating_sub(unpadded.len()), &unpadded)
            }
        }
    }
}

impl std::str::FromStr for Labels {
    type Err = AbiError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "none" => Ok(Labels::None),
            "rows" | "row-numbers" => Ok(Labels::RowNumbers),
            "offsets" => Ok(Labels::Offsets),
            _ => Err(AbiError::Grammar(format!("unknown label style: \"{}\"", s))),
        }
    }
}

/// Format an encoding with offset labels
pub fn format(abi: &[u8]) -> Result<String> {
    format_with(abi, Labels::Offsets)
}

/// Format an encoding
pub fn format_with(abi: &[u8], labels: Labels) -> Result<String> {
    check_is_multiple(abi.len())?;
    Ok(finish(abi, 0, labels, String::new()))
}

/// Format call data with row-number labels; the selector gets its own `ID` row
pub fn format_call(call: &[u8]) -> Result<String> {
    format_call_with(call, Labels::RowNumbers)
}

/// Format call data
pub fn format_call_with(call: &[u8], labels: Labels) -> Result<String> {
    if call.len() < Function::SELECTOR_LEN {
        return Err(AbiError::Format(format!(
            "call data shorter than selector: {} < {}",
            call.len(),
            Function::SELECTOR_LEN
        )));
    }
    check_is_multiple(call.len() - Function::SELECTOR_LEN)?;
    let mut out = if labels == Labels::None {
        String::new()
    } else {
        pad(0, "ID")
    };
    out.push_str(&hex::encode(&call[..Function::SELECTOR_LEN]));
    Ok(finish(call, Function::SELECTOR_LEN, labels, out))
}

fn check_is_multiple(len: usize) -> Result<()> {
    match len % UNIT_LENGTH_BYTES {
        0 => Ok(()),
        rem => Err(AbiError::Format(format!(
            "expected length mod {} == 0, found: {}",
            UNIT_LENGTH_BYTES, rem
        ))),
    }
}

fn finish(buffer: &[u8], start: usize, labels: Labels, mut out: String) -> String {
    for (row, word) in buffer[start..].chunks(UNIT_LENGTH_BYTES).enumerate() {
        if start > 0 || row > 0 {
            out.push('\n');
        }
        out.push_str(&labels.label(row));
        out.push_str(&hex::encode(word));
    }
    out
}

fn pad(left_padding: usize, unpadded: &str) -> String {
    let right_padding = LABEL_PADDED_LEN.saturating_sub(left_padding + unpadded.len());
    format!(
        "{}{}{}",
        " ".repeat(left_padding),
        unpadded,
        " ".repeat(right_padding)
    )
}
