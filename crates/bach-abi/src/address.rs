//! Ethereum address with EIP-55 mixed-case checksum

use std::fmt;
use std::str::FromStr;

use bach_crypto::keccak256;
use bach_primitives::U256;

use crate::error::{AbiError, Result};

const PREFIX: &str = "0x";
const ADDRESS_HEX_CHARS: usize = 40;
const ADDRESS_LEN_CHARS: usize = PREFIX.len() + ADDRESS_HEX_CHARS;

/// 160-bit account address
///
/// Displays in EIP-55 checksum form.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address(U256);

impl Address {
    /// Width in bits
    pub const BIT_LEN: usize = 160;

    /// Zero address
    pub const ZERO: Address = Address(U256([0; 4]));

    /// Parse a checksummed address string; the casing must be exactly right
    pub fn wrap(checksum_address: &str) -> Result<Address> {
        validate_checksum_address(checksum_address)?;
        let mut bytes = [0u8; 20];
        hex::decode_to_slice(&checksum_address[PREFIX.len()..], &mut bytes)
            .map_err(|e| AbiError::Checksum(e.to_string()))?;
        Ok(Address::from_bytes(bytes))
    }

    /// Create from an integer of at most 160 bits
    pub fn from_u256(value: U256) -> Result<Address> {
        if value.bits() > Self::BIT_LEN {
            return Err(AbiError::Range(format!(
                "invalid bit length: {}",
                value.bits()
            )));
        }
        Ok(Address(value))
    }

    /// Create from 20 big-endian bytes
    pub fn from_bytes(bytes: [u8; 20]) -> Address {
        Address(U256::from_big_endian(&bytes))
    }

    /// Integer value
    pub fn value(&self) -> U256 {
        self.0
    }

    /// 20 big-endian bytes
    pub fn to_bytes(&self) -> [u8; 20] {
        let mut word = [0u8; 32];
        self.0.to_big_endian(&mut word);
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&word[12..]);
        bytes
    }

    /// EIP-55 checksum string
    pub fn to_checksum_string(&self) -> String {
        apply_checksum(hex::encode(self.to_bytes()).as_bytes())
    }
}

/// Recase a 42-character `0x` address string to its EIP-55 checksum form
pub fn to_checksum_address(address: &str) -> Result<String> {
    if address.len() != ADDRESS_LEN_CHARS {
        return Err(AbiError::Checksum(format!(
            "expected address length {}; actual is {}",
            ADDRESS_LEN_CHARS,
            address.len()
        )));
    }
    if !address.starts_with(PREFIX) {
        return Err(AbiError::Checksum("missing 0x prefix".to_string()));
    }
    let mut lower = [0u8; ADDRESS_HEX_CHARS];
    for (i, b) in address.bytes().enumerate().skip(PREFIX.len()) {
        lower[i - PREFIX.len()] = match b {
            b'0'..=b'9' | b'a'..=b'f' => b,
            b'A'..=b'F' => b.to_ascii_lowercase(),
            _ => return Err(AbiError::Checksum(format!("illegal hex val @ {}", i))),
        };
    }
    Ok(apply_checksum(&lower))
}

/// Succeeds only if `address` is already in exact checksum form
pub fn validate_checksum_address(address: &str) -> Result<()> {
    if to_checksum_address(address)? == address {
        Ok(())
    } else {
        Err(AbiError::Checksum("invalid checksum".to_string()))
    }
}

/// Uppercase each letter whose matching nibble of keccak256(lowercase hex) is >= 8
fn apply_checksum(lower: &[u8]) -> String {
    let hash = keccak256(lower);
    let mut out = String::with_capacity(ADDRESS_LEN_CHARS);
    out.push_str(PREFIX);
    for (i, &c) in lower.iter().enumerate() {
        let nibble = if i % 2 == 0 {
            hash[i / 2] >> 4
        } else {
            hash[i / 2] & 0x0f
        };
        out.push(if nibble >= 8 {
            c.to_ascii_uppercase() as char
        } else {
            c as char
        });
    }
    out
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_checksum_string())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_checksum_string())
    }
}

impl FromStr for Address {
    type Err = AbiError;

    fn from_str(s: &str) -> Result<Self> {
        Address::wrap(s)
    }
}

impl From<[u8; 20]> for Address {
    fn from(bytes: [u8; 20]) -> Self {
        Address::from_bytes(bytes)
    }
}
