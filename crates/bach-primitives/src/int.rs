//! Signed 256-bit integer

use std::cmp::Ordering;
use std::fmt;
use std::ops::Neg;
use std::str::FromStr;

use primitive_types::U256;

use crate::PrimitiveError;

/// Signed integer with a 256-bit magnitude
///
/// Stored in sign-magnitude form; zero is never negative. The magnitude may use
/// all 256 bits, so values wider than the two's-complement `int256` range are
/// representable. Callers that need a 32-byte word check [`I256::bit_length`]
/// against their limit before calling [`I256::to_be_bytes`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct I256 {
    abs: U256,
    negative: bool,
}

impl I256 {
    /// Zero
    pub const ZERO: I256 = I256 {
        abs: U256([0; 4]),
        negative: false,
    };

    /// Create from magnitude and sign
    pub fn new(abs: U256, negative: bool) -> Self {
        Self {
            abs,
            negative: negative && !abs.is_zero(),
        }
    }

    /// Create a non-negative value
    pub fn from_u256(abs: U256) -> Self {
        Self {
            abs,
            negative: false,
        }
    }

    /// Create from i128
    pub fn from_i128(value: i128) -> Self {
        Self::new(U256::from(value.unsigned_abs()), value < 0)
    }

    /// Magnitude
    pub fn magnitude(&self) -> U256 {
        self.abs
    }

    /// Check if negative
    pub fn is_negative(&self) -> bool {
        self.negative
    }

    /// Check if zero
    pub fn is_zero(&self) -> bool {
        self.abs.is_zero()
    }

    /// Minimal two's-complement width, excluding the sign bit.
    ///
    /// For non-negative values this is the position of the highest set bit;
    /// for negative values it is the width of `-self - 1`. `-128` has a bit
    /// length of 7 and `128` has a bit length of 8.
    pub fn bit_length(&self) -> usize {
        if self.negative {
            (self.abs - U256::one()).bits()
        } else {
            self.abs.bits()
        }
    }

    /// Convert to i64 if it fits
    pub fn to_i64(&self) -> Option<i64> {
        self.to_i128().and_then(|v| i64::try_from(v).ok())
    }

    /// Convert to i128 if it fits
    pub fn to_i128(&self) -> Option<i128> {
        if self.bit_length() > 127 {
            return None;
        }
        let low = self.abs.low_u128();
        Some(if self.negative {
            // bit_length <= 127 bounds the magnitude by 2^127
            (low as i128).wrapping_neg()
        } else {
            low as i128
        })
    }

    /// 32-byte big-endian two's-complement word (modulo 2^256)
    pub fn to_be_bytes(&self) -> [u8; 32] {
        let word = if self.negative {
            (!self.abs).overflowing_add(U256::one()).0
        } else {
            self.abs
        };
        let mut out = [0u8; 32];
        word.to_big_endian(&mut out);
        out
    }

    /// Interpret a 32-byte word as a two's-complement signed value
    pub fn from_be_bytes_signed(word: &[u8; 32]) -> Self {
        let raw = U256::from_big_endian(word);
        if word[0] & 0x80 != 0 {
            Self::new((!raw).overflowing_add(U256::one()).0, true)
        } else {
            Self::from_u256(raw)
        }
    }

    /// Interpret a 32-byte word as an unsigned value
    pub fn from_be_bytes_unsigned(word: &[u8; 32]) -> Self {
        Self::from_u256(U256::from_big_endian(word))
    }

    /// Parse a decimal string with optional sign
    pub fn from_dec_str(s: &str) -> Result<Self, PrimitiveError> {
        let (negative, digits, base_index) = split_sign(s);
        Ok(Self::new(parse_radix(digits, 10, base_index, s)?, negative))
    }

    /// Parse a hex string with optional sign and optional `0x` prefix
    pub fn from_hex_str(s: &str) -> Result<Self, PrimitiveError> {
        let (negative, rest, base_index) = split_sign(s);
        let (digits, base_index) = match rest.strip_prefix("0x") {
            Some(d) => (d, base_index + 2),
            None => (rest, base_index),
        };
        Ok(Self::new(parse_radix(digits, 16, base_index, s)?, negative))
    }
}

fn split_sign(s: &str) -> (bool, &str, usize) {
    if let Some(rest) = s.strip_prefix('-') {
        (true, rest, 1)
    } else if let Some(rest) = s.strip_prefix('+') {
        (false, rest, 1)
    } else {
        (false, s, 0)
    }
}

fn parse_radix(digits: &str, radix: u32, base_index: usize, original: &str) -> Result<U256, PrimitiveError> {
    if digits.is_empty() {
        return Err(PrimitiveError::Empty);
    }
    let radix_u256 = U256::from(radix);
    let mut acc = U256::zero();
    for (i, ch) in digits.char_indices() {
        let digit = ch.to_digit(radix).ok_or(PrimitiveError::InvalidDigit {
            ch,
            index: base_index + i,
        })?;
        acc = acc
            .checked_mul(radix_u256)
            .and_then(|v| v.checked_add(U256::from(digit)))
            .ok_or_else(|| PrimitiveError::Overflow(original.to_string()))?;
    }
    Ok(acc)
}

impl Ord for I256 {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.negative, other.negative) {
            (false, false) => self.abs.cmp(&other.abs),
            (true, true) => other.abs.cmp(&self.abs),
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
        }
    }
}

impl PartialOrd for I256 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Neg for I256 {
    type Output = I256;

    fn neg(self) -> I256 {
        I256::new(self.abs, !self.negative)
    }
}

impl fmt::Display for I256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative {
            write!(f, "-{}", self.abs)
        } else {
            write!(f, "{}", self.abs)
        }
    }
}

impl fmt::Debug for I256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "I256({})", self)
    }
}

impl FromStr for I256 {
    type Err = PrimitiveError;

    /// Accepts decimal, or hex when prefixed with `0x` (after the sign)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unsigned = s.trim_start_matches(['-', '+']);
        if unsigned.starts_with("0x") {
            Self::from_hex_str(s)
        } else {
            Self::from_dec_str(s)
        }
    }
}

impl From<i32> for I256 {
    fn from(value: i32) -> Self {
        Self::from_i128(value.into())
    }
}

impl From<i64> for I256 {
    fn from(value: i64) -> Self {
        Self::from_i128(value.into())
    }
}

impl From<u64> for I256 {
    fn from(value: u64) -> Self {
        Self::from_u256(U256::from(value))
    }
}

impl From<i128> for I256 {
    fn from(value: i128) -> Self {
        Self::from_i128(value)
    }
}

impl From<U256> for I256 {
    fn from(value: U256) -> Self {
        Self::from_u256(value)
    }
}
