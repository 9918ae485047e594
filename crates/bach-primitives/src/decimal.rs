//! Fixed-point decimal value

use std::fmt;
use std::str::FromStr;

use primitive_types::U256;

use crate::{PrimitiveError, I256};

/// Decimal number `unscaled * 10^-scale`
///
/// Equality is structural: `1.0` and `1.00` differ because their scales differ.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Decimal {
    unscaled: I256,
    scale: u32,
}

impl Decimal {
    /// Create from an unscaled integer and a base-10 scale
    pub fn new(unscaled: impl Into<I256>, scale: u32) -> Self {
        Self {
            unscaled: unscaled.into(),
            scale,
        }
    }

    /// Unscaled integer value
    pub fn unscaled(&self) -> &I256 {
        &self.unscaled
    }

    /// Number of fractional digits
    pub fn scale(&self) -> u32 {
        self.scale
    }

    /// Re-express with a different scale without losing precision.
    ///
    /// Returns `None` if digits would be dropped or the magnitude would
    /// overflow 256 bits.
    pub fn rescale(&self, scale: u32) -> Option<Decimal> {
        if scale == self.scale {
            return Some(*self);
        }
        let magnitude = self.unscaled.magnitude();
        let scaled = if scale > self.scale {
            let factor = pow10(scale - self.scale)?;
            magnitude.checked_mul(factor)?
        } else {
            let factor = pow10(self.scale - scale)?;
            if !(magnitude % factor).is_zero() {
                return None;
            }
            magnitude / factor
        };
        Some(Decimal::new(
            I256::new(scaled, self.unscaled.is_negative()),
            scale,
        ))
    }
}

fn pow10(exp: u32) -> Option<U256> {
    let ten = U256::from(10u8);
    (0..exp).try_fold(U256::one(), |acc, _| acc.checked_mul(ten))
}

impl fmt::Display for Decimal {
    /// Plain notation, never scientific
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.unscaled.magnitude().to_string();
        let sign = if self.unscaled.is_negative() { "-" } else { "" };
        let scale = self.scale as usize;
        if scale == 0 {
            return write!(f, "{sign}{digits}");
        }
        let padded = if digits.len() <= scale {
            format!("{}{}", "0".repeat(scale + 1 - digits.len()), digits)
        } else {
            digits
        };
        let (int_part, frac_part) = padded.split_at(padded.len() - scale);
        write!(f, "{sign}{int_part}.{frac_part}")
    }
}

impl fmt::Debug for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Decimal({})", self)
    }
}

impl FromStr for Decimal {
    type Err = PrimitiveError;

    /// Parses `[-+]digits[.digits]`; the scale is the number of fractional digits written
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.find('.') {
            Some(dot) => {
                let frac = &s[dot + 1..];
                if let Some(index) = frac.find(|c: char| !c.is_ascii_digit()) {
                    let ch = frac[index..].chars().next().unwrap_or('.');
                    return Err(PrimitiveError::InvalidDigit {
                        ch,
                        index: dot + 1 + index,
                    });
                }
                let joined = format!("{}{}", &s[..dot], frac);
                let scale = u32::try_from(frac.len())
                    .map_err(|_| PrimitiveError::Overflow(s.to_string()))?;
                Ok(Decimal::new(I256::from_dec_str(&joined)?, scale))
            }
            None => Ok(Decimal::new(I256::from_dec_str(s)?, 0)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_plain() {
        assert_eq!(Decimal::new(69i64, 18).to_string(), "0.000000000000000069");
        assert_eq!(Decimal::new(-12345i64, 2).to_string(), "-123.45");
        assert_eq!(Decimal::new(5i64, 0).to_string(), "5");
        assert_eq!(Decimal::new(0i64, 3).to_string(), "0.000");
        assert_eq!(Decimal::new(100i64, 2).to_string(), "1.00");
    }

    #[test]
    fn test_parse() {
        let d: Decimal = "0.000000000000000069".parse().unwrap();
        assert_eq!(d, Decimal::new(69i64, 18));

        let d: Decimal = "-123.45".parse().unwrap();
        assert_eq!(d, Decimal::new(-12345i64, 2));

        let d: Decimal = "7".parse().unwrap();
        assert_eq!(d.scale(), 0);
    }

    #[test]
    fn test_parse_errors() {
        assert!("1.2.3".parse::<Decimal>().is_err());
        assert!("1e5".parse::<Decimal>().is_err());
        assert!(".".parse::<Decimal>().is_err());
    }

    #[test]
    fn test_scale_is_part_of_equality() {
        assert_ne!(Decimal::new(10i64, 1), Decimal::new(100i64, 2));
    }

    #[test]
    fn test_rescale() {
        let d = Decimal::new(15i64, 1);
        assert_eq!(d.rescale(3), Some(Decimal::new(1500i64, 3)));
        assert_eq!(Decimal::new(1500i64, 3).rescale(1), Some(d));
        assert_eq!(Decimal::new(1501i64, 3).rescale(1), None);
        assert_eq!(Decimal::new(-2i64, 0).rescale(2), Some(Decimal::new(-200i64, 2)));
        assert_eq!(Decimal::new(1i64, 0).rescale(100), None);
    }
}
