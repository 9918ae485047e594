//! ABI encoding
//!
//! Aggregates are laid out head first: static elements inline, dynamic
//! elements as an offset (relative to the start of the aggregate) into the
//! tail that follows.

use bach_primitives::I256;

use crate::error::Result;
use crate::types::{AbiType, ArrayLength, TupleType, TypeKind};
use crate::validate::{byte_length, class_mismatch, round_up, UNIT_LENGTH_BYTES};
use crate::value::{Array, Tuple, Value};

impl AbiType {
    /// Encode `value` according to this type.
    ///
    /// A top-level dynamic value is written without a leading offset.
    pub fn encode(&self, value: &Value) -> Result<Vec<u8>> {
        let len = self.validate(value)?;
        let mut out = Vec::with_capacity(len);
        encode_tail(self, value, &mut out)?;
        debug_assert_eq!(out.len(), len);
        Ok(out)
    }

    /// Append the encoding of `value` to `out`
    pub fn encode_into(&self, value: &Value, out: &mut Vec<u8>) -> Result<()> {
        let len = self.validate(value)?;
        out.reserve(len);
        encode_tail(self, value, out)
    }
}

impl TupleType {
    /// Encode `values` according to this tuple type
    pub fn encode(&self, values: &Tuple) -> Result<Vec<u8>> {
        let len = self.validate(values)?;
        let mut out = Vec::with_capacity(len);
        encode_objects(self.elements(), values.values(), &mut out)?;
        debug_assert_eq!(out.len(), len);
        Ok(out)
    }

    /// Append the encoding of `values` to `out`
    pub fn encode_into(&self, values: &Tuple, out: &mut Vec<u8>) -> Result<()> {
        let len = self.validate(values)?;
        out.reserve(len);
        encode_objects(self.elements(), values.values(), out)
    }

    /// Encode a list of element values
    pub fn encode_elements(&self, values: Vec<Value>) -> Result<Vec<u8>> {
        self.encode(&Tuple::new(values))
    }
}

/// Write the value encoding of a validated `value`
pub(crate) fn encode_tail(ty: &AbiType, value: &Value, out: &mut Vec<u8>) -> Result<()> {
    match (ty.kind(), value) {
        (TypeKind::Bool, Value::Bool(b)) => encode_bool(*b, out),
        (TypeKind::Int(_), Value::Int(v)) => encode_i64(i64::from(*v), out),
        (TypeKind::Long(_), Value::Long(v)) => encode_i64(*v, out),
        (TypeKind::BigInt(_), Value::BigInt(v)) => encode_i256(v, out),
        (TypeKind::Decimal { .. }, Value::Decimal(d)) => encode_i256(d.unscaled(), out),
        (TypeKind::Address, Value::Address(a)) => {
            let mut word = [0u8; 32];
            a.value().to_big_endian(&mut word);
            out.extend_from_slice(&word);
        }
        (TypeKind::Array(array), _) => {
            let dynamic_length = array.length() == ArrayLength::Dynamic;
            match value {
                Value::Bytes(bytes) => encode_bytes(bytes, dynamic_length, out),
                Value::String(s) => encode_bytes(s.as_bytes(), dynamic_length, out),
                Value::Array(elements) => {
                    if dynamic_length {
                        encode_length(elements.len(), out);
                    }
                    match elements {
                        Array::Bool(v) => v.iter().for_each(|b| encode_bool(*b, out)),
                        Array::Int(v) => v.iter().for_each(|i| encode_i64(i64::from(*i), out)),
                        Array::Long(v) => v.iter().for_each(|l| encode_i64(*l, out)),
                        Array::Object(v) => {
                            let types = std::iter::repeat(array.element()).take(v.len());
                            encode_objects_with(types, v, out)?;
                        }
                    }
                }
                _ => return Err(class_mismatch(ty, value)),
            }
        }
        (TypeKind::Tuple(elements), Value::Tuple(values)) => {
            encode_objects(elements, values.values(), out)?
        }
        _ => return Err(class_mismatch(ty, value)),
    }
    Ok(())
}

fn encode_objects(types: &[AbiType], values: &[Value], out: &mut Vec<u8>) -> Result<()> {
    encode_objects_with(types.iter(), values, out)
}

/// Encode parameters: heads, then the tails of dynamic elements
fn encode_objects_with<'t>(
    types: impl Iterator<Item = &'t AbiType> + Clone,
    values: &[Value],
    out: &mut Vec<u8>,
) -> Result<()> {
    // Calculate head size (fixed part)
    let head_size: usize = types
        .clone()
        .zip(values)
        .map(|(t, v)| {
            if t.is_dynamic() {
                UNIT_LENGTH_BYTES
            } else {
                byte_length(t, v)
            }
        })
        .sum();

    let mut offset = head_size;
    for (t, v) in types.clone().zip(values) {
        if t.is_dynamic() {
            encode_length(offset, out);
            offset += byte_length(t, v);
        } else {
            encode_tail(t, v, out)?;
        }
    }
    for (t, v) in types.zip(values) {
        if t.is_dynamic() {
            encode_tail(t, v, out)?;
        }
    }
    Ok(())
}

fn encode_bool(value: bool, out: &mut Vec<u8>) {
    encode_i64(i64::from(value), out);
}

/// Sign-extended 32-byte word
fn encode_i64(value: i64, out: &mut Vec<u8>) {
    let fill = if value < 0 { 0xff } else { 0x00 };
    out.extend_from_slice(&[fill; 24]);
    out.extend_from_slice(&value.to_be_bytes());
}

fn encode_i256(value: &I256, out: &mut Vec<u8>) {
    out.extend_from_slice(&value.to_be_bytes());
}

/// Lengths and offsets, as unsigned words
fn encode_length(value: usize, out: &mut Vec<u8>) {
    out.extend_from_slice(&[0u8; 24]);
    out.extend_from_slice(&(value as u64).to_be_bytes());
}

/// Optional length word, then data right-padded to a word boundary
fn encode_bytes(data: &[u8], dynamic_length: bool, out: &mut Vec<u8>) {
    if dynamic_length {
        encode_length(data.len(), out);
    }
    out.extend_from_slice(data);
    out.resize(out.len() + round_up(data.len()) - data.len(), 0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::Address;
    use crate::tuple;
    use bach_primitives::{Decimal, U256};

    fn parse(raw: &str) -> AbiType {
        AbiType::parse(raw).unwrap()
    }

    #[test]
    fn test_encode_address() {
        let addr = Address::wrap("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed").unwrap();
        let encoded = parse("address").encode(&addr.into()).unwrap();

        assert_eq!(encoded.len(), 32);
        // Address is left-padded within its word
        assert_eq!(&encoded[..12], &[0u8; 12]);
        assert_eq!(&encoded[12..], &addr.to_bytes());
    }

    #[test]
    fn test_encode_bool() {
        let encoded_true = parse("bool").encode(&true.into()).unwrap();
        let encoded_false = parse("bool").encode(&false.into()).unwrap();

        assert_eq!(encoded_true[31], 1);
        assert_eq!(encoded_false, vec![0u8; 32]);
    }

    #[test]
    fn test_encode_negative_sign_extends() {
        let encoded = parse("int16").encode(&Value::Int(-11)).unwrap();
        assert_eq!(&encoded[..31], &[0xff; 31]);
        assert_eq!(encoded[31], 0xf5);

        let encoded = parse("int256")
            .encode(&Value::BigInt(I256::from(-1i64)))
            .unwrap();
        assert_eq!(encoded, vec![0xff; 32]);
    }

    #[test]
    fn test_encode_uint256_max() {
        let encoded = parse("uint")
            .encode(&Value::BigInt(I256::from_u256(U256::MAX)))
            .unwrap();
        assert_eq!(encoded, vec![0xff; 32]);
    }

    #[test]
    fn test_encode_bytes32() {
        let data = vec![0x42u8; 32];
        let encoded = parse("bytes32").encode(&data.clone().into()).unwrap();
        assert_eq!(encoded, data);
    }

    #[test]
    fn test_encode_fixed_bytes_right_pads() {
        let encoded = parse("bytes3").encode(&vec![1u8, 2, 3].into()).unwrap();
        assert_eq!(encoded.len(), 32);
        assert_eq!(&encoded[..3], &[1, 2, 3]);
        assert_eq!(&encoded[3..], &[0u8; 29]);
    }

    #[test]
    fn test_encode_dynamic_bytes_in_tuple() {
        let data = vec![0x01, 0x02, 0x03];
        let t = TupleType::parse("(bytes)").unwrap();
        let encoded = t.encode(&tuple![data.clone()]).unwrap();

        // offset + length + padded data
        assert_eq!(encoded.len(), 96);
        assert_eq!(encoded[31], 32);
        assert_eq!(encoded[63], 3);
        assert_eq!(&encoded[64..67], &data[..]);
    }

    #[test]
    fn test_encode_top_level_dynamic_has_no_offset() {
        let encoded = parse("string").encode(&"hello".into()).unwrap();
        assert_eq!(encoded.len(), 64);
        assert_eq!(encoded[31], 5);
        assert_eq!(&encoded[32..37], b"hello");
    }

    #[test]
    fn test_encode_decimal_uses_unscaled() {
        let encoded = parse("ufixed")
            .encode(&Decimal::new(69i64, 18).into())
            .unwrap();
        assert_eq!(encoded[31], 0x45);
    }

    #[test]
    fn test_encode_elements() {
        let t = TupleType::parse("(uint64,uint32,bool[])").unwrap();
        let encoded = t
            .encode_elements(vec![
                I256::from(7i64).into(),
                9i64.into(),
                Vec::<bool>::new().into(),
            ])
            .unwrap();
        assert_eq!(
            hex::encode(encoded),
            concat!(
                "0000000000000000000000000000000000000000000000000000000000000007",
                "0000000000000000000000000000000000000000000000000000000000000009",
                "0000000000000000000000000000000000000000000000000000000000000060",
                "0000000000000000000000000000000000000000000000000000000000000000",
            )
        );
    }

    #[test]
    fn test_encode_into_appends() {
        let mut out = vec![0xaa];
        parse("uint8").encode_into(&Value::Int(1), &mut out).unwrap();
        assert_eq!(out.len(), 33);
        assert_eq!(out[0], 0xaa);
        assert_eq!(out[32], 1);
    }

    #[test]
    fn test_encode_rejects_invalid_without_output() {
        let err = parse("uint8").encode(&Value::Int(256)).unwrap_err();
        assert_eq!(err.to_string(), "unsigned val exceeds bit limit: 9 > 8");
    }
}
