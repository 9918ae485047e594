//! Non-standard packed encoding
//!
//! Values are concatenated without offsets or length words. Scalars take
//! their minimal width (`bits / 8` bytes, one byte for `bool`, 20 for
//! `address`) except inside arrays, where every element is padded to a full
//! word. Packed output is not decodable in general.

use bach_primitives::I256;

use crate::error::Result;
use crate::types::{AbiType, TupleType, TypeKind, UnitSpec};
use crate::validate::{class_mismatch, round_up, UNIT_LENGTH_BYTES};
use crate::value::{Array, Tuple, Value};

impl AbiType {
    /// Packed encoding of `value`
    pub fn encode_packed(&self, value: &Value) -> Result<Vec<u8>> {
        self.validate(value)?;
        let mut out = Vec::with_capacity(packed_length(self, value, false));
        encode_packed(self, value, false, &mut out)?;
        Ok(out)
    }

    /// Length of [`AbiType::encode_packed`]'s output for `value`
    pub fn byte_length_packed(&self, value: &Value) -> Result<usize> {
        self.validate(value)?;
        Ok(packed_length(self, value, false))
    }
}

impl TupleType {
    /// Packed encoding of `values`: element encodings concatenated
    pub fn encode_packed(&self, values: &Tuple) -> Result<Vec<u8>> {
        self.as_type().encode_packed(&Value::Tuple(values.clone()))
    }

    /// Length of [`TupleType::encode_packed`]'s output for `values`
    pub fn byte_length_packed(&self, values: &Tuple) -> Result<usize> {
        self.validate(values)?;
        Ok(self
            .iter()
            .zip(values.iter())
            .map(|(t, v)| packed_length(t, v, false))
            .sum())
    }
}

fn scalar_width(unit: &UnitSpec, in_array: bool) -> usize {
    if in_array {
        UNIT_LENGTH_BYTES
    } else {
        unit.bits() as usize / 8
    }
}

fn packed_length(ty: &AbiType, value: &Value, in_array: bool) -> usize {
    match (ty.kind(), value) {
        (TypeKind::Bool, _) => {
            if in_array {
                UNIT_LENGTH_BYTES
            } else {
                1
            }
        }
        (TypeKind::Int(unit), _)
        | (TypeKind::Long(unit), _)
        | (TypeKind::BigInt(unit), _)
        | (TypeKind::Decimal { unit, .. }, _) => scalar_width(unit, in_array),
        (TypeKind::Address, _) => {
            if in_array {
                UNIT_LENGTH_BYTES
            } else {
                20
            }
        }
        (TypeKind::Array(array), _) => match value {
            Value::Bytes(b) if in_array => round_up(b.len()),
            Value::String(s) if in_array => round_up(s.len()),
            Value::Bytes(b) => b.len(),
            Value::String(s) => s.len(),
            Value::Array(Array::Object(values)) => values
                .iter()
                .map(|v| packed_length(array.element(), v, true))
                .sum(),
            Value::Array(values) => values.len() * UNIT_LENGTH_BYTES,
            _ => 0,
        },
        (TypeKind::Tuple(elements), Value::Tuple(values)) => elements
            .iter()
            .zip(values.iter())
            .map(|(t, v)| packed_length(t, v, in_array))
            .sum(),
        _ => 0,
    }
}

/// Low `width` bytes of the two's complement word
fn put_integer(value: &I256, width: usize, out: &mut Vec<u8>) {
    let word = value.to_be_bytes();
    out.extend_from_slice(&word[UNIT_LENGTH_BYTES - width..]);
}

fn encode_packed(ty: &AbiType, value: &Value, in_array: bool, out: &mut Vec<u8>) -> Result<()> {
    match (ty.kind(), value) {
        (TypeKind::Bool, Value::Bool(b)) => {
            put_integer(&I256::from(i64::from(*b)), if in_array { 32 } else { 1 }, out)
        }
        (TypeKind::Int(unit), Value::Int(v)) => {
            put_integer(&I256::from(*v), scalar_width(unit, in_array), out)
        }
        (TypeKind::Long(unit), Value::Long(v)) => {
            put_integer(&I256::from(*v), scalar_width(unit, in_array), out)
        }
        (TypeKind::BigInt(unit), Value::BigInt(v)) => {
            put_integer(v, scalar_width(unit, in_array), out)
        }
        (TypeKind::Decimal { unit, .. }, Value::Decimal(d)) => {
            put_integer(d.unscaled(), scalar_width(unit, in_array), out)
        }
        (TypeKind::Address, Value::Address(a)) => {
            if in_array {
                out.extend_from_slice(&[0u8; 12]);
            }
            out.extend_from_slice(&a.to_bytes());
        }
        (TypeKind::Array(array), _) => match value {
            Value::Bytes(b) => put_bytes(b, in_array, out),
            Value::String(s) => put_bytes(s.as_bytes(), in_array, out),
            Value::Array(Array::Bool(v)) => {
                for b in v {
                    put_integer(&I256::from(i64::from(*b)), UNIT_LENGTH_BYTES, out);
                }
            }
            Value::Array(Array::Int(v)) => {
                for i in v {
                    put_integer(&I256::from(*i), UNIT_LENGTH_BYTES, out);
                }
            }
            Value::Array(Array::Long(v)) => {
                for l in v {
                    put_integer(&I256::from(*l), UNIT_LENGTH_BYTES, out);
                }
            }
            Value::Array(Array::Object(v)) => {
                for element in v {
                    encode_packed(array.element(), element, true, out)?;
                }
            }
            _ => return Err(class_mismatch(ty, value)),
        },
        (TypeKind::Tuple(elements), Value::Tuple(values)) => {
            for (t, v) in elements.iter().zip(values.iter()) {
                encode_packed(t, v, in_array, out)?;
            }
        }
        _ => return Err(class_mismatch(ty, value)),
    }
    Ok(())
}

fn put_bytes(data: &[u8], in_array: bool, out: &mut Vec<u8>) {
    out.extend_from_slice(data);
    if in_array {
        out.resize(out.len() + round_up(data.len()) - data.len(), 0);
    }
}
