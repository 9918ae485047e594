//! Value validation and encoded-length measurement

use crate::error::{AbiError, Location, Result};
use crate::types::{AbiType, ArrayKind, ArrayLength, ArrayType, TupleType, TypeKind};
use crate::value::{Array, Tuple, Value};

/// Size of one encoding word
pub(crate) const UNIT_LENGTH_BYTES: usize = 32;

/// Length of a head slot holding an offset
pub(crate) const OFFSET_LENGTH_BYTES: usize = UNIT_LENGTH_BYTES;

impl AbiType {
    /// Check that `value` conforms to this type.
    ///
    /// Returns the encoded length of the value, excluding the 32-byte offset
    /// slot a dynamic value occupies in its parent's head.
    pub fn validate(&self, value: &Value) -> Result<usize> {
        validate(self, value)
    }

    /// Exact size of [`AbiType::encode`]'s output for `value`
    pub fn measure_encoded_length(&self, value: &Value) -> Result<usize> {
        validate(self, value)
    }
}

impl TupleType {
    /// Check that `values` conforms to this tuple type; returns the encoded length
    pub fn validate(&self, values: &Tuple) -> Result<usize> {
        validate_tuple(self.elements(), values)
    }

    /// Exact size of [`TupleType::encode`]'s output for `values`
    pub fn measure_encoded_length(&self, values: &Tuple) -> Result<usize> {
        self.validate(values)
    }
}

pub(crate) fn round_up(len: usize) -> usize {
    len.div_ceil(UNIT_LENGTH_BYTES) * UNIT_LENGTH_BYTES
}

/// Head slot size plus tail size of `value` within its parent
pub(crate) fn slot_length(ty: &AbiType, value_length: usize) -> usize {
    if ty.is_dynamic() {
        OFFSET_LENGTH_BYTES + value_length
    } else {
        value_length
    }
}

fn length_prefix(length: ArrayLength) -> usize {
    match length {
        ArrayLength::Dynamic => UNIT_LENGTH_BYTES,
        ArrayLength::Fixed(_) => 0,
    }
}

/// Name of the value representation `ty` accepts
pub(crate) fn expected_class(ty: &AbiType) -> &'static str {
    match ty.kind() {
        TypeKind::Bool => "bool",
        TypeKind::Int(_) => "int",
        TypeKind::Long(_) => "long",
        TypeKind::BigInt(_) => "BigInt",
        TypeKind::Decimal { .. } => "Decimal",
        TypeKind::Address => "Address",
        TypeKind::Byte => "byte",
        TypeKind::Array(array) => match array.kind() {
            ArrayKind::Bool => "bool[]",
            ArrayKind::Byte => "bytes",
            ArrayKind::String => "String",
            ArrayKind::Int => "int[]",
            ArrayKind::Long => "long[]",
            ArrayKind::Object => "Value[]",
        },
        TypeKind::Tuple(_) => "Tuple",
    }
}

pub(crate) fn class_mismatch(ty: &AbiType, value: &Value) -> AbiError {
    AbiError::Shape(format!(
        "class mismatch: {} requires {} but found {}",
        ty.canonical_type(),
        expected_class(ty),
        value.class_name()
    ))
}

fn validate(ty: &AbiType, value: &Value) -> Result<usize> {
    match (ty.kind(), value) {
        (TypeKind::Bool, Value::Bool(_)) => Ok(UNIT_LENGTH_BYTES),
        (TypeKind::Int(unit), Value::Int(v)) => {
            unit.check_i64(i64::from(*v))?;
            Ok(UNIT_LENGTH_BYTES)
        }
        (TypeKind::Long(unit), Value::Long(v)) => {
            unit.check_i64(*v)?;
            Ok(UNIT_LENGTH_BYTES)
        }
        (TypeKind::BigInt(unit), Value::BigInt(v)) => {
            unit.check(v)?;
            Ok(UNIT_LENGTH_BYTES)
        }
        (TypeKind::Decimal { unit, scale }, Value::Decimal(d)) => {
            if d.scale() != *scale {
                return Err(AbiError::Range(format!(
                    "decimal scale mismatch: actual != expected: {} != {}",
                    d.scale(),
                    scale
                )));
            }
            unit.check(d.unscaled())?;
            Ok(UNIT_LENGTH_BYTES)
        }
        (TypeKind::Address, Value::Address(_)) => Ok(UNIT_LENGTH_BYTES),
        (TypeKind::Array(array), _) => validate_array(ty, array, value),
        (TypeKind::Tuple(elements), Value::Tuple(values)) => validate_tuple(elements, values),
        _ => Err(class_mismatch(ty, value)),
    }
}

fn check_array_length(ty: &AbiType, array: &ArrayType, actual: usize) -> Result<()> {
    match array.length() {
        ArrayLength::Fixed(expected) if expected != actual => Err(AbiError::Shape(format!(
            "array length mismatch: {} requires length {} but found {}",
            ty.canonical_type(),
            expected,
            actual
        ))),
        _ => Ok(()),
    }
}

fn validate_array(ty: &AbiType, array: &ArrayType, value: &Value) -> Result<usize> {
    let prefix = length_prefix(array.length());
    let element = array.element();
    match (array.kind(), value) {
        (ArrayKind::Byte, Value::Bytes(bytes)) => {
            check_array_length(ty, array, bytes.len())?;
            Ok(prefix + round_up(bytes.len()))
        }
        (ArrayKind::String, Value::String(s)) => {
            check_array_length(ty, array, s.len())?;
            Ok(prefix + round_up(s.len()))
        }
        (ArrayKind::Bool, Value::Array(Array::Bool(values))) => {
            check_array_length(ty, array, values.len())?;
            Ok(prefix + values.len() * UNIT_LENGTH_BYTES)
        }
        (ArrayKind::Int, Value::Array(Array::Int(values))) => {
            check_array_length(ty, array, values.len())?;
            check_native_elements(element, values.iter().map(|v| i64::from(*v)))?;
            Ok(prefix + values.len() * UNIT_LENGTH_BYTES)
        }
        (ArrayKind::Long, Value::Array(Array::Long(values))) => {
            check_array_length(ty, array, values.len())?;
            check_native_elements(element, values.iter().copied())?;
            Ok(prefix + values.len() * UNIT_LENGTH_BYTES)
        }
        (ArrayKind::Object, Value::Array(Array::Object(values))) => {
            check_array_length(ty, array, values.len())?;
            let mut total = prefix;
            for (i, v) in values.iter().enumerate() {
                let len = validate(element, v).map_err(|e| e.at(Location::Array, i))?;
                total += slot_length(element, len);
            }
            Ok(total)
        }
        _ => Err(class_mismatch(ty, value)),
    }
}

fn check_native_elements(element: &AbiType, values: impl Iterator<Item = i64>) -> Result<()> {
    let Some(unit) = element.unit_spec() else {
        return Ok(());
    };
    for (i, v) in values.enumerate() {
        unit.check_i64(v).map_err(|e| e.at(Location::Array, i))?;
    }
    Ok(())
}

pub(crate) fn validate_tuple(elements: &[AbiType], values: &Tuple) -> Result<usize> {
    if values.len() != elements.len() {
        return Err(AbiError::Shape(format!(
            "tuple length mismatch: actual != expected: {} != {}",
            values.len(),
            elements.len()
        )));
    }
    let mut total = 0;
    for (i, (ty, v)) in elements.iter().zip(values.iter()).enumerate() {
        let len = validate(ty, v).map_err(|e| e.at(Location::Tuple, i))?;
        total += slot_length(ty, len);
    }
    Ok(total)
}

/// Encoded length of an already validated value, excluding its head slot
pub(crate) fn byte_length(ty: &AbiType, value: &Value) -> usize {
    match (ty.kind(), value) {
        (TypeKind::Array(array), _) => {
            let prefix = length_prefix(array.length());
            match value {
                Value::Bytes(bytes) => prefix + round_up(bytes.len()),
                Value::String(s) => prefix + round_up(s.len()),
                Value::Array(Array::Object(values)) => {
                    prefix
                        + values
                            .iter()
                            .map(|v| slot_length(array.element(), byte_length(array.element(), v)))
                            .sum::<usize>()
                }
                Value::Array(values) => prefix + values.len() * UNIT_LENGTH_BYTES,
                _ => prefix,
            }
        }
        (TypeKind::Tuple(elements), Value::Tuple(values)) => elements
            .iter()
            .zip(values.iter())
            .map(|(t, v)| slot_length(t, byte_length(t, v)))
            .sum(),
        _ => UNIT_LENGTH_BYTES,
    }
}

/// Encoded size of any value of a static type
pub(crate) fn static_length(ty: &AbiType) -> usize {
    match ty.kind() {
        TypeKind::Array(array) => match array.length() {
            ArrayLength::Fixed(n) if array.is_byte_array() => round_up(n),
            ArrayLength::Fixed(n) => n.saturating_mul(static_length(array.element())),
            ArrayLength::Dynamic => UNIT_LENGTH_BYTES,
        },
        TypeKind::Tuple(elements) => elements
            .iter()
            .map(|t| {
                if t.is_dynamic() {
                    OFFSET_LENGTH_BYTES
                } else {
                    static_length(t)
                }
            })
            .fold(0, usize::saturating_add),
        _ => UNIT_LENGTH_BYTES,
    }
}
