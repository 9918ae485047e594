//! Conversion between JSON arguments and ABI values
//!
//! Integers are accepted as JSON numbers or as decimal / `0x` hex strings,
//! decimals as plain strings or numbers, byte arrays as `0x` hex strings.
//! Integers wider than 64 bits and decimals are printed as strings.

use std::str::FromStr;

use bach_abi::{
    to_checksum_address, AbiType, Address, Array, ArrayKind, Decimal, Tuple, TupleType, TypeKind,
    Value, I256,
};
use serde_json::Value as Json;

use crate::{commands::parse_hex, CliError};

fn invalid(ty: &AbiType, found: &Json) -> CliError {
    CliError::InvalidInput(format!("{} cannot be built from {}", ty.canonical_type(), found))
}

fn integer(ty: &AbiType, json: &Json) -> Result<I256, CliError> {
    match json {
        Json::Number(n) => {
            if let Some(v) = n.as_i64() {
                Ok(I256::from(v))
            } else if let Some(v) = n.as_u64() {
                Ok(I256::from(v))
            } else {
                Err(invalid(ty, json))
            }
        }
        Json::String(s) => I256::from_str(s).map_err(|e| CliError::InvalidInput(e.to_string())),
        _ => Err(invalid(ty, json)),
    }
}

fn native(ty: &AbiType, json: &Json) -> Result<i64, CliError> {
    let value = integer(ty, json)?;
    value
        .to_i64()
        .ok_or_else(|| CliError::InvalidInput(format!("{} out of range for {}", value, ty)))
}

fn int32(ty: &AbiType, json: &Json) -> Result<i32, CliError> {
    let value = native(ty, json)?;
    i32::try_from(value)
        .map_err(|_| CliError::InvalidInput(format!("{} out of range for {}", value, ty)))
}

fn elements<'a>(ty: &AbiType, json: &'a Json) -> Result<&'a Vec<Json>, CliError> {
    json.as_array().ok_or_else(|| invalid(ty, json))
}

/// Build a value of type `ty` from its JSON form
pub fn to_value(ty: &AbiType, json: &Json) -> Result<Value, CliError> {
    match ty.kind() {
        TypeKind::Bool => json.as_bool().map(Value::Bool).ok_or_else(|| invalid(ty, json)),
        TypeKind::Int(_) => int32(ty, json).map(Value::Int),
        TypeKind::Long(_) => native(ty, json).map(Value::Long),
        TypeKind::BigInt(_) => integer(ty, json).map(Value::BigInt),
        TypeKind::Decimal { scale, .. } => {
            let text = match json {
                Json::String(s) => s.clone(),
                Json::Number(n) => n.to_string(),
                _ => return Err(invalid(ty, json)),
            };
            let parsed =
                Decimal::from_str(&text).map_err(|e| CliError::InvalidInput(e.to_string()))?;
            parsed.rescale(*scale).map(Value::Decimal).ok_or_else(|| {
                CliError::InvalidInput(format!("{} does not fit scale {}", text, scale))
            })
        }
        TypeKind::Address => {
            let text = json.as_str().ok_or_else(|| invalid(ty, json))?;
            Ok(Value::Address(Address::wrap(&to_checksum_address(text)?)?))
        }
        TypeKind::Byte => Err(invalid(ty, json)),
        TypeKind::Array(array) => match array.kind() {
            ArrayKind::Byte => {
                let text = json.as_str().ok_or_else(|| invalid(ty, json))?;
                Ok(Value::Bytes(parse_hex(text)?))
            }
            ArrayKind::String => json
                .as_str()
                .map(|s| Value::String(s.to_string()))
                .ok_or_else(|| invalid(ty, json)),
            ArrayKind::Bool => elements(ty, json)?
                .iter()
                .map(|j| j.as_bool().ok_or_else(|| invalid(array.element(), j)))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::from),
            ArrayKind::Int => elements(ty, json)?
                .iter()
                .map(|j| int32(array.element(), j))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::from),
            ArrayKind::Long => elements(ty, json)?
                .iter()
                .map(|j| native(array.element(), j))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::from),
            ArrayKind::Object => elements(ty, json)?
                .iter()
                .map(|j| to_value(array.element(), j))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::from),
        },
        TypeKind::Tuple(types) => to_tuple_elements(types, elements(ty, json)?).map(Value::Tuple),
    }
}

fn to_tuple_elements(types: &[AbiType], values: &[Json]) -> Result<Tuple, CliError> {
    if types.len() != values.len() {
        return Err(CliError::InvalidInput(format!(
            "expected {} arguments, found {}",
            types.len(),
            values.len()
        )));
    }
    types
        .iter()
        .zip(values)
        .map(|(t, j)| to_value(t, j))
        .collect()
}

/// Build a tuple of arguments from a JSON array
pub fn to_tuple(ty: &TupleType, json: &Json) -> Result<Tuple, CliError> {
    let values = json.as_array().ok_or_else(|| {
        CliError::InvalidInput(format!("{} arguments must be a JSON array", ty))
    })?;
    to_tuple_elements(ty.elements(), values)
}

/// JSON form of a decoded value
pub fn from_value(value: &Value) -> Json {
    match value {
        Value::Bool(b) => Json::Bool(*b),
        Value::Int(v) => Json::from(*v),
        Value::Long(v) => Json::from(*v),
        Value::BigInt(v) => Json::String(v.to_string()),
        Value::Decimal(d) => Json::String(d.to_string()),
        Value::Address(a) => Json::String(a.to_string()),
        Value::Bytes(b) => Json::String(format!("0x{}", hex::encode(b))),
        Value::String(s) => Json::String(s.clone()),
        Value::Array(Array::Bool(v)) => Json::from(v.clone()),
        Value::Array(Array::Int(v)) => Json::from(v.clone()),
        Value::Array(Array::Long(v)) => Json::from(v.clone()),
        Value::Array(Array::Object(v)) => Json::Array(v.iter().map(from_value).collect()),
        Value::Tuple(t) => from_tuple(t),
    }
}

/// JSON array of tuple elements
pub fn from_tuple(tuple: &Tuple) -> Json {
    Json::Array(tuple.iter().map(from_value).collect())
}
