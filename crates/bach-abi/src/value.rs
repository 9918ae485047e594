//! ABI values

use std::ops::Index;

use bach_primitives::{Decimal, I256};

use crate::address::Address;
use crate::types::ArrayKind;

/// A value of some ABI type
///
/// Each numeric type has one accepted representation, chosen by its width:
/// `Int` for types whose values fit an `i32`, `Long` for `i64`, `BigInt`
/// beyond that. Byte arrays (`bytes`, `bytesN`, `function`) are `Bytes` and
/// `string` is `String`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// `bool`
    Bool(bool),
    /// Narrow integers (`uint8`..`uint24`, `int8`..`int32`)
    Int(i32),
    /// Medium integers (`uint32`..`uint56`, `int40`..`int64`)
    Long(i64),
    /// Wide integers (`uint64`..`uint256`, `int72`..`int256`)
    BigInt(I256),
    /// `fixedMxN` / `ufixedMxN`
    Decimal(Decimal),
    /// `address`
    Address(Address),
    /// `bytes`, `bytesN`, `function`
    Bytes(Vec<u8>),
    /// `string`
    String(String),
    /// Any other array
    Array(Array),
    /// Tuple
    Tuple(Tuple),
}

/// Array value, tagged by element representation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Array {
    /// Elements of `bool[]`
    Bool(Vec<bool>),
    /// Elements of narrow integer arrays
    Int(Vec<i32>),
    /// Elements of medium integer arrays
    Long(Vec<i64>),
    /// Elements of all other arrays
    Object(Vec<Value>),
}

impl Array {
    /// Number of elements
    pub fn len(&self) -> usize {
        match self {
            Array::Bool(v) => v.len(),
            Array::Int(v) => v.len(),
            Array::Long(v) => v.len(),
            Array::Object(v) => v.len(),
        }
    }

    /// Whether there are no elements
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Container kind
    pub fn kind(&self) -> ArrayKind {
        match self {
            Array::Bool(_) => ArrayKind::Bool,
            Array::Int(_) => ArrayKind::Int,
            Array::Long(_) => ArrayKind::Long,
            Array::Object(_) => ArrayKind::Object,
        }
    }

    /// Element at `index` as a [`Value`]
    pub fn get(&self, index: usize) -> Option<Value> {
        match self {
            Array::Bool(v) => v.get(index).map(|b| Value::Bool(*b)),
            Array::Int(v) => v.get(index).map(|i| Value::Int(*i)),
            Array::Long(v) => v.get(index).map(|l| Value::Long(*l)),
            Array::Object(v) => v.get(index).cloned(),
        }
    }
}

/// Ordered, fixed-size sequence of values
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Tuple(Vec<Value>);

impl Tuple {
    /// Create from values
    pub fn new(values: Vec<Value>) -> Self {
        Tuple(values)
    }

    /// `()`
    pub fn empty() -> Self {
        Tuple(Vec::new())
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no elements
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Element at `index`
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.0.get(index)
    }

    /// All elements
    pub fn values(&self) -> &[Value] {
        &self.0
    }

    /// Iterate over elements
    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.0.iter()
    }

    /// Take the elements
    pub fn into_values(self) -> Vec<Value> {
        self.0
    }
}

impl Index<usize> for Tuple {
    type Output = Value;

    fn index(&self, index: usize) -> &Value {
        &self.0[index]
    }
}

impl FromIterator<Value> for Tuple {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Tuple(iter.into_iter().collect())
    }
}

impl IntoIterator for Tuple {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Tuple {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Build a [`Tuple`] from expressions convertible into [`Value`]
///
/// ```
/// use bach_abi::{tuple, Value};
///
/// let args = tuple![69i64, true];
/// assert_eq!(args[0], Value::Long(69));
/// ```
#[macro_export]
macro_rules! tuple {
    () => {
        $crate::Tuple::empty()
    };
    ($($value:expr),+ $(,)?) => {
        $crate::Tuple::new(vec![$($crate::Value::from($value)),+])
    };
}

impl Value {
    /// Representation name used in mismatch errors
    pub fn class_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Long(_) => "long",
            Value::BigInt(_) => "BigInt",
            Value::Decimal(_) => "Decimal",
            Value::Address(_) => "Address",
            Value::Bytes(_) => "bytes",
            Value::String(_) => "String",
            Value::Array(Array::Bool(_)) => "bool[]",
            Value::Array(Array::Int(_)) => "int[]",
            Value::Array(Array::Long(_)) => "long[]",
            Value::Array(Array::Object(_)) => "Value[]",
            Value::Tuple(_) => "Tuple",
        }
    }

    /// Inner `bool`
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Any integer representation widened to [`I256`]
    pub fn as_integer(&self) -> Option<I256> {
        match self {
            Value::Int(v) => Some(I256::from(*v)),
            Value::Long(v) => Some(I256::from(*v)),
            Value::BigInt(v) => Some(*v),
            _ => None,
        }
    }

    /// Inner decimal
    pub fn as_decimal(&self) -> Option<&Decimal> {
        match self {
            Value::Decimal(d) => Some(d),
            _ => None,
        }
    }

    /// Inner address
    pub fn as_address(&self) -> Option<&Address> {
        match self {
            Value::Address(a) => Some(a),
            _ => None,
        }
    }

    /// Inner bytes
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Inner string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Inner array
    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Inner tuple
    pub fn as_tuple(&self) -> Option<&Tuple> {
        match self {
            Value::Tuple(t) => Some(t),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Long(v)
    }
}

impl From<I256> for Value {
    fn from(v: I256) -> Self {
        Value::BigInt(v)
    }
}

impl From<Decimal> for Value {
    fn from(v: Decimal) -> Self {
        Value::Decimal(v)
    }
}

impl From<Address> for Value {
    fn from(v: Address) -> Self {
        Value::Address(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Value::Bytes(v.to_vec())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<Array> for Value {
    fn from(v: Array) -> Self {
        Value::Array(v)
    }
}

impl From<Vec<bool>> for Value {
    fn from(v: Vec<bool>) -> Self {
        Value::Array(Array::Bool(v))
    }
}

impl From<Vec<i32>> for Value {
    fn from(v: Vec<i32>) -> Self {
        Value::Array(Array::Int(v))
    }
}

impl From<Vec<i64>> for Value {
    fn from(v: Vec<i64>) -> Self {
        Value::Array(Array::Long(v))
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::Array(Array::Object(v))
    }
}

impl From<Tuple> for Value {
    fn from(v: Tuple) -> Self {
        Value::Tuple(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tuple_macro() {
        let t = tuple![1i32, "two", vec![3i64]];
        assert_eq!(t.len(), 3);
        assert_eq!(t[0], Value::Int(1));
        assert_eq!(t[1].as_str(), Some("two"));
        assert_eq!(t[2], Value::Array(Array::Long(vec![3])));
        assert!(tuple![].is_empty());
    }

    #[test]
    fn test_array_get_widens() {
        let a = Array::Int(vec![4, -5]);
        assert_eq!(a.get(1), Some(Value::Int(-5)));
        assert_eq!(a.get(2), None);
        assert_eq!(a.kind(), ArrayKind::Int);
        assert_eq!(a.len(), 2);
    }

    #[test]
    fn test_class_names() {
        assert_eq!(Value::from(vec![true]).class_name(), "bool[]");
        assert_eq!(Value::from(Vec::<Value>::new()).class_name(), "Value[]");
        assert_eq!(Value::from(I256::ZERO).class_name(), "BigInt");
    }

    #[test]
    fn test_as_integer() {
        assert_eq!(Value::Int(-3).as_integer(), Some(I256::from(-3i64)));
        assert_eq!(Value::Long(7).as_integer(), Some(I256::from(7i64)));
        assert_eq!(Value::Bool(true).as_integer(), None);
    }
}
