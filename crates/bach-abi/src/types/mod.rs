//! ABI type nodes
//!
//! An [`AbiType`] is an immutable, cheaply cloneable handle to a shared type
//! node plus an optional per-handle name. Nodes are built by the
//! [`TypeFactory`] from type strings or composed with [`AbiType::array`] and
//! [`AbiType::tuple`].

mod parser;
mod tuple;

pub use parser::TypeFactory;
pub use tuple::TupleType;

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use bach_primitives::{I256, U256};

use crate::error::{AbiError, Result};

/// Width and signedness of a numeric type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UnitSpec {
    bits: u16,
    unsigned: bool,
}

/// Width of an address, as an unsigned integer
pub(crate) const ADDRESS_UNIT: UnitSpec = UnitSpec {
    bits: 160,
    unsigned: true,
};

impl UnitSpec {
    pub(crate) fn new(bits: u16, unsigned: bool) -> Self {
        Self { bits, unsigned }
    }

    /// Bit width
    pub fn bits(&self) -> u16 {
        self.bits
    }

    /// Whether negative values are rejected
    pub fn is_unsigned(&self) -> bool {
        self.unsigned
    }

    /// Smallest accepted value
    pub fn min_value(&self) -> I256 {
        if self.unsigned {
            I256::ZERO
        } else {
            I256::new(U256::one() << (self.bits as usize - 1), true)
        }
    }

    /// Largest accepted value
    pub fn max_value(&self) -> I256 {
        let magnitude_bits = if self.unsigned {
            self.bits as usize
        } else {
            self.bits as usize - 1
        };
        if magnitude_bits >= 256 {
            I256::from_u256(U256::MAX)
        } else {
            I256::from_u256((U256::one() << magnitude_bits) - U256::one())
        }
    }

    /// Range check for a value of any width
    pub(crate) fn check(&self, value: &I256) -> Result<()> {
        self.check_bit_length(value.is_negative(), value.bit_length())
    }

    /// Range check for a native-width value
    pub(crate) fn check_i64(&self, value: i64) -> Result<()> {
        let bit_length = if value < 0 {
            64 - (!value).leading_zeros()
        } else {
            64 - value.leading_zeros()
        };
        self.check_bit_length(value < 0, bit_length as usize)
    }

    fn check_bit_length(&self, negative: bool, bit_length: usize) -> Result<()> {
        let bits = self.bits as usize;
        if self.unsigned {
            if negative {
                return Err(AbiError::Range(
                    "signed value given for unsigned type".to_string(),
                ));
            }
            if bit_length > bits {
                return Err(AbiError::Range(format!(
                    "unsigned val exceeds bit limit: {} > {}",
                    bit_length, bits
                )));
            }
        } else if bit_length >= bits {
            return Err(AbiError::Range(format!(
                "signed val exceeds bit limit: {} >= {}",
                bit_length, bits
            )));
        }
        Ok(())
    }
}

/// Length of an array type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArrayLength {
    /// Length is encoded alongside the elements
    Dynamic,
    /// Length is part of the type
    Fixed(usize),
}

/// Container an array's value uses, determined by its element type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArrayKind {
    /// `Vec<bool>`
    Bool,
    /// Raw bytes (`bytes`, `bytesN`, `function`)
    Byte,
    /// UTF-8 text (`string`)
    String,
    /// `Vec<i32>`
    Int,
    /// `Vec<i64>`
    Long,
    /// `Vec<Value>`
    Object,
}

/// Array type descriptor
#[derive(Debug, Clone)]
pub struct ArrayType {
    element: AbiType,
    length: ArrayLength,
    kind: ArrayKind,
}

impl ArrayType {
    /// Element type
    pub fn element(&self) -> &AbiType {
        &self.element
    }

    /// Declared length
    pub fn length(&self) -> ArrayLength {
        self.length
    }

    /// Value container kind
    pub fn kind(&self) -> ArrayKind {
        self.kind
    }

    /// True for `bytes`, `bytesN`, `function` and `string`
    pub fn is_byte_array(&self) -> bool {
        matches!(self.kind, ArrayKind::Byte | ArrayKind::String)
    }
}

/// Variant of a type node
#[derive(Debug, Clone)]
pub enum TypeKind {
    /// `bool`
    Bool,
    /// Integers whose values fit an `i32`
    Int(UnitSpec),
    /// Integers whose values fit an `i64`
    Long(UnitSpec),
    /// Integers up to 256 bits
    BigInt(UnitSpec),
    /// Fixed-point decimals
    Decimal {
        /// Width and signedness of the unscaled value
        unit: UnitSpec,
        /// Number of fractional digits
        scale: u32,
    },
    /// 160-bit `address`
    Address,
    /// Element of a byte array; never appears at the top level
    Byte,
    /// Arrays, including byte arrays and `string`
    Array(ArrayType),
    /// Tuples
    Tuple(Vec<AbiType>),
}

#[derive(Debug)]
struct TypeNode {
    canonical: String,
    dynamic: bool,
    kind: TypeKind,
}

/// Handle to an ABI type
///
/// Equality and hashing consider only the canonical type string; names are
/// metadata carried by each handle and never alter the shared node.
#[derive(Clone)]
pub struct AbiType {
    node: Arc<TypeNode>,
    name: Option<Arc<str>>,
}

impl AbiType {
    fn from_kind(canonical: String, kind: TypeKind) -> Self {
        let dynamic = match &kind {
            TypeKind::Array(array) => {
                array.length == ArrayLength::Dynamic || array.element.is_dynamic()
            }
            TypeKind::Tuple(elements) => elements.iter().any(AbiType::is_dynamic),
            _ => false,
        };
        AbiType {
            node: Arc::new(TypeNode {
                canonical,
                dynamic,
                kind,
            }),
            name: None,
        }
    }

    fn byte_array(canonical: &str, length: ArrayLength, kind: ArrayKind) -> Self {
        let element = Self::from_kind("byte".to_string(), TypeKind::Byte);
        Self::from_kind(
            canonical.to_string(),
            TypeKind::Array(ArrayType {
                element,
                length,
                kind,
            }),
        )
    }

    /// Parse a type string, e.g. `"(uint8,string)[2]"`
    pub fn parse(raw: &str) -> Result<AbiType> {
        TypeFactory::create(raw)
    }

    /// Array of `element`
    ///
    /// An array of bytes is `bytes` or `bytesN`; only `N` in `1..=32` parses
    /// back from its canonical string.
    pub fn array(element: AbiType, length: ArrayLength) -> AbiType {
        if let TypeKind::Byte = element.kind() {
            let canonical = match length {
                ArrayLength::Dynamic => "bytes".to_string(),
                ArrayLength::Fixed(n) => format!("bytes{}", n),
            };
            return Self::byte_array(&canonical, length, ArrayKind::Byte);
        }
        let kind = match element.kind() {
            TypeKind::Bool => ArrayKind::Bool,
            TypeKind::Int(_) => ArrayKind::Int,
            TypeKind::Long(_) => ArrayKind::Long,
            _ => ArrayKind::Object,
        };
        let canonical = match length {
            ArrayLength::Dynamic => format!("{}[]", element.canonical_type()),
            ArrayLength::Fixed(n) => format!("{}[{}]", element.canonical_type(), n),
        };
        Self::from_kind(
            canonical,
            TypeKind::Array(ArrayType {
                element,
                length,
                kind,
            }),
        )
    }

    /// Tuple of `elements`; element names are kept
    pub fn tuple(elements: Vec<AbiType>) -> AbiType {
        let canonical = format!(
            "({})",
            elements
                .iter()
                .map(AbiType::canonical_type)
                .collect::<Vec<_>>()
                .join(",")
        );
        Self::from_kind(canonical, TypeKind::Tuple(elements))
    }

    /// Canonical type string, used for signatures and equality
    pub fn canonical_type(&self) -> &str {
        &self.node.canonical
    }

    /// Whether the encoding is placed in the tail behind an offset
    pub fn is_dynamic(&self) -> bool {
        self.node.dynamic
    }

    /// Variant of this type
    pub fn kind(&self) -> &TypeKind {
        &self.node.kind
    }

    /// Name attached to this handle, if any
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// New handle to the same node carrying `name`; `self` is unchanged
    pub fn with_name(&self, name: impl Into<String>) -> AbiType {
        AbiType {
            node: Arc::clone(&self.node),
            name: Some(Arc::from(name.into())),
        }
    }

    /// Array descriptor, for array types
    pub fn as_array(&self) -> Option<&ArrayType> {
        match self.kind() {
            TypeKind::Array(array) => Some(array),
            _ => None,
        }
    }

    /// Element types, for tuple types
    pub fn tuple_elements(&self) -> Option<&[AbiType]> {
        match self.kind() {
            TypeKind::Tuple(elements) => Some(elements),
            _ => None,
        }
    }

    /// Width and signedness, for numeric types and `address`
    pub fn unit_spec(&self) -> Option<UnitSpec> {
        match self.kind() {
            TypeKind::Int(unit) | TypeKind::Long(unit) | TypeKind::BigInt(unit) => Some(*unit),
            TypeKind::Decimal { unit, .. } => Some(*unit),
            TypeKind::Address => Some(ADDRESS_UNIT),
            _ => None,
        }
    }

    /// Smallest accepted (unscaled) value, for numeric types
    pub fn min_value(&self) -> Option<I256> {
        self.unit_spec().map(|unit| unit.min_value())
    }

    /// Largest accepted (unscaled) value, for numeric types
    pub fn max_value(&self) -> Option<I256> {
        self.unit_spec().map(|unit| unit.max_value())
    }

    pub(crate) fn same_node(&self, other: &AbiType) -> bool {
        Arc::ptr_eq(&self.node, &other.node)
    }
}

impl PartialEq for AbiType {
    fn eq(&self, other: &Self) -> bool {
        self.same_node(other) || self.canonical_type() == other.canonical_type()
    }
}

impl Eq for AbiType {}

impl Hash for AbiType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical_type().hash(state);
    }
}

impl fmt::Display for AbiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical_type())
    }
}

impl fmt::Debug for AbiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "AbiType({} {})", self.canonical_type(), name),
            None => write!(f, "AbiType({})", self.canonical_type()),
        }
    }
}
