//! Tuple types

use std::fmt;

use super::{AbiType, TypeFactory};
use crate::error::{AbiError, Result};

/// An [`AbiType`] known to be a tuple
///
/// Function inputs and outputs, event parameters and error parameters are all
/// described by a `TupleType`.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct TupleType(AbiType);

impl TupleType {
    /// Parse a tuple type string, e.g. `"(uint256,bool)"`
    pub fn parse(raw: &str) -> Result<TupleType> {
        TypeFactory::create_tuple(raw)
    }

    /// Tuple of the given element type strings
    pub fn of(types: &[&str]) -> Result<TupleType> {
        Self::parse(&format!("({})", types.join(",")))
    }

    /// Tuple from a comma-separated element list, tolerating one trailing comma
    pub fn parse_elements(list: &str) -> Result<TupleType> {
        let list = list.strip_suffix(',').unwrap_or(list);
        Self::parse(&format!("({})", list))
    }

    /// Tuple of already-built element types
    pub fn from_elements(elements: Vec<AbiType>) -> TupleType {
        TupleType(AbiType::tuple(elements))
    }

    /// `()`
    pub fn empty() -> TupleType {
        Self::from_elements(Vec::new())
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.elements().len()
    }

    /// Whether there are no elements
    pub fn is_empty(&self) -> bool {
        self.elements().is_empty()
    }

    /// Element type at `index`
    pub fn get(&self, index: usize) -> Option<&AbiType> {
        self.elements().get(index)
    }

    /// All element types
    pub fn elements(&self) -> &[AbiType] {
        self.0.tuple_elements().unwrap_or_default()
    }

    /// Iterate over element types
    pub fn iter(&self) -> std::slice::Iter<'_, AbiType> {
        self.elements().iter()
    }

    /// This tuple as a plain type handle
    pub fn as_type(&self) -> &AbiType {
        &self.0
    }

    /// Canonical type string
    pub fn canonical_type(&self) -> &str {
        self.0.canonical_type()
    }

    /// Whether any element is dynamic
    pub fn is_dynamic(&self) -> bool {
        self.0.is_dynamic()
    }

    /// Tuple of the elements whose manifest entry is `true`
    pub fn sub_tuple_type(&self, manifest: &[bool]) -> Result<TupleType> {
        self.select(manifest, false)
    }

    /// Tuple of the elements whose manifest entry is `false`
    pub fn sub_tuple_type_negative(&self, manifest: &[bool]) -> Result<TupleType> {
        self.select(manifest, true)
    }

    fn select(&self, manifest: &[bool], negate: bool) -> Result<TupleType> {
        if manifest.len() != self.len() {
            return Err(AbiError::Shape(format!(
                "manifest length mismatch: actual != expected: {} != {}",
                manifest.len(),
                self.len()
            )));
        }
        let selected = self
            .iter()
            .zip(manifest)
            .filter(|(_, keep)| **keep != negate)
            .map(|(element, _)| element.clone())
            .collect();
        Ok(Self::from_elements(selected))
    }
}

impl TryFrom<AbiType> for TupleType {
    type Error = AbiError;

    fn try_from(value: AbiType) -> Result<Self> {
        if value.tuple_elements().is_some() {
            Ok(TupleType(value))
        } else {
            Err(AbiError::Grammar(format!(
                "not a tuple type: \"{}\"",
                value.canonical_type()
            )))
        }
    }
}

impl From<TupleType> for AbiType {
    fn from(value: TupleType) -> Self {
        value.0
    }
}

impl<'a> IntoIterator for &'a TupleType {
    type Item = &'a AbiType;
    type IntoIter = std::slice::Iter<'a, AbiType>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for TupleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical_type())
    }
}

impl fmt::Debug for TupleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TupleType({})", self.canonical_type())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_of_and_parse_elements() {
        let a = TupleType::of(&["uint8", "string[]"]).unwrap();
        let b = TupleType::parse_elements("uint8,string[],").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.canonical_type(), "(uint8,string[])");
        assert_eq!(TupleType::of(&[]).unwrap(), TupleType::empty());
    }

    #[test]
    fn test_accessors() {
        let t = TupleType::parse("(bool,bytes,int24)").unwrap();
        assert_eq!(t.len(), 3);
        assert!(!t.is_empty());
        assert!(t.is_dynamic());
        assert_eq!(t.get(1).unwrap().canonical_type(), "bytes");
        assert!(t.get(3).is_none());
        let names: Vec<&str> = t.iter().map(AbiType::canonical_type).collect();
        assert_eq!(names, ["bool", "bytes", "int24"]);
    }

    #[test]
    fn test_sub_tuple_type() {
        let t = TupleType::parse("(bool,bytes,int24,address)").unwrap();
        let manifest = [true, false, true, false];
        assert_eq!(
            t.sub_tuple_type(&manifest).unwrap().canonical_type(),
            "(bool,int24)"
        );
        assert_eq!(
            t.sub_tuple_type_negative(&manifest).unwrap().canonical_type(),
            "(bytes,address)"
        );
        assert_eq!(
            t.sub_tuple_type(&[false; 4]).unwrap(),
            TupleType::empty()
        );
        assert_eq!(
            t.sub_tuple_type(&[true]).unwrap_err().to_string(),
            "manifest length mismatch: actual != expected: 1 != 4"
        );
    }

    #[test]
    fn test_not_a_tuple() {
        assert_eq!(
            TupleType::parse("uint8[]").unwrap_err().to_string(),
            "not a tuple type: \"uint8[]\""
        );
    }
}
