//! ABI error types

use std::fmt;

use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, AbiError>;

/// Aggregate in which a nested failure occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Location {
    /// Element of a tuple
    Tuple,
    /// Element of an array
    Array,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Location::Tuple => "tuple",
            Location::Array => "array",
        })
    }
}

/// Broad category of an [`AbiError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed type string, signature or identifier
    Grammar,
    /// Value structure does not match its type
    Shape,
    /// Numeric value outside its type's range
    Range,
    /// Malformed or truncated encoding
    Format,
    /// Bad address text or checksum
    Checksum,
    /// Function descriptor breaks the rules of its kind
    Descriptor,
}

/// ABI error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AbiError {
    /// Malformed type string, signature or identifier
    #[error("{0}")]
    Grammar(String),

    /// Value structure does not match its type
    #[error("{0}")]
    Shape(String),

    /// Numeric value outside its type's range
    #[error("{0}")]
    Range(String),

    /// Malformed or truncated encoding
    #[error("{0}")]
    Format(String),

    /// Bad address text or checksum
    #[error("{0}")]
    Checksum(String),

    /// Function descriptor breaks the rules of its kind
    #[error("{0}")]
    Descriptor(String),

    /// Failure inside one element of a tuple or array
    #[error("{location} index {index}: {source}")]
    At {
        /// Enclosing aggregate
        location: Location,
        /// Element index within the aggregate
        index: usize,
        /// Underlying failure
        source: Box<AbiError>,
    },
}

impl AbiError {
    /// Wrap this error with the element index it occurred at
    pub fn at(self, location: Location, index: usize) -> Self {
        AbiError::At {
            location,
            index,
            source: Box::new(self),
        }
    }

    /// Innermost error, with all index annotations stripped
    pub fn root(&self) -> &AbiError {
        let mut current = self;
        while let AbiError::At { source, .. } = current {
            current = source;
        }
        current
    }

    /// Category of the innermost error
    pub fn kind(&self) -> ErrorKind {
        match self.root() {
            AbiError::Grammar(_) => ErrorKind::Grammar,
            AbiError::Shape(_) => ErrorKind::Shape,
            AbiError::Range(_) => ErrorKind::Range,
            AbiError::Format(_) => ErrorKind::Format,
            AbiError::Checksum(_) => ErrorKind::Checksum,
            AbiError::Descriptor(_) => ErrorKind::Descriptor,
            // root() never returns At
            AbiError::At { .. } => ErrorKind::Shape,
        }
    }

    /// Index path from the outermost aggregate inwards
    pub fn path(&self) -> Vec<(Location, usize)> {
        let mut path = Vec::new();
        let mut current = self;
        while let AbiError::At {
            location,
            index,
            source,
        } = current
        {
            path.push((*location, *index));
            current = source;
        }
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_display() {
        let err = AbiError::Range("signed val exceeds bit limit: 9 >= 8".into())
            .at(Location::Array, 1)
            .at(Location::Tuple, 0);
        assert_eq!(
            err.to_string(),
            "tuple index 0: array index 1: signed val exceeds bit limit: 9 >= 8"
        );
        assert_eq!(err.kind(), ErrorKind::Range);
        assert_eq!(err.path(), vec![(Location::Tuple, 0), (Location::Array, 1)]);
        assert_eq!(
            err.root(),
            &AbiError::Range("signed val exceeds bit limit: 9 >= 8".into())
        );
    }

    #[test]
    fn test_flat_error_has_empty_path() {
        let err = AbiError::Format("unconsumed bytes: 1 remaining".into());
        assert!(err.path().is_empty());
        assert_eq!(err.kind(), ErrorKind::Format);
    }
}
