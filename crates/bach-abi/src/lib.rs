//! # bach-abi
//!
//! Ethereum contract ABI type system and codec.
//!
//! ## Features
//!
//! - **Types**: type strings such as `(uint8,string)[2]` parsed into shared,
//!   cached [`AbiType`] nodes
//! - **Codec**: head/tail encoding, validation, length measurement and a
//!   strict-but-lenient decoder
//! - **Function**: selectors, call encoding and call/return decoding
//! - **Address**: EIP-55 checksum text form
//! - **Packed**: the non-standard packed encoding
//! - **Format**: word-per-line hex dumps of encodings
//!
//! ## Quick Start
//!
//! ```rust
//! use bach_abi::{tuple, Function, TupleType, Value};
//!
//! let f = Function::parse_with_outputs("foo(uint32,string)", "(bool)").unwrap();
//! let call = f.encode_call(&tuple![7i64, "hi"]).unwrap();
//! assert_eq!(&call[..4], &f.selector());
//! assert_eq!(f.decode_call(&call).unwrap()[1], Value::String("hi".into()));
//!
//! let t = TupleType::parse("(bool[],int8)").unwrap();
//! let encoded = t.encode(&tuple![vec![true], -1i32]).unwrap();
//! assert_eq!(t.decode(&encoded).unwrap(), tuple![vec![true], -1i32]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod address;
mod contract;
mod decode;
mod encode;
mod error;
mod format;
mod function;
mod packed;
pub mod types;
mod validate;
mod value;

pub use address::{to_checksum_address, validate_checksum_address, Address};
pub use contract::{ContractError, Event};
pub use error::{AbiError, ErrorKind, Location, Result};
pub use format::{format, format_call, format_call_with, format_with, Labels};
pub use function::{AbiKind, AbiObject, Function};
pub use types::{
    AbiType, ArrayKind, ArrayLength, ArrayType, TupleType, TypeFactory, TypeKind, UnitSpec,
};
pub use value::{Array, Tuple, Value};

// Numeric value types
pub use bach_primitives::{Decimal, I256, U256};
