//! # bach-crypto
//!
//! Hash functions for the BachLedger ABI codec.
//!
//! - Keccak-256 hashing (function selectors, address checksums)
//! - A pluggable [`Hasher256`] boundary with Keccak-256 and SHA3-256 implementations

#![warn(missing_docs)]
#![warn(clippy::all)]

mod hash;

pub use hash::{
    hasher_by_name, keccak256, Hasher256, Keccak256Hasher, Sha3Hasher, KECCAK_256, SHA3_256,
};
