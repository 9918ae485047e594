//! # bach-primitives
//!
//! Numeric primitive types for the BachLedger ABI codec.
//!
//! - [`U256`]: unsigned 256-bit integer (re-exported from `primitive-types`)
//! - [`I256`]: signed integer with a 256-bit magnitude
//! - [`Decimal`]: unscaled [`I256`] with a base-10 scale

#![warn(missing_docs)]
#![warn(clippy::all)]

mod decimal;
mod error;
mod int;

pub use decimal::Decimal;
pub use error::PrimitiveError;
pub use int::I256;

// Re-export primitive-types for U256
pub use primitive_types::U256;
