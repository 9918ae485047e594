//! 256-bit hashing

use sha3::{Digest, Keccak256, Sha3_256};

/// Algorithm identifier of [`Keccak256Hasher`]
pub const KECCAK_256: &str = "Keccak-256";

/// Algorithm identifier of [`Sha3Hasher`]
pub const SHA3_256: &str = "SHA3-256";

/// Incremental hash function producing a 32-byte digest
pub trait Hasher256: Send {
    /// Algorithm identifier, e.g. `"Keccak-256"`
    fn algorithm(&self) -> &'static str;

    /// Discard any buffered input
    fn reset(&mut self);

    /// Absorb more input
    fn update(&mut self, data: &[u8]);

    /// Write the digest of everything absorbed since the last reset into `out`,
    /// then reset
    fn finalize_into(&mut self, out: &mut [u8; 32]);

    /// One-shot digest of `data`
    fn digest(&mut self, data: &[u8]) -> [u8; 32] {
        self.reset();
        self.update(data);
        let mut out = [0u8; 32];
        self.finalize_into(&mut out);
        out
    }
}

/// Original Keccak-256 (pre-standard padding), as used by Ethereum
#[derive(Debug, Clone, Default)]
pub struct Keccak256Hasher(Keccak256);

impl Keccak256Hasher {
    /// Create a fresh hasher
    pub fn new() -> Self {
        Self::default()
    }
}

impl Hasher256 for Keccak256Hasher {
    fn algorithm(&self) -> &'static str {
        KECCAK_256
    }

    fn reset(&mut self) {
        Digest::reset(&mut self.0);
    }

    fn update(&mut self, data: &[u8]) {
        Digest::update(&mut self.0, data);
    }

    fn finalize_into(&mut self, out: &mut [u8; 32]) {
        out.copy_from_slice(&self.0.finalize_reset());
    }
}

/// FIPS 202 SHA3-256
#[derive(Debug, Clone, Default)]
pub struct Sha3Hasher(Sha3_256);

impl Sha3Hasher {
    /// Create a fresh hasher
    pub fn new() -> Self {
        Self::default()
    }
}

impl Hasher256 for Sha3Hasher {
    fn algorithm(&self) -> &'static str {
        SHA3_256
    }

    fn reset(&mut self) {
        Digest::reset(&mut self.0);
    }

    fn update(&mut self, data: &[u8]) {
        Digest::update(&mut self.0, data);
    }

    fn finalize_into(&mut self, out: &mut [u8; 32]) {
        out.copy_from_slice(&self.0.finalize_reset());
    }
}

/// Look up a hasher by algorithm identifier (case-insensitive, `-` optional)
pub fn hasher_by_name(name: &str) -> Option<Box<dyn Hasher256>> {
    let normalized: String = name
        .chars()
        .filter(|c| *c != '-' && *c != '_')
        .collect::<String>()
        .to_ascii_lowercase();
    match normalized.as_str() {
        "keccak256" => Some(Box::new(Keccak256Hasher::new())),
        "sha3256" => Some(Box::new(Sha3Hasher::new())),
        _ => None,
    }
}

/// Compute Keccak-256 hash of the input data
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}
