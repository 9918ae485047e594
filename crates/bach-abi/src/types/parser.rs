//! Type string parsing and the process-wide type cache

use std::sync::LazyLock;

use dashmap::DashMap;
use tracing::trace;

use super::{AbiType, ArrayKind, ArrayLength, TupleType, TypeKind, UnitSpec};
use crate::error::{AbiError, Result};

/// Upper bound on memoized type strings
const CACHE_CAPACITY: usize = 4096;

/// Deepest tuple or array nesting accepted in one type string
const MAX_NESTING_DEPTH: usize = 256;

static TYPE_CACHE: LazyLock<DashMap<String, AbiType>> = LazyLock::new(DashMap::new);

/// Builds [`AbiType`]s from type strings
///
/// Results are memoized by raw type string in a concurrent map shared by all
/// threads. Cached handles never carry names; [`TypeFactory::create_named`]
/// returns a fresh handle, so naming never changes what other callers see.
pub struct TypeFactory;

impl TypeFactory {
    /// Parse `raw` into a type
    pub fn create(raw: &str) -> Result<AbiType> {
        create_at(raw, 0)
    }

    /// Parse `raw` and attach `name` to the returned handle
    pub fn create_named(raw: &str, name: &str) -> Result<AbiType> {
        Ok(Self::create(raw)?.with_name(name))
    }

    /// Parse `raw`, which must describe a tuple
    pub fn create_tuple(raw: &str) -> Result<TupleType> {
        TupleType::try_from(Self::create(raw)?)
    }
}

fn create_at(raw: &str, depth: usize) -> Result<AbiType> {
    if let Some(hit) = TYPE_CACHE.get(raw) {
        return Ok(hit.value().clone());
    }
    if depth > MAX_NESTING_DEPTH {
        return Err(AbiError::Grammar(format!(
            "nesting depth exceeds {}",
            MAX_NESTING_DEPTH
        )));
    }
    let built = build(raw, depth)?;
    if TYPE_CACHE.len() >= CACHE_CAPACITY {
        return Ok(built);
    }
    trace!(raw, canonical = built.canonical_type(), "caching type");
    Ok(TYPE_CACHE.entry(raw.to_string()).or_insert(built).value().clone())
}

fn unrecognized(raw: &str) -> AbiError {
    AbiError::Grammar(format!("unrecognized type: \"{}\"", raw))
}

fn build(raw: &str, depth: usize) -> Result<AbiType> {
    if let Some(stripped) = raw.strip_suffix(']') {
        let open = stripped.rfind('[').ok_or_else(|| unrecognized(raw))?;
        let length = parse_array_length(&stripped[open + 1..])?;
        let element = create_at(&stripped[..open], depth + 1)?;
        return Ok(AbiType::array(element, length));
    }
    if raw.starts_with('(') {
        return parse_tuple(raw, depth);
    }
    resolve_base(raw).ok_or_else(|| unrecognized(raw))
}

fn parse_array_length(digits: &str) -> Result<ArrayLength> {
    if digits.is_empty() {
        return Ok(ArrayLength::Dynamic);
    }
    match parse_decimal(digits) {
        Some(n) => Ok(ArrayLength::Fixed(n)),
        None => Err(AbiError::Grammar("bad array length".to_string())),
    }
}

/// Unsigned decimal without sign or leading zeros
fn parse_decimal(digits: &str) -> Option<usize> {
    if digits.is_empty()
        || !digits.bytes().all(|b| b.is_ascii_digit())
        || (digits.len() > 1 && digits.starts_with('0'))
    {
        return None;
    }
    digits.parse().ok()
}

fn parse_tuple(raw: &str, depth: usize) -> Result<AbiType> {
    let inner = raw
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .ok_or_else(|| unrecognized(raw))?;
    let mut elements = Vec::new();
    if inner.is_empty() {
        return Ok(AbiType::tuple(elements));
    }
    let mut open = 0usize;
    let mut start = 0;
    for (i, b) in inner.bytes().enumerate() {
        match b {
            b'(' => open += 1,
            b')' => open = open.checked_sub(1).ok_or_else(|| unrecognized(raw))?,
            b',' if open == 0 => {
                elements.push(parse_element(&inner[start..i], elements.len(), depth + 1)?);
                start = i + 1;
            }
            _ => {}
        }
    }
    if open != 0 {
        return Err(unrecognized(raw));
    }
    elements.push(parse_element(&inner[start..], elements.len(), depth + 1)?);
    Ok(AbiType::tuple(elements))
}

fn parse_element(raw: &str, index: usize, depth: usize) -> Result<AbiType> {
    if raw.is_empty() {
        return Err(AbiError::Grammar(format!(
            "@ index {}, empty parameter",
            index
        )));
    }
    create_at(raw, depth).map_err(|e| match e {
        AbiError::Grammar(msg) => AbiError::Grammar(format!("@ index {}, {}", index, msg)),
        other => other,
    })
}

fn resolve_base(raw: &str) -> Option<AbiType> {
    match raw {
        "bool" => Some(AbiType::from_kind("bool".to_string(), TypeKind::Bool)),
        "address" => Some(AbiType::from_kind("address".to_string(), TypeKind::Address)),
        "string" => Some(AbiType::byte_array("string", ArrayLength::Dynamic, ArrayKind::String)),
        "bytes" => Some(AbiType::byte_array("bytes", ArrayLength::Dynamic, ArrayKind::Byte)),
        "function" => Some(AbiType::byte_array(
            "function",
            ArrayLength::Fixed(24),
            ArrayKind::Byte,
        )),
        "uint" => Some(integer(256, true)),
        "int" => Some(integer(256, false)),
        "ufixed" => Some(decimal(128, 18, true)),
        "fixed" => Some(decimal(128, 18, false)),
        _ => {
            if let Some(n) = raw.strip_prefix("bytes") {
                let n = parse_decimal(n).filter(|n| (1..=32).contains(n))?;
                Some(AbiType::byte_array(raw, ArrayLength::Fixed(n), ArrayKind::Byte))
            } else if let Some(bits) = raw.strip_prefix("uint") {
                Some(integer(parse_bits(bits)?, true))
            } else if let Some(bits) = raw.strip_prefix("int") {
                Some(integer(parse_bits(bits)?, false))
            } else if let Some(spec) = raw.strip_prefix("ufixed") {
                let (bits, scale) = parse_fixed(spec)?;
                Some(decimal(bits, scale, true))
            } else if let Some(spec) = raw.strip_prefix("fixed") {
                let (bits, scale) = parse_fixed(spec)?;
                Some(decimal(bits, scale, false))
            } else {
                None
            }
        }
    }
}

/// Width in 8..=256, a multiple of 8
fn parse_bits(digits: &str) -> Option<u16> {
    parse_decimal(digits)
        .filter(|n| *n % 8 == 0 && (8..=256).contains(n))
        .map(|n| n as u16)
}

/// `MxN` with M a valid width and N in 1..=80
fn parse_fixed(spec: &str) -> Option<(u16, u32)> {
    let (bits, scale) = spec.split_once('x')?;
    let scale = parse_decimal(scale).filter(|n| (1..=80).contains(n))?;
    Some((parse_bits(bits)?, scale as u32))
}

fn integer(bits: u16, unsigned: bool) -> AbiType {
    let unit = UnitSpec::new(bits, unsigned);
    let canonical = format!("{}int{}", if unsigned { "u" } else { "" }, bits);
    let kind = if bits < 32 || (bits == 32 && !unsigned) {
        TypeKind::Int(unit)
    } else if bits < 64 || (bits == 64 && !unsigned) {
        TypeKind::Long(unit)
    } else {
        TypeKind::BigInt(unit)
    };
    AbiType::from_kind(canonical, kind)
}

fn decimal(bits: u16, scale: u32, unsigned: bool) -> AbiType {
    let canonical = format!("{}fixed{}x{}", if unsigned { "u" } else { "" }, bits, scale);
    AbiType::from_kind(
        canonical,
        TypeKind::Decimal {
            unit: UnitSpec::new(bits, unsigned),
            scale,
        },
    )
}
