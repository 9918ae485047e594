//! ABI decoding
//!
//! Decoding is strict about values (padding, boolean words, integer ranges,
//! trailing bytes) and lenient about layout: a dynamic element's offset may
//! point past the current position, skipping unreferenced bytes, but never
//! behind it.

use bach_primitives::{Decimal, I256, U256};
use tracing::debug;

use crate::address::Address;
use crate::error::{AbiError, Location, Result};
use crate::types::{AbiType, ArrayKind, ArrayLength, ArrayType, TupleType, TypeKind, UnitSpec, ADDRESS_UNIT};
use crate::validate::{round_up, static_length, OFFSET_LENGTH_BYTES, UNIT_LENGTH_BYTES};
use crate::value::{Array, Tuple, Value};

/// Bit limit for decoded offsets
const OFFSET_BIT_LIMIT: usize = 31;

/// Bit limit for decoded array and byte-string lengths
const LENGTH_BIT_LIMIT: usize = 17;

impl AbiType {
    /// Decode a value of this type; every byte of `data` must be consumed
    pub fn decode(&self, data: &[u8]) -> Result<Value> {
        let mut reader = Reader::new(data, 0);
        decode_value(self, &mut reader)
            .and_then(|value| reader.finish().map(|_| value))
            .inspect_err(|e| debug!(ty = self.canonical_type(), error = %e, "decode failed"))
    }
}

impl TupleType {
    /// Decode values of this tuple type; every byte of `data` must be consumed
    pub fn decode(&self, data: &[u8]) -> Result<Tuple> {
        let mut reader = Reader::new(data, 0);
        self.decode_from(&mut reader)
            .and_then(|values| reader.finish().map(|_| values))
            .inspect_err(|e| debug!(ty = self.canonical_type(), error = %e, "decode failed"))
    }

    pub(crate) fn decode_from(&self, reader: &mut Reader<'_>) -> Result<Tuple> {
        let elements = self.elements();
        decode_objects(reader, elements.len(), |i| &elements[i], Location::Tuple).map(Tuple::new)
    }
}

/// Cursor over an encoded buffer
pub(crate) struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
    /// Zero-size elements still allowed; one per input byte
    zero_size_budget: usize,
}

impl<'a> Reader<'a> {
    pub(crate) fn new(buf: &'a [u8], pos: usize) -> Self {
        Self {
            buf,
            pos,
            zero_size_budget: buf.len(),
        }
    }

    fn remaining(&self) -> usize {
        self.buf.len().saturating_sub(self.pos)
    }

    pub(crate) fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        if len > self.remaining() {
            return Err(AbiError::Format(format!(
                "buffer underflow: need {} bytes @ {}, {} remaining",
                len,
                self.pos,
                self.remaining()
            )));
        }
        let bytes = &self.buf[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }

    fn read_word(&mut self) -> Result<[u8; 32]> {
        let mut word = [0u8; 32];
        word.copy_from_slice(self.read_bytes(UNIT_LENGTH_BYTES)?);
        Ok(word)
    }

    fn seek(&mut self, pos: usize) -> Result<()> {
        if pos > self.buf.len() {
            return Err(AbiError::Format(format!(
                "offset out of bounds: ({} > {})",
                pos,
                self.buf.len()
            )));
        }
        self.pos = pos;
        Ok(())
    }

    /// Fail if `count` elements of at least `min_size` bytes cannot fit
    fn ensure_fits(&self, count: usize, min_size: usize) -> Result<()> {
        match count.checked_mul(min_size) {
            Some(need) if need <= self.remaining() => Ok(()),
            _ => Err(AbiError::Format(format!(
                "not enough bytes for {} elements: {} remaining",
                count,
                self.remaining()
            ))),
        }
    }

    /// Count `count` zero-size elements against the whole-buffer budget
    fn charge_zero_size(&mut self, count: usize) -> Result<()> {
        match self.zero_size_budget.checked_sub(count) {
            Some(left) => {
                self.zero_size_budget = left;
                Ok(())
            }
            None => Err(AbiError::Format(format!(
                "not enough bytes for {} elements: {} zero-size elements left of {} byte input",
                count,
                self.zero_size_budget,
                self.buf.len()
            ))),
        }
    }

    pub(crate) fn finish(&self) -> Result<()> {
        match self.remaining() {
            0 => Ok(()),
            n => Err(AbiError::Format(format!("unconsumed bytes: {} remaining", n))),
        }
    }
}

/// Unsigned word bounded to `limit` bits
fn read_bounded(reader: &mut Reader<'_>, limit: usize, what: &str) -> Result<usize> {
    let value = U256::from_big_endian(&reader.read_word()?);
    if value.bits() > limit {
        return Err(AbiError::Format(format!(
            "{} exceeds bit limit: {} > {}",
            what,
            value.bits(),
            limit
        )));
    }
    Ok(value.low_u64() as usize)
}

fn decode_value(ty: &AbiType, reader: &mut Reader<'_>) -> Result<Value> {
    match ty.kind() {
        TypeKind::Bool => decode_bool(reader).map(Value::Bool),
        TypeKind::Int(unit) => decode_int(unit, reader).map(Value::Int),
        TypeKind::Long(unit) => decode_long(unit, reader).map(Value::Long),
        TypeKind::BigInt(unit) => decode_integer(unit, reader).map(Value::BigInt),
        TypeKind::Decimal { unit, scale } => {
            decode_integer(unit, reader).map(|v| Value::Decimal(Decimal::new(v, *scale)))
        }
        TypeKind::Address => {
            let value = decode_integer(&ADDRESS_UNIT, reader)?;
            Address::from_u256(value.magnitude()).map(Value::Address)
        }
        TypeKind::Byte => Err(AbiError::Format(format!(
            "cannot decode standalone {}",
            ty.canonical_type()
        ))),
        TypeKind::Array(array) => decode_array(array, reader),
        TypeKind::Tuple(elements) => {
            decode_objects(reader, elements.len(), |i| &elements[i], Location::Tuple)
                .map(|values| Value::Tuple(Tuple::new(values)))
        }
    }
}

fn decode_bool(reader: &mut Reader<'_>) -> Result<bool> {
    let at = reader.pos;
    let word = reader.read_word()?;
    if word[..31].iter().all(|b| *b == 0) {
        match word[31] {
            0 => return Ok(false),
            1 => return Ok(true),
            _ => {}
        }
    }
    Err(AbiError::Format(format!("illegal boolean value @ {}", at)))
}

/// Read a word with the type's signedness and check it against the type's range
fn decode_integer(unit: &UnitSpec, reader: &mut Reader<'_>) -> Result<I256> {
    let word = reader.read_word()?;
    let value = if unit.is_unsigned() {
        I256::from_be_bytes_unsigned(&word)
    } else {
        I256::from_be_bytes_signed(&word)
    };
    unit.check(&value)?;
    Ok(value)
}

fn decode_long(unit: &UnitSpec, reader: &mut Reader<'_>) -> Result<i64> {
    let value = decode_integer(unit, reader)?;
    value
        .to_i64()
        .ok_or_else(|| AbiError::Range(format!("{} does not fit a long", value)))
}

fn decode_int(unit: &UnitSpec, reader: &mut Reader<'_>) -> Result<i32> {
    let value = decode_long(unit, reader)?;
    i32::try_from(value).map_err(|_| AbiError::Range(format!("{} does not fit an int", value)))
}

fn decode_array(array: &ArrayType, reader: &mut Reader<'_>) -> Result<Value> {
    let len = match array.length() {
        ArrayLength::Dynamic => read_bounded(reader, LENGTH_BIT_LIMIT, "array length")?,
        ArrayLength::Fixed(n) => n,
    };
    let element = array.element();
    match array.kind() {
        ArrayKind::Byte | ArrayKind::String => {
            let data = reader.read_bytes(len)?;
            let padding = reader.read_bytes(round_up(len) - len)?;
            if padding.iter().any(|b| *b != 0) {
                return Err(AbiError::Format(
                    "malformed array: non-zero padding byte".to_string(),
                ));
            }
            if array.kind() == ArrayKind::String {
                String::from_utf8(data.to_vec())
                    .map(Value::String)
                    .map_err(|_| AbiError::Format("malformed array: invalid utf-8".to_string()))
            } else {
                Ok(Value::Bytes(data.to_vec()))
            }
        }
        ArrayKind::Bool => {
            reader.ensure_fits(len, UNIT_LENGTH_BYTES)?;
            decode_elements(len, || decode_bool(reader)).map(|v| Array::Bool(v).into())
        }
        ArrayKind::Int => {
            let unit = element_unit(element)?;
            reader.ensure_fits(len, UNIT_LENGTH_BYTES)?;
            decode_elements(len, || decode_int(&unit, reader)).map(|v| Array::Int(v).into())
        }
        ArrayKind::Long => {
            let unit = element_unit(element)?;
            reader.ensure_fits(len, UNIT_LENGTH_BYTES)?;
            decode_elements(len, || decode_long(&unit, reader)).map(|v| Array::Long(v).into())
        }
        ArrayKind::Object => {
            let min_size = if element.is_dynamic() {
                OFFSET_LENGTH_BYTES
            } else {
                static_length(element)
            };
            if min_size == 0 {
                reader.charge_zero_size(len)?;
            } else {
                reader.ensure_fits(len, min_size)?;
            }
            decode_objects(reader, len, |_| element, Location::Array)
                .map(|values| Array::Object(values).into())
        }
    }
}

fn element_unit(element: &AbiType) -> Result<UnitSpec> {
    element.unit_spec().ok_or_else(|| {
        AbiError::Format(format!("{} has no numeric width", element.canonical_type()))
    })
}

fn decode_elements<T>(len: usize, mut next: impl FnMut() -> Result<T>) -> Result<Vec<T>> {
    let mut values = Vec::with_capacity(len);
    for i in 0..len {
        values.push(next().map_err(|e| e.at(Location::Array, i))?);
    }
    Ok(values)
}

/// Decode `count` elements laid out head/tail starting at the current position
fn decode_objects<'t>(
    reader: &mut Reader<'_>,
    count: usize,
    type_at: impl Fn(usize) -> &'t AbiType,
    location: Location,
) -> Result<Vec<Value>> {
    // offsets are relative to the start of the heads
    let start = reader.pos;
    let mut values: Vec<Option<Value>> = Vec::with_capacity(count);
    let mut offsets = vec![0usize; count];
    for (i, offset) in offsets.iter_mut().enumerate() {
        let ty = type_at(i);
        if ty.is_dynamic() {
            *offset = read_bounded(reader, OFFSET_BIT_LIMIT, "offset")
                .map_err(|e| e.at(location, i))?;
            values.push(None);
        } else {
            values.push(Some(decode_value(ty, reader).map_err(|e| e.at(location, i))?));
        }
    }
    for (i, offset) in offsets.into_iter().enumerate() {
        let ty = type_at(i);
        if !ty.is_dynamic() {
            continue;
        }
        let decoded = jump_to_tail(reader, start, offset).and_then(|_| decode_value(ty, reader));
        values[i] = Some(decoded.map_err(|e| e.at(location, i))?);
    }
    Ok(values.into_iter().flatten().collect())
}

/// Move forward to `start + offset`; a zero offset leaves the cursor in place
fn jump_to_tail(reader: &mut Reader<'_>, start: usize, offset: usize) -> Result<()> {
    if offset == 0 {
        return Ok(());
    }
    let jump = start + offset;
    let pos = reader.pos;
    if jump < pos {
        return Err(AbiError::Format(format!(
            "illegal backwards jump: ({}+{}={})<{}",
            start, offset, jump, pos
        )));
    }
    if jump > pos {
        reader.seek(jump)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuple;

    fn parse(raw: &str) -> AbiType {
        AbiType::parse(raw).unwrap()
    }

    fn words(hex_words: &[&str]) -> Vec<u8> {
        hex_words
            .iter()
            .flat_map(|w| hex::decode(format!("{:0>64}", w)).unwrap())
            .collect()
    }

    // ==================== Values ====================

    #[test]
    fn test_decode_uint() {
        let data = words(&["64"]);
        assert_eq!(parse("uint256").decode(&data).unwrap(), Value::BigInt(I256::from(100i64)));
        assert_eq!(parse("uint8").decode(&data).unwrap(), Value::Int(100));
        assert_eq!(parse("uint32").decode(&data).unwrap(), Value::Long(100));
    }

    #[test]
    fn test_decode_uint256_max() {
        let data = vec![0xff; 32];
        assert_eq!(
            parse("uint").decode(&data).unwrap(),
            Value::BigInt(I256::from_u256(U256::MAX))
        );
    }

    #[test]
    fn test_decode_negative() {
        let data = vec![0xff; 32];
        assert_eq!(parse("int8").decode(&data).unwrap(), Value::Int(-1));
        assert_eq!(parse("int64").decode(&data).unwrap(), Value::Long(-1));
        assert_eq!(
            parse("int256").decode(&data).unwrap(),
            Value::BigInt(I256::from(-1i64))
        );
    }

    #[test]
    fn test_decode_rejects_dirty_high_bits() {
        let err = parse("uint8").decode(&words(&["100"])).unwrap_err();
        assert_eq!(err.to_string(), "unsigned val exceeds bit limit: 9 > 8");

        let err = parse("int8").decode(&words(&["80"])).unwrap_err();
        assert_eq!(err.to_string(), "signed val exceeds bit limit: 8 >= 8");
    }

    #[test]
    fn test_decode_bool_strict() {
        assert_eq!(parse("bool").decode(&words(&["1"])).unwrap(), Value::Bool(true));
        assert_eq!(parse("bool").decode(&words(&["0"])).unwrap(), Value::Bool(false));
        for bad in ["2", "101", "8000000000000000000000000000000000000000000000000000000000000000"] {
            assert_eq!(
                parse("bool").decode(&words(&[bad])).unwrap_err().to_string(),
                "illegal boolean value @ 0"
            );
        }
    }

    #[test]
    fn test_decode_address_range() {
        let err = parse("address")
            .decode(&words(&["10000000000000000000000000000000000000000"]))
            .unwrap_err();
        assert_eq!(err.to_string(), "unsigned val exceeds bit limit: 161 > 160");
    }

    // ==================== Layout ====================

    #[test]
    fn test_decode_ufixed_string() {
        let t = TupleType::parse("(ufixed,string)").unwrap();
        let data = words(&["45", "40", "4", "77303074"]);
        // the string data word is left-padded by words(), so rebuild it right-padded
        let mut data = data[..96].to_vec();
        let mut text = b"w00t".to_vec();
        text.resize(32, 0);
        data.extend(text);

        let decoded = t.decode(&data).unwrap();
        assert_eq!(decoded[0], Value::Decimal(Decimal::new(69i64, 18)));
        assert_eq!(decoded[0].as_decimal().unwrap().to_string(), "0.000000000000000069");
        assert_eq!(decoded[1], Value::String("w00t".into()));
    }

    #[test]
    fn test_decode_empty_tuple_array() {
        let expected = Value::from(vec![
            Value::Tuple(Tuple::empty()),
            Value::Tuple(Tuple::empty()),
        ]);
        assert_eq!(parse("()[]").decode(&words(&["2"])).unwrap(), expected);

        let t = TupleType::parse("(()[])").unwrap();
        assert_eq!(t.decode(&words(&["20", "2"])).unwrap(), Tuple::new(vec![expected]));
    }

    #[test]
    fn test_lenient_forward_jump() {
        let t = TupleType::parse("(string)").unwrap();
        // offset 0x40 skips one garbage word
        let mut data = words(&["40", "deadbeef", "2"]);
        let mut text = b"hi".to_vec();
        text.resize(32, 0);
        data.extend(text);
        assert_eq!(t.decode(&data).unwrap(), tuple!["hi"]);
    }

    #[test]
    fn test_illegal_backwards_jump() {
        let t = TupleType::parse("(bytes,bytes)").unwrap();
        // second offset points back into the first tail
        let data = words(&["40", "60", "1", "0"]);
        let err = t.decode(&data).unwrap_err();
        assert!(
            err.to_string().contains("illegal backwards jump: (0+96=96)<128"),
            "{}",
            err
        );
    }

    #[test]
    fn test_zero_offset_decodes_in_place() {
        let t = TupleType::parse("(bytes)").unwrap();
        let data = words(&["0", "0"]);
        assert_eq!(t.decode(&data).unwrap(), tuple![Vec::<u8>::new()]);
    }

    #[test]
    fn test_offset_bit_limit() {
        let t = TupleType::parse("(bytes)").unwrap();
        let err = t.decode(&words(&["80000000"])).unwrap_err();
        assert_eq!(err.to_string(), "tuple index 0: offset exceeds bit limit: 32 > 31");
    }

    #[test]
    fn test_offset_past_end() {
        let t = TupleType::parse("(bytes)").unwrap();
        let err = t.decode(&words(&["7fffffff", "0", "0"])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "tuple index 0: offset out of bounds: (2147483647 > 96)"
        );
    }

    #[test]
    fn test_length_bit_limit() {
        let err = parse("bytes").decode(&words(&["20000"])).unwrap_err();
        assert_eq!(err.to_string(), "array length exceeds bit limit: 18 > 17");

        let err = parse("bytes").decode(&words(&["1ffff"])).unwrap_err();
        assert!(err.to_string().starts_with("buffer underflow"), "{}", err);
    }

    #[test]
    fn test_count_checked_before_allocation() {
        let err = parse("uint256[]").decode(&words(&["1ffff"])).unwrap_err();
        assert_eq!(err.to_string(), "not enough bytes for 131071 elements: 0 remaining");
    }

    #[test]
    fn test_zero_size_elements_bounded_by_input() {
        // 200 inner arrays at offset 0, each claiming 0x1ffff empty tuples
        let mut hex_words = vec!["c8"];
        hex_words.extend(std::iter::repeat("0").take(200));
        hex_words.extend(std::iter::repeat("1ffff").take(200));
        let data = words(&hex_words);
        assert_eq!(data.len(), 12832);

        let err = parse("()[][]").decode(&data).unwrap_err();
        assert!(err.root().to_string().starts_with("not enough bytes"), "{}", err);
        assert_eq!(err.path(), vec![(Location::Array, 0)]);

        let err = parse("uint8[0][]").decode(&words(&["1ffff"])).unwrap_err();
        assert!(err.to_string().starts_with("not enough bytes for 131071 elements"), "{}", err);

        // legitimate zero-size arrays within the input length still decode
        let value = parse("()[]").decode(&words(&["20"])).unwrap();
        assert_eq!(value.as_array().map(|a| a.len()), Some(32));
    }

    #[test]
    fn test_non_zero_padding() {
        let mut data = words(&["1"]);
        let mut body = vec![0xaa, 0x01];
        body.resize(32, 0);
        data.extend(body);
        let err = parse("bytes").decode(&data).unwrap_err();
        assert_eq!(err.to_string(), "malformed array: non-zero padding byte");
    }

    #[test]
    fn test_unconsumed_bytes() {
        let mut data = words(&["1"]);
        data.push(0);
        let err = parse("uint8").decode(&data).unwrap_err();
        assert_eq!(err.to_string(), "unconsumed bytes: 1 remaining");
    }

    #[test]
    fn test_invalid_utf8() {
        let mut data = words(&["1"]);
        let mut body = vec![0xff];
        body.resize(32, 0);
        data.extend(body);
        let err = parse("string").decode(&data).unwrap_err();
        assert_eq!(err.to_string(), "malformed array: invalid utf-8");
    }

    #[test]
    fn test_nested_error_path() {
        let t = TupleType::parse("(bool[])").unwrap();
        let data = words(&["20", "2", "1", "3"]);
        let err = t.decode(&data).unwrap_err();
        assert_eq!(
            err.to_string(),
            "tuple index 0: array index 1: illegal boolean value @ 96"
        );
    }
}
