//! Property tests for the codec laws
//!
//! Round trip, length measurement, lenient forward offsets, checksum
//! idempotence and selector determinism.

use bach_abi::{
    to_checksum_address, tuple, validate_checksum_address, AbiObject, AbiType, Address, Decimal,
    Function, Tuple, TupleType, Value, I256,
};
use bach_crypto::keccak256;
use proptest::prelude::*;

fn mixed_type() -> TupleType {
    TupleType::parse("(uint8,int64,bool,bytes,string,address,bytes5,fixed128x10)").unwrap()
}

prop_compose! {
    fn mixed_values()(
        a in any::<u8>(),
        b in any::<i64>(),
        c in any::<bool>(),
        d in proptest::collection::vec(any::<u8>(), 0..80),
        e in ".{0,40}",
        f in any::<[u8; 20]>(),
        g in any::<[u8; 5]>(),
        h in any::<i64>(),
    ) -> Tuple {
        tuple![
            i32::from(a),
            b,
            c,
            d,
            e,
            Address::from_bytes(f),
            g.to_vec(),
            Decimal::new(h, 10)
        ]
    }
}

fn word(bytes: [u8; 32]) -> I256 {
    I256::from_be_bytes_signed(&bytes)
}

proptest! {
    #[test]
    fn prop_tuple_roundtrip(values in mixed_values()) {
        let t = mixed_type();
        let encoded = t.encode(&values).unwrap();
        prop_assert_eq!(encoded.len(), t.measure_encoded_length(&values).unwrap());
        prop_assert_eq!(encoded.len() % 32, 0);
        prop_assert_eq!(t.decode(&encoded).unwrap(), values);
    }

    #[test]
    fn prop_int256_roundtrip(bytes in any::<[u8; 32]>()) {
        let ty = AbiType::parse("int256").unwrap();
        let value = Value::BigInt(word(bytes));
        let encoded = ty.encode(&value).unwrap();
        prop_assert_eq!(&encoded[..], &bytes[..]);
        prop_assert_eq!(ty.decode(&encoded).unwrap(), value);
    }

    #[test]
    fn prop_nested_array_roundtrip(
        rows in proptest::collection::vec(
            proptest::collection::vec(-32768i32..32768, 0..5),
            0..5,
        )
    ) {
        let ty = AbiType::parse("int16[][]").unwrap();
        let value = Value::from(rows.into_iter().map(Value::from).collect::<Vec<_>>());
        let encoded = ty.encode(&value).unwrap();
        prop_assert_eq!(encoded.len(), ty.measure_encoded_length(&value).unwrap());
        prop_assert_eq!(ty.decode(&encoded).unwrap(), value);
    }

    #[test]
    fn prop_forward_gap_is_tolerated(s in ".{0,40}", gap in 1usize..4) {
        let t = TupleType::parse("(uint8,string)").unwrap();
        let values = tuple![7i32, s];
        let tight = t.encode(&values).unwrap();

        // push the string tail `gap` words further out and patch its offset
        let mut loose = tight[..32].to_vec();
        let mut offset = [0u8; 32];
        offset[31] = (64 + 32 * gap) as u8;
        loose.extend_from_slice(&offset);
        loose.extend(vec![0u8; 32 * gap]);
        loose.extend_from_slice(&tight[64..]);

        prop_assert_eq!(t.decode(&loose).unwrap(), values);
    }

    #[test]
    fn prop_checksum_idempotent(bytes in any::<[u8; 20]>()) {
        let once = Address::from_bytes(bytes).to_checksum_string();
        prop_assert_eq!(to_checksum_address(&once).unwrap(), once.clone());
        prop_assert_eq!(to_checksum_address(&once.to_lowercase()).unwrap(), once.clone());
        prop_assert!(validate_checksum_address(&once).is_ok());
        prop_assert_eq!(Address::wrap(&once).unwrap().to_bytes(), bytes);
    }

    #[test]
    fn prop_selector_determinism(name in "[a-zA-Z_][a-zA-Z0-9_]{0,12}") {
        let short = Function::parse(&format!("{}(uint,fixed)", name)).unwrap();
        let long = Function::parse(&format!("{}(uint256,fixed128x18)", name)).unwrap();
        let digest = keccak256(short.canonical_signature().as_bytes());
        prop_assert_eq!(&short.selector()[..], &digest[..4]);
        prop_assert_eq!(short.selector(), long.selector());
        prop_assert_eq!(short, long);
    }
}
