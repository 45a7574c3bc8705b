//! Byte vectors for the primitive types and basic composites

use hex_literal::hex;
use krb_asn1::{
    template, Asn1Error, BitString, EncodingPolicy, FieldDescriptor, ObjectIdentifier, Tag, Value,
};
use proptest::prelude::*;
use rstest::rstest;

#[rstest]
#[case(0, &hex!("02 01 00"))]
#[case(127, &hex!("02 01 7F"))]
#[case(128, &hex!("02 02 00 80"))]
#[case(256, &hex!("02 02 01 00"))]
#[case(-1, &hex!("02 01 FF"))]
#[case(-128, &hex!("02 01 80"))]
#[case(-129, &hex!("02 02 FF 7F"))]
#[case(i64::MAX, &hex!("02 08 7F FF FF FF FF FF FF FF"))]
#[case(i64::MIN, &hex!("02 08 80 00 00 00 00 00 00 00"))]
fn test_integer_vectors(#[case] value: i64, #[case] expected: &[u8]) {
    assert_eq!(Value::integer(value).encode().unwrap(), expected);

    let mut decoded = template::integer();
    decoded.decode(expected).unwrap();
    assert_eq!(decoded.as_integer(), Some(value));
}

#[rstest]
#[case(Value::boolean(true), &hex!("01 01 FF"))]
#[case(Value::boolean(false), &hex!("01 01 00"))]
#[case(Value::null(), &hex!("05 00"))]
#[case(Value::enumerated(3), &hex!("0A 01 03"))]
#[case(Value::octet_string(hex!("01 02 03")), &hex!("04 03 01 02 03"))]
#[case(Value::general_string("EXAMPLE.COM"), &hex!("1B 0B 45 58 41 4D 50 4C 45 2E 43 4F 4D"))]
#[case(Value::ia5_string("a@b"), &hex!("16 03 61 40 62"))]
#[case(Value::utf8_string("é"), &hex!("0C 02 C3 A9"))]
#[case(Value::printable_string("A B"), &hex!("13 03 41 20 42"))]
fn test_primitive_vectors(#[case] value: Value, #[case] expected: &[u8]) {
    assert_eq!(value.encode().unwrap(), expected);

    let mut decoded = value.cleared();
    decoded.decode(expected).unwrap();
    assert_eq!(decoded, value);
}

#[test]
fn test_object_identifier() {
    let oid: ObjectIdentifier = "1.2.840.113549".parse().unwrap();
    let value = Value::object_identifier(oid.clone());
    assert_eq!(value.encode().unwrap(), hex!("06 06 2A 86 48 86 F7 0D"));

    let mut decoded = template::object_identifier();
    decoded.decode(&hex!("06 06 2A 86 48 86 F7 0D")).unwrap();
    assert_eq!(decoded.as_oid(), Some(&oid));
    assert_eq!(oid.to_string(), "1.2.840.113549");
}

#[test]
fn test_bit_string_flags() {
    // forwardable (1) and renewable (8) of a 32-bit KerberosFlags
    let mut flags = BitString::with_len(32);
    flags.set_bit(1, true);
    flags.set_bit(8, true);
    let bytes = Value::bit_string(flags.clone()).encode().unwrap();
    assert_eq!(bytes, hex!("03 05 00 40 80 00 00"));

    let mut decoded = template::bit_string();
    decoded.decode(&bytes).unwrap();
    let bits = decoded.as_bit_string().unwrap();
    assert!(bits.bit(1) && bits.bit(8) && !bits.bit(0));
    assert_eq!(bits, &flags);
}

#[test]
fn test_long_form_length() {
    let value = Value::octet_string(vec![0xAB; 200]);
    let bytes = value.encode().unwrap();
    assert_eq!(&bytes[..3], hex!("04 81 C8"));
    assert_eq!(bytes.len(), 203);

    let value = Value::octet_string(vec![0xAB; 300]);
    assert_eq!(&value.encode().unwrap()[..4], hex!("04 82 01 2C"));
}

#[test]
fn test_der_rejects_non_canonical_forms() {
    let cases: [(Value, &[u8]); 3] = [
        (template::integer(), &hex!("02 02 00 05")),
        (template::boolean(), &hex!("01 01 01")),
        (template::octet_string(), &hex!("04 81 02 AA BB")),
    ];
    for (empty, bytes) in cases {
        let mut der = empty.clone();
        assert!(matches!(
            der.decode(bytes).unwrap_err(),
            Asn1Error::MalformedTlv { .. }
        ));
        let mut ber = empty;
        ber.decode_with(bytes, &EncodingPolicy::BER).unwrap();
    }
}

#[test]
fn test_unexpected_universal_tag() {
    let mut value = template::octet_string();
    assert_eq!(
        value.decode(&hex!("02 01 05")).unwrap_err(),
        Asn1Error::UnexpectedTag {
            offset: 0,
            expected: Tag::OCTET_STRING,
            found: Tag::INTEGER,
        }
    );
}

#[test]
fn test_indefinite_length_rejected() {
    let mut value = Value::sequence_of(template::integer);
    let err = value.decode(&hex!("30 80 02 01 05 00 00")).unwrap_err();
    assert!(matches!(err, Asn1Error::MalformedTlv { offset: 1, .. }));
}

#[test]
fn test_truncated_buffer() {
    for bytes in [&hex!("04")[..], &hex!("04 05 01 02")[..], &hex!("1F")[..], &[][..]] {
        let mut value = template::octet_string();
        assert!(matches!(
            value.decode(bytes).unwrap_err(),
            Asn1Error::MalformedTlv { .. }
        ));
    }
}

static KEY: &[FieldDescriptor] = &[
    FieldDescriptor::context(0, "keytype", template::integer),
    FieldDescriptor::context(1, "keyvalue", template::octet_string).optional(),
];

#[test]
fn test_sequence_with_optional_absent() {
    let mut key = Value::sequence(KEY);
    key.as_collection_mut()
        .unwrap()
        .set(0, Value::integer(23))
        .unwrap();
    let bytes = key.encode().unwrap();
    assert_eq!(bytes, hex!("30 05 A0 03 02 01 17"));

    let mut decoded = Value::sequence(KEY);
    decoded.decode(&bytes).unwrap();
    let fields = decoded.as_collection().unwrap();
    assert_eq!(fields.get_integer(0).unwrap(), Some(23));
    assert!(!fields.is_set(1).unwrap());

    // present but empty is a different state
    let mut empty = key.clone();
    empty
        .as_collection_mut()
        .unwrap()
        .set(1, Value::octet_string(Vec::<u8>::new()))
        .unwrap();
    let bytes = empty.encode().unwrap();
    assert_eq!(bytes, hex!("30 09 A0 03 02 01 17 A1 02 04 00"));
    decoded.decode(&bytes).unwrap();
    assert_eq!(decoded.as_collection().unwrap().get_octets(1).unwrap(), Some(&[][..]));
}

static RECORD: &[FieldDescriptor] = &[
    FieldDescriptor::context(0, "id", template::integer),
    FieldDescriptor::context(1, "label", template::octet_string).optional(),
    FieldDescriptor::context(2, "active", template::boolean).optional(),
];

proptest! {
    #[test]
    fn integer_round_trip(value in any::<i64>()) {
        let bytes = Value::integer(value).encode().unwrap();
        let mut decoded = template::integer();
        decoded.decode(&bytes).unwrap();
        prop_assert_eq!(decoded.as_integer(), Some(value));
    }

    #[test]
    fn octet_string_round_trip(data in proptest::collection::vec(any::<u8>(), 0..600)) {
        let value = Value::octet_string(data);
        let mut decoded = template::octet_string();
        decoded.decode(&value.encode().unwrap()).unwrap();
        prop_assert_eq!(decoded, value);
    }

    #[test]
    fn sequence_of_round_trip(items in proptest::collection::vec(any::<i64>(), 0..40)) {
        let mut value = Value::sequence_of(template::integer);
        let elements = value.as_collection_of_mut().unwrap();
        for item in &items {
            elements.push(Value::integer(*item)).unwrap();
        }
        let mut decoded = Value::sequence_of(template::integer);
        decoded.decode(&value.encode().unwrap()).unwrap();
        prop_assert_eq!(decoded, value);
    }

    #[test]
    fn sequence_with_optional_fields_round_trip(
        id in any::<i64>(),
        label in proptest::option::of(proptest::collection::vec(any::<u8>(), 0..200)),
        active in proptest::option::of(any::<bool>()),
    ) {
        let mut value = Value::sequence(RECORD);
        let fields = value.as_collection_mut().unwrap();
        fields.set(0, Value::integer(id)).unwrap();
        fields.set_optional(1, label.clone().map(Value::octet_string)).unwrap();
        fields.set_optional(2, active.map(Value::boolean)).unwrap();

        let mut decoded = Value::sequence(RECORD);
        decoded.decode(&value.encode().unwrap()).unwrap();
        let fields = decoded.as_collection().unwrap();
        prop_assert_eq!(fields.get_integer(0).unwrap(), Some(id));
        prop_assert_eq!(fields.get_octets(1).unwrap(), label.as_deref());
        prop_assert_eq!(fields.get_bool(2).unwrap(), active);
        prop_assert_eq!(decoded, value);
    }

    #[test]
    fn set_of_round_trip(items in proptest::collection::vec(proptest::collection::vec(any::<u8>(), 0..20), 0..30)) {
        let mut value = Value::set_of(template::octet_string);
        let elements = value.as_collection_of_mut().unwrap();
        for item in &items {
            elements.push(Value::octet_string(item.clone())).unwrap();
        }
        let mut decoded = Value::set_of(template::octet_string);
        decoded.decode(&value.encode().unwrap()).unwrap();
        prop_assert_eq!(decoded.as_collection_of().unwrap().len(), items.len());
        prop_assert_eq!(decoded, value);
    }
}
