//! X.690 Annex A: the PersonnelRecord example
//!
//! ```text
//! PersonnelRecord ::= [APPLICATION 0] IMPLICIT SET {
//!     name          Name,
//!     title         [0] VisibleString,
//!     number        EmployeeNumber,
//!     dateOfHire    [1] Date,
//!     nameOfSpouse  [2] Name,
//!     children      [3] IMPLICIT SEQUENCE OF ChildInformation DEFAULT {} }
//!
//! ChildInformation ::= SET { name Name, dateOfBirth [0] Date }
//!
//! Name ::= [APPLICATION 1] IMPLICIT SEQUENCE {
//!     givenName VisibleString, initial VisibleString, familyName VisibleString }
//!
//! EmployeeNumber ::= [APPLICATION 2] IMPLICIT INTEGER
//! Date ::= [APPLICATION 3] IMPLICIT VisibleString -- YYYYMMDD
//! ```

use hex_literal::hex;
use krb_asn1::{
    template, Asn1Error, Collection, CollectionOf, FieldDescriptor, TaggingOption, Value,
};

static NAME: &[FieldDescriptor] = &[
    FieldDescriptor::untagged(0, "givenName", template::visible_string),
    FieldDescriptor::untagged(1, "initial", template::visible_string),
    FieldDescriptor::untagged(2, "familyName", template::visible_string),
];

static CHILD_INFORMATION: &[FieldDescriptor] = &[
    FieldDescriptor::untagged(0, "name", name_template),
    FieldDescriptor::context(1, "dateOfBirth", date_template).tag_number(0).explicit(),
];

static PERSONNEL_RECORD: &[FieldDescriptor] = &[
    FieldDescriptor::untagged(0, "name", name_template),
    FieldDescriptor::context(1, "title", template::visible_string).tag_number(0).explicit(),
    FieldDescriptor::untagged(2, "number", employee_number_template),
    FieldDescriptor::context(3, "dateOfHire", date_template).tag_number(1).explicit(),
    FieldDescriptor::context(4, "nameOfSpouse", name_template).tag_number(2).explicit(),
    FieldDescriptor::context(5, "children", children_template)
        .tag_number(3)
        .implicit()
        .optional(),
];

fn name_template() -> Value {
    Value::tagged(TaggingOption::implicit_application(1), Value::sequence(NAME))
}

fn date_template() -> Value {
    Value::tagged(TaggingOption::implicit_application(3), template::visible_string())
}

fn employee_number_template() -> Value {
    Value::tagged(TaggingOption::implicit_application(2), template::integer())
}

fn child_information_template() -> Value {
    Value::set(CHILD_INFORMATION)
}

fn children_template() -> Value {
    Value::sequence_of(child_information_template)
}

fn record_template() -> Value {
    Value::tagged(TaggingOption::implicit_application(0), Value::set(PERSONNEL_RECORD))
}

fn name(given: &str, initial: &str, family: &str) -> Value {
    let fields = Collection::new(NAME)
        .with(0, Value::visible_string(given))
        .and_then(|c| c.with(1, Value::visible_string(initial)))
        .and_then(|c| c.with(2, Value::visible_string(family)))
        .unwrap();
    Value::tagged(TaggingOption::implicit_application(1), Value::Sequence(fields))
}

fn date(text: &str) -> Value {
    Value::tagged(TaggingOption::implicit_application(3), Value::visible_string(text))
}

fn child(name_value: Value, birth: &str) -> Value {
    let fields = Collection::new(CHILD_INFORMATION)
        .with(0, name_value)
        .and_then(|c| c.with(1, date(birth)))
        .unwrap();
    Value::Set(fields)
}

fn smith_record() -> Value {
    let children = CollectionOf::new(child_information_template)
        .with(child(name("Ralph", "T", "Smith"), "19571111"))
        .and_then(|c| c.with(child(name("Susan", "B", "Jones"), "19590717")))
        .unwrap();

    let fields = Collection::new(PERSONNEL_RECORD)
        .with(0, name("John", "P", "Smith"))
        .and_then(|c| c.with(1, Value::visible_string("Director")))
        .and_then(|c| {
            c.with(
                2,
                Value::tagged(TaggingOption::implicit_application(2), Value::integer(51)),
            )
        })
        .and_then(|c| c.with(3, date("19710917")))
        .and_then(|c| c.with(4, name("Mary", "T", "Smith")))
        .and_then(|c| c.with(5, Value::SequenceOf(children)))
        .unwrap();

    Value::tagged(TaggingOption::implicit_application(0), Value::Set(fields))
}

/// X.690 A.3, in the field order of the record
fn encoded() -> Vec<u8> {
    [
        &hex!("60 81 85")[..],
        &hex!("61 10 1A 04 4A 6F 68 6E 1A 01 50 1A 05 53 6D 69 74 68")[..],
        &hex!("A0 0A 1A 08 44 69 72 65 63 74 6F 72")[..],
        &hex!("42 01 33")[..],
        &hex!("A1 0A 43 08 31 39 37 31 30 39 31 37")[..],
        &hex!("A2 12 61 10 1A 04 4D 61 72 79 1A 01 54 1A 05 53 6D 69 74 68")[..],
        &hex!("A3 42")[..],
        &hex!("31 1F 61 11 1A 05 52 61 6C 70 68 1A 01 54 1A 05 53 6D 69 74 68")[..],
        &hex!("A0 0A 43 08 31 39 35 37 31 31 31 31")[..],
        &hex!("31 1F 61 11 1A 05 53 75 73 61 6E 1A 01 42 1A 05 4A 6F 6E 65 73")[..],
        &hex!("A0 0A 43 08 31 39 35 39 30 37 31 37")[..],
    ]
    .concat()
}

#[test]
fn test_encode_matches_x690() {
    let encoded = encoded();
    assert_eq!(encoded.len(), 136);
    assert_eq!(smith_record().encode().unwrap(), encoded);
}

#[test]
fn test_decode_matches_x690() {
    let mut record = record_template();
    record.decode(&encoded()).unwrap();
    assert_eq!(record, smith_record());

    let fields = record.as_collection().unwrap();
    assert_eq!(fields.get_string(1).unwrap(), Some("Director"));
    assert_eq!(fields.get_integer(2).unwrap(), Some(51));
    assert_eq!(fields.get_string(3).unwrap(), Some("19710917"));

    let spouse = fields.get_collection(4).unwrap().unwrap();
    assert_eq!(spouse.get_string(0).unwrap(), Some("Mary"));

    let children = fields.get_collection_of(5).unwrap().unwrap();
    assert_eq!(children.len(), 2);
    let second = children.get(1).and_then(Value::as_collection).unwrap();
    assert_eq!(second.get_string(1).unwrap(), Some("19590717"));
}

#[test]
fn test_children_default_empty() {
    let mut record = smith_record();
    record.as_collection_mut().unwrap().clear(5).unwrap();
    let bytes = record.encode().unwrap();
    assert_eq!(&bytes[..2], hex!("60 41"));

    let mut decoded = record_template();
    decoded.decode(&bytes).unwrap();
    assert!(!decoded.as_collection().unwrap().is_set(5).unwrap());
}

#[test]
fn test_missing_spouse_is_reported_with_path() {
    let mut record = smith_record();
    record.as_collection_mut().unwrap().clear(4).unwrap();
    assert!(matches!(record.encode(), Err(Asn1Error::Encoding(_))));

    // drop nameOfSpouse from the wire form and fix up the outer length
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&hex!("60 71"));
    let encoded = encoded();
    bytes.extend_from_slice(&encoded[3..48]);
    bytes.extend_from_slice(&encoded[68..]);
    let mut decoded = record_template();
    let err = decoded.decode(&bytes).unwrap_err();
    assert_eq!(
        err,
        Asn1Error::MissingRequiredField {
            index: 4,
            name: "nameOfSpouse"
        }
    );
}

#[test]
fn test_child_birth_date_error_path() {
    let mut bytes = encoded();
    // first child's dateOfBirth: [APPLICATION 3] -> [APPLICATION 4]
    let position = 3 + 65 + 2 + 21 + 2;
    assert_eq!(bytes[position], 0x43);
    bytes[position] = 0x44;

    let err = record_template().decode(&bytes).unwrap_err();
    assert_eq!(err.field_path(), vec![5, 0, 1]);
    assert!(matches!(err.root_cause(), Asn1Error::UnexpectedTag { .. }));
}
