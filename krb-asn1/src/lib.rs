//! ASN.1 BER/DER engine for Kerberos message types
//!
//! This crate provides the Tag-Length-Value machinery every Kerberos
//! message is built on: the tag and length codecs, primitive universal
//! types, SEQUENCE / SET / SEQUENCE OF / SET OF / CHOICE composites driven
//! by immutable field-descriptor tables, implicit and explicit re-tagging,
//! and a BER/DER encoding policy inherited down the value tree.
//!
//! # Usage Example
//!
//! ```rust
//! use krb_asn1::{template, FieldDescriptor, TaggingOption, Value};
//!
//! static PA_DATA: &[FieldDescriptor] = &[
//!     FieldDescriptor::context(0, "padata-type", template::integer).tag_number(1),
//!     FieldDescriptor::context(1, "padata-value", template::octet_string).tag_number(2),
//! ];
//!
//! let mut pa = Value::sequence(PA_DATA);
//! let fields = pa.as_collection_mut().unwrap();
//! fields.set(0, Value::integer(2)).unwrap();
//! fields.set(1, Value::octet_string(vec![0x30, 0x00])).unwrap();
//! let bytes = pa.encode().unwrap();
//!
//! let mut decoded = Value::sequence(PA_DATA);
//! decoded.decode(&bytes).unwrap();
//! assert_eq!(decoded, pa);
//! ```

pub mod any;
pub mod ber;
pub mod choice;
pub mod collection;
pub mod dump;
pub mod error;
pub mod policy;
pub mod primitive;
pub mod schema;
pub mod tagging;
pub mod template;
pub mod types;
pub mod value;

pub use any::Any;
pub use ber::{BerDecoder, BerEncoder, Length, Tag, TagClass, Tlv};
pub use choice::Choice;
pub use collection::{Collection, CollectionOf};
pub use dump::dump;
pub use error::{Asn1Error, Asn1Result};
pub use policy::{EncodingPolicy, EncodingRules, TaggingMode};
pub use primitive::Primitive;
pub use schema::{Asn1Type, FieldDescriptor, FieldTag, ValueFactory};
pub use tagging::{Tagged, TaggingOption};
pub use types::{Asn1String, BitString, ObjectIdentifier, StringKind};
pub use value::Value;
