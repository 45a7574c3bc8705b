//! Field-descriptor tables
//!
//! A SEQUENCE, SET or CHOICE schema is an immutable `&'static` slice of
//! [`FieldDescriptor`]s. Each descriptor names its slot, how it is tagged on
//! the wire, and a factory producing an empty value of the field's type.
//! Decoding routes every child TLV through this table; nothing is looked up
//! by name or type at run time.
//!
//! ```rust
//! use krb_asn1::{template, FieldDescriptor, Value};
//!
//! static ENCRYPTION_KEY: &[FieldDescriptor] = &[
//!     FieldDescriptor::context(0, "keytype", template::integer),
//!     FieldDescriptor::context(1, "keyvalue", template::octet_string),
//! ];
//!
//! let mut key = Value::sequence(ENCRYPTION_KEY);
//! let fields = key.as_collection_mut().unwrap();
//! fields.set(0, Value::integer(17)).unwrap();
//! fields.set(1, Value::octet_string([0u8; 16])).unwrap();
//! assert_eq!(key.encode().unwrap()[..2], [0x30, 0x19]);
//! ```

use crate::ber::{Tag, TagClass, Tlv};
use crate::error::Asn1Result;
use crate::policy::{EncodingPolicy, TaggingMode};
use crate::tagging::{decode_tagged, encode_tagged, TaggingOption};
use crate::value::Value;

/// Produces an empty value of a field's type
pub type ValueFactory = fn() -> Value;

/// How a field is identified on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldTag {
    /// The value's own tag, no wrapping
    Untagged,
    /// `[n]`, context-specific
    Context(u32),
}

/// One slot of a SEQUENCE, SET or CHOICE
#[derive(Debug, Clone, Copy)]
pub struct FieldDescriptor {
    pub index: usize,
    pub name: &'static str,
    pub tag: FieldTag,
    /// `None` follows the policy's tagging mode
    pub mode: Option<TaggingMode>,
    pub optional: bool,
    pub factory: ValueFactory,
}

impl FieldDescriptor {
    /// Field tagged `[index]`, the RFC 4120 convention
    pub const fn context(index: usize, name: &'static str, factory: ValueFactory) -> Self {
        Self {
            index,
            name,
            tag: FieldTag::Context(index as u32),
            mode: None,
            optional: false,
            factory,
        }
    }

    /// Field carried under its value's own tag
    pub const fn untagged(index: usize, name: &'static str, factory: ValueFactory) -> Self {
        Self {
            index,
            name,
            tag: FieldTag::Untagged,
            mode: None,
            optional: false,
            factory,
        }
    }

    /// Context tag number differing from the field index
    pub const fn tag_number(self, number: u32) -> Self {
        Self {
            tag: FieldTag::Context(number),
            ..self
        }
    }

    pub const fn optional(self) -> Self {
        Self {
            optional: true,
            ..self
        }
    }

    pub const fn implicit(self) -> Self {
        Self {
            mode: Some(TaggingMode::Implicit),
            ..self
        }
    }

    pub const fn explicit(self) -> Self {
        Self {
            mode: Some(TaggingMode::Explicit),
            ..self
        }
    }

    /// Empty value of the field's type
    pub fn template(&self) -> Value {
        (self.factory)()
    }

    /// Re-tag applied to this field under `policy`
    pub fn tagging(&self, policy: &EncodingPolicy) -> Option<TaggingOption> {
        match self.tag {
            FieldTag::Untagged => None,
            FieldTag::Context(number) => Some(TaggingOption::new(
                TagClass::ContextSpecific,
                number,
                self.mode.unwrap_or(policy.tagging),
            )),
        }
    }

    /// True when a child TLV with `tag` belongs to this field
    pub fn matches(&self, tag: &Tag) -> bool {
        match self.tag {
            FieldTag::Context(number) => {
                tag.class() == TagClass::ContextSpecific && tag.number() == number
            }
            FieldTag::Untagged => self.template().matches_tag(tag),
        }
    }

    /// Complete TLV of `value` as this field
    pub(crate) fn encode_field(&self, value: &Value, policy: &EncodingPolicy) -> Asn1Result<Vec<u8>> {
        let encoded = match self.tagging(policy) {
            Some(option) => encode_tagged(value, &option, policy),
            None => value.encode_with(policy),
        };
        encoded.map_err(|e| e.in_field(self.index, self.name))
    }

    /// Fresh value of the field's type decoded from `tlv`
    pub(crate) fn decode_field(&self, tlv: &Tlv<'_>, policy: &EncodingPolicy) -> Asn1Result<Value> {
        let mut value = self.template();
        let decoded = match self.tagging(policy) {
            Some(option) => decode_tagged(&mut value, &option, tlv, policy),
            None => value.decode_tlv(tlv, policy),
        };
        decoded.map_err(|e| e.in_field(self.index, self.name))?;
        Ok(value)
    }
}

/// Two tables describe the same schema
pub(crate) fn same_schema(a: &[FieldDescriptor], b: &[FieldDescriptor]) -> bool {
    std::ptr::eq(a, b)
        || (a.len() == b.len()
            && a.iter().zip(b).all(|(x, y)| {
                x.name == y.name && x.tag == y.tag && x.mode == y.mode && x.optional == y.optional
            }))
}

/// Descriptor indices must equal their positions
pub(crate) fn is_well_formed(fields: &[FieldDescriptor]) -> bool {
    fields.iter().enumerate().all(|(position, field)| field.index == position)
}

/// Strongly-typed schema struct over the dynamic [`Value`] tree
///
/// Implementors convert to and from a [`Value`] built on their descriptor
/// table and get DER encode/decode for free.
pub trait Asn1Type: Sized {
    /// Empty value of the schema, ready to be decoded into
    fn template() -> Value;

    fn to_value(&self) -> Asn1Result<Value>;

    fn from_value(value: &Value) -> Asn1Result<Self>;

    fn encode(&self) -> Asn1Result<Vec<u8>> {
        self.to_value()?.encode()
    }

    fn encode_with(&self, policy: &EncodingPolicy) -> Asn1Result<Vec<u8>> {
        self.to_value()?.encode_with(policy)
    }

    fn decode(bytes: &[u8]) -> Asn1Result<Self> {
        Self::decode_with(bytes, &EncodingPolicy::default())
    }

    fn decode_with(bytes: &[u8], policy: &EncodingPolicy) -> Asn1Result<Self> {
        let mut value = Self::template();
        value.decode_with(bytes, policy)?;
        Self::from_value(&value)
    }

    fn tagged_encode(&self, option: &TaggingOption) -> Asn1Result<Vec<u8>> {
        self.to_value()?.tagged_encode(option)
    }
}
