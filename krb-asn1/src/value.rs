//! The dynamic value tree
//!
//! A [`Value`] is one node of an ASN.1 value: a primitive leaf, a composite
//! built from a descriptor table, a re-tagged value, or a raw TLV. Schemas
//! are expressed by constructing empty values (see [`crate::template`]) and
//! decoding into them; the value's variant tells the decoder what to expect.
//!
//! # Usage Example
//!
//! ```rust
//! use krb_asn1::{TaggingOption, Value};
//!
//! let value = Value::visible_string("Jones");
//! let bytes = value.tagged_encode(&TaggingOption::implicit_application(3)).unwrap();
//! assert_eq!(bytes, [0x43, 0x05, b'J', b'o', b'n', b'e', b's']);
//!
//! let mut decoded = Value::visible_string("");
//! decoded.tagged_decode(&bytes, &TaggingOption::implicit_application(3)).unwrap();
//! assert_eq!(decoded, value);
//! ```

use crate::any::Any;
use crate::ber::{BerDecoder, BerEncoder, Tag, Tlv};
use crate::choice::Choice;
use crate::collection::{Collection, CollectionOf};
use crate::error::{Asn1Error, Asn1Result};
use crate::policy::{EncodingPolicy, EncodingRules};
use crate::primitive::Primitive;
use crate::schema::{same_schema, FieldDescriptor, ValueFactory};
use crate::tagging::{decode_tagged, decode_tagged_content, encode_tagged, tagged_parts, Tagged, TaggingOption};
use crate::types::{Asn1String, BitString, ObjectIdentifier, StringKind};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Primitive(Primitive),
    Sequence(Collection),
    Set(Collection),
    SequenceOf(CollectionOf),
    SetOf(CollectionOf),
    Choice(Choice),
    Tagged(Tagged),
    Any(Any),
}

impl From<Primitive> for Value {
    fn from(primitive: Primitive) -> Self {
        Value::Primitive(primitive)
    }
}

impl From<Tagged> for Value {
    fn from(tagged: Tagged) -> Self {
        Value::Tagged(tagged)
    }
}

impl From<Any> for Value {
    fn from(any: Any) -> Self {
        Value::Any(any)
    }
}

// Constructors
impl Value {
    pub fn boolean(value: bool) -> Self {
        Value::Primitive(Primitive::Boolean(value))
    }

    pub fn integer(value: i64) -> Self {
        Value::Primitive(Primitive::Integer(value))
    }

    pub fn enumerated(value: i64) -> Self {
        Value::Primitive(Primitive::Enumerated(value))
    }

    pub fn bit_string(bits: BitString) -> Self {
        Value::Primitive(Primitive::BitString(bits))
    }

    pub fn octet_string(bytes: impl Into<Vec<u8>>) -> Self {
        Value::Primitive(Primitive::OctetString(bytes.into()))
    }

    pub fn null() -> Self {
        Value::Primitive(Primitive::Null)
    }

    pub fn object_identifier(oid: ObjectIdentifier) -> Self {
        Value::Primitive(Primitive::ObjectIdentifier(oid))
    }

    pub fn string(kind: StringKind, text: impl Into<String>) -> Self {
        Value::Primitive(Primitive::String(Asn1String::new(kind, text)))
    }

    pub fn utf8_string(text: impl Into<String>) -> Self {
        Self::string(StringKind::Utf8, text)
    }

    pub fn printable_string(text: impl Into<String>) -> Self {
        Self::string(StringKind::Printable, text)
    }

    pub fn ia5_string(text: impl Into<String>) -> Self {
        Self::string(StringKind::Ia5, text)
    }

    pub fn visible_string(text: impl Into<String>) -> Self {
        Self::string(StringKind::Visible, text)
    }

    pub fn general_string(text: impl Into<String>) -> Self {
        Self::string(StringKind::General, text)
    }

    pub fn utc_time(time: DateTime<Utc>) -> Self {
        Value::Primitive(Primitive::UtcTime(time))
    }

    pub fn generalized_time(time: DateTime<Utc>) -> Self {
        Value::Primitive(Primitive::GeneralizedTime(time))
    }

    /// Empty SEQUENCE over `fields`
    pub fn sequence(fields: &'static [FieldDescriptor]) -> Self {
        Value::Sequence(Collection::new(fields))
    }

    /// Empty SET over `fields`
    pub fn set(fields: &'static [FieldDescriptor]) -> Self {
        Value::Set(Collection::new(fields))
    }

    pub fn sequence_of(element: ValueFactory) -> Self {
        Value::SequenceOf(CollectionOf::new(element))
    }

    pub fn set_of(element: ValueFactory) -> Self {
        Value::SetOf(CollectionOf::new(element))
    }

    /// CHOICE over `alternatives`, nothing selected
    pub fn choice(alternatives: &'static [FieldDescriptor]) -> Self {
        Value::Choice(Choice::new(alternatives))
    }

    pub fn tagged(option: TaggingOption, inner: Value) -> Self {
        Value::Tagged(Tagged::new(option, inner))
    }

    /// Raw TLV; `raw` must hold exactly one
    pub fn any(raw: impl Into<Vec<u8>>) -> Asn1Result<Self> {
        Ok(Value::Any(Any::new(raw.into())?))
    }
}

// Type information
impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Primitive(primitive) => primitive.type_name(),
            Value::Sequence(_) => "SEQUENCE",
            Value::Set(_) => "SET",
            Value::SequenceOf(_) => "SEQUENCE OF",
            Value::SetOf(_) => "SET OF",
            Value::Choice(_) => "CHOICE",
            Value::Tagged(tagged) => tagged.inner().type_name(),
            Value::Any(_) => "ANY",
        }
    }

    /// Same schema type as `other`, content ignored
    pub fn same_type(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Primitive(a), Value::Primitive(b)) => a.same_type(b),
            (Value::Sequence(a), Value::Sequence(b)) | (Value::Set(a), Value::Set(b)) => {
                same_schema(a.fields(), b.fields())
            }
            (Value::SequenceOf(a), Value::SequenceOf(b)) | (Value::SetOf(a), Value::SetOf(b)) => {
                a.template().same_type(&b.template())
            }
            (Value::Choice(a), Value::Choice(b)) => same_schema(a.alternatives(), b.alternatives()),
            (Value::Tagged(a), Value::Tagged(b)) => {
                a.option() == b.option() && a.inner().same_type(b.inner())
            }
            (Value::Any(_), Value::Any(_)) => true,
            _ => false,
        }
    }

    /// The value's own tag
    ///
    /// `None` for a CHOICE (its tag is that of the selected alternative) and
    /// for an empty ANY.
    pub fn tag(&self) -> Option<Tag> {
        match self {
            Value::Primitive(primitive) => Some(primitive.tag()),
            Value::Sequence(_) | Value::SequenceOf(_) => Some(Tag::SEQUENCE),
            Value::Set(_) | Value::SetOf(_) => Some(Tag::SET),
            Value::Tagged(tagged) => Some(tagged.option().outer_tag(tagged.inner())),
            Value::Choice(_) => None,
            Value::Any(any) => any.tag(),
        }
    }

    pub fn is_constructed(&self) -> bool {
        match self {
            Value::Choice(choice) => choice.selected().is_some_and(|(_, value)| value.is_constructed()),
            other => other.tag().is_some_and(|tag| tag.is_constructed()),
        }
    }

    /// True when a TLV tagged `tag` can be decoded into this value
    pub fn matches_tag(&self, tag: &Tag) -> bool {
        match self {
            Value::Choice(choice) => choice.matches_tag(tag),
            Value::Any(_) => true,
            Value::Tagged(tagged) => tagged.option().matches(tag),
            other => other.tag().is_some_and(|own| own.same_identity(tag)),
        }
    }

    /// CHOICE and ANY cannot be implicitly tagged
    ///
    /// A tagged value always has an outer tag to replace, even when its own
    /// IMPLICIT tag was promoted.
    pub(crate) fn can_tag_implicitly(&self) -> bool {
        !matches!(self, Value::Choice(_) | Value::Any(_))
    }

    /// Policy override carried by this value
    pub fn policy(&self) -> Option<&EncodingPolicy> {
        match self {
            Value::Sequence(c) | Value::Set(c) => c.policy(),
            Value::SequenceOf(c) | Value::SetOf(c) => c.policy(),
            Value::Choice(c) => c.policy(),
            Value::Tagged(t) => t.policy(),
            Value::Primitive(_) | Value::Any(_) => None,
        }
    }

    /// Override the inherited policy for this subtree
    ///
    /// Primitives and ANY have no policy of their own and are returned
    /// unchanged.
    pub fn with_policy(mut self, policy: EncodingPolicy) -> Self {
        match &mut self {
            Value::Sequence(c) | Value::Set(c) => c.set_policy(Some(policy)),
            Value::SequenceOf(c) | Value::SetOf(c) => c.set_policy(Some(policy)),
            Value::Choice(c) => c.set_policy(Some(policy)),
            Value::Tagged(t) => t.set_policy(Some(policy)),
            Value::Primitive(_) | Value::Any(_) => {}
        }
        self
    }

    fn resolve(&self, inherited: &EncodingPolicy) -> EncodingPolicy {
        self.policy().copied().unwrap_or(*inherited)
    }

    /// Same type and policy with all content removed
    pub fn cleared(&self) -> Value {
        match self {
            Value::Primitive(primitive) => Value::Primitive(primitive.cleared()),
            Value::Sequence(c) => Value::Sequence(c.cleared()),
            Value::Set(c) => Value::Set(c.cleared()),
            Value::SequenceOf(c) => Value::SequenceOf(c.cleared()),
            Value::SetOf(c) => Value::SetOf(c.cleared()),
            Value::Choice(c) => Value::Choice(c.cleared()),
            Value::Tagged(t) => Value::Tagged(t.cleared()),
            Value::Any(_) => Value::Any(Any::default()),
        }
    }
}

// Encoding
impl Value {
    /// DER encoding of the value under the default policy
    pub fn encode(&self) -> Asn1Result<Vec<u8>> {
        self.encode_with(&EncodingPolicy::default())
    }

    /// Complete TLV under `policy`, unless this value overrides it
    pub fn encode_with(&self, policy: &EncodingPolicy) -> Asn1Result<Vec<u8>> {
        let policy = self.resolve(policy);
        match self {
            Value::Choice(choice) => choice.encode(&policy),
            Value::Any(any) => any.encode(),
            _ => {
                let (tag, content) = self.encode_parts(&policy)?;
                let mut encoder = BerEncoder::with_capacity(content.len() + 8);
                encoder.encode_tlv(&tag, &content);
                Ok(encoder.into_bytes())
            }
        }
    }

    /// Tag and content octets, the pieces implicit tagging works on
    pub fn encode_parts(&self, policy: &EncodingPolicy) -> Asn1Result<(Tag, Vec<u8>)> {
        let policy = self.resolve(policy);
        match self {
            Value::Primitive(primitive) => Ok((primitive.tag(), primitive.encode_content()?)),
            Value::Sequence(c) => Ok((Tag::SEQUENCE, c.encode_content(&policy)?)),
            Value::Set(c) => Ok((Tag::SET, c.encode_content(&policy)?)),
            Value::SequenceOf(c) => Ok((Tag::SEQUENCE, c.encode_content(&policy)?)),
            Value::SetOf(c) => Ok((Tag::SET, c.encode_content(&policy)?)),
            Value::Tagged(t) => tagged_parts(t.inner(), t.option(), &policy),
            Value::Choice(_) | Value::Any(_) => {
                let encoded = self.encode_with(&policy)?;
                let tlv = BerDecoder::new(&encoded, EncodingRules::Ber).read_tlv()?;
                Ok((tlv.tag, tlv.content.to_vec()))
            }
        }
    }

    /// Encode re-tagged under `option` without changing the value
    pub fn tagged_encode(&self, option: &TaggingOption) -> Asn1Result<Vec<u8>> {
        self.tagged_encode_with(option, &EncodingPolicy::default())
    }

    pub fn tagged_encode_with(
        &self,
        option: &TaggingOption,
        policy: &EncodingPolicy,
    ) -> Asn1Result<Vec<u8>> {
        encode_tagged(self, option, &self.resolve(policy))
    }
}

// Decoding
impl Value {
    /// Populate this value from DER bytes
    ///
    /// Decoding is all-or-nothing: on error `self` is left untouched.
    pub fn decode(&mut self, bytes: &[u8]) -> Asn1Result<()> {
        self.decode_with(bytes, &EncodingPolicy::default())
    }

    pub fn decode_with(&mut self, bytes: &[u8], policy: &EncodingPolicy) -> Asn1Result<()> {
        let policy = self.resolve(policy);
        let mut scratch = self.cleared();
        let mut decoder = BerDecoder::new(bytes, policy.rules);
        let tlv = decoder.read_tlv()?;
        scratch.decode_tlv(&tlv, &policy)?;
        decoder.finish(&policy)?;
        *self = scratch;
        Ok(())
    }

    /// Inverse of [`Value::tagged_encode`]
    pub fn tagged_decode(&mut self, bytes: &[u8], option: &TaggingOption) -> Asn1Result<()> {
        self.tagged_decode_with(bytes, option, &EncodingPolicy::default())
    }

    pub fn tagged_decode_with(
        &mut self,
        bytes: &[u8],
        option: &TaggingOption,
        policy: &EncodingPolicy,
    ) -> Asn1Result<()> {
        let policy = self.resolve(policy);
        let mut scratch = self.cleared();
        let mut decoder = BerDecoder::new(bytes, policy.rules);
        let tlv = decoder.read_tlv()?;
        decode_tagged(&mut scratch, option, &tlv, &policy)?;
        decoder.finish(&policy)?;
        *self = scratch;
        Ok(())
    }

    /// Decode one parsed TLV, checking its tag against this value's
    pub(crate) fn decode_tlv(&mut self, tlv: &Tlv<'_>, inherited: &EncodingPolicy) -> Asn1Result<()> {
        let policy = self.resolve(inherited);
        match self {
            Value::Choice(choice) => choice.decode_tlv(tlv, &policy),
            Value::Any(any) => {
                *any = Any::from_tlv(tlv);
                Ok(())
            }
            Value::Tagged(tagged) => {
                let option = *tagged.option();
                decode_tagged(tagged.inner_mut(), &option, tlv, &policy)
            }
            _ => {
                let Some(expected) = self.tag() else {
                    return Err(Asn1Error::malformed(tlv.offset, "value has no tag to match"));
                };
                if !expected.same_identity(&tlv.tag) {
                    return Err(Asn1Error::UnexpectedTag {
                        offset: tlv.offset,
                        expected,
                        found: tlv.tag,
                    });
                }
                self.decode_content(tlv.tag.is_constructed(), tlv.content, tlv.content_offset(), &policy)
            }
        }
    }

    /// Decode content octets whose tag has already been dealt with
    ///
    /// `constructed` is the constructed bit seen on the wire; implicit
    /// tagging lands here with the outer tag's bit.
    pub(crate) fn decode_content(
        &mut self,
        constructed: bool,
        content: &[u8],
        offset: usize,
        inherited: &EncodingPolicy,
    ) -> Asn1Result<()> {
        let policy = self.resolve(inherited);
        let type_name = self.type_name();
        let require = |expected: bool| -> Asn1Result<()> {
            if constructed == expected {
                return Ok(());
            }
            let form = if expected { "constructed" } else { "primitive" };
            Err(Asn1Error::malformed(
                offset,
                format!("{} must use the {} encoding", type_name, form),
            ))
        };

        match self {
            Value::Primitive(primitive) => {
                require(false)?;
                primitive.decode_content(content, offset, &policy)
            }
            Value::Sequence(c) | Value::Set(c) => {
                require(true)?;
                c.decode_content(content, offset, &policy)
            }
            Value::SequenceOf(c) | Value::SetOf(c) => {
                require(true)?;
                c.decode_content(content, offset, &policy)
            }
            Value::Tagged(tagged) => {
                let option = *tagged.option();
                decode_tagged_content(tagged.inner_mut(), &option, constructed, content, offset, &policy)
            }
            Value::Choice(_) | Value::Any(_) => Err(Asn1Error::malformed(
                offset,
                format!("{} cannot be implicitly tagged", type_name),
            )),
        }
    }
}

// Accessors
//
// Leaf accessors see through `Tagged` wrappers.
impl Value {
    /// The value with every `Tagged` layer removed
    pub fn untagged(&self) -> &Value {
        match self {
            Value::Tagged(tagged) => tagged.inner().untagged(),
            other => other,
        }
    }

    pub fn untagged_mut(&mut self) -> &mut Value {
        match self {
            Value::Tagged(tagged) => tagged.inner_mut().untagged_mut(),
            other => other,
        }
    }

    pub fn as_primitive(&self) -> Option<&Primitive> {
        match self.untagged() {
            Value::Primitive(primitive) => Some(primitive),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.as_primitive()? {
            Primitive::Boolean(value) => Some(*value),
            _ => None,
        }
    }

    /// INTEGER or ENUMERATED
    pub fn as_integer(&self) -> Option<i64> {
        match self.as_primitive()? {
            Primitive::Integer(value) | Primitive::Enumerated(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_octets(&self) -> Option<&[u8]> {
        match self.as_primitive()? {
            Primitive::OctetString(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Text of any character string type
    pub fn as_str(&self) -> Option<&str> {
        match self.as_primitive()? {
            Primitive::String(text) => Some(text.as_str()),
            _ => None,
        }
    }

    /// UTCTime or GeneralizedTime
    pub fn as_time(&self) -> Option<DateTime<Utc>> {
        match self.as_primitive()? {
            Primitive::UtcTime(time) | Primitive::GeneralizedTime(time) => Some(*time),
            _ => None,
        }
    }

    pub fn as_bit_string(&self) -> Option<&BitString> {
        match self.as_primitive()? {
            Primitive::BitString(bits) => Some(bits),
            _ => None,
        }
    }

    pub fn as_oid(&self) -> Option<&ObjectIdentifier> {
        match self.as_primitive()? {
            Primitive::ObjectIdentifier(oid) => Some(oid),
            _ => None,
        }
    }

    /// Fields of a SEQUENCE or SET
    pub fn as_collection(&self) -> Option<&Collection> {
        match self.untagged() {
            Value::Sequence(c) | Value::Set(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_collection_mut(&mut self) -> Option<&mut Collection> {
        match self.untagged_mut() {
            Value::Sequence(c) | Value::Set(c) => Some(c),
            _ => None,
        }
    }

    /// Elements of a SEQUENCE OF or SET OF
    pub fn as_collection_of(&self) -> Option<&CollectionOf> {
        match self.untagged() {
            Value::SequenceOf(c) | Value::SetOf(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_collection_of_mut(&mut self) -> Option<&mut CollectionOf> {
        match self.untagged_mut() {
            Value::SequenceOf(c) | Value::SetOf(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_choice(&self) -> Option<&Choice> {
        match self.untagged() {
            Value::Choice(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_choice_mut(&mut self) -> Option<&mut Choice> {
        match self.untagged_mut() {
            Value::Choice(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_tagged(&self) -> Option<&Tagged> {
        match self {
            Value::Tagged(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_any(&self) -> Option<&Any> {
        match self.untagged() {
            Value::Any(any) => Some(any),
            _ => None,
        }
    }
}
