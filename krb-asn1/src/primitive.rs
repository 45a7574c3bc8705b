//! Primitive (leaf) values
//!
//! Every primitive owns a fixed universal tag and a value↔content-octets
//! rule. The tag itself is written by the caller; this module only deals in
//! content octets.

use crate::ber::Tag;
use crate::error::{Asn1Error, Asn1Result};
use crate::policy::{EncodingPolicy, EncodingRules};
use crate::types::integer::{decode_integer, encode_integer};
use crate::types::time::{
    decode_generalized_time, decode_utc_time, encode_generalized_time, encode_utc_time,
};
use crate::types::{Asn1String, BitString, ObjectIdentifier, StringKind};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Primitive {
    Boolean(bool),
    Integer(i64),
    Enumerated(i64),
    BitString(BitString),
    OctetString(Vec<u8>),
    Null,
    ObjectIdentifier(ObjectIdentifier),
    String(Asn1String),
    UtcTime(DateTime<Utc>),
    GeneralizedTime(DateTime<Utc>),
}

impl Primitive {
    pub fn tag(&self) -> Tag {
        match self {
            Primitive::Boolean(_) => Tag::BOOLEAN,
            Primitive::Integer(_) => Tag::INTEGER,
            Primitive::Enumerated(_) => Tag::ENUMERATED,
            Primitive::BitString(_) => Tag::BIT_STRING,
            Primitive::OctetString(_) => Tag::OCTET_STRING,
            Primitive::Null => Tag::NULL,
            Primitive::ObjectIdentifier(_) => Tag::OBJECT_IDENTIFIER,
            Primitive::String(s) => s.kind().tag(),
            Primitive::UtcTime(_) => Tag::UTC_TIME,
            Primitive::GeneralizedTime(_) => Tag::GENERALIZED_TIME,
        }
    }

    /// Human-readable type name, used in type mismatch errors
    pub fn type_name(&self) -> &'static str {
        match self {
            Primitive::Boolean(_) => "BOOLEAN",
            Primitive::Integer(_) => "INTEGER",
            Primitive::Enumerated(_) => "ENUMERATED",
            Primitive::BitString(_) => "BIT STRING",
            Primitive::OctetString(_) => "OCTET STRING",
            Primitive::Null => "NULL",
            Primitive::ObjectIdentifier(_) => "OBJECT IDENTIFIER",
            Primitive::String(s) => match s.kind() {
                StringKind::Utf8 => "UTF8String",
                StringKind::Printable => "PrintableString",
                StringKind::Ia5 => "IA5String",
                StringKind::Visible => "VisibleString",
                StringKind::General => "GeneralString",
            },
            Primitive::UtcTime(_) => "UTCTime",
            Primitive::GeneralizedTime(_) => "GeneralizedTime",
        }
    }

    /// Same variant (and string kind), content ignored
    pub fn same_type(&self, other: &Primitive) -> bool {
        self.tag() == other.tag()
    }

    /// Same type with default content
    pub fn cleared(&self) -> Primitive {
        match self {
            Primitive::Boolean(_) => Primitive::Boolean(false),
            Primitive::Integer(_) => Primitive::Integer(0),
            Primitive::Enumerated(_) => Primitive::Enumerated(0),
            Primitive::BitString(_) => Primitive::BitString(BitString::default()),
            Primitive::OctetString(_) => Primitive::OctetString(Vec::new()),
            Primitive::Null => Primitive::Null,
            Primitive::ObjectIdentifier(_) => Primitive::ObjectIdentifier(ObjectIdentifier::default()),
            Primitive::String(s) => Primitive::String(Asn1String::new(s.kind(), String::new())),
            Primitive::UtcTime(_) => Primitive::UtcTime(DateTime::<Utc>::UNIX_EPOCH),
            Primitive::GeneralizedTime(_) => Primitive::GeneralizedTime(DateTime::<Utc>::UNIX_EPOCH),
        }
    }

    pub fn encode_content(&self) -> Asn1Result<Vec<u8>> {
        let content = match self {
            Primitive::Boolean(value) => vec![if *value { 0xFF } else { 0x00 }],
            Primitive::Integer(value) | Primitive::Enumerated(value) => encode_integer(*value),
            Primitive::BitString(bits) => bits.encode_content(),
            Primitive::OctetString(bytes) => bytes.clone(),
            Primitive::Null => Vec::new(),
            Primitive::ObjectIdentifier(oid) => oid.encode_content()?,
            Primitive::String(s) => s.encode_content().map_err(Asn1Error::Encoding)?,
            Primitive::UtcTime(time) => encode_utc_time(time).map_err(Asn1Error::Encoding)?,
            Primitive::GeneralizedTime(time) => {
                encode_generalized_time(time).map_err(Asn1Error::Encoding)?
            }
        };
        Ok(content)
    }

    /// Replace the content with the one decoded from `content`
    ///
    /// `offset` is the absolute position of `content` and is only used for
    /// error reporting.
    pub fn decode_content(
        &mut self,
        content: &[u8],
        offset: usize,
        policy: &EncodingPolicy,
    ) -> Asn1Result<()> {
        let rules = policy.rules;
        let malformed = |reason: String| Asn1Error::malformed(offset, reason);

        let decoded = match self {
            Primitive::Boolean(_) => Primitive::Boolean(decode_boolean(content, rules).map_err(malformed)?),
            Primitive::Integer(_) => Primitive::Integer(decode_integer(content, rules).map_err(malformed)?),
            Primitive::Enumerated(_) => {
                Primitive::Enumerated(decode_integer(content, rules).map_err(malformed)?)
            }
            Primitive::BitString(_) => {
                Primitive::BitString(BitString::decode_content(content, rules).map_err(malformed)?)
            }
            Primitive::OctetString(_) => Primitive::OctetString(content.to_vec()),
            Primitive::Null => {
                if !content.is_empty() {
                    return Err(malformed(format!("NULL with {} content bytes", content.len())));
                }
                Primitive::Null
            }
            Primitive::ObjectIdentifier(_) => Primitive::ObjectIdentifier(
                ObjectIdentifier::decode_content(content).map_err(malformed)?,
            ),
            Primitive::String(s) => {
                Primitive::String(Asn1String::decode_content(s.kind(), content).map_err(malformed)?)
            }
            Primitive::UtcTime(_) => Primitive::UtcTime(decode_utc_time(content, rules).map_err(malformed)?),
            Primitive::GeneralizedTime(_) => {
                Primitive::GeneralizedTime(decode_generalized_time(content, rules).map_err(malformed)?)
            }
        };

        *self = decoded;
        Ok(())
    }
}

fn decode_boolean(content: &[u8], rules: EncodingRules) -> Result<bool, String> {
    match content {
        [0x00] => Ok(false),
        [0xFF] => Ok(true),
        [_] if rules == EncodingRules::Ber => Ok(true),
        [byte] => Err(format!("BOOLEAN content 0x{:02X} is not allowed under DER", byte)),
        _ => Err(format!("BOOLEAN must have 1 content byte, got {}", content.len())),
    }
}
