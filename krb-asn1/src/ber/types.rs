//! BER encoding types (Tag, Length)

use crate::error::{Asn1Error, Asn1Result};
use std::fmt;

/// Tag class
///
/// ASN.1 defines four tag classes:
/// - **Universal**: Standard ASN.1 types (INTEGER, OCTET STRING, etc.)
/// - **Application**: Protocol data units (Kerberos uses `[APPLICATION 1]` for Ticket, ...)
/// - **Context-specific**: Field numbers inside a SEQUENCE/SET/CHOICE
/// - **Private**: Implementation-specific types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagClass {
    /// Universal class (00)
    Universal = 0,
    /// Application class (01)
    Application = 1,
    /// Context-specific class (10)
    ContextSpecific = 2,
    /// Private class (11)
    Private = 3,
}

impl TagClass {
    /// Get tag class from bits 8-7 of the identifier octet
    pub fn from_bits(byte: u8) -> Self {
        match (byte >> 6) & 0x03 {
            0 => TagClass::Universal,
            1 => TagClass::Application,
            2 => TagClass::ContextSpecific,
            _ => TagClass::Private,
        }
    }

    /// Convert tag class to bits (for encoding)
    pub fn to_bits(self) -> u8 {
        (self as u8) << 6
    }
}

/// ASN.1 tag
///
/// Immutable triple of class, constructed flag and number. Two tags are
/// equal iff all three match.
///
/// # Encoding Format
///
/// Low-tag-number form (tag number 0-30):
/// ```text
/// Bits: 8 7 6 5 4 3 2 1
///       C C P T T T T T
/// ```
///
/// High-tag-number form (tag number >= 31):
/// ```text
/// First byte:  C C P 1 1 1 1 1
/// Following bytes: 1 T T T T T T T ... 0 T T T T T T T
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tag {
    class: TagClass,
    constructed: bool,
    number: u32,
}

impl Tag {
    pub const BOOLEAN: Tag = Tag::universal(false, 1);
    pub const INTEGER: Tag = Tag::universal(false, 2);
    pub const BIT_STRING: Tag = Tag::universal(false, 3);
    pub const OCTET_STRING: Tag = Tag::universal(false, 4);
    pub const NULL: Tag = Tag::universal(false, 5);
    pub const OBJECT_IDENTIFIER: Tag = Tag::universal(false, 6);
    pub const ENUMERATED: Tag = Tag::universal(false, 10);
    pub const UTF8_STRING: Tag = Tag::universal(false, 12);
    pub const SEQUENCE: Tag = Tag::universal(true, 16);
    pub const SET: Tag = Tag::universal(true, 17);
    pub const PRINTABLE_STRING: Tag = Tag::universal(false, 19);
    pub const IA5_STRING: Tag = Tag::universal(false, 22);
    pub const UTC_TIME: Tag = Tag::universal(false, 23);
    pub const GENERALIZED_TIME: Tag = Tag::universal(false, 24);
    pub const VISIBLE_STRING: Tag = Tag::universal(false, 26);
    pub const GENERAL_STRING: Tag = Tag::universal(false, 27);

    pub const fn new(class: TagClass, constructed: bool, number: u32) -> Self {
        Self {
            class,
            constructed,
            number,
        }
    }

    pub const fn universal(constructed: bool, number: u32) -> Self {
        Self::new(TagClass::Universal, constructed, number)
    }

    pub const fn application(constructed: bool, number: u32) -> Self {
        Self::new(TagClass::Application, constructed, number)
    }

    pub const fn context_specific(constructed: bool, number: u32) -> Self {
        Self::new(TagClass::ContextSpecific, constructed, number)
    }

    pub const fn private(constructed: bool, number: u32) -> Self {
        Self::new(TagClass::Private, constructed, number)
    }

    pub fn class(&self) -> TagClass {
        self.class
    }

    pub fn is_constructed(&self) -> bool {
        self.constructed
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    /// Same tag with the constructed bit replaced
    pub fn with_constructed(self, constructed: bool) -> Self {
        Self {
            constructed,
            ..self
        }
    }

    /// Class and number match, constructed bit ignored
    ///
    /// Schema routing compares tags this way; the constructed bit is
    /// validated by the value that ends up decoding the content.
    pub fn same_identity(&self, other: &Tag) -> bool {
        self.class == other.class && self.number == other.number
    }

    /// Number of bytes [`Tag::encode`] produces
    pub fn encoded_len(&self) -> usize {
        if self.number <= 30 {
            1
        } else {
            let bits = 32 - self.number.leading_zeros() as usize;
            1 + bits.div_ceil(7)
        }
    }

    /// Encode tag to bytes
    pub fn encode(&self) -> Vec<u8> {
        let mut result = Vec::with_capacity(self.encoded_len());

        let class_bits = self.class.to_bits();
        let constructed_bit = if self.constructed { 0x20 } else { 0x00 };

        if self.number <= 30 {
            result.push(class_bits | constructed_bit | self.number as u8);
        } else {
            result.push(class_bits | constructed_bit | 0x1F);

            let groups = self.encoded_len() - 1;
            for i in (0..groups).rev() {
                let byte = ((self.number >> (i * 7)) & 0x7F) as u8;
                if i > 0 {
                    result.push(byte | 0x80);
                } else {
                    result.push(byte);
                }
            }
        }

        result
    }

    /// Decode tag from bytes
    ///
    /// Returns the tag and the number of bytes consumed. Offsets in errors
    /// are relative to `data`.
    pub fn decode(data: &[u8]) -> Asn1Result<(Self, usize)> {
        let Some(&first_byte) = data.first() else {
            return Err(Asn1Error::malformed(0, "buffer exhausted while reading tag"));
        };

        let class = TagClass::from_bits(first_byte);
        let constructed = (first_byte & 0x20) != 0;
        let tag_bits = first_byte & 0x1F;

        if tag_bits < 31 {
            return Ok((Self::new(class, constructed, tag_bits as u32), 1));
        }

        let mut number = 0u32;
        let mut pos = 1;
        loop {
            let Some(&byte) = data.get(pos) else {
                return Err(Asn1Error::malformed(pos, "incomplete high-tag-number encoding"));
            };
            if pos == 1 && byte == 0x80 {
                return Err(Asn1Error::malformed(pos, "high tag number has a leading zero group"));
            }
            if number > (u32::MAX >> 7) {
                return Err(Asn1Error::malformed(pos, "tag number does not fit in 32 bits"));
            }
            number = (number << 7) | (byte & 0x7F) as u32;
            pos += 1;
            if byte & 0x80 == 0 {
                break;
            }
        }

        if number <= 30 {
            return Err(Asn1Error::malformed(
                0,
                format!("tag number {} must use the low-tag-number form", number),
            ));
        }

        Ok((Self::new(class, constructed, number), pos))
    }

    fn universal_name(&self) -> Option<&'static str> {
        if self.class != TagClass::Universal {
            return None;
        }
        let name = match self.number {
            1 => "BOOLEAN",
            2 => "INTEGER",
            3 => "BIT STRING",
            4 => "OCTET STRING",
            5 => "NULL",
            6 => "OBJECT IDENTIFIER",
            10 => "ENUMERATED",
            12 => "UTF8String",
            16 => "SEQUENCE",
            17 => "SET",
            19 => "PrintableString",
            22 => "IA5String",
            23 => "UTCTime",
            24 => "GeneralizedTime",
            26 => "VisibleString",
            27 => "GeneralString",
            _ => return None,
        };
        Some(name)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.class, self.universal_name()) {
            (TagClass::Universal, Some(name)) => write!(f, "{}", name)?,
            (TagClass::Universal, None) => write!(f, "[UNIVERSAL {}]", self.number)?,
            (TagClass::Application, _) => write!(f, "[APPLICATION {}]", self.number)?,
            (TagClass::ContextSpecific, _) => write!(f, "[{}]", self.number)?,
            (TagClass::Private, _) => write!(f, "[PRIVATE {}]", self.number)?,
        }
        if self.constructed && self.universal_name().is_none() {
            write!(f, " (constructed)")?;
        }
        Ok(())
    }
}

/// BER length
///
/// - **Short form**: For lengths 0-127 (1 byte)
/// - **Long form**: For lengths > 127, `0x80 | k` followed by `k`
///   big-endian bytes, `k` minimal
///
/// The indefinite form (`0x80`) is not supported and is rejected on decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Length {
    /// Short form: length 0-127
    Short(u8),
    /// Long form: length-of-length prefix
    Long(usize),
}

impl Length {
    /// Automatically chooses short or long form based on the length value.
    pub fn new(length: usize) -> Self {
        if length < 128 {
            Length::Short(length as u8)
        } else {
            Length::Long(length)
        }
    }

    pub fn value(&self) -> usize {
        match self {
            Length::Short(l) => *l as usize,
            Length::Long(l) => *l,
        }
    }

    fn long_octets(length: usize) -> usize {
        let bits = usize::BITS as usize - length.leading_zeros() as usize;
        bits.div_ceil(8).max(1)
    }

    /// Number of bytes [`Length::encode`] produces
    pub fn encoded_len(&self) -> usize {
        match self {
            Length::Short(_) => 1,
            Length::Long(length) => 1 + Self::long_octets(*length),
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        match self {
            Length::Short(length) => vec![*length],
            Length::Long(length) => {
                let num_bytes = Self::long_octets(*length);
                let mut result = Vec::with_capacity(1 + num_bytes);
                result.push(0x80 | num_bytes as u8);
                for i in (0..num_bytes).rev() {
                    result.push(((*length >> (i * 8)) & 0xFF) as u8);
                }
                result
            }
        }
    }

    /// Decode length from bytes
    ///
    /// Returns the length and the number of bytes consumed. Whether the
    /// encoding was minimal can be checked by comparing the consumed count
    /// with [`Length::new`]`(value).encoded_len()`.
    pub fn decode(data: &[u8]) -> Asn1Result<(Self, usize)> {
        let Some(&first_byte) = data.first() else {
            return Err(Asn1Error::malformed(0, "buffer exhausted while reading length"));
        };

        if first_byte & 0x80 == 0 {
            return Ok((Length::Short(first_byte), 1));
        }

        let num_bytes = (first_byte & 0x7F) as usize;
        if num_bytes == 0 {
            return Err(Asn1Error::malformed(0, "indefinite length encoding not supported"));
        }
        if num_bytes == 0x7F {
            return Err(Asn1Error::malformed(0, "reserved length octet 0xFF"));
        }
        if num_bytes > std::mem::size_of::<usize>() {
            return Err(Asn1Error::malformed(
                0,
                format!("length encoding too large: {} bytes", num_bytes),
            ));
        }
        if data.len() < 1 + num_bytes {
            return Err(Asn1Error::malformed(
                0,
                format!(
                    "buffer too short for long form length: need {} bytes, got {}",
                    1 + num_bytes,
                    data.len()
                ),
            ));
        }

        let length = data[1..=num_bytes]
            .iter()
            .fold(0usize, |acc, &byte| (acc << 8) | byte as usize);

        Ok((Length::Long(length), 1 + num_bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case(Tag::INTEGER, &[0x02])]
    #[case(Tag::SEQUENCE, &[0x30])]
    #[case(Tag::application(true, 1), &[0x61])]
    #[case(Tag::application(false, 3), &[0x43])]
    #[case(Tag::context_specific(true, 2), &[0xA2])]
    #[case(Tag::context_specific(false, 30), &[0x9E])]
    #[case(Tag::private(false, 0), &[0xC0])]
    #[case(Tag::context_specific(false, 31), &[0x9F, 0x1F])]
    #[case(Tag::application(true, 201), &[0x7F, 0x81, 0x49])]
    fn test_tag_vectors(#[case] tag: Tag, #[case] expected: &[u8]) {
        assert_eq!(tag.encode(), expected);
        assert_eq!(tag.encoded_len(), expected.len());
        assert_eq!(Tag::decode(expected).unwrap(), (tag, expected.len()));
    }

    #[test]
    fn test_tag_decode_rejects_truncated_high_form() {
        let err = Tag::decode(&[0x1F, 0x81]).unwrap_err();
        assert!(matches!(err, Asn1Error::MalformedTlv { offset: 2, .. }));
    }

    #[test]
    fn test_tag_decode_rejects_non_minimal_high_form() {
        assert!(Tag::decode(&[0x1F, 0x80, 0x20]).is_err());
        assert!(Tag::decode(&[0x1F, 0x05]).is_err());
    }

    #[test]
    fn test_tag_display() {
        assert_eq!(Tag::SEQUENCE.to_string(), "SEQUENCE");
        assert_eq!(Tag::application(true, 1).to_string(), "[APPLICATION 1] (constructed)");
        assert_eq!(Tag::context_specific(false, 0).to_string(), "[0]");
    }

    #[rstest]
    #[case(0, &[0x00])]
    #[case(127, &[0x7F])]
    #[case(128, &[0x81, 0x80])]
    #[case(255, &[0x81, 0xFF])]
    #[case(256, &[0x82, 0x01, 0x00])]
    #[case(65536, &[0x83, 0x01, 0x00, 0x00])]
    fn test_length_vectors(#[case] value: usize, #[case] expected: &[u8]) {
        let length = Length::new(value);
        assert_eq!(length.encode(), expected);
        let (decoded, consumed) = Length::decode(expected).unwrap();
        assert_eq!(decoded.value(), value);
        assert_eq!(consumed, expected.len());
    }

    #[test]
    fn test_length_rejects_indefinite() {
        let err = Length::decode(&[0x80]).unwrap_err();
        assert!(matches!(err, Asn1Error::MalformedTlv { .. }));
    }

    #[test]
    fn test_length_rejects_truncated_long_form() {
        assert!(Length::decode(&[0x82, 0x01]).is_err());
    }

    proptest! {
        #[test]
        fn prop_length_law(n in 0usize..=(u32::MAX as usize)) {
            let encoded = Length::new(n).encode();
            let (decoded, consumed) = Length::decode(&encoded).unwrap();
            prop_assert_eq!(decoded.value(), n);
            prop_assert_eq!(consumed, encoded.len());
            prop_assert_eq!(encoded.len() == 1, n < 128);
        }

        #[test]
        fn prop_tag_round_trip(class in 0u8..4, constructed: bool, number: u32) {
            let tag = Tag::new(TagClass::from_bits(class << 6), constructed, number);
            let encoded = tag.encode();
            prop_assert_eq!(Tag::decode(&encoded).unwrap(), (tag, encoded.len()));
        }
    }
}
