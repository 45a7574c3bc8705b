//! Re-tagging of values under application and context-specific tags
//!
//! # Encoding Format
//!
//! Implicit: `[outer tag, constructed bit of the inner tag] [len] [inner content]`
//!
//! Explicit: `[outer tag, constructed] [len] [inner tag] [inner len] [inner content]`
//!
//! The wire bytes alone cannot tell the two modes apart, so decoding always
//! needs the [`TaggingOption`] the value was encoded with.

use crate::ber::{BerDecoder, BerEncoder, Tag, TagClass, Tlv};
use crate::error::{Asn1Error, Asn1Result};
use crate::policy::{EncodingPolicy, TaggingMode};
use crate::value::Value;

/// Class, number and mode of a re-tag, as in `[APPLICATION 3] IMPLICIT`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaggingOption {
    class: TagClass,
    number: u32,
    mode: TaggingMode,
}

impl TaggingOption {
    pub const fn new(class: TagClass, number: u32, mode: TaggingMode) -> Self {
        Self {
            class,
            number,
            mode,
        }
    }

    pub const fn application(number: u32, mode: TaggingMode) -> Self {
        Self::new(TagClass::Application, number, mode)
    }

    pub const fn context(number: u32, mode: TaggingMode) -> Self {
        Self::new(TagClass::ContextSpecific, number, mode)
    }

    pub const fn implicit_application(number: u32) -> Self {
        Self::application(number, TaggingMode::Implicit)
    }

    pub const fn explicit_application(number: u32) -> Self {
        Self::application(number, TaggingMode::Explicit)
    }

    pub const fn implicit_context(number: u32) -> Self {
        Self::context(number, TaggingMode::Implicit)
    }

    pub const fn explicit_context(number: u32) -> Self {
        Self::context(number, TaggingMode::Explicit)
    }

    pub fn class(&self) -> TagClass {
        self.class
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn mode(&self) -> TaggingMode {
        self.mode
    }

    /// The outer tag with the given constructed bit
    pub fn tag(&self, constructed: bool) -> Tag {
        Tag::new(self.class, constructed, self.number)
    }

    /// True when `tag` carries this option's class and number
    pub fn matches(&self, tag: &Tag) -> bool {
        tag.class() == self.class && tag.number() == self.number
    }

    /// Mode actually used for `inner`
    ///
    /// CHOICE and ANY have no tag of their own to replace, so IMPLICIT is
    /// promoted to EXPLICIT for them (X.680 31.2.7).
    pub(crate) fn effective_mode(&self, inner: &Value) -> TaggingMode {
        match self.mode {
            TaggingMode::Implicit if !inner.can_tag_implicitly() => {
                log::debug!(
                    "IMPLICIT {} on {} promoted to EXPLICIT",
                    self.tag(true),
                    inner.type_name()
                );
                TaggingMode::Explicit
            }
            mode => mode,
        }
    }

    /// Outer tag used when this option is applied to `inner`
    pub(crate) fn outer_tag(&self, inner: &Value) -> Tag {
        match self.effective_mode(inner) {
            TaggingMode::Explicit => self.tag(true),
            TaggingMode::Implicit => self.tag(inner.is_constructed()),
        }
    }
}

/// A value re-tagged under a [`TaggingOption`]
///
/// The inner value keeps its own type; only its wire form changes.
#[derive(Debug, Clone, PartialEq)]
pub struct Tagged {
    option: TaggingOption,
    inner: Box<Value>,
    policy: Option<EncodingPolicy>,
}

impl Tagged {
    pub fn new(option: TaggingOption, inner: Value) -> Self {
        Self {
            option,
            inner: Box::new(inner),
            policy: None,
        }
    }

    pub fn option(&self) -> &TaggingOption {
        &self.option
    }

    pub fn inner(&self) -> &Value {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut Value {
        &mut self.inner
    }

    pub fn into_inner(self) -> Value {
        *self.inner
    }

    pub fn policy(&self) -> Option<&EncodingPolicy> {
        self.policy.as_ref()
    }

    pub fn set_policy(&mut self, policy: Option<EncodingPolicy>) {
        self.policy = policy;
    }

    pub(crate) fn cleared(&self) -> Self {
        Self {
            option: self.option,
            inner: Box::new(self.inner.cleared()),
            policy: self.policy,
        }
    }
}

/// Outer tag and content octets of `inner` re-tagged under `option`
pub(crate) fn tagged_parts(
    inner: &Value,
    option: &TaggingOption,
    policy: &EncodingPolicy,
) -> Asn1Result<(Tag, Vec<u8>)> {
    match option.effective_mode(inner) {
        TaggingMode::Explicit => Ok((option.tag(true), inner.encode_with(policy)?)),
        TaggingMode::Implicit => {
            let (inner_tag, content) = inner.encode_parts(policy)?;
            Ok((option.tag(inner_tag.is_constructed()), content))
        }
    }
}

/// Complete TLV of `inner` re-tagged under `option`
pub(crate) fn encode_tagged(
    inner: &Value,
    option: &TaggingOption,
    policy: &EncodingPolicy,
) -> Asn1Result<Vec<u8>> {
    let (tag, content) = tagged_parts(inner, option, policy)?;
    let mut encoder = BerEncoder::with_capacity(content.len() + 8);
    encoder.encode_tlv(&tag, &content);
    Ok(encoder.into_bytes())
}

/// Decode `tlv`, tagged under `option`, into `inner`
pub(crate) fn decode_tagged(
    inner: &mut Value,
    option: &TaggingOption,
    tlv: &Tlv<'_>,
    policy: &EncodingPolicy,
) -> Asn1Result<()> {
    if !option.matches(&tlv.tag) {
        return Err(Asn1Error::UnexpectedTag {
            offset: tlv.offset,
            expected: option.outer_tag(inner),
            found: tlv.tag,
        });
    }
    decode_tagged_content(
        inner,
        option,
        tlv.tag.is_constructed(),
        tlv.content,
        tlv.content_offset(),
        policy,
    )
}

/// Decode the content octets of a tagged TLV into `inner`
///
/// `constructed` is the constructed bit of the outer tag. Explicit tagging
/// requires it and exactly one inner TLV.
pub(crate) fn decode_tagged_content(
    inner: &mut Value,
    option: &TaggingOption,
    constructed: bool,
    content: &[u8],
    offset: usize,
    policy: &EncodingPolicy,
) -> Asn1Result<()> {
    match option.effective_mode(inner) {
        TaggingMode::Explicit => {
            if !constructed {
                return Err(Asn1Error::malformed(
                    offset,
                    format!("explicit {} must be constructed", option.tag(true)),
                ));
            }
            if content.is_empty() {
                return Err(Asn1Error::malformed(
                    offset,
                    format!("explicit {} has no inner value", option.tag(true)),
                ));
            }
            let mut decoder = BerDecoder::with_offset(content, offset, policy.rules);
            let tlv = decoder.read_tlv()?;
            inner.decode_tlv(&tlv, policy)?;
            // the outer length covers exactly one inner TLV
            if decoder.has_remaining() {
                return Err(Asn1Error::TrailingData {
                    offset: decoder.offset(),
                    remaining: decoder.remaining(),
                });
            }
            Ok(())
        }
        TaggingMode::Implicit => inner.decode_content(constructed, content, offset, policy),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template;

    fn jones() -> Value {
        Value::visible_string("Jones")
    }

    #[test]
    fn test_implicit_keeps_inner_content() {
        let bytes = encode_tagged(
            &jones(),
            &TaggingOption::implicit_application(3),
            &EncodingPolicy::DER,
        )
        .unwrap();
        assert_eq!(bytes, [0x43, 0x05, b'J', b'o', b'n', b'e', b's']);
    }

    #[test]
    fn test_explicit_wraps_inner_tlv() {
        let inner = jones().encode().unwrap();
        let bytes =
            encode_tagged(&jones(), &TaggingOption::explicit_context(0), &EncodingPolicy::DER)
                .unwrap();
        assert_eq!(bytes[0], 0xA0);
        assert_eq!(bytes[1] as usize, inner.len());
        assert_eq!(&bytes[2..], inner.as_slice());
    }

    #[test]
    fn test_implicit_on_sequence_stays_constructed() {
        let option = TaggingOption::implicit_context(1);
        let value = Value::sequence_of(template::integer);
        assert_eq!(option.outer_tag(&value), Tag::context_specific(true, 1));
    }

    #[test]
    fn test_explicit_requires_constructed_bit() {
        // [0] primitive around an INTEGER TLV
        let data = [0x80, 0x03, 0x02, 0x01, 0x05];
        let mut decoder = BerDecoder::new(&data, crate::EncodingRules::Der);
        let tlv = decoder.read_tlv().unwrap();

        let mut value = template::integer();
        let err = decode_tagged(
            &mut value,
            &TaggingOption::explicit_context(0),
            &tlv,
            &EncodingPolicy::DER,
        )
        .unwrap_err();
        assert!(matches!(err, Asn1Error::MalformedTlv { offset: 2, .. }));
    }

    #[test]
    fn test_explicit_rejects_second_inner_tlv() {
        let data = [0xA0, 0x06, 0x02, 0x01, 0x05, 0x02, 0x01, 0x06];
        let mut decoder = BerDecoder::new(&data, crate::EncodingRules::Der);
        let tlv = decoder.read_tlv().unwrap();

        let mut value = template::integer();
        let err = decode_tagged(
            &mut value,
            &TaggingOption::explicit_context(0),
            &tlv,
            &EncodingPolicy::DER.lenient(),
        )
        .unwrap_err();
        assert_eq!(err, Asn1Error::TrailingData { offset: 5, remaining: 3 });
    }

    #[test]
    fn test_wrong_outer_tag() {
        let data = [0xA1, 0x03, 0x02, 0x01, 0x05];
        let mut decoder = BerDecoder::new(&data, crate::EncodingRules::Der);
        let tlv = decoder.read_tlv().unwrap();

        let mut value = template::integer();
        let err = decode_tagged(
            &mut value,
            &TaggingOption::explicit_context(0),
            &tlv,
            &EncodingPolicy::DER,
        )
        .unwrap_err();
        assert_eq!(
            err,
            Asn1Error::UnexpectedTag {
                offset: 0,
                expected: Tag::context_specific(true, 0),
                found: Tag::context_specific(true, 1),
            }
        );
    }
}
