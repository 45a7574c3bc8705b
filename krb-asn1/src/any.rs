//! Opaque, already-encoded values (ANY and open types)

use crate::ber::{BerDecoder, Tag, Tlv};
use crate::error::{Asn1Error, Asn1Result};
use crate::policy::EncodingRules;
use crate::value::Value;

/// One complete TLV carried as raw bytes
///
/// Matches every tag on decode. The stored bytes are re-emitted unchanged
/// on encode, so an `Any` never re-canonicalises what it holds.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Any {
    raw: Vec<u8>,
}

impl Any {
    /// Wrap `raw`, which must hold exactly one TLV
    pub fn new(raw: Vec<u8>) -> Asn1Result<Self> {
        let mut decoder = BerDecoder::new(&raw, EncodingRules::Ber);
        decoder.read_tlv()?;
        if decoder.has_remaining() {
            return Err(Asn1Error::TrailingData {
                offset: decoder.offset(),
                remaining: decoder.remaining(),
            });
        }
        Ok(Self { raw })
    }

    /// Capture the DER encoding of `value`
    pub fn from_value(value: &Value) -> Asn1Result<Self> {
        Ok(Self {
            raw: value.encode()?,
        })
    }

    pub(crate) fn from_tlv(tlv: &Tlv<'_>) -> Self {
        Self {
            raw: tlv.raw.to_vec(),
        }
    }

    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Tag of the stored TLV, `None` while empty
    pub fn tag(&self) -> Option<Tag> {
        Tag::decode(&self.raw).ok().map(|(tag, _)| tag)
    }

    /// Resolve the open type by decoding the stored TLV into `target`
    pub fn decode_into(&self, target: &mut Value) -> Asn1Result<()> {
        target.decode(&self.raw)
    }

    pub(crate) fn encode(&self) -> Asn1Result<Vec<u8>> {
        if self.raw.is_empty() {
            return Err(Asn1Error::Encoding("ANY value is empty".to_string()));
        }
        Ok(self.raw.clone())
    }
}
