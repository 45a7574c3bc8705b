//! BER decoder for TLV triplets
//!
//! # Usage Example
//!
//! ```rust
//! use krb_asn1::ber::{BerDecoder, Tag};
//! use krb_asn1::EncodingRules;
//!
//! let data = [0x30, 0x03, 0x02, 0x01, 0x05];
//! let mut decoder = BerDecoder::new(&data, EncodingRules::Der);
//! let tlv = decoder.read_tlv().unwrap();
//! assert_eq!(tlv.tag, Tag::SEQUENCE);
//! assert_eq!(tlv.content, &[0x02, 0x01, 0x05]);
//! ```

use crate::ber::types::{Length, Tag};
use crate::error::{Asn1Error, Asn1Result};
use crate::policy::{EncodingPolicy, EncodingRules};

/// One parsed TLV borrowed from the input buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tlv<'a> {
    pub tag: Tag,
    /// Absolute offset of the first tag byte
    pub offset: usize,
    /// Tag plus length bytes
    pub header_len: usize,
    pub content: &'a [u8],
    /// The complete TLV, header included
    pub raw: &'a [u8],
}

impl Tlv<'_> {
    /// Absolute offset of the first content byte
    pub fn content_offset(&self) -> usize {
        self.offset + self.header_len
    }
}

/// Reads TLV triplets from a byte buffer
///
/// The decoder keeps the absolute offset of its buffer within the caller's
/// original input, so nested decoders report positions the caller can
/// locate.
#[derive(Debug, Clone)]
pub struct BerDecoder<'a> {
    buffer: &'a [u8],
    position: usize,
    base: usize,
    rules: EncodingRules,
}

impl<'a> BerDecoder<'a> {
    pub fn new(buffer: &'a [u8], rules: EncodingRules) -> Self {
        Self::with_offset(buffer, 0, rules)
    }

    /// Decoder over `buffer`, which starts at absolute offset `base`
    pub fn with_offset(buffer: &'a [u8], base: usize, rules: EncodingRules) -> Self {
        Self {
            buffer,
            position: 0,
            base,
            rules,
        }
    }

    /// Absolute offset of the next unread byte
    pub fn offset(&self) -> usize {
        self.base + self.position
    }

    pub fn remaining(&self) -> usize {
        self.buffer.len().saturating_sub(self.position)
    }

    pub fn has_remaining(&self) -> bool {
        self.position < self.buffer.len()
    }

    /// Decode a TLV (Tag-Length-Value) triplet
    ///
    /// Fails with [`Asn1Error::MalformedTlv`] on a truncated buffer, an
    /// indefinite length, a declared length beyond the remaining bytes, or
    /// (under DER) a non-minimal length.
    pub fn read_tlv(&mut self) -> Asn1Result<Tlv<'a>> {
        let start = self.position;
        let absolute = self.base + start;

        let (tag, tag_len) =
            Tag::decode(&self.buffer[start..]).map_err(|e| e.rebase(absolute))?;

        let length_start = start + tag_len;
        let (length, length_len) =
            Length::decode(&self.buffer[length_start..]).map_err(|e| e.rebase(self.base + length_start))?;

        let value_len = length.value();
        if self.rules == EncodingRules::Der && length_len != Length::new(value_len).encoded_len() {
            return Err(Asn1Error::malformed(
                self.base + length_start,
                format!("non-minimal length encoding for {} bytes", value_len),
            ));
        }

        let content_start = length_start + length_len;
        let available = self.buffer.len() - content_start;
        if value_len > available {
            return Err(Asn1Error::malformed(
                absolute,
                format!(
                    "declared length {} exceeds {} remaining bytes",
                    value_len, available
                ),
            ));
        }

        let end = content_start + value_len;
        self.position = end;

        Ok(Tlv {
            tag,
            offset: absolute,
            header_len: tag_len + length_len,
            content: &self.buffer[content_start..end],
            raw: &self.buffer[start..end],
        })
    }

    /// Tag of the next TLV without consuming it
    pub fn peek_tag(&self) -> Asn1Result<Tag> {
        let absolute = self.offset();
        Tag::decode(&self.buffer[self.position..])
            .map(|(tag, _)| tag)
            .map_err(|e| e.rebase(absolute))
    }

    /// Skip a TLV, returning the number of bytes skipped
    pub fn skip_tlv(&mut self) -> Asn1Result<usize> {
        let tlv = self.read_tlv()?;
        Ok(tlv.raw.len())
    }

    /// Check that the buffer has been fully consumed
    ///
    /// Leftover bytes are [`Asn1Error::TrailingData`] under a strict policy;
    /// a lenient policy logs and ignores them.
    pub fn finish(&self, policy: &EncodingPolicy) -> Asn1Result<()> {
        if !self.has_remaining() {
            return Ok(());
        }
        if policy.strict {
            return Err(Asn1Error::TrailingData {
                offset: self.offset(),
                remaining: self.remaining(),
            });
        }
        log::warn!(
            "ignoring {} trailing bytes at offset {}",
            self.remaining(),
            self.offset()
        );
        Ok(())
    }
}
