//! BER encoder for TLV triplets
//!
//! # Usage Example
//!
//! ```rust
//! use krb_asn1::ber::{BerEncoder, Tag};
//!
//! let mut encoder = BerEncoder::new();
//! encoder.encode_tlv(&Tag::OCTET_STRING, b"key");
//! assert_eq!(encoder.into_bytes(), [0x04, 0x03, b'k', b'e', b'y']);
//! ```

use crate::ber::types::{Length, Tag};

/// Accumulates TLV triplets into a byte buffer
///
/// Content bytes are always produced before the header is written, so every
/// length is definite and minimal.
#[derive(Debug, Default)]
pub struct BerEncoder {
    buffer: Vec<u8>,
}

impl BerEncoder {
    pub fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    /// Create a new BER encoder with initial capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
        }
    }

    /// Write a tag and the length of `content_len` bytes
    pub fn encode_header(&mut self, tag: &Tag, content_len: usize) {
        self.buffer.extend_from_slice(&tag.encode());
        self.buffer.extend_from_slice(&Length::new(content_len).encode());
    }

    /// Encode a TLV (Tag-Length-Value) triplet
    ///
    /// This is the fundamental encoding operation. Every value in the engine
    /// ends up here once its content bytes are known.
    pub fn encode_tlv(&mut self, tag: &Tag, value: &[u8]) {
        self.encode_header(tag, value.len());
        self.buffer.extend_from_slice(value);
    }

    /// Append bytes that already form complete TLVs
    pub fn append_encoded(&mut self, encoded: &[u8]) {
        self.buffer.extend_from_slice(encoded);
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}
