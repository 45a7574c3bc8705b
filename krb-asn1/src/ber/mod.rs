//! BER/DER TLV layer
//!
//! Each ASN.1 value is encoded as a TLV (Tag-Length-Value) triplet:
//!
//! ```text
//! [Tag] [Length] [Value]
//! ```
//!
//! ## Tag Encoding
//!
//! - **Class** (2 bits): Universal (00), Application (01), Context-specific (10), Private (11)
//! - **Constructed/Primitive** (1 bit): 0 = Primitive, 1 = Constructed
//! - **Tag Number** (5 bits): 0-30, or 11111 followed by base-128 groups
//!
//! ## Length Encoding
//!
//! - **Short form** (1 byte): For lengths 0-127
//! - **Long form**: `0x80 | k`, then `k` big-endian bytes
//!
//! Indefinite lengths are not supported; the decoder rejects them.
//!
//! Everything above this module (values, collections, tagging) only talks
//! to [`BerEncoder::encode_tlv`] and [`BerDecoder::read_tlv`].

pub mod decoder;
pub mod encoder;
pub mod types;

pub use decoder::{BerDecoder, Tlv};
pub use encoder::BerEncoder;
pub use types::{Length, Tag, TagClass};
