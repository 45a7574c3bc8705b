//! Schema-less TLV tree dump
//!
//! Renders any definite-length BER buffer as an indented tree, one TLV per
//! line:
//!
//! ```text
//!     0: [APPLICATION 1] (constructed) len=12
//!     2:   [0] (constructed) len=3
//!     4:     INTEGER len=1 5
//! ```

use crate::ber::{BerDecoder, Tag, TagClass, Tlv};
use crate::error::{Asn1Error, Asn1Result};
use crate::policy::EncodingRules;
use crate::types::integer::decode_integer;
use crate::types::time::{decode_generalized_time, decode_utc_time};
use crate::types::ObjectIdentifier;

/// Longest content rendered in full as hex
const MAX_HEX_BYTES: usize = 32;

/// Deepest constructed nesting walked before giving up
const MAX_DEPTH: usize = 64;

pub fn dump(bytes: &[u8]) -> Asn1Result<String> {
    let mut out = String::new();
    dump_level(bytes, 0, 0, &mut out)?;
    Ok(out)
}

fn dump_level(buffer: &[u8], base: usize, depth: usize, out: &mut String) -> Asn1Result<()> {
    let mut decoder = BerDecoder::with_offset(buffer, base, EncodingRules::Ber);
    while decoder.has_remaining() {
        let tlv = decoder.read_tlv()?;
        out.push_str(&format!(
            "{:>5}: {}{} len={}",
            tlv.offset,
            "  ".repeat(depth),
            tlv.tag,
            tlv.content.len()
        ));
        if tlv.tag.is_constructed() {
            if depth >= MAX_DEPTH {
                return Err(Asn1Error::malformed(tlv.offset, "nesting too deep"));
            }
            out.push('\n');
            dump_level(tlv.content, tlv.content_offset(), depth + 1, out)?;
        } else {
            if !tlv.content.is_empty() || tlv.tag == Tag::NULL {
                out.push(' ');
                out.push_str(&render(&tlv));
            }
            out.push('\n');
        }
    }
    Ok(())
}

/// Short rendering of primitive content; falls back to hex
fn render(tlv: &Tlv<'_>) -> String {
    if tlv.tag.class() != TagClass::Universal {
        return hex_of(tlv.content);
    }
    let content = tlv.content;
    let rendered = match tlv.tag {
        Tag::NULL => Some("NULL".to_string()),
        Tag::BOOLEAN => match content {
            [0x00] => Some("FALSE".to_string()),
            [_] => Some("TRUE".to_string()),
            _ => None,
        },
        Tag::INTEGER | Tag::ENUMERATED => decode_integer(content, EncodingRules::Ber)
            .ok()
            .map(|v| v.to_string()),
        Tag::OBJECT_IDENTIFIER => ObjectIdentifier::decode_content(content)
            .ok()
            .map(|oid| oid.to_string()),
        Tag::UTF8_STRING
        | Tag::PRINTABLE_STRING
        | Tag::IA5_STRING
        | Tag::VISIBLE_STRING
        | Tag::GENERAL_STRING => std::str::from_utf8(content).ok().map(|s| format!("{:?}", s)),
        Tag::UTC_TIME => decode_utc_time(content, EncodingRules::Ber)
            .ok()
            .map(|t| t.to_rfc3339()),
        Tag::GENERALIZED_TIME => decode_generalized_time(content, EncodingRules::Ber)
            .ok()
            .map(|t| t.to_rfc3339()),
        Tag::BIT_STRING => content
            .split_first()
            .map(|(unused, data)| format!("unused={} {}", unused, hex_of(data))),
        _ => None,
    };
    rendered.unwrap_or_else(|| hex_of(content))
}

fn hex_of(bytes: &[u8]) -> String {
    if bytes.len() > MAX_HEX_BYTES {
        format!("{}...", hex::encode_upper(&bytes[..MAX_HEX_BYTES]))
    } else {
        hex::encode_upper(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ber::Length;
    use hex_literal::hex;

    #[test]
    fn test_dump_nested() {
        let text = dump(&hex!("61 0A A0 03 02 01 05 A1 03 1B 01 41")).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            [
                "    0: [APPLICATION 1] (constructed) len=10",
                "    2:   [0] (constructed) len=3",
                "    4:     INTEGER len=1 5",
                "    7:   [1] (constructed) len=3",
                "    9:     GeneralString len=1 \"A\"",
            ]
        );
    }

    #[test]
    fn test_context_primitive_is_hex() {
        // content happens to look like a TLV
        let text = dump(&hex!("80 03 02 01 05")).unwrap();
        assert_eq!(text, "    0: [0] len=3 020105\n");
    }

    #[test]
    fn test_dump_oid_and_null() {
        let text = dump(&hex!("30 0B 06 07 2A 86 48 86 F7 0D 01 05 00")).unwrap();
        assert!(text.contains("OBJECT IDENTIFIER len=7 1.2.840.113549.1"));
        assert!(text.contains("NULL len=0 NULL"));
    }

    fn nested(levels: usize) -> Vec<u8> {
        let mut bytes = vec![0x05, 0x00];
        for _ in 0..levels {
            let mut header = vec![0x30];
            header.extend(Length::new(bytes.len()).encode());
            header.extend(bytes);
            bytes = header;
        }
        bytes
    }

    #[test]
    fn test_dump_deep_nesting() {
        let text = dump(&nested(MAX_DEPTH)).unwrap();
        assert_eq!(text.lines().count(), MAX_DEPTH + 1);

        let err = dump(&nested(5000)).unwrap_err();
        assert!(matches!(err, Asn1Error::MalformedTlv { .. }));
    }

    #[test]
    fn test_dump_truncated_input() {
        let err = dump(&hex!("30 05 02 01")).unwrap_err();
        assert!(matches!(err, Asn1Error::MalformedTlv { offset: 0, .. }));
    }
}
