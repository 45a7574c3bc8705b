//! INTEGER / ENUMERATED content octets
//!
//! Two's complement, big-endian, minimal: the first nine bits of a
//! multi-byte encoding are never all zeros or all ones.

use crate::policy::EncodingRules;

/// Minimal two's-complement representation of `value`
pub fn encode_integer(value: i64) -> Vec<u8> {
    let bytes = value.to_be_bytes();
    let mut start = 0;
    while start < bytes.len() - 1 {
        let redundant = match bytes[start] {
            0x00 => bytes[start + 1] & 0x80 == 0,
            0xFF => bytes[start + 1] & 0x80 != 0,
            _ => false,
        };
        if !redundant {
            break;
        }
        start += 1;
    }
    bytes[start..].to_vec()
}

/// Decode integer content octets
///
/// Returns a reason string on failure; the caller attaches the offset.
pub fn decode_integer(bytes: &[u8], rules: EncodingRules) -> Result<i64, String> {
    if bytes.is_empty() {
        return Err("empty integer encoding".to_string());
    }

    if rules == EncodingRules::Der && bytes.len() > 1 {
        let redundant = (bytes[0] == 0x00 && bytes[1] & 0x80 == 0)
            || (bytes[0] == 0xFF && bytes[1] & 0x80 != 0);
        if redundant {
            return Err("non-minimal integer encoding".to_string());
        }
    }

    // Leading sign-extension bytes are harmless under BER; strip them before
    // the range check so e.g. 00 FF FF FF FF FF FF FF FF still fits.
    let mut digits = bytes;
    while digits.len() > 8 {
        let redundant = (digits[0] == 0x00 && digits[1] & 0x80 == 0)
            || (digits[0] == 0xFF && digits[1] & 0x80 != 0);
        if !redundant {
            return Err(format!(
                "integer of {} bytes does not fit in 64 bits",
                bytes.len()
            ));
        }
        digits = &digits[1..];
    }

    let negative = digits[0] & 0x80 != 0;
    let mut value: i64 = if negative { -1 } else { 0 };
    for &byte in digits {
        value = (value << 8) | byte as i64;
    }
    Ok(value)
}
