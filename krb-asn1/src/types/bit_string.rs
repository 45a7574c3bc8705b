//! BIT STRING value

use crate::error::{Asn1Error, Asn1Result};
use crate::policy::EncodingRules;

/// BIT STRING: bit data plus the number of unused bits in the last octet
///
/// Bits are numbered the ASN.1 way: bit 0 is the most significant bit of
/// the first octet. Kerberos flag sets (`KerberosFlags`) are 32-bit
/// strings addressed this way.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct BitString {
    data: Vec<u8>,
    unused_bits: u8,
}

impl BitString {
    /// Create from raw octets and the unused bit count of the last octet
    pub fn new(data: Vec<u8>, unused_bits: u8) -> Asn1Result<Self> {
        if unused_bits > 7 {
            return Err(Asn1Error::Encoding(format!(
                "unused bits must be 0-7, got {}",
                unused_bits
            )));
        }
        if data.is_empty() && unused_bits != 0 {
            return Err(Asn1Error::Encoding(
                "empty bit string cannot have unused bits".to_string(),
            ));
        }
        Ok(Self { data, unused_bits })
    }

    /// All-zero bit string of `num_bits` bits
    pub fn with_len(num_bits: usize) -> Self {
        let octets = num_bits.div_ceil(8);
        Self {
            data: vec![0; octets],
            unused_bits: (octets * 8 - num_bits) as u8,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn unused_bits(&self) -> u8 {
        self.unused_bits
    }

    pub fn num_bits(&self) -> usize {
        self.data.len() * 8 - self.unused_bits as usize
    }

    /// Value of bit `index`; bits past the end read as zero
    pub fn bit(&self, index: usize) -> bool {
        if index >= self.num_bits() {
            return false;
        }
        self.data[index / 8] & (0x80 >> (index % 8)) != 0
    }

    /// Set bit `index`, growing the string if needed
    pub fn set_bit(&mut self, index: usize, value: bool) {
        if index >= self.num_bits() {
            let grown = Self::with_len(index + 1);
            self.data.resize(grown.data.len(), 0);
            self.unused_bits = grown.unused_bits;
        }
        let mask = 0x80 >> (index % 8);
        if value {
            self.data[index / 8] |= mask;
        } else {
            self.data[index / 8] &= !mask;
        }
    }

    /// Content octets: unused-bit count followed by the data
    pub fn encode_content(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.data.len() + 1);
        bytes.push(self.unused_bits);
        bytes.extend_from_slice(&self.data);
        bytes
    }

    pub fn decode_content(content: &[u8], rules: EncodingRules) -> Result<Self, String> {
        let Some((&unused_bits, data)) = content.split_first() else {
            return Err("empty bit string encoding".to_string());
        };
        if unused_bits > 7 {
            return Err(format!("invalid unused bits: {} (must be 0-7)", unused_bits));
        }
        if data.is_empty() && unused_bits != 0 {
            return Err("empty bit string cannot have unused bits".to_string());
        }
        if rules == EncodingRules::Der && unused_bits != 0 {
            let mask = (1u8 << unused_bits) - 1;
            if data[data.len() - 1] & mask != 0 {
                return Err("unused bits must be zero under DER".to_string());
            }
        }
        Ok(Self {
            data: data.to_vec(),
            unused_bits,
        })
    }
}

impl From<u32> for BitString {
    /// 32-bit flag word, bit 0 being the most significant
    fn from(flags: u32) -> Self {
        Self {
            data: flags.to_be_bytes().to_vec(),
            unused_bits: 0,
        }
    }
}
