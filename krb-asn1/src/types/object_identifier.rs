//! OBJECT IDENTIFIER value

use crate::error::{Asn1Error, Asn1Result};
use std::fmt;
use std::str::FromStr;

/// Object identifier as a list of arcs
///
/// # Encoding Rules
/// - First two arcs (X.Y) are packed as `40*X + Y`
/// - Every packed value is written in base-128, bit 8 set on all but the
///   last byte of each arc
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ObjectIdentifier {
    arcs: Vec<u64>,
}

impl ObjectIdentifier {
    /// Build from arcs, validating the first two
    pub fn new(arcs: Vec<u64>) -> Asn1Result<Self> {
        Self::validate(&arcs).map_err(Asn1Error::Encoding)?;
        Ok(Self { arcs })
    }

    fn validate(arcs: &[u64]) -> Result<(), String> {
        if arcs.len() < 2 {
            return Err("object identifier must have at least 2 arcs".to_string());
        }
        if arcs[0] > 2 {
            return Err(format!("first arc must be 0, 1 or 2, got {}", arcs[0]));
        }
        if arcs[0] < 2 && arcs[1] >= 40 {
            return Err(format!(
                "second arc must be below 40 under arc {}, got {}",
                arcs[0], arcs[1]
            ));
        }
        if arcs[0] == 2 && arcs[1] > u64::MAX - 80 {
            return Err("second arc too large".to_string());
        }
        Ok(())
    }

    pub fn arcs(&self) -> &[u64] {
        &self.arcs
    }

    pub fn encode_content(&self) -> Asn1Result<Vec<u8>> {
        Self::validate(&self.arcs).map_err(Asn1Error::Encoding)?;

        let mut bytes = Vec::new();
        push_base128(&mut bytes, self.arcs[0] * 40 + self.arcs[1]);
        for &arc in &self.arcs[2..] {
            push_base128(&mut bytes, arc);
        }
        Ok(bytes)
    }

    pub fn decode_content(content: &[u8]) -> Result<Self, String> {
        if content.is_empty() {
            return Err("empty object identifier encoding".to_string());
        }
        if content[content.len() - 1] & 0x80 != 0 {
            return Err("object identifier ends inside an arc".to_string());
        }

        let mut packed = Vec::new();
        let mut current = 0u64;
        let mut arc_start = true;
        for &byte in content {
            if arc_start && byte == 0x80 {
                return Err("object identifier arc has a leading zero group".to_string());
            }
            if current > (u64::MAX >> 7) {
                return Err("object identifier arc overflow".to_string());
            }
            current = (current << 7) | (byte & 0x7F) as u64;
            arc_start = byte & 0x80 == 0;
            if arc_start {
                packed.push(current);
                current = 0;
            }
        }

        let first = packed[0];
        let (x, y) = match first {
            0..=39 => (0, first),
            40..=79 => (1, first - 40),
            _ => (2, first - 80),
        };

        let mut arcs = Vec::with_capacity(packed.len() + 1);
        arcs.push(x);
        arcs.push(y);
        arcs.extend_from_slice(&packed[1..]);
        Ok(Self { arcs })
    }
}

fn push_base128(bytes: &mut Vec<u8>, value: u64) {
    let groups = (64 - value.leading_zeros() as usize).div_ceil(7).max(1);
    for i in (0..groups).rev() {
        let byte = ((value >> (i * 7)) & 0x7F) as u8;
        bytes.push(if i > 0 { byte | 0x80 } else { byte });
    }
}

impl FromStr for ObjectIdentifier {
    type Err = Asn1Error;

    /// Parse dotted notation, e.g. `1.2.840.113549`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let arcs = s
            .split('.')
            .map(|arc| {
                arc.parse::<u64>()
                    .map_err(|_| Asn1Error::Encoding(format!("invalid object identifier arc '{}'", arc)))
            })
            .collect::<Asn1Result<Vec<_>>>()?;
        Self::new(arcs)
    }
}

impl fmt::Display for ObjectIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, arc) in self.arcs.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{}", arc)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    // rsadsi
    #[case("1.2.840.113549", &[0x2A, 0x86, 0x48, 0x86, 0xF7, 0x0D])]
    // id-pkinit-san
    #[case("1.3.6.1.5.2.2", &[0x2B, 0x06, 0x01, 0x05, 0x02, 0x02])]
    // Kerberos 5 GSS mechanism
    #[case("1.2.840.113554.1.2.2", &[0x2A, 0x86, 0x48, 0x86, 0xF7, 0x12, 0x01, 0x02, 0x02])]
    #[case("2.999.3", &[0x88, 0x37, 0x03])]
    fn test_oid_vectors(#[case] dotted: &str, #[case] expected: &[u8]) {
        let oid: ObjectIdentifier = dotted.parse().unwrap();
        assert_eq!(oid.encode_content().unwrap(), expected);
        let decoded = ObjectIdentifier::decode_content(expected).unwrap();
        assert_eq!(decoded.to_string(), dotted);
    }

    #[test]
    fn test_invalid_oids() {
        assert!("1".parse::<ObjectIdentifier>().is_err());
        assert!("3.1".parse::<ObjectIdentifier>().is_err());
        assert!("1.40".parse::<ObjectIdentifier>().is_err());
        assert!("1.x.3".parse::<ObjectIdentifier>().is_err());
        assert!(ObjectIdentifier::decode_content(&[]).is_err());
        assert!(ObjectIdentifier::decode_content(&[0x2A, 0x86]).is_err());
        assert!(ObjectIdentifier::decode_content(&[0x2A, 0x80, 0x01]).is_err());
    }

    proptest! {
        #[test]
        fn prop_oid_round_trip(first in 0u64..3, second in 0u64..40, rest in proptest::collection::vec(any::<u64>(), 0..6)) {
            let mut arcs = vec![first, second];
            arcs.extend(rest);
            let oid = ObjectIdentifier::new(arcs).unwrap();
            let decoded = ObjectIdentifier::decode_content(&oid.encode_content().unwrap()).unwrap();
            prop_assert_eq!(decoded, oid);
        }
    }
}
