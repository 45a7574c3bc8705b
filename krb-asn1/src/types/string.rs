//! Character string types

use crate::ber::Tag;
use std::fmt;

/// Restricted character string types used by Kerberos and PKINIT
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StringKind {
    /// UTF8String (12)
    Utf8,
    /// PrintableString (19)
    Printable,
    /// IA5String (22)
    Ia5,
    /// VisibleString (26)
    Visible,
    /// GeneralString (27), the wire type of KerberosString
    General,
}

impl StringKind {
    pub fn tag(self) -> Tag {
        match self {
            StringKind::Utf8 => Tag::UTF8_STRING,
            StringKind::Printable => Tag::PRINTABLE_STRING,
            StringKind::Ia5 => Tag::IA5_STRING,
            StringKind::Visible => Tag::VISIBLE_STRING,
            StringKind::General => Tag::GENERAL_STRING,
        }
    }

    /// Check a character against the type's alphabet
    fn permits(self, c: char) -> bool {
        match self {
            StringKind::Utf8 => true,
            StringKind::Printable => {
                c.is_ascii_alphanumeric() || " '()+,-./:=?".contains(c)
            }
            StringKind::Ia5 | StringKind::General => c.is_ascii(),
            StringKind::Visible => (' '..='~').contains(&c),
        }
    }

    /// Validate `text` against the alphabet, returning the first offender
    pub fn validate(self, text: &str) -> Result<(), String> {
        match text.char_indices().find(|&(_, c)| !self.permits(c)) {
            Some((index, c)) => Err(format!(
                "character {:?} at position {} is not allowed in {}",
                c,
                index,
                self.tag()
            )),
            None => Ok(()),
        }
    }
}

/// A character string of a given kind
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Asn1String {
    kind: StringKind,
    value: String,
}

impl Asn1String {
    pub fn new(kind: StringKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }

    pub fn kind(&self) -> StringKind {
        self.kind
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn encode_content(&self) -> Result<Vec<u8>, String> {
        self.kind.validate(&self.value)?;
        Ok(self.value.as_bytes().to_vec())
    }

    pub fn decode_content(kind: StringKind, content: &[u8]) -> Result<Self, String> {
        let value = std::str::from_utf8(content)
            .map_err(|e| format!("{} is not valid text: {}", kind.tag(), e))?;
        kind.validate(value)?;
        Ok(Self::new(kind, value))
    }
}

impl fmt::Display for Asn1String {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visible_string_alphabet() {
        assert!(StringKind::Visible.validate("Jones").is_ok());
        assert!(StringKind::Visible.validate("tab\there").is_err());
    }

    #[test]
    fn test_printable_string_alphabet() {
        assert!(StringKind::Printable.validate("EXAMPLE.COM").is_ok());
        assert!(StringKind::Printable.validate("user@EXAMPLE.COM").is_err());
    }

    #[test]
    fn test_ia5_rejects_non_ascii() {
        let err = Asn1String::new(StringKind::Ia5, "krbtgt/ÉXAMPLE").encode_content().unwrap_err();
        assert!(err.contains("position 7"));
    }

    #[test]
    fn test_decode_utf8() {
        let decoded = Asn1String::decode_content(StringKind::Utf8, "ÉXAMPLE".as_bytes()).unwrap();
        assert_eq!(decoded.as_str(), "ÉXAMPLE");
        assert!(Asn1String::decode_content(StringKind::Utf8, &[0xFF, 0xFE]).is_err());
    }

    #[test]
    fn test_general_string_round_trip() {
        let name = Asn1String::new(StringKind::General, "krbtgt");
        let bytes = name.encode_content().unwrap();
        assert_eq!(Asn1String::decode_content(StringKind::General, &bytes).unwrap(), name);
    }
}
