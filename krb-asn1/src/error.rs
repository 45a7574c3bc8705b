//! Error type shared by every encode/decode path of the engine.

use crate::ber::Tag;
use thiserror::Error;

/// Errors produced while encoding or decoding ASN.1 values
///
/// Decode errors carry absolute offsets into the buffer handed to
/// [`Value::decode`](crate::Value::decode). Composite values wrap the
/// errors of their children in [`Asn1Error::InField`], one layer per
/// nesting level, so the `Display` output reads as a field path.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Asn1Error {
    #[error("malformed TLV at offset {offset}: {reason}")]
    MalformedTlv { offset: usize, reason: String },

    #[error("unexpected tag at offset {offset}: expected {expected}, found {found}")]
    UnexpectedTag { offset: usize, expected: Tag, found: Tag },

    #[error("missing required field {index} ({name})")]
    MissingRequiredField { index: usize, name: &'static str },

    #[error("no CHOICE alternative matches tag {tag} at offset {offset}")]
    UnknownChoiceVariant { offset: usize, tag: Tag },

    #[error("{remaining} trailing bytes at offset {offset}")]
    TrailingData { offset: usize, remaining: usize },

    #[error("encoding error: {0}")]
    Encoding(String),

    #[error("field index {index} out of range (schema has {len} fields)")]
    FieldIndexOutOfRange { index: usize, len: usize },

    #[error("field {index} does not hold {expected}")]
    FieldTypeMismatch { index: usize, expected: &'static str },

    #[error("constraint violated: {0}")]
    Constraint(String),

    #[error("field {index} ({name}): {source}")]
    InField {
        index: usize,
        name: &'static str,
        #[source]
        source: Box<Asn1Error>,
    },
}

impl Asn1Error {
    pub(crate) fn malformed(offset: usize, reason: impl Into<String>) -> Self {
        Asn1Error::MalformedTlv {
            offset,
            reason: reason.into(),
        }
    }

    /// Wrap this error with the composite field it surfaced from
    pub fn in_field(self, index: usize, name: &'static str) -> Self {
        Asn1Error::InField {
            index,
            name,
            source: Box::new(self),
        }
    }

    /// Strip every [`Asn1Error::InField`] layer
    pub fn root_cause(&self) -> &Asn1Error {
        match self {
            Asn1Error::InField { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Field indices from the outermost composite down to the failure
    pub fn field_path(&self) -> Vec<usize> {
        let mut path = Vec::new();
        let mut current = self;
        while let Asn1Error::InField { index, source, .. } = current {
            path.push(*index);
            current = source;
        }
        path
    }

    /// Shift buffer-relative offsets by `base`
    ///
    /// Tag and length parsing work on sub-slices; the decoder rebases
    /// their errors to absolute positions.
    pub(crate) fn rebase(self, base: usize) -> Self {
        match self {
            Asn1Error::MalformedTlv { offset, reason } => Asn1Error::MalformedTlv {
                offset: offset + base,
                reason,
            },
            Asn1Error::UnexpectedTag {
                offset,
                expected,
                found,
            } => Asn1Error::UnexpectedTag {
                offset: offset + base,
                expected,
                found,
            },
            Asn1Error::UnknownChoiceVariant { offset, tag } => Asn1Error::UnknownChoiceVariant {
                offset: offset + base,
                tag,
            },
            Asn1Error::TrailingData { offset, remaining } => Asn1Error::TrailingData {
                offset: offset + base,
                remaining,
            },
            Asn1Error::InField {
                index,
                name,
                source,
            } => Asn1Error::InField {
                index,
                name,
                source: Box::new(source.rebase(base)),
            },
            other => other,
        }
    }
}

/// Result type alias for ASN.1 operations
pub type Asn1Result<T> = Result<T, Asn1Error>;
