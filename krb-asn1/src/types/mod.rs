//! Content codecs of the primitive universal types

pub mod bit_string;
pub mod integer;
pub mod object_identifier;
pub mod string;
pub mod time;

pub use bit_string::BitString;
pub use object_identifier::ObjectIdentifier;
pub use string::{Asn1String, StringKind};
