//! Kerberos V5 data types
//!
//! Typed structs for the RFC 4120 section 5 building blocks, each backed by
//! a field-descriptor table and converted to and from the `krb-asn1` value
//! tree through [`Asn1Type`]. All fields are `[n] EXPLICIT`, as in the
//! `KerberosV5Spec2` module.
//!
//! # Usage Example
//!
//! ```rust
//! use krb_types::{etype, Asn1Type, EncryptedData, PrincipalName, Ticket};
//!
//! let ticket = Ticket::new(
//!     "EXAMPLE.COM",
//!     PrincipalName::krbtgt("EXAMPLE.COM"),
//!     EncryptedData::new(etype::AES256_CTS_HMAC_SHA1_96, Some(2), vec![0u8; 32]),
//! );
//! let bytes = ticket.encode().unwrap();
//! assert_eq!(bytes[0], 0x61);
//! assert_eq!(Ticket::decode(&bytes).unwrap(), ticket);
//! ```

pub mod address;
pub mod basic;
pub mod constants;
pub mod crypto;
pub mod flags;
pub mod pa_data;
pub mod principal;
pub mod ticket;

pub use address::HostAddress;
pub use basic::{kerberos_strings, KerberosString, KerberosTime, Realm};
pub use constants::{
    address_type, application_tag, etype, pa_data_type, MessageType, NameType, PVNO,
};
pub use crypto::{EncryptedData, EncryptionKey};
pub use flags::{FlagBit, KdcOption, KdcOptions, KerberosFlags, TicketFlag, TicketFlags};
pub use krb_asn1::{Asn1Error, Asn1Result, Asn1Type};
pub use pa_data::PaData;
pub use principal::PrincipalName;
pub use ticket::Ticket;
