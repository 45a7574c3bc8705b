//! Assigned numbers from RFC 4120 and RFC 3961
//!
//! Enums here follow the wire integers one to one. Unknown values are not
//! rejected by the schema types (the fields stay plain `i32`); these enums
//! are for callers who want a closed set.

use krb_asn1::{Asn1Error, Asn1Result};

/// Protocol version number carried in `pvno` and `tkt-vno`
pub const PVNO: i64 = 5;

/// Application tag numbers of the top-level messages
pub mod application_tag {
    pub const TICKET: u32 = 1;
    pub const AUTHENTICATOR: u32 = 2;
    pub const ENC_TICKET_PART: u32 = 3;
    pub const AS_REQ: u32 = 10;
    pub const AS_REP: u32 = 11;
    pub const TGS_REQ: u32 = 12;
    pub const TGS_REP: u32 = 13;
    pub const AP_REQ: u32 = 14;
    pub const AP_REP: u32 = 15;
    pub const KRB_SAFE: u32 = 20;
    pub const KRB_PRIV: u32 = 21;
    pub const KRB_CRED: u32 = 22;
    pub const ENC_AS_REP_PART: u32 = 25;
    pub const ENC_TGS_REP_PART: u32 = 26;
    pub const KRB_ERROR: u32 = 30;
}

/// `msg-type` values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageType {
    AsReq = 10,
    AsRep = 11,
    TgsReq = 12,
    TgsRep = 13,
    ApReq = 14,
    ApRep = 15,
    KrbSafe = 20,
    KrbPriv = 21,
    KrbCred = 22,
    KrbError = 30,
}

impl MessageType {
    pub fn from_value(value: i64) -> Asn1Result<Self> {
        match value {
            10 => Ok(MessageType::AsReq),
            11 => Ok(MessageType::AsRep),
            12 => Ok(MessageType::TgsReq),
            13 => Ok(MessageType::TgsRep),
            14 => Ok(MessageType::ApReq),
            15 => Ok(MessageType::ApRep),
            20 => Ok(MessageType::KrbSafe),
            21 => Ok(MessageType::KrbPriv),
            22 => Ok(MessageType::KrbCred),
            30 => Ok(MessageType::KrbError),
            _ => Err(Asn1Error::Constraint(format!("invalid msg-type {}", value))),
        }
    }

    pub fn value(self) -> i64 {
        self as i64
    }
}

/// Principal name types (RFC 4120 6.2, RFC 6806)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NameType {
    Unknown = 0,
    Principal = 1,
    SrvInst = 2,
    SrvHst = 3,
    SrvXhst = 4,
    Uid = 5,
    X500Principal = 6,
    SmtpName = 7,
    Enterprise = 10,
}

impl NameType {
    pub fn from_value(value: i32) -> Asn1Result<Self> {
        match value {
            0 => Ok(NameType::Unknown),
            1 => Ok(NameType::Principal),
            2 => Ok(NameType::SrvInst),
            3 => Ok(NameType::SrvHst),
            4 => Ok(NameType::SrvXhst),
            5 => Ok(NameType::Uid),
            6 => Ok(NameType::X500Principal),
            7 => Ok(NameType::SmtpName),
            10 => Ok(NameType::Enterprise),
            _ => Err(Asn1Error::Constraint(format!("invalid name-type {}", value))),
        }
    }

    pub fn value(self) -> i32 {
        self as i32
    }
}

/// `padata-type` values in common use
pub mod pa_data_type {
    pub const PA_TGS_REQ: i32 = 1;
    pub const PA_ENC_TIMESTAMP: i32 = 2;
    pub const PA_PW_SALT: i32 = 3;
    pub const PA_ETYPE_INFO: i32 = 11;
    pub const PA_PK_AS_REQ: i32 = 16;
    pub const PA_PK_AS_REP: i32 = 17;
    pub const PA_ETYPE_INFO2: i32 = 19;
    pub const PA_PAC_REQUEST: i32 = 128;
}

/// Encryption type numbers (RFC 3961 8, RFC 3962, RFC 4757)
pub mod etype {
    pub const DES_CBC_CRC: i32 = 1;
    pub const DES_CBC_MD5: i32 = 3;
    pub const DES3_CBC_SHA1_KD: i32 = 16;
    pub const AES128_CTS_HMAC_SHA1_96: i32 = 17;
    pub const AES256_CTS_HMAC_SHA1_96: i32 = 18;
    pub const RC4_HMAC: i32 = 23;
}

/// `addr-type` values
pub mod address_type {
    pub const IPV4: i32 = 2;
    pub const DIRECTIONAL: i32 = 3;
    pub const CHAOSNET: i32 = 5;
    pub const XNS: i32 = 6;
    pub const ISO: i32 = 7;
    pub const DECNET_PHASE_IV: i32 = 12;
    pub const APPLETALK_DDP: i32 = 16;
    pub const NETBIOS: i32 = 20;
    pub const IPV6: i32 = 24;
}
