//! KerberosFlags
//!
//! `KerberosFlags ::= BIT STRING (SIZE (32..MAX))`. Senders emit exactly 32
//! bits; receivers accept shorter strings (missing bits read as clear) and
//! ignore anything past bit 31.

use std::fmt;

use krb_asn1::{template, Asn1Error, Asn1Result, Asn1Type, BitString, Value};

/// Bit positions of `TicketFlags`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TicketFlag {
    Reserved = 0,
    Forwardable = 1,
    Forwarded = 2,
    Proxiable = 3,
    Proxy = 4,
    MayPostdate = 5,
    Postdated = 6,
    Invalid = 7,
    Renewable = 8,
    Initial = 9,
    PreAuthent = 10,
    HwAuthent = 11,
    TransitedPolicyChecked = 12,
    OkAsDelegate = 13,
}

/// Bit positions of `KDCOptions`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KdcOption {
    Reserved = 0,
    Forwardable = 1,
    Forwarded = 2,
    Proxiable = 3,
    Proxy = 4,
    AllowPostdate = 5,
    Postdated = 6,
    Renewable = 8,
    Canonicalize = 15,
    DisableTransitedCheck = 26,
    RenewableOk = 27,
    EncTktInSkey = 28,
    Renew = 30,
    Validate = 31,
}

/// A bit position within a 32-bit flag word
pub trait FlagBit: Copy {
    fn position(self) -> u32;
}

impl FlagBit for TicketFlag {
    fn position(self) -> u32 {
        self as u32
    }
}

impl FlagBit for KdcOption {
    fn position(self) -> u32 {
        self as u32
    }
}

impl FlagBit for u32 {
    fn position(self) -> u32 {
        self
    }
}

/// 32 flag bits, bit 0 being the most significant bit of the first octet
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct KerberosFlags {
    bits: u32,
}

pub type TicketFlags = KerberosFlags;

pub type KdcOptions = KerberosFlags;

impl KerberosFlags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_bits(bits: u32) -> Self {
        Self { bits }
    }

    pub fn bits(&self) -> u32 {
        self.bits
    }

    fn mask(flag: impl FlagBit) -> u32 {
        let position = flag.position();
        if position < 32 { 0x8000_0000 >> position } else { 0 }
    }

    pub fn contains(&self, flag: impl FlagBit) -> bool {
        self.bits & Self::mask(flag) != 0
    }

    pub fn set(&mut self, flag: impl FlagBit, on: bool) {
        if on {
            self.bits |= Self::mask(flag);
        } else {
            self.bits &= !Self::mask(flag);
        }
    }

    /// Builder form of [`KerberosFlags::set`]
    pub fn with(mut self, flag: impl FlagBit) -> Self {
        self.set(flag, true);
        self
    }

    pub fn to_bit_string(&self) -> BitString {
        BitString::from(self.bits)
    }

    pub fn from_bit_string(bits: &BitString) -> Self {
        if bits.num_bits() > 32 {
            log::debug!("ignoring {} flag bits past bit 31", bits.num_bits() - 32);
        }
        let word = (0..bits.num_bits().min(32))
            .filter(|&i| bits.bit(i))
            .fold(0u32, |word, i| word | (0x8000_0000 >> i));
        Self { bits: word }
    }
}

impl fmt::Debug for KerberosFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KerberosFlags({:#010x})", self.bits)
    }
}

impl Asn1Type for KerberosFlags {
    fn template() -> Value {
        template::bit_string()
    }

    fn to_value(&self) -> Asn1Result<Value> {
        Ok(Value::bit_string(self.to_bit_string()))
    }

    fn from_value(value: &Value) -> Asn1Result<Self> {
        value
            .as_bit_string()
            .map(Self::from_bit_string)
            .ok_or_else(|| {
                Asn1Error::Constraint(format!("KerberosFlags cannot hold {}", value.type_name()))
            })
    }
}
