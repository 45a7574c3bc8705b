//! Basic types from RFC 4120 5.2
//!
//! `KerberosString` and `Realm` map straight onto Rust strings carried as
//! GeneralString. `KerberosTime` is a GeneralizedTime with no fractional
//! part, which the [`KerberosTime`] newtype enforces in both directions.
//!
//! The remaining functions are shared by the schema types of this crate to
//! pull typed fields out of a decoded [`Collection`].

use chrono::{DateTime, SubsecRound, Timelike, Utc};
use krb_asn1::{template, Asn1Error, Asn1Result, Asn1Type, Collection, Value};

pub type KerberosString = String;

pub type Realm = KerberosString;

/// Empty `SEQUENCE OF KerberosString`
pub fn kerberos_strings() -> Value {
    Value::sequence_of(template::general_string)
}

/// `KerberosTime ::= GeneralizedTime -- with no fractional seconds`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct KerberosTime(DateTime<Utc>);

impl KerberosTime {
    /// Sub-second precision is dropped
    pub fn new(time: DateTime<Utc>) -> Self {
        Self(time.trunc_subsecs(0))
    }

    pub fn now() -> Self {
        Self::new(Utc::now())
    }

    pub fn time(&self) -> DateTime<Utc> {
        self.0
    }
}

impl From<DateTime<Utc>> for KerberosTime {
    fn from(time: DateTime<Utc>) -> Self {
        Self::new(time)
    }
}

impl Asn1Type for KerberosTime {
    fn template() -> Value {
        template::generalized_time()
    }

    fn to_value(&self) -> Asn1Result<Value> {
        Ok(Value::generalized_time(self.0))
    }

    fn from_value(value: &Value) -> Asn1Result<Self> {
        let time = value.as_time().ok_or_else(|| {
            Asn1Error::Constraint(format!("KerberosTime cannot hold {}", value.type_name()))
        })?;
        if time.nanosecond() != 0 {
            return Err(Asn1Error::Constraint(
                "KerberosTime carries fractional seconds".to_string(),
            ));
        }
        Ok(Self(time))
    }
}

/// The SEQUENCE fields of `value`, or a constraint error naming `type_name`
pub(crate) fn collection<'a>(value: &'a Value, type_name: &str) -> Asn1Result<&'a Collection> {
    value.as_collection().ok_or_else(|| {
        Asn1Error::Constraint(format!("{} expects a SEQUENCE, got {}", type_name, value.type_name()))
    })
}

pub(crate) fn required<T>(fields: &Collection, index: usize, value: Option<T>) -> Asn1Result<T> {
    value.ok_or_else(|| fields.missing(index))
}

fn out_of_range(fields: &Collection, index: usize, reason: String) -> Asn1Error {
    Asn1Error::Constraint(reason).in_field(index, fields.fields()[index].name)
}

/// `Int32 ::= INTEGER (-2147483648..2147483647)`
pub(crate) fn int32(fields: &Collection, index: usize) -> Asn1Result<i32> {
    let value = required(fields, index, fields.get_integer(index)?)?;
    i32::try_from(value)
        .map_err(|_| out_of_range(fields, index, format!("{} is outside Int32", value)))
}

/// `UInt32 ::= INTEGER (0..4294967295)`, optional
pub(crate) fn optional_uint32(fields: &Collection, index: usize) -> Asn1Result<Option<u32>> {
    fields
        .get_integer(index)?
        .map(|value| {
            u32::try_from(value)
                .map_err(|_| out_of_range(fields, index, format!("{} is outside UInt32", value)))
        })
        .transpose()
}

pub(crate) fn string(fields: &Collection, index: usize) -> Asn1Result<String> {
    required(fields, index, fields.get_string(index)?).map(str::to_string)
}

pub(crate) fn octets(fields: &Collection, index: usize) -> Asn1Result<Vec<u8>> {
    required(fields, index, fields.get_octets(index)?).map(<[u8]>::to_vec)
}

/// Required field decoded through its own [`Asn1Type`]
pub(crate) fn nested<T: Asn1Type>(fields: &Collection, index: usize) -> Asn1Result<T> {
    let value = required(fields, index, fields.get(index)?)?;
    T::from_value(value).map_err(|e| e.in_field(index, fields.fields()[index].name))
}
