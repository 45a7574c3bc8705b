//! Pre-authentication data
//!
//! `PA-DATA` numbers its fields from 1, so both descriptors carry an
//! explicit tag number.

use krb_asn1::{template, Asn1Result, Asn1Type, Collection, FieldDescriptor, Value};

use crate::basic::{collection, int32, octets};

static PA_DATA: &[FieldDescriptor] = &[
    FieldDescriptor::context(0, "padata-type", template::integer).tag_number(1),
    FieldDescriptor::context(1, "padata-value", template::octet_string).tag_number(2),
];

/// ```text
/// PA-DATA ::= SEQUENCE {
///     padata-type   [1] Int32,
///     padata-value  [2] OCTET STRING
/// }
/// ```
///
/// `padata_value` is usually the DER encoding of another type selected by
/// `padata_type`; it is kept opaque here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaData {
    pub padata_type: i32,
    pub padata_value: Vec<u8>,
}

impl PaData {
    pub fn new(padata_type: i32, padata_value: impl Into<Vec<u8>>) -> Self {
        Self {
            padata_type,
            padata_value: padata_value.into(),
        }
    }

    /// Wrap `value` DER-encoded as the padata-value
    pub fn encapsulate<T: Asn1Type>(padata_type: i32, value: &T) -> Asn1Result<Self> {
        Ok(Self::new(padata_type, value.encode()?))
    }

    /// Decode the padata-value as `T`
    pub fn decapsulate<T: Asn1Type>(&self) -> Asn1Result<T> {
        T::decode(&self.padata_value).map_err(|e| e.in_field(1, "padata-value"))
    }
}

impl Asn1Type for PaData {
    fn template() -> Value {
        Value::sequence(PA_DATA)
    }

    fn to_value(&self) -> Asn1Result<Value> {
        let fields = Collection::new(PA_DATA)
            .with(0, Value::integer(self.padata_type.into()))?
            .with(1, Value::octet_string(self.padata_value.as_slice()))?;
        Ok(Value::Sequence(fields))
    }

    fn from_value(value: &Value) -> Asn1Result<Self> {
        let fields = collection(value, "PA-DATA")?;
        Ok(Self {
            padata_type: int32(fields, 0)?,
            padata_value: octets(fields, 1)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{etype, pa_data_type};
    use crate::crypto::EncryptedData;
    use hex_literal::hex;
    use krb_asn1::Asn1Error;

    #[test]
    fn test_field_tags_start_at_one() {
        let pa = PaData::new(pa_data_type::PA_ENC_TIMESTAMP, hex!("01 02"));
        let bytes = hex!("30 0B A1 03 02 01 02 A2 04 04 02 01 02");
        assert_eq!(pa.encode().unwrap(), bytes);
        assert_eq!(PaData::decode(&bytes).unwrap(), pa);
    }

    #[test]
    fn test_tag_zero_is_not_padata_type() {
        let bytes = hex!("30 0B A0 03 02 01 02 A2 04 04 02 01 02");
        assert!(matches!(
            PaData::decode(&bytes).unwrap_err(),
            Asn1Error::MissingRequiredField { index: 0, .. }
        ));
    }

    #[test]
    fn test_encrypted_timestamp_encapsulation() {
        let timestamp = EncryptedData::new(etype::AES256_CTS_HMAC_SHA1_96, None, hex!("AA BB"));
        let pa = PaData::encapsulate(pa_data_type::PA_ENC_TIMESTAMP, &timestamp).unwrap();
        assert_eq!(pa.padata_value, timestamp.encode().unwrap());
        assert_eq!(pa.decapsulate::<EncryptedData>().unwrap(), timestamp);

        let garbage = PaData::new(pa_data_type::PA_ENC_TIMESTAMP, hex!("04 00"));
        assert_eq!(garbage.decapsulate::<EncryptedData>().unwrap_err().field_path(), vec![1]);
    }
}
