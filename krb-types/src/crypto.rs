//! EncryptionKey and EncryptedData
//!
//! Only the containers. Key derivation and the ciphers selected by `keytype`
//! and `etype` live outside this crate.

use krb_asn1::{template, Asn1Result, Asn1Type, Collection, FieldDescriptor, Value};

use crate::basic::{collection, int32, octets, optional_uint32};

static ENCRYPTION_KEY: &[FieldDescriptor] = &[
    FieldDescriptor::context(0, "keytype", template::integer),
    FieldDescriptor::context(1, "keyvalue", template::octet_string),
];

static ENCRYPTED_DATA: &[FieldDescriptor] = &[
    FieldDescriptor::context(0, "etype", template::integer),
    FieldDescriptor::context(1, "kvno", template::integer).optional(),
    FieldDescriptor::context(2, "cipher", template::octet_string),
];

/// `EncryptionKey ::= SEQUENCE { keytype [0] Int32, keyvalue [1] OCTET STRING }`
#[derive(Clone, PartialEq, Eq)]
pub struct EncryptionKey {
    pub keytype: i32,
    pub keyvalue: Vec<u8>,
}

impl std::fmt::Debug for EncryptionKey {
    // key material stays out of logs
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncryptionKey")
            .field("keytype", &self.keytype)
            .field("keyvalue", &format_args!("<{} bytes>", self.keyvalue.len()))
            .finish()
    }
}

impl EncryptionKey {
    pub fn new(keytype: i32, keyvalue: impl Into<Vec<u8>>) -> Self {
        Self {
            keytype,
            keyvalue: keyvalue.into(),
        }
    }
}

impl Asn1Type for EncryptionKey {
    fn template() -> Value {
        Value::sequence(ENCRYPTION_KEY)
    }

    fn to_value(&self) -> Asn1Result<Value> {
        let fields = Collection::new(ENCRYPTION_KEY)
            .with(0, Value::integer(self.keytype.into()))?
            .with(1, Value::octet_string(self.keyvalue.as_slice()))?;
        Ok(Value::Sequence(fields))
    }

    fn from_value(value: &Value) -> Asn1Result<Self> {
        let fields = collection(value, "EncryptionKey")?;
        Ok(Self {
            keytype: int32(fields, 0)?,
            keyvalue: octets(fields, 1)?,
        })
    }
}

/// ```text
/// EncryptedData ::= SEQUENCE {
///     etype   [0] Int32,
///     kvno    [1] UInt32 OPTIONAL,
///     cipher  [2] OCTET STRING
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedData {
    pub etype: i32,
    pub kvno: Option<u32>,
    pub cipher: Vec<u8>,
}

impl EncryptedData {
    pub fn new(etype: i32, kvno: Option<u32>, cipher: impl Into<Vec<u8>>) -> Self {
        Self {
            etype,
            kvno,
            cipher: cipher.into(),
        }
    }
}

impl Asn1Type for EncryptedData {
    fn template() -> Value {
        Value::sequence(ENCRYPTED_DATA)
    }

    fn to_value(&self) -> Asn1Result<Value> {
        let mut fields = Collection::new(ENCRYPTED_DATA)
            .with(0, Value::integer(self.etype.into()))?
            .with(2, Value::octet_string(self.cipher.as_slice()))?;
        fields.set_optional(1, self.kvno.map(|kvno| Value::integer(kvno.into())))?;
        Ok(Value::Sequence(fields))
    }

    fn from_value(value: &Value) -> Asn1Result<Self> {
        let fields = collection(value, "EncryptedData")?;
        Ok(Self {
            etype: int32(fields, 0)?,
            kvno: optional_uint32(fields, 1)?,
            cipher: octets(fields, 2)?,
        })
    }
}
