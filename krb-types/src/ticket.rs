//! Ticket

use krb_asn1::{
    template, Asn1Error, Asn1Result, Asn1Type, Collection, FieldDescriptor, TaggingOption, Value,
};

use crate::basic::{collection, nested, required, string, Realm};
use crate::constants::{application_tag, PVNO};
use crate::crypto::EncryptedData;
use crate::principal::PrincipalName;

const TICKET_TAG: TaggingOption = TaggingOption::explicit_application(application_tag::TICKET);

static TICKET: &[FieldDescriptor] = &[
    FieldDescriptor::context(0, "tkt-vno", template::integer),
    FieldDescriptor::context(1, "realm", template::general_string),
    FieldDescriptor::context(2, "sname", PrincipalName::template),
    FieldDescriptor::context(3, "enc-part", EncryptedData::template),
];

/// ```text
/// Ticket ::= [APPLICATION 1] SEQUENCE {
///     tkt-vno   [0] INTEGER (5),
///     realm     [1] Realm,
///     sname     [2] PrincipalName,
///     enc-part  [3] EncryptedData -- EncTicketPart
/// }
/// ```
///
/// `tkt-vno` is not stored; it is always written as 5 and anything else is
/// rejected on decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    pub realm: Realm,
    pub sname: PrincipalName,
    pub enc_part: EncryptedData,
}

impl Ticket {
    pub fn new(realm: impl Into<Realm>, sname: PrincipalName, enc_part: EncryptedData) -> Self {
        Self {
            realm: realm.into(),
            sname,
            enc_part,
        }
    }
}

impl Asn1Type for Ticket {
    fn template() -> Value {
        Value::tagged(TICKET_TAG, Value::sequence(TICKET))
    }

    fn to_value(&self) -> Asn1Result<Value> {
        let fields = Collection::new(TICKET)
            .with(0, Value::integer(PVNO))?
            .with(1, Value::general_string(self.realm.as_str()))?
            .with(2, self.sname.to_value()?)?
            .with(3, self.enc_part.to_value()?)?;
        Ok(Value::tagged(TICKET_TAG, Value::Sequence(fields)))
    }

    fn from_value(value: &Value) -> Asn1Result<Self> {
        let fields = collection(value, "Ticket")?;
        let tkt_vno = required(fields, 0, fields.get_integer(0)?)?;
        if tkt_vno != PVNO {
            return Err(Asn1Error::Constraint(format!("unsupported tkt-vno {}", tkt_vno))
                .in_field(0, "tkt-vno"));
        }
        Ok(Self {
            realm: string(fields, 1)?,
            sname: nested(fields, 2)?,
            enc_part: nested(fields, 3)?,
        })
    }
}
