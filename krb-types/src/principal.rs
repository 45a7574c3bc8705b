//! PrincipalName

use std::fmt;

use krb_asn1::{
    template, Asn1Error, Asn1Result, Asn1Type, Collection, CollectionOf, FieldDescriptor, Value,
};

use crate::basic::{collection, int32, kerberos_strings, required};
use crate::constants::NameType;

static PRINCIPAL_NAME: &[FieldDescriptor] = &[
    FieldDescriptor::context(0, "name-type", template::integer),
    FieldDescriptor::context(1, "name-string", kerberos_strings),
];

/// ```text
/// PrincipalName ::= SEQUENCE {
///     name-type   [0] Int32,
///     name-string [1] SEQUENCE OF KerberosString
/// }
/// ```
///
/// `name_type` stays a plain integer so that names of unregistered types
/// survive a decode/encode cycle; [`PrincipalName::known_type`] maps it onto
/// [`NameType`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PrincipalName {
    pub name_type: i32,
    pub name_string: Vec<String>,
}

impl PrincipalName {
    pub fn new<I, S>(name_type: NameType, components: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name_type: name_type.value(),
            name_string: components.into_iter().map(Into::into).collect(),
        }
    }

    /// `krbtgt/REALM`
    pub fn krbtgt(realm: &str) -> Self {
        Self::new(NameType::SrvInst, ["krbtgt", realm])
    }

    pub fn known_type(&self) -> Asn1Result<NameType> {
        NameType::from_value(self.name_type)
    }
}

impl fmt::Display for PrincipalName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name_string.join("/"))
    }
}

impl Asn1Type for PrincipalName {
    fn template() -> Value {
        Value::sequence(PRINCIPAL_NAME)
    }

    fn to_value(&self) -> Asn1Result<Value> {
        let mut components = CollectionOf::new(template::general_string);
        for component in &self.name_string {
            components.push(Value::general_string(component.as_str()))?;
        }
        let fields = Collection::new(PRINCIPAL_NAME)
            .with(0, Value::integer(self.name_type.into()))?
            .with(1, Value::SequenceOf(components))?;
        Ok(Value::Sequence(fields))
    }

    fn from_value(value: &Value) -> Asn1Result<Self> {
        let fields = collection(value, "PrincipalName")?;
        let components = required(fields, 1, fields.get_collection_of(1)?)?;
        let name_string = components
            .iter()
            .enumerate()
            .map(|(i, component)| {
                component.as_str().map(str::to_string).ok_or_else(|| {
                    Asn1Error::FieldTypeMismatch {
                        index: i,
                        expected: "KerberosString",
                    }
                    .in_field(1, "name-string")
                })
            })
            .collect::<Asn1Result<Vec<_>>>()?;
        Ok(Self {
            name_type: int32(fields, 0)?,
            name_string,
        })
    }
}
