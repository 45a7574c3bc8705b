//! Empty-value factories for descriptor tables
//!
//! Each function matches [`ValueFactory`](crate::ValueFactory), so it can be
//! named directly in a `FieldDescriptor`.

use crate::any::Any;
use crate::types::{BitString, ObjectIdentifier, StringKind};
use crate::value::Value;
use chrono::{DateTime, Utc};

pub fn boolean() -> Value {
    Value::boolean(false)
}

pub fn integer() -> Value {
    Value::integer(0)
}

pub fn enumerated() -> Value {
    Value::enumerated(0)
}

pub fn bit_string() -> Value {
    Value::bit_string(BitString::default())
}

pub fn octet_string() -> Value {
    Value::octet_string(Vec::<u8>::new())
}

pub fn null() -> Value {
    Value::null()
}

pub fn object_identifier() -> Value {
    Value::object_identifier(ObjectIdentifier::default())
}

pub fn utf8_string() -> Value {
    Value::string(StringKind::Utf8, "")
}

pub fn printable_string() -> Value {
    Value::string(StringKind::Printable, "")
}

pub fn ia5_string() -> Value {
    Value::string(StringKind::Ia5, "")
}

pub fn visible_string() -> Value {
    Value::string(StringKind::Visible, "")
}

pub fn general_string() -> Value {
    Value::string(StringKind::General, "")
}

pub fn utc_time() -> Value {
    Value::utc_time(DateTime::<Utc>::UNIX_EPOCH)
}

pub fn generalized_time() -> Value {
    Value::generalized_time(DateTime::<Utc>::UNIX_EPOCH)
}

pub fn any() -> Value {
    Value::Any(Any::default())
}
