//! SEQUENCE / SET and SEQUENCE OF / SET OF
//!
//! # Encoding Format
//!
//! ```text
//! SEQUENCE:    0x30 [len] [field 0 TLV] [field 1 TLV] ...   (absent optionals emit nothing)
//! SEQUENCE OF: 0x30 [len] [element TLV] [element TLV] ...
//! SET / SET OF use 0x31; elements keep insertion order.
//! ```

use crate::ber::{BerDecoder, BerEncoder, Tlv};
use crate::error::{Asn1Error, Asn1Result};
use crate::policy::EncodingPolicy;
use crate::schema::{is_well_formed, same_schema, FieldDescriptor, ValueFactory};
use crate::types::{BitString, ObjectIdentifier};
use crate::value::Value;
use chrono::{DateTime, Utc};

/// Field slots of a SEQUENCE or SET
///
/// There is exactly one slot per descriptor. An unset slot is distinct from
/// a slot holding an empty value.
#[derive(Debug, Clone)]
pub struct Collection {
    fields: &'static [FieldDescriptor],
    slots: Vec<Option<Value>>,
    policy: Option<EncodingPolicy>,
}

impl PartialEq for Collection {
    fn eq(&self, other: &Self) -> bool {
        same_schema(self.fields, other.fields)
            && self.slots == other.slots
            && self.policy == other.policy
    }
}

impl Collection {
    pub fn new(fields: &'static [FieldDescriptor]) -> Self {
        debug_assert!(is_well_formed(fields), "descriptor index differs from position");
        Self {
            fields,
            slots: vec![None; fields.len()],
            policy: None,
        }
    }

    pub fn fields(&self) -> &'static [FieldDescriptor] {
        self.fields
    }

    /// Number of field slots
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when no field is set
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    pub fn policy(&self) -> Option<&EncodingPolicy> {
        self.policy.as_ref()
    }

    pub fn set_policy(&mut self, policy: Option<EncodingPolicy>) {
        self.policy = policy;
    }

    fn descriptor(&self, index: usize) -> Asn1Result<&'static FieldDescriptor> {
        self.fields.get(index).ok_or(Asn1Error::FieldIndexOutOfRange {
            index,
            len: self.fields.len(),
        })
    }

    /// Value of field `index`, `None` while unset
    pub fn get(&self, index: usize) -> Asn1Result<Option<&Value>> {
        self.descriptor(index)?;
        Ok(self.slots[index].as_ref())
    }

    pub fn get_mut(&mut self, index: usize) -> Asn1Result<Option<&mut Value>> {
        self.descriptor(index)?;
        Ok(self.slots[index].as_mut())
    }

    /// Value of a field that must be present
    pub fn field(&self, index: usize) -> Asn1Result<&Value> {
        self.get(index)?.ok_or_else(|| self.missing(index))
    }

    pub fn is_set(&self, index: usize) -> Asn1Result<bool> {
        Ok(self.get(index)?.is_some())
    }

    /// Store `value` in field `index`
    ///
    /// The value must have the shape the field's factory produces.
    pub fn set(&mut self, index: usize, value: Value) -> Asn1Result<()> {
        let descriptor = self.descriptor(index)?;
        let template = descriptor.template();
        if !value.same_type(&template) {
            return Err(Asn1Error::FieldTypeMismatch {
                index,
                expected: template.type_name(),
            });
        }
        self.slots[index] = Some(value);
        Ok(())
    }

    /// Builder form of [`Collection::set`]
    pub fn with(mut self, index: usize, value: Value) -> Asn1Result<Self> {
        self.set(index, value)?;
        Ok(self)
    }

    /// Store `value` when present, clear the field otherwise
    pub fn set_optional(&mut self, index: usize, value: Option<Value>) -> Asn1Result<()> {
        match value {
            Some(value) => self.set(index, value),
            None => self.clear(index),
        }
    }

    pub fn clear(&mut self, index: usize) -> Asn1Result<()> {
        self.descriptor(index)?;
        self.slots[index] = None;
        Ok(())
    }

    /// The error reported for an absent required field
    pub fn missing(&self, index: usize) -> Asn1Error {
        match self.fields.get(index) {
            Some(descriptor) => Asn1Error::MissingRequiredField {
                index,
                name: descriptor.name,
            },
            None => Asn1Error::FieldIndexOutOfRange {
                index,
                len: self.fields.len(),
            },
        }
    }

    fn get_as<'a, T>(
        &'a self,
        index: usize,
        expected: &'static str,
        extract: impl FnOnce(&'a Value) -> Option<T>,
    ) -> Asn1Result<Option<T>> {
        match self.get(index)? {
            None => Ok(None),
            Some(value) => extract(value)
                .map(Some)
                .ok_or(Asn1Error::FieldTypeMismatch { index, expected }),
        }
    }

    pub fn get_bool(&self, index: usize) -> Asn1Result<Option<bool>> {
        self.get_as(index, "BOOLEAN", Value::as_bool)
    }

    pub fn get_integer(&self, index: usize) -> Asn1Result<Option<i64>> {
        self.get_as(index, "INTEGER", Value::as_integer)
    }

    pub fn get_octets(&self, index: usize) -> Asn1Result<Option<&[u8]>> {
        self.get_as(index, "OCTET STRING", Value::as_octets)
    }

    pub fn get_string(&self, index: usize) -> Asn1Result<Option<&str>> {
        self.get_as(index, "a character string", Value::as_str)
    }

    pub fn get_time(&self, index: usize) -> Asn1Result<Option<DateTime<Utc>>> {
        self.get_as(index, "a time value", Value::as_time)
    }

    pub fn get_bit_string(&self, index: usize) -> Asn1Result<Option<&BitString>> {
        self.get_as(index, "BIT STRING", Value::as_bit_string)
    }

    pub fn get_oid(&self, index: usize) -> Asn1Result<Option<&ObjectIdentifier>> {
        self.get_as(index, "OBJECT IDENTIFIER", Value::as_oid)
    }

    pub fn get_collection(&self, index: usize) -> Asn1Result<Option<&Collection>> {
        self.get_as(index, "SEQUENCE", Value::as_collection)
    }

    pub fn get_collection_of(&self, index: usize) -> Asn1Result<Option<&CollectionOf>> {
        self.get_as(index, "SEQUENCE OF", Value::as_collection_of)
    }

    pub(crate) fn cleared(&self) -> Self {
        Self {
            fields: self.fields,
            slots: vec![None; self.fields.len()],
            policy: self.policy,
        }
    }

    pub(crate) fn encode_content(&self, policy: &EncodingPolicy) -> Asn1Result<Vec<u8>> {
        let mut encoder = BerEncoder::new();
        for (descriptor, slot) in self.fields.iter().zip(&self.slots) {
            match slot {
                Some(value) => encoder.append_encoded(&descriptor.encode_field(value, policy)?),
                None if descriptor.optional => {}
                None => {
                    return Err(Asn1Error::Encoding(format!(
                        "required field {} ({}) is not set",
                        descriptor.index, descriptor.name
                    )));
                }
            }
        }
        Ok(encoder.into_bytes())
    }

    /// Route each child TLV to its field
    ///
    /// Descriptors are walked in order; every descriptor skipped to reach a
    /// child's match must be optional.
    pub(crate) fn decode_content(
        &mut self,
        content: &[u8],
        offset: usize,
        policy: &EncodingPolicy,
    ) -> Asn1Result<()> {
        let mut slots: Vec<Option<Value>> = vec![None; self.fields.len()];
        let mut decoder = BerDecoder::with_offset(content, offset, policy.rules);
        let mut next = 0;

        while decoder.has_remaining() {
            let tlv = decoder.read_tlv()?;
            let Some(index) = self.route(&tlv, next)? else {
                let remaining = content.len() - (tlv.offset - offset);
                if policy.strict {
                    return Err(Asn1Error::TrailingData {
                        offset: tlv.offset,
                        remaining,
                    });
                }
                log::warn!(
                    "ignoring {} bytes after the last field at offset {}",
                    remaining,
                    tlv.offset
                );
                break;
            };

            let descriptor = &self.fields[index];
            log::trace!(
                "field {} ({}) <- {} at offset {}",
                index,
                descriptor.name,
                tlv.tag,
                tlv.offset
            );
            slots[index] = Some(descriptor.decode_field(&tlv, policy)?);
            next = index + 1;
        }

        if let Some(missing) = self.fields[next..].iter().find(|d| !d.optional) {
            return Err(Asn1Error::MissingRequiredField {
                index: missing.index,
                name: missing.name,
            });
        }

        self.slots = slots;
        Ok(())
    }

    /// Index of the first descriptor from `next` on that accepts `tlv`
    fn route(&self, tlv: &Tlv<'_>, next: usize) -> Asn1Result<Option<usize>> {
        for (index, descriptor) in self.fields.iter().enumerate().skip(next) {
            if descriptor.matches(&tlv.tag) {
                return Ok(Some(index));
            }
            if !descriptor.optional {
                return Err(Asn1Error::MissingRequiredField {
                    index,
                    name: descriptor.name,
                });
            }
        }
        Ok(None)
    }
}

/// Elements of a SEQUENCE OF or SET OF
#[derive(Debug, Clone)]
pub struct CollectionOf {
    element: ValueFactory,
    items: Vec<Value>,
    policy: Option<EncodingPolicy>,
}

impl PartialEq for CollectionOf {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
            && self.policy == other.policy
            && self.template().same_type(&other.template())
    }
}

impl CollectionOf {
    pub fn new(element: ValueFactory) -> Self {
        Self {
            element,
            items: Vec::new(),
            policy: None,
        }
    }

    /// Empty value of the element type
    pub fn template(&self) -> Value {
        (self.element)()
    }

    pub fn items(&self) -> &[Value] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.items.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn policy(&self) -> Option<&EncodingPolicy> {
        self.policy.as_ref()
    }

    pub fn set_policy(&mut self, policy: Option<EncodingPolicy>) {
        self.policy = policy;
    }

    /// Append an element of the collection's element type
    pub fn push(&mut self, value: Value) -> Asn1Result<()> {
        let template = self.template();
        if !value.same_type(&template) {
            return Err(Asn1Error::FieldTypeMismatch {
                index: self.items.len(),
                expected: template.type_name(),
            });
        }
        self.items.push(value);
        Ok(())
    }

    /// Builder form of [`CollectionOf::push`]
    pub fn with(mut self, value: Value) -> Asn1Result<Self> {
        self.push(value)?;
        Ok(self)
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub(crate) fn cleared(&self) -> Self {
        Self {
            element: self.element,
            items: Vec::new(),
            policy: self.policy,
        }
    }

    pub(crate) fn encode_content(&self, policy: &EncodingPolicy) -> Asn1Result<Vec<u8>> {
        let mut encoder = BerEncoder::new();
        for (index, item) in self.items.iter().enumerate() {
            let encoded = item
                .encode_with(policy)
                .map_err(|e| e.in_field(index, "element"))?;
            encoder.append_encoded(&encoded);
        }
        Ok(encoder.into_bytes())
    }

    pub(crate) fn decode_content(
        &mut self,
        content: &[u8],
        offset: usize,
        policy: &EncodingPolicy,
    ) -> Asn1Result<()> {
        let mut items = Vec::new();
        let mut decoder = BerDecoder::with_offset(content, offset, policy.rules);
        while decoder.has_remaining() {
            let tlv = decoder.read_tlv()?;
            let mut item = self.template();
            item.decode_tlv(&tlv, policy)
                .map_err(|e| e.in_field(items.len(), "element"))?;
            items.push(item);
        }
        self.items = items;
        Ok(())
    }
}

impl<'a> IntoIterator for &'a CollectionOf {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
