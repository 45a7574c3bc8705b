//! CHOICE values

use crate::ber::{Tag, Tlv};
use crate::error::{Asn1Error, Asn1Result};
use crate::policy::EncodingPolicy;
use crate::schema::{is_well_formed, same_schema, FieldDescriptor};
use crate::value::Value;

/// Exactly one of several alternatives
///
/// A CHOICE has no tag of its own: it encodes as the selected alternative,
/// under that alternative's descriptor tag if it has one.
#[derive(Debug, Clone)]
pub struct Choice {
    alternatives: &'static [FieldDescriptor],
    selected: Option<(usize, Box<Value>)>,
    policy: Option<EncodingPolicy>,
}

impl PartialEq for Choice {
    fn eq(&self, other: &Self) -> bool {
        same_schema(self.alternatives, other.alternatives)
            && self.selected == other.selected
            && self.policy == other.policy
    }
}

impl Choice {
    pub fn new(alternatives: &'static [FieldDescriptor]) -> Self {
        debug_assert!(is_well_formed(alternatives), "descriptor index differs from position");
        Self {
            alternatives,
            selected: None,
            policy: None,
        }
    }

    pub fn alternatives(&self) -> &'static [FieldDescriptor] {
        self.alternatives
    }

    /// Select alternative `index` holding `value`
    pub fn select(&mut self, index: usize, value: Value) -> Asn1Result<()> {
        let descriptor = self
            .alternatives
            .get(index)
            .ok_or(Asn1Error::FieldIndexOutOfRange {
                index,
                len: self.alternatives.len(),
            })?;
        let template = descriptor.template();
        if !value.same_type(&template) {
            return Err(Asn1Error::FieldTypeMismatch {
                index,
                expected: template.type_name(),
            });
        }
        self.selected = Some((index, Box::new(value)));
        Ok(())
    }

    /// Builder form of [`Choice::select`]
    pub fn with(mut self, index: usize, value: Value) -> Asn1Result<Self> {
        self.select(index, value)?;
        Ok(self)
    }

    /// Index and value of the selected alternative
    pub fn selected(&self) -> Option<(usize, &Value)> {
        self.selected.as_ref().map(|(index, value)| (*index, value.as_ref()))
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected.as_ref().map(|(index, _)| *index)
    }

    pub fn selected_name(&self) -> Option<&'static str> {
        self.selected_index().map(|index| self.alternatives[index].name)
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }

    pub fn policy(&self) -> Option<&EncodingPolicy> {
        self.policy.as_ref()
    }

    pub fn set_policy(&mut self, policy: Option<EncodingPolicy>) {
        self.policy = policy;
    }

    /// True when some alternative accepts a TLV tagged `tag`
    pub fn matches_tag(&self, tag: &Tag) -> bool {
        self.alternatives.iter().any(|alternative| alternative.matches(tag))
    }

    pub(crate) fn cleared(&self) -> Self {
        Self {
            alternatives: self.alternatives,
            selected: None,
            policy: self.policy,
        }
    }

    pub(crate) fn encode(&self, policy: &EncodingPolicy) -> Asn1Result<Vec<u8>> {
        let Some((index, value)) = &self.selected else {
            return Err(Asn1Error::Encoding("no CHOICE alternative selected".to_string()));
        };
        self.alternatives[*index].encode_field(value, policy)
    }

    /// The first alternative whose tag matches wins
    pub(crate) fn decode_tlv(&mut self, tlv: &Tlv<'_>, policy: &EncodingPolicy) -> Asn1Result<()> {
        let Some(descriptor) = self.alternatives.iter().find(|a| a.matches(&tlv.tag)) else {
            return Err(Asn1Error::UnknownChoiceVariant {
                offset: tlv.offset,
                tag: tlv.tag,
            });
        };
        log::trace!(
            "CHOICE alternative {} ({}) <- {} at offset {}",
            descriptor.index,
            descriptor.name,
            tlv.tag,
            tlv.offset
        );
        let value = descriptor.decode_field(tlv, policy)?;
        self.selected = Some((descriptor.index, Box::new(value)));
        Ok(())
    }
}
