//! Encoding policy: BER vs DER and the default tagging environment
//!
//! A policy is handed to the root value at encode/decode time and flows down
//! to every child. Composite values may carry their own override, which then
//! applies to that subtree.
//!
//! The policy is plain configuration and derives `serde` so a host
//! application can keep it in its own config file:
//!
//! ```toml
//! [asn1]
//! rules = "der"
//! tagging = "explicit"
//! strict = true
//! ```

use serde::{Deserialize, Serialize};

/// Encoding rules (ITU-T X.690)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncodingRules {
    /// Basic Encoding Rules, definite lengths only
    Ber,
    /// Distinguished Encoding Rules
    #[default]
    Der,
}

/// Tagging mode of a re-tagged value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaggingMode {
    /// The new tag replaces the inner value's own tag
    Implicit,
    /// The new tag wraps the complete inner TLV
    #[default]
    Explicit,
}

/// Per-value encoding settings
///
/// The default matches RFC 4120: DER, `EXPLICIT TAGS`, strict decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodingPolicy {
    /// BER or DER
    pub rules: EncodingRules,
    /// Mode applied to context-tagged fields whose descriptor names none
    pub tagging: TaggingMode,
    /// Reject trailing bytes after the last expected field
    pub strict: bool,
}

impl EncodingPolicy {
    pub const DER: Self = Self {
        rules: EncodingRules::Der,
        tagging: TaggingMode::Explicit,
        strict: true,
    };

    pub const BER: Self = Self {
        rules: EncodingRules::Ber,
        tagging: TaggingMode::Explicit,
        strict: true,
    };

    pub const fn with_rules(self, rules: EncodingRules) -> Self {
        Self { rules, ..self }
    }

    pub const fn with_tagging(self, tagging: TaggingMode) -> Self {
        Self { tagging, ..self }
    }

    /// Trailing data is logged and skipped instead of failing the decode
    pub const fn lenient(self) -> Self {
        Self {
            strict: false,
            ..self
        }
    }

    pub fn is_der(&self) -> bool {
        self.rules == EncodingRules::Der
    }
}

impl Default for EncodingPolicy {
    fn default() -> Self {
        Self::DER
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = EncodingPolicy::default();
        assert!(policy.is_der());
        assert_eq!(policy.tagging, TaggingMode::Explicit);
        assert!(policy.strict);
    }

    #[test]
    fn test_policy_from_config() {
        let policy: EncodingPolicy =
            serde_json::from_str(r#"{"rules":"ber","tagging":"implicit"}"#).unwrap();
        assert_eq!(policy.rules, EncodingRules::Ber);
        assert_eq!(policy.tagging, TaggingMode::Implicit);
        // missing keys fall back to the defaults
        assert!(policy.strict);
    }

    #[test]
    fn test_policy_config_round_trip() {
        let policy = EncodingPolicy::BER.with_tagging(TaggingMode::Implicit).lenient();
        let text = serde_json::to_string(&policy).unwrap();
        assert_eq!(text, r#"{"rules":"ber","tagging":"implicit","strict":false}"#);
        let back: EncodingPolicy = serde_json::from_str(&text).unwrap();
        assert_eq!(back, policy);
    }
}
