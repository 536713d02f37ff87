//! The validated AID record.

use std::fmt;
use std::str::FromStr;

use crate::auth::AuthScheme;
use crate::constants::SPEC_VERSION;
use crate::error::AidError;
use crate::field::{KeyStyle, RecordField};
use crate::key::{KeyId, PublicKey};
use crate::protocol::Protocol;
use crate::timestamp::DeprecationDate;

/// A parsed and validated AID record.
///
/// Records are only produced by the parser, so every instance satisfies the
/// field rules: a supported version, a URI whose scheme matches the
/// protocol, and `kid` present whenever `pka` is.
///
/// # Examples
///
/// ```
/// use agent_aid::{AidRecord, Protocol};
///
/// let record = AidRecord::parse("v=aid1;u=https://api.example.com/mcp;p=mcp").unwrap();
/// assert_eq!(record.version(), "aid1");
/// assert_eq!(record.uri(), "https://api.example.com/mcp");
/// assert_eq!(record.proto(), Protocol::Mcp);
/// assert!(record.auth().is_none());
///
/// assert_eq!(
///     record.canonical(),
///     "v=aid1;uri=https://api.example.com/mcp;proto=mcp"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AidRecord {
    pub(crate) uri: String,
    pub(crate) proto: Protocol,
    pub(crate) auth: Option<AuthScheme>,
    pub(crate) desc: Option<String>,
    pub(crate) docs: Option<String>,
    pub(crate) dep: Option<DeprecationDate>,
    pub(crate) pka: Option<PublicKey>,
    pub(crate) kid: Option<KeyId>,
}

impl AidRecord {
    /// Parses and validates a TXT record string.
    ///
    /// # Errors
    ///
    /// Returns an `ERR_INVALID_TXT` error for any field violation.
    pub fn parse(input: &str) -> Result<Self, AidError> {
        crate::parser::parse(input)
    }

    /// Returns the record version (always `aid1`).
    #[must_use]
    pub const fn version(&self) -> &'static str {
        SPEC_VERSION
    }

    /// Returns the endpoint URI.
    #[must_use]
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Returns the protocol.
    #[must_use]
    pub const fn proto(&self) -> Protocol {
        self.proto
    }

    /// Returns the authentication hint, if present.
    #[must_use]
    pub const fn auth(&self) -> Option<AuthScheme> {
        self.auth
    }

    /// Returns the description, if present.
    #[must_use]
    pub fn desc(&self) -> Option<&str> {
        self.desc.as_deref()
    }

    /// Returns the documentation URL, if present.
    #[must_use]
    pub fn docs(&self) -> Option<&str> {
        self.docs.as_deref()
    }

    /// Returns the deprecation timestamp, if present.
    #[must_use]
    pub const fn dep(&self) -> Option<&DeprecationDate> {
        self.dep.as_ref()
    }

    /// Returns the published public key, if present.
    #[must_use]
    pub const fn pka(&self) -> Option<&PublicKey> {
        self.pka.as_ref()
    }

    /// Returns the key identifier, if present.
    #[must_use]
    pub const fn kid(&self) -> Option<&KeyId> {
        self.kid.as_ref()
    }

    /// Returns the key pair when the record asks for a PKA handshake.
    #[must_use]
    pub fn handshake_key(&self) -> Option<(&PublicKey, &KeyId)> {
        self.pka.as_ref().zip(self.kid.as_ref())
    }

    /// Returns the value of a field in its wire form.
    #[must_use]
    pub fn field(&self, field: RecordField) -> Option<String> {
        match field {
            RecordField::Version => Some(SPEC_VERSION.to_string()),
            RecordField::Uri => Some(self.uri.clone()),
            RecordField::Proto => Some(self.proto.to_string()),
            RecordField::Auth => self.auth.map(|a| a.to_string()),
            RecordField::Desc => self.desc.clone(),
            RecordField::Docs => self.docs.clone(),
            RecordField::Dep => self.dep.as_ref().map(ToString::to_string),
            RecordField::Pka => self.pka.as_ref().map(ToString::to_string),
            RecordField::Kid => self.kid.as_ref().map(ToString::to_string),
        }
    }

    /// Serializes the record as a TXT string in canonical field order.
    ///
    /// Parsing the output of either style yields an equal record.
    #[must_use]
    pub fn to_txt(&self, style: KeyStyle) -> String {
        RecordField::ALL
            .into_iter()
            .filter_map(|field| {
                self.field(field)
                    .map(|value| format!("{}={value}", field.key(style)))
            })
            .collect::<Vec<_>>()
            .join(";")
    }

    /// Returns the byte-stable canonical form: full key names in canonical
    /// order, independent of how the record was written.
    #[must_use]
    pub fn canonical(&self) -> String {
        self.to_txt(KeyStyle::Full)
    }
}

/// Parses a TXT string and returns its canonical form.
///
/// Two strings that describe the same record (different key order, aliases,
/// surrounding whitespace, unknown keys) canonicalize to the same bytes.
///
/// # Errors
///
/// Returns an `ERR_INVALID_TXT` error if the input is not a valid record.
///
/// # Examples
///
/// ```
/// use agent_aid::canonicalize_raw;
///
/// let a = canonicalize_raw("v=aid1; p=mcp ; u=https://api.example.com/mcp").unwrap();
/// let b = canonicalize_raw("v=aid1;uri=https://api.example.com/mcp;proto=mcp;x=1").unwrap();
/// assert_eq!(a, b);
/// ```
pub fn canonicalize_raw(input: &str) -> Result<String, AidError> {
    crate::parser::parse(input).map(|record| record.canonical())
}

impl fmt::Display for AidRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical())
    }
}

impl FromStr for AidRecord {
    type Err = AidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for AidRecord {
    type Error = AidError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for AidRecord {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;

        let fields: Vec<(RecordField, String)> = RecordField::ALL
            .into_iter()
            .filter_map(|field| self.field(field).map(|value| (field, value)))
            .collect();
        let mut map = serializer.serialize_map(Some(fields.len()))?;
        for (field, value) in &fields {
            map.serialize_entry(field.name(), value)?;
        }
        map.end()
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for AidRecord {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let map = std::collections::BTreeMap::<String, String>::deserialize(deserializer)?;
        let mut raw = crate::raw::RawRecord::new();
        for (key, value) in &map {
            raw.insert(key, value).map_err(serde::de::Error::custom)?;
        }
        crate::parser::validate(raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = "v=aid1;uri=https://api.example.com/mcp;proto=mcp;auth=pat;desc=Example agent;docs=https://docs.example.com/agent;dep=2030-01-01T00:00:00Z;pka=z4wBqpZM9xaSheZzJSMawUKKwhdpChKbZ5eu5ky4Vigw;kid=g1";

    #[test]
    fn canonical_is_identity_for_canonical_input() {
        let record = AidRecord::parse(FULL).unwrap();
        assert_eq!(record.canonical(), FULL);
        assert_eq!(record.to_string(), FULL);
    }

    #[test]
    fn alias_serialization() {
        let record = AidRecord::parse(FULL).unwrap();
        let aliased = record.to_txt(KeyStyle::Alias);
        assert!(aliased.starts_with("v=aid1;u=https://api.example.com/mcp;p=mcp;a=pat;"));
        assert!(aliased.ends_with(";i=g1"));
        assert_eq!(AidRecord::parse(&aliased).unwrap(), record);
    }

    #[test]
    fn canonicalize_ignores_order_and_aliases() {
        let shuffled = "v=aid1;i=g1;k=z4wBqpZM9xaSheZzJSMawUKKwhdpChKbZ5eu5ky4Vigw;e=2030-01-01T00:00:00Z;d=https://docs.example.com/agent;s=Example agent;a=pat;p=mcp;u=https://api.example.com/mcp";
        assert_eq!(canonicalize_raw(shuffled).unwrap(), FULL);
    }

    #[test]
    fn handshake_key_requires_both() {
        let record = AidRecord::parse(FULL).unwrap();
        let (pka, kid) = record.handshake_key().unwrap();
        assert_eq!(kid.as_str(), "g1");
        assert_eq!(pka.bytes().len(), 32);

        let kid_only = AidRecord::parse("v=aid1;u=https://a.example.com;p=mcp;i=g2").unwrap();
        assert!(kid_only.handshake_key().is_none());
    }

    #[test]
    fn from_str_and_try_from() {
        let a: AidRecord = "v=aid1;u=https://a.example.com;p=a2a".parse().unwrap();
        let b = AidRecord::try_from("v=aid1;uri=https://a.example.com;proto=a2a").unwrap();
        assert_eq!(a, b);
    }
}
