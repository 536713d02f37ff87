//! The outcome of a successful discovery.

use std::fmt;

use agent_aid::{AidRecord, DNS_TTL_MAX, DNS_TTL_MIN};

/// Where a record was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordSource {
    /// A DNS TXT record.
    Dns,
    /// The `/.well-known/agent` document.
    WellKnown,
}

impl RecordSource {
    /// Returns a short label for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dns => "dns",
            Self::WellKnown => "well-known",
        }
    }
}

impl fmt::Display for RecordSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for RecordSource {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

/// A validated record together with where and how it was found.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DiscoveryResult {
    record: AidRecord,
    query_name: String,
    ttl: Option<u32>,
    source: RecordSource,
    raw: String,
}

impl DiscoveryResult {
    pub(crate) fn new(
        record: AidRecord,
        query_name: String,
        ttl: Option<u32>,
        source: RecordSource,
        raw: String,
    ) -> Self {
        Self {
            record,
            query_name,
            ttl,
            source,
            raw,
        }
    }

    /// Returns the validated record.
    #[must_use]
    pub const fn record(&self) -> &AidRecord {
        &self.record
    }

    /// Consumes the result, returning the record.
    #[must_use]
    pub fn into_record(self) -> AidRecord {
        self.record
    }

    /// Returns the DNS name queried, or the URL fetched for the well-known
    /// fallback.
    #[must_use]
    pub fn query_name(&self) -> &str {
        &self.query_name
    }

    /// Returns the TTL of the DNS answer. `None` for well-known results.
    #[must_use]
    pub const fn ttl(&self) -> Option<u32> {
        self.ttl
    }

    /// Returns true if the DNS TTL lies in the range publishers are advised
    /// to use (300 to 900 seconds). `None` when there is no TTL.
    #[must_use]
    pub fn ttl_within_advice(&self) -> Option<bool> {
        self.ttl
            .map(|ttl| (DNS_TTL_MIN..=DNS_TTL_MAX).contains(&ttl))
    }

    /// Returns where the record was found.
    #[must_use]
    pub const fn source(&self) -> RecordSource {
        self.source
    }

    /// Returns the text the record was parsed from.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }
}
