//! Deprecation timestamp (`dep`) field.

use std::fmt;

use chrono::{DateTime, Utc};

/// When a record stops being valid.
///
/// Keeps the published text alongside the parsed instant so diagnostics can
/// quote the timestamp exactly as the publisher wrote it.
///
/// # Examples
///
/// ```
/// use agent_aid::DeprecationDate;
///
/// let dep = DeprecationDate::parse("2026-01-01T00:00:00Z").unwrap();
/// assert_eq!(dep.as_str(), "2026-01-01T00:00:00Z");
/// assert!(DeprecationDate::parse("2026-01-01T00:00:00+01:00").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeprecationDate {
    text: String,
    instant: DateTime<Utc>,
}

impl DeprecationDate {
    /// Parses an ISO-8601 UTC timestamp with a literal `Z` suffix.
    ///
    /// # Errors
    ///
    /// Returns a reason string for offsets other than `Z`, local times, or
    /// anything that is not an RFC 3339 date-time.
    pub fn parse(input: &str) -> Result<Self, &'static str> {
        const REASON: &str = "dep MUST be an ISO 8601 UTC timestamp (e.g., 2026-01-01T00:00:00Z)";

        if !input.ends_with('Z') || !input.contains('T') {
            return Err(REASON);
        }
        let instant = DateTime::parse_from_rfc3339(input)
            .map_err(|_| REASON)?
            .with_timezone(&Utc);
        Ok(Self {
            text: input.to_string(),
            instant,
        })
    }

    /// Returns the timestamp as published.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Returns the parsed instant.
    #[must_use]
    pub const fn instant(&self) -> DateTime<Utc> {
        self.instant
    }

    /// Returns true if the record was deprecated strictly before `now`.
    #[must_use]
    pub fn is_past(&self, now: DateTime<Utc>) -> bool {
        self.instant < now
    }
}

impl fmt::Display for DeprecationDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
