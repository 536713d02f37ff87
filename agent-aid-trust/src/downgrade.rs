//! Detects a record that dropped or rotated its endpoint key since it was
//! last seen.
//!
//! Callers keep one [`KeyPin`] per domain wherever suits them and pass the
//! previous pin back in on the next check.

use std::fmt;

use agent_aid::AidRecord;
use serde::{Deserialize, Serialize};

/// The key material of a record, as last observed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyPin {
    /// Multibase public key, if the record had one
    pub pka: Option<String>,
    /// Key id, if the record had one
    pub kid: Option<String>,
}

impl KeyPin {
    /// Captures the pin of `record`.
    #[must_use]
    pub fn from_record(record: &AidRecord) -> Self {
        Self {
            pka: record.pka().map(|k| k.as_str().to_string()),
            kid: record.kid().map(|k| k.as_str().to_string()),
        }
    }
}

/// What changed for the worse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DowngradeReason {
    /// A key was pinned and the record no longer carries one
    PkaRemoved,
    /// The record carries a different key
    PkaChanged,
    /// The record carries a different key id
    KidChanged,
}

impl DowngradeReason {
    /// Short form, e.g. `pka removed`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PkaRemoved => "pka removed",
            Self::PkaChanged => "pka changed",
            Self::KidChanged => "kid changed",
        }
    }
}

impl fmt::Display for DowngradeReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Security downgrade detected: {}", self.as_str())
    }
}

/// Outcome of [`check_downgrade`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DowngradeStatus {
    /// No previous pin
    FirstSeen,
    /// Nothing weakened
    NoChange,
    /// Key material was removed or replaced
    Downgrade(DowngradeReason),
}

impl DowngradeStatus {
    /// Returns true for [`DowngradeStatus::Downgrade`].
    #[must_use]
    pub const fn is_downgrade(self) -> bool {
        matches!(self, Self::Downgrade(_))
    }
}

/// Compares `record` against the pin taken on a previous visit.
///
/// Gaining a key is not a downgrade, and neither is a kid appearing or
/// disappearing while the key itself is unchanged.
///
/// # Examples
///
/// ```
/// use agent_aid::AidRecord;
/// use agent_aid_trust::{DowngradeReason, DowngradeStatus, KeyPin, check_downgrade};
///
/// let pin = KeyPin {
///     pka: Some("z6MkPreviousKeyPreviousKeyPreviousKeyPrevious".to_string()),
///     kid: Some("g1".to_string()),
/// };
/// let record = AidRecord::parse("v=aid1;u=https://api.example.com/mcp;p=mcp").unwrap();
///
/// assert_eq!(check_downgrade(None, &record), DowngradeStatus::FirstSeen);
/// assert_eq!(
///     check_downgrade(Some(&pin), &record),
///     DowngradeStatus::Downgrade(DowngradeReason::PkaRemoved)
/// );
/// ```
#[must_use]
pub fn check_downgrade(previous: Option<&KeyPin>, record: &AidRecord) -> DowngradeStatus {
    let Some(previous) = previous else {
        return DowngradeStatus::FirstSeen;
    };
    let now = KeyPin::from_record(record);

    match (&previous.pka, &now.pka) {
        (Some(_), None) => return DowngradeStatus::Downgrade(DowngradeReason::PkaRemoved),
        (Some(before), Some(after)) if before != after => {
            return DowngradeStatus::Downgrade(DowngradeReason::PkaChanged);
        }
        _ => {}
    }
    match (&previous.kid, &now.kid) {
        (Some(before), Some(after)) if before != after => {
            DowngradeStatus::Downgrade(DowngradeReason::KidChanged)
        }
        _ => DowngradeStatus::NoChange,
    }
}
