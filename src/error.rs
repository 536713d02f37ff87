//! Error taxonomy shared by every stage of discovery.

use std::fmt;

/// Closed set of AID error codes.
///
/// Each code has a stable string form (`ERR_...`) and a stable number, so
/// callers in other processes can match on either.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// No record was found at any stage.
    NoRecord,
    /// A record was found but is malformed or violates a field rule.
    InvalidTxt,
    /// A security policy rejected the record or its endpoint.
    Security,
    /// The DNS query failed for a network-related reason.
    DnsLookupFailed,
    /// The `.well-known` fallback failed or returned invalid data.
    FallbackFailed,
}

impl ErrorCode {
    /// Every code, in numeric order.
    pub const ALL: [Self; 5] = [
        Self::NoRecord,
        Self::InvalidTxt,
        Self::Security,
        Self::DnsLookupFailed,
        Self::FallbackFailed,
    ];

    /// Returns the stable string code, e.g. `ERR_INVALID_TXT`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NoRecord => "ERR_NO_RECORD",
            Self::InvalidTxt => "ERR_INVALID_TXT",
            Self::Security => "ERR_SECURITY",
            Self::DnsLookupFailed => "ERR_DNS_LOOKUP_FAILED",
            Self::FallbackFailed => "ERR_FALLBACK_FAILED",
        }
    }

    /// Returns the stable numeric code.
    #[must_use]
    pub const fn number(self) -> u16 {
        match self {
            Self::NoRecord => 1000,
            Self::InvalidTxt => 1001,
            Self::Security => 1003,
            Self::DnsLookupFailed => 1004,
            Self::FallbackFailed => 1005,
        }
    }

    /// Returns the generic description used when no specific message exists.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::NoRecord => "No _agent TXT record was found for the domain",
            Self::InvalidTxt => "A record was found but is malformed or missing required keys",
            Self::Security => "Discovery failed due to a security policy",
            Self::DnsLookupFailed => "The DNS query failed for a network-related reason",
            Self::FallbackFailed => "The .well-known fallback failed or returned invalid data",
        }
    }

    /// Looks up a code by its string form.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|code| code.as_str() == name)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An error produced by parsing, discovery, or policy enforcement.
///
/// # Examples
///
/// ```
/// use agent_aid::{parse, ErrorCode};
///
/// let err = parse("v=aid1;uri=https://a.example;u=https://a.example;p=mcp").unwrap_err();
/// assert_eq!(err.code(), ErrorCode::InvalidTxt);
/// assert_eq!(err.error_code(), "ERR_INVALID_TXT");
/// assert!(err.message().contains("Cannot specify both \"uri\" and \"u\""));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AidError {
    code: ErrorCode,
    message: String,
}

impl AidError {
    /// Creates an error with an explicit message.
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Creates an error carrying the code's generic description.
    #[must_use]
    pub fn from_code(code: ErrorCode) -> Self {
        Self::new(code, code.description())
    }

    /// Shorthand for an `ERR_INVALID_TXT` error.
    #[must_use]
    pub fn invalid_txt(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidTxt, message)
    }

    /// Shorthand for an `ERR_NO_RECORD` error.
    #[must_use]
    pub fn no_record(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NoRecord, message)
    }

    /// Shorthand for an `ERR_SECURITY` error.
    #[must_use]
    pub fn security(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Security, message)
    }

    /// Shorthand for an `ERR_DNS_LOOKUP_FAILED` error.
    #[must_use]
    pub fn dns_lookup_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DnsLookupFailed, message)
    }

    /// Shorthand for an `ERR_FALLBACK_FAILED` error.
    #[must_use]
    pub fn fallback_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::FallbackFailed, message)
    }

    /// Returns the error code.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        self.code
    }

    /// Returns the stable string code, e.g. `ERR_NO_RECORD`.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        self.code.as_str()
    }

    /// Returns the stable numeric code.
    #[must_use]
    pub const fn number(&self) -> u16 {
        self.code.number()
    }

    /// Returns the human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns true for the soft "nothing here" outcome that lets discovery
    /// continue with the next stage.
    #[must_use]
    pub fn is_no_record(&self) -> bool {
        self.code == ErrorCode::NoRecord
    }
}

impl fmt::Display for AidError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.code, self.code.number(), self.message)
    }
}

impl std::error::Error for AidError {}
