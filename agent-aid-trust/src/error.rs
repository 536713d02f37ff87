//! Errors from the TLS inspector.

use std::fmt;

/// Why a TLS inspection failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TlsInspectError {
    /// The URI has no host or cannot be parsed.
    InvalidUri {
        /// The URI as given
        uri: String,
        /// What is wrong with it
        reason: String,
    },
    /// Connect plus handshake did not finish within the deadline.
    Timeout {
        /// Host being inspected
        host: String,
        /// Deadline in milliseconds
        timeout_ms: u128,
    },
    /// The TCP connection could not be opened.
    Connect {
        /// Host being inspected
        host: String,
        /// I/O error detail
        message: String,
    },
    /// The TLS handshake failed, including certificate validation.
    Handshake {
        /// Host being inspected
        host: String,
        /// TLS error detail
        message: String,
    },
    /// The peer certificate could not be read.
    Certificate {
        /// Host being inspected
        host: String,
        /// Parse error detail
        message: String,
    },
}

impl TlsInspectError {
    /// Returns true for a deadline expiry.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

impl fmt::Display for TlsInspectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidUri { uri, reason } => {
                write!(f, "cannot inspect '{uri}': {reason}")
            }
            Self::Timeout { host, timeout_ms } => {
                write!(f, "TLS timeout after {timeout_ms}ms connecting to {host}")
            }
            Self::Connect { host, message } => {
                write!(f, "failed to connect to {host}: {message}")
            }
            Self::Handshake { host, message } => {
                write!(f, "TLS handshake with {host} failed: {message}")
            }
            Self::Certificate { host, message } => {
                write!(f, "unreadable certificate from {host}: {message}")
            }
        }
    }
}

impl std::error::Error for TlsInspectError {}
