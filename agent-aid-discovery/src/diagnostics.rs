//! Non-fatal findings reported during discovery.

use std::fmt;
use std::sync::{Mutex, PoisonError};

use tracing::warn;

/// A warning raised while resolving a record.
///
/// Diagnostics never change the discovery result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// The record carries a `dep` timestamp in the future.
    DeprecationScheduled {
        /// Query name or URL the record came from
        query_name: String,
        /// The `dep` value as published
        dep: String,
    },
    /// The record publishes a key but no handshake verifier is configured.
    HandshakeSkipped {
        /// Endpoint URI that was not verified
        uri: String,
    },
    /// The well-known document was fetched over plain HTTP.
    InsecureWellKnown {
        /// URL that was fetched
        url: String,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DeprecationScheduled { query_name, dep } => {
                write!(
                    f,
                    "Record for {query_name} is scheduled for deprecation on {dep}"
                )
            }
            Self::HandshakeSkipped { uri } => {
                write!(
                    f,
                    "Record for {uri} publishes a key but no handshake verifier is configured"
                )
            }
            Self::InsecureWellKnown { url } => {
                write!(f, "Fetched well-known document over insecure HTTP: {url}")
            }
        }
    }
}

/// Receives diagnostics from the resolver.
pub trait DiagnosticSink: Send + Sync {
    /// Handles one diagnostic.
    fn emit(&self, diagnostic: &Diagnostic);
}

/// Sink that logs each diagnostic at `WARN` level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&self, diagnostic: &Diagnostic) {
        match diagnostic {
            Diagnostic::DeprecationScheduled { query_name, dep } => {
                warn!(query_name = %query_name, dep = %dep, "{diagnostic}");
            }
            Diagnostic::HandshakeSkipped { uri } => {
                warn!(uri = %uri, "{diagnostic}");
            }
            Diagnostic::InsecureWellKnown { url } => {
                warn!(url = %url, "{diagnostic}");
            }
        }
    }
}

/// Sink that keeps diagnostics in memory.
///
/// # Examples
///
/// ```
/// use agent_aid_discovery::{Diagnostic, DiagnosticSink, MemorySink};
///
/// let sink = MemorySink::new();
/// sink.emit(&Diagnostic::HandshakeSkipped { uri: "https://a.example".into() });
/// assert_eq!(sink.diagnostics().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct MemorySink {
    diagnostics: Mutex<Vec<Diagnostic>>,
}

impl MemorySink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of everything emitted so far.
    #[must_use]
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Removes and returns everything emitted so far.
    #[must_use]
    pub fn take(&self) -> Vec<Diagnostic> {
        std::mem::take(
            &mut *self
                .diagnostics
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        )
    }
}

impl DiagnosticSink for MemorySink {
    fn emit(&self, diagnostic: &Diagnostic) {
        self.diagnostics
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(diagnostic.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deprecation_message_names_query_and_date() {
        let diagnostic = Diagnostic::DeprecationScheduled {
            query_name: "_agent.example.com".to_string(),
            dep: "2099-01-01T00:00:00Z".to_string(),
        };
        assert_eq!(
            diagnostic.to_string(),
            "Record for _agent.example.com is scheduled for deprecation on 2099-01-01T00:00:00Z"
        );
    }

    #[test]
    fn memory_sink_take_drains() {
        let sink = MemorySink::new();
        sink.emit(&Diagnostic::InsecureWellKnown {
            url: "http://localhost/.well-known/agent".to_string(),
        });
        assert_eq!(sink.take().len(), 1);
        assert!(sink.diagnostics().is_empty());
    }
}
