//! Seams between the resolver and the outside world.
//!
//! The resolver only talks to DNS, HTTP and the handshake verifier through
//! these traits, so each can be swapped for an in-memory implementation in
//! tests.

use std::fmt;

use agent_aid::{AidError, KeyId, PublicKey};
use async_trait::async_trait;
use url::Url;

/// TXT answers for one query name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TxtAnswer {
    /// Each TXT record with its character-strings concatenated.
    pub records: Vec<String>,
    /// Smallest TTL among the answers, in seconds.
    pub ttl: Option<u32>,
}

impl TxtAnswer {
    /// Creates an answer from record texts and a TTL.
    #[must_use]
    pub fn new(records: Vec<String>, ttl: Option<u32>) -> Self {
        Self { records, ttl }
    }
}

/// Why a TXT lookup produced no answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// NXDOMAIN or an empty answer section.
    NoRecords,
    /// The query could not be completed.
    Failed {
        /// Transport error detail
        message: String,
    },
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoRecords => write!(f, "no TXT records"),
            Self::Failed { message } => write!(f, "lookup failed: {message}"),
        }
    }
}

impl std::error::Error for LookupError {}

/// Resolves DNS TXT records.
///
/// Implementations must not retry; the resolver enforces the deadline.
#[async_trait]
pub trait TxtResolver: Send + Sync {
    /// Looks up the TXT records at `name`.
    ///
    /// # Errors
    ///
    /// Returns `LookupError::NoRecords` for NXDOMAIN or an empty answer, and
    /// `LookupError::Failed` for anything else.
    async fn lookup_txt(&self, name: &str) -> Result<TxtAnswer, LookupError>;
}

/// Minimal view of an HTTP response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpResponse {
    /// Status code.
    pub status: u16,
    /// `Content-Type` header value, if any.
    pub content_type: Option<String>,
    /// Response body, possibly cut off just past the size limit.
    pub body: Vec<u8>,
}

/// Fetches the well-known document.
#[async_trait]
pub trait WellKnownSource: Send + Sync {
    /// Performs a GET of `url` without following redirects.
    ///
    /// Implementations may stop reading the body once it exceeds
    /// `max_body` bytes, as long as they return more than `max_body` bytes
    /// in that case.
    ///
    /// # Errors
    ///
    /// Returns a transport error message if no response was received.
    async fn get(&self, url: &Url, max_body: usize) -> Result<HttpResponse, String>;
}

/// Verifies that an endpoint controls the key its record publishes.
///
/// Invoked once per successful discovery of a record that carries both
/// `pka` and `kid`.
#[async_trait]
pub trait PkaHandshake: Send + Sync {
    /// Runs the handshake against `uri`.
    ///
    /// # Errors
    ///
    /// Returns the error that should abort discovery, normally
    /// `ERR_SECURITY`.
    async fn verify(&self, uri: &str, pka: &PublicKey, kid: &KeyId) -> Result<(), AidError>;
}
