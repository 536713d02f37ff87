//! Domain normalization and the names discovery queries.

use std::fmt;

use agent_aid::{AidError, DNS_SUBDOMAIN, Protocol, WELL_KNOWN_PATH};
use url::Url;

/// A domain name ready to be queried.
///
/// Parsing trims whitespace, drops a trailing root dot, converts
/// internationalized names to their ASCII form and lowercases the result.
/// An explicit port is kept for the well-known URL only.
///
/// # Examples
///
/// ```
/// use agent_aid_discovery::Domain;
///
/// let domain = Domain::parse(" Example.COM. ").unwrap();
/// assert_eq!(domain.host(), "example.com");
///
/// let domain = Domain::parse("bücher.example").unwrap();
/// assert_eq!(domain.host(), "xn--bcher-kva.example");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Domain {
    host: String,
    port: Option<u16>,
}

impl Domain {
    /// Normalizes a user-supplied domain.
    ///
    /// # Errors
    ///
    /// Returns `ERR_DNS_LOOKUP_FAILED` if the input is empty or is not a
    /// bare host name (optionally with a port).
    pub fn parse(input: &str) -> Result<Self, AidError> {
        let invalid = || AidError::dns_lookup_failed(format!("Invalid domain: {input}"));

        let trimmed = input.trim();
        if trimmed.is_empty() || trimmed.contains(['/', '@', '?', '#', ' ']) {
            return Err(invalid());
        }
        let url = Url::parse(&format!("https://{trimmed}/")).map_err(|_| invalid())?;
        let host = url
            .host_str()
            .map(|h| h.trim_end_matches('.'))
            .filter(|h| !h.is_empty())
            .ok_or_else(invalid)?;

        Ok(Self {
            host: host.to_string(),
            port: url.port(),
        })
    }

    /// Returns the normalized host name.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the explicit port, if one was given.
    #[must_use]
    pub const fn port(&self) -> Option<u16> {
        self.port
    }

    /// Returns `host[:port]` for building URLs.
    #[must_use]
    pub fn authority(&self) -> String {
        match self.port {
            Some(port) => format!("{}:{port}", self.host),
            None => self.host.clone(),
        }
    }

    /// Returns the base query name `_agent.{domain}`.
    #[must_use]
    pub fn base_query_name(&self) -> String {
        format!("{DNS_SUBDOMAIN}.{}", self.host)
    }

    /// Returns the protocol-scoped query name `_agent._{protocol}.{domain}`.
    #[must_use]
    pub fn protocol_query_name(&self, protocol: Protocol) -> String {
        format!("{DNS_SUBDOMAIN}._{protocol}.{}", self.host)
    }

    /// Returns the URL of the well-known fallback document.
    ///
    /// # Errors
    ///
    /// Returns `ERR_FALLBACK_FAILED` if the URL cannot be built.
    pub fn well_known_url(&self, insecure: bool) -> Result<Url, AidError> {
        let scheme = if insecure { "http" } else { "https" };
        let text = format!("{scheme}://{}{WELL_KNOWN_PATH}", self.authority());
        Url::parse(&text)
            .map_err(|e| AidError::fallback_failed(format!("Invalid well-known URL {text}: {e}")))
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.host)
    }
}
