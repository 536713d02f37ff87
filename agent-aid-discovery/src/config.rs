//! Configuration for a discovery run.

use std::time::Duration;

use agent_aid::Protocol;

/// Environment variable that switches the well-known fallback to plain HTTP.
pub const INSECURE_WELL_KNOWN_ENV: &str = "AID_ALLOW_INSECURE_WELL_KNOWN";

/// Options controlling a single `discover` call.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use agent_aid::Protocol;
/// use agent_aid_discovery::DiscoveryOptions;
///
/// let options = DiscoveryOptions::new()
///     .with_protocol(Protocol::Mcp)
///     .with_timeout(Duration::from_secs(2))
///     .with_well_known_fallback(false);
///
/// assert_eq!(options.protocol, Some(Protocol::Mcp));
/// assert!(!options.well_known_fallback);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryOptions {
    /// Protocol hint; adds the `_agent._{protocol}.{domain}` query first.
    ///
    /// Default: None
    pub protocol: Option<Protocol>,

    /// Deadline for each DNS query.
    ///
    /// Default: 5 seconds
    pub timeout: Duration,

    /// Whether to fetch `/.well-known/agent` when DNS has no record.
    ///
    /// Default: true
    pub well_known_fallback: bool,

    /// Deadline for the well-known request.
    ///
    /// Default: 2 seconds
    pub well_known_timeout: Duration,

    /// Fetch the well-known document over `http://` instead of `https://`.
    ///
    /// Intended for local development only.
    /// Default: false
    pub allow_insecure_well_known: bool,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self {
            protocol: None,
            timeout: Duration::from_millis(5000),
            well_known_fallback: true,
            well_known_timeout: Duration::from_millis(2000),
            allow_insecure_well_known: false,
        }
    }
}

impl DiscoveryOptions {
    /// Creates options with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates default options, enabling insecure well-known fetches when
    /// `AID_ALLOW_INSECURE_WELL_KNOWN=1` is set.
    #[must_use]
    pub fn from_env() -> Self {
        let insecure = std::env::var(INSECURE_WELL_KNOWN_ENV).is_ok_and(|v| v.trim() == "1");
        Self::default().with_allow_insecure_well_known(insecure)
    }

    /// Sets the protocol hint.
    #[must_use]
    pub const fn with_protocol(mut self, protocol: Protocol) -> Self {
        self.protocol = Some(protocol);
        self
    }

    /// Sets the per-query DNS timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Enables or disables the well-known fallback.
    #[must_use]
    pub const fn with_well_known_fallback(mut self, enabled: bool) -> Self {
        self.well_known_fallback = enabled;
        self
    }

    /// Sets the well-known request timeout.
    #[must_use]
    pub const fn with_well_known_timeout(mut self, timeout: Duration) -> Self {
        self.well_known_timeout = timeout;
        self
    }

    /// Allows or forbids plain HTTP for the well-known fallback.
    #[must_use]
    pub const fn with_allow_insecure_well_known(mut self, allow: bool) -> Self {
        self.allow_insecure_well_known = allow;
        self
    }
}
