//! Protocol tokens and the URI scheme each one requires.

use std::fmt;
use std::str::FromStr;

use crate::constants::LOCAL_URI_SCHEMES;

/// Protocol an agent endpoint speaks.
///
/// The vocabulary is closed: unknown tokens are rejected rather than passed
/// through, so a client never dials an endpoint it cannot understand.
///
/// # Examples
///
/// ```
/// use agent_aid::Protocol;
///
/// let proto: Protocol = "websocket".parse().unwrap();
/// assert_eq!(proto, Protocol::Websocket);
/// assert!("smtp".parse::<Protocol>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Protocol {
    /// Model Context Protocol
    Mcp,
    /// Agent-to-Agent protocol
    A2a,
    /// Universal Commerce Protocol
    Ucp,
    /// OpenAPI described HTTP service
    Openapi,
    /// gRPC over HTTP/2
    Grpc,
    /// GraphQL over HTTP
    Graphql,
    /// Secure WebSocket
    Websocket,
    /// Locally executed agent (package runner URI)
    Local,
    /// Zero-configuration network service
    Zeroconf,
}

/// URI scheme constraint attached to a protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemeRule {
    /// Absolute `https://` URL with a host.
    Https,
    /// Absolute `wss://` URL with a host.
    Wss,
    /// A `zeroconf:` URI.
    Zeroconf,
    /// One of the local package-runner schemes (`docker:`, `npx:`, `pip:`).
    Local,
}

impl SchemeRule {
    /// Returns the scheme name used in error messages.
    #[must_use]
    pub const fn required(self) -> &'static str {
        match self {
            Self::Https => "https:",
            Self::Wss => "wss:",
            Self::Zeroconf => "zeroconf:",
            Self::Local => "docker:, npx:, pip:",
        }
    }

    /// Returns true if `uri` uses an accepted scheme.
    ///
    /// This only checks the scheme; structural URL checks happen in the
    /// parser.
    #[must_use]
    pub fn accepts(self, uri: &str) -> bool {
        match self {
            Self::Https => uri.starts_with("https://"),
            Self::Wss => uri.starts_with("wss://"),
            Self::Zeroconf => uri.starts_with("zeroconf:"),
            Self::Local => uri
                .split_once(':')
                .is_some_and(|(scheme, rest)| LOCAL_URI_SCHEMES.contains(&scheme) && !rest.is_empty()),
        }
    }
}

impl Protocol {
    /// Every protocol token, in declaration order.
    pub const ALL: [Self; 9] = [
        Self::Mcp,
        Self::A2a,
        Self::Ucp,
        Self::Openapi,
        Self::Grpc,
        Self::Graphql,
        Self::Websocket,
        Self::Local,
        Self::Zeroconf,
    ];

    /// Returns the wire token.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mcp => "mcp",
            Self::A2a => "a2a",
            Self::Ucp => "ucp",
            Self::Openapi => "openapi",
            Self::Grpc => "grpc",
            Self::Graphql => "graphql",
            Self::Websocket => "websocket",
            Self::Local => "local",
            Self::Zeroconf => "zeroconf",
        }
    }

    /// Returns the scheme rule the record's `uri` must satisfy.
    #[must_use]
    pub const fn scheme_rule(self) -> SchemeRule {
        match self {
            Self::Websocket => SchemeRule::Wss,
            Self::Zeroconf => SchemeRule::Zeroconf,
            Self::Local => SchemeRule::Local,
            Self::Mcp | Self::A2a | Self::Ucp | Self::Openapi | Self::Grpc | Self::Graphql => {
                SchemeRule::Https
            }
        }
    }

    /// Returns true if the endpoint is reached over the network.
    #[must_use]
    pub const fn is_remote(self) -> bool {
        !matches!(self, Self::Local)
    }
}

/// Returns true if `token` is a recognized protocol token.
#[must_use]
pub fn is_valid_proto(token: &str) -> bool {
    token.parse::<Protocol>().is_ok()
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Protocol {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|proto| proto.as_str() == s)
            .ok_or("unsupported protocol token")
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Protocol {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Protocol {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_all_tokens() {
        for proto in Protocol::ALL {
            assert_eq!(proto.as_str().parse::<Protocol>().unwrap(), proto);
        }
    }

    #[test]
    fn tokens_are_case_sensitive() {
        assert!("MCP".parse::<Protocol>().is_err());
        assert!(!is_valid_proto("Mcp"));
        assert!(is_valid_proto("mcp"));
    }

    #[test]
    fn scheme_rules() {
        assert_eq!(Protocol::Websocket.scheme_rule(), SchemeRule::Wss);
        assert_eq!(Protocol::Zeroconf.scheme_rule(), SchemeRule::Zeroconf);
        assert_eq!(Protocol::Local.scheme_rule(), SchemeRule::Local);
        assert_eq!(Protocol::Graphql.scheme_rule(), SchemeRule::Https);
        assert!(!Protocol::Local.is_remote());
    }

    #[test]
    fn local_rule_needs_known_scheme_and_target() {
        assert!(SchemeRule::Local.accepts("docker:ghcr.io/acme/agent:1.0"));
        assert!(SchemeRule::Local.accepts("npx:@acme/agent"));
        assert!(!SchemeRule::Local.accepts("docker:"));
        assert!(!SchemeRule::Local.accepts("brew:agent"));
        assert!(!SchemeRule::Local.accepts("agent"));
    }

    #[test]
    fn https_rule_rejects_plain_http() {
        assert!(SchemeRule::Https.accepts("https://api.example.com"));
        assert!(!SchemeRule::Https.accepts("http://api.example.com"));
        assert!(!SchemeRule::Wss.accepts("ws://ws.example.com"));
    }
}
