//! Authentication hint tokens.

use std::fmt;
use std::str::FromStr;

/// How a client is expected to authenticate to the endpoint.
///
/// Advisory only; the record does not carry credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AuthScheme {
    /// No authentication
    None,
    /// Personal access token
    Pat,
    /// Static API key
    Apikey,
    /// HTTP basic authentication
    Basic,
    /// OAuth 2.0 device authorization grant
    Oauth2Device,
    /// OAuth 2.0 authorization code grant
    Oauth2Code,
    /// Mutual TLS
    Mtls,
    /// Provider-specific scheme described in the docs
    Custom,
}

impl AuthScheme {
    /// Every auth token, in declaration order.
    pub const ALL: [Self; 8] = [
        Self::None,
        Self::Pat,
        Self::Apikey,
        Self::Basic,
        Self::Oauth2Device,
        Self::Oauth2Code,
        Self::Mtls,
        Self::Custom,
    ];

    /// Returns the wire token.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Pat => "pat",
            Self::Apikey => "apikey",
            Self::Basic => "basic",
            Self::Oauth2Device => "oauth2_device",
            Self::Oauth2Code => "oauth2_code",
            Self::Mtls => "mtls",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for AuthScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuthScheme {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|auth| auth.as_str() == s)
            .ok_or("unsupported auth token")
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for AuthScheme {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for AuthScheme {
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
        for auth in AuthScheme::ALL {
            assert_eq!(auth.as_str().parse::<AuthScheme>().unwrap(), auth);
        }
    }

    #[test]
    fn rejects_unknown_token() {
        assert!("oauth2".parse::<AuthScheme>().is_err());
        assert!("".parse::<AuthScheme>().is_err());
    }
}
