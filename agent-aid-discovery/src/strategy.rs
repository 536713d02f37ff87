//! The ordered list of places a record is looked for.

use std::fmt;

use agent_aid::AidError;
use url::Url;

use crate::config::DiscoveryOptions;
use crate::query_name::Domain;

/// One step of the resolution plan.
///
/// Each stage either finds a record, misses (the plan continues), or fails
/// (the plan stops).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
    /// Query TXT records at a DNS name.
    Dns {
        /// Fully qualified query name
        query_name: String,
    },
    /// Fetch the well-known document.
    WellKnown {
        /// Document URL
        url: Url,
    },
}

impl Stage {
    /// Returns the DNS name or URL this stage looks at.
    #[must_use]
    pub fn target(&self) -> &str {
        match self {
            Self::Dns { query_name } => query_name,
            Self::WellKnown { url } => url.as_str(),
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dns { query_name } => write!(f, "dns {query_name}"),
            Self::WellKnown { url } => write!(f, "well-known {url}"),
        }
    }
}

/// Builds the resolution plan for a domain.
///
/// The order is fixed: the protocol-scoped name (when a protocol is given),
/// then the base name, then the well-known document (when enabled).
///
/// # Errors
///
/// Returns `ERR_FALLBACK_FAILED` if the well-known URL cannot be built.
///
/// # Examples
///
/// ```
/// use agent_aid::Protocol;
/// use agent_aid_discovery::{plan, DiscoveryOptions, Domain, Stage};
///
/// let domain = Domain::parse("example.com").unwrap();
/// let options = DiscoveryOptions::new()
///     .with_protocol(Protocol::Mcp)
///     .with_well_known_fallback(false);
///
/// let targets: Vec<String> = plan(&domain, &options)
///     .unwrap()
///     .iter()
///     .map(|stage| stage.target().to_string())
///     .collect();
/// assert_eq!(targets, ["_agent._mcp.example.com", "_agent.example.com"]);
/// ```
pub fn plan(domain: &Domain, options: &DiscoveryOptions) -> Result<Vec<Stage>, AidError> {
    let mut stages = Vec::with_capacity(3);
    if let Some(protocol) = options.protocol {
        stages.push(Stage::Dns {
            query_name: domain.protocol_query_name(protocol),
        });
    }
    stages.push(Stage::Dns {
        query_name: domain.base_query_name(),
    });
    if options.well_known_fallback {
        stages.push(Stage::WellKnown {
            url: domain.well_known_url(options.allow_insecure_well_known)?,
        });
    }
    Ok(stages)
}

#[cfg(test)]
mod tests {
    use agent_aid::Protocol;

    use super::*;

    fn targets(stages: &[Stage]) -> Vec<&str> {
        stages.iter().map(Stage::target).collect()
    }

    #[test]
    fn default_plan_is_base_then_well_known() {
        let domain = Domain::parse("example.com").unwrap();
        let stages = plan(&domain, &DiscoveryOptions::default()).unwrap();
        assert_eq!(
            targets(&stages),
            ["_agent.example.com", "https://example.com/.well-known/agent"]
        );
    }

    #[test]
    fn protocol_name_comes_first_and_bare_form_never_appears() {
        let domain = Domain::parse("example.com").unwrap();
        for protocol in Protocol::ALL {
            let options = DiscoveryOptions::new().with_protocol(protocol);
            let stages = plan(&domain, &options).unwrap();
            assert_eq!(stages[0].target(), format!("_agent._{protocol}.example.com"));
            assert_eq!(stages[1].target(), "_agent.example.com");
            let bare = format!("_agent.{protocol}.example.com");
            assert!(stages.iter().all(|s| s.target() != bare));
        }
    }

    #[test]
    fn fallback_disabled() {
        let domain = Domain::parse("example.com").unwrap();
        let options = DiscoveryOptions::new().with_well_known_fallback(false);
        let stages = plan(&domain, &options).unwrap();
        assert_eq!(stages.len(), 1);
        assert!(matches!(stages[0], Stage::Dns { .. }));
    }
}
