//! The discovery resolver.

use std::sync::Arc;
use std::time::Duration;

use agent_aid::{
    AidError, AidRecord, DNS_TTL_MAX, DNS_TTL_MIN, MAX_WELL_KNOWN_BYTES, SPEC_VERSION, parse,
    validate,
};
use chrono::Utc;
use tracing::debug;
use url::Url;

use crate::config::DiscoveryOptions;
use crate::diagnostics::{Diagnostic, DiagnosticSink, TracingSink};
use crate::dns::HickoryTxtResolver;
use crate::query_name::Domain;
use crate::result::{DiscoveryResult, RecordSource};
use crate::strategy::{Stage, plan};
use crate::traits::{LookupError, PkaHandshake, TxtResolver, WellKnownSource};
use crate::well_known::{HttpWellKnown, WellKnownDocument};

/// Resolves AID records for domains.
///
/// A resolver holds its collaborators and default options; it keeps no
/// state between calls, so one instance can serve concurrent discoveries.
///
/// # Examples
///
/// ```no_run
/// use agent_aid::Protocol;
/// use agent_aid_discovery::{DiscoveryOptions, Resolver};
///
/// # async fn run() -> Result<(), agent_aid::AidError> {
/// let resolver = Resolver::builder()
///     .options(DiscoveryOptions::from_env().with_protocol(Protocol::Mcp))
///     .build()?;
///
/// let result = resolver.discover("example.com").await?;
/// println!("{} via {}", result.record().uri(), result.query_name());
/// # Ok(())
/// # }
/// ```
pub struct Resolver {
    txt: Arc<dyn TxtResolver>,
    well_known: Arc<dyn WellKnownSource>,
    handshake: Option<Arc<dyn PkaHandshake>>,
    sink: Arc<dyn DiagnosticSink>,
    options: DiscoveryOptions,
}

/// Builder for [`Resolver`].
///
/// Unset collaborators default to the system DNS resolver, a
/// redirect-refusing HTTPS client and a [`TracingSink`]. No handshake
/// verifier is installed by default.
#[derive(Default)]
pub struct ResolverBuilder {
    txt: Option<Arc<dyn TxtResolver>>,
    well_known: Option<Arc<dyn WellKnownSource>>,
    handshake: Option<Arc<dyn PkaHandshake>>,
    sink: Option<Arc<dyn DiagnosticSink>>,
    options: DiscoveryOptions,
}

impl ResolverBuilder {
    /// Creates a builder with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the TXT resolver.
    #[must_use]
    pub fn txt_resolver(mut self, resolver: Arc<dyn TxtResolver>) -> Self {
        self.txt = Some(resolver);
        self
    }

    /// Sets the well-known document source.
    #[must_use]
    pub fn well_known_source(mut self, source: Arc<dyn WellKnownSource>) -> Self {
        self.well_known = Some(source);
        self
    }

    /// Sets the PKA handshake verifier.
    #[must_use]
    pub fn handshake(mut self, handshake: Arc<dyn PkaHandshake>) -> Self {
        self.handshake = Some(handshake);
        self
    }

    /// Sets where diagnostics go.
    #[must_use]
    pub fn diagnostic_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Sets the default options used by [`Resolver::discover`].
    #[must_use]
    pub fn options(mut self, options: DiscoveryOptions) -> Self {
        self.options = options;
        self
    }

    /// Builds the resolver.
    ///
    /// # Errors
    ///
    /// Returns `ERR_DNS_LOOKUP_FAILED` if no TXT resolver was set and the
    /// system resolver configuration cannot be read, or
    /// `ERR_FALLBACK_FAILED` if no well-known source was set and the HTTP
    /// client cannot be built.
    pub fn build(self) -> Result<Resolver, AidError> {
        let txt: Arc<dyn TxtResolver> = match self.txt {
            Some(txt) => txt,
            None => Arc::new(HickoryTxtResolver::from_system_conf()?),
        };
        let well_known: Arc<dyn WellKnownSource> = match self.well_known {
            Some(source) => source,
            None => Arc::new(HttpWellKnown::new()?),
        };
        Ok(Resolver {
            txt,
            well_known,
            handshake: self.handshake,
            sink: self.sink.unwrap_or_else(|| Arc::new(TracingSink)),
            options: self.options,
        })
    }
}

impl Resolver {
    /// Creates a resolver with default collaborators and options.
    ///
    /// # Errors
    ///
    /// See [`ResolverBuilder::build`].
    pub fn new() -> Result<Self, AidError> {
        ResolverBuilder::new().build()
    }

    /// Returns a builder.
    #[must_use]
    pub fn builder() -> ResolverBuilder {
        ResolverBuilder::new()
    }

    /// Returns the default options.
    #[must_use]
    pub const fn options(&self) -> &DiscoveryOptions {
        &self.options
    }

    /// Discovers the record for `domain` using the default options.
    ///
    /// # Errors
    ///
    /// See [`Resolver::discover_with`].
    pub async fn discover(&self, domain: &str) -> Result<DiscoveryResult, AidError> {
        self.discover_with(domain, &self.options).await
    }

    /// Discovers the record for `domain`.
    ///
    /// Stages run in the order given by [`plan`]. A stage that finds nothing
    /// lets the next one run; any other failure ends discovery.
    ///
    /// # Errors
    ///
    /// - `ERR_NO_RECORD` if no stage found a record
    /// - `ERR_INVALID_TXT` if the record is malformed or already deprecated
    /// - `ERR_DNS_LOOKUP_FAILED` if a DNS query failed or timed out, or the
    ///   domain is not a valid host name
    /// - `ERR_FALLBACK_FAILED` if the well-known fetch failed
    /// - whatever the handshake verifier returns
    pub async fn discover_with(
        &self,
        domain: &str,
        options: &DiscoveryOptions,
    ) -> Result<DiscoveryResult, AidError> {
        let domain = Domain::parse(domain)?;
        let stages = plan(&domain, options)?;

        for stage in &stages {
            debug!(domain = %domain, stage = %stage, "Trying discovery stage");
            let found = match stage {
                Stage::Dns { query_name } => self.query_dns(query_name, options.timeout).await?,
                Stage::WellKnown { url } => {
                    self.fetch_well_known(url, options.well_known_timeout)
                        .await?
                }
            };

            if let Some(result) = found {
                debug!(
                    query_name = %result.query_name(),
                    source = %result.source(),
                    "Found AID record"
                );
                self.check_deprecation(&result)?;
                self.run_handshake(result.record()).await?;
                return Ok(result);
            }
            debug!(stage = %stage, "No record at stage");
        }

        Err(AidError::no_record(format!(
            "No _agent record found for {domain}"
        )))
    }

    /// Returns true if discovery for `domain` succeeds.
    pub async fn has_record(&self, domain: &str) -> bool {
        self.discover(domain).await.is_ok()
    }

    async fn query_dns(
        &self,
        query_name: &str,
        timeout: Duration,
    ) -> Result<Option<DiscoveryResult>, AidError> {
        let answer = match tokio::time::timeout(timeout, self.txt.lookup_txt(query_name)).await {
            Err(_) => {
                return Err(AidError::dns_lookup_failed(format!(
                    "DNS query timeout for {query_name}"
                )));
            }
            Ok(Err(LookupError::NoRecords)) => return Ok(None),
            Ok(Err(LookupError::Failed { message })) => {
                return Err(AidError::dns_lookup_failed(format!(
                    "DNS query failed for {query_name}: {message}"
                )));
            }
            Ok(Ok(answer)) => answer,
        };

        let Some(text) = answer
            .records
            .iter()
            .map(|record| record.trim())
            .find(|text| looks_like_aid(text))
        else {
            debug!(
                query_name = %query_name,
                answers = answer.records.len(),
                "No TXT answer looks like an AID record"
            );
            return Ok(None);
        };

        let record = parse(text)?;
        let result = DiscoveryResult::new(
            record,
            query_name.to_string(),
            answer.ttl,
            RecordSource::Dns,
            text.to_string(),
        );
        if result.ttl_within_advice() == Some(false) {
            debug!(
                query_name = %query_name,
                ttl = ?answer.ttl,
                "TTL outside the advised {DNS_TTL_MIN}-{DNS_TTL_MAX}s range"
            );
        }
        Ok(Some(result))
    }

    async fn fetch_well_known(
        &self,
        url: &Url,
        timeout: Duration,
    ) -> Result<Option<DiscoveryResult>, AidError> {
        let response = match tokio::time::timeout(
            timeout,
            self.well_known.get(url, MAX_WELL_KNOWN_BYTES),
        )
        .await
        {
            Err(_) => {
                return Err(AidError::fallback_failed(format!(
                    "Well-known request timeout for {url}"
                )));
            }
            Ok(Err(message)) => {
                return Err(AidError::fallback_failed(format!(
                    "Well-known request failed for {url}: {message}"
                )));
            }
            Ok(Ok(response)) => response,
        };

        if url.scheme() == "http" {
            self.sink.emit(&Diagnostic::InsecureWellKnown {
                url: url.to_string(),
            });
        }

        let Some(document) = WellKnownDocument::from_response(&response)? else {
            return Ok(None);
        };
        let record = validate(document.raw)?;
        Ok(Some(DiscoveryResult::new(
            record,
            url.to_string(),
            None,
            RecordSource::WellKnown,
            document.text,
        )))
    }

    fn check_deprecation(&self, result: &DiscoveryResult) -> Result<(), AidError> {
        let Some(dep) = result.record().dep() else {
            return Ok(());
        };
        if dep.is_past(Utc::now()) {
            return Err(AidError::invalid_txt(format!(
                "Record for {} was deprecated on {dep}",
                result.query_name()
            )));
        }
        self.sink.emit(&Diagnostic::DeprecationScheduled {
            query_name: result.query_name().to_string(),
            dep: dep.to_string(),
        });
        Ok(())
    }

    async fn run_handshake(&self, record: &AidRecord) -> Result<(), AidError> {
        let Some((pka, kid)) = record.handshake_key() else {
            return Ok(());
        };
        match &self.handshake {
            Some(handshake) => {
                debug!(uri = %record.uri(), kid = %kid, "Running PKA handshake");
                handshake.verify(record.uri(), pka, kid).await
            }
            None => {
                self.sink.emit(&Diagnostic::HandshakeSkipped {
                    uri: record.uri().to_string(),
                });
                Ok(())
            }
        }
    }
}

/// Discovers the record for `domain` with a default resolver.
///
/// # Errors
///
/// See [`Resolver::discover_with`] and [`ResolverBuilder::build`].
pub async fn discover(
    domain: &str,
    options: DiscoveryOptions,
) -> Result<DiscoveryResult, AidError> {
    Resolver::builder()
        .options(options)
        .build()?
        .discover(domain)
        .await
}

fn looks_like_aid(text: &str) -> bool {
    let prefix = format!("v={SPEC_VERSION}");
    text.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(&prefix))
}
