//! TXT lookups through `hickory-resolver`.

use agent_aid::AidError;
use async_trait::async_trait;
use hickory_resolver::Resolver;
use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::name_server::TokioConnectionProvider;
use hickory_resolver::proto::rr::Record;
use tracing::debug;

use crate::traits::{LookupError, TxtAnswer, TxtResolver};

/// [`TxtResolver`] backed by a hickory stub resolver.
///
/// The resolver runs one attempt per query and keeps no answer cache, so
/// every discovery sees the current zone contents.
pub struct HickoryTxtResolver {
    resolver: Resolver<TokioConnectionProvider>,
}

impl HickoryTxtResolver {
    /// Creates a resolver from the system configuration (`/etc/resolv.conf`
    /// or the platform equivalent).
    ///
    /// # Errors
    ///
    /// Returns `ERR_DNS_LOOKUP_FAILED` if the system configuration cannot be
    /// read.
    pub fn from_system_conf() -> Result<Self, AidError> {
        let builder = Resolver::builder_tokio().map_err(|e| {
            AidError::dns_lookup_failed(format!("Failed to read system resolver configuration: {e}"))
        })?;
        let resolver = builder.with_options(Self::options()).build();
        debug!("Created TXT resolver from system configuration");
        Ok(Self { resolver })
    }

    /// Creates a resolver with explicit upstream configuration.
    #[must_use]
    pub fn with_config(config: ResolverConfig) -> Self {
        let resolver = Resolver::builder_with_config(config, TokioConnectionProvider::default())
            .with_options(Self::options())
            .build();
        Self { resolver }
    }

    fn options() -> ResolverOpts {
        let mut opts = ResolverOpts::default();
        opts.attempts = 1;
        opts.cache_size = 0;
        opts
    }
}

#[async_trait]
impl TxtResolver for HickoryTxtResolver {
    async fn lookup_txt(&self, name: &str) -> Result<TxtAnswer, LookupError> {
        match self.resolver.txt_lookup(name).await {
            Ok(lookup) => {
                let ttl = lookup.as_lookup().records().iter().map(Record::ttl).min();
                let records: Vec<String> = lookup
                    .iter()
                    .map(|txt| {
                        txt.txt_data()
                            .iter()
                            .map(|chunk| String::from_utf8_lossy(chunk))
                            .collect()
                    })
                    .collect();
                if records.is_empty() {
                    Err(LookupError::NoRecords)
                } else {
                    Ok(TxtAnswer::new(records, ttl))
                }
            }
            Err(e) if e.is_no_records_found() || e.is_nx_domain() => Err(LookupError::NoRecords),
            Err(e) => Err(LookupError::Failed {
                message: e.to_string(),
            }),
        }
    }
}
