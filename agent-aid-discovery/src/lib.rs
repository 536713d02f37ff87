//! DNS-first discovery of Agent Identity & Discovery (AID) records.
//!
//! Given a domain, the [`Resolver`] looks for a record in a fixed order:
//!
//! 1. `_agent._{protocol}.{domain}` TXT, when a protocol hint is given
//! 2. `_agent.{domain}` TXT
//! 3. `https://{domain}/.well-known/agent`, when the fallback is enabled
//!
//! "Nothing here" at one stage moves on to the next. Anything else (a
//! malformed record, a DNS transport failure, a broken well-known
//! response) stops discovery with a typed [`AidError`].
//!
//! A record whose `dep` timestamp has passed is rejected; one deprecated in
//! the future is returned along with a [`Diagnostic`]. Records that publish
//! `pka` and `kid` are handed to the configured [`PkaHandshake`] once before
//! the result is returned.
//!
//! # Quick Start
//!
//! ```no_run
//! use agent_aid_discovery::{discover, DiscoveryOptions};
//!
//! # async fn run() -> Result<(), agent_aid::AidError> {
//! let result = discover("example.com", DiscoveryOptions::default()).await?;
//! println!("{} speaks {}", result.record().uri(), result.record().proto());
//! # Ok(())
//! # }
//! ```
//!
//! # Testing Without a Network
//!
//! Every collaborator sits behind a trait, so a resolver can be assembled
//! from in-memory parts:
//!
//! ```
//! use std::sync::Arc;
//! use async_trait::async_trait;
//! use agent_aid_discovery::{LookupError, Resolver, TxtAnswer, TxtResolver, WellKnownSource, HttpResponse};
//!
//! struct StaticDns;
//!
//! #[async_trait]
//! impl TxtResolver for StaticDns {
//!     async fn lookup_txt(&self, name: &str) -> Result<TxtAnswer, LookupError> {
//!         match name {
//!             "_agent.example.com" => Ok(TxtAnswer::new(
//!                 vec!["v=aid1;u=https://api.example.com/mcp;p=mcp".into()],
//!                 Some(300),
//!             )),
//!             _ => Err(LookupError::NoRecords),
//!         }
//!     }
//! }
//!
//! struct NoWellKnown;
//!
//! #[async_trait]
//! impl WellKnownSource for NoWellKnown {
//!     async fn get(&self, _url: &url::Url, _max: usize) -> Result<HttpResponse, String> {
//!         Ok(HttpResponse { status: 404, ..HttpResponse::default() })
//!     }
//! }
//!
//! # block_on(async {
//! let resolver = Resolver::builder()
//!     .txt_resolver(Arc::new(StaticDns))
//!     .well_known_source(Arc::new(NoWellKnown))
//!     .build()
//!     .unwrap();
//!
//! let result = resolver.discover("example.com").await.unwrap();
//! assert_eq!(result.query_name(), "_agent.example.com");
//! assert_eq!(result.ttl(), Some(300));
//! # });
//! # fn block_on<F: std::future::Future>(f: F) {
//! #     tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(f);
//! # }
//! ```

#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

mod config;
mod diagnostics;
mod dns;
mod query_name;
mod resolver;
mod result;
mod strategy;
mod traits;
mod well_known;

pub use config::{DiscoveryOptions, INSECURE_WELL_KNOWN_ENV};
pub use diagnostics::{Diagnostic, DiagnosticSink, MemorySink, TracingSink};
pub use dns::HickoryTxtResolver;
pub use query_name::Domain;
pub use resolver::{Resolver, ResolverBuilder, discover};
pub use result::{DiscoveryResult, RecordSource};
pub use strategy::{Stage, plan};
pub use traits::{HttpResponse, LookupError, PkaHandshake, TxtAnswer, TxtResolver, WellKnownSource};
pub use well_known::{HttpWellKnown, WellKnownDocument};
