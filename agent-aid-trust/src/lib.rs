//! Endpoint trust checks for Agent Identity & Discovery (AID) records.
//!
//! Discovery says *where* an agent lives; these checks say how far that
//! answer can be trusted:
//!
//! - [`enforce_redirect_policy`] refuses endpoints that redirect to another
//!   origin
//! - [`inspect_tls`] reports the certificate the endpoint presents
//! - [`probe_dnssec_rrsig_txt`] asks a DoH resolver whether the TXT record
//!   is signed
//! - [`check_downgrade`] notices a key that disappeared or rotated since the
//!   last visit
//!
//! All of them are stateless and safe to run concurrently.
//!
//! # Example
//!
//! ```no_run
//! use agent_aid::AidRecord;
//! use agent_aid_trust::{
//!     DEFAULT_DOH_ENDPOINT, DEFAULT_DOH_TIMEOUT, DEFAULT_REDIRECT_TIMEOUT, DEFAULT_TLS_TIMEOUT,
//!     enforce_redirect_policy, inspect_tls, probe_dnssec_rrsig_txt,
//! };
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let record = AidRecord::parse("v=aid1;u=https://api.example.com/mcp;p=mcp")?;
//!
//! enforce_redirect_policy(record.uri(), DEFAULT_REDIRECT_TIMEOUT).await?;
//!
//! let tls = inspect_tls(record.uri(), DEFAULT_TLS_TIMEOUT).await?;
//! println!("{} expires in {} days", tls.host, tls.days_remaining);
//!
//! let dnssec =
//!     probe_dnssec_rrsig_txt("_agent.example.com", DEFAULT_DOH_ENDPOINT, DEFAULT_DOH_TIMEOUT)
//!         .await;
//! println!("signed: {}", dnssec.present);
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

mod dnssec;
mod downgrade;
mod error;
mod redirect;
mod tls;

pub use dnssec::{
    DEFAULT_DOH_ENDPOINT, DEFAULT_DOH_TIMEOUT, DnssecProbeResult, DohAnswer, DohResponse,
    RRSIG_TYPE, probe_dnssec_rrsig_txt, probe_dnssec_rrsig_txt_with,
};
pub use downgrade::{DowngradeReason, DowngradeStatus, KeyPin, check_downgrade};
pub use error::TlsInspectError;
pub use redirect::{
    DEFAULT_REDIRECT_TIMEOUT, REDIRECT_STATUSES, check_redirect, enforce_redirect_policy,
    enforce_redirect_policy_with, same_origin,
};
pub use tls::{
    DEFAULT_TLS_PORT, DEFAULT_TLS_TIMEOUT, TlsInspection, days_remaining, inspect_der, inspect_tls,
    split_san,
};
