//! Parser and validator for Agent Identity & Discovery (AID) records.
//!
//! An AID record is a DNS TXT record published at `_agent.<domain>` that
//! tells a client where an agent lives and how to talk to it. This crate
//! turns the record's wire text into a typed, validated [`AidRecord`] and
//! back. It performs no I/O; DNS and HTTPS discovery live in
//! `agent-aid-discovery`, endpoint checks in `agent-aid-trust`.
//!
//! # Quick Start
//!
//! ```rust
//! use agent_aid::{parse, AuthScheme, Protocol};
//!
//! let record = parse(
//!     "v=aid1;u=https://api.example.com/mcp;p=mcp;a=pat;s=Example agent"
//! ).unwrap();
//!
//! assert_eq!(record.uri(), "https://api.example.com/mcp");
//! assert_eq!(record.proto(), Protocol::Mcp);
//! assert_eq!(record.auth(), Some(AuthScheme::Pat));
//! assert_eq!(record.desc(), Some("Example agent"));
//! ```
//!
//! # Wire Format
//!
//! Semicolon-separated `key=value` pairs, starting with `v=aid1`. Every
//! field except `v` has a single-letter alias; a record may use either
//! spelling for a field but not both.
//!
//! | Field | Alias | Required | Constraint |
//! |-------|-------|----------|------------|
//! | `uri` | `u` | yes | scheme required by `proto` |
//! | `proto` | `p` | yes | known protocol token |
//! | `auth` | `a` | no | known auth token |
//! | `desc` | `s` | no | at most 60 UTF-8 bytes |
//! | `docs` | `d` | no | absolute `https://` URL |
//! | `dep` | `e` | no | ISO 8601 UTC timestamp ending in `Z` |
//! | `pka` | `k` | no | multibase base58btc key, 32 or 33 bytes |
//! | `kid` | `i` | with `pka` | 1-6 chars of `[a-z0-9]` |
//!
//! # Canonical Form
//!
//! [`AidRecord::canonical`] and [`canonicalize_raw`] produce a byte-stable
//! string with full key names in a fixed order, so two records describing
//! the same endpoint compare equal as text.
//!
//! ```rust
//! use agent_aid::{canonicalize_raw, AidRecord, KeyStyle};
//!
//! let record = AidRecord::parse("v=aid1;proto=mcp;uri=https://api.example.com/mcp").unwrap();
//! assert_eq!(record.to_txt(KeyStyle::Alias), "v=aid1;u=https://api.example.com/mcp;p=mcp");
//! assert_eq!(
//!     canonicalize_raw("v=aid1;p=mcp;u=https://api.example.com/mcp").unwrap(),
//!     record.canonical(),
//! );
//! ```

#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

mod auth;
mod constants;
mod error;
mod field;
mod key;
mod parser;
pub mod prelude;
mod protocol;
mod raw;
mod record;
mod timestamp;

pub use auth::AuthScheme;
pub use constants::{
    DNS_SUBDOMAIN, DNS_TTL_MAX, DNS_TTL_MIN, LOCAL_URI_SCHEMES, MAX_DESC_BYTES, MAX_KID_LENGTH,
    MAX_WELL_KNOWN_BYTES, MULTIBASE_BASE58BTC, PKA_KEY_LENGTHS, SPEC_VERSION, WELL_KNOWN_PATH,
};
pub use error::{AidError, ErrorCode};
pub use field::{KeyStyle, RecordField};
pub use key::{KeyId, PublicKey};
pub use parser::{parse, parse_raw, validate};
pub use protocol::{Protocol, SchemeRule, is_valid_proto};
pub use raw::RawRecord;
pub use record::{AidRecord, canonicalize_raw};
pub use timestamp::DeprecationDate;
