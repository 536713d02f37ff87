//! Convenient re-exports for glob imports.
//!
//! ```rust
//! use agent_aid::prelude::*;
//!
//! let record: AidRecord = parse("v=aid1;u=https://api.example.com/mcp;p=mcp").unwrap();
//! assert_eq!(record.proto(), Protocol::Mcp);
//! ```
//!
//! Field-table internals (`RawRecord`, `RecordField`) and constants are left
//! out; import them by name when needed.

pub use crate::{
    // Record and field types
    AidRecord, AuthScheme, DeprecationDate, KeyId, KeyStyle, Protocol, PublicKey,
    // Parsing
    canonicalize_raw, is_valid_proto, parse,
    // Errors
    AidError, ErrorCode,
};
