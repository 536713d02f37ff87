//! Constants for AID record validation and discovery.

/// The only record version this crate understands.
pub const SPEC_VERSION: &str = "aid1";

/// DNS label that prefixes every AID query name.
pub const DNS_SUBDOMAIN: &str = "_agent";

/// Minimum TTL publishers are advised to use, in seconds.
pub const DNS_TTL_MIN: u32 = 300;

/// Maximum TTL publishers are advised to use, in seconds.
pub const DNS_TTL_MAX: u32 = 900;

/// Maximum `desc` length in UTF-8 bytes.
pub const MAX_DESC_BYTES: usize = 60;

/// Maximum `kid` length in characters.
pub const MAX_KID_LENGTH: usize = 6;

/// Accepted decoded `pka` lengths in bytes.
pub const PKA_KEY_LENGTHS: [usize; 2] = [32, 33];

/// Multibase prefix for base58btc.
pub const MULTIBASE_BASE58BTC: char = 'z';

/// URI schemes accepted for the `local` protocol.
pub const LOCAL_URI_SCHEMES: [&str; 3] = ["docker", "npx", "pip"];

/// Path of the HTTPS fallback document.
pub const WELL_KNOWN_PATH: &str = "/.well-known/agent";

/// Maximum accepted size of the well-known document in bytes.
pub const MAX_WELL_KNOWN_BYTES: usize = 64 * 1024;
