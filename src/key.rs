//! Public key (`pka`) and key identifier (`kid`) fields.

use std::fmt;

use crate::constants::{MAX_KID_LENGTH, MULTIBASE_BASE58BTC, PKA_KEY_LENGTHS};

/// A public key published in the `pka` field.
///
/// Stored as the original multibase text (so records re-serialize
/// byte-for-byte) together with the decoded key bytes.
///
/// # Examples
///
/// ```
/// use agent_aid::PublicKey;
///
/// let key = PublicKey::parse("z4wBqpZM9xaSheZzJSMawUKKwhdpChKbZ5eu5ky4Vigw").unwrap();
/// assert_eq!(key.bytes().len(), 32);
/// assert_eq!(key.bytes()[0], 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PublicKey {
    text: String,
    bytes: Vec<u8>,
}

impl PublicKey {
    /// Parses a multibase (`z` + base58btc) public key.
    ///
    /// # Errors
    ///
    /// Returns a reason string if the multibase prefix is not `z`, the
    /// payload is not valid base58btc, or the decoded key is not 32 or 33
    /// bytes long.
    pub fn parse(input: &str) -> Result<Self, &'static str> {
        let payload = input
            .strip_prefix(MULTIBASE_BASE58BTC)
            .ok_or("pka MUST be multibase base58btc (prefix 'z')")?;
        if payload.is_empty() {
            return Err("pka key material is empty");
        }
        let bytes = bs58::decode(payload)
            .into_vec()
            .map_err(|_| "pka contains invalid base58 characters")?;
        if !PKA_KEY_LENGTHS.contains(&bytes.len()) {
            return Err("pka MUST decode to a 32 or 33 byte public key");
        }
        Ok(Self {
            text: input.to_string(),
            bytes,
        })
    }

    /// Returns the multibase text as published.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Returns the decoded key bytes.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Key identifier published in the `kid` field: 1-6 chars of `[a-z0-9]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyId(String);

impl KeyId {
    /// Parses a key identifier.
    ///
    /// # Errors
    ///
    /// Returns a reason string if the value is empty, longer than six
    /// characters, or contains anything but lowercase letters and digits.
    pub fn parse(input: &str) -> Result<Self, &'static str> {
        if input.is_empty() || input.len() > MAX_KID_LENGTH {
            return Err("kid MUST be 1-6 characters");
        }
        if !input
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
        {
            return Err("kid MUST contain only [a-z0-9]");
        }
        Ok(Self(input.to_string()))
    }

    /// Returns the identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
