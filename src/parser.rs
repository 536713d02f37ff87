//! TXT record parsing and field validation.
//!
//! Parsing happens in two passes. The first splits the wire string into
//! `key=value` pairs, applies the version gate and resolves aliases into a
//! [`RawRecord`]. The second checks each field's semantics and builds the
//! typed [`AidRecord`]. Structured sources (the well-known JSON document)
//! feed the second pass directly.

use url::Url;

use crate::auth::AuthScheme;
use crate::constants::{MAX_DESC_BYTES, SPEC_VERSION};
use crate::error::AidError;
use crate::field::RecordField;
use crate::key::{KeyId, PublicKey};
use crate::protocol::{Protocol, SchemeRule};
use crate::raw::RawRecord;
use crate::record::AidRecord;
use crate::timestamp::DeprecationDate;

/// Parses and validates a TXT record string.
///
/// # Errors
///
/// Returns an `ERR_INVALID_TXT` error if:
/// - a segment is not a `key=value` pair, or has an empty key or value
/// - the first pair is not `v=aid1`
/// - a key is repeated, or a field is given by both its name and alias
/// - any field fails validation (see [`validate`])
///
/// # Examples
///
/// ```
/// use agent_aid::{parse, Protocol};
///
/// let record = parse("v=aid1;u=https://api.example.com/mcp;p=mcp").unwrap();
/// assert_eq!(record.proto(), Protocol::Mcp);
///
/// let err = parse("v=aid2;u=https://api.example.com/mcp;p=mcp").unwrap_err();
/// assert_eq!(err.message(), "Unsupported version: aid2. Expected: aid1");
/// ```
pub fn parse(input: &str) -> Result<AidRecord, AidError> {
    validate(parse_raw(input)?)
}

/// Splits a TXT string into a [`RawRecord`] without validating field values.
///
/// Only the pair syntax, the version gate and the alias rules are checked.
///
/// # Errors
///
/// Returns an `ERR_INVALID_TXT` error for malformed pairs, a missing or
/// unsupported leading version, duplicate keys, or alias conflicts.
pub fn parse_raw(input: &str) -> Result<RawRecord, AidError> {
    let mut raw = RawRecord::new();
    let mut pairs = input
        .split(';')
        .map(str::trim)
        .filter(|segment| !segment.is_empty());

    let first = pairs
        .next()
        .ok_or_else(|| AidError::invalid_txt("Missing required field: v"))?;
    let (key, value) = split_pair(first)?;
    if !key.eq_ignore_ascii_case(RecordField::Version.name()) {
        return Err(AidError::invalid_txt(format!(
            "Record must start with v={SPEC_VERSION}, found: {first}"
        )));
    }
    check_version(value)?;
    raw.insert(key, value)?;

    for pair in pairs {
        let (key, value) = split_pair(pair)?;
        raw.insert(key, value)?;
    }
    Ok(raw)
}

/// Validates collected field values and builds the typed record.
///
/// # Errors
///
/// Returns an `ERR_INVALID_TXT` error if:
/// - `v` is missing or not `aid1`
/// - `uri` or `proto` is missing, or `proto` is not a known token
/// - `uri` does not use the scheme its protocol requires
/// - `auth` is not a known token, or `desc` exceeds 60 bytes
/// - `docs` is not an absolute `https://` URL
/// - `dep`, `pka` or `kid` is malformed
/// - `pka` is present without `kid`
pub fn validate(raw: RawRecord) -> Result<AidRecord, AidError> {
    let version = required(&raw, RecordField::Version)?;
    check_version(version)?;

    let uri = required(&raw, RecordField::Uri)?;
    let proto_token = required(&raw, RecordField::Proto)?;
    let proto: Protocol = proto_token
        .parse()
        .map_err(|_| AidError::invalid_txt(format!("Unsupported protocol: {proto_token}")))?;

    let auth = raw
        .get(RecordField::Auth)
        .map(|token| {
            token
                .parse::<AuthScheme>()
                .map_err(|_| AidError::invalid_txt(format!("Invalid auth token: {token}")))
        })
        .transpose()?;

    let desc = raw.get(RecordField::Desc);
    if desc.is_some_and(|d| d.len() > MAX_DESC_BYTES) {
        return Err(AidError::invalid_txt(format!(
            "Description field must be at most {MAX_DESC_BYTES} UTF-8 bytes"
        )));
    }

    check_uri(proto, uri)?;

    let docs = raw.get(RecordField::Docs);
    if docs.is_some_and(|d| !is_https_url(d)) {
        return Err(AidError::invalid_txt(
            "docs MUST be an absolute https:// URL",
        ));
    }

    let dep = raw
        .get(RecordField::Dep)
        .map(DeprecationDate::parse)
        .transpose()
        .map_err(AidError::invalid_txt)?;
    let pka = raw
        .get(RecordField::Pka)
        .map(PublicKey::parse)
        .transpose()
        .map_err(AidError::invalid_txt)?;
    let kid = raw
        .get(RecordField::Kid)
        .map(KeyId::parse)
        .transpose()
        .map_err(AidError::invalid_txt)?;

    if pka.is_some() && kid.is_none() {
        return Err(AidError::invalid_txt("kid is required when pka is present"));
    }

    Ok(AidRecord {
        uri: uri.to_string(),
        proto,
        auth,
        desc: desc.map(str::to_string),
        docs: docs.map(str::to_string),
        dep,
        pka,
        kid,
    })
}

fn split_pair(pair: &str) -> Result<(&str, &str), AidError> {
    pair.split_once('=')
        .map(|(key, value)| (key.trim(), value.trim()))
        .ok_or_else(|| AidError::invalid_txt(format!("Invalid key-value pair: {pair}")))
}

fn check_version(value: &str) -> Result<(), AidError> {
    let value = value.trim();
    if value == SPEC_VERSION {
        Ok(())
    } else {
        Err(AidError::invalid_txt(format!(
            "Unsupported version: {value}. Expected: {SPEC_VERSION}"
        )))
    }
}

fn required(raw: &RawRecord, field: RecordField) -> Result<&str, AidError> {
    raw.get(field).ok_or_else(|| {
        AidError::invalid_txt(format!("Missing required field: {}", field.name()))
    })
}

fn check_uri(proto: Protocol, uri: &str) -> Result<(), AidError> {
    let rule = proto.scheme_rule();
    if !rule.accepts(uri) {
        return Err(AidError::invalid_txt(format!(
            "Invalid URI scheme for '{proto}'. MUST be '{}'",
            rule.required()
        )));
    }
    let needs_host = matches!(rule, SchemeRule::Https | SchemeRule::Wss);
    if needs_host && !has_host(uri) {
        return Err(AidError::invalid_txt(format!("Invalid URI format: {uri}")));
    }
    Ok(())
}

fn has_host(uri: &str) -> bool {
    Url::parse(uri).is_ok_and(|url| url.host_str().is_some_and(|h| !h.is_empty()))
}

fn is_https_url(value: &str) -> bool {
    value.starts_with("https://") && has_host(value)
}
