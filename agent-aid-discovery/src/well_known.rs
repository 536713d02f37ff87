//! The `/.well-known/agent` HTTPS fallback.

use agent_aid::{AidError, MAX_WELL_KNOWN_BYTES, RawRecord};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::redirect::Policy;
use serde_json::Value;
use url::Url;

use crate::traits::{HttpResponse, WellKnownSource};

/// [`WellKnownSource`] backed by a `reqwest` client that never follows
/// redirects.
#[derive(Debug, Clone)]
pub struct HttpWellKnown {
    client: reqwest::Client,
}

impl HttpWellKnown {
    /// Creates a source with a rustls-backed client.
    ///
    /// # Errors
    ///
    /// Returns `ERR_FALLBACK_FAILED` if the HTTP client cannot be built.
    pub fn new() -> Result<Self, AidError> {
        let client = reqwest::Client::builder()
            .redirect(Policy::none())
            .build()
            .map_err(|e| AidError::fallback_failed(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// Wraps an existing client.
    ///
    /// The client should be built with `redirect::Policy::none()`; a client
    /// that follows redirects would hide them from the fallback checks.
    #[must_use]
    pub const fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl WellKnownSource for HttpWellKnown {
    async fn get(&self, url: &Url, max_body: usize) -> Result<HttpResponse, String> {
        let mut response = self
            .client
            .get(url.clone())
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| e.to_string())?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(|e| e.to_string())? {
            body.extend_from_slice(&chunk);
            if body.len() > max_body {
                break;
            }
        }

        Ok(HttpResponse {
            status,
            content_type,
            body,
        })
    }
}

/// A well-known response that passed the transport checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WellKnownDocument {
    /// Field values taken from the JSON object.
    pub raw: RawRecord,
    /// The response body, trimmed.
    pub text: String,
}

impl WellKnownDocument {
    /// Applies the fallback rules to a response.
    ///
    /// Returns `Ok(None)` for HTTP 404, which counts as "no record here".
    ///
    /// # Errors
    ///
    /// Returns `ERR_FALLBACK_FAILED` for any other non-2xx status (including
    /// redirects), a content type other than `application/json`, a body over
    /// 64 KiB, or a body that is not a JSON object. Returns
    /// `ERR_INVALID_TXT` if the object names a field twice (full name and
    /// alias) or has an empty value.
    pub fn from_response(response: &HttpResponse) -> Result<Option<Self>, AidError> {
        match response.status {
            404 => return Ok(None),
            300..=399 => {
                return Err(AidError::fallback_failed(format!(
                    "Well-known redirect not allowed (HTTP {})",
                    response.status
                )));
            }
            200..=299 => {}
            status => {
                return Err(AidError::fallback_failed(format!(
                    "Well-known HTTP {status}"
                )));
            }
        }

        let is_json = response
            .content_type
            .as_deref()
            .is_some_and(|ct| ct.trim().to_ascii_lowercase().starts_with("application/json"));
        if !is_json {
            return Err(AidError::fallback_failed(
                "Invalid content-type for well-known (expected application/json)",
            ));
        }

        if response.body.len() > MAX_WELL_KNOWN_BYTES {
            return Err(AidError::fallback_failed(
                "Well-known response too large (>64KB)",
            ));
        }

        let text = std::str::from_utf8(&response.body)
            .map_err(|_| AidError::fallback_failed("Invalid JSON in well-known response"))?;
        let json: Value = serde_json::from_str(text)
            .map_err(|_| AidError::fallback_failed("Invalid JSON in well-known response"))?;
        let Value::Object(object) = json else {
            return Err(AidError::fallback_failed(
                "Well-known JSON must be an object",
            ));
        };

        let mut raw = RawRecord::new();
        for (key, value) in &object {
            if let Value::String(value) = value {
                raw.insert(key, value)?;
            }
        }

        Ok(Some(Self {
            raw,
            text: text.trim().to_string(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use agent_aid::{ErrorCode, RecordField};

    use super::*;

    fn json_response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            content_type: Some("application/json; charset=utf-8".to_string()),
            body: body.as_bytes().to_vec(),
        }
    }

    #[test]
    fn accepts_json_object_with_aliases() {
        let response = json_response(200, r#"{"v":"aid1","u":"https://a.example.com","p":"mcp"}"#);
        let doc = WellKnownDocument::from_response(&response).unwrap().unwrap();
        assert_eq!(doc.raw.get(RecordField::Uri), Some("https://a.example.com"));
        assert_eq!(doc.raw.get(RecordField::Proto), Some("mcp"));
    }

    #[test]
    fn not_found_is_soft() {
        let response = json_response(404, "");
        assert!(WellKnownDocument::from_response(&response).unwrap().is_none());
    }

    #[test]
    fn other_statuses_fail() {
        for status in [301, 302, 500, 403] {
            let err = WellKnownDocument::from_response(&json_response(status, "{}")).unwrap_err();
            assert_eq!(err.code(), ErrorCode::FallbackFailed);
        }
    }

    #[test]
    fn content_type_must_be_json() {
        let mut response = json_response(200, "{}");
        response.content_type = Some("text/html".to_string());
        let err = WellKnownDocument::from_response(&response).unwrap_err();
        assert_eq!(err.code(), ErrorCode::FallbackFailed);
        assert!(err.message().contains("content-type"));

        response.content_type = None;
        assert!(WellKnownDocument::from_response(&response).is_err());
    }

    #[test]
    fn body_limits() {
        let big = format!(r#"{{"desc":"{}"}}"#, "x".repeat(MAX_WELL_KNOWN_BYTES));
        let err = WellKnownDocument::from_response(&json_response(200, &big)).unwrap_err();
        assert!(err.message().contains("too large"));

        let err = WellKnownDocument::from_response(&json_response(200, "[1,2]")).unwrap_err();
        assert_eq!(err.message(), "Well-known JSON must be an object");

        let err = WellKnownDocument::from_response(&json_response(200, "{not json")).unwrap_err();
        assert_eq!(err.message(), "Invalid JSON in well-known response");
    }

    #[test]
    fn alias_conflict_is_invalid_txt() {
        let response = json_response(
            200,
            r#"{"v":"aid1","uri":"https://a.example.com","u":"https://a.example.com","p":"mcp"}"#,
        );
        let err = WellKnownDocument::from_response(&response).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidTxt);
    }

    #[test]
    fn separator_smuggled_in_value_is_invalid_txt() {
        let response = json_response(
            200,
            r#"{"v":"aid1","uri":"https://a.example.com","proto":"mcp","desc":"x;kid=g1"}"#,
        );
        let err = WellKnownDocument::from_response(&response).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidTxt);
        assert_eq!(err.message(), "Invalid character ';' in value for desc");
    }

    #[test]
    fn non_string_values_ignored() {
        let response = json_response(200, r#"{"v":"aid1","ttl":300,"tags":["x"]}"#);
        let doc = WellKnownDocument::from_response(&response).unwrap().unwrap();
        assert_eq!(doc.raw.get(RecordField::Version), Some("aid1"));
    }
}
