//! Cross-origin redirect policy for record endpoints.

use std::time::Duration;

use agent_aid::AidError;
use reqwest::header::LOCATION;
use reqwest::redirect::Policy;
use tracing::debug;
use url::Url;

/// Status codes treated as redirects.
pub const REDIRECT_STATUSES: [u16; 4] = [301, 302, 307, 308];

/// Default deadline for the redirect check.
pub const DEFAULT_REDIRECT_TIMEOUT: Duration = Duration::from_millis(5000);

/// Returns true if both URLs share scheme, host and effective port.
///
/// Ports default to 443 for `https`/`wss` and 80 for `http`/`ws`.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use agent_aid_trust::same_origin;
///
/// let a = Url::parse("https://api.example.com/mcp").unwrap();
/// let b = Url::parse("https://api.example.com:443/v2").unwrap();
/// let c = Url::parse("https://evil.example.net/mcp").unwrap();
/// assert!(same_origin(&a, &b));
/// assert!(!same_origin(&a, &c));
/// ```
#[must_use]
pub fn same_origin(a: &Url, b: &Url) -> bool {
    a.scheme() == b.scheme()
        && a.host_str() == b.host_str()
        && a.port_or_known_default() == b.port_or_known_default()
}

/// Decides whether one HTTP response violates the redirect policy.
///
/// Responses whose status is not a redirect always pass.
///
/// # Errors
///
/// Returns `ERR_SECURITY` if a redirect has no `Location` header, an
/// unusable one, or one that points to a different origin.
pub fn check_redirect(source: &Url, status: u16, location: Option<&str>) -> Result<(), AidError> {
    if !REDIRECT_STATUSES.contains(&status) {
        return Ok(());
    }
    let location =
        location.ok_or_else(|| AidError::security("Redirect without Location header"))?;
    let target = source
        .join(location)
        .map_err(|_| AidError::security(format!("Invalid redirect Location: {location}")))?;

    if same_origin(source, &target) {
        debug!(from = %source, to = %target, "Same-origin redirect allowed");
        Ok(())
    } else {
        Err(AidError::security(format!(
            "Cross-origin redirect detected from {} to {}",
            source.origin().ascii_serialization(),
            target.origin().ascii_serialization()
        )))
    }
}

/// Sends a HEAD request to `uri` and applies [`check_redirect`] to the
/// first response. Redirects are never followed.
///
/// # Errors
///
/// Returns `ERR_SECURITY` for a policy violation, and also when `uri` is
/// not a URL or the request fails or times out: an endpoint that cannot be
/// checked is not trusted.
pub async fn enforce_redirect_policy(uri: &str, timeout: Duration) -> Result<(), AidError> {
    let client = reqwest::Client::builder()
        .redirect(Policy::none())
        .build()
        .map_err(|e| AidError::security(format!("Failed to build HTTP client: {e}")))?;
    enforce_redirect_policy_with(&client, uri, timeout).await
}

/// Like [`enforce_redirect_policy`], with a caller-supplied client.
///
/// The client must be built with `redirect::Policy::none()`.
///
/// # Errors
///
/// See [`enforce_redirect_policy`].
pub async fn enforce_redirect_policy_with(
    client: &reqwest::Client,
    uri: &str,
    timeout: Duration,
) -> Result<(), AidError> {
    let source =
        Url::parse(uri).map_err(|e| AidError::security(format!("Invalid URI {uri}: {e}")))?;

    let response = match tokio::time::timeout(timeout, client.head(source.clone()).send()).await {
        Err(_) => {
            return Err(AidError::security(format!(
                "Redirect check timeout for {uri}"
            )));
        }
        Ok(Err(e)) => {
            return Err(AidError::security(format!(
                "Redirect check failed for {uri}: {e}"
            )));
        }
        Ok(Ok(response)) => response,
    };

    let status = response.status().as_u16();
    let location = response
        .headers()
        .get(LOCATION)
        .and_then(|v| v.to_str().ok());
    debug!(uri = %uri, status, "Redirect check response");
    check_redirect(&source, status, location)
}
