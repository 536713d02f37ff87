//! Peer certificate inspection.
//!
//! Opens one TLS connection, validates the chain against the Mozilla root
//! set, and reports what the server presented. Nothing is cached.

use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rustls::pki_types::ServerName;
use rustls::{ClientConfig, RootCertStore};
use serde::Serialize;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;
use tracing::debug;
use url::{Host, Url};
use x509_parser::extensions::GeneralName;
use x509_parser::prelude::{X509Certificate, parse_x509_certificate};

use crate::error::TlsInspectError;

/// Port used when the URI names none.
pub const DEFAULT_TLS_PORT: u16 = 443;

/// Default deadline for connect plus handshake.
pub const DEFAULT_TLS_TIMEOUT: Duration = Duration::from_millis(5000);

const MILLIS_PER_DAY: i64 = 86_400_000;

/// What the server's leaf certificate says.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TlsInspection {
    /// Host connected to
    pub host: String,
    /// Server name sent in the handshake
    pub sni: String,
    /// Issuer common name, if present
    pub issuer: Option<String>,
    /// Subject alternative names, e.g. `DNS:api.example.com`
    pub san: Vec<String>,
    /// Start of validity
    pub valid_from: DateTime<Utc>,
    /// End of validity
    pub valid_to: DateTime<Utc>,
    /// Whole days until `valid_to`, negative once expired
    pub days_remaining: i64,
}

impl TlsInspection {
    /// Returns true once `valid_to` has passed.
    #[must_use]
    pub const fn is_expired(&self) -> bool {
        self.days_remaining < 0
    }
}

/// Connects to the host of `uri` and inspects its certificate.
///
/// The port defaults to 443. One deadline covers both the TCP connect
/// and the handshake.
///
/// # Errors
///
/// Returns [`TlsInspectError::Timeout`] when the deadline expires, and the
/// other variants for an unusable URI, a refused connection, a failed
/// handshake, or an unreadable certificate.
pub async fn inspect_tls(uri: &str, timeout: Duration) -> Result<TlsInspection, TlsInspectError> {
    let url = Url::parse(uri).map_err(|e| TlsInspectError::InvalidUri {
        uri: uri.to_string(),
        reason: e.to_string(),
    })?;
    let host = match url.host() {
        Some(Host::Domain(d)) => d.to_string(),
        Some(Host::Ipv4(ip)) => ip.to_string(),
        Some(Host::Ipv6(ip)) => ip.to_string(),
        None => {
            return Err(TlsInspectError::InvalidUri {
                uri: uri.to_string(),
                reason: "no host".to_string(),
            });
        }
    };
    let port = url.port().unwrap_or(DEFAULT_TLS_PORT);

    match tokio::time::timeout(timeout, handshake(&host, port)).await {
        Ok(result) => result,
        Err(_) => Err(TlsInspectError::Timeout {
            host,
            timeout_ms: timeout.as_millis(),
        }),
    }
}

async fn handshake(host: &str, port: u16) -> Result<TlsInspection, TlsInspectError> {
    let server_name =
        ServerName::try_from(host.to_string()).map_err(|e| TlsInspectError::InvalidUri {
            uri: host.to_string(),
            reason: e.to_string(),
        })?;
    let connector = TlsConnector::from(client_config(host)?);

    let tcp = TcpStream::connect((host, port))
        .await
        .map_err(|e| TlsInspectError::Connect {
            host: host.to_string(),
            message: e.to_string(),
        })?;
    debug!(host, port, "TCP connected, starting TLS handshake");

    let mut stream =
        connector
            .connect(server_name, tcp)
            .await
            .map_err(|e| TlsInspectError::Handshake {
                host: host.to_string(),
                message: e.to_string(),
            })?;

    let leaf = {
        let (_, conn) = stream.get_ref();
        conn.peer_certificates()
            .and_then(|certs| certs.first())
            .map(|der| der.as_ref().to_vec())
            .ok_or_else(|| TlsInspectError::Certificate {
                host: host.to_string(),
                message: "no peer certificate".to_string(),
            })?
    };
    close(host, &mut stream).await;

    inspect_der(host, &leaf, Utc::now())
}

/// Sends close_notify. Returns false, after logging, if the peer was
/// already gone.
async fn close<S: AsyncWrite + Unpin>(host: &str, stream: &mut S) -> bool {
    match stream.shutdown().await {
        Ok(()) => true,
        Err(e) => {
            debug!(host, error = %e, "TLS close_notify failed");
            false
        }
    }
}

fn client_config(host: &str) -> Result<Arc<ClientConfig>, TlsInspectError> {
    let roots = RootCertStore {
        roots: webpki_roots::TLS_SERVER_ROOTS.to_vec(),
    };
    let config =
        ClientConfig::builder_with_provider(Arc::new(rustls::crypto::ring::default_provider()))
            .with_safe_default_protocol_versions()
            .map_err(|e| TlsInspectError::Handshake {
                host: host.to_string(),
                message: e.to_string(),
            })?
            .with_root_certificates(roots)
            .with_no_client_auth();
    Ok(Arc::new(config))
}

/// Builds an inspection from a DER-encoded leaf certificate.
///
/// # Errors
///
/// Returns [`TlsInspectError::Certificate`] if the DER does not parse or
/// carries validity dates outside the representable range.
pub fn inspect_der(
    host: &str,
    der: &[u8],
    now: DateTime<Utc>,
) -> Result<TlsInspection, TlsInspectError> {
    let bad_cert = |message: String| TlsInspectError::Certificate {
        host: host.to_string(),
        message,
    };
    let (_, cert) = parse_x509_certificate(der).map_err(|e| bad_cert(e.to_string()))?;

    let valid_from = to_utc(cert.validity().not_before.timestamp())
        .ok_or_else(|| bad_cert("notBefore out of range".to_string()))?;
    let valid_to = to_utc(cert.validity().not_after.timestamp())
        .ok_or_else(|| bad_cert("notAfter out of range".to_string()))?;

    Ok(TlsInspection {
        host: host.to_string(),
        sni: host.to_string(),
        issuer: issuer_common_name(&cert),
        san: split_san(&render_san(&cert)),
        valid_from,
        valid_to,
        days_remaining: days_remaining(valid_to, now),
    })
}

fn to_utc(secs: i64) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp(secs, 0)
}

fn issuer_common_name(cert: &X509Certificate<'_>) -> Option<String> {
    cert.issuer()
        .iter_common_name()
        .next()
        .and_then(|cn| cn.as_str().ok())
        .map(str::to_string)
}

fn render_san(cert: &X509Certificate<'_>) -> String {
    let Ok(Some(ext)) = cert.subject_alternative_name() else {
        return String::new();
    };
    ext.value
        .general_names
        .iter()
        .filter_map(|name| match name {
            GeneralName::DNSName(dns) => Some(format!("DNS:{dns}")),
            GeneralName::IPAddress(bytes) => ip_from_bytes(bytes).map(|ip| format!("IP Address:{ip}")),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn ip_from_bytes(bytes: &[u8]) -> Option<IpAddr> {
    match bytes.len() {
        4 => <[u8; 4]>::try_from(bytes).ok().map(IpAddr::from),
        16 => <[u8; 16]>::try_from(bytes).ok().map(IpAddr::from),
        _ => None,
    }
}

/// Splits a comma-separated SAN string, trimming entries and dropping
/// blanks.
///
/// # Examples
///
/// ```
/// use agent_aid_trust::split_san;
///
/// assert_eq!(
///     split_san("DNS:a.example.com, DNS:b.example.com,,"),
///     vec!["DNS:a.example.com", "DNS:b.example.com"]
/// );
/// ```
#[must_use]
pub fn split_san(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Whole days from `now` until `valid_to`, rounded toward negative
/// infinity.
///
/// # Examples
///
/// ```
/// use chrono::{Duration, TimeZone, Utc};
/// use agent_aid_trust::days_remaining;
///
/// let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
/// assert_eq!(days_remaining(now + Duration::hours(36), now), 1);
/// assert_eq!(days_remaining(now - Duration::hours(1), now), -1);
/// ```
#[must_use]
pub fn days_remaining(valid_to: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (valid_to - now).num_milliseconds().div_euclid(MILLIS_PER_DAY)
}
