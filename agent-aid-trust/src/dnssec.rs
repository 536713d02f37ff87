//! DNSSEC presence probe over DNS-over-HTTPS.

use std::time::Duration;

use reqwest::header::ACCEPT;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

/// Public resolver used when the caller names none.
pub const DEFAULT_DOH_ENDPOINT: &str = "https://cloudflare-dns.com/dns-query";

/// Default deadline for the DoH request.
pub const DEFAULT_DOH_TIMEOUT: Duration = Duration::from_millis(5000);

/// RR type number of RRSIG.
pub const RRSIG_TYPE: u16 = 46;

const DNS_JSON: &str = "application/dns-json";

/// One answer from a DoH JSON response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DohAnswer {
    /// Owner name
    pub name: String,
    /// RR type number
    #[serde(rename = "type")]
    pub rr_type: u16,
    /// Time to live in seconds
    #[serde(rename = "TTL")]
    pub ttl: u32,
    /// Presentation-format RDATA
    pub data: String,
}

/// The subset of a DoH JSON response the probe reads.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DohResponse {
    /// DNS RCODE
    #[serde(rename = "Status", default)]
    pub status: u32,
    /// Answer section, absent when empty
    #[serde(rename = "Answer", default)]
    pub answer: Vec<DohAnswer>,
}

/// Whether RRSIG records were seen for a name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DnssecProbeResult {
    /// True iff an answer of type RRSIG came back
    pub present: bool,
    /// Always `"RRSIG"`
    pub method: &'static str,
    /// The answers, when `present`
    pub proof: Option<Vec<DohAnswer>>,
}

impl DnssecProbeResult {
    /// A negative result.
    #[must_use]
    pub const fn absent() -> Self {
        Self {
            present: false,
            method: "RRSIG",
            proof: None,
        }
    }

    /// Builds the result from a DoH answer section.
    #[must_use]
    pub fn from_answers(answers: Vec<DohAnswer>) -> Self {
        if answers.iter().any(|a| a.rr_type == RRSIG_TYPE) {
            Self {
                present: true,
                method: "RRSIG",
                proof: Some(answers),
            }
        } else {
            Self::absent()
        }
    }
}

/// Asks `doh_endpoint` for RRSIG records covering `name`.
///
/// Never fails: an unreachable endpoint, a timeout, a non-2xx status or an
/// undecodable body all read as "not present".
pub async fn probe_dnssec_rrsig_txt(
    name: &str,
    doh_endpoint: &str,
    timeout: Duration,
) -> DnssecProbeResult {
    match reqwest::Client::builder().build() {
        Ok(client) => probe_dnssec_rrsig_txt_with(&client, name, doh_endpoint, timeout).await,
        Err(e) => {
            debug!(name, error = %e, "DNSSEC probe client unavailable");
            DnssecProbeResult::absent()
        }
    }
}

/// Like [`probe_dnssec_rrsig_txt`], with a caller-supplied client.
pub async fn probe_dnssec_rrsig_txt_with(
    client: &reqwest::Client,
    name: &str,
    doh_endpoint: &str,
    timeout: Duration,
) -> DnssecProbeResult {
    match tokio::time::timeout(timeout, query(client, name, doh_endpoint)).await {
        Ok(Ok(answers)) => DnssecProbeResult::from_answers(answers),
        Ok(Err(reason)) => {
            debug!(name, reason = %reason, "DNSSEC probe failed");
            DnssecProbeResult::absent()
        }
        Err(_) => {
            debug!(name, "DNSSEC probe timed out");
            DnssecProbeResult::absent()
        }
    }
}

async fn query(
    client: &reqwest::Client,
    name: &str,
    doh_endpoint: &str,
) -> Result<Vec<DohAnswer>, String> {
    let mut url = Url::parse(doh_endpoint).map_err(|e| e.to_string())?;
    url.query_pairs_mut()
        .append_pair("name", name)
        .append_pair("type", "RRSIG");

    let response = client
        .get(url)
        .header(ACCEPT, DNS_JSON)
        .send()
        .await
        .map_err(|e| e.to_string())?;
    if !response.status().is_success() {
        return Err(format!("HTTP {}", response.status().as_u16()));
    }
    let body = response.bytes().await.map_err(|e| e.to_string())?;
    let parsed: DohResponse = serde_json::from_slice(&body).map_err(|e| e.to_string())?;
    Ok(parsed.answer)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answer(rr_type: u16) -> DohAnswer {
        DohAnswer {
            name: "_agent.example.com.".to_string(),
            rr_type,
            ttl: 300,
            data: "x".to_string(),
        }
    }

    #[test]
    fn rrsig_answer_is_proof() {
        let result = DnssecProbeResult::from_answers(vec![answer(16), answer(46)]);
        assert!(result.present);
        assert_eq!(result.proof.map(|p| p.len()), Some(2));
    }

    #[test]
    fn no_rrsig_is_absent() {
        assert_eq!(
            DnssecProbeResult::from_answers(vec![answer(16)]),
            DnssecProbeResult::absent()
        );
        assert_eq!(
            DnssecProbeResult::from_answers(Vec::new()),
            DnssecProbeResult::absent()
        );
    }

    #[test]
    fn decodes_doh_json() {
        let body = r#"{"Status":0,"Answer":[{"name":"a.","type":46,"TTL":60,"data":"TXT 13 2 300"}]}"#;
        let parsed: DohResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.status, 0);
        assert_eq!(parsed.answer[0].rr_type, RRSIG_TYPE);
        assert_eq!(parsed.answer[0].ttl, 60);
    }

    #[test]
    fn missing_answer_section_is_empty() {
        let parsed: DohResponse = serde_json::from_str(r#"{"Status":3}"#).unwrap();
        assert!(parsed.answer.is_empty());
    }

    #[test]
    fn serializes_like_doh() {
        let json = serde_json::to_value(DnssecProbeResult::from_answers(vec![answer(46)])).unwrap();
        assert_eq!(json["method"], "RRSIG");
        assert_eq!(json["proof"][0]["type"], 46);
        assert_eq!(json["proof"][0]["TTL"], 300);
    }

    #[tokio::test]
    async fn bad_endpoint_is_absent() {
        let result = probe_dnssec_rrsig_txt("example.com", "not a url", DEFAULT_DOH_TIMEOUT).await;
        assert_eq!(result, DnssecProbeResult::absent());
    }
}
