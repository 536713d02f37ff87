//! Trust checks against in-process loopback servers.

use std::net::SocketAddr;
use std::time::Duration;

use agent_aid::ErrorCode;
use agent_aid_trust::{
    DnssecProbeResult, TlsInspectError, enforce_redirect_policy_with, inspect_tls,
    probe_dnssec_rrsig_txt_with,
};
use reqwest::redirect::Policy;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

const TIMEOUT: Duration = Duration::from_secs(2);

/// Serves one canned response to the first connection.
async fn serve_once(response: String) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }
        socket.write_all(response.as_bytes()).await.unwrap();
        let _ = socket.shutdown().await;
    });
    addr
}

fn http_response(status: &str, headers: &[(&str, &str)], body: &str) -> String {
    let mut out = format!("HTTP/1.1 {status}\r\n");
    for (name, value) in headers {
        out.push_str(&format!("{name}: {value}\r\n"));
    }
    out.push_str(&format!(
        "Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    ));
    out
}

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .redirect(Policy::none())
        .build()
        .unwrap()
}

async fn unused_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

mod redirect_policy {
    use super::*;

    #[tokio::test]
    async fn ok_response_passes() {
        // Arrange
        let addr = serve_once(http_response("200 OK", &[], "")).await;
        let uri = format!("http://{addr}/mcp");

        // Act
        let result = enforce_redirect_policy_with(&client(), &uri, TIMEOUT).await;

        // Assert
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn same_origin_redirect_passes() {
        let addr = serve_once(http_response("302 Found", &[("Location", "/v2/mcp")], "")).await;
        let uri = format!("http://{addr}/mcp");

        let result = enforce_redirect_policy_with(&client(), &uri, TIMEOUT).await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn cross_origin_redirect_is_security_error() {
        let addr = serve_once(http_response(
            "302 Found",
            &[("Location", "https://evil.example.net/mcp")],
            "",
        ))
        .await;
        let uri = format!("http://{addr}/mcp");

        let err = enforce_redirect_policy_with(&client(), &uri, TIMEOUT)
            .await
            .unwrap_err();

        assert_eq!(err.code(), ErrorCode::Security);
        assert_eq!(
            err.message(),
            format!("Cross-origin redirect detected from http://{addr} to https://evil.example.net")
        );
    }

    #[tokio::test]
    async fn redirect_without_location_is_security_error() {
        let addr = serve_once(http_response("307 Temporary Redirect", &[], "")).await;
        let uri = format!("http://{addr}/mcp");

        let err = enforce_redirect_policy_with(&client(), &uri, TIMEOUT)
            .await
            .unwrap_err();

        assert_eq!(err.code(), ErrorCode::Security);
        assert_eq!(err.message(), "Redirect without Location header");
    }

    #[tokio::test]
    async fn unreachable_endpoint_fails_closed() {
        let addr = unused_port().await;
        let uri = format!("http://{addr}/mcp");

        let err = enforce_redirect_policy_with(&client(), &uri, TIMEOUT)
            .await
            .unwrap_err();

        assert_eq!(err.code(), ErrorCode::Security);
    }
}

mod dnssec_probe {
    use super::*;

    fn endpoint(addr: SocketAddr) -> String {
        format!("http://{addr}/dns-query")
    }

    async fn probe(client: &reqwest::Client, name: &str, endpoint: &str) -> DnssecProbeResult {
        probe_dnssec_rrsig_txt_with(client, name, endpoint, TIMEOUT).await
    }

    #[tokio::test]
    async fn rrsig_answer_is_present() {
        let body = r#"{"Status":0,"Answer":[
            {"name":"_agent.example.com.","type":16,"TTL":300,"data":"\"v=aid1\""},
            {"name":"_agent.example.com.","type":46,"TTL":300,"data":"TXT 13 3 300"}
        ]}"#;
        let addr = serve_once(http_response(
            "200 OK",
            &[("Content-Type", "application/dns-json")],
            body,
        ))
        .await;

        let result = probe(&client(), "_agent.example.com", &endpoint(addr)).await;

        assert!(result.present);
        assert_eq!(result.method, "RRSIG");
        assert_eq!(result.proof.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn unsigned_answer_is_absent() {
        let body = r#"{"Status":0,"Answer":[{"name":"a.","type":16,"TTL":300,"data":"x"}]}"#;
        let addr = serve_once(http_response("200 OK", &[], body)).await;

        let result = probe(&client(), "a", &endpoint(addr)).await;

        assert_eq!(result, DnssecProbeResult::absent());
    }

    #[tokio::test]
    async fn server_error_is_absent() {
        let addr = serve_once(http_response("500 Internal Server Error", &[], "")).await;

        let result = probe(&client(), "a", &endpoint(addr)).await;

        assert_eq!(result, DnssecProbeResult::absent());
    }

    #[tokio::test]
    async fn undecodable_body_is_absent() {
        let addr = serve_once(http_response("200 OK", &[], "<html>")).await;

        let result = probe(&client(), "a", &endpoint(addr)).await;

        assert_eq!(result, DnssecProbeResult::absent());
    }

    #[tokio::test]
    async fn unreachable_resolver_is_absent() {
        let addr = unused_port().await;

        let result = probe(&client(), "a", &endpoint(addr)).await;

        assert_eq!(result, DnssecProbeResult::absent());
    }
}

mod tls_inspection {
    use super::*;

    #[tokio::test]
    async fn refused_connection_is_connect_error() {
        let addr = unused_port().await;

        let err = inspect_tls(&format!("https://{addr}/"), TIMEOUT)
            .await
            .unwrap_err();

        assert!(matches!(err, TlsInspectError::Connect { .. }), "{err}");
    }

    #[tokio::test]
    async fn silent_server_times_out() {
        // Accepts the connection and never answers the ClientHello.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(5)).await;
            drop(socket);
        });

        let err = inspect_tls(&format!("https://{addr}/"), Duration::from_millis(200))
            .await
            .unwrap_err();

        assert!(err.is_timeout(), "{err}");
    }

    #[tokio::test]
    async fn plaintext_server_is_handshake_error() {
        // Answers the ClientHello with HTTP instead of a ServerHello.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let _ = socket
                .write_all(b"HTTP/1.1 400 Bad Request\r\nConnection: close\r\n\r\n")
                .await;
            let _ = socket.shutdown().await;
        });

        let err = inspect_tls(&format!("https://{addr}/"), TIMEOUT)
            .await
            .unwrap_err();

        assert!(matches!(err, TlsInspectError::Handshake { .. }), "{err}");
    }
}
