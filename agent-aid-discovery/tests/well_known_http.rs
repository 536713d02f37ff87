//! The reqwest-backed well-known source against a loopback HTTP server.

use std::net::SocketAddr;
use std::sync::Arc;

use agent_aid::ErrorCode;
use agent_aid_discovery::{
    DiscoveryOptions, HttpWellKnown, LookupError, RecordSource, Resolver, TxtAnswer, TxtResolver,
    WellKnownSource,
};
use async_trait::async_trait;
use reqwest::redirect::Policy;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use url::Url;

/// DNS double with no records anywhere.
struct EmptyDns;

#[async_trait]
impl TxtResolver for EmptyDns {
    async fn lookup_txt(&self, _name: &str) -> Result<TxtAnswer, LookupError> {
        Err(LookupError::NoRecords)
    }
}

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

fn source() -> HttpWellKnown {
    let client = reqwest::Client::builder()
        .no_proxy()
        .redirect(Policy::none())
        .build()
        .unwrap();
    HttpWellKnown::with_client(client)
}

fn resolver() -> Resolver {
    Resolver::builder()
        .txt_resolver(Arc::new(EmptyDns))
        .well_known_source(Arc::new(source()))
        .options(DiscoveryOptions::new().with_allow_insecure_well_known(true))
        .build()
        .unwrap()
}

#[tokio::test]
async fn fetches_status_content_type_and_body() {
    let body = r#"{"v":"aid1","uri":"https://api.example.com/mcp","proto":"mcp"}"#;
    let addr = serve_once(http_response(
        "200 OK",
        &[("Content-Type", "application/json")],
        body,
    ))
    .await;
    let url = Url::parse(&format!("http://{addr}/.well-known/agent")).unwrap();

    let response = source().get(&url, 64 * 1024).await.unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(response.content_type.as_deref(), Some("application/json"));
    assert_eq!(response.body, body.as_bytes());
}

#[tokio::test]
async fn discovers_over_loopback() {
    let body = r#"{"v":"aid1","u":"https://api.example.com/mcp","p":"mcp","s":"Loopback agent"}"#;
    let addr = serve_once(http_response(
        "200 OK",
        &[("Content-Type", "application/json; charset=utf-8")],
        body,
    ))
    .await;

    let result = resolver().discover(&addr.to_string()).await.unwrap();

    assert_eq!(result.source(), RecordSource::WellKnown);
    assert_eq!(result.record().desc(), Some("Loopback agent"));
    assert_eq!(
        result.query_name(),
        format!("http://{addr}/.well-known/agent")
    );
}

#[tokio::test]
async fn redirect_is_not_followed() {
    let addr = serve_once(http_response(
        "302 Found",
        &[("Location", "https://elsewhere.example/.well-known/agent")],
        "",
    ))
    .await;

    let err = resolver().discover(&addr.to_string()).await.unwrap_err();

    assert_eq!(err.code(), ErrorCode::FallbackFailed);
    assert!(err.message().contains("302"));
}

#[tokio::test]
async fn html_response_rejected() {
    let addr = serve_once(http_response(
        "200 OK",
        &[("Content-Type", "text/html")],
        "<html></html>",
    ))
    .await;

    let err = resolver().discover(&addr.to_string()).await.unwrap_err();

    assert_eq!(err.code(), ErrorCode::FallbackFailed);
}

#[tokio::test]
async fn not_found_ends_in_no_record() {
    let addr = serve_once(http_response("404 Not Found", &[], "")).await;

    let err = resolver().discover(&addr.to_string()).await.unwrap_err();

    assert_eq!(err.code(), ErrorCode::NoRecord);
}

#[tokio::test]
async fn connection_refused_is_fallback_failure() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = resolver().discover(&addr.to_string()).await.unwrap_err();

    assert_eq!(err.code(), ErrorCode::FallbackFailed);
}
