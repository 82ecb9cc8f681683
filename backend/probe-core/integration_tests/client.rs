use crate::helpers::closed_port_url;

use probe_core::DEFAULT_USER_AGENT;
use probe_core::client::ProbeClient;
use probe_core::error::client::ProbeClientError;

use std::time::Duration;

use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// **VALUE**: Non-2xx responses are results, not errors.
///
/// **BUG THIS CATCHES**: Would catch `error_for_status()` creeping into the client, which
/// would turn every 403 into a "Connection error" and hide the block entirely.
#[tokio::test]
async fn given_server_returns_403_when_fetching_then_status_is_ok_403() {
    // GIVEN: A server that forbids the path
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/s/abc"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;
    let client = ProbeClient::with_defaults().unwrap();

    // WHEN: Fetching the status
    let status = client
        .fetch_status(&format!("{}/s/abc", server.uri()))
        .await
        .unwrap();

    // THEN: 403 comes back as a value
    assert!(status.is_forbidden());
}

#[tokio::test]
async fn given_unmatched_path_when_fetching_then_returns_404() {
    let server = MockServer::start().await;
    let client = ProbeClient::with_defaults().unwrap();

    let status = client
        .fetch_status(&format!("{}/anything", server.uri()))
        .await
        .unwrap();

    assert_eq!(status.as_u16(), 404);
}

#[tokio::test]
async fn given_default_client_when_fetching_then_sends_blockprobe_user_agent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("user-agent", DEFAULT_USER_AGENT))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    let client = ProbeClient::with_defaults().unwrap();

    let status = client.fetch_status(&server.uri()).await.unwrap();

    assert_eq!(status.as_u16(), 204);
}

#[tokio::test]
async fn given_nothing_listening_when_fetching_then_returns_http_error() {
    let client = ProbeClient::with_defaults().unwrap();

    let result = client.fetch_status(&closed_port_url()).await;

    assert!(matches!(result, Err(ProbeClientError::Http { .. })));
}

#[tokio::test]
async fn given_slow_server_when_fetching_past_timeout_then_returns_http_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
        .mount(&server)
        .await;
    let client = ProbeClient::new(Duration::from_millis(50), DEFAULT_USER_AGENT).unwrap();

    let result = client.fetch_status(&server.uri()).await;

    assert!(matches!(result, Err(ProbeClientError::Http { .. })));
}
